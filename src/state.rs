use rusqlite::TransactionBehavior;
use std::sync::Arc;

use crate::config::Config;
use crate::db::queries::settings;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::ledger::Ledger;
use crate::models::Settings;
use crate::store::{persist_changes, SqliteStore};

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DbPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    pub fn load_ledger(&self) -> AppResult<Ledger> {
        let conn = self.db.get()?;
        Ok(Ledger::load(&SqliteStore::new(&conn))?)
    }

    pub fn load_settings(&self) -> AppResult<Settings> {
        let conn = self.db.get()?;
        Ok(settings::get_settings(&conn)?)
    }

    /// Loads the ledger, applies `mutate` and writes back whatever changed.
    /// The mutation's own result is handed back to the caller.
    ///
    /// Load and write share one `BEGIN IMMEDIATE` transaction: a failed write
    /// leaves nothing behind, and concurrent writers queue instead of both
    /// reading the same old ledger.
    pub fn apply<T, F>(&self, mutate: F) -> AppResult<(Ledger, T)>
    where
        F: FnOnce(&Ledger) -> Result<(Ledger, T), AppError>,
    {
        let mut conn = self.db.get()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let (after, output) = {
            let store = SqliteStore::new(&tx);
            let before = Ledger::load(&store)?;
            let (after, output) = mutate(&before)?;
            persist_changes(&store, &before, &after)?;
            (after, output)
        };

        tx.commit()?;
        Ok((after, output))
    }
}
