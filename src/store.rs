//! Persistence boundary for ledger records.
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries::{
    assets, budgets, categories, expenses, investments, liabilities, net_worth, trades,
};
use crate::ledger::{Ledger, Record, RecordKind};
use crate::models::{
    Asset, Budget, Category, Expense, Investment, Liability, NetWorthSnapshot, Trade,
};

/// Source and sink for ledger records. Lists come back in insertion order.
pub trait RecordStore {
    type Error;

    fn list_assets(&self) -> Result<Vec<Asset>, Self::Error>;
    fn list_liabilities(&self) -> Result<Vec<Liability>, Self::Error>;
    fn list_expenses(&self) -> Result<Vec<Expense>, Self::Error>;
    fn list_budgets(&self) -> Result<Vec<Budget>, Self::Error>;
    fn list_investments(&self) -> Result<Vec<Investment>, Self::Error>;
    fn list_trades(&self) -> Result<Vec<Trade>, Self::Error>;
    fn list_snapshots(&self) -> Result<Vec<NetWorthSnapshot>, Self::Error>;
    fn list_categories(&self) -> Result<Vec<Category>, Self::Error>;

    fn insert(&self, record: Record) -> Result<Record, Self::Error>;

    /// Returns whether a stored record was changed.
    fn update(&self, record: &Record) -> Result<bool, Self::Error>;

    /// Returns whether a record was removed. Budgets and snapshots are not
    /// keyed by id and are never removed.
    fn delete(&self, kind: RecordKind, id: Uuid) -> Result<bool, Self::Error>;
}

pub struct SqliteStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl RecordStore for SqliteStore<'_> {
    type Error = rusqlite::Error;

    fn list_assets(&self) -> rusqlite::Result<Vec<Asset>> {
        assets::list_assets(self.conn)
    }

    fn list_liabilities(&self) -> rusqlite::Result<Vec<Liability>> {
        liabilities::list_liabilities(self.conn)
    }

    fn list_expenses(&self) -> rusqlite::Result<Vec<Expense>> {
        expenses::list_expenses(self.conn)
    }

    fn list_budgets(&self) -> rusqlite::Result<Vec<Budget>> {
        budgets::list_budgets(self.conn)
    }

    fn list_investments(&self) -> rusqlite::Result<Vec<Investment>> {
        investments::list_investments(self.conn)
    }

    fn list_trades(&self) -> rusqlite::Result<Vec<Trade>> {
        trades::list_trades(self.conn)
    }

    fn list_snapshots(&self) -> rusqlite::Result<Vec<NetWorthSnapshot>> {
        net_worth::list_snapshots(self.conn)
    }

    fn list_categories(&self) -> rusqlite::Result<Vec<Category>> {
        categories::list_categories(self.conn)
    }

    fn insert(&self, record: Record) -> rusqlite::Result<Record> {
        match &record {
            Record::Asset(a) => assets::insert_asset(self.conn, a)?,
            Record::Liability(l) => liabilities::insert_liability(self.conn, l)?,
            Record::Expense(e) => expenses::insert_expense(self.conn, e)?,
            Record::Budget(b) => budgets::upsert_budget(self.conn, b)?,
            Record::Investment(i) => investments::insert_investment(self.conn, i)?,
            Record::Trade(t) => trades::insert_trade(self.conn, t)?,
            Record::Snapshot(s) => net_worth::insert_snapshot(self.conn, s)?,
            Record::Category(c) => categories::insert_category(self.conn, c)?,
        }
        Ok(record)
    }

    fn update(&self, record: &Record) -> rusqlite::Result<bool> {
        match record {
            Record::Asset(a) => assets::update_asset(self.conn, a),
            Record::Liability(l) => liabilities::update_liability(self.conn, l),
            Record::Expense(e) => expenses::update_expense(self.conn, e),
            Record::Budget(b) => budgets::upsert_budget(self.conn, b).map(|_| true),
            Record::Investment(i) => investments::update_investment(self.conn, i),
            Record::Trade(t) => trades::update_trade(self.conn, t),
            Record::Snapshot(_) => Ok(false),
            Record::Category(c) => categories::update_category(self.conn, c),
        }
    }

    fn delete(&self, kind: RecordKind, id: Uuid) -> rusqlite::Result<bool> {
        match kind {
            RecordKind::Asset => assets::delete_asset(self.conn, id),
            RecordKind::Liability => liabilities::delete_liability(self.conn, id),
            RecordKind::Expense => expenses::delete_expense(self.conn, id),
            RecordKind::Investment => investments::delete_investment(self.conn, id),
            RecordKind::Trade => trades::delete_trade(self.conn, id),
            RecordKind::Category => categories::delete_category(self.conn, id),
            RecordKind::Budget | RecordKind::Snapshot => Ok(false),
        }
    }
}

struct ChangeWriter<'s, S: RecordStore> {
    store: &'s S,
    changes: usize,
}

impl<S: RecordStore> ChangeWriter<'_, S> {
    /// Inserts records new in `after`, updates changed ones and returns the
    /// keys that disappeared.
    fn collection<T, K>(
        &mut self,
        before: &[T],
        after: &[T],
        key: fn(&T) -> K,
        wrap: fn(T) -> Record,
    ) -> Result<Vec<K>, S::Error>
    where
        T: Clone + PartialEq,
        K: PartialEq,
    {
        for item in after {
            match before.iter().find(|b| key(b) == key(item)) {
                None => {
                    self.store.insert(wrap(item.clone()))?;
                    self.changes += 1;
                }
                Some(previous) if previous != item => {
                    self.store.update(&wrap(item.clone()))?;
                    self.changes += 1;
                }
                Some(_) => {}
            }
        }

        Ok(before
            .iter()
            .filter(|b| !after.iter().any(|a| key(a) == key(b)))
            .map(key)
            .collect())
    }

    fn remove(&mut self, kind: RecordKind, ids: Vec<Uuid>) -> Result<(), S::Error> {
        for id in ids {
            if self.store.delete(kind, id)? {
                self.changes += 1;
            }
        }
        Ok(())
    }
}

/// Writes the difference between two ledger snapshots to `store`. Returns
/// the number of records written or removed.
pub fn persist_changes<S: RecordStore>(
    store: &S,
    before: &Ledger,
    after: &Ledger,
) -> Result<usize, S::Error> {
    let mut sync = ChangeWriter { store, changes: 0 };

    let gone = sync.collection(&before.assets, &after.assets, |a| a.id, Record::Asset)?;
    sync.remove(RecordKind::Asset, gone)?;

    let gone = sync.collection(
        &before.liabilities,
        &after.liabilities,
        |l| l.id,
        Record::Liability,
    )?;
    sync.remove(RecordKind::Liability, gone)?;

    let gone = sync.collection(&before.expenses, &after.expenses, |e| e.id, Record::Expense)?;
    sync.remove(RecordKind::Expense, gone)?;

    sync.collection(&before.budgets, &after.budgets, |b| b.category, Record::Budget)?;

    let gone = sync.collection(
        &before.investments,
        &after.investments,
        |i| i.id,
        Record::Investment,
    )?;
    sync.remove(RecordKind::Investment, gone)?;

    let gone = sync.collection(&before.trades, &after.trades, |t| t.id, Record::Trade)?;
    sync.remove(RecordKind::Trade, gone)?;

    sync.collection(
        &before.snapshots,
        &after.snapshots,
        |s| s.period.clone(),
        Record::Snapshot,
    )?;

    let gone = sync.collection(
        &before.categories,
        &after.categories,
        |c| c.id,
        Record::Category,
    )?;
    sync.remove(RecordKind::Category, gone)?;

    tracing::debug!(changes = sync.changes, "Persisted ledger changes");
    Ok(sync.changes)
}
