//! The in-memory set of financial records a user owns.
//!
//! A [`Ledger`] is a plain value. The mutator never edits one in place; it
//! clones, applies a change, and hands back the new snapshot.
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::models::{
    Asset, AssetDraft, Budget, Category, Expense, ExpenseCategory, ExpenseDraft, Investment,
    InvestmentDraft, Liability, LiabilityDraft, NetWorthSnapshot, Trade, TradeDraft,
};
use crate::store::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKind {
    Asset,
    Liability,
    Expense,
    Budget,
    Investment,
    Trade,
    Snapshot,
    Category,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Expense => "expense",
            Self::Budget => "budget",
            Self::Investment => "investment",
            Self::Trade => "trade",
            Self::Snapshot => "snapshot",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Asset => "Asset",
            Self::Liability => "Liability",
            Self::Expense => "Expense",
            Self::Budget => "Budget",
            Self::Investment => "Investment",
            Self::Trade => "Trade",
            Self::Snapshot => "Snapshot",
            Self::Category => "Category",
        };
        f.write_str(label)
    }
}

/// One stored record of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Asset(Asset),
    Liability(Liability),
    Expense(Expense),
    Budget(Budget),
    Investment(Investment),
    Trade(Trade),
    Snapshot(NetWorthSnapshot),
    Category(Category),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Asset(_) => RecordKind::Asset,
            Record::Liability(_) => RecordKind::Liability,
            Record::Expense(_) => RecordKind::Expense,
            Record::Budget(_) => RecordKind::Budget,
            Record::Investment(_) => RecordKind::Investment,
            Record::Trade(_) => RecordKind::Trade,
            Record::Snapshot(_) => RecordKind::Snapshot,
            Record::Category(_) => RecordKind::Category,
        }
    }
}

/// A user submission for one of the record kinds created through
/// [`crate::services::mutator::add_record`].
#[derive(Debug, Clone)]
pub enum RecordDraft {
    Asset(AssetDraft),
    Liability(LiabilityDraft),
    Expense(ExpenseDraft),
    Investment(InvestmentDraft),
    Trade(TradeDraft),
}

impl RecordDraft {
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordDraft::Asset(_) => RecordKind::Asset,
            RecordDraft::Liability(_) => RecordKind::Liability,
            RecordDraft::Expense(_) => RecordKind::Expense,
            RecordDraft::Investment(_) => RecordKind::Investment,
            RecordDraft::Trade(_) => RecordKind::Trade,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ledger {
    pub assets: Vec<Asset>,
    pub liabilities: Vec<Liability>,
    pub expenses: Vec<Expense>,
    pub budgets: Vec<Budget>,
    pub investments: Vec<Investment>,
    pub trades: Vec<Trade>,
    pub snapshots: Vec<NetWorthSnapshot>,
    pub categories: Vec<Category>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every collection from `store` into a fresh snapshot.
    pub fn load<S: RecordStore>(store: &S) -> Result<Self, S::Error> {
        let ledger = Self {
            assets: store.list_assets()?,
            liabilities: store.list_liabilities()?,
            expenses: store.list_expenses()?,
            budgets: store.list_budgets()?,
            investments: store.list_investments()?,
            trades: store.list_trades()?,
            snapshots: store.list_snapshots()?,
            categories: store.list_categories()?,
        };
        tracing::debug!(
            assets = ledger.assets.len(),
            liabilities = ledger.liabilities.len(),
            expenses = ledger.expenses.len(),
            investments = ledger.investments.len(),
            trades = ledger.trades.len(),
            "Loaded ledger"
        );
        Ok(ledger)
    }

    pub fn asset(&self, id: Uuid) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn liability(&self, id: Uuid) -> Option<&Liability> {
        self.liabilities.iter().find(|l| l.id == id)
    }

    pub fn expense(&self, id: Uuid) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn investment(&self, id: Uuid) -> Option<&Investment> {
        self.investments.iter().find(|i| i.id == id)
    }

    pub fn trade(&self, id: Uuid) -> Option<&Trade> {
        self.trades.iter().find(|t| t.id == id)
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn budget(&self, category: ExpenseCategory) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.category == category)
    }

    pub fn snapshot(&self, period: &str) -> Option<&NetWorthSnapshot> {
        self.snapshots.iter().find(|s| s.period == period)
    }

    /// The record with `id` as a [`Record`]. Budgets and snapshots have no
    /// id and never match.
    pub fn find(&self, kind: RecordKind, id: Uuid) -> Option<Record> {
        match kind {
            RecordKind::Asset => self.asset(id).cloned().map(Record::Asset),
            RecordKind::Liability => self.liability(id).cloned().map(Record::Liability),
            RecordKind::Expense => self.expense(id).cloned().map(Record::Expense),
            RecordKind::Investment => self.investment(id).cloned().map(Record::Investment),
            RecordKind::Trade => self.trade(id).cloned().map(Record::Trade),
            RecordKind::Category => self.category(id).cloned().map(Record::Category),
            RecordKind::Budget | RecordKind::Snapshot => None,
        }
    }
}
