use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::LedgerResult;
use crate::form_utils::{
    deserialize_field, deserialize_optional_field, optional_text, parse_choice, parse_date_or,
    parse_number, require_positive, required_text, to_cents,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpenseCategory {
    Food,
    Transport,
    Bills,
    Entertainment,
    Misc,
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Bills => "bills",
            Self::Entertainment => "entertainment",
            Self::Misc => "misc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Bills => "Bills",
            Self::Entertainment => "Entertainment",
            Self::Misc => "Miscellaneous",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "food" => Ok(Self::Food),
            "transport" => Ok(Self::Transport),
            "bills" => Ok(Self::Bills),
            "entertainment" => Ok(Self::Entertainment),
            "misc" => Ok(Self::Misc),
            _ => Err(format!("Unknown expense category: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub name: String,
    pub category: ExpenseCategory,
    pub amount_cents: i64,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseDraft {
    #[serde(default, deserialize_with = "deserialize_field")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_field")]
    pub category: String,
    #[serde(default, deserialize_with = "deserialize_field")]
    pub amount: String,
    /// Defaults to the submission day when absent.
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub notes: Option<String>,
}

impl ExpenseDraft {
    pub fn to_expense(&self, id: Uuid, today: NaiveDate) -> LedgerResult<Expense> {
        let name = required_text("name", &self.name)?;
        let category = parse_choice::<ExpenseCategory>("category", &self.category)?;
        let amount = require_positive("amount", parse_number("amount", &self.amount)?)?;
        let date = parse_date_or("date", self.date.as_ref(), today)?;

        Ok(Expense {
            id,
            name,
            category,
            amount_cents: to_cents(amount),
            date,
            notes: optional_text(self.notes.as_ref()),
        })
    }
}

/// Spending limit for one expense category. `spent_cents` is a running
/// total maintained by the expense-add path only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub category: ExpenseCategory,
    pub limit_cents: i64,
    pub spent_cents: i64,
}

impl Budget {
    pub fn new(category: ExpenseCategory, limit_cents: i64) -> Self {
        Self {
            category,
            limit_cents,
            spent_cents: 0,
        }
    }
}
