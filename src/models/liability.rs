use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::LedgerResult;
use crate::form_utils::{
    deserialize_field, deserialize_optional_field, parse_choice, parse_number,
    parse_optional_date, parse_optional_number, optional_text, require_non_negative,
    required_text, to_cents,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LiabilityCategory {
    Loan,
    CreditCard,
    Mortgage,
    Bills,
    Other,
}

impl LiabilityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loan => "loan",
            Self::CreditCard => "credit-card",
            Self::Mortgage => "mortgage",
            Self::Bills => "bills",
            Self::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Loan => "Loan",
            Self::CreditCard => "Credit Card",
            Self::Mortgage => "Mortgage",
            Self::Bills => "Bills",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for LiabilityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LiabilityCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "loan" => Ok(Self::Loan),
            "credit-card" => Ok(Self::CreditCard),
            "mortgage" => Ok(Self::Mortgage),
            "bills" => Ok(Self::Bills),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown liability category: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Liability {
    pub id: Uuid,
    pub name: String,
    pub category: LiabilityCategory,
    pub amount_cents: i64,
    /// Annual interest rate in percent.
    pub interest_rate: Option<f64>,
    pub monthly_payment_cents: Option<i64>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiabilityDraft {
    #[serde(default, deserialize_with = "deserialize_field")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_field")]
    pub category: String,
    #[serde(default, deserialize_with = "deserialize_field")]
    pub amount: String,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub interest_rate: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub monthly_payment: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub notes: Option<String>,
}

impl LiabilityDraft {
    pub fn to_liability(&self, id: Uuid, now: DateTime<Utc>) -> LedgerResult<Liability> {
        let name = required_text("name", &self.name)?;
        let category = parse_choice::<LiabilityCategory>("category", &self.category)?;
        let amount = require_non_negative("amount", parse_number("amount", &self.amount)?)?;
        let interest_rate = parse_optional_number("interest_rate", self.interest_rate.as_ref())?
            .map(|r| require_non_negative("interest_rate", r))
            .transpose()?;
        let monthly_payment =
            parse_optional_number("monthly_payment", self.monthly_payment.as_ref())?
                .map(|p| require_non_negative("monthly_payment", p))
                .transpose()?;
        let due_date = parse_optional_date("due_date", self.due_date.as_ref())?;

        Ok(Liability {
            id,
            name,
            category,
            amount_cents: to_cents(amount),
            interest_rate,
            monthly_payment_cents: monthly_payment.map(to_cents),
            due_date,
            notes: optional_text(self.notes.as_ref()),
            last_updated: now,
        })
    }
}
