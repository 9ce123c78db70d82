use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::form_utils::{
    deserialize_field, deserialize_optional_field, optional_text, parse_choice, parse_number,
    require_non_negative, require_positive, required_text, to_cents,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvestmentCategory {
    Stocks,
    Crypto,
    Bonds,
    RealEstate,
}

impl InvestmentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stocks => "stocks",
            Self::Crypto => "crypto",
            Self::Bonds => "bonds",
            Self::RealEstate => "real-estate",
        }
    }
}

impl fmt::Display for InvestmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InvestmentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stocks" => Ok(Self::Stocks),
            "crypto" => Ok(Self::Crypto),
            "bonds" => Ok(Self::Bonds),
            "real-estate" => Ok(Self::RealEstate),
            _ => Err(format!("Unknown investment category: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: Uuid,
    pub name: String,
    pub category: InvestmentCategory,
    pub buy_price_cents: i64,
    pub current_price_cents: i64,
    pub quantity: f64,
    pub notes: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl Investment {
    pub fn cost_basis_cents(&self) -> i64 {
        (self.buy_price_cents as f64 * self.quantity).round() as i64
    }

    pub fn market_value_cents(&self) -> i64 {
        (self.current_price_cents as f64 * self.quantity).round() as i64
    }

    pub fn gain_loss_cents(&self) -> i64 {
        self.market_value_cents().saturating_sub(self.cost_basis_cents())
    }

    /// Return on investment in percent, derived from the current prices on
    /// every call. `None` when the buy price is zero.
    pub fn roi_percent(&self) -> Option<f64> {
        roi_percent(self.buy_price_cents, self.current_price_cents)
    }
}

pub(crate) fn roi_percent(buy_cents: i64, current_cents: i64) -> Option<f64> {
    if buy_cents == 0 {
        return None;
    }
    Some((current_cents - buy_cents) as f64 / buy_cents as f64 * 100.0)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvestmentDraft {
    #[serde(default, deserialize_with = "deserialize_field")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_field")]
    pub category: String,
    #[serde(default, deserialize_with = "deserialize_field")]
    pub buy_price: String,
    #[serde(default, deserialize_with = "deserialize_field")]
    pub current_price: String,
    #[serde(default, deserialize_with = "deserialize_field")]
    pub quantity: String,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub notes: Option<String>,
}

impl InvestmentDraft {
    /// Validated `(buy_price_cents, current_price_cents)`.
    pub fn prices(&self) -> LedgerResult<(i64, i64)> {
        let buy = require_positive("buy_price", parse_number("buy_price", &self.buy_price)?)?;
        let current = require_non_negative(
            "current_price",
            parse_number("current_price", &self.current_price)?,
        )?;
        let buy_cents = to_cents(buy);
        if buy_cents == 0 {
            return Err(LedgerError::validation("buy_price", "rounds to zero cents"));
        }
        Ok((buy_cents, to_cents(current)))
    }

    pub fn to_investment(&self, id: Uuid, now: DateTime<Utc>) -> LedgerResult<Investment> {
        let name = required_text("name", &self.name)?;
        let category = parse_choice::<InvestmentCategory>("category", &self.category)?;
        let (buy_price_cents, current_price_cents) = self.prices()?;
        let quantity = require_positive("quantity", parse_number("quantity", &self.quantity)?)?;

        Ok(Investment {
            id,
            name,
            category,
            buy_price_cents,
            current_price_cents,
            quantity,
            notes: optional_text(self.notes.as_ref()),
            last_updated: now,
        })
    }
}
