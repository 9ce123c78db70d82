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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TradeSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buy" | "long" => Ok(Self::Buy),
            "sell" | "short" => Ok(Self::Sell),
            _ => Err(format!("Unknown trade side: {}", s)),
        }
    }
}

/// Trade lifecycle. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Open,
    Closed,
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TradeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            _ => Err(format!("Unknown trade status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: Uuid,
    pub symbol: String,
    pub side: TradeSide,
    pub strategy: String,
    pub entry_price_cents: i64,
    pub exit_price_cents: Option<i64>,
    pub quantity: f64,
    pub entry_date: NaiveDate,
    pub exit_date: Option<NaiveDate>,
    pub pnl_cents: Option<i64>,
    pub notes: Option<String>,
    pub status: TradeStatus,
}

impl Trade {
    pub fn is_open(&self) -> bool {
        self.status == TradeStatus::Open
    }

    pub fn is_closed(&self) -> bool {
        self.status == TradeStatus::Closed
    }

    /// A closed trade with strictly positive P&L.
    pub fn is_winner(&self) -> bool {
        self.is_closed() && self.pnl_cents.is_some_and(|p| p > 0)
    }

    /// P&L if the position were exited at `exit_price_cents`. A short
    /// (sell) position profits when the price falls.
    pub fn pnl_at(&self, exit_price_cents: i64) -> i64 {
        let per_unit = match self.side {
            TradeSide::Buy => exit_price_cents - self.entry_price_cents,
            TradeSide::Sell => self.entry_price_cents - exit_price_cents,
        };
        (per_unit as f64 * self.quantity).round() as i64
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TradeDraft {
    #[serde(default, deserialize_with = "deserialize_field")]
    pub symbol: String,
    #[serde(default, deserialize_with = "deserialize_field")]
    pub side: String,
    #[serde(default, deserialize_with = "deserialize_field")]
    pub strategy: String,
    #[serde(default, deserialize_with = "deserialize_field")]
    pub entry_price: String,
    #[serde(default, deserialize_with = "deserialize_field")]
    pub quantity: String,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub entry_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub notes: Option<String>,
}

impl TradeDraft {
    pub fn to_trade(&self, id: Uuid, today: NaiveDate) -> LedgerResult<Trade> {
        let symbol = required_text("symbol", &self.symbol)?.to_uppercase();
        let side = parse_choice::<TradeSide>("side", &self.side)?;
        let strategy = required_text("strategy", &self.strategy)?;
        let entry_price =
            require_positive("entry_price", parse_number("entry_price", &self.entry_price)?)?;
        let quantity = require_positive("quantity", parse_number("quantity", &self.quantity)?)?;
        let entry_date = parse_date_or("entry_date", self.entry_date.as_ref(), today)?;

        Ok(Trade {
            id,
            symbol,
            side,
            strategy,
            entry_price_cents: to_cents(entry_price),
            exit_price_cents: None,
            quantity,
            entry_date,
            exit_date: None,
            pnl_cents: None,
            notes: optional_text(self.notes.as_ref()),
            status: TradeStatus::Open,
        })
    }
}
