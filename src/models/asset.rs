use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::LedgerResult;
use crate::form_utils::{
    deserialize_field, deserialize_optional_field, parse_choice, parse_number,
    parse_optional_number, optional_text, require_non_negative, required_text, to_cents,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetCategory {
    Cash,
    Stocks,
    Crypto,
    RealEstate,
    Business,
}

impl AssetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Stocks => "stocks",
            Self::Crypto => "crypto",
            Self::RealEstate => "real-estate",
            Self::Business => "business",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Stocks => "Stocks",
            Self::Crypto => "Cryptocurrency",
            Self::RealEstate => "Real Estate",
            Self::Business => "Business",
        }
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssetCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "stocks" => Ok(Self::Stocks),
            "crypto" => Ok(Self::Crypto),
            "real-estate" => Ok(Self::RealEstate),
            "business" => Ok(Self::Business),
            _ => Err(format!("Unknown asset category: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: Uuid,
    pub name: String,
    pub category: AssetCategory,
    pub value_cents: i64,
    /// Annual growth rate in percent.
    pub growth_rate: Option<f64>,
    pub notes: Option<String>,
    pub last_updated: DateTime<Utc>,
}

/// Asset form input as submitted by the user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetDraft {
    #[serde(default, deserialize_with = "deserialize_field")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_field")]
    pub category: String,
    #[serde(default, deserialize_with = "deserialize_field")]
    pub value: String,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub growth_rate: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub notes: Option<String>,
}

impl AssetDraft {
    pub fn to_asset(&self, id: Uuid, now: DateTime<Utc>) -> LedgerResult<Asset> {
        let name = required_text("name", &self.name)?;
        let category = parse_choice::<AssetCategory>("category", &self.category)?;
        let value = require_non_negative("value", parse_number("value", &self.value)?)?;
        let growth_rate = parse_optional_number("growth_rate", self.growth_rate.as_ref())?;

        Ok(Asset {
            id,
            name,
            category,
            value_cents: to_cents(value),
            growth_rate,
            notes: optional_text(self.notes.as_ref()),
            last_updated: now,
        })
    }
}
