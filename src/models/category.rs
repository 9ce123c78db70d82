use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::form_utils::{deserialize_field, deserialize_optional_field, optional_text, parse_choice, required_text};

/// Which page a user-defined display category belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Expense,
    Asset,
    Liability,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Asset => "asset",
            Self::Liability => "liability",
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CategoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expense" => Ok(Self::Expense),
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            _ => Err(format!("Unknown category kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub kind: CategoryKind,
    pub color: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryDraft {
    #[serde(default, deserialize_with = "deserialize_field")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_field")]
    pub kind: String,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub color: Option<String>,
}

const DEFAULT_COLOR: &str = "#10b981";

impl CategoryDraft {
    pub fn to_category(&self, id: Uuid) -> LedgerResult<Category> {
        let name = required_text("name", &self.name)?;
        let kind = parse_choice::<CategoryKind>("kind", &self.kind)?;
        let color = optional_text(self.color.as_ref()).unwrap_or_else(|| DEFAULT_COLOR.into());
        if !is_hex_color(&color) {
            return Err(LedgerError::validation(
                "color",
                format!("'{}' is not a #rrggbb color", color),
            ));
        }

        Ok(Category {
            id,
            name,
            kind,
            color: color.to_lowercase(),
        })
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s.chars().skip(1).all(|c| c.is_ascii_hexdigit())
}
