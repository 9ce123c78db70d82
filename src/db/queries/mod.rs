pub mod assets;
pub mod budgets;
pub mod categories;
pub mod expenses;
pub mod investments;
pub mod liabilities;
pub mod net_worth;
pub mod settings;
pub mod trades;

use rusqlite::types::Type;
use std::str::FromStr;

/// Reads a closed-enumeration column stored as its kebab-case name.
pub(crate) fn parse_column<T>(idx: usize, raw: String) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    raw.parse()
        .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}
