//! Column mapping: explicit, validated column names with a fuzzy fallback.
//!
//! Resolution order for each role:
//! 1. An explicitly configured name (lower-cased) must exist, or resolution fails.
//! 2. Otherwise `date` and `close` fall back to the first column whose
//!    lower-cased name contains the token (`"date"` / `"close"`).
//! 3. `text` and `ticker` always carry a name (defaults `headline` / `stock`).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::DataError;

/// The roles a column can play in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    Date,
    Close,
    Text,
    Ticker,
}

impl ColumnRole {
    /// Substring searched for when no explicit name is configured.
    fn fuzzy_token(self) -> Option<&'static str> {
        match self {
            ColumnRole::Date => Some("date"),
            ColumnRole::Close => Some("close"),
            ColumnRole::Text | ColumnRole::Ticker => None,
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnRole::Date => "date",
            ColumnRole::Close => "close",
            ColumnRole::Text => "text",
            ColumnRole::Ticker => "ticker",
        };
        f.write_str(s)
    }
}

/// Column names used by the loader, return calculator and sentiment scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Date column; `None` searches for the first column containing "date".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Close-price column; `None` searches for the first column containing "close".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<String>,
    /// Headline text column.
    pub text: String,
    /// Ticker-symbol column in the news table (optional in the data).
    pub ticker: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date: None,
            close: None,
            text: "headline".into(),
            ticker: "stock".into(),
        }
    }
}

impl ColumnMapping {
    fn explicit(&self, role: ColumnRole) -> Option<&str> {
        match role {
            ColumnRole::Date => self.date.as_deref(),
            ColumnRole::Close => self.close.as_deref(),
            ColumnRole::Text => Some(self.text.as_str()),
            ColumnRole::Ticker => Some(self.ticker.as_str()),
        }
    }

    /// Resolve the column for `role` among `columns` (already lower-cased).
    pub fn resolve(&self, role: ColumnRole, columns: &[String]) -> Result<String, DataError> {
        self.resolve_optional(role, columns)
            .ok_or_else(|| DataError::MissingRequiredColumn {
                role,
                available: columns.to_vec(),
            })
    }

    /// Like [`resolve`](Self::resolve) but for columns the data may legitimately lack.
    pub fn resolve_optional(&self, role: ColumnRole, columns: &[String]) -> Option<String> {
        if let Some(name) = self.explicit(role) {
            let wanted = name.to_lowercase();
            return columns.iter().find(|c| **c == wanted).cloned();
        }
        role.fuzzy_token()
            .and_then(|token| find_column_containing(columns, token))
            .map(str::to_string)
    }
}

/// First column whose lower-cased name contains `token`.
pub fn find_column_containing<'a>(columns: &'a [String], token: &str) -> Option<&'a str> {
    let token = token.to_lowercase();
    columns
        .iter()
        .find(|c| c.to_lowercase().contains(&token))
        .map(String::as_str)
}
