//! Versioned JSON snapshots of the debt book.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::debt::{Debt, Payment};
use crate::errors::Result;

pub const BOOK_SCHEMA_VERSION: u8 = 1;

/// Serializable snapshot of all debts and their payments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtBook {
    #[serde(default = "DebtBook::schema_version_default")]
    pub schema_version: u8,
    #[serde(default)]
    pub debts: Vec<Debt>,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

impl DebtBook {
    pub fn new(debts: Vec<Debt>, payments: Vec<Payment>) -> Self {
        Self {
            schema_version: BOOK_SCHEMA_VERSION,
            debts,
            payments,
        }
    }

    fn schema_version_default() -> u8 {
        BOOK_SCHEMA_VERSION
    }
}

/// Writes a book snapshot as pretty-printed JSON.
pub fn save_book_to_path(book: &DebtBook, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(book)?;
    fs::write(path, json)?;
    Ok(())
}

/// Loads a book snapshot previously written by [`save_book_to_path`].
pub fn load_book_from_path(path: &Path) -> Result<DebtBook> {
    let raw = fs::read_to_string(path)?;
    let book = serde_json::from_str(&raw)?;
    Ok(book)
}
