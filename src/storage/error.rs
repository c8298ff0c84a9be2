use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to access ledger file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse ledger file {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(
        "Ledger file {} has columns [{}], expected [Date, Category, Description, Amount]",
        path.display(),
        found.join(", ")
    )]
    Schema { path: PathBuf, found: Vec<String> },

    #[error("Ledger file {} line {line}: {reason}", path.display())]
    InvalidRow {
        path: PathBuf,
        line: u64,
        reason: String,
    },
}
