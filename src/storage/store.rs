use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::{Expense, NewExpense, ValidationError};

use super::{read_table, table_to_bytes, write_atomically, StorageError};

/// Owner of the backing ledger file.
///
/// Nothing is cached: every read parses the whole file, every write
/// reads, modifies and rewrites the whole file.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

/// Failure of `LedgerStore::append`.
#[derive(thiserror::Error, Debug)]
pub enum AppendError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the backing file with an empty table if it doesn't exist yet.
    /// An existing file is left untouched.
    pub fn initialize(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            debug!(path = %self.path.display(), "ledger file already exists");
            return Ok(());
        }

        self.write_all(&[])?;
        info!(path = %self.path.display(), "created empty ledger file");
        Ok(())
    }

    /// Validate a candidate record and append it to the table.
    /// On a validation failure the file is not touched.
    pub fn append(&self, candidate: NewExpense) -> Result<Expense, AppendError> {
        let expense = candidate.validate()?;
        self.append_all(std::slice::from_ref(&expense))?;
        Ok(expense)
    }

    /// Append already-validated records in a single rewrite.
    pub fn append_all(&self, expenses: &[Expense]) -> Result<(), StorageError> {
        let mut table = self.load_all()?;
        table.extend_from_slice(expenses);
        self.write_all(&table)?;

        debug!(
            added = expenses.len(),
            total_records = table.len(),
            "appended to ledger"
        );
        Ok(())
    }

    /// Every persisted record, in insertion order.
    /// A missing file reads as an empty table.
    pub fn load_all(&self) -> Result<Vec<Expense>, StorageError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "ledger file missing, reading as empty");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        read_table(file, &self.path)
    }

    /// Drop every record. There is no backup.
    pub fn clear_all(&self) -> Result<(), StorageError> {
        self.write_all(&[])?;
        info!(path = %self.path.display(), "cleared all expenses");
        Ok(())
    }

    /// Overwrite the table with exactly `expenses`.
    pub fn replace_all(&self, expenses: &[Expense]) -> Result<(), StorageError> {
        self.write_all(expenses)
    }

    fn write_all(&self, expenses: &[Expense]) -> Result<(), StorageError> {
        let bytes = table_to_bytes(expenses).map_err(|source| StorageError::Csv {
            path: self.path.clone(),
            source,
        })?;

        write_atomically(&self.path, &bytes).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
