use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use crate::domain::{Expense, NewExpense, ValidationError};
use crate::storage::{read_table, LedgerStore, StorageError};

/// Result of an import operation
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub imported: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred during import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: u64,
    pub field: Option<String>,
    pub error: String,
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Validate every row but write nothing
    pub dry_run: bool,
}

/// Column positions found in an import header
struct ColumnMap {
    date: usize,
    category: usize,
    description: Option<usize>,
    amount: usize,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord, source: &Path) -> Result<Self, StorageError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        match (find("Date"), find("Category"), find("Amount")) {
            (Some(date), Some(category), Some(amount)) => Ok(Self {
                date,
                category,
                description: find("Description"),
                amount,
            }),
            _ => Err(StorageError::Schema {
                path: source.to_path_buf(),
                found: headers.iter().map(str::to_string).collect(),
            }),
        }
    }
}

/// Importer for loading expenses from external CSV files into the ledger
pub struct Importer<'a> {
    store: &'a LedgerStore,
}

impl<'a> Importer<'a> {
    pub fn new(store: &'a LedgerStore) -> Self {
        Self { store }
    }

    /// Import expenses from CSV.
    ///
    /// Columns are matched by header name, case-insensitively; `Description`
    /// may be missing. Rows that fail validation are reported and skipped,
    /// the rest are appended in one write. `source` only labels errors.
    pub fn import_csv<R: Read>(
        &self,
        reader: R,
        source: &Path,
        options: ImportOptions,
    ) -> Result<ImportResult, StorageError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers().map_err(|source_err| StorageError::Csv {
            path: source.to_path_buf(),
            source: source_err,
        })?;
        let columns = ColumnMap::from_headers(headers, source)?;

        let mut accepted = Vec::new();
        let mut errors = Vec::new();

        for (line_num, result) in csv_reader.records().enumerate() {
            // +2 for header and 0-indexing
            let fallback_line = line_num as u64 + 2;

            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    errors.push(ImportError {
                        line: e.position().map(|p| p.line()).unwrap_or(fallback_line),
                        field: None,
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };
            let line = record.position().map(|p| p.line()).unwrap_or(fallback_line);
            let field = |idx: usize| record.get(idx).unwrap_or("").to_string();

            let candidate = NewExpense {
                date: field(columns.date),
                category: field(columns.category),
                description: columns.description.map(&field).unwrap_or_default(),
                amount: field(columns.amount),
            };

            match candidate.validate() {
                Ok(expense) => accepted.push(expense),
                Err(e) => {
                    let field = match &e {
                        ValidationError::InvalidAmount(_) => "Amount",
                        ValidationError::EmptyCategory => "Category",
                        ValidationError::InvalidDate(_) => "Date",
                    };
                    errors.push(ImportError {
                        line,
                        field: Some(field.to_string()),
                        error: e.to_string(),
                    });
                }
            }
        }

        if !errors.is_empty() {
            warn!(
                source = %source.display(),
                rejected = errors.len(),
                "skipped invalid rows during import"
            );
        }

        if !options.dry_run && !accepted.is_empty() {
            self.store.append_all(&accepted)?;
            info!(
                source = %source.display(),
                imported = accepted.len(),
                "imported expenses"
            );
        }

        Ok(ImportResult {
            imported: accepted.len(),
            errors,
        })
    }

    /// Import expenses from a CSV file on disk.
    pub fn import_file(
        &self,
        path: &Path,
        options: ImportOptions,
    ) -> Result<ImportResult, StorageError> {
        let file = File::open(path).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.import_csv(file, path, options)
    }
}

/// Read a CSV file with the exact ledger schema as a table.
/// Exported CSV files read back to the table they were written from.
pub fn read_table_file(path: &Path) -> Result<Vec<Expense>, StorageError> {
    let file = File::open(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_table(file, path)
}
