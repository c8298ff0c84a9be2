use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use crate::domain::{by_category, by_date, total, Cents, Expense, NewExpense};
use crate::io::{export, ExportFormat, ImportOptions, ImportResult, Importer};
use crate::storage::LedgerStore;

use super::{AppError, SummaryReport};

/// Application service providing high-level operations for the expense ledger.
/// This is the application state a front end owns (CLI today).
pub struct ExpenseService {
    store: LedgerStore,
}

impl ExpenseService {
    /// Create a new expense service with the given store.
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Open the ledger at `path`, creating an empty one if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let store = LedgerStore::new(path.as_ref());
        store.initialize()?;
        Ok(Self::new(store))
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    // ========================
    // Ledger operations
    // ========================

    /// Validate and record a new expense.
    pub fn add_expense(&self, candidate: NewExpense) -> Result<Expense, AppError> {
        Ok(self.store.append(candidate)?)
    }

    /// All recorded expenses, oldest first.
    pub fn list_expenses(&self) -> Result<Vec<Expense>, AppError> {
        Ok(self.store.load_all()?)
    }

    /// Remove every expense. Callers are expected to confirm first.
    pub fn clear_all(&self) -> Result<(), AppError> {
        Ok(self.store.clear_all()?)
    }

    // ========================
    // Aggregates
    // ========================

    pub fn total(&self) -> Result<Cents, AppError> {
        Ok(total(&self.list_expenses()?))
    }

    pub fn category_totals(&self) -> Result<BTreeMap<String, Cents>, AppError> {
        Ok(by_category(&self.list_expenses()?))
    }

    pub fn daily_totals(&self) -> Result<BTreeMap<NaiveDate, Cents>, AppError> {
        Ok(by_date(&self.list_expenses()?)?)
    }

    /// Category and daily breakdown of the whole ledger.
    pub fn summary(&self) -> Result<SummaryReport, AppError> {
        Ok(SummaryReport::build(&self.list_expenses()?)?)
    }

    // ========================
    // Import / export
    // ========================

    /// Export the current ledger. Returns the number of records written.
    pub fn export(&self, destination: &Path, format: ExportFormat) -> Result<usize, AppError> {
        let expenses = self.list_expenses()?;
        Ok(export(&expenses, destination, format)?)
    }

    /// Append expenses read from CSV, skipping invalid rows.
    pub fn import_csv<R: Read>(
        &self,
        reader: R,
        source: &Path,
        options: ImportOptions,
    ) -> Result<ImportResult, AppError> {
        Ok(Importer::new(&self.store).import_csv(reader, source, options)?)
    }

    pub fn import_file(&self, path: &Path, options: ImportOptions) -> Result<ImportResult, AppError> {
        Ok(Importer::new(&self.store).import_file(path, options)?)
    }
}
