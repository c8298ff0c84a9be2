// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::path::PathBuf;

use anyhow::Result;
use spendlog::application::ExpenseService;
use spendlog::domain::{Expense, NewExpense};
use tempfile::TempDir;

/// Helper to create a test service with a temporary ledger file
pub fn test_service() -> Result<(ExpenseService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = ExpenseService::open(temp_dir.path().join("expenses.csv"))?;
    Ok((service, temp_dir))
}

/// Path for an extra file inside the test's temporary directory
pub fn temp_path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

/// Shorthand for a raw expense as the user would type it
pub fn new_expense(date: &str, category: &str, description: &str, amount: &str) -> NewExpense {
    NewExpense::new(date, category, description, amount)
}

/// Test fixture: a small ledger spanning three days and three categories
pub struct SampleLedger;

impl SampleLedger {
    pub fn records() -> Vec<NewExpense> {
        vec![
            new_expense("2024-01-01", "Food", "Lunch", "12.50"),
            new_expense("2024-01-01", "Transport", "Bus", "2.00"),
            new_expense("2024-01-02", "Food", "Groceries, weekly", "45.30"),
            new_expense("2024-01-02", "Rent", "", "800"),
            new_expense("2024-01-03", "Food", "Refund", "-5.00"),
        ]
    }

    /// Record every sample expense and return them as stored
    pub fn populate(service: &ExpenseService) -> Result<Vec<Expense>> {
        let mut stored = Vec::new();
        for record in Self::records() {
            stored.push(service.add_expense(record)?);
        }
        Ok(stored)
    }
}
