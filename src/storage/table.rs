use std::io::{Read, Write};
use std::path::Path;

use crate::domain::{format_cents, parse_cents, Expense, COLUMNS};

use super::StorageError;

/// Read a ledger table: the exact four-column header, then one row per record.
///
/// `path` is only used to label errors.
pub fn read_table<R: Read>(reader: R, path: &Path) -> Result<Vec<Expense>, StorageError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(|source| StorageError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    if headers.iter().ne(COLUMNS.iter().copied()) {
        return Err(StorageError::Schema {
            path: path.to_path_buf(),
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    let mut expenses = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(|source| StorageError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.len() != COLUMNS.len() {
            return Err(StorageError::InvalidRow {
                path: path.to_path_buf(),
                line,
                reason: format!("expected {} fields, found {}", COLUMNS.len(), record.len()),
            });
        }

        let amount = &record[3];
        let amount_cents = parse_cents(amount).map_err(|e| StorageError::InvalidRow {
            path: path.to_path_buf(),
            line,
            reason: format!("amount '{}': {}", amount, e),
        })?;

        expenses.push(Expense {
            date: record[0].to_string(),
            category: record[1].to_string(),
            description: record[2].to_string(),
            amount_cents,
        });
    }

    Ok(expenses)
}

/// Write a ledger table. The header is always written, even for zero records.
pub fn write_table<W: Write>(writer: W, expenses: &[Expense]) -> csv::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(COLUMNS)?;
    for expense in expenses {
        csv_writer.write_record([
            expense.date.as_str(),
            expense.category.as_str(),
            expense.description.as_str(),
            format_cents(expense.amount_cents).as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Serialize a table into an in-memory buffer.
pub fn table_to_bytes(expenses: &[Expense]) -> csv::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_table(&mut buffer, expenses)?;
    Ok(buffer)
}
