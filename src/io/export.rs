use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{Expense, COLUMNS};
use crate::storage::{write_atomically, write_table};

/// Name of the single sheet in spreadsheet exports
pub const SHEET_NAME: &str = "Expenses";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Same delimited layout as the ledger file
    Csv,
    /// Excel workbook (.xlsx) with one sheet
    Spreadsheet,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Spreadsheet => "spreadsheet",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Spreadsheet => "xlsx",
        }
    }

    /// Guess the format from a destination's extension; anything but `.xlsx` is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case(ExportFormat::Spreadsheet.extension()) => {
                ExportFormat::Spreadsheet
            }
            _ => ExportFormat::Csv,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "spreadsheet" | "excel" | "xlsx" => Ok(ExportFormat::Spreadsheet),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to export to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to build spreadsheet: {0}")]
    Spreadsheet(#[from] XlsxError),

    #[error("Unsupported export format '{0}'. Valid formats: csv, spreadsheet")]
    UnsupportedFormat(String),
}

/// Exporter for writing a loaded ledger table to other files.
/// It only reads the table; the ledger file itself is never touched.
pub struct Exporter<'a> {
    expenses: &'a [Expense],
}

impl<'a> Exporter<'a> {
    pub fn new(expenses: &'a [Expense]) -> Self {
        Self { expenses }
    }

    /// Export the table as CSV, using the ledger file's own schema.
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize, ExportError> {
        write_table(writer, self.expenses)?;
        Ok(self.expenses.len())
    }

    /// Build an .xlsx workbook holding the table.
    pub fn export_spreadsheet(&self) -> Result<Vec<u8>, ExportError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let amount_format = Format::new().set_num_format("0.00");

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, title) in (0u16..).zip(COLUMNS) {
            worksheet.write_string_with_format(0, col, title, &header_format)?;
        }

        for (row, expense) in (1u32..).zip(self.expenses) {
            worksheet.write_string(row, 0, &expense.date)?;
            worksheet.write_string(row, 1, &expense.category)?;
            worksheet.write_string(row, 2, &expense.description)?;
            worksheet.write_number_with_format(
                row,
                3,
                expense.amount_cents as f64 / 100.0,
                &amount_format,
            )?;
        }

        Ok(workbook.save_to_buffer()?)
    }

    /// Write the table to `destination` in `format`.
    ///
    /// The file appears only once it is complete: on failure nothing is left
    /// at `destination`. Returns the number of records written.
    pub fn write_to(&self, destination: &Path, format: ExportFormat) -> Result<usize, ExportError> {
        let bytes = match format {
            ExportFormat::Csv => {
                let mut buffer = Vec::new();
                self.export_csv(&mut buffer)?;
                buffer
            }
            ExportFormat::Spreadsheet => self.export_spreadsheet()?,
        };
        debug!(bytes = bytes.len(), %format, "encoded export");

        write_atomically(destination, &bytes).map_err(|source| ExportError::Io {
            path: destination.to_path_buf(),
            source,
        })?;

        info!(
            path = %destination.display(),
            %format,
            records = self.expenses.len(),
            "exported expenses"
        );
        Ok(self.expenses.len())
    }
}

/// Write `expenses` to `destination` in `format`.
pub fn export(
    expenses: &[Expense],
    destination: &Path,
    format: ExportFormat,
) -> Result<usize, ExportError> {
    Exporter::new(expenses).write_to(destination, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(
            "excel".parse::<ExportFormat>().unwrap(),
            ExportFormat::Spreadsheet
        );
        assert_eq!(
            " xlsx ".parse::<ExportFormat>().unwrap(),
            ExportFormat::Spreadsheet
        );
        assert!(matches!(
            "pdf".parse::<ExportFormat>(),
            Err(ExportError::UnsupportedFormat(f)) if f == "pdf"
        ));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ExportFormat::from_path(Path::new("out/report.XLSX")),
            ExportFormat::Spreadsheet
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("report.csv")),
            ExportFormat::Csv
        );
        assert_eq!(ExportFormat::from_path(Path::new("report")), ExportFormat::Csv);
    }

    #[test]
    fn test_extension_maps_back_to_format() {
        for format in [ExportFormat::Csv, ExportFormat::Spreadsheet] {
            let path = Path::new("out").with_extension(format.extension());
            assert_eq!(ExportFormat::from_path(&path), format);
        }
    }

    #[test]
    fn test_export_csv_to_writer() {
        let expenses = vec![
            Expense::new("2024-01-01", "Food", "Lunch", 1250),
            Expense::new("2024-01-01", "Transport", "Bus", 200),
        ];
        let mut buffer = Vec::new();

        let count = Exporter::new(&expenses).export_csv(&mut buffer).unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "Date,Category,Description,Amount\n\
             2024-01-01,Food,Lunch,12.50\n\
             2024-01-01,Transport,Bus,2.00\n"
        );
    }

    #[test]
    fn test_export_spreadsheet_is_zip() {
        let expenses = vec![Expense::new("2024-01-01", "Food", "Lunch", 1250)];
        let bytes = Exporter::new(&expenses).export_spreadsheet().unwrap();

        // xlsx files are zip containers
        assert!(bytes.starts_with(b"PK"));
    }
}
