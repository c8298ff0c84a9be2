use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{parse_cents, Cents};

/// Column headers of the ledger table, in their fixed order.
pub const COLUMNS: [&str; 4] = ["Date", "Category", "Description", "Amount"];

/// A single recorded expense.
/// Records are append-only: once written they are never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Day the expense happened, as the user typed it. Not validated on write.
    pub date: String,
    /// Free-form label used for grouping (e.g., "Food", "Transport")
    pub category: String,
    /// Optional note, may be empty
    pub description: String,
    /// Amount in cents; negative values are allowed (refunds, corrections)
    pub amount_cents: Cents,
}

impl Expense {
    pub fn new(
        date: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
        amount_cents: Cents,
    ) -> Self {
        Self {
            date: date.into(),
            category: category.into(),
            description: description.into(),
            amount_cents,
        }
    }

    /// Calendar date of this expense, or `InvalidDate` if the text is not a date.
    pub fn calendar_date(&self) -> Result<NaiveDate, ValidationError> {
        parse_calendar_date(&self.date)
    }
}

/// Raw user input for an expense, before validation.
#[derive(Debug, Clone, Default)]
pub struct NewExpense {
    pub date: String,
    pub category: String,
    pub description: String,
    pub amount: String,
}

impl NewExpense {
    pub fn new(
        date: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            category: category.into(),
            description: description.into(),
            amount: amount.into(),
        }
    }

    /// Turn the raw input into a record.
    /// The amount is checked before the category.
    pub fn validate(self) -> Result<Expense, ValidationError> {
        let amount_cents = parse_cents(&self.amount)
            .map_err(|_| ValidationError::InvalidAmount(self.amount.clone()))?;

        if self.category.trim().is_empty() {
            return Err(ValidationError::EmptyCategory);
        }

        Ok(Expense {
            date: self.date,
            category: self.category,
            description: self.description,
            amount_cents,
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid amount (got '{0}')")]
    InvalidAmount(String),

    #[error("Please enter a category")]
    EmptyCategory,

    #[error("Not a calendar date: '{0}'")]
    InvalidDate(String),
}

/// Parse the date column into a calendar date.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY-MM-DD HH:MM:SS` and RFC 3339
/// timestamps; timestamps are truncated to their date.
pub fn parse_calendar_date(s: &str) -> Result<NaiveDate, ValidationError> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y/%m/%d") {
        return Ok(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    Err(ValidationError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_expense() {
        let expense = NewExpense::new("2024-01-01", "Food", "Lunch", "12.50")
            .validate()
            .unwrap();

        assert_eq!(expense, Expense::new("2024-01-01", "Food", "Lunch", 1250));
    }

    #[test]
    fn test_validate_allows_negative_and_empty_description() {
        let expense = NewExpense::new("2024-01-01", "Refund", "", "-4")
            .validate()
            .unwrap();

        assert_eq!(expense.amount_cents, -400);
        assert!(expense.description.is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_amount() {
        let result = NewExpense::new("2024-01-01", "Food", "", "abc").validate();
        assert_eq!(result, Err(ValidationError::InvalidAmount("abc".into())));
    }

    #[test]
    fn test_validate_rejects_empty_category() {
        let result = NewExpense::new("2024-01-01", "", "", "1.00").validate();
        assert_eq!(result, Err(ValidationError::EmptyCategory));

        let result = NewExpense::new("2024-01-01", "   ", "", "1.00").validate();
        assert_eq!(result, Err(ValidationError::EmptyCategory));
    }

    #[test]
    fn test_amount_checked_before_category() {
        let result = NewExpense::new("2024-01-01", "", "", "abc").validate();
        assert!(matches!(result, Err(ValidationError::InvalidAmount(_))));
    }

    #[test]
    fn test_date_is_not_validated_on_write() {
        let expense = NewExpense::new("someday", "Food", "", "1").validate();
        assert!(expense.is_ok());
    }

    #[test]
    fn test_parse_calendar_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_calendar_date("2024-01-15"), Ok(expected));
        assert_eq!(parse_calendar_date("2024/01/15"), Ok(expected));
        assert_eq!(parse_calendar_date("2024-01-15 18:30:00"), Ok(expected));
        assert_eq!(parse_calendar_date("2024-01-15T23:59:00+02:00"), Ok(expected));
        assert!(parse_calendar_date("2024-02-30").is_err());
        assert!(parse_calendar_date("yesterday").is_err());
    }
}
