use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::{Cents, Expense, ValidationError};

/// Sum of all amounts. An empty table totals zero.
pub fn total(expenses: &[Expense]) -> Cents {
    expenses.iter().map(|e| e.amount_cents).sum()
}

/// Sum of amounts per category.
/// Returns a map of category -> total, ordered by category name.
pub fn by_category(expenses: &[Expense]) -> BTreeMap<String, Cents> {
    let mut totals: BTreeMap<String, Cents> = BTreeMap::new();

    for expense in expenses {
        *totals.entry(expense.category.clone()).or_insert(0) += expense.amount_cents;
    }

    totals
}

/// Number of records per category.
pub fn count_by_category(expenses: &[Expense]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for expense in expenses {
        *counts.entry(expense.category.clone()).or_insert(0) += 1;
    }

    counts
}

/// Sum of amounts per calendar date.
///
/// Every record's date must parse; the first one that doesn't fails the
/// whole view. `total` and `by_category` have no such requirement.
pub fn by_date(expenses: &[Expense]) -> Result<BTreeMap<NaiveDate, Cents>, ValidationError> {
    let mut totals: BTreeMap<NaiveDate, Cents> = BTreeMap::new();

    for expense in expenses {
        let date = expense.calendar_date()?;
        *totals.entry(date).or_insert(0) += expense.amount_cents;
    }

    Ok(totals)
}
