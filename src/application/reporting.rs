use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{by_category, by_date, count_by_category, total, Cents, Expense, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub total: Cents,
    pub count: usize,
    pub categories: Vec<CategorySummary>,
    pub days: Vec<DailySummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: Cents,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total: Cents,
}

impl SummaryReport {
    /// Build the spending summary for a table.
    /// Fails if any record's date is not a calendar date.
    pub fn build(expenses: &[Expense]) -> Result<Self, ValidationError> {
        let grand_total = total(expenses);
        let counts = count_by_category(expenses);

        let mut categories: Vec<CategorySummary> = by_category(expenses)
            .into_iter()
            .map(|(category, cat_total)| {
                let count = counts.get(&category).copied().unwrap_or(0);
                CategorySummary {
                    percentage: percentage_of(cat_total, grand_total),
                    category,
                    total: cat_total,
                    count,
                }
            })
            .collect();
        // Biggest spenders first; by_category already gives name order for ties
        categories.sort_by(|a, b| b.total.cmp(&a.total));

        let days = by_date(expenses)?
            .into_iter()
            .map(|(date, total)| DailySummary { date, total })
            .collect();

        Ok(Self {
            total: grand_total,
            count: expenses.len(),
            categories,
            days,
        })
    }
}

fn percentage_of(part: Cents, whole: Cents) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
