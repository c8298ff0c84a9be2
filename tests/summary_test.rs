mod common;

use anyhow::Result;
use chrono::NaiveDate;
use common::{new_expense, test_service, SampleLedger};
use spendlog::application::AppError;
use spendlog::domain::{by_category, by_date, total, Cents, ValidationError};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_lunch_and_bus_scenario() -> Result<()> {
    let (service, _temp) = test_service()?;

    service.add_expense(new_expense("2024-01-01", "Food", "Lunch", "12.50"))?;
    service.add_expense(new_expense("2024-01-01", "Transport", "Bus", "2.00"))?;

    assert_eq!(service.total()?, 1450);

    let categories = service.category_totals()?;
    assert_eq!(categories.len(), 2);
    assert_eq!(categories.get("Food"), Some(&1250));
    assert_eq!(categories.get("Transport"), Some(&200));

    let days = service.daily_totals()?;
    assert_eq!(days.len(), 1);
    assert_eq!(days.get(&date("2024-01-01")), Some(&1450));

    Ok(())
}

#[test]
fn test_total_of_empty_ledger_is_zero() -> Result<()> {
    let (service, _temp) = test_service()?;

    assert_eq!(service.total()?, 0);
    assert!(service.category_totals()?.is_empty());
    assert!(service.daily_totals()?.is_empty());

    Ok(())
}

#[test]
fn test_groups_sum_to_total() -> Result<()> {
    let (service, _temp) = test_service()?;
    let stored = SampleLedger::populate(&service)?;

    // 12.50 + 2.00 + 45.30 + 800 - 5.00
    let expected: Cents = 85480;
    assert_eq!(total(&stored), expected);
    assert_eq!(service.total()?, expected);

    let category_sum: Cents = service.category_totals()?.values().sum();
    let date_sum: Cents = service.daily_totals()?.values().sum();
    assert_eq!(category_sum, expected);
    assert_eq!(date_sum, expected);

    // Same answers from the pure functions over the loaded table
    let table = service.list_expenses()?;
    assert_eq!(by_category(&table), service.category_totals()?);
    assert_eq!(by_date(&table)?, service.daily_totals()?);

    Ok(())
}

#[test]
fn test_negative_amounts_reduce_totals() -> Result<()> {
    let (service, _temp) = test_service()?;
    SampleLedger::populate(&service)?;

    let categories = service.category_totals()?;
    assert_eq!(categories.get("Food"), Some(&5280)); // 12.50 + 45.30 - 5.00

    let days = service.daily_totals()?;
    assert_eq!(days.get(&date("2024-01-03")), Some(&-500));

    Ok(())
}

#[test]
fn test_unparseable_date_only_breaks_daily_view() -> Result<()> {
    let (service, _temp) = test_service()?;
    service.add_expense(new_expense("2024-01-01", "Food", "", "10"))?;
    service.add_expense(new_expense("last tuesday", "Food", "", "5"))?;

    // The store accepts any date text
    assert_eq!(service.list_expenses()?.len(), 2);
    assert_eq!(service.total()?, 1500);
    assert_eq!(service.category_totals()?.get("Food"), Some(&1500));

    let err = service.daily_totals().unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::InvalidDate(ref d)) if d == "last tuesday"
    ));
    assert!(service.summary().unwrap_err().is_validation());

    Ok(())
}

#[test]
fn test_summary_report() -> Result<()> {
    let (service, _temp) = test_service()?;
    SampleLedger::populate(&service)?;

    let report = service.summary()?;

    assert_eq!(report.total, 85480);
    assert_eq!(report.count, 5);

    // Ordered by total, descending
    let names: Vec<_> = report
        .categories
        .iter()
        .map(|c| c.category.as_str())
        .collect();
    assert_eq!(names, ["Rent", "Food", "Transport"]);

    let food = report
        .categories
        .iter()
        .find(|c| c.category == "Food")
        .unwrap();
    assert_eq!(food.total, 5280);
    assert_eq!(food.count, 3);

    let category_sum: Cents = report.categories.iter().map(|c| c.total).sum();
    assert_eq!(category_sum, report.total);

    let percentage_sum: f64 = report.categories.iter().map(|c| c.percentage).sum();
    assert!((percentage_sum - 100.0).abs() < 0.01);

    let days: Vec<_> = report.days.iter().map(|d| d.date).collect();
    assert_eq!(
        days,
        [date("2024-01-01"), date("2024-01-02"), date("2024-01-03")]
    );
    assert_eq!(report.days[1].total, 84530);

    Ok(())
}

#[test]
fn test_summary_serializes_to_json() -> Result<()> {
    let (service, _temp) = test_service()?;
    service.add_expense(new_expense("2024-01-01", "Food", "Lunch", "12.50"))?;

    let json = serde_json::to_value(service.summary()?)?;

    assert_eq!(json["total"], 1250);
    assert_eq!(json["categories"][0]["category"], "Food");
    assert_eq!(json["days"][0]["date"], "2024-01-01");

    Ok(())
}
