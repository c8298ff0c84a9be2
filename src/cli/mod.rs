use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};

use crate::application::{ExpenseService, SummaryReport};
use crate::domain::{format_cents, parse_calendar_date, Cents, NewExpense};
use crate::io::{ExportFormat, ImportOptions};

/// Spendlog - Personal Expense Ledger
#[derive(Parser)]
#[command(name = "spendlog")]
#[command(about = "Record personal expenses in a CSV file and see where the money goes")]
#[command(version)]
pub struct Cli {
    /// Ledger file path
    #[arg(short, long, env = "SPENDLOG_FILE", default_value = "expenses.csv", global = true)]
    pub file: PathBuf,

    /// Currency symbol used when displaying amounts
    #[arg(long, env = "SPENDLOG_CURRENCY", default_value = "₹", global = true)]
    pub currency: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the ledger file if it doesn't exist
    Init,

    /// Record an expense
    Add {
        /// Amount spent (e.g., "12.50", "12", or "-5" for a refund)
        #[arg(allow_negative_numbers = true)]
        amount: String,

        /// Category (e.g., "Food", "Transport")
        #[arg(short, long)]
        category: String,

        /// Description of the expense
        #[arg(short, long, default_value = "")]
        description: String,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List all recorded expenses
    List,

    /// Show the total amount spent
    Total,

    /// Spending breakdown by category and by day
    Summary {
        /// Output format
        #[arg(long, value_enum, default_value_t = SummaryFormat::Table)]
        format: SummaryFormat,
    },

    /// Delete every recorded expense
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Export expenses to CSV or a spreadsheet
    Export {
        /// Destination file
        output: PathBuf,

        /// Format: csv, spreadsheet (default: from the file extension)
        #[arg(long)]
        format: Option<String>,
    },

    /// Import expenses from a CSV file
    Import {
        /// Input file with Date, Category, Description and Amount columns
        input: PathBuf,

        /// Validate without importing
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    Table,
    Json,
    Csv,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let service = ExpenseService::open(&self.file)
            .with_context(|| format!("Failed to open ledger: {}", self.file.display()))?;
        let currency = self.currency.as_str();

        match self.command {
            Commands::Init => {
                println!("Ledger ready: {}", service.path().display());
            }

            Commands::Add {
                amount,
                category,
                description,
                date,
            } => {
                run_add_command(&service, currency, amount, category, description, date)?;
            }

            Commands::List => run_list_command(&service, currency)?,

            Commands::Total => {
                let total = service.total()?;
                println!("Total Spend: {}", money(currency, total));
            }

            Commands::Summary { format } => {
                run_summary_command(&service, currency, format, &mut io::stdout().lock())?;
            }

            Commands::Clear { yes } => {
                run_clear_command(
                    &service,
                    yes,
                    &mut io::stdin().lock(),
                    &mut io::stdout().lock(),
                )?;
            }

            Commands::Export { output, format } => {
                run_export_command(
                    &service,
                    &output,
                    format.as_deref(),
                    &mut io::stdout().lock(),
                )?;
            }

            Commands::Import { input, dry_run } => {
                run_import_command(&service, &input, dry_run)?;
            }
        }

        Ok(())
    }
}

fn run_add_command(
    service: &ExpenseService,
    currency: &str,
    amount: String,
    category: String,
    description: String,
    date: Option<String>,
) -> Result<()> {
    // The CLI stands in for a date picker, so it only hands over real dates
    let date = match date {
        Some(date_str) => parse_calendar_date(&date_str)
            .context("Date must be in YYYY-MM-DD format")?
            .format("%Y-%m-%d")
            .to_string(),
        None => Local::now().date_naive().format("%Y-%m-%d").to_string(),
    };

    let expense = service.add_expense(NewExpense {
        date,
        category,
        description,
        amount,
    })?;

    println!("Expense added successfully.");
    println!(
        "  {} {} {}",
        expense.date,
        expense.category,
        money(currency, expense.amount_cents)
    );
    println!("Total Spend: {}", money(currency, service.total()?));
    Ok(())
}

fn run_list_command(service: &ExpenseService, currency: &str) -> Result<()> {
    let expenses = service.list_expenses()?;
    if expenses.is_empty() {
        println!("No expenses recorded.");
        return Ok(());
    }

    println!(
        "{:<12} {:<16} {:<30} {:>12}",
        "DATE", "CATEGORY", "DESCRIPTION", "AMOUNT"
    );
    println!("{}", "-".repeat(73));
    for expense in &expenses {
        println!(
            "{:<12} {:<16} {:<30} {:>12}",
            truncate(&expense.date, 12),
            truncate(&expense.category, 16),
            truncate(&expense.description, 30),
            money(currency, expense.amount_cents)
        );
    }
    println!("{}", "-".repeat(73));
    println!(
        "Total Spend: {}",
        money(currency, crate::domain::total(&expenses))
    );
    Ok(())
}

fn run_summary_command(
    service: &ExpenseService,
    currency: &str,
    format: SummaryFormat,
    out: &mut dyn Write,
) -> Result<()> {
    if service.list_expenses()?.is_empty() {
        writeln!(out, "No expenses to display.")?;
        return Ok(());
    }

    let report = service.summary()?;

    match format {
        SummaryFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
        SummaryFormat::Csv => write_summary_csv(out, &report)?,
        SummaryFormat::Table => write_summary_table(out, &report, currency)?,
    }

    Ok(())
}

/// One row per category, then one per day; day rows leave count and percentage empty.
fn write_summary_csv<W: Write>(writer: W, report: &SummaryReport) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["section", "key", "total", "count", "percentage"])?;
    for cat in &report.categories {
        csv_writer.write_record([
            "category".to_string(),
            cat.category.clone(),
            format_cents(cat.total),
            cat.count.to_string(),
            format!("{:.2}", cat.percentage),
        ])?;
    }
    for day in &report.days {
        csv_writer.write_record([
            "day".to_string(),
            day.date.format("%Y-%m-%d").to_string(),
            format_cents(day.total),
            String::new(),
            String::new(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

fn write_summary_table(out: &mut dyn Write, report: &SummaryReport, currency: &str) -> Result<()> {
    const BAR_WIDTH: usize = 30;

    writeln!(out, "Spending by Category")?;
    writeln!(out)?;
    writeln!(
        out,
        "{:<20} {:>12} {:>6} {:>8}",
        "CATEGORY", "TOTAL", "COUNT", "PERCENT"
    )?;
    writeln!(out, "{}", "-".repeat(50 + BAR_WIDTH))?;
    for cat in &report.categories {
        let width = (cat.percentage.clamp(0.0, 100.0) / 100.0 * BAR_WIDTH as f64).round() as usize;
        writeln!(
            out,
            "{:<20} {:>12} {:>6} {:>7.1}% {}",
            truncate(&cat.category, 20),
            money(currency, cat.total),
            cat.count,
            cat.percentage,
            "#".repeat(width)
        )?;
    }
    writeln!(out, "{}", "-".repeat(50 + BAR_WIDTH))?;
    writeln!(out, "{:<20} {:>12}", "TOTAL", money(currency, report.total))?;

    writeln!(out)?;
    writeln!(out, "Daily Spending")?;
    writeln!(out)?;
    let max = report
        .days
        .iter()
        .map(|d| d.total.unsigned_abs())
        .max()
        .unwrap_or(0);
    for day in &report.days {
        let width = if max == 0 {
            0
        } else {
            (day.total.unsigned_abs() as f64 / max as f64 * BAR_WIDTH as f64).round() as usize
        };
        writeln!(
            out,
            "{:<12} {:>12} {}",
            day.date.format("%Y-%m-%d"),
            money(currency, day.total),
            "#".repeat(width)
        )?;
    }

    Ok(())
}

fn run_clear_command(
    service: &ExpenseService,
    yes: bool,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    if !yes && !confirm("Are you sure you want to delete all expenses?", input, out)? {
        writeln!(out, "Nothing deleted.")?;
        return Ok(());
    }

    service.clear_all()?;
    writeln!(out, "All expenses have been cleared.")?;
    Ok(())
}

fn run_export_command(
    service: &ExpenseService,
    output: &Path,
    format: Option<&str>,
    out: &mut dyn Write,
) -> Result<()> {
    let format = match format {
        Some(name) => name.parse::<ExportFormat>()?,
        None => ExportFormat::from_path(output),
    };

    if service.list_expenses()?.is_empty() {
        writeln!(out, "No data available to export.")?;
        return Ok(());
    }

    let count = service.export(output, format)?;
    writeln!(
        out,
        "Exported {} expenses to {} ({})",
        count,
        output.display(),
        format
    )?;
    Ok(())
}

fn run_import_command(service: &ExpenseService, input: &Path, dry_run: bool) -> Result<()> {
    let result = service.import_file(input, ImportOptions { dry_run })?;

    // Display results
    if dry_run {
        println!("Validation complete (nothing written)");
    } else {
        println!("Import complete");
    }
    println!("  Imported: {}", result.imported);
    println!("  Errors:   {}", result.errors.len());

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for error in result.errors.iter().take(10) {
            println!(
                "  Line {}: {}{}",
                error.line,
                error
                    .field
                    .as_ref()
                    .map(|f| format!("{}: ", f))
                    .unwrap_or_default(),
                error.error
            );
        }
        if result.errors.len() > 10 {
            println!("  ... and {} more errors", result.errors.len() - 10);
        }
    }

    Ok(())
}

fn confirm(question: &str, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<bool> {
    write!(out, "{} [y/N] ", question)?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn money(currency: &str, cents: Cents) -> String {
    format!("{}{}", currency, format_cents(cents))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
