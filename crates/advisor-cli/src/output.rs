//! Output formatting utilities

use advisor_lib::ComplexityLevel;
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print rows as a rounded table
pub fn print_table<T: Tabled>(rows: &[T]) {
    if rows.is_empty() {
        println!("{}", "No items found".yellow());
        return;
    }
    println!("{}", Table::new(rows).with(Style::rounded()));
}

/// Print any value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a section heading with an underline
pub fn print_heading(title: &str, underline: char) {
    println!("{}", title.bold());
    println!("{}", underline.to_string().repeat(60));
}

/// Print a bulleted list under a heading
pub fn print_list(title: &str, items: &[String]) {
    print_heading(title, '-');
    for item in items {
        println!("  • {}", item);
    }
    println!();
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a dollar amount with two decimals
pub fn format_currency(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

/// Format megabytes as whole gigabytes
pub fn format_memory_mb(mb: u64) -> String {
    format!("{} GB", mb / 1024)
}

/// Color complexity based on level
pub fn color_complexity(level: ComplexityLevel) -> String {
    match level {
        ComplexityLevel::Medium => level.as_str().yellow().to_string(),
        ComplexityLevel::High => level.as_str().red().to_string(),
    }
}

/// File name for a saved analysis, `MigrationAnalysis_<Name>_<timestamp>.json`
pub fn analysis_file_name(application_name: &str, at: DateTime<Utc>) -> String {
    let name: String = application_name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    let name = if name.is_empty() { "Unnamed".to_string() } else { name };
    format!("MigrationAnalysis_{}_{}.json", name, at.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Decimal::new(71700, 2)), "$717.00");
        assert_eq!(format_currency(Decimal::new(875, 1)), "$87.50");
    }

    #[test]
    fn test_format_memory() {
        assert_eq!(format_memory_mb(40960), "40 GB");
        assert_eq!(format_memory_mb(1023), "0 GB");
    }

    #[test]
    fn test_analysis_file_name() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            analysis_file_name("Claims Portal", at),
            "MigrationAnalysis_Claims_Portal_20240309_140507.json"
        );
        assert_eq!(
            analysis_file_name("a/b\\c", at),
            "MigrationAnalysis_a_b_c_20240309_140507.json"
        );
        assert_eq!(
            analysis_file_name("  ", at),
            "MigrationAnalysis_Unnamed_20240309_140507.json"
        );
    }
}
