//! Output formatting utilities.

use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

/// Prints rows as a rounded table under a header.
pub fn print_table<T: Tabled>(title: &str, rows: &[T]) {
    print_header(title);
    if rows.is_empty() {
        println!("No results.");
        return;
    }
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string();
    println!("{table}");
}

/// Prints a value as pretty JSON.
pub fn print_json<T: Serialize>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Prints a section header.
pub fn print_header(title: &str) {
    println!();
    println!("{title}");
    println!("{}", "─".repeat(title.chars().count()));
}

/// Formats a rate as a percentage with four decimals.
pub fn format_percent(value: f64) -> String {
    format!("{:.4}%", value * 100.0)
}

/// Formats a residual in scientific notation.
pub fn format_residual(value: f64) -> String {
    format!("{value:.3e}")
}
