//! Report formatting utilities for terminal output
//!
//! Formatting helpers shared by the balance, history and alert reports.

use crate::models::Money;
use crate::reports::{AlertLevel, BudgetAlert, CategorySpending, HistoryPoint};

use super::table::render_table;

/// Format a money amount with color hints for terminal display
pub fn format_money_colored(amount: Money, currency: &str) -> String {
    let text = amount.format_with_symbol(currency);
    if amount.is_negative() {
        format!("\x1b[31m{}\x1b[0m", text) // Red for negative
    } else if amount.is_positive() {
        format!("\x1b[32m{}\x1b[0m", text) // Green for positive
    } else {
        text
    }
}

/// Format a percentage (0-100 scale) with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct < 0.1 && pct > 0.0 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return "░".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// One-line alert, or `None` below the warning threshold
pub fn format_alert(alert: &BudgetAlert) -> Option<String> {
    let icon = match alert.level {
        AlertLevel::None => return None,
        AlertLevel::Warning => "⚠",
        AlertLevel::Danger => "⛔",
        AlertLevel::Exceeded => "❗",
    };
    alert.message().map(|message| format!("{} {}", icon, message))
}

/// Running balance, one line per date, with a bar scaled to the peak
pub fn format_history(points: &[HistoryPoint], currency: &str) -> String {
    let peak = points
        .iter()
        .map(|p| p.balance.as_f64())
        .fold(0.0_f64, f64::max);

    let mut output = String::new();
    for point in points {
        output.push_str(&format!(
            "{}  {}  {:>14}\n",
            point.date.format("%d/%m/%Y"),
            format_bar(point.balance.as_f64(), peak, 20),
            point.balance.format_with_symbol(currency)
        ));
    }
    output
}

#[derive(tabled::Tabled)]
struct SpendingRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "Entries")]
    count: usize,
}

/// Expenses per category as a table
pub fn format_spending(rows: &[CategorySpending], currency: &str) -> String {
    if rows.is_empty() {
        return "No expenses in this cycle.\n".to_string();
    }

    render_table(rows.iter().map(|row| SpendingRow {
        category: row.name.clone(),
        amount: row.amount.format_with_symbol(currency),
        share: format_percentage(row.share * 100.0),
        count: row.count,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.05), "0.05%");
        assert_eq!(format_percentage(5.0), "5.0%");
        assert_eq!(format_percentage(52.4), "52%");
    }

    #[test]
    fn test_format_bar() {
        assert_eq!(format_bar(5.0, 10.0, 4), "██░░");
        assert_eq!(format_bar(20.0, 10.0, 4), "████");
        assert_eq!(format_bar(-1.0, 10.0, 2), "░░");
    }

    #[test]
    fn test_format_alert() {
        assert!(format_alert(&BudgetAlert::classify(10.0)).is_none());
        let line = format_alert(&BudgetAlert::classify(85.0)).unwrap();
        assert!(line.contains("85%"));
    }

    #[test]
    fn test_format_history() {
        let points = vec![
            HistoryPoint {
                date: NaiveDate::from_ymd_opt(2025, 1, 25).unwrap(),
                balance: Money::from_cents(250000),
            },
            HistoryPoint {
                date: NaiveDate::from_ymd_opt(2025, 1, 26).unwrap(),
                balance: Money::from_cents(240000),
            },
        ];
        let output = format_history(&points, "€");
        assert_eq!(output.lines().count(), 2);
        assert!(output.contains("25/01/2025"));
        assert!(output.contains("2400.00 €"));
    }
}
