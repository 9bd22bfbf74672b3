//! Cycle display formatting
//!
//! Summary card of a single cycle and the table of past cycles.

use tabled::Tabled;

use crate::reports::CycleSummary;

use super::report::{format_alert, format_bar, format_percentage};
use super::table::render_table;

/// Summary card: period, amounts, usage bar and alert
pub fn format_cycle_summary(summary: &CycleSummary, currency: &str) -> String {
    let cycle = &summary.cycle;
    let mut output = String::new();

    let status = if cycle.is_open() { "open" } else { "closed" };
    output.push_str(&format!("Cycle {} ({})\n", cycle.id, status));
    output.push_str(&format!("  Period:   {}\n", cycle.period_label()));
    output.push_str(&format!(
        "  Opening:  {:>14}\n",
        cycle.amount.format_with_symbol(currency)
    ));
    output.push_str(&format!(
        "  Incomes:  {:>14}\n",
        summary.totals.income.format_with_symbol(currency)
    ));
    output.push_str(&format!(
        "  Expenses: {:>14}\n",
        summary.totals.expense.format_with_symbol(currency)
    ));
    output.push_str(&format!(
        "  Balance:  {:>14}\n",
        summary.balance.format_with_symbol(currency)
    ));

    let percent = summary.percentage_used * 100.0;
    output.push_str(&format!(
        "  Used:     {} {}\n",
        format_bar(summary.percentage_used, 1.0, 20),
        format_percentage(percent)
    ));

    if let Some(alert) = format_alert(&summary.alert) {
        output.push('\n');
        output.push_str(&alert);
        output.push('\n');
    }

    output
}

#[derive(Tabled)]
struct CycleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Opening")]
    opening: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Used")]
    used: String,
}

/// Table of cycles, in the order given
pub fn format_cycle_history(summaries: &[CycleSummary], currency: &str) -> String {
    if summaries.is_empty() {
        return "No budget cycles yet. Start one with 'pecule cycle start'.\n".to_string();
    }

    render_table(summaries.iter().map(|s| CycleRow {
        id: s.cycle.id.to_string(),
        period: s.cycle.period_label(),
        opening: s.cycle.amount.format_with_symbol(currency),
        balance: s.balance.format_with_symbol(currency),
        used: format_percentage(s.percentage_used * 100.0),
    }))
}
