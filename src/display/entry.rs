//! Expense and income display formatting

use std::collections::HashMap;

use tabled::Tabled;

use crate::models::{CategoryId, Expense, Income, Money};
use crate::reports::UNCATEGORIZED_NAME;

use super::table::render_table;

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Fixed")]
    fixed: &'static str,
}

#[derive(Tabled)]
struct IncomeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Fixed")]
    fixed: &'static str,
}

fn fixed_marker(is_fixed: bool) -> &'static str {
    if is_fixed {
        "yes"
    } else {
        ""
    }
}

/// Format expenses as a table, resolving category names
pub fn format_expense_list(
    expenses: &[Expense],
    category_names: &HashMap<CategoryId, String>,
    currency: &str,
) -> String {
    if expenses.is_empty() {
        return "No expenses in this cycle.\n".to_string();
    }

    let total: Money = expenses.iter().map(|e| e.amount).sum();

    let mut output = render_table(expenses.iter().map(|e| ExpenseRow {
        id: e.id.to_string(),
        date: e.date.format("%d/%m/%Y").to_string(),
        label: e.label.clone(),
        category: e
            .category_id
            .and_then(|id| category_names.get(&id).cloned())
            .unwrap_or_else(|| UNCATEGORIZED_NAME.to_string()),
        amount: e.amount.format_with_symbol(currency),
        fixed: fixed_marker(e.is_fixed),
    }));

    output.push_str(&format!(
        "{} expense(s), total {}\n",
        expenses.len(),
        total.format_with_symbol(currency)
    ));
    output
}

/// Format incomes as a table
pub fn format_income_list(incomes: &[Income], currency: &str) -> String {
    if incomes.is_empty() {
        return "No incomes in this cycle.\n".to_string();
    }

    let total: Money = incomes.iter().map(|i| i.amount).sum();

    let mut output = render_table(incomes.iter().map(|i| IncomeRow {
        id: i.id.to_string(),
        date: i.date.format("%d/%m/%Y").to_string(),
        label: i.label.clone(),
        amount: i.amount.format_with_symbol(currency),
        fixed: fixed_marker(i.is_fixed),
    }));

    output.push_str(&format!(
        "{} income(s), total {}\n",
        incomes.len(),
        total.format_with_symbol(currency)
    ));
    output
}
