//! Expense CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::entry::format_expense_list;
use crate::error::{PeculeError, PeculeResult};
use crate::models::CategoryId;
use crate::services::{CategoryService, CycleService, ExpenseService, ExpenseUpdate, NewExpense};
use crate::storage::Storage;

use super::{parse_amount_arg, parse_date_arg, today_string};

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// Label (e.g. "Courses")
        label: String,
        /// Amount (e.g. "12.50" or "12,50")
        amount: String,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Date (YYYY-MM-DD or DD/MM/YYYY, default: today)
        #[arg(short, long)]
        date: Option<String>,
        /// Carry this expense into the next cycle
        #[arg(short, long)]
        fixed: bool,
        /// Cycle ID (default: the open cycle)
        #[arg(long)]
        cycle: Option<String>,
    },

    /// List the expenses of a cycle
    List {
        /// Cycle ID (default: the open cycle)
        #[arg(long)]
        cycle: Option<String>,
    },

    /// Edit an expense
    Edit {
        /// Expense ID
        expense: String,
        #[arg(short, long)]
        label: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Remove the category
        #[arg(long, conflicts_with = "category")]
        no_category: bool,
        #[arg(short, long)]
        date: Option<String>,
        /// Mark as fixed (true) or variable (false)
        #[arg(long)]
        fixed: Option<bool>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        expense: String,
    },
}

fn resolve_category(storage: &Storage, category: &str) -> PeculeResult<CategoryId> {
    CategoryService::new(storage)
        .find(category)?
        .map(|c| c.id)
        .ok_or_else(|| PeculeError::category_not_found(category))
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> PeculeResult<()> {
    let service = ExpenseService::new(storage);
    let cycles = CycleService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            label,
            amount,
            category,
            date,
            fixed,
            cycle,
        } => {
            let cycle = cycles.resolve(cycle.as_deref())?;
            let category_id = category
                .as_deref()
                .map(|c| resolve_category(storage, c))
                .transpose()?;
            let date = date.unwrap_or_else(today_string);

            let input = NewExpense::from_form(&label, &amount, &date, category_id, fixed)?;
            let expense = service.add(cycle.id, input)?;

            println!(
                "Recorded expense: {} {}",
                expense.label,
                expense.amount.format_with_symbol(currency)
            );
            println!("  ID: {}", expense.id);
        }

        ExpenseCommands::List { cycle } => {
            let cycle = cycles.resolve(cycle.as_deref())?;
            let expenses = service.list(cycle.id)?;
            let names = storage.categories.names()?;

            println!("Expenses, cycle {} ({})", cycle.id, cycle.period_label());
            print!("{}", format_expense_list(&expenses, &names, currency));
        }

        ExpenseCommands::Edit {
            expense,
            label,
            amount,
            category,
            no_category,
            date,
            fixed,
        } => {
            let existing = service
                .find(&expense)?
                .ok_or_else(|| PeculeError::expense_not_found(&expense))?;

            let category_id = if no_category {
                Some(None)
            } else {
                category
                    .as_deref()
                    .map(|c| resolve_category(storage, c).map(Some))
                    .transpose()?
            };

            let changes = ExpenseUpdate {
                label,
                amount: amount.as_deref().map(parse_amount_arg).transpose()?,
                date: date
                    .as_deref()
                    .map(|d| parse_date_arg(Some(d)))
                    .transpose()?,
                category_id,
                is_fixed: fixed,
            };

            let updated = service.update(existing.id, changes)?;
            println!(
                "Updated expense: {} {}",
                updated.label,
                updated.amount.format_with_symbol(currency)
            );
        }

        ExpenseCommands::Delete { expense } => {
            let existing = service
                .find(&expense)?
                .ok_or_else(|| PeculeError::expense_not_found(&expense))?;

            let deleted = service.delete(existing.id)?;
            println!("Deleted expense: {}", deleted.label);
        }
    }

    Ok(())
}
