//! CLI commands for reports
//!
//! Balance, running-balance history and budget alert of a cycle.

use std::collections::HashMap;

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::report::{
    format_alert, format_history, format_money_colored, format_spending, separator,
};
use crate::error::PeculeResult;
use crate::reports::{history, spending_by_category, BudgetAlert, CycleSummary};
use crate::services::CycleService;
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Balance and spending by category
    Balance {
        /// Cycle ID (default: the open cycle)
        #[arg(long)]
        cycle: Option<String>,
    },

    /// Running balance, day by day
    History {
        /// Cycle ID (default: the open cycle)
        #[arg(long)]
        cycle: Option<String>,
    },

    /// Budget usage alert
    Alert {
        /// Cycle ID (default: the open cycle)
        #[arg(long)]
        cycle: Option<String>,
    },
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> PeculeResult<()> {
    let service = CycleService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        ReportCommands::Balance { cycle } => {
            let cycle = service.resolve(cycle.as_deref())?;
            let (expenses, incomes) = service.entries(cycle.id)?;
            let categories: HashMap<_, _> = storage
                .categories
                .get_all()?
                .into_iter()
                .map(|c| (c.id, c))
                .collect();

            let summary = CycleSummary::compute(cycle.clone(), &expenses, &incomes);

            println!("Balance, {}", cycle.period_label());
            println!("{}", separator(40));
            println!("Opening:  {}", cycle.amount.format_with_symbol(currency));
            println!("Incomes:  {}", summary.totals.income.format_with_symbol(currency));
            println!("Expenses: {}", summary.totals.expense.format_with_symbol(currency));
            println!("Balance:  {}", format_money_colored(summary.balance, currency));
            println!();
            print!(
                "{}",
                format_spending(&spending_by_category(&expenses, &categories), currency)
            );
        }

        ReportCommands::History { cycle } => {
            let cycle = service.resolve(cycle.as_deref())?;
            let (expenses, incomes) = service.entries(cycle.id)?;

            println!("Balance history, {}", cycle.period_label());
            println!("{}", separator(40));
            print!("{}", format_history(&history(&cycle, &expenses, &incomes), currency));
        }

        ReportCommands::Alert { cycle } => {
            let cycle = service.resolve(cycle.as_deref())?;
            let (expenses, incomes) = service.entries(cycle.id)?;
            let alert = BudgetAlert::for_cycle(&cycle, &expenses, &incomes);

            match format_alert(&alert) {
                Some(line) => println!("{}", line),
                None => println!(
                    "All good: {}% of your budget spent.",
                    alert.rounded_percent()
                ),
            }
        }
    }

    Ok(())
}
