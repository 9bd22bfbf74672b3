//! Income CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::entry::format_income_list;
use crate::error::{PeculeError, PeculeResult};
use crate::services::{CycleService, IncomeService, IncomeUpdate, NewIncome};
use crate::storage::Storage;

use super::{parse_amount_arg, parse_date_arg, today_string};

/// Income subcommands
#[derive(Subcommand)]
pub enum IncomeCommands {
    /// Record an income
    Add {
        /// Label (e.g. "Salaire")
        label: String,
        /// Amount (e.g. "2500" or "2500,00")
        amount: String,
        /// Date (YYYY-MM-DD or DD/MM/YYYY, default: today)
        #[arg(short, long)]
        date: Option<String>,
        /// Carry this income into the next cycle
        #[arg(short, long)]
        fixed: bool,
        /// Cycle ID (default: the open cycle)
        #[arg(long)]
        cycle: Option<String>,
    },

    /// List the incomes of a cycle
    List {
        /// Cycle ID (default: the open cycle)
        #[arg(long)]
        cycle: Option<String>,
    },

    /// Edit an income
    Edit {
        /// Income ID
        income: String,
        #[arg(short, long)]
        label: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        /// Mark as fixed (true) or variable (false)
        #[arg(long)]
        fixed: Option<bool>,
    },

    /// Delete an income
    Delete {
        /// Income ID
        income: String,
    },
}

/// Handle an income command
pub fn handle_income_command(
    storage: &Storage,
    settings: &Settings,
    cmd: IncomeCommands,
) -> PeculeResult<()> {
    let service = IncomeService::new(storage);
    let cycles = CycleService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        IncomeCommands::Add {
            label,
            amount,
            date,
            fixed,
            cycle,
        } => {
            let cycle = cycles.resolve(cycle.as_deref())?;
            let date = date.unwrap_or_else(today_string);

            let input = NewIncome::from_form(&label, &amount, &date, fixed)?;
            let income = service.add(cycle.id, input)?;

            println!(
                "Recorded income: {} {}",
                income.label,
                income.amount.format_with_symbol(currency)
            );
            println!("  ID: {}", income.id);
        }

        IncomeCommands::List { cycle } => {
            let cycle = cycles.resolve(cycle.as_deref())?;
            let incomes = service.list(cycle.id)?;

            println!("Incomes, cycle {} ({})", cycle.id, cycle.period_label());
            print!("{}", format_income_list(&incomes, currency));
        }

        IncomeCommands::Edit {
            income,
            label,
            amount,
            date,
            fixed,
        } => {
            let existing = service
                .find(&income)?
                .ok_or_else(|| PeculeError::income_not_found(&income))?;

            if label.is_none() && amount.is_none() && date.is_none() && fixed.is_none() {
                println!("No changes specified. Use --label, --amount, --date or --fixed.");
                return Ok(());
            }

            let changes = IncomeUpdate {
                label,
                amount: amount.as_deref().map(parse_amount_arg).transpose()?,
                date: date
                    .as_deref()
                    .map(|d| parse_date_arg(Some(d)))
                    .transpose()?,
                is_fixed: fixed,
            };

            let updated = service.update(existing.id, changes)?;
            println!(
                "Updated income: {} {}",
                updated.label,
                updated.amount.format_with_symbol(currency)
            );
        }

        IncomeCommands::Delete { income } => {
            let existing = service
                .find(&income)?
                .ok_or_else(|| PeculeError::income_not_found(&income))?;

            let deleted = service.delete(existing.id)?;
            println!("Deleted income: {}", deleted.label);
        }
    }

    Ok(())
}
