//! Cycle CLI commands
//!
//! Implements CLI commands for starting, inspecting and editing budget
//! cycles.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::cycle::{format_cycle_history, format_cycle_summary};
use crate::error::PeculeResult;
use crate::reports::CycleSummary;
use crate::services::CycleService;
use crate::storage::{Storage, StoreEvent};

use super::{parse_amount_arg, parse_date_arg};

/// Cycle subcommands
#[derive(Subcommand)]
pub enum CycleCommands {
    /// Show the open cycle
    Current,

    /// Close the open cycle and start a new one
    Start {
        /// Opening amount (e.g. "2500" or "2500,00")
        amount: String,
        /// Start date (YYYY-MM-DD or DD/MM/YYYY, default: today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List every cycle, newest first
    History,

    /// Show a cycle
    Show {
        /// Cycle ID (default: the open cycle)
        cycle: Option<String>,
    },

    /// Change the opening amount of a cycle
    Edit {
        /// New opening amount
        amount: String,
        /// Cycle ID (default: the open cycle)
        #[arg(short, long)]
        cycle: Option<String>,
    },

    /// Delete a cycle and all of its entries
    Delete {
        /// Cycle ID
        cycle: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a cycle command
pub fn handle_cycle_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CycleCommands,
) -> PeculeResult<()> {
    let service = CycleService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        CycleCommands::Current => {
            let cycle = service.require_current()?;
            println!("{}", settings.greeting());
            println!();
            print!("{}", format_cycle_summary(&service.summary(cycle.id)?, currency));
        }

        CycleCommands::Start { amount, date } => {
            let amount = parse_amount_arg(&amount)?;
            let start_date = parse_date_arg(date.as_deref())?;

            let changes = storage.subscribe();
            let outcome = service.start_new_cycle(amount, start_date)?;

            for event in changes.drain() {
                match event {
                    StoreEvent::CycleClosed(id) => match &outcome.closed {
                        Some(closed) => {
                            println!("Closed cycle {} ({})", id, closed.after.period_label())
                        }
                        None => println!("Closed cycle {}", id),
                    },
                    StoreEvent::CycleOpened(id) => println!("Started cycle {}", id),
                    _ => {}
                }
            }
            println!("  Opening: {}", outcome.cycle.amount.format_with_symbol(currency));
            println!("  Period:  {}", outcome.cycle.period_label());

            let carried = outcome.carried_expenses.len() + outcome.carried_incomes.len();
            if carried > 0 {
                println!(
                    "  Carried over {} fixed expense(s) and {} fixed income(s)",
                    outcome.carried_expenses.len(),
                    outcome.carried_incomes.len()
                );
            }
        }

        CycleCommands::History => {
            let summaries = service
                .history()?
                .into_iter()
                .map(|cycle| -> PeculeResult<CycleSummary> {
                    let (expenses, incomes) = service.entries(cycle.id)?;
                    Ok(CycleSummary::compute(cycle, &expenses, &incomes))
                })
                .collect::<PeculeResult<Vec<_>>>()?;
            print!("{}", format_cycle_history(&summaries, currency));
        }

        CycleCommands::Show { cycle } => {
            let cycle = service.resolve(cycle.as_deref())?;
            print!("{}", format_cycle_summary(&service.summary(cycle.id)?, currency));
        }

        CycleCommands::Edit { amount, cycle } => {
            let cycle = service.resolve(cycle.as_deref())?;
            let amount = parse_amount_arg(&amount)?;

            let updated = service.edit_amount(cycle.id, amount)?;
            println!(
                "Updated cycle {}: opening amount {} -> {}",
                updated.id,
                cycle.amount.format_with_symbol(currency),
                updated.amount.format_with_symbol(currency)
            );
        }

        CycleCommands::Delete { cycle, force } => {
            let cycle = service.resolve(Some(cycle.as_str()))?;
            let (expenses, incomes) = service.entries(cycle.id)?;

            if !force {
                println!(
                    "Cycle {} ({}) has {} expense(s) and {} income(s).",
                    cycle.id,
                    cycle.period_label(),
                    expenses.len(),
                    incomes.len()
                );
                println!("Deleting it removes all of them. Run again with --force to proceed.");
                return Ok(());
            }

            let deleted = service.delete(cycle.id)?;
            println!(
                "Deleted cycle {} ({} expense(s), {} income(s) removed)",
                deleted.cycle.id, deleted.expenses_removed, deleted.incomes_removed
            );
        }
    }

    Ok(())
}
