//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod category;
pub mod cycle;
pub mod expense;
pub mod export;
pub mod income;
pub mod report;
pub mod settings;

pub use backup::{handle_backup_command, BackupCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use cycle::{handle_cycle_command, CycleCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportCommands};
pub use income::{handle_income_command, IncomeCommands};
pub use report::{handle_report_command, ReportCommands};
pub use settings::{handle_settings_command, SettingsCommands};

use chrono::{Local, NaiveDate};

use crate::error::{PeculeError, PeculeResult};
use crate::models::Money;
use crate::services::validation::{parse_amount, parse_date};

/// Today's date in the form the entry forms expect
pub(crate) fn today_string() -> String {
    Local::now().date_naive().format("%d/%m/%Y").to_string()
}

/// Parse an amount argument, rejecting negative values
pub(crate) fn parse_amount_arg(input: &str) -> PeculeResult<Money> {
    let amount = parse_amount(input)
        .ok_or_else(|| PeculeError::Validation(format!("Invalid amount: {}", input)))?;
    if amount.is_negative() {
        return Err(PeculeError::Validation("Amount cannot be negative".into()));
    }
    Ok(amount)
}

/// Parse an optional date argument, defaulting to today
pub(crate) fn parse_date_arg(input: Option<&str>) -> PeculeResult<NaiveDate> {
    match input {
        Some(s) => parse_date(s)
            .ok_or_else(|| PeculeError::Validation(format!("Invalid date: {}", s))),
        None => Ok(Local::now().date_naive()),
    }
}
