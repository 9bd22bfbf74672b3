//! Display formatting for terminal output
//!
//! Formats cycles, entries, categories and reports for the terminal.

pub mod category;
pub mod cycle;
pub mod entry;
pub mod report;
pub mod table;

pub use category::{format_category_details, format_category_list};
pub use cycle::{format_cycle_history, format_cycle_summary};
pub use entry::{format_expense_list, format_income_list};
pub use report::{format_alert, format_history, format_money_colored, format_spending};
pub use table::render_table;
