//! Read-side calculations for Pécule
//!
//! - `balance`: balance, usage ratio, running-balance history and per
//!   category spending of a cycle
//! - `alert`: budget usage classification

pub mod alert;
pub mod balance;

pub use alert::{AlertLevel, BudgetAlert};
pub use balance::{
    balance, history, percentage_used, spending_by_category, totals, CategorySpending,
    CycleSummary, HistoryPoint, Totals, UNCATEGORIZED_NAME,
};
