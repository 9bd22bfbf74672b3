//! Service layer for Pécule
//!
//! Services sit on top of the storage layer: they validate input, persist
//! changes, record them in the audit log and notify feed subscribers.

pub mod category;
pub mod cycle;
pub mod expense;
pub mod income;
pub mod validation;

pub use category::CategoryService;
pub use cycle::{start_new_cycle, CycleService, RolloverOutcome};
pub use expense::{ExpenseService, ExpenseUpdate, NewExpense};
pub use income::{IncomeService, IncomeUpdate, NewIncome};
