//! Core data models for Pécule
//!
//! Budget cycles, the expenses and incomes they own, and the categories
//! expenses are filed under.

pub mod category;
pub mod cycle;
pub mod entry;
pub mod expense;
pub mod ids;
pub mod income;
pub mod money;

pub use category::{Category, DefaultCategory};
pub use cycle::BudgetCycle;
pub use entry::{CycleEntry, EntryKind};
pub use expense::Expense;
pub use ids::{CategoryId, CycleId, ExpenseId, IncomeId};
pub use income::Income;
pub use money::Money;
