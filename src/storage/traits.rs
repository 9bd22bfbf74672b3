//! Store interfaces used by the cycle rollover
//!
//! The rollover only needs a handful of operations from each store. Writing
//! it against these traits keeps it independent from the JSON repositories
//! and lets tests substitute stores that fail on demand.

use crate::error::PeculeResult;
use crate::models::{BudgetCycle, CycleEntry, CycleId};

/// Persisted list of budget cycles
pub trait CycleStore {
    /// Every cycle whose end date is unset
    fn open_cycles(&self) -> PeculeResult<Vec<BudgetCycle>>;

    fn get(&self, id: CycleId) -> PeculeResult<Option<BudgetCycle>>;

    fn insert(&self, cycle: BudgetCycle) -> PeculeResult<()>;

    /// Replace an existing cycle
    fn update(&self, cycle: BudgetCycle) -> PeculeResult<()>;
}

/// Persisted list of expenses or incomes
pub trait EntryStore<T: CycleEntry> {
    /// Entries owned by a cycle, oldest first
    fn by_cycle(&self, cycle_id: CycleId) -> PeculeResult<Vec<T>>;

    fn insert(&self, entry: T) -> PeculeResult<()>;
}
