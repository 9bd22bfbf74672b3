//! Cycle service
//!
//! Budget cycle lifecycle: opening a new cycle (rollover), reading the
//! current one and its history, editing the opening amount and deleting a
//! cycle together with its entries.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{PeculeError, PeculeResult};
use crate::models::{BudgetCycle, CycleEntry, CycleId, Expense, Income, Money};
use crate::reports::CycleSummary;
use crate::storage::{CycleStore, EntryStore, Storage, StoreEvent};

/// The cycle closed by a rollover, before and after closing
#[derive(Debug, Clone)]
pub struct ClosedCycle {
    pub before: BudgetCycle,
    pub after: BudgetCycle,
}

/// Everything a rollover wrote
#[derive(Debug, Clone)]
pub struct RolloverOutcome {
    pub cycle: BudgetCycle,
    pub closed: Option<ClosedCycle>,
    pub carried_expenses: Vec<Expense>,
    pub carried_incomes: Vec<Income>,
}

impl RolloverOutcome {
    pub fn cycle_id(&self) -> CycleId {
        self.cycle.id
    }
}

/// Close the open cycle (if any) and open a new one starting on `start_date`
///
/// The previous cycle ends the day before `start_date`. Fixed expenses and
/// incomes of the previous cycle are copied into the new one, dated on its
/// start date. Preconditions are checked before anything is written; once
/// writing starts, a store failure is returned as is and the steps already
/// persisted stay persisted.
pub fn start_new_cycle<C, E, I>(
    cycles: &C,
    expenses: &E,
    incomes: &I,
    amount: Money,
    start_date: NaiveDate,
) -> PeculeResult<RolloverOutcome>
where
    C: CycleStore + ?Sized,
    E: EntryStore<Expense> + ?Sized,
    I: EntryStore<Income> + ?Sized,
{
    if amount.is_negative() {
        return Err(PeculeError::Validation(
            "Opening amount cannot be negative".into(),
        ));
    }

    let mut open = cycles.open_cycles()?;
    if open.len() > 1 {
        return Err(PeculeError::Cycle(format!(
            "{} cycles are open at the same time; fix the data before starting a new one",
            open.len()
        )));
    }
    let previous = open.pop();

    let end_date = match &previous {
        Some(prev) => {
            if start_date <= prev.start_date {
                return Err(PeculeError::Cycle(format!(
                    "New cycle must start after the current one ({})",
                    prev.start_date.format("%d/%m/%Y")
                )));
            }
            start_date.pred_opt()
        }
        None => None,
    };

    let closed = match (previous, end_date) {
        (Some(before), Some(end)) => {
            let mut after = before.clone();
            after.close(end);
            cycles.update(after.clone())?;
            Some(ClosedCycle { before, after })
        }
        _ => None,
    };

    let cycle = BudgetCycle::new(amount, start_date);
    cycles.insert(cycle.clone())?;

    let (carried_expenses, carried_incomes) = match &closed {
        Some(closed) => (
            carry_fixed(expenses, closed.after.id, cycle.id, start_date)?,
            carry_fixed(incomes, closed.after.id, cycle.id, start_date)?,
        ),
        None => (Vec::new(), Vec::new()),
    };

    Ok(RolloverOutcome {
        cycle,
        closed,
        carried_expenses,
        carried_incomes,
    })
}

fn carry_fixed<T, S>(store: &S, from: CycleId, to: CycleId, date: NaiveDate) -> PeculeResult<Vec<T>>
where
    T: CycleEntry,
    S: EntryStore<T> + ?Sized,
{
    let mut carried = Vec::new();
    for entry in store.by_cycle(from)?.into_iter().filter(|e| e.is_fixed()) {
        let copy = entry.carry_forward(to, date);
        store.insert(copy.clone())?;
        carried.push(copy);
    }
    Ok(carried)
}

/// Result of deleting a cycle
#[derive(Debug, Clone)]
pub struct DeletedCycle {
    pub cycle: BudgetCycle,
    pub expenses_removed: usize,
    pub incomes_removed: usize,
}

/// Service for budget cycle management
pub struct CycleService<'a> {
    storage: &'a Storage,
}

impl<'a> CycleService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// The open cycle, if any
    pub fn current(&self) -> PeculeResult<Option<BudgetCycle>> {
        self.storage.cycles.current()
    }

    /// The open cycle, or an error telling the user to start one
    pub fn require_current(&self) -> PeculeResult<BudgetCycle> {
        self.current()?.ok_or_else(|| {
            PeculeError::Cycle("No budget cycle is open. Start one with `pecule cycle start`".into())
        })
    }

    pub fn get(&self, id: CycleId) -> PeculeResult<Option<BudgetCycle>> {
        self.storage.cycles.get(id)
    }

    /// Find a cycle by short or full ID
    pub fn find(&self, identifier: &str) -> PeculeResult<Option<BudgetCycle>> {
        self.storage.cycles.find(identifier)
    }

    /// Resolve an optional identifier, defaulting to the open cycle
    pub fn resolve(&self, identifier: Option<&str>) -> PeculeResult<BudgetCycle> {
        match identifier {
            Some(id) => self
                .find(id)?
                .ok_or_else(|| PeculeError::cycle_not_found(id)),
            None => self.require_current(),
        }
    }

    /// Every cycle, newest first
    pub fn history(&self) -> PeculeResult<Vec<BudgetCycle>> {
        self.storage.cycles.get_all()
    }

    /// Expenses and incomes of a cycle, oldest first
    pub fn entries(&self, id: CycleId) -> PeculeResult<(Vec<Expense>, Vec<Income>)> {
        Ok((
            self.storage.expenses.get_by_cycle(id)?,
            self.storage.incomes.get_by_cycle(id)?,
        ))
    }

    pub fn summary(&self, id: CycleId) -> PeculeResult<CycleSummary> {
        let cycle = self
            .get(id)?
            .ok_or_else(|| PeculeError::cycle_not_found(id.to_string()))?;
        let (expenses, incomes) = self.entries(id)?;
        Ok(CycleSummary::compute(cycle, &expenses, &incomes))
    }

    /// Open a new cycle, closing the current one and carrying its fixed
    /// entries forward
    pub fn start_new_cycle(&self, amount: Money, start_date: NaiveDate) -> PeculeResult<RolloverOutcome> {
        let outcome = start_new_cycle(
            &self.storage.cycles,
            &self.storage.expenses,
            &self.storage.incomes,
            amount,
            start_date,
        )?;

        if let Some(closed) = &outcome.closed {
            self.storage.log_update(
                EntityType::Cycle,
                closed.after.id.to_string(),
                Some(closed.after.period_label()),
                &closed.before,
                &closed.after,
            )?;
            self.storage.publish(StoreEvent::CycleClosed(closed.after.id));
        }

        self.storage.log_create(
            EntityType::Cycle,
            outcome.cycle.id.to_string(),
            Some(outcome.cycle.period_label()),
            &outcome.cycle,
        )?;
        self.storage.publish(StoreEvent::CycleOpened(outcome.cycle.id));

        for expense in &outcome.carried_expenses {
            self.storage.log_create(
                EntityType::Expense,
                expense.id.to_string(),
                Some(expense.label.clone()),
                expense,
            )?;
        }
        if !outcome.carried_expenses.is_empty() {
            self.storage.publish(StoreEvent::ExpensesChanged(outcome.cycle.id));
        }

        for income in &outcome.carried_incomes {
            self.storage.log_create(
                EntityType::Income,
                income.id.to_string(),
                Some(income.label.clone()),
                income,
            )?;
        }
        if !outcome.carried_incomes.is_empty() {
            self.storage.publish(StoreEvent::IncomesChanged(outcome.cycle.id));
        }

        Ok(outcome)
    }

    /// Change the opening amount of a cycle
    pub fn edit_amount(&self, id: CycleId, amount: Money) -> PeculeResult<BudgetCycle> {
        let mut cycle = self
            .get(id)?
            .ok_or_else(|| PeculeError::cycle_not_found(id.to_string()))?;
        let before = cycle.clone();

        cycle.set_amount(amount);
        cycle
            .validate()
            .map_err(|e| PeculeError::Validation(e.to_string()))?;

        self.storage.cycles.upsert(cycle.clone())?;
        self.storage.cycles.save()?;

        self.storage.log_update(
            EntityType::Cycle,
            cycle.id.to_string(),
            Some(cycle.period_label()),
            &before,
            &cycle,
        )?;
        self.storage.publish(StoreEvent::CycleUpdated(cycle.id));

        Ok(cycle)
    }

    /// Delete a cycle and every entry it owns
    pub fn delete(&self, id: CycleId) -> PeculeResult<DeletedCycle> {
        let cycle = self
            .get(id)?
            .ok_or_else(|| PeculeError::cycle_not_found(id.to_string()))?;

        let expenses = self.storage.expenses.delete_by_cycle(id)?;
        self.storage.expenses.save()?;
        let incomes = self.storage.incomes.delete_by_cycle(id)?;
        self.storage.incomes.save()?;

        self.storage.cycles.delete(id)?;
        self.storage.cycles.save()?;

        self.storage.log_delete(
            EntityType::Cycle,
            cycle.id.to_string(),
            Some(format!(
                "{} ({} expenses, {} incomes)",
                cycle.period_label(),
                expenses.len(),
                incomes.len()
            )),
            &cycle,
        )?;

        self.storage.publish(StoreEvent::CycleDeleted(id));
        if !expenses.is_empty() {
            self.storage.publish(StoreEvent::ExpensesChanged(id));
        }
        if !incomes.is_empty() {
            self.storage.publish(StoreEvent::IncomesChanged(id));
        }

        Ok(DeletedCycle {
            cycle,
            expenses_removed: expenses.len(),
            incomes_removed: incomes.len(),
        })
    }
}
