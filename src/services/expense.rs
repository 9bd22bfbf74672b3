//! Expense service
//!
//! Recording, editing and deleting the expenses of a cycle.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{PeculeError, PeculeResult};
use crate::models::{CategoryId, CycleEntry, CycleId, Expense, ExpenseId, Money};
use crate::storage::{Storage, StoreEvent};

use super::validation::{parse_amount, parse_date, validate_entry};

/// Fields of a new expense
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub label: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub category_id: Option<CategoryId>,
    pub is_fixed: bool,
}

impl NewExpense {
    /// Build from raw form input, collecting every validation problem
    pub fn from_form(
        label: &str,
        amount: &str,
        date: &str,
        category_id: Option<CategoryId>,
        is_fixed: bool,
    ) -> PeculeResult<Self> {
        let errors = validate_entry(label, amount, date);
        if !errors.is_empty() {
            return Err(PeculeError::from_messages(&errors));
        }

        match (parse_amount(amount), parse_date(date)) {
            (Some(amount), Some(date)) => Ok(Self {
                label: label.trim().to_string(),
                amount,
                date,
                category_id,
                is_fixed,
            }),
            _ => Err(PeculeError::Validation("Invalid amount or date".into())),
        }
    }
}

/// Changes to an existing expense; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    pub label: Option<String>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    /// `Some(None)` clears the category
    pub category_id: Option<Option<CategoryId>>,
    pub is_fixed: Option<bool>,
}

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn ensure_category(&self, category_id: Option<CategoryId>) -> PeculeResult<()> {
        if let Some(id) = category_id {
            self.storage
                .categories
                .get(id)?
                .ok_or_else(|| PeculeError::category_not_found(id.to_string()))?;
        }
        Ok(())
    }

    /// Record an expense in a cycle
    pub fn add(&self, cycle_id: CycleId, input: NewExpense) -> PeculeResult<Expense> {
        self.storage
            .cycles
            .get(cycle_id)?
            .ok_or_else(|| PeculeError::cycle_not_found(cycle_id.to_string()))?;
        self.ensure_category(input.category_id)?;

        let mut expense = Expense::new(cycle_id, input.label.trim(), input.amount, input.date)
            .fixed(input.is_fixed);
        expense.category_id = input.category_id;

        expense
            .validate()
            .map_err(|e| PeculeError::Validation(e.to_string()))?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.label.clone()),
            &expense,
        )?;
        self.storage.publish(StoreEvent::ExpensesChanged(cycle_id));

        Ok(expense)
    }

    pub fn get(&self, id: ExpenseId) -> PeculeResult<Option<Expense>> {
        self.storage.expenses.get(id)
    }

    /// Find an expense by its short display ID
    pub fn find(&self, identifier: &str) -> PeculeResult<Option<Expense>> {
        self.storage.expenses.find(identifier)
    }

    /// Expenses of a cycle, oldest first
    pub fn list(&self, cycle_id: CycleId) -> PeculeResult<Vec<Expense>> {
        self.storage.expenses.get_by_cycle(cycle_id)
    }

    pub fn update(&self, id: ExpenseId, changes: ExpenseUpdate) -> PeculeResult<Expense> {
        let mut expense = self
            .get(id)?
            .ok_or_else(|| PeculeError::expense_not_found(id.to_string()))?;
        let before = expense.clone();

        if let Some(label) = changes.label {
            expense.label = label.trim().to_string();
        }
        if let Some(amount) = changes.amount {
            expense.amount = amount;
        }
        if let Some(date) = changes.date {
            expense.date = date;
        }
        if let Some(category_id) = changes.category_id {
            self.ensure_category(category_id)?;
            expense.category_id = category_id;
        }
        if let Some(is_fixed) = changes.is_fixed {
            expense.is_fixed = is_fixed;
        }

        expense
            .validate()
            .map_err(|e| PeculeError::Validation(e.to_string()))?;
        expense.touch();

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_update(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.label.clone()),
            &before,
            &expense,
        )?;
        self.storage.publish(StoreEvent::ExpensesChanged(expense.cycle_id));

        Ok(expense)
    }

    pub fn delete(&self, id: ExpenseId) -> PeculeResult<Expense> {
        let expense = self
            .storage
            .expenses
            .delete(id)?
            .ok_or_else(|| PeculeError::expense_not_found(id.to_string()))?;
        self.storage.expenses.save()?;

        self.storage.log_delete(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.label.clone()),
            &expense,
        )?;
        self.storage.publish(StoreEvent::ExpensesChanged(expense.cycle_id));

        Ok(expense)
    }

    /// Σ expenses of a cycle
    pub fn total(&self, cycle_id: CycleId) -> PeculeResult<Money> {
        Ok(self.list(cycle_id)?.iter().map(|e| e.amount()).sum())
    }
}
