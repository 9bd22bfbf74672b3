//! Expense model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::entry::{CycleEntry, EntryKind};
use super::ids::{CategoryId, CycleId, ExpenseId};
use super::money::Money;

/// Money spent during a cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,

    /// Owning cycle
    pub cycle_id: CycleId,

    /// Set to `None` when the category is deleted
    #[serde(default)]
    pub category_id: Option<CategoryId>,

    pub label: String,

    /// Always positive; the sign comes from the entry kind
    pub amount: Money,

    pub date: NaiveDate,

    /// Recurring expense, carried into each new cycle
    #[serde(default)]
    pub is_fixed: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        cycle_id: CycleId,
        label: impl Into<String>,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenseId::new(),
            cycle_id,
            category_id: None,
            label: label.into(),
            amount,
            date,
            is_fixed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style category assignment
    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Builder-style fixed flag
    pub fn fixed(mut self, is_fixed: bool) -> Self {
        self.is_fixed = is_fixed;
        self
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl CycleEntry for Expense {
    type Id = ExpenseId;

    const KIND: EntryKind = EntryKind::Expense;

    fn id(&self) -> ExpenseId {
        self.id
    }

    fn cycle_id(&self) -> CycleId {
        self.cycle_id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn amount(&self) -> Money {
        self.amount
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn is_fixed(&self) -> bool {
        self.is_fixed
    }

    fn carry_forward(&self, cycle_id: CycleId, date: NaiveDate) -> Self {
        let mut copy = Expense::new(cycle_id, self.label.clone(), self.amount, date);
        copy.category_id = self.category_id;
        copy.is_fixed = self.is_fixed;
        copy
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.date, self.label, self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::EntryValidationError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_signed_amount_is_negative() {
        let expense = Expense::new(CycleId::new(), "Loyer", Money::from_cents(80000), date(2025, 1, 26));
        assert_eq!(expense.signed_amount().cents(), -80000);
    }

    #[test]
    fn test_carry_forward_keeps_fields() {
        let category = CategoryId::new();
        let expense = Expense::new(CycleId::new(), "Loyer", Money::from_cents(80000), date(2025, 1, 26))
            .with_category(category)
            .fixed(true);

        let new_cycle = CycleId::new();
        let copy = expense.carry_forward(new_cycle, date(2025, 2, 25));

        assert_ne!(copy.id, expense.id);
        assert_eq!(copy.cycle_id, new_cycle);
        assert_eq!(copy.date, date(2025, 2, 25));
        assert_eq!(copy.label, "Loyer");
        assert_eq!(copy.amount, expense.amount);
        assert_eq!(copy.category_id, Some(category));
        assert!(copy.is_fixed);
    }

    #[test]
    fn test_validation() {
        let cycle = CycleId::new();
        let ok = Expense::new(cycle, "Courses", Money::from_cents(4250), date(2025, 1, 26));
        assert!(ok.validate().is_ok());

        let empty = Expense::new(cycle, "  ", Money::from_cents(4250), date(2025, 1, 26));
        assert_eq!(empty.validate(), Err(EntryValidationError::EmptyLabel));

        let zero = Expense::new(cycle, "Courses", Money::zero(), date(2025, 1, 26));
        assert_eq!(zero.validate(), Err(EntryValidationError::NonPositiveAmount));
    }

    #[test]
    fn test_missing_optional_fields_deserialize() {
        let expense = Expense::new(CycleId::new(), "Courses", Money::from_cents(100), date(2025, 1, 26));
        let mut value = serde_json::to_value(&expense).unwrap();
        let object = value.as_object_mut().unwrap();
        object.remove("category_id");
        object.remove("is_fixed");

        let restored: Expense = serde_json::from_value(value).unwrap();
        assert_eq!(restored.category_id, None);
        assert!(!restored.is_fixed);
    }
}
