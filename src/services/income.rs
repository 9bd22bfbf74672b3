//! Income service
//!
//! Recording, editing and deleting the incomes of a cycle.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{PeculeError, PeculeResult};
use crate::models::{CycleEntry, CycleId, Income, IncomeId, Money};
use crate::storage::{Storage, StoreEvent};

use super::validation::{parse_amount, parse_date, validate_entry};

/// Fields of a new income
#[derive(Debug, Clone)]
pub struct NewIncome {
    pub label: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub is_fixed: bool,
}

impl NewIncome {
    /// Build from raw form input, collecting every validation problem
    pub fn from_form(label: &str, amount: &str, date: &str, is_fixed: bool) -> PeculeResult<Self> {
        let errors = validate_entry(label, amount, date);
        if !errors.is_empty() {
            return Err(PeculeError::from_messages(&errors));
        }

        match (parse_amount(amount), parse_date(date)) {
            (Some(amount), Some(date)) => Ok(Self {
                label: label.trim().to_string(),
                amount,
                date,
                is_fixed,
            }),
            _ => Err(PeculeError::Validation("Invalid amount or date".into())),
        }
    }
}

/// Changes to an existing income
#[derive(Debug, Clone, Default)]
pub struct IncomeUpdate {
    pub label: Option<String>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub is_fixed: Option<bool>,
}

/// Service for income management
pub struct IncomeService<'a> {
    storage: &'a Storage,
}

impl<'a> IncomeService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record an income in a cycle
    pub fn add(&self, cycle_id: CycleId, input: NewIncome) -> PeculeResult<Income> {
        self.storage
            .cycles
            .get(cycle_id)?
            .ok_or_else(|| PeculeError::cycle_not_found(cycle_id.to_string()))?;

        let income =
            Income::new(cycle_id, input.label.trim(), input.amount, input.date).fixed(input.is_fixed);

        income
            .validate()
            .map_err(|e| PeculeError::Validation(e.to_string()))?;

        self.storage.incomes.upsert(income.clone())?;
        self.storage.incomes.save()?;

        self.storage.log_create(
            EntityType::Income,
            income.id.to_string(),
            Some(income.label.clone()),
            &income,
        )?;
        self.storage.publish(StoreEvent::IncomesChanged(cycle_id));

        Ok(income)
    }

    pub fn get(&self, id: IncomeId) -> PeculeResult<Option<Income>> {
        self.storage.incomes.get(id)
    }

    pub fn find(&self, identifier: &str) -> PeculeResult<Option<Income>> {
        self.storage.incomes.find(identifier)
    }

    /// Incomes of a cycle, oldest first
    pub fn list(&self, cycle_id: CycleId) -> PeculeResult<Vec<Income>> {
        self.storage.incomes.get_by_cycle(cycle_id)
    }

    pub fn update(&self, id: IncomeId, changes: IncomeUpdate) -> PeculeResult<Income> {
        let mut income = self
            .get(id)?
            .ok_or_else(|| PeculeError::income_not_found(id.to_string()))?;
        let before = income.clone();

        if let Some(label) = changes.label {
            income.label = label.trim().to_string();
        }
        if let Some(amount) = changes.amount {
            income.amount = amount;
        }
        if let Some(date) = changes.date {
            income.date = date;
        }
        if let Some(is_fixed) = changes.is_fixed {
            income.is_fixed = is_fixed;
        }

        income
            .validate()
            .map_err(|e| PeculeError::Validation(e.to_string()))?;
        income.touch();

        self.storage.incomes.upsert(income.clone())?;
        self.storage.incomes.save()?;

        self.storage.log_update(
            EntityType::Income,
            income.id.to_string(),
            Some(income.label.clone()),
            &before,
            &income,
        )?;
        self.storage.publish(StoreEvent::IncomesChanged(income.cycle_id));

        Ok(income)
    }

    pub fn delete(&self, id: IncomeId) -> PeculeResult<Income> {
        let income = self
            .storage
            .incomes
            .delete(id)?
            .ok_or_else(|| PeculeError::income_not_found(id.to_string()))?;
        self.storage.incomes.save()?;

        self.storage.log_delete(
            EntityType::Income,
            income.id.to_string(),
            Some(income.label.clone()),
            &income,
        )?;
        self.storage.publish(StoreEvent::IncomesChanged(income.cycle_id));

        Ok(income)
    }

    /// Σ incomes of a cycle
    pub fn total(&self, cycle_id: CycleId) -> PeculeResult<Money> {
        Ok(self.list(cycle_id)?.iter().map(|i| i.amount()).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::PeculePaths;
    use crate::models::BudgetCycle;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage, BudgetCycle) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PeculePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let cycle = BudgetCycle::new(
            Money::from_cents(100000),
            NaiveDate::from_ymd_opt(2025, 1, 25).unwrap(),
        );
        storage.cycles.upsert(cycle.clone()).unwrap();
        (temp_dir, storage, cycle)
    }

    #[test]
    fn test_income_lifecycle() {
        let (_temp_dir, storage, cycle) = create_test_storage();
        let service = IncomeService::new(&storage);

        let income = service
            .add(cycle.id, NewIncome::from_form("Salaire", "2000", "27/01/2025", true).unwrap())
            .unwrap();
        assert!(income.is_fixed);
        assert_eq!(service.total(cycle.id).unwrap().cents(), 200000);

        let updated = service
            .update(
                income.id,
                IncomeUpdate {
                    label: Some("Salaire janvier".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.label, "Salaire janvier");

        let found = service.find(&income.id.to_string()).unwrap().unwrap();
        assert_eq!(found.id, income.id);

        service.delete(income.id).unwrap();
        assert!(service.list(cycle.id).unwrap().is_empty());

        let ops: Vec<_> = storage
            .audit()
            .read_all()
            .unwrap()
            .into_iter()
            .map(|e| e.operation)
            .collect();
        assert_eq!(ops, vec![Operation::Create, Operation::Update, Operation::Delete]);
    }

    #[test]
    fn test_rejects_invalid_form() {
        let err = NewIncome::from_form("Prime", "-20", "2025-01-30", false).unwrap_err();
        assert!(err.is_validation());
    }
}
