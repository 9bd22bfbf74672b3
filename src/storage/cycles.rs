//! Budget cycle repository
//!
//! Manages loading and saving cycles to cycles.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{PeculeError, PeculeResult};
use crate::models::{BudgetCycle, CycleId};

use super::file_io::{read_json, write_json_atomic};
use super::traits::CycleStore;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CycleData {
    #[serde(default)]
    cycles: Vec<BudgetCycle>,
}

/// Repository for budget cycle persistence
pub struct CycleRepository {
    path: PathBuf,
    cycles: RwLock<HashMap<CycleId, BudgetCycle>>,
}

impl CycleRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            cycles: RwLock::new(HashMap::new()),
        }
    }

    /// Load cycles from disk
    pub fn load(&self) -> PeculeResult<()> {
        let file_data: CycleData = read_json(&self.path)?;

        let mut cycles = self
            .cycles
            .write()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        cycles.clear();
        for cycle in file_data.cycles {
            cycles.insert(cycle.id, cycle);
        }

        Ok(())
    }

    /// Save cycles to disk, oldest first
    pub fn save(&self) -> PeculeResult<()> {
        let mut list = self.get_all()?;
        list.reverse();

        write_json_atomic(&self.path, &CycleData { cycles: list })
    }

    pub fn get(&self, id: CycleId) -> PeculeResult<Option<BudgetCycle>> {
        let cycles = self
            .cycles
            .read()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(cycles.get(&id).cloned())
    }

    /// Find a cycle by its short display ID or full UUID
    pub fn find(&self, identifier: &str) -> PeculeResult<Option<BudgetCycle>> {
        Ok(self
            .get_all()?
            .into_iter()
            .find(|c| c.id.matches(identifier)))
    }

    /// All cycles, most recent start date first
    pub fn get_all(&self) -> PeculeResult<Vec<BudgetCycle>> {
        let cycles = self
            .cycles
            .read()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = cycles.values().cloned().collect();
        list.sort_by(|a, b| {
            b.start_date
                .cmp(&a.start_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(list)
    }

    /// The currently open cycle
    ///
    /// When several cycles are open (which only a damaged data file can
    /// produce) the most recent one is returned.
    pub fn current(&self) -> PeculeResult<Option<BudgetCycle>> {
        Ok(self.get_all()?.into_iter().find(|c| c.is_open()))
    }

    pub fn upsert(&self, cycle: BudgetCycle) -> PeculeResult<()> {
        let mut cycles = self
            .cycles
            .write()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        cycles.insert(cycle.id, cycle);
        Ok(())
    }

    pub fn delete(&self, id: CycleId) -> PeculeResult<Option<BudgetCycle>> {
        let mut cycles = self
            .cycles
            .write()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(cycles.remove(&id))
    }

    pub fn count(&self) -> PeculeResult<usize> {
        let cycles = self
            .cycles
            .read()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(cycles.len())
    }
}

impl CycleStore for CycleRepository {
    fn open_cycles(&self) -> PeculeResult<Vec<BudgetCycle>> {
        Ok(self.get_all()?.into_iter().filter(|c| c.is_open()).collect())
    }

    fn get(&self, id: CycleId) -> PeculeResult<Option<BudgetCycle>> {
        CycleRepository::get(self, id)
    }

    fn insert(&self, cycle: BudgetCycle) -> PeculeResult<()> {
        if self.get(cycle.id)?.is_some() {
            return Err(PeculeError::Duplicate {
                entity_type: "Cycle",
                identifier: cycle.id.to_string(),
            });
        }
        self.upsert(cycle)?;
        self.save()
    }

    fn update(&self, cycle: BudgetCycle) -> PeculeResult<()> {
        if self.get(cycle.id)?.is_none() {
            return Err(PeculeError::cycle_not_found(cycle.id.to_string()));
        }
        self.upsert(cycle)?;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_repo() -> (TempDir, CycleRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = CycleRepository::new(temp_dir.path().join("cycles.json"));
        repo.load().unwrap();
        (temp_dir, repo)
    }

    #[test]
    fn test_current_is_open_cycle() {
        let (_temp_dir, repo) = create_test_repo();

        let mut old = BudgetCycle::new(Money::from_cents(200000), date(2024, 12, 25));
        old.close(date(2025, 1, 24));
        let open = BudgetCycle::new(Money::from_cents(250000), date(2025, 1, 25));

        repo.upsert(old).unwrap();
        repo.upsert(open.clone()).unwrap();

        assert_eq!(repo.current().unwrap().unwrap().id, open.id);
        assert_eq!(repo.open_cycles().unwrap().len(), 1);
    }

    #[test]
    fn test_history_sorted_newest_first() {
        let (_temp_dir, repo) = create_test_repo();

        for month in [1, 3, 2] {
            repo.upsert(BudgetCycle::new(Money::zero(), date(2025, month, 25)))
                .unwrap();
        }

        let starts: Vec<_> = repo.get_all().unwrap().iter().map(|c| c.start_date).collect();
        assert_eq!(
            starts,
            vec![date(2025, 3, 25), date(2025, 2, 25), date(2025, 1, 25)]
        );
    }

    #[test]
    fn test_store_insert_persists() {
        let (temp_dir, repo) = create_test_repo();
        let cycle = BudgetCycle::new(Money::from_cents(100), date(2025, 1, 25));

        CycleStore::insert(&repo, cycle.clone()).unwrap();
        assert!(CycleStore::insert(&repo, cycle.clone()).is_err());

        let reloaded = CycleRepository::new(temp_dir.path().join("cycles.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.get(cycle.id).unwrap(), Some(cycle));
    }

    #[test]
    fn test_store_update_requires_existing() {
        let (_temp_dir, repo) = create_test_repo();
        let cycle = BudgetCycle::new(Money::from_cents(100), date(2025, 1, 25));

        let err = CycleStore::update(&repo, cycle).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_find_by_short_id() {
        let (_temp_dir, repo) = create_test_repo();
        let cycle = BudgetCycle::new(Money::from_cents(100), date(2025, 1, 25));
        repo.upsert(cycle.clone()).unwrap();

        let found = repo.find(&cycle.id.to_string()).unwrap().unwrap();
        assert_eq!(found.id, cycle.id);
        assert!(repo.find("not-an-id").unwrap().is_none());
    }
}
