//! Expense and income repositories
//!
//! Both stores hold cycle entries keyed by ID with an index by owning cycle.
//! They share one generic implementation; expense-only operations live in a
//! dedicated impl block.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{PeculeError, PeculeResult};
use crate::models::{CategoryId, CycleEntry, CycleId, Expense, Income};

use super::file_io::{read_json, write_json_atomic};
use super::traits::EntryStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryData<T> {
    #[serde(default = "Vec::new")]
    entries: Vec<T>,
}

impl<T> Default for EntryData<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

/// Repository for one kind of cycle entry, indexed by cycle
pub struct EntryRepository<T: CycleEntry> {
    path: PathBuf,
    data: RwLock<HashMap<T::Id, T>>,
    by_cycle: RwLock<HashMap<CycleId, Vec<T::Id>>>,
}

pub type ExpenseRepository = EntryRepository<Expense>;
pub type IncomeRepository = EntryRepository<Income>;

impl<T> EntryRepository<T>
where
    T: CycleEntry + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_cycle: RwLock::new(HashMap::new()),
        }
    }

    /// Load entries from disk and rebuild the cycle index
    pub fn load(&self) -> PeculeResult<()> {
        let file_data: EntryData<T> = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_cycle = self
            .by_cycle
            .write()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_cycle.clear();

        for entry in file_data.entries {
            by_cycle.entry(entry.cycle_id()).or_default().push(entry.id());
            data.insert(entry.id(), entry);
        }

        Ok(())
    }

    /// Save entries to disk, newest first
    pub fn save(&self) -> PeculeResult<()> {
        let entries = self.get_all()?;
        write_json_atomic(&self.path, &EntryData { entries })
    }

    pub fn get(&self, id: T::Id) -> PeculeResult<Option<T>> {
        let data = self
            .data
            .read()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Find an entry by its short display ID
    pub fn find(&self, identifier: &str) -> PeculeResult<Option<T>> {
        let identifier = identifier.trim();
        Ok(self
            .get_all()?
            .into_iter()
            .find(|e| e.id().to_string() == identifier))
    }

    /// All entries, most recent date first
    pub fn get_all(&self) -> PeculeResult<Vec<T>> {
        let data = self
            .data
            .read()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut entries: Vec<_> = data.values().cloned().collect();
        entries.sort_by(|a, b| b.date().cmp(&a.date()));
        Ok(entries)
    }

    /// Entries of a cycle, oldest date first
    pub fn get_by_cycle(&self, cycle_id: CycleId) -> PeculeResult<Vec<T>> {
        let data = self
            .data
            .read()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_cycle = self
            .by_cycle
            .read()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_cycle.get(&cycle_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut entries: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        entries.sort_by_key(|e| e.date());
        Ok(entries)
    }

    /// Insert or replace an entry, keeping the cycle index in sync
    pub fn upsert(&self, entry: T) -> PeculeResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_cycle = self
            .by_cycle
            .write()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let id = entry.id();
        if let Some(previous) = data.get(&id) {
            if previous.cycle_id() != entry.cycle_id() {
                if let Some(ids) = by_cycle.get_mut(&previous.cycle_id()) {
                    ids.retain(|existing| *existing != id);
                }
            }
        }

        let ids = by_cycle.entry(entry.cycle_id()).or_default();
        if !ids.contains(&id) {
            ids.push(id);
        }
        data.insert(id, entry);
        Ok(())
    }

    pub fn delete(&self, id: T::Id) -> PeculeResult<Option<T>> {
        let mut data = self
            .data
            .write()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_cycle = self
            .by_cycle
            .write()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let removed = data.remove(&id);
        if let Some(entry) = &removed {
            if let Some(ids) = by_cycle.get_mut(&entry.cycle_id()) {
                ids.retain(|existing| *existing != id);
            }
        }
        Ok(removed)
    }

    /// Remove every entry owned by a cycle; returns the removed entries
    pub fn delete_by_cycle(&self, cycle_id: CycleId) -> PeculeResult<Vec<T>> {
        let mut data = self
            .data
            .write()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_cycle = self
            .by_cycle
            .write()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let ids = by_cycle.remove(&cycle_id).unwrap_or_default();
        Ok(ids.iter().filter_map(|id| data.remove(id)).collect())
    }

    pub fn count(&self) -> PeculeResult<usize> {
        let data = self
            .data
            .read()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}

impl ExpenseRepository {
    /// Detach a deleted category from every expense that referenced it;
    /// returns how many expenses were changed
    pub fn clear_category(&self, category_id: CategoryId) -> PeculeResult<usize> {
        let mut data = self
            .data
            .write()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let mut changed = 0;
        for expense in data.values_mut() {
            if expense.category_id == Some(category_id) {
                expense.category_id = None;
                expense.touch();
                changed += 1;
            }
        }
        Ok(changed)
    }
}

impl<T> EntryStore<T> for EntryRepository<T>
where
    T: CycleEntry + DeserializeOwned,
{
    fn by_cycle(&self, cycle_id: CycleId) -> PeculeResult<Vec<T>> {
        self.get_by_cycle(cycle_id)
    }

    fn insert(&self, entry: T) -> PeculeResult<()> {
        if self.get(entry.id())?.is_some() {
            return Err(PeculeError::Duplicate {
                entity_type: "Entry",
                identifier: entry.id().to_string(),
            });
        }
        self.upsert(entry)?;
        self.save()
    }
}
