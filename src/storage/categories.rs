//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{PeculeError, PeculeResult};
use crate::models::{Category, CategoryId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable category data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CategoryData {
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    categories: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            categories: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> PeculeResult<()> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut categories = self
            .categories
            .write()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        categories.clear();
        for category in file_data.categories {
            categories.insert(category.id, category);
        }

        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> PeculeResult<()> {
        let file_data = CategoryData {
            categories: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: CategoryId) -> PeculeResult<Option<Category>> {
        let categories = self
            .categories
            .read()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(categories.get(&id).cloned())
    }

    /// All categories: defaults first, then by name
    pub fn get_all(&self) -> PeculeResult<Vec<Category>> {
        let categories = self
            .categories
            .read()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = categories.values().cloned().collect();
        list.sort_by_key(|c| (!c.is_default, c.name.to_lowercase()));
        Ok(list)
    }

    /// Get a category by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> PeculeResult<Option<Category>> {
        let categories = self
            .categories
            .read()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let name_lower = name.trim().to_lowercase();
        Ok(categories
            .values()
            .find(|c| c.name.to_lowercase() == name_lower)
            .cloned())
    }

    pub fn upsert(&self, category: Category) -> PeculeResult<()> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        categories.insert(category.id, category);
        Ok(())
    }

    pub fn delete(&self, id: CategoryId) -> PeculeResult<Option<Category>> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(categories.remove(&id))
    }

    pub fn count(&self) -> PeculeResult<usize> {
        let categories = self
            .categories
            .read()
            .map_err(|e| PeculeError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(categories.len())
    }

    /// Map of category ID to name, for exports and reports
    pub fn names(&self) -> PeculeResult<HashMap<CategoryId, String>> {
        Ok(self
            .get_all()?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DefaultCategory;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, CategoryRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = CategoryRepository::new(temp_dir.path().join("categories.json"));
        repo.load().unwrap();
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_defaults_listed_first() {
        let (_temp_dir, repo) = create_test_repo();

        repo.upsert(Category::new("Animaux", "pets", "#AABBCC")).unwrap();
        repo.upsert(DefaultCategory::Transport.to_category()).unwrap();

        let names: Vec<_> = repo.get_all().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Transport", "Animaux"]);
    }

    #[test]
    fn test_get_by_name_case_insensitive() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(Category::new("Vacances", "flight", "#00AAFF")).unwrap();

        assert!(repo.get_by_name("VACANCES").unwrap().is_some());
        assert!(repo.get_by_name(" vacances ").unwrap().is_some());
        assert!(repo.get_by_name("Voyage").unwrap().is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let category = Category::new("Vacances", "flight", "#00AAFF");
        repo.upsert(category.clone()).unwrap();
        repo.save().unwrap();

        let reloaded = CategoryRepository::new(temp_dir.path().join("categories.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.get(category.id).unwrap(), Some(category));
    }
}
