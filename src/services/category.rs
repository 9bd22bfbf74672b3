//! Category service
//!
//! Provides business logic for expense categories: creation with unique
//! names, editing, and deletion that detaches the category from expenses.

use crate::audit::EntityType;
use crate::error::{PeculeError, PeculeResult};
use crate::models::{Category, CategoryId};
use crate::storage::{Storage, StoreEvent};

use super::validation::validate_category;

/// Icon given to categories created without one
pub const DEFAULT_ICON: &str = "label";

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

/// Result of deleting a category
#[derive(Debug, Clone)]
pub struct DeletedCategory {
    pub category: Category,
    /// Expenses that referenced the category and are now uncategorized
    pub expenses_detached: usize,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new category
    pub fn create(&self, name: &str, icon: Option<&str>, color: &str) -> PeculeResult<Category> {
        let existing = self.storage.categories.get_all()?;
        let errors = validate_category(name, color, &existing, None);
        if !errors.is_empty() {
            return Err(PeculeError::from_messages(&errors));
        }

        let category = Category::new(
            name.trim(),
            icon.map(str::trim).filter(|i| !i.is_empty()).unwrap_or(DEFAULT_ICON),
            color.trim().to_uppercase(),
        );

        category
            .validate()
            .map_err(|e| PeculeError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;
        self.storage.publish(StoreEvent::CategoriesChanged);

        Ok(category)
    }

    pub fn get(&self, id: CategoryId) -> PeculeResult<Option<Category>> {
        self.storage.categories.get(id)
    }

    /// Find a category by name or ID
    pub fn find(&self, identifier: &str) -> PeculeResult<Option<Category>> {
        if let Some(category) = self.storage.categories.get_by_name(identifier)? {
            return Ok(Some(category));
        }

        Ok(self
            .storage
            .categories
            .get_all()?
            .into_iter()
            .find(|c| c.id.matches(identifier)))
    }

    /// All categories, defaults first
    pub fn list(&self) -> PeculeResult<Vec<Category>> {
        self.storage.categories.get_all()
    }

    /// Rename or recolor a category
    pub fn update(
        &self,
        id: CategoryId,
        name: Option<&str>,
        icon: Option<&str>,
        color: Option<&str>,
    ) -> PeculeResult<Category> {
        let mut category = self
            .get(id)?
            .ok_or_else(|| PeculeError::category_not_found(id.to_string()))?;
        let before = category.clone();

        let new_name = name.unwrap_or(&before.name);
        let new_color = color.unwrap_or(&before.color);
        let existing = self.storage.categories.get_all()?;
        let errors = validate_category(new_name, new_color, &existing, Some(id));
        if !errors.is_empty() {
            return Err(PeculeError::from_messages(&errors));
        }

        if let Some(name) = name {
            category.rename(name.trim());
        }
        if let Some(color) = color {
            category.set_color(color.trim().to_uppercase());
        }
        if let Some(icon) = icon.map(str::trim).filter(|i| !i.is_empty()) {
            category.set_icon(icon);
        }

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_update(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &before,
            &category,
        )?;
        self.storage.publish(StoreEvent::CategoriesChanged);

        Ok(category)
    }

    /// Delete a category; its expenses become uncategorized
    ///
    /// Default categories cannot be deleted.
    pub fn delete(&self, id: CategoryId) -> PeculeResult<DeletedCategory> {
        let category = self
            .get(id)?
            .ok_or_else(|| PeculeError::category_not_found(id.to_string()))?;

        if category.is_default {
            return Err(PeculeError::Validation(format!(
                "'{}' is a default category and cannot be deleted",
                category.name
            )));
        }

        let expenses_detached = self.storage.expenses.clear_category(id)?;
        if expenses_detached > 0 {
            self.storage.expenses.save()?;
        }

        self.storage.categories.delete(id)?;
        self.storage.categories.save()?;

        self.storage.log_delete(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;
        self.storage.publish(StoreEvent::CategoriesChanged);

        Ok(DeletedCategory {
            category,
            expenses_detached,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PeculePaths;
    use crate::models::{CycleId, DefaultCategory, Expense, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PeculePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let category = service.create(" Voyages ", None, "#00aaff").unwrap();
        assert_eq!(category.name, "Voyages");
        assert_eq!(category.icon, DEFAULT_ICON);
        assert_eq!(category.color, "#00AAFF");
        assert!(!category.is_default);

        assert_eq!(service.find("voyages").unwrap().unwrap().id, category.id);
        assert_eq!(service.find(&category.id.to_string()).unwrap().unwrap().id, category.id);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        service.create("Voyages", None, "#00AAFF").unwrap();
        let err = service.create("VOYAGES", None, "#112233").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn test_update_keeps_own_name() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let category = service.create("Voyages", None, "#00AAFF").unwrap();
        service.create("Cadeaux", Some("gift"), "#FF0000").unwrap();

        let updated = service
            .update(category.id, Some("voyages"), None, Some("#123456"))
            .unwrap();
        assert_eq!(updated.name, "voyages");
        assert_eq!(updated.color, "#123456");

        let clash = service.update(category.id, Some("Cadeaux"), None, None);
        assert!(clash.unwrap_err().is_validation());

        let bad_color = service.update(category.id, None, None, Some("red"));
        assert!(bad_color.unwrap_err().is_validation());
    }

    #[test]
    fn test_delete_detaches_expenses() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let category = service.create("Voyages", None, "#00AAFF").unwrap();

        let expense = Expense::new(
            CycleId::new(),
            "Train",
            Money::from_cents(4500),
            NaiveDate::from_ymd_opt(2025, 1, 26).unwrap(),
        )
        .with_category(category.id);
        storage.expenses.upsert(expense.clone()).unwrap();

        let deleted = service.delete(category.id).unwrap();
        assert_eq!(deleted.expenses_detached, 1);
        assert!(service.get(category.id).unwrap().is_none());
        assert_eq!(storage.expenses.get(expense.id).unwrap().unwrap().category_id, None);
    }

    #[test]
    fn test_default_category_not_deletable() {
        let (_temp_dir, storage) = create_test_storage();
        let default = DefaultCategory::Food.to_category();
        storage.categories.upsert(default.clone()).unwrap();

        let err = CategoryService::new(&storage).delete(default.id).unwrap_err();
        assert!(err.is_validation());
        assert!(storage.categories.get(default.id).unwrap().is_some());
    }
}
