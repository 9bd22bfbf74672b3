//! First-run onboarding
//!
//! Records the user's first name, seeds the default categories and opens
//! the first budget cycle. Runs once per installation.

use crate::audit::EntityType;
use crate::config::settings::Settings;
use crate::error::{PeculeError, PeculeResult};
use crate::models::BudgetCycle;
use crate::services::validation::{parse_amount, parse_date, validate_onboarding};
use crate::services::CycleService;
use crate::storage::{initialize_storage, Storage, StoreEvent};

/// What onboarding created
#[derive(Debug, Clone)]
pub struct OnboardingResult {
    pub first_name: String,
    pub categories_seeded: usize,
    pub cycle: BudgetCycle,
}

/// First-run flow
pub struct Onboarding<'a> {
    storage: &'a Storage,
}

impl<'a> Onboarding<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Whether onboarding still has to run
    pub fn is_needed(settings: &Settings) -> bool {
        !settings.setup_completed
    }

    /// Validate the answers and set everything up
    ///
    /// Settings are only marked completed once the first cycle exists, so a
    /// failed run can be retried.
    pub fn complete(
        &self,
        settings: &mut Settings,
        first_name: &str,
        amount: &str,
        start_date: &str,
    ) -> PeculeResult<OnboardingResult> {
        if !Self::is_needed(settings) {
            return Err(PeculeError::Config("Pécule is already set up".into()));
        }

        let errors = validate_onboarding(first_name, amount, start_date);
        if !errors.is_empty() {
            return Err(PeculeError::from_messages(&errors));
        }
        let (amount, start_date) = match (parse_amount(amount), parse_date(start_date)) {
            (Some(amount), Some(date)) => (amount, date),
            _ => return Err(PeculeError::Validation("Invalid amount or date".into())),
        };

        let categories_seeded = initialize_storage(self.storage.paths())?;
        if categories_seeded > 0 {
            self.storage.categories.load()?;
            self.storage.publish(StoreEvent::CategoriesChanged);
        }

        let outcome = CycleService::new(self.storage).start_new_cycle(amount, start_date)?;

        let before = settings.clone();
        settings.first_name = first_name.trim().to_string();
        settings.setup_completed = true;
        settings.save(self.storage.paths())?;

        self.storage
            .log_update(EntityType::Settings, "settings", None, &before, &*settings)?;
        self.storage.publish(StoreEvent::SettingsChanged);

        Ok(OnboardingResult {
            first_name: settings.first_name.clone(),
            categories_seeded,
            cycle: outcome.cycle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PeculePaths;
    use crate::models::DefaultCategory;
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
    fn test_complete_onboarding() {
        let (_temp_dir, storage) = create_test_storage();
        let mut settings = Settings::default();

        let result = Onboarding::new(&storage)
            .complete(&mut settings, " Camille ", "2500,00", "25/01/2025")
            .unwrap();

        assert_eq!(result.first_name, "Camille");
        assert_eq!(result.categories_seeded, DefaultCategory::all().len());
        assert_eq!(result.cycle.amount.cents(), 250000);
        assert_eq!(
            result.cycle.start_date,
            NaiveDate::from_ymd_opt(2025, 1, 25).unwrap()
        );

        assert!(settings.setup_completed);
        assert_eq!(settings.greeting(), "Bonjour Camille !");
        assert_eq!(storage.categories.count().unwrap(), DefaultCategory::all().len());
        assert_eq!(storage.cycles.current().unwrap().unwrap().id, result.cycle.id);

        let reloaded = Settings::load_or_create(storage.paths()).unwrap();
        assert!(reloaded.setup_completed);
        assert_eq!(reloaded.first_name, "Camille");
    }

    #[test]
    fn test_refuses_to_run_twice() {
        let (_temp_dir, storage) = create_test_storage();
        let mut settings = Settings::default();
        let onboarding = Onboarding::new(&storage);

        onboarding
            .complete(&mut settings, "Camille", "100", "2025-01-25")
            .unwrap();
        let err = onboarding
            .complete(&mut settings, "Camille", "100", "2025-02-25")
            .unwrap_err();
        assert!(matches!(err, PeculeError::Config(_)));
        assert_eq!(storage.cycles.count().unwrap(), 1);
    }

    #[test]
    fn test_invalid_answers_change_nothing() {
        let (_temp_dir, storage) = create_test_storage();
        let mut settings = Settings::default();

        let err = Onboarding::new(&storage)
            .complete(&mut settings, "", "-5", "hier")
            .unwrap_err();
        assert!(err.is_validation());
        assert!(!settings.setup_completed);
        assert_eq!(storage.cycles.count().unwrap(), 0);
        assert_eq!(storage.categories.count().unwrap(), 0);
    }
}
