//! Storage layer for Pécule
//!
//! One JSON file per store with atomic writes, an audit log of every
//! mutation, and a change feed for readers that need to refresh.

pub mod categories;
pub mod cycles;
pub mod entries;
pub mod feed;
pub mod file_io;
pub mod init;
pub mod traits;

pub use categories::CategoryRepository;
pub use cycles::CycleRepository;
pub use entries::{EntryRepository, ExpenseRepository, IncomeRepository};
pub use feed::{ChangeFeed, StoreEvent, Subscription};
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use traits::{CycleStore, EntryStore};

use serde::Serialize;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::PeculePaths;
use crate::error::PeculeResult;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: PeculePaths,
    pub cycles: CycleRepository,
    pub expenses: ExpenseRepository,
    pub incomes: IncomeRepository,
    pub categories: CategoryRepository,
    audit: AuditLogger,
    feed: ChangeFeed,
}

impl Storage {
    /// Create a new Storage instance, creating the directories if needed
    pub fn new(paths: PeculePaths) -> PeculeResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            cycles: CycleRepository::new(paths.cycles_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            incomes: IncomeRepository::new(paths.incomes_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            audit: AuditLogger::new(paths.audit_log()),
            feed: ChangeFeed::new(),
            paths,
        })
    }

    pub fn paths(&self) -> &PeculePaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> PeculeResult<()> {
        self.cycles.load()?;
        self.expenses.load()?;
        self.incomes.load()?;
        self.categories.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> PeculeResult<()> {
        self.cycles.save()?;
        self.expenses.save()?;
        self.incomes.save()?;
        self.categories.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Subscribe to store change notifications
    pub fn subscribe(&self) -> Subscription {
        self.feed.subscribe()
    }

    pub fn publish(&self, event: StoreEvent) {
        self.feed.publish(event);
    }

    /// Record a create operation in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> PeculeResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record an update in the audit log, with a field diff
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> PeculeResult<()> {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };

        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    /// Record a delete operation in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> PeculeResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}
