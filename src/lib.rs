//! Pécule - personal budget tracking by cycles
//!
//! This library provides the core functionality for the Pécule budget
//! tracker. A budget cycle starts with an opening amount; expenses and
//! incomes are recorded against it, and starting a new cycle closes the
//! previous one and carries its fixed entries forward.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (cycles, expenses, incomes, categories)
//! - `storage`: JSON file storage layer and change feed
//! - `services`: Business logic layer
//! - `reports`: Balance, history and alert calculations
//! - `audit`: Audit logging system
//! - `backup`: Backup archives and restore
//! - `export`: CSV and cycle report exports
//! - `setup`: First-run onboarding
//! - `display`, `cli`: Terminal output and command handlers
//!
//! # Change feed
//!
//! Every service mutation is published on the storage change feed as a
//! [`storage::StoreEvent`], after the store and the audit log are written.
//! Readers call [`storage::Storage::subscribe`] and drain the returned
//! subscription to learn what changed, in publication order. A rollover
//! publishes `CycleClosed` before `CycleOpened`; `pecule cycle start`
//! reports the rollover from these events.
//!
//! # Example
//!
//! ```rust,ignore
//! use pecule::config::{paths::PeculePaths, settings::Settings};
//!
//! let paths = PeculePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod setup;
pub mod storage;

pub use error::{PeculeError, PeculeResult};
