//! Audit logging for Pécule
//!
//! Every create, update and delete performed by the services is appended to
//! a JSON-lines log with before/after values, so the history of a budget can
//! be reconstructed after the fact.
//!
//! - `AuditEntry`: one operation on one entity
//! - `AuditLogger`: appends and reads entries
//! - `generate_diff`: summary of the top-level fields an update changed

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
