//! Configuration module for Pécule
//!
//! - Platform path resolution
//! - User preferences persistence

pub mod paths;
pub mod settings;

pub use paths::PeculePaths;
pub use settings::{Settings, Theme};
