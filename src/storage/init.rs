//! Storage initialization
//!
//! Handles first-run setup: directories and the seeded default categories.

use crate::config::paths::PeculePaths;
use crate::error::PeculeResult;
use crate::models::DefaultCategory;

use super::categories::CategoryData;
use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Seeds the default categories unless categories.json already exists.
/// Returns the number of categories seeded.
pub fn initialize_storage(paths: &PeculePaths) -> PeculeResult<usize> {
    paths.ensure_directories()?;

    if paths.categories_file().exists() {
        return Ok(0);
    }

    let data = CategoryData {
        categories: DefaultCategory::all()
            .iter()
            .map(|d| d.to_category())
            .collect(),
    };
    write_json_atomic(paths.categories_file(), &data)?;

    Ok(data.categories.len())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &PeculePaths) -> bool {
    !paths.categories_file().exists()
}
