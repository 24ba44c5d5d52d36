//! Logging utilities
//!
//! This module provides standardized logging functions for operations.

use std::path::Path;

use crate::survey::Substance;

/// Log an operation start with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file being operated on
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log an operation completion with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file that was operated on
/// * `items` - Number of items processed
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(
    operation: &str,
    path: &Path,
    items: usize,
    elapsed: Option<std::time::Duration>,
) {
    if let Some(duration) = elapsed {
        log::info!(
            "Successfully {} {} items from {} in {:?}",
            operation,
            items,
            path.display(),
            duration
        );
    } else {
        log::info!(
            "Successfully {} {} items from {}",
            operation,
            items,
            path.display()
        );
    }
}

/// Log that a substance cannot be served
///
/// # Arguments
/// * `substance` - The substance whose artifacts failed to load
/// * `reason` - Description of the failure
pub fn log_substance_unavailable(substance: Substance, reason: &str) {
    log::error!("{substance} predictions unavailable: {reason}");
}
