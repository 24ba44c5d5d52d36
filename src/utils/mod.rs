//! Utility functions for logging and file input

pub mod io;
pub mod logging;

pub use io::{DEFAULT_BATCH_SIZE, read_table};
