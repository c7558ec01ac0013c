//! Utility functions for file handling, naming and tables

pub mod file_utils;
pub mod misc;
pub mod tables;

// Re-export commonly used utility functions for convenience
pub use file_utils::*;
pub use misc::*;
