//! vidsweep-core: the error type and configuration shared by the other
//! vidsweep crates.

pub mod config;
pub mod error;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
