//! vidsweep - batch transcoding of a media directory
//!
//! This library crate exposes the core functionality for integration testing.

pub mod batch;
pub mod config;

pub use batch::{BatchReport, BatchTranscoder, FileOutcome, FileStatus};
