//! # vidsweep-av
//!
//! External tool handling for the vidsweep batch.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find the transcoding tool from
//!   config or `PATH` and report its version.
//! - **Command execution** ([`ToolCommand`]) -- async builder with optional
//!   timeout for running external processes.
//! - **Transcoding** ([`Transcoder`], [`FfmpegTranscoder`]) -- the seam the
//!   batch calls for each file, and its ffmpeg implementation.

pub mod command;
pub mod tools;
pub mod transcode;

// ---- Re-exports for convenience ----

pub use command::{ToolCommand, ToolOutput};
pub use tools::{ToolInfo, ToolRegistry, FFMPEG};
pub use transcode::{FfmpegTranscoder, Transcoder};
