//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from TOML and carries the
//! batch, tool and transcode sections. Every section defaults to the values
//! the sweep has always used, so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::Error;

/// Placeholder replaced with the input path in [`TranscodeConfig::args`].
pub const INPUT_PLACEHOLDER: &str = "{input}";
/// Placeholder replaced with the output path in [`TranscodeConfig::args`].
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub batch: BatchConfig,
    pub tools: ToolsConfig,
    pub transcode: TranscodeConfig,
}

impl Config {
    /// Check the configuration for errors that make a run impossible.
    pub fn validate(&self) -> Result<()> {
        self.batch.validate()?;
        self.transcode.validate()
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Some(ref path) = self.tools.ffmpeg_path {
            if !path.exists() {
                warnings.push(format!(
                    "tools.ffmpeg_path {} does not exist; falling back to PATH",
                    path.display()
                ));
            }
        }

        if !self.batch.source_dir.is_dir() {
            warnings.push(format!(
                "batch.source_dir {} is not an existing directory",
                self.batch.source_dir.display()
            ));
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Which files to sweep and what to turn them into.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub source_dir: PathBuf,
    pub from_ext: String,
    pub to_ext: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("incoming_to_cut/clear_to_cut/video_icp"),
            from_ext: ".ogv".into(),
            to_ext: ".mp4".into(),
        }
    }
}

impl BatchConfig {
    /// Build a config for `source_dir`, normalizing both extensions.
    pub fn new(source_dir: impl AsRef<Path>, from_ext: &str, to_ext: &str) -> Self {
        Self {
            source_dir: source_dir.as_ref().to_path_buf(),
            from_ext: normalize_ext(from_ext),
            to_ext: normalize_ext(to_ext),
        }
    }

    /// Reject extension pairs that would match nothing or re-match outputs.
    pub fn validate(&self) -> Result<()> {
        let from = normalize_ext(&self.from_ext);
        let to = normalize_ext(&self.to_ext);

        if from.len() < 2 {
            return Err(Error::Validation("batch.from_ext is empty".into()));
        }
        if to.len() < 2 {
            return Err(Error::Validation("batch.to_ext is empty".into()));
        }
        if from == to {
            return Err(Error::Validation(format!(
                "batch.from_ext and batch.to_ext are both '{from}'"
            )));
        }
        // a.mp4 -> a.x.mp4 would be picked up again by the same sweep.
        if to.ends_with(&from) {
            return Err(Error::Validation(format!(
                "batch.to_ext '{to}' ends with batch.from_ext '{from}'"
            )));
        }
        // a.mp4.mp4 -> a.mp4 lands on a name that is itself a candidate, or
        // on another source.
        if from.ends_with(&to) {
            return Err(Error::Validation(format!(
                "batch.from_ext '{from}' ends with batch.to_ext '{to}'"
            )));
        }
        if from.contains(['/', '\\']) || to.contains(['/', '\\']) {
            return Err(Error::Validation(
                "extensions must not contain path separators".into(),
            ));
        }

        Ok(())
    }
}

/// Custom locations for external tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg_path: Option<PathBuf>,
}

/// How the transcoding tool is invoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeConfig {
    /// Argument template; `{input}` and `{output}` are substituted per file.
    pub args: Vec<String>,
    /// Kill the tool after this many seconds. Unset waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            args: [
                "-hide_banner",
                "-loglevel",
                "error",
                "-y",
                "-i",
                INPUT_PLACEHOLDER,
                OUTPUT_PLACEHOLDER,
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            timeout_secs: None,
        }
    }
}

impl TranscodeConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<()> {
        for placeholder in [INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER] {
            if !self.args.iter().any(|a| a.contains(placeholder)) {
                return Err(Error::Validation(format!(
                    "transcode.args must contain {placeholder}"
                )));
            }
        }
        if self.timeout_secs == Some(0) {
            return Err(Error::Validation(
                "transcode.timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Prefix a bare extension with a dot: `ogv` becomes `.ogv`.
pub fn normalize_ext(ext: &str) -> String {
    let ext = ext.trim();
    if ext.is_empty() || ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}
