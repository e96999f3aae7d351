//! Per-file outcomes and the end-of-run summary.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// What happened to one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// Transcoded and the source removed.
    Converted,
    /// Dry run: would have been transcoded.
    Planned,
    /// The tool failed; the source is untouched.
    TranscodeFailed { error: String },
    /// The output was written but the source could not be removed.
    DeleteFailed { error: String },
}

impl FileStatus {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            FileStatus::TranscodeFailed { .. } | FileStatus::DeleteFailed { .. }
        )
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FileStatus::TranscodeFailed { error } | FileStatus::DeleteFailed { error } => {
                Some(error)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
}

/// Everything one batch did.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub source_dir: PathBuf,
    pub from_ext: String,
    pub to_ext: String,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub files: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn new(source_dir: PathBuf, from_ext: &str, to_ext: &str, dry_run: bool) -> Self {
        Self {
            source_dir,
            from_ext: from_ext.to_string(),
            to_ext: to_ext.to_string(),
            dry_run,
            started_at: Utc::now(),
            finished_at: None,
            files: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: FileOutcome) {
        self.files.push(outcome);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Number of candidates seen.
    pub fn matched(&self) -> usize {
        self.files.len()
    }

    /// Files whose transcode succeeded, whether or not the source went away.
    pub fn converted(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Converted | FileStatus::DeleteFailed { .. }))
    }

    pub fn deleted(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Converted))
    }

    pub fn planned(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Planned))
    }

    pub fn transcode_failures(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::TranscodeFailed { .. }))
    }

    pub fn delete_failures(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::DeleteFailed { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(FileStatus::is_failure)
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files.iter().filter(|f| f.status.is_failure())
    }

    /// True when no file failed (an empty batch is a success).
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.status)).count()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry_run {
            writeln!(
                f,
                "[DRY RUN] {} file(s) in {} would be converted ({} -> {})",
                self.planned(),
                self.source_dir.display(),
                self.from_ext,
                self.to_ext
            )?;
            for file in &self.files {
                writeln!(f, "  {} -> {}", file.input.display(), file.output.display())?;
            }
            return Ok(());
        }

        writeln!(
            f,
            "matched {}, converted {}, deleted {}, failed {}",
            self.matched(),
            self.converted(),
            self.deleted(),
            self.failed()
        )?;
        for file in self.failures() {
            writeln!(
                f,
                "  FAILED {}: {}",
                file.input.display(),
                file.status.error().unwrap_or_default()
            )?;
        }
        Ok(())
    }
}
