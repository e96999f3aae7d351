//! The batch sweep: list candidates, transcode each one, delete the source on
//! success.
//!
//! Files are handled one at a time. A failure on one file is recorded in the
//! [`BatchReport`] and the sweep moves on; only a missing source directory or
//! an invalid configuration aborts the run.

pub mod report;
pub mod scan;

pub use report::{BatchReport, FileOutcome, FileStatus};
pub use scan::{CandidateFile, Candidates, ExtensionFilter, Scan};

use std::fs;
use std::sync::Arc;

use tracing::{debug, info, warn};
use vidsweep_av::Transcoder;
use vidsweep_core::config::BatchConfig;
use vidsweep_core::{Error, Result};

/// Sweeps one directory with a [`Transcoder`].
pub struct BatchTranscoder {
    config: BatchConfig,
    transcoder: Arc<dyn Transcoder>,
    dry_run: bool,
}

impl BatchTranscoder {
    pub fn new(config: BatchConfig, transcoder: Arc<dyn Transcoder>) -> Self {
        let config = BatchConfig::new(&config.source_dir, &config.from_ext, &config.to_ext);
        Self {
            config,
            transcoder,
            dry_run: false,
        }
    }

    /// List what would be converted without running the tool or touching
    /// any file.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub fn scan(&self) -> Scan {
        Scan::new(
            &self.config.source_dir,
            ExtensionFilter::new(&self.config.from_ext, &self.config.to_ext),
        )
    }

    /// Run one pass over the source directory.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] for an unusable extension pair and
    /// [`Error::DirectoryNotFound`] when the source directory cannot be
    /// listed. Both are raised before any file is touched. Per-file failures
    /// are reported in the returned [`BatchReport`].
    pub async fn run(&self) -> Result<BatchReport> {
        self.config.validate()?;
        let candidates = self.scan().candidates()?;

        info!(
            "sweeping {} ({} -> {}) with {}",
            self.config.source_dir.display(),
            self.config.from_ext,
            self.config.to_ext,
            self.transcoder.name()
        );

        let mut report = BatchReport::new(
            self.config.source_dir.clone(),
            &self.config.from_ext,
            &self.config.to_ext,
            self.dry_run,
        );

        for candidate in candidates {
            let outcome = if self.dry_run {
                debug!("would convert {}", candidate.path.display());
                FileOutcome {
                    input: candidate.path,
                    output: candidate.output,
                    status: FileStatus::Planned,
                }
            } else {
                self.process(candidate).await
            };
            report.record(outcome);
        }

        report.finish();
        info!(
            "batch finished: matched {}, converted {}, deleted {}, failed {}",
            report.matched(),
            report.converted(),
            report.deleted(),
            report.failed()
        );
        Ok(report)
    }

    /// Transcode one candidate and remove its source if that worked.
    async fn process(&self, candidate: CandidateFile) -> FileOutcome {
        let status = match self.convert(&candidate).await {
            Ok(()) => match fs::remove_file(&candidate.path) {
                Ok(()) => {
                    info!("converted {}", candidate.output.display());
                    FileStatus::Converted
                }
                Err(e) => {
                    let err = Error::delete_failed(&candidate.path, e);
                    warn!("{err}");
                    FileStatus::DeleteFailed {
                        error: err.to_string(),
                    }
                }
            },
            Err(err) => {
                warn!("{err}");
                remove_partial_output(&candidate);
                FileStatus::TranscodeFailed {
                    error: err.to_string(),
                }
            }
        };

        FileOutcome {
            input: candidate.path,
            output: candidate.output,
            status,
        }
    }

    /// Run the tool into the staging file, then move it over the output.
    ///
    /// A file already sitting at the output path is only replaced once a
    /// conversion has produced its successor.
    async fn convert(&self, candidate: &CandidateFile) -> Result<()> {
        info!(
            "transcoding {} -> {}",
            candidate.path.display(),
            candidate.output.display()
        );

        self.transcoder
            .transcode(&candidate.path, &candidate.staging)
            .await
            .map_err(|e| match e {
                Error::TranscodeFailed { .. } => e,
                other => Error::transcode_failed(&candidate.path, other.to_string()),
            })?;

        // The exit status says success; the source only goes once the
        // output is really there.
        if !candidate.staging.is_file() {
            return Err(Error::transcode_failed(
                &candidate.path,
                format!(
                    "{} reported success but {} was not written",
                    self.transcoder.name(),
                    candidate.output.display()
                ),
            ));
        }

        fs::rename(&candidate.staging, &candidate.output).map_err(|e| {
            Error::transcode_failed(
                &candidate.path,
                format!("cannot move output into {}: {e}", candidate.output.display()),
            )
        })
    }
}

/// Drop whatever a failed attempt left in its staging file so a re-run
/// starts clean. The output path itself is never touched here.
fn remove_partial_output(candidate: &CandidateFile) {
    if !candidate.staging.exists() {
        return;
    }
    match fs::remove_file(&candidate.staging) {
        Ok(()) => debug!("removed partial output {}", candidate.staging.display()),
        Err(e) => warn!(
            "failed to remove partial output {}: {e}",
            candidate.staging.display()
        ),
    }
}
