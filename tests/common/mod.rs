//! Shared fixtures for integration tests.
//!
//! Provides fake [`Transcoder`] implementations that stand in for ffmpeg and
//! helpers for building and inspecting fixture directories.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use vidsweep_av::Transcoder;
use vidsweep_core::{Error, Result};

/// How the fake tool behaves for one file stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Write the output and report success.
    Succeed,
    /// Report failure without writing anything.
    Fail,
    /// Write a truncated output, then report failure.
    FailAfterPartialWrite,
    /// Report success without writing anything.
    SucceedWithoutOutput,
    /// Write the output, remove the input behind the batch's back, succeed.
    SucceedAndRemoveInput,
}

/// Records every call and acts according to per-stem rules.
pub struct FakeTranscoder {
    rules: Vec<(String, Behavior)>,
    calls: Mutex<Vec<PathBuf>>,
}

impl FakeTranscoder {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, stem: &str, behavior: Behavior) -> Self {
        self.rules.push((stem.to_string(), behavior));
        self
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }

    fn behavior(&self, input: &Path) -> Behavior {
        let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        self.rules
            .iter()
            .find(|(s, _)| s == stem)
            .map(|(_, b)| *b)
            .unwrap_or(Behavior::Succeed)
    }
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    fn name(&self) -> &str {
        "fake"
    }

    async fn transcode(&self, input: &Path, output: &Path) -> Result<()> {
        self.calls.lock().unwrap().push(input.to_path_buf());

        match self.behavior(input) {
            Behavior::Succeed => {
                let mut data = fs::read(input)?;
                data.extend_from_slice(b" (converted)");
                fs::write(output, data)?;
                Ok(())
            }
            Behavior::Fail => Err(Error::transcode_failed(input, "exited with exit status: 1")),
            Behavior::FailAfterPartialWrite => {
                fs::write(output, b"trunc")?;
                Err(Error::transcode_failed(input, "exited with exit status: 1"))
            }
            Behavior::SucceedWithoutOutput => Ok(()),
            Behavior::SucceedAndRemoveInput => {
                fs::write(output, b"converted")?;
                fs::remove_file(input)?;
                Ok(())
            }
        }
    }
}

/// Create `names` in `dir`, each containing its own name.
pub fn populate(dir: &Path, names: &[&str]) {
    for name in names {
        fs::write(dir.join(name), name.as_bytes()).unwrap();
    }
}

/// Sorted file names in `dir`.
pub fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

/// Write an executable shell script that plays ffmpeg: it copies its first
/// argument to its second and fails for inputs whose name contains `fail_on`.
#[cfg(unix)]
pub fn fake_tool_script(dir: &Path, fail_on: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-ffmpeg.sh");
    let script = format!(
        r#"#!/bin/sh
case "$1" in
  *{fail_on}*) echo "fake-ffmpeg: cannot decode $1" >&2; exit 1 ;;
esac
cp "$1" "$2"
"#
    );
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}
