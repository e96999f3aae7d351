//! The per-file transcoding seam.
//!
//! The batch only knows about [`Transcoder`]; [`FfmpegTranscoder`] is the
//! production implementation that shells out to an external tool.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use vidsweep_core::config::{TranscodeConfig, INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER};

use crate::command::ToolCommand;

/// Converts one file into another container.
///
/// Implementations must write to `output` only and never modify `input`.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Short identifier used in logs (e.g. `"ffmpeg"`).
    fn name(&self) -> &str;

    /// Convert `input` into `output`.
    ///
    /// `Ok(())` means the tool reported success.
    async fn transcode(&self, input: &Path, output: &Path) -> vidsweep_core::Result<()>;
}

/// Runs an external tool with an argument template per file.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    program: PathBuf,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl FfmpegTranscoder {
    pub fn new(program: PathBuf, config: &TranscodeConfig) -> Self {
        Self {
            program,
            args: config.args.clone(),
            timeout: config.timeout(),
        }
    }

    /// The argument list for one file with placeholders substituted.
    ///
    /// Paths are spliced in as raw OS strings, so names that are not valid
    /// UTF-8 reach the tool unchanged.
    pub fn resolve_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        self.args
            .iter()
            .map(|a| substitute(a, input, output))
            .collect()
    }
}

fn substitute(template: &str, input: &Path, output: &Path) -> OsString {
    let mut resolved = OsString::new();
    let mut rest = template;

    loop {
        let next = [(INPUT_PLACEHOLDER, input), (OUTPUT_PLACEHOLDER, output)]
            .into_iter()
            .filter_map(|(placeholder, path)| {
                rest.find(placeholder).map(|at| (at, placeholder, path))
            })
            .min_by_key(|(at, _, _)| *at);

        let Some((at, placeholder, path)) = next else {
            resolved.push(rest);
            return resolved;
        };
        resolved.push(&rest[..at]);
        resolved.push(path);
        rest = &rest[at + placeholder.len()..];
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    fn name(&self) -> &str {
        self.program
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("transcoder")
    }

    async fn transcode(&self, input: &Path, output: &Path) -> vidsweep_core::Result<()> {
        let mut cmd = ToolCommand::new(self.program.clone());
        cmd.args(self.resolve_args(input, output));
        if let Some(limit) = self.timeout {
            cmd.timeout(limit);
        }

        cmd.execute()
            .await
            .map(|_| ())
            .map_err(|e| vidsweep_core::Error::transcode_failed(input, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcoder(program: &str, args: &[&str]) -> FfmpegTranscoder {
        let config = TranscodeConfig {
            args: args.iter().map(|a| a.to_string()).collect(),
            timeout_secs: None,
        };
        FfmpegTranscoder::new(PathBuf::from(program), &config)
    }

    #[test]
    fn default_template_substitutes_paths() {
        let t = FfmpegTranscoder::new(PathBuf::from("ffmpeg"), &TranscodeConfig::default());
        let args = t.resolve_args(Path::new("/in/a.ogv"), Path::new("/in/a.mp4"));
        assert_eq!(
            args,
            vec!["-hide_banner", "-loglevel", "error", "-y", "-i", "/in/a.ogv", "/in/a.mp4"]
        );
    }

    #[test]
    fn placeholders_inside_arguments_are_replaced() {
        let t = transcoder("ffmpeg", &["-i", "file:{input}", "-f", "mp4", "file:{output}"]);
        let args = t.resolve_args(Path::new("/x/a b.ogv"), Path::new("/x/a b.mp4"));
        assert_eq!(args[1], "file:/x/a b.ogv");
        assert_eq!(args[4], "file:/x/a b.mp4");
    }

    #[test]
    fn repeated_placeholders_are_all_replaced() {
        let t = transcoder("tool", &["{input}:{output}:{input}"]);
        let args = t.resolve_args(Path::new("a.ogv"), Path::new("a.mp4"));
        assert_eq!(args, vec!["a.ogv:a.mp4:a.ogv"]);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_paths_pass_through_unchanged() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::{OsStrExt, OsStringExt};

        let dir = Path::new(OsStr::from_bytes(b"/srv/caf\xe9"));
        let t = transcoder("ffmpeg", &["-i", "{input}", "file:{output}"]);
        let args = t.resolve_args(&dir.join("a.ogv"), &dir.join("a.mp4"));

        assert_eq!(args[1].clone().into_vec(), b"/srv/caf\xe9/a.ogv");
        assert_eq!(args[2].clone().into_vec(), b"file:/srv/caf\xe9/a.mp4");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn copies_from_non_utf8_directory() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join(OsStr::from_bytes(b"caf\xe9"));
        std::fs::create_dir(&dir).unwrap();
        let input = dir.join("a.src");
        let output = dir.join("a.out");
        std::fs::write(&input, b"frames").unwrap();

        let t = transcoder("cp", &["{input}", "{output}"]);
        t.transcode(&input, &output).await.unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), b"frames");
    }

    #[test]
    fn name_is_program_file_name() {
        let t = transcoder("/opt/ffmpeg/bin/ffmpeg", &["{input}", "{output}"]);
        assert_eq!(t.name(), "ffmpeg");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn copies_with_cp() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.src");
        let output = dir.path().join("a.out");
        std::fs::write(&input, b"frames").unwrap();

        let t = transcoder("cp", &["{input}", "{output}"]);
        t.transcode(&input, &output).await.unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), b"frames");
        assert!(input.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn tool_failure_maps_to_transcode_failed() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing.src");
        let output = dir.path().join("missing.out");

        let t = transcoder("cp", &["{input}", "{output}"]);
        let err = t.transcode(&input, &output).await.unwrap_err();
        assert!(matches!(err, vidsweep_core::Error::TranscodeFailed { .. }));
        assert!(err.to_string().contains("missing.src"));
    }
}
