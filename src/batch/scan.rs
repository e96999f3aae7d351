//! Candidate discovery.
//!
//! A [`Scan`] owns the directory and extension pair; every call to
//! [`Scan::candidates`] re-reads the directory, so a scan can be walked any
//! number of times. Only the top level is listed.

use std::fs::{self, ReadDir};
use std::path::{Path, PathBuf};

use vidsweep_core::config::normalize_ext;
use vidsweep_core::{Error, Result};

/// A file eligible for transcoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    /// Where the converted file goes: same directory, suffix swapped.
    pub output: PathBuf,
    /// Hidden sibling of `output` the tool writes into. It keeps the target
    /// suffix so the tool can pick the container from it.
    pub staging: PathBuf,
}

/// Suffix match on file names plus the replacement suffix.
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    from: String,
    to: String,
}

impl ExtensionFilter {
    pub fn new(from_ext: &str, to_ext: &str) -> Self {
        Self {
            from: normalize_ext(from_ext),
            to: normalize_ext(to_ext),
        }
    }

    /// The part of `name` in front of the input suffix, or `None` if it is
    /// not a candidate.
    ///
    /// Hidden files are skipped the way a shell glob skips them, and a name
    /// that is nothing but the suffix has no stem to keep.
    fn stem<'a>(&self, name: &'a str) -> Option<&'a str> {
        if name.starts_with('.') {
            return None;
        }
        name.strip_suffix(self.from.as_str())
            .filter(|stem| !stem.is_empty())
    }

    /// The output file name for `name`, or `None` if it is not a candidate.
    pub fn output_name(&self, name: &str) -> Option<String> {
        self.stem(name).map(|stem| format!("{stem}{}", self.to))
    }

    /// The in-progress file name for `name`. Hidden, so a later scan never
    /// picks it up as a candidate.
    pub fn staging_name(&self, name: &str) -> Option<String> {
        self.stem(name).map(|stem| format!(".{stem}.partial{}", self.to))
    }

    pub fn matches(&self, name: &str) -> bool {
        self.stem(name).is_some()
    }
}

/// A restartable listing of candidates in one directory.
#[derive(Debug, Clone)]
pub struct Scan {
    dir: PathBuf,
    filter: ExtensionFilter,
}

impl Scan {
    pub fn new(dir: impl AsRef<Path>, filter: ExtensionFilter) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            filter,
        }
    }

    /// Start a fresh pass over the directory.
    ///
    /// # Errors
    ///
    /// [`Error::DirectoryNotFound`] if the directory is missing, is not a
    /// directory, or cannot be listed.
    pub fn candidates(&self) -> Result<Candidates> {
        if !self.dir.is_dir() {
            return Err(Error::directory_not_found(&self.dir));
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| {
            tracing::error!("cannot list {}: {e}", self.dir.display());
            Error::directory_not_found(&self.dir)
        })?;

        Ok(Candidates {
            entries,
            filter: self.filter.clone(),
        })
    }
}

/// Lazy iterator over the candidates of one pass.
#[derive(Debug)]
pub struct Candidates {
    entries: ReadDir,
    filter: ExtensionFilter,
}

impl Iterator for Candidates {
    type Item = CandidateFile;

    fn next(&mut self) -> Option<Self::Item> {
        for entry in self.entries.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("skipping unreadable directory entry: {e}");
                    continue;
                }
            };

            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                tracing::debug!("skipping non UTF-8 file name {:?}", file_name);
                continue;
            };
            let (Some(output_name), Some(staging_name)) =
                (self.filter.output_name(name), self.filter.staging_name(name))
            else {
                continue;
            };

            let path = entry.path();
            if !path.is_file() {
                tracing::trace!("skipping {}: not a regular file", path.display());
                continue;
            }

            let output = path.with_file_name(output_name);
            let staging = path.with_file_name(staging_name);
            return Some(CandidateFile {
                path,
                output,
                staging,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"x").unwrap();
    }

    fn names(scan: &Scan) -> Vec<String> {
        let mut names: Vec<String> = scan
            .candidates()
            .unwrap()
            .map(|c| c.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn output_name_swaps_suffix() {
        let filter = ExtensionFilter::new(".ogv", ".mp4");
        assert_eq!(
            filter.output_name("2021-03-01 10:00:00-3-r30.ogv").as_deref(),
            Some("2021-03-01 10:00:00-3-r30.mp4")
        );
        assert_eq!(filter.output_name("clip.ogv.bak"), None);
        assert_eq!(filter.output_name("clip.OGV"), None);
    }

    #[test]
    fn output_name_handles_multi_dot_suffix() {
        let filter = ExtensionFilter::new("tar.gz", "zip");
        assert_eq!(filter.output_name("a.b.tar.gz").as_deref(), Some("a.b.zip"));
    }

    #[test]
    fn staging_name_is_hidden_and_keeps_target_suffix() {
        let filter = ExtensionFilter::new(".ogv", ".mp4");
        let staging = filter.staging_name("clip.ogv").unwrap();
        assert_eq!(staging, ".clip.partial.mp4");
        assert!(!filter.matches(&staging));
        assert_eq!(filter.staging_name("clip.txt"), None);
    }

    #[test]
    fn hidden_and_bare_suffix_names_are_skipped() {
        let filter = ExtensionFilter::new("src", "out");
        assert!(!filter.matches(".src"));
        assert!(!filter.matches(".hidden.src"));
        assert!(filter.matches("a.src"));
    }

    #[test]
    fn lists_only_matching_top_level_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.src");
        touch(dir.path(), "b.src");
        touch(dir.path(), "notes.txt");
        fs::create_dir(dir.path().join("nested.src")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        touch(&dir.path().join("sub"), "deep.src");

        let scan = Scan::new(dir.path(), ExtensionFilter::new(".src", ".out"));
        assert_eq!(names(&scan), vec!["a.src", "b.src"]);
    }

    #[test]
    fn candidate_output_sits_next_to_input() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.src");

        let scan = Scan::new(dir.path(), ExtensionFilter::new(".src", ".out"));
        let candidates: Vec<CandidateFile> = scan.candidates().unwrap().collect();
        assert_eq!(
            candidates,
            vec![CandidateFile {
                path: dir.path().join("a.src"),
                output: dir.path().join("a.out"),
                staging: dir.path().join(".a.partial.out"),
            }]
        );
    }

    #[test]
    fn scan_is_restartable() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.src");

        let scan = Scan::new(dir.path(), ExtensionFilter::new(".src", ".out"));
        assert_eq!(scan.candidates().unwrap().count(), 1);
        touch(dir.path(), "b.src");
        assert_eq!(scan.candidates().unwrap().count(), 2);
    }

    #[test]
    fn missing_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        let scan = Scan::new(&missing, ExtensionFilter::new(".src", ".out"));
        let err = scan.candidates().unwrap_err();
        assert!(matches!(err, Error::DirectoryNotFound { ref path } if path == &missing));
    }

    #[test]
    fn file_instead_of_directory_is_reported() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let scan = Scan::new(file.path(), ExtensionFilter::new(".src", ".out"));
        assert!(matches!(
            scan.candidates(),
            Err(Error::DirectoryNotFound { .. })
        ));
    }
}
