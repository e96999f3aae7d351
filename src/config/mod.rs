pub use vidsweep_core::config::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Places searched, in order, when no `--config` is given.
const DEFAULT_PATHS: &[&str] = &[
    "./vidsweep.toml",
    "~/.config/vidsweep/config.toml",
    "/etc/vidsweep/config.toml",
];

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    prepare_config(&mut config);

    for warning in config.warnings() {
        tracing::warn!("{warning}");
    }

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    for path_str in DEFAULT_PATHS {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("using config file {:?}", path);
            return load_config(path);
        }
    }

    let mut config = Config::default();
    prepare_config(&mut config);
    Ok(config)
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub source_dir: Option<PathBuf>,
    pub from_ext: Option<String>,
    pub to_ext: Option<String>,
}

impl Overrides {
    pub fn apply(self, config: &mut Config) {
        if let Some(dir) = self.source_dir {
            config.batch.source_dir = expand_path(&dir);
        }
        if let Some(ext) = self.from_ext {
            config.batch.from_ext = normalize_ext(&ext);
        }
        if let Some(ext) = self.to_ext {
            config.batch.to_ext = normalize_ext(&ext);
        }
    }
}

fn prepare_config(config: &mut Config) {
    config.batch.source_dir = expand_path(&config.batch.source_dir);
    config.batch.from_ext = normalize_ext(&config.batch.from_ext);
    config.batch.to_ext = normalize_ext(&config.batch.to_ext);
    if let Some(ref path) = config.tools.ffmpeg_path {
        config.tools.ffmpeg_path = Some(expand_path(path));
    }
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}
