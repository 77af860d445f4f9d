use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the docs root.
pub const CONFIG_FILE_NAME: &str = "docsmith.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidExcludePattern {
        pattern: String,
        source: glob::PatternError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_docs_path")]
    pub docs_path: PathBuf,

    /// Glob patterns, relative to `docs_path`, of files the build skips.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Parse worker count; defaults to the available parallelism.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_workers: Option<usize>,

    /// Treat warnings as build failures.
    #[serde(default)]
    pub strict: bool,

    /// Product keys accepted in applies-to definitions on top of the built-in ones.
    #[serde(default)]
    pub products: Vec<String>,

    /// Cross-link scheme to base URL, e.g. `kibana = "https://docs.example.com/kibana/"`.
    #[serde(default)]
    pub cross_links: BTreeMap<String, String>,

    /// Absolute URL prefix that marks a link as pointing at the legacy docs site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_url_prefix: Option<String>,

    /// Values for `{{key}}` substitutions. Keys match case-insensitively.
    #[serde(default)]
    pub substitutions: BTreeMap<String, String>,
}

fn default_docs_path() -> PathBuf {
    PathBuf::from(".")
}

impl Config {
    pub fn new(docs_path: impl Into<PathBuf>) -> Self {
        Self {
            docs_path: docs_path.into(),
            exclude: Vec::new(),
            max_workers: None,
            strict: false,
            products: Vec::new(),
            cross_links: BTreeMap::new(),
            legacy_url_prefix: None,
            substitutions: BTreeMap::new(),
        }
    }

    /// Loads a config file. A missing file is not an error.
    ///
    /// A relative `docs_path` is resolved against the directory holding the file.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded docs path
        config.docs_path = Self::expand_path(&config.docs_path).unwrap_or(config.docs_path);
        if config.docs_path.is_relative()
            && let Some(parent) = config_path.parent()
        {
            config.docs_path = parent.join(&config.docs_path);
        }

        config.exclude_patterns()?;

        Ok(Some(config))
    }

    /// Loads `docsmith.toml` from `docs_root`, falling back to defaults rooted there.
    pub fn load_or_default(docs_root: &Path) -> Result<Self, ConfigError> {
        Ok(Self::load_from_path(Self::config_path(docs_root))?
            .unwrap_or_else(|| Self::new(docs_root)))
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path(docs_root: &Path) -> PathBuf {
        docs_root.join(CONFIG_FILE_NAME)
    }

    pub fn exclude_patterns(&self) -> Result<Vec<Pattern>, ConfigError> {
        self.exclude
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|source| ConfigError::InvalidExcludePattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect()
    }

    /// `relative_path` uses forward slashes, relative to `docs_path`.
    pub fn is_excluded(&self, relative_path: &str) -> bool {
        self.exclude
            .iter()
            .filter_map(|pattern| Pattern::new(pattern).ok())
            .any(|pattern| pattern.matches(relative_path))
    }

    pub fn worker_count(&self) -> usize {
        self.max_workers
            .or_else(|| std::thread::available_parallelism().ok().map(usize::from))
            .unwrap_or(1)
            .max(1)
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
