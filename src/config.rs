use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::quotes::{BundledQuotes, FixedQuote, QuoteError, QuoteSource, SentenceQuotes};

/// Where session text comes from
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Quotes,
    Sentences,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub source: SourceKind,
    pub number_of_sentences: usize,
    pub live_timer: bool,
    /// tracing filter directive used when RUST_LOG is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceKind::Quotes,
            number_of_sentences: 2,
            live_timer: true,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Quote source for these settings; a custom prompt wins over everything else.
    pub fn quote_source(&self, prompt: Option<String>) -> Result<Box<dyn QuoteSource>, QuoteError> {
        if let Some(prompt) = prompt {
            return Ok(Box::new(FixedQuote(prompt)));
        }

        Ok(match self.source {
            SourceKind::Quotes => Box::new(BundledQuotes::new()?),
            SourceKind::Sentences => Box::new(SentenceQuotes::new(self.number_of_sentences)),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config io: {0}")]
    Io(#[from] io::Error),
    #[error("config serialization: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "quotype") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("quotype_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            // first run
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Config::default(),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "unreadable config, using defaults");
                return Config::default();
            }
        };

        serde_json::from_slice::<Config>(&bytes).unwrap_or_else(|err| {
            warn!(path = %self.path.display(), %err, "invalid config, using defaults");
            Config::default()
        })
    }

    fn save(&self, cfg: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
