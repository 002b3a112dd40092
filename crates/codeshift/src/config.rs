//! Conversion settings.
//!
//! Example `codeshift.toml`:
//! ```toml
//! # Rewrite well-known calls (Add-Content, File.AppendAllText, ...) into
//! # the target language's idiom instead of translating them literally.
//! recognize_intents = true
//!
//! # Spaces per indentation level in the output.
//! indent = 4
//! ```

use crate::output::WriteOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Error loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Settings for one [`Converter`](crate::Converter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Run the intent pass when both languages support it.
    pub recognize_intents: bool,
    /// Spaces per indentation level.
    pub indent: usize,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            recognize_intents: true,
            indent: WriteOptions::default().indent,
        }
    }
}

impl ConvertConfig {
    /// Parse settings from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            indent: self.indent,
        }
    }
}
