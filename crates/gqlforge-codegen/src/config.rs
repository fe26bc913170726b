//! `gqlforge.toml` settings for the `generate` command.
//!
//! Every key is optional; command-line flags take precedence over the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "gqlforge.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path to the SDL schema file.
    pub schema: Option<PathBuf>,
    /// Directory the generated module is written to.
    pub out: Option<PathBuf>,
    /// Name of the generated operations struct.
    pub client_name: Option<String>,
    /// Fail the run when any member could not be generated.
    pub strict: Option<bool>,
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load an explicit config, or `gqlforge.toml` in the working directory
    /// when it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    tracing::debug!("using {}", DEFAULT_CONFIG_FILE);
                    Self::from_path(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Fill unset keys from `fallback`.
    pub fn or(self, fallback: Config) -> Config {
        Config {
            schema: self.schema.or(fallback.schema),
            out: self.out.or(fallback.out),
            client_name: self.client_name.or(fallback.client_name),
            strict: self.strict.or(fallback.strict),
        }
    }
}
