mod env;
mod types;


pub use types::*;

use std::path::Path;

use anyhow::{Context, bail};
use sluice_core::Encoding;

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error if no routing rules are configured or the encoding is unknown.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.router.rules.is_empty() {
            bail!("router.rules must contain at least one mime type or pattern");
        }
        self.encoding()?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if `converter.encoding` is not a known encoding label.
    pub fn encoding(&self) -> anyhow::Result<Encoding> {
        self.converter
            .encoding
            .parse()
            .context("invalid converter.encoding")
    }
}
