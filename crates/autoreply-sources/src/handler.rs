//! Rulebook source trait

use std::path::Path;

use autoreply_core::{RawRulebook, Rulebook};
use tracing::debug;

use crate::error::{Result, SourceError};

/// Serialization formats a rulebook can be stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulebookFormat {
    Json,
    Toml,
}

impl RulebookFormat {
    /// Pick a format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(RulebookFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(RulebookFormat::Toml),
            _ => Err(SourceError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn parse(&self, content: &str) -> Result<RawRulebook> {
        match self {
            RulebookFormat::Json => Ok(serde_json::from_str(content)?),
            RulebookFormat::Toml => Ok(toml::from_str(content)?),
        }
    }

    pub fn write(&self, rulebook: &RawRulebook) -> Result<String> {
        match self {
            RulebookFormat::Json => Ok(serde_json::to_string_pretty(rulebook)?),
            RulebookFormat::Toml => Ok(toml::to_string_pretty(rulebook)?),
        }
    }
}

/// Something that can hand over a rulebook snapshot
pub trait RulebookSource: Send + Sync {
    /// Where the rulebook comes from, for messages.
    fn describe(&self) -> String;

    /// Read the rulebook without validating rules.
    fn load_raw(&self) -> Result<RawRulebook>;

    /// Read the rulebook and validate its rules.
    ///
    /// Rules that fail validation are kept in [`Rulebook::rejected`].
    fn load(&self) -> Result<Rulebook> {
        let raw = self.load_raw()?;
        let rulebook = Rulebook::from_raw(raw);
        debug!(
            "Loaded {} templates, {} rules ({} rejected) from {}",
            rulebook.templates.len(),
            rulebook.rules.len(),
            rulebook.rejected.len(),
            self.describe()
        );
        Ok(rulebook)
    }
}
