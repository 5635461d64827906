use std::path::{Path, PathBuf};

use autoreply_core::RawRulebook;

use crate::error::{Result, SourceError};
use crate::handler::{RulebookFormat, RulebookSource};

/// Rulebook stored in a `.json` or `.toml` file
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    format: RulebookFormat,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = RulebookFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> RulebookFormat {
        self.format
    }

    /// Write a rulebook to this file, creating parent directories.
    pub fn save(&self, rulebook: &RawRulebook) -> Result<()> {
        let content = self.format.write(rulebook)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| SourceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&self.path, content).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl RulebookSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load_raw(&self) -> Result<RawRulebook> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.format.parse(&content)
    }
}
