use autoreply_core::RawRulebook;

use crate::error::Result;
use crate::handler::{RulebookFormat, RulebookSource};

/// Rulebook held in memory, e.g. received from the admin API
#[derive(Debug, Clone)]
pub struct InlineSource {
    content: String,
    format: RulebookFormat,
}

impl InlineSource {
    pub fn new(content: impl Into<String>, format: RulebookFormat) -> Self {
        Self {
            content: content.into(),
            format,
        }
    }

    pub fn json(content: impl Into<String>) -> Self {
        Self::new(content, RulebookFormat::Json)
    }

    pub fn toml(content: impl Into<String>) -> Self {
        Self::new(content, RulebookFormat::Toml)
    }
}

impl RulebookSource for InlineSource {
    fn describe(&self) -> String {
        format!("inline {:?} ({} bytes)", self.format, self.content.len())
    }

    fn load_raw(&self) -> Result<RawRulebook> {
        self.format.parse(&self.content)
    }
}
