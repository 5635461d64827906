//! Error types for autoreply-engine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A matched rule points at a template that was not supplied.
    #[error("Rule {rule_id} references missing template {template_id}")]
    TemplateNotFound {
        rule_id: String,
        template_id: String,
    },
}
