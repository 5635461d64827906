//! Core domain models and logic for autoreply
//!
//! This crate contains:
//! - Domain models (Template, Rule, EvaluationContext, Rulebook)
//! - Variable catalog (the placeholder vocabulary)
//! - Template renderer (placeholder detection and substitution)

pub mod catalog;
pub mod context;
pub mod error;
pub mod render;
pub mod rule;
pub mod rulebook;
pub mod template;

pub use catalog::{CatalogVariable, VariableCatalog, token_for};
pub use context::{EvaluationContext, RenderContext, coerce_to_string};
pub use error::{CoreError, Result};
pub use render::{TemplateRenderer, detect_variables, render};
pub use rule::{Condition, ConditionType, NumericOperator, RawRule, Rule, TextOperator};
pub use rulebook::{RawRulebook, RejectedRule, Rulebook};
pub use template::{TEMPLATE_CATEGORIES, Template};
