//! Message template domain model

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::catalog::VariableCatalog;

/// Template categories offered to editors, as `(key, label)` pairs.
///
/// Categories are presentation-only; the engine never branches on them.
pub const TEMPLATE_CATEGORIES: &[(&str, &str)] = &[
    ("greeting", "Greeting"),
    ("question", "Question"),
    ("follow_up", "Follow-up"),
    ("re_engagement", "Re-engagement"),
    ("closing", "Closing"),
    ("custom", "Custom"),
];

/// A message body containing zero or more catalog placeholders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub category: String,
    /// Inactive templates can still be previewed.
    #[serde(default)]
    pub is_active: bool,
    #[serde(
        default,
        with = "time::serde::timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<OffsetDateTime>,
}

impl Template {
    pub fn new(content: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            category: category.into(),
            is_active: true,
            updated_at: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Catalog tokens used by this template, in catalog order.
    pub fn variables(&self, catalog: &VariableCatalog) -> Vec<String> {
        catalog.detect(&self.content)
    }

    /// Human label of the category, falling back to the raw key.
    pub fn category_label(&self) -> &str {
        TEMPLATE_CATEGORIES
            .iter()
            .find(|(key, _)| *key == self.category)
            .map(|(_, label)| *label)
            .unwrap_or(&self.category)
    }
}
