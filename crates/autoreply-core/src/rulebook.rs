//! Rulebook: a snapshot of templates and rules evaluated together

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CoreError;
use crate::rule::{RawRule, Rule};
use crate::template::Template;

/// Rulebook as read from storage, rules still unvalidated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRulebook {
    #[serde(default)]
    pub templates: Vec<Template>,
    #[serde(default)]
    pub rules: Vec<RawRule>,
}

/// A raw rule that failed boundary validation.
///
/// Such a rule could never match, so dropping it does not change which
/// response an event resolves to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRule {
    pub raw: RawRule,
    #[serde(serialize_with = "serialize_error")]
    pub error: CoreError,
}

fn serialize_error<S: serde::Serializer>(
    error: &CoreError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Rulebook {
    pub templates: Vec<Template>,
    pub rules: Vec<Rule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedRule>,
}

impl Rulebook {
    pub fn new(templates: Vec<Template>, rules: Vec<Rule>) -> Self {
        Self {
            templates,
            rules,
            rejected: Vec::new(),
        }
    }

    /// Validate raw rules, keeping input order. Invalid rows are set aside.
    pub fn from_raw(raw: RawRulebook) -> Self {
        let mut rules = Vec::with_capacity(raw.rules.len());
        let mut rejected = Vec::new();

        for row in raw.rules {
            match Rule::try_from(row.clone()) {
                Ok(rule) => rules.push(rule),
                Err(error) => {
                    warn!("Rejected rule {}: {}", row.id, error);
                    rejected.push(RejectedRule { raw: row, error });
                }
            }
        }

        Self {
            templates: raw.templates,
            rules,
            rejected,
        }
    }

    pub fn template(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// blake3 hash of the canonical JSON of templates and valid rules.
    ///
    /// Two snapshots with the same fingerprint resolve every event the same way.
    pub fn fingerprint(&self) -> String {
        #[derive(Serialize)]
        struct Canonical<'a> {
            templates: &'a [Template],
            rules: &'a [Rule],
        }

        let canonical = Canonical {
            templates: &self.templates,
            rules: &self.rules,
        };
        // Serializing plain structs of strings and numbers cannot fail.
        let bytes = serde_json::to_vec(&canonical).unwrap_or_default();
        blake3::hash(&bytes).to_hex().to_string()
    }
}
