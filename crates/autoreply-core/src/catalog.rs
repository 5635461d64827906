//! Template variable catalog
//!
//! The catalog is the authoritative set of placeholder names the renderer
//! knows about. Built-in entries come first, in a fixed order; deployments
//! may append extra entries from configuration.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Built-in variables as `(name, description)` pairs, in catalog order.
pub const BUILTIN_VARIABLES: &[(&str, &str)] = &[
    ("user_name", "Display name of the person being replied to"),
    ("user_age", "Age of the person being replied to"),
    ("user_location", "Prefecture or city of the person being replied to"),
    ("user_occupation", "Occupation of the person being replied to"),
    ("user_hobby", "Main hobby listed on the person's profile"),
    ("my_name", "Display name of the replying profile"),
    ("match_date", "Date the match was made"),
];

/// Build the placeholder token for a variable name: `user_name` → `{{user_name}}`.
pub fn token_for(name: &str) -> String {
    format!("{{{{{name}}}}}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogVariable {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl CatalogVariable {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn token(&self) -> String {
        token_for(&self.name)
    }
}

/// Read-only registry of known template variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableCatalog {
    variables: Vec<CatalogVariable>,
}

impl VariableCatalog {
    pub fn builtin() -> Self {
        Self {
            variables: BUILTIN_VARIABLES
                .iter()
                .map(|(name, description)| CatalogVariable::new(*name, *description))
                .collect(),
        }
    }

    /// Append extra variables after the built-ins.
    ///
    /// Names already in the catalog are skipped. Names must be non-empty and
    /// may not contain braces or whitespace.
    pub fn with_extra(mut self, extra: impl IntoIterator<Item = CatalogVariable>) -> Result<Self> {
        for variable in extra {
            validate_name(&variable.name)?;
            if !self.contains(&variable.name) {
                self.variables.push(variable);
            }
        }
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.iter().any(|v| v.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&CatalogVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogVariable> {
        self.variables.iter()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Catalog tokens present in `content`, in catalog order, without duplicates.
    pub fn detect(&self, content: &str) -> Vec<String> {
        self.variables
            .iter()
            .map(CatalogVariable::token)
            .filter(|token| content.contains(token.as_str()))
            .collect()
    }

    /// Stable hash of the catalog's membership and order.
    ///
    /// Descriptions are excluded: rewording a description does not change
    /// which templates render the same way.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for variable in &self.variables {
            hasher.update(variable.name.as_bytes());
            hasher.update(b"\n");
        }
        hasher.finalize().to_hex().to_string()
    }
}

impl Default for VariableCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name
            .chars()
            .any(|c| c == '{' || c == '}' || c.is_whitespace())
    {
        return Err(CoreError::InvalidVariableName(name.to_string()));
    }
    Ok(())
}
