//! Template renderer
//!
//! Rendering is total: it never fails, and a template without known tokens
//! comes back unchanged.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::warn;

use crate::catalog::{VariableCatalog, token_for};
use crate::context::RenderContext;

static BUILTIN_RENDERER: LazyLock<TemplateRenderer> = LazyLock::new(TemplateRenderer::default);

/// Substitutes render values into template content
#[derive(Debug, Clone, Default)]
pub struct TemplateRenderer {
    catalog: VariableCatalog,
}

impl TemplateRenderer {
    pub fn new(catalog: VariableCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &VariableCatalog {
        &self.catalog
    }

    /// Catalog tokens present in `content`, in catalog order, without duplicates.
    pub fn detect_variables(&self, content: &str) -> Vec<String> {
        self.catalog.detect(content)
    }

    /// Render `content` with `values`.
    ///
    /// Every `{{key}}` for a key in `values` is replaced by its value, and
    /// catalog tokens not covered by `values` are erased. All tokens are
    /// replaced in one pass over `content`, so a value that itself contains
    /// a token is inserted as written.
    ///
    /// Tokens outside the catalog without a value are left as written.
    pub fn render(&self, content: &str, values: &RenderContext) -> String {
        let mut replacements: Vec<(String, &str)> = values
            .iter()
            .map(|(name, value)| (token_for(name), value))
            .collect();
        replacements.extend(
            self.catalog
                .iter()
                .filter(|variable| !values.contains(&variable.name))
                .map(|variable| (variable.token(), "")),
        );
        replacements.retain(|(token, _)| content.contains(token.as_str()));
        if replacements.is_empty() {
            return content.to_string();
        }

        // longest first, so a token never loses to one of its prefixes
        replacements.sort_by_key(|(token, _)| std::cmp::Reverse(token.len()));
        let alternation = replacements
            .iter()
            .map(|(token, _)| regex::escape(token))
            .collect::<Vec<_>>()
            .join("|");

        match Regex::new(&alternation) {
            Ok(pattern) => pattern
                .replace_all(content, |captures: &Captures| {
                    let matched = &captures[0];
                    replacements
                        .iter()
                        .find(|(token, _)| token == matched)
                        .map_or(matched, |(_, value)| *value)
                        .to_string()
                })
                .into_owned(),
            Err(e) => {
                warn!("Falling back to sequential substitution: {}", e);
                replacements
                    .iter()
                    .fold(content.to_string(), |text, (token, value)| text.replace(token, value))
            }
        }
    }
}

/// Render with the built-in catalog.
pub fn render(content: &str, values: &RenderContext) -> String {
    BUILTIN_RENDERER.render(content, values)
}

/// Detect built-in catalog tokens in `content`.
pub fn detect_variables(content: &str) -> Vec<String> {
    BUILTIN_RENDERER.detect_variables(content)
}
