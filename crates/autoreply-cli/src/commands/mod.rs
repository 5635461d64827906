pub mod completions;
pub mod config;
pub mod detect;
pub mod init;
pub mod lint;
pub mod render;
pub mod simulate;
pub mod variables;

use std::path::PathBuf;

use anyhow::Result;
use autoreply_config::Config;
use autoreply_core::TemplateRenderer;
use autoreply_engine::{ConditionEvaluator, Responder};
use autoreply_sources::FileSource;
use serde::Serialize;

/// Rulebook from `--rulebook`, falling back to the configured one.
pub fn rulebook_source(arg: Option<PathBuf>, config: &Config) -> Result<FileSource> {
    let path = arg.or_else(|| config.rulebook.clone()).ok_or_else(|| {
        anyhow::anyhow!("No rulebook given: pass --rulebook or set `rulebook` in the config file")
    })?;
    tracing::debug!("Using rulebook {}", path.display());
    Ok(FileSource::new(path)?)
}

/// Evaluator settings from `[engine]` and the catalog from `[catalog]`.
pub fn responder(config: &Config) -> Result<Responder> {
    let evaluator =
        ConditionEvaluator::new().with_regex_size_limit(config.engine.regex_size_limit);
    let renderer = TemplateRenderer::new(config.catalog.build()?);
    Ok(Responder::new(evaluator, renderer)
        .require_active_template(config.engine.require_active_template))
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
