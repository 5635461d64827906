use std::path::PathBuf;

use anyhow::Result;
use autoreply_config::Config;
use autoreply_engine::{Finding, Severity, lint};
use autoreply_sources::RulebookSource;

use crate::cli::OutputFormat;
use crate::commands::{print_json, responder, rulebook_source};

pub fn handle(rulebook: Option<PathBuf>, format: OutputFormat, config: &Config) -> Result<()> {
    let source = rulebook_source(rulebook, config)?;
    let rulebook = source.load()?;
    let responder = responder(config)?;

    let findings = lint(
        &rulebook,
        responder.evaluator(),
        responder.renderer().catalog(),
    );
    match format {
        OutputFormat::Json => print_json(&findings)?,
        OutputFormat::Text => {
            println!(
                "{}: {} templates, {} rules",
                source.describe(),
                rulebook.templates.len(),
                rulebook.rules.len() + rulebook.rejected.len()
            );
            if findings.is_empty() {
                println!("✓ No problems found");
            }
            for finding in &findings {
                let label = match finding.severity {
                    Severity::Error => "error",
                    Severity::Warning => "warning",
                };
                println!("  {}: [{}] {}", label, finding.subject, finding.message);
            }
        }
    }

    ensure_no_errors(&findings, &source.describe())
}

/// Fail when any finding is an error, so the process exits non-zero.
fn ensure_no_errors(findings: &[Finding], subject: &str) -> Result<()> {
    let errors = findings
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .count();
    if errors > 0 {
        anyhow::bail!("{} error(s) found in {}", errors, subject);
    }
    Ok(())
}
