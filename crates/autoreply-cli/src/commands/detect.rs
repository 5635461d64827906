use anyhow::Result;
use autoreply_config::Config;
use autoreply_engine::lint::unknown_placeholders;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::commands::{print_json, responder};

#[derive(Serialize)]
struct Detection {
    variables: Vec<String>,
    unknown: Vec<String>,
}

pub fn handle(content: &str, format: OutputFormat, config: &Config) -> Result<()> {
    let responder = responder(config)?;
    let catalog = responder.renderer().catalog();
    let detection = Detection {
        variables: responder.renderer().detect_variables(content),
        unknown: unknown_placeholders(content, catalog),
    };

    match format {
        OutputFormat::Json => print_json(&detection),
        OutputFormat::Text => {
            if detection.variables.is_empty() {
                println!("No catalog variables found.");
            } else {
                for token in &detection.variables {
                    println!("{}", token);
                }
            }
            for name in &detection.unknown {
                eprintln!("  Warning: {{{{{}}}}} is not a catalog variable", name);
            }
            Ok(())
        }
    }
}
