use anyhow::Result;
use autoreply_config::Config;
use autoreply_core::{RenderContext, Template};
use autoreply_sources::RulebookSource;

use crate::cli::RenderArgs;
use crate::commands::{responder, rulebook_source};

pub fn handle(args: RenderArgs, config: &Config) -> Result<()> {
    let responder = responder(config)?;
    let values: RenderContext = args.vars.into_iter().collect();

    let template = match (args.template, args.content) {
        (Some(id), _) => {
            let rulebook = rulebook_source(args.rulebook, config)?.load()?;
            rulebook
                .template(&id)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Template not found: {}", id))?
        }
        (None, Some(content)) => Template::new(content, "custom"),
        (None, None) => anyhow::bail!("Pass --template or --content"),
    };

    let missing: Vec<String> = template
        .variables(responder.renderer().catalog())
        .into_iter()
        .filter(|token| {
            let name = token.trim_start_matches("{{").trim_end_matches("}}");
            !values.contains(name)
        })
        .collect();
    if !missing.is_empty() {
        eprintln!("  Warning: no value for {} (rendered empty)", missing.join(", "));
    }

    println!("{}", responder.preview(&template, &values));
    Ok(())
}
