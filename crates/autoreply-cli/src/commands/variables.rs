use anyhow::Result;
use autoreply_config::Config;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::commands::print_json;

#[derive(Serialize)]
struct CatalogEntry {
    token: String,
    description: String,
}

#[derive(Serialize)]
struct CatalogListing {
    fingerprint: String,
    variables: Vec<CatalogEntry>,
}

pub fn handle(format: OutputFormat, config: &Config) -> Result<()> {
    let catalog = config.catalog.build()?;

    match format {
        OutputFormat::Json => print_json(&CatalogListing {
            fingerprint: catalog.fingerprint(),
            variables: catalog
                .iter()
                .map(|v| CatalogEntry {
                    token: v.token(),
                    description: v.description.clone(),
                })
                .collect(),
        }),
        OutputFormat::Text => {
            println!("Template variables:");
            for variable in catalog.iter() {
                println!("  {:<22} {}", variable.token(), variable.description);
            }
            println!();
            println!("Catalog fingerprint: {}", catalog.fingerprint());
            Ok(())
        }
    }
}
