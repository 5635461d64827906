use std::path::Path;

use anyhow::Result;
use autoreply_sources::{RulebookFormat, STARTER_RULEBOOK};

pub fn handle(path: &Path, force: bool) -> Result<()> {
    write_starter(path, force)?;

    println!("✓ Created {}", path.display());
    println!(
        "  Try: autoreply simulate --rulebook {} --new-match --var user_name=花子",
        path.display()
    );
    Ok(())
}

/// Write the starter rulebook in the format the extension asks for.
pub fn write_starter(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let content = match RulebookFormat::from_path(path)? {
        RulebookFormat::Toml => STARTER_RULEBOOK.to_string(),
        format @ RulebookFormat::Json => format.write(&RulebookFormat::Toml.parse(STARTER_RULEBOOK)?)?,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
