use std::path::Path;

use anyhow::Result;
use autoreply_config::Config;

pub fn handle(explicit: Option<&Path>, config: &Config) -> Result<()> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::config_path);
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
