mod cli;
mod commands;

use anyhow::Result;
use autoreply_config::Config;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Initialize tracing; logs go to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Simulate(args) => commands::simulate::handle(args, &config),
        cli::Commands::Render(args) => commands::render::handle(args, &config),
        cli::Commands::Detect { content, format } => {
            commands::detect::handle(&content, format, &config)
        }
        cli::Commands::Variables { format } => commands::variables::handle(format, &config),
        cli::Commands::Lint { rulebook, format } => {
            commands::lint::handle(rulebook, format, &config)
        }
        cli::Commands::Init { path, force } => commands::init::handle(&path, force),
        cli::Commands::Config => commands::config::handle(cli.config.as_deref(), &config),
        cli::Commands::Completions { shell } => {
            commands::completions::handle(shell);
            Ok(())
        }
    }
}
