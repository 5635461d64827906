use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "autoreply")]
#[command(about = "Simulate and check automatic reply rules", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config directory)
    #[arg(long, global = true, env = "AUTOREPLY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a synthetic event against a rulebook
    Simulate(SimulateArgs),

    /// Render a template from a rulebook or the command line
    Render(RenderArgs),

    /// List the catalog variables used in a piece of text
    Detect {
        /// Template text
        content: String,

        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// List the template variable catalog
    Variables {
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Check a rulebook for problems
    Lint {
        /// Rulebook file (.json or .toml)
        #[arg(long)]
        rulebook: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Write a starter rulebook
    Init {
        /// Where to write it
        #[arg(default_value = "rulebook.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Config,

    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
pub struct SimulateArgs {
    /// Rulebook file (.json or .toml); defaults to `rulebook` in config
    #[arg(long)]
    pub rulebook: Option<PathBuf>,

    /// Inbound message text
    #[arg(long)]
    pub message: Option<String>,

    /// Time elapsed since the last message
    #[arg(long)]
    pub elapsed: Option<f64>,

    /// The event is a new match
    #[arg(long)]
    pub new_match: bool,

    /// Profile attribute of the other person (repeatable)
    #[arg(long = "profile", value_name = "FIELD=VALUE", value_parser = parse_key_value)]
    pub profile: Vec<(String, String)>,

    /// Value for a template variable (repeatable)
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_key_value)]
    pub vars: Vec<(String, String)>,

    /// Show how every rule evaluated
    #[arg(long)]
    pub trace: bool,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct RenderArgs {
    /// Template id to render from the rulebook
    #[arg(long, conflicts_with = "content", required_unless_present = "content")]
    pub template: Option<String>,

    /// Raw template text to render instead
    #[arg(long)]
    pub content: Option<String>,

    /// Rulebook file (.json or .toml); defaults to `rulebook` in config
    #[arg(long)]
    pub rulebook: Option<PathBuf>,

    /// Value for a template variable (repeatable)
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_key_value)]
    pub vars: Vec<(String, String)>,
}

/// Parse `name=value`. The value may be empty or contain `=`.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got {:?}", s)),
    }
}
