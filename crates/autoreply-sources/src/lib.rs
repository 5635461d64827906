//! Rulebook sources
//!
//! Templates and rules live in the application's database; this crate reads
//! snapshots of them from files or strings for tools and tests.

pub mod error;
pub mod file;
pub mod handler;
pub mod text;

pub use error::{Result, SourceError};
pub use file::FileSource;
pub use handler::{RulebookFormat, RulebookSource};
pub use text::InlineSource;

/// Starter rulebook written by `autoreply init`.
pub const STARTER_RULEBOOK: &str = include_str!("../starter/rulebook.toml");
