//! Subcommand implementations.
//!
//! Output goes through `tracing` at info level so it shares the log
//! formatter (plain or JSON) with everything else.

pub mod admin;
pub mod catalog;
pub mod order;
pub mod store;

use thiserror::Error;

use tienda_store::{ConfigError, StoreError};

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Could not render output: {0}")]
    Render(#[from] serde_yaml::Error),

    /// The admin password did not match.
    #[error("Admin password rejected")]
    Unauthorized,
}

/// Log a YAML document one line at a time.
fn emit_yaml<T: serde::Serialize>(value: &T) -> Result<(), CommandError> {
    let rendered = serde_yaml::to_string(value)?;
    for line in rendered.lines() {
        tracing::info!("{line}");
    }
    Ok(())
}
