//! Domain-specific error types for the draft bootstrap layer.
//!
//! Internal modules return typed errors ([`ConfigError`], [`CommandError`])
//! while the dispatcher converts them to [`anyhow::Error`] at the CLI
//! boundary via the standard `?` operator. Errors returned by a command body
//! are plain [`anyhow::Error`] values and are propagated verbatim.
//!
//! # Error hierarchy
//!
//! ```text
//! DraftError
//! ├── Config(ConfigError)   : config file I/O and decoding
//! └── Command(CommandError) : argument shape and command registration
//! ```

use thiserror::Error;

/// Top-level error type for the draft bootstrap layer.
#[derive(Error, Debug)]
pub enum DraftError {
    /// Configuration-related error (I/O, decoding, persisting).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Command-tree error (argument count, name collision).
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Errors that arise from loading or persisting `$DRAFT_HOME/config.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file exists but could not be opened or read.
    #[error("could not open file {path}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file was read but is not a flat table of string values.
    #[error("could not decode config {path}: {message}")]
    Format {
        /// Path to the file that could not be decoded.
        path: String,
        /// Human-readable decoder message.
        message: String,
    },

    /// The config file could not be written.
    #[error("could not write config {path}")]
    Write {
        /// Path to the file that could not be written.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise from the shape of the command tree or of an invocation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    /// A command received the wrong number of positional arguments.
    #[error("this command needs {} argument(s): {expected:?}, got {actual}", expected.len())]
    ArgumentCount {
        /// Names of the positional arguments the command expects.
        expected: Vec<String>,
        /// Number of positional arguments actually supplied.
        actual: usize,
    },

    /// A command with the same name is already attached to the same parent.
    #[error("command '{name}' is already registered under '{parent}'")]
    NameCollision {
        /// Name of the rejected command.
        name: String,
        /// Name of the parent node the command was attached to.
        parent: String,
    },
}
