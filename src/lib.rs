//! Bootstrap layer of the `draft` application deployment tool.
//!
//! Prepares the environment every `draft` command relies on and dispatches
//! to the selected command:
//!
//! - **[`home`]**: resolve `$DRAFT_HOME` from the `--home` flag, the
//!   environment, or the OS default
//! - **[`config`]**: load `$DRAFT_HOME/config.toml`, treating a missing file
//!   as "no config yet"
//! - **[`context`]**: the per-invocation [`ExecutionContext`](context::ExecutionContext)
//! - **[`tree`]**: the command tree, with an `attach` extension point for plugins
//! - **[`dispatch`]**: parse arguments, run the pre-execution hook, map
//!   outcomes to exit codes
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod error;
pub mod home;
pub mod logging;
pub mod platform;
pub mod tree;

/// Version reported by `draft --version`.
pub const VERSION: &str = match option_env!("DRAFT_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};
