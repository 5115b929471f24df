//! Global command-line options shared by every command.
use clap::{ArgMatches, Args, FromArgMatches as _};

/// Short description shown by `draft --help`.
pub const ABOUT: &str = "The application deployment tool for Kubernetes.";

/// Options shared across all commands.
///
/// The command tree is assembled at runtime, so these are merged into the
/// root [`clap::Command`] with [`GlobalOpts::augment`] instead of a derived
/// top-level parser.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalOpts {
    /// Location of your Draft config. Overrides $DRAFT_HOME
    #[arg(long, global = true, value_name = "PATH")]
    pub home: Option<String>,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub debug: bool,
}

impl GlobalOpts {
    /// Register the global flags on `cmd`.
    #[must_use]
    pub fn augment(cmd: clap::Command) -> clap::Command {
        Self::augment_args(cmd)
    }

    /// Extract the global flags from parsed matches.
    ///
    /// # Errors
    ///
    /// Returns an error if `matches` was not produced by a command
    /// registered through [`GlobalOpts::augment`].
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        Self::from_arg_matches(matches)
    }
}
