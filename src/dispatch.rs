//! Argument parsing, the pre-execution hook, and exit-code mapping.
use std::ffi::OsString;
use std::io::Write;

use anyhow::Result;
use clap::error::ErrorKind;

use crate::cli::GlobalOpts;
use crate::commands;
use crate::context::ExecutionContext;
use crate::env::Environment;
use crate::error::DraftError;
use crate::logging;
use crate::platform::Os;
use crate::tree::{CommandNode, CommandTree};

/// Exit code for a successful invocation.
pub const EXIT_SUCCESS: u8 = 0;
/// Exit code for any failure.
pub const EXIT_FAILURE: u8 = 1;

/// Runs one invocation of `draft` against a built [`CommandTree`].
///
/// The dispatcher owns the tree, so nothing can be attached once dispatching
/// starts.
#[derive(Debug)]
pub struct Dispatcher {
    tree: CommandTree,
    env: Environment,
    os: Os,
    install_subscriber: bool,
}

/// What a parse produced when it did not select a command to run.
enum Parsed {
    /// Help or version text that should be shown and treated as success.
    Informational(String),
    /// An invalid command line.
    Invalid(String),
}

impl Dispatcher {
    /// Create a dispatcher for `tree`, reading variables from `env` and
    /// assuming the host OS.
    #[must_use]
    pub const fn new(tree: CommandTree, env: Environment) -> Self {
        Self {
            tree,
            env,
            os: Os::detect(),
            install_subscriber: false,
        }
    }

    /// Override the OS used for default-home resolution.
    #[must_use]
    pub fn with_os(mut self, os: Os) -> Self {
        self.os = os;
        self
    }

    /// Install the global tracing subscriber during the pre-execution hook.
    #[must_use]
    pub fn with_subscriber(mut self) -> Self {
        self.install_subscriber = true;
        self
    }

    /// Parse `argv`, run the selected command, and return the exit code.
    ///
    /// Command output is written to `out`; errors and invalid-usage messages
    /// go to `err`.
    pub fn run<I, T>(&self, argv: I, out: &mut dyn Write, err: &mut dyn Write) -> u8
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = match self.tree.to_clap().try_get_matches_from(argv) {
            Ok(matches) => matches,
            Err(e) => {
                return match classify(&e) {
                    Parsed::Informational(text) => report(out, &text, EXIT_SUCCESS),
                    Parsed::Invalid(text) => report(err, &text, EXIT_FAILURE),
                };
            }
        };

        match self.dispatch(&matches, out) {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => report(err, &format!("Error: {e:#}"), EXIT_FAILURE),
        }
    }

    fn dispatch(&self, matches: &clap::ArgMatches, out: &mut dyn Write) -> Result<()> {
        let invocation = self
            .tree
            .matched(matches)?
            .ok_or_else(|| anyhow::anyhow!("no command selected"))?;
        let command = invocation.command();

        if let Some(expected) = command.expected_args() {
            commands::validate_args(&invocation.args, expected).map_err(DraftError::from)?;
        }

        let ctx = self.pre_run(&invocation.globals)?;
        tracing::debug!("running '{}'", invocation.path.join(" "));
        run_command(command, &invocation.args, &ctx, out)
    }

    /// Populate the [`ExecutionContext`] before any command body runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// decoded; the command is then not run.
    pub fn pre_run(&self, globals: &GlobalOpts) -> Result<ExecutionContext, DraftError> {
        if self.install_subscriber {
            logging::init_subscriber(logging::level_for(globals.debug));
        }
        let plugins = self.tree.attached_names();
        if !plugins.is_empty() {
            tracing::debug!("attached plugins: {}", plugins.join(", "));
        }
        tracing::debug!("resolving home for {}", self.os);
        ExecutionContext::prepare(globals, &self.env, self.os)
    }
}

fn run_command(
    command: &dyn CommandNode,
    args: &[String],
    ctx: &ExecutionContext,
    out: &mut dyn Write,
) -> Result<()> {
    command.run(args, ctx, out)?;
    out.flush()?;
    Ok(())
}

fn classify(e: &clap::Error) -> Parsed {
    let text = e.render().to_string();
    match e.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => Parsed::Informational(text),
        _ => Parsed::Invalid(text),
    }
}

/// Write `text` to `w`, ensuring a trailing newline, and return `code`.
fn report(w: &mut dyn Write, text: &str, code: u8) -> u8 {
    let result = if text.ends_with('\n') {
        w.write_all(text.as_bytes())
    } else {
        writeln!(w, "{text}")
    };
    if result.is_err() {
        return EXIT_FAILURE;
    }
    code
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use crate::env;

    /// Records whether its body ran.
    struct Probe {
        ran: Arc<AtomicBool>,
        fail: bool,
    }

    impl CommandNode for Probe {
        fn name(&self) -> &'static str {
            "probe"
        }
        fn about(&self) -> &'static str {
            "test probe"
        }
        fn expected_args(&self) -> Option<&[&str]> {
            Some(&["first", "second"])
        }
        fn run(
            &self,
            args: &[String],
            _ctx: &ExecutionContext,
            out: &mut dyn Write,
        ) -> Result<()> {
            self.ran.store(true, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("probe exploded");
            }
            writeln!(out, "{}", args.join(","))?;
            Ok(())
        }
    }

    struct Harness {
        home: tempfile::TempDir,
        dispatcher: Dispatcher,
        ran: Arc<AtomicBool>,
    }

    fn harness(fail: bool) -> Harness {
        let home = tempfile::tempdir().expect("tempdir");
        let ran = Arc::new(AtomicBool::new(false));
        let mut tree = CommandTree::build();
        tree.attach(Box::new(Probe {
            ran: Arc::clone(&ran),
            fail,
        }))
        .expect("attach");
        let env =
            Environment::from_pairs([(env::DRAFT_HOME, home.path().to_str().expect("utf-8"))]);
        Harness {
            home,
            dispatcher: Dispatcher::new(tree, env),
            ran,
        }
    }

    fn run(d: &Dispatcher, argv: &[&str]) -> (u8, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = d.run(argv, &mut out, &mut err);
        (
            code,
            String::from_utf8(out).expect("utf-8"),
            String::from_utf8(err).expect("utf-8"),
        )
    }

    #[test]
    fn success_exits_zero() {
        let h = harness(false);
        let (code, out, err) = run(&h.dispatcher, &["draft", "probe", "a", "b"]);
        assert_eq!(code, EXIT_SUCCESS);
        assert_eq!(out, "a,b\n");
        assert!(err.is_empty());
    }

    #[test]
    fn wrong_arity_fails_before_body() {
        let h = harness(false);
        for argv in [&["draft", "probe", "a"][..], &["draft", "probe", "a", "b", "c"]] {
            let (code, out, err) = run(&h.dispatcher, argv);
            assert_eq!(code, EXIT_FAILURE);
            assert!(out.is_empty());
            assert!(err.contains("this command needs 2 argument(s)"), "{err}");
        }
        assert!(!h.ran.load(Ordering::SeqCst));
    }

    #[test]
    fn command_error_is_printed_verbatim() {
        let h = harness(true);
        let (code, _, err) = run(&h.dispatcher, &["draft", "probe", "a", "b"]);
        assert_eq!(code, EXIT_FAILURE);
        assert_eq!(err, "Error: probe exploded\n");
    }

    #[test]
    fn config_error_stops_before_body() {
        let h = harness(false);
        let home = h.home.path();
        std::fs::write(home.join("config.toml"), "= nope").expect("write");

        let (code, _, err) = run(&h.dispatcher, &["draft", "probe", "a", "b"]);

        assert_eq!(code, EXIT_FAILURE);
        assert!(err.contains("could not decode config"), "{err}");
        assert!(!h.ran.load(Ordering::SeqCst));
    }

    #[test]
    fn unknown_command_exits_one() {
        let h = harness(false);
        let (code, out, err) = run(&h.dispatcher, &["draft", "deploy"]);
        assert_eq!(code, EXIT_FAILURE);
        assert!(out.is_empty());
        assert!(err.contains("deploy"), "{err}");
    }

    #[test]
    fn help_exits_zero() {
        let h = harness(false);
        let (code, out, _) = run(&h.dispatcher, &["draft", "--help"]);
        assert_eq!(code, EXIT_SUCCESS);
        assert!(out.contains("The application deployment tool for Kubernetes."));
        assert!(out.contains("probe"));
    }

    #[test]
    fn bare_invocation_shows_help() {
        let h = harness(false);
        let (code, out, _) = run(&h.dispatcher, &["draft"]);
        assert_eq!(code, EXIT_SUCCESS);
        assert!(out.contains("Usage"), "{out}");
    }

    #[test]
    fn pre_run_respects_home_flag() {
        let h = harness(false);
        let other = tempfile::tempdir().expect("tempdir");
        let globals = GlobalOpts {
            home: Some(other.path().to_str().expect("utf-8").to_string()),
            debug: true,
        };

        let ctx = h.dispatcher.pre_run(&globals).expect("pre_run");

        assert_eq!(ctx.home().as_path(), other.path());
        assert!(ctx.debug());
    }
}
