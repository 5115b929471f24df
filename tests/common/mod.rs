// Shared helpers for integration tests.
//
// Provides a temporary directory standing in for the user's home and a
// fluent builder so each integration test can set up an isolated draft home
// and environment without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use draft_cli::dispatch::Dispatcher;
use draft_cli::env::{self, Environment};
use draft_cli::platform::Os;
use draft_cli::tree::CommandTree;

/// Result of one dispatched invocation.
#[derive(Debug)]
pub struct Outcome {
    /// Exit code returned by the dispatcher.
    pub code: u8,
    /// Everything written to stdout.
    pub stdout: String,
    /// Everything written to stderr.
    pub stderr: String,
}

/// An isolated user home backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct TestHome {
    /// Temporary directory acting as `$HOME`.
    pub root: tempfile::TempDir,
    vars: Vec<(String, String)>,
    os: Os,
}

impl TestHome {
    /// Create a home with only `$HOME` set.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let home = root.path().to_str().expect("utf-8 temp dir").to_string();
        Self {
            root,
            vars: vec![(env::HOME.to_string(), home)],
            os: Os::Linux,
        }
    }

    /// Path standing in for the user's home directory.
    pub fn user_home(&self) -> &Path {
        self.root.path()
    }

    /// The draft home resolved by default: `<user home>/.draft`.
    pub fn default_draft_home(&self) -> PathBuf {
        self.root.path().join(".draft")
    }

    /// Set an additional environment variable.
    pub fn with_var(mut self, name: &str, value: &str) -> Self {
        self.vars.push((name.to_string(), value.to_string()));
        self
    }

    /// Resolve the default home as if running on `os`.
    pub fn on(mut self, os: Os) -> Self {
        self.os = os;
        self
    }

    /// Write `content` to `<default draft home>/config.toml`.
    pub fn with_config(self, content: &str) -> Self {
        let dir = self.default_draft_home();
        std::fs::create_dir_all(&dir).expect("create draft home");
        std::fs::write(dir.join("config.toml"), content).expect("write config");
        self
    }

    /// Captured environment for this home.
    pub fn environment(&self) -> Environment {
        Environment::from_pairs(self.vars.clone())
    }

    /// Dispatch `args` (without the program name) against the built-in tree.
    pub fn run(&self, args: &[&str]) -> Outcome {
        self.run_tree(CommandTree::build(), args)
    }

    /// Dispatch `args` (without the program name) against `tree`.
    pub fn run_tree(&self, tree: CommandTree, args: &[&str]) -> Outcome {
        let dispatcher = Dispatcher::new(tree, self.environment()).with_os(self.os);
        let argv: Vec<&str> = std::iter::once("draft").chain(args.iter().copied()).collect();
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = dispatcher.run(argv, &mut stdout, &mut stderr);
        Outcome {
            code,
            stdout: String::from_utf8(stdout).expect("utf-8 stdout"),
            stderr: String::from_utf8(stderr).expect("utf-8 stderr"),
        }
    }
}
