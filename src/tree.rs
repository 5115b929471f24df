//! The command tree: built-in commands plus an extension point for plugins.
use std::fmt;
use std::io::Write;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches};

use crate::cli::{self, GlobalOpts};
use crate::commands;
use crate::context::ExecutionContext;
use crate::error::CommandError;

/// Argument id under which each command's positional arguments are collected.
pub const ARGS_ID: &str = "args";

/// Root command name.
pub const ROOT_NAME: &str = "draft";

/// Subcommand clap adds to every command that has children.
pub const HELP_NAME: &str = "help";

/// A named, documented, executable unit of the command tree.
///
/// Built-in commands and externally discovered plugins both implement this
/// trait so they can be attached to the same tree.
pub trait CommandNode: Send + Sync {
    /// Name used to select this command on the command line.
    fn name(&self) -> &str;

    /// One-line description shown in help output.
    fn about(&self) -> &str;

    /// Longer description shown by `--help`.
    fn long_about(&self) -> Option<&str> {
        None
    }

    /// Names of the positional arguments this command requires.
    ///
    /// `Some(names)` demands exactly `names.len()` arguments, which is
    /// checked before [`CommandNode::run`] is called. `None` accepts any
    /// arguments, including ones that look like flags, and passes them
    /// through untouched.
    fn expected_args(&self) -> Option<&[&str]> {
        Some(&[])
    }

    /// Child commands. A node with children is a group and is never run itself.
    fn subcommands(&self) -> Vec<Box<dyn CommandNode>> {
        Vec::new()
    }

    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the command body; it is reported verbatim.
    fn run(&self, args: &[String], ctx: &ExecutionContext, out: &mut dyn Write) -> Result<()>;
}

/// A command together with its materialised children.
struct Node {
    command: Box<dyn CommandNode>,
    children: Vec<Node>,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.command.name())
            .field("children", &self.children)
            .finish()
    }
}

impl Node {
    /// Materialise `command` and all of its descendants, rejecting duplicate
    /// names among siblings.
    fn new(command: Box<dyn CommandNode>) -> Result<Self, CommandError> {
        let mut children = Vec::<Self>::new();
        for child in command.subcommands() {
            ensure_unique(&children, child.name(), command.name())?;
            children.push(Self::new(child)?);
        }
        Ok(Self { command, children })
    }

    /// Materialise a built-in command. Built-in names are fixed at compile
    /// time and covered by tests, so no collision check is made.
    fn builtin(command: Box<dyn CommandNode>) -> Self {
        let children = command.subcommands().into_iter().map(Self::builtin).collect();
        Self { command, children }
    }

    fn name(&self) -> &str {
        self.command.name()
    }

    fn to_clap(&self) -> clap::Command {
        let mut cmd =
            clap::Command::new(self.name().to_string()).about(self.command.about().to_string());
        if let Some(long) = self.command.long_about() {
            cmd = cmd.long_about(long.to_string());
        }

        if !self.children.is_empty() {
            return self
                .children
                .iter()
                .fold(cmd, |cmd, child| cmd.subcommand(child.to_clap()))
                .subcommand_required(true)
                .arg_required_else_help(true);
        }

        let args = Arg::new(ARGS_ID).action(ArgAction::Append).num_args(0..);
        match self.command.expected_args() {
            Some(names) if names.is_empty() => cmd.arg(args.hide(true)),
            Some(names) => cmd.arg(args.value_names(names.iter().map(|n| n.to_string()))),
            None => cmd.arg(args.trailing_var_arg(true).allow_hyphen_values(true)),
        }
    }
}

/// Reject `name` if a sibling already uses it or if clap reserves it under
/// any parent with children.
fn ensure_unique(siblings: &[Node], name: &str, parent: &str) -> Result<(), CommandError> {
    if name == HELP_NAME || siblings.iter().any(|n| n.name() == name) {
        return Err(CommandError::NameCollision {
            name: name.to_string(),
            parent: parent.to_string(),
        });
    }
    Ok(())
}

/// The leaf command selected by a parse, with its positional arguments.
#[derive(Debug)]
pub struct Invocation<'a> {
    /// Command names from the root's first child down to the leaf.
    pub path: Vec<&'a str>,
    /// Positional arguments supplied to the leaf.
    pub args: Vec<String>,
    /// Global flags as seen by the leaf.
    pub globals: GlobalOpts,
    node: &'a Node,
}

impl Invocation<'_> {
    /// The matched command.
    #[must_use]
    pub fn command(&self) -> &dyn CommandNode {
        self.node.command.as_ref()
    }
}

/// Root `draft` command with its static children and attached plugins.
///
/// Built-ins are attached by [`CommandTree::build`]; plugins are appended
/// afterwards through [`CommandTree::attach`]. Each node has exactly one
/// parent and names are unique among siblings.
#[derive(Debug)]
pub struct CommandTree {
    children: Vec<Node>,
    builtin_count: usize,
}

impl CommandTree {
    /// Build the root command with the built-in commands attached.
    #[must_use]
    pub fn build() -> Self {
        let children: Vec<Node> = commands::builtins().into_iter().map(Node::builtin).collect();
        let builtin_count = children.len();
        Self {
            children,
            builtin_count,
        }
    }

    /// Append an externally discovered command after the built-ins.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::NameCollision`] if a top-level command with
    /// the same name exists, or if `command` has duplicate child names. The
    /// tree is left unchanged on error.
    pub fn attach(&mut self, command: Box<dyn CommandNode>) -> Result<(), CommandError> {
        ensure_unique(&self.children, command.name(), ROOT_NAME)?;
        let node = Node::new(command)?;
        tracing::debug!("attached command '{}'", node.name());
        self.children.push(node);
        Ok(())
    }

    /// Top-level command names in attachment order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.children.iter().map(Node::name).collect()
    }

    /// Names of the commands attached through [`CommandTree::attach`].
    #[must_use]
    pub fn attached_names(&self) -> Vec<&str> {
        self.children
            .iter()
            .skip(self.builtin_count)
            .map(Node::name)
            .collect()
    }

    /// The [`clap::Command`] used to parse arguments against this tree.
    #[must_use]
    pub fn to_clap(&self) -> clap::Command {
        let root = clap::Command::new(ROOT_NAME)
            .about(cli::ABOUT)
            .long_about(cli::ABOUT)
            .version(crate::VERSION)
            .subcommand_required(true)
            .arg_required_else_help(true);
        self.children
            .iter()
            .fold(GlobalOpts::augment(root), |cmd, child| {
                cmd.subcommand(child.to_clap())
            })
    }

    /// Walk `matches` from the root down to the selected leaf command.
    ///
    /// Returns `None` if `matches` does not name a command in this tree.
    ///
    /// # Errors
    ///
    /// Returns a [`clap::Error`] if the global flags cannot be extracted.
    pub fn matched<'a>(
        &'a self,
        matches: &ArgMatches,
    ) -> Result<Option<Invocation<'a>>, clap::Error> {
        let mut siblings = &self.children;
        let mut current = matches;
        let mut path = Vec::new();
        let mut node: Option<&Node> = None;

        while let Some((name, sub)) = current.subcommand() {
            let Some(found) = siblings.iter().find(|n| n.name() == name) else {
                return Ok(None);
            };
            path.push(found.name());
            siblings = &found.children;
            current = sub;
            node = Some(found);
        }

        let Some(node) = node else {
            return Ok(None);
        };
        let args = current
            .get_many::<String>(ARGS_ID)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        let globals = GlobalOpts::from_matches(current)?;

        Ok(Some(Invocation {
            path,
            args,
            globals,
            node,
        }))
    }
}
