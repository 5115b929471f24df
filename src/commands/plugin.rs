//! Command group: manage plugins installed under `$DRAFT_HOME/plugins`.
use std::fs;
use std::io::{self, Write};

use anyhow::{Context as _, Result, bail};

use crate::context::ExecutionContext;
use crate::home::Home;
use crate::tree::CommandNode;

/// `draft plugin`
#[derive(Debug)]
pub struct PluginCommand;

impl CommandNode for PluginCommand {
    fn name(&self) -> &'static str {
        "plugin"
    }

    fn about(&self) -> &'static str {
        "add, list, or remove plugins"
    }

    fn subcommands(&self) -> Vec<Box<dyn CommandNode>> {
        vec![Box::new(PluginList), Box::new(PluginRemove)]
    }

    fn run(&self, _args: &[String], _ctx: &ExecutionContext, _out: &mut dyn Write) -> Result<()> {
        bail!("plugin requires a subcommand: list, remove")
    }
}

/// `draft plugin list`
#[derive(Debug)]
pub struct PluginList;

impl CommandNode for PluginList {
    fn name(&self) -> &'static str {
        "list"
    }

    fn about(&self) -> &'static str {
        "list installed plugins"
    }

    fn run(&self, _args: &[String], ctx: &ExecutionContext, out: &mut dyn Write) -> Result<()> {
        let names = installed(ctx.home())?;
        if names.is_empty() {
            writeln!(out, "No plugins found")?;
            return Ok(());
        }
        writeln!(out, "NAME")?;
        for name in names {
            writeln!(out, "{name}")?;
        }
        Ok(())
    }
}

/// `draft plugin remove <name>`
#[derive(Debug)]
pub struct PluginRemove;

impl CommandNode for PluginRemove {
    fn name(&self) -> &'static str {
        "remove"
    }

    fn about(&self) -> &'static str {
        "remove a plugin"
    }

    fn expected_args(&self) -> Option<&[&str]> {
        Some(&["name"])
    }

    fn run(&self, args: &[String], ctx: &ExecutionContext, out: &mut dyn Write) -> Result<()> {
        let [name] = args else {
            bail!("remove takes exactly one plugin name");
        };
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            bail!("invalid plugin name '{name}'");
        }

        let dir = ctx.home().plugins().join(name);
        if !dir.is_dir() {
            bail!("plugin '{name}' not found in {}", ctx.home().plugins().display());
        }
        fs::remove_dir_all(&dir).with_context(|| format!("Could not remove {}", dir.display()))?;

        writeln!(out, "Removed plugin: {name}")?;
        Ok(())
    }
}

/// Sorted names of the plugin directories under `home`.
///
/// A missing plugins directory means nothing is installed.
fn installed(home: &Home) -> Result<Vec<String>> {
    let plugins = home.plugins();
    let entries = match fs::read_dir(&plugins) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(e).with_context(|| format!("Could not read {}", plugins.display()));
        }
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Could not read {}", plugins.display()))?;
        if entry.path().is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
