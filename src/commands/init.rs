//! Command: set up the draft home directory.
use std::fs;
use std::io::Write;

use anyhow::{Context as _, Result};

use crate::config::{self, Config};
use crate::context::ExecutionContext;
use crate::tree::CommandNode;

/// `draft init`
///
/// Creates the home directory layout and an empty `config.toml`. Running it
/// again leaves existing directories and settings untouched.
#[derive(Debug)]
pub struct InitCommand;

impl CommandNode for InitCommand {
    fn name(&self) -> &'static str {
        "init"
    }

    fn about(&self) -> &'static str {
        "initialize Draft on the local machine"
    }

    fn long_about(&self) -> Option<&str> {
        Some(
            "This command sets up local configuration in $DRAFT_HOME (default ~/.draft/) \
             with the directories draft and its plugins expect.",
        )
    }

    fn run(&self, _args: &[String], ctx: &ExecutionContext, out: &mut dyn Write) -> Result<()> {
        let home = ctx.home();

        for dir in [
            home.as_path().to_path_buf(),
            home.plugins(),
            home.packs(),
            home.logs(),
            home.cache(),
        ] {
            if dir.is_dir() {
                continue;
            }
            tracing::debug!("creating {}", dir.display());
            fs::create_dir_all(&dir)
                .with_context(|| format!("Could not create {}", dir.display()))?;
        }

        if ctx.config().is_loaded() || home.config().exists() {
            tracing::debug!("keeping existing {}", home.config().display());
        } else {
            tracing::debug!("creating {}", home.config().display());
            config::save(home, &Config::default())?;
        }

        writeln!(out, "$DRAFT_HOME has been configured at {home}.")?;
        writeln!(out, "Happy Sailing!")?;
        Ok(())
    }
}
