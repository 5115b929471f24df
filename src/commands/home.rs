//! Command: print the draft home directory.
use std::io::Write;

use anyhow::Result;

use crate::context::ExecutionContext;
use crate::tree::CommandNode;

/// `draft home`
#[derive(Debug)]
pub struct HomeCommand;

impl CommandNode for HomeCommand {
    fn name(&self) -> &'static str {
        "home"
    }

    fn about(&self) -> &'static str {
        "print the location of DRAFT_HOME"
    }

    fn long_about(&self) -> Option<&str> {
        Some(
            "This command displays the location of DRAFT_HOME. \
             This is where any draft configuration files live.",
        )
    }

    fn run(&self, _args: &[String], ctx: &ExecutionContext, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "{}", ctx.home())?;
        Ok(())
    }
}
