//! `draft`: the application deployment tool for Kubernetes.
use std::process::ExitCode;

use draft_cli::dispatch::Dispatcher;
use draft_cli::env::Environment;
use draft_cli::tree::CommandTree;

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();

    // Plugin discovery appends to the tree here, before dispatch takes ownership.
    let tree = CommandTree::build();
    let dispatcher = Dispatcher::new(tree, Environment::capture()).with_subscriber();

    let code = dispatcher.run(
        std::env::args_os(),
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    );
    ExitCode::from(code)
}
