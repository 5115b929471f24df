//! Command: scaffold a `draft.toml` for an application directory.
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context as _, Result, bail};
use serde::Serialize;

use crate::context::ExecutionContext;
use crate::tree::CommandNode;

/// File written into the application directory.
pub const MANIFEST_FILE: &str = "draft.toml";

/// Environment created for every new application.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Config key consulted for the target namespace.
pub const NAMESPACE_KEY: &str = "namespace";

#[derive(Debug, Serialize)]
struct Manifest {
    environments: BTreeMap<String, AppEnvironment>,
}

#[derive(Debug, Serialize)]
struct AppEnvironment {
    name: String,
    namespace: String,
}

/// `draft create <path>`
#[derive(Debug)]
pub struct CreateCommand;

impl CommandNode for CreateCommand {
    fn name(&self) -> &'static str {
        "create"
    }

    fn about(&self) -> &'static str {
        "transform your application into a deployable draft"
    }

    fn expected_args(&self) -> Option<&[&str]> {
        Some(&["path"])
    }

    fn run(&self, args: &[String], ctx: &ExecutionContext, out: &mut dyn Write) -> Result<()> {
        let [path] = args else {
            bail!("create takes exactly one path");
        };
        let app_dir = Path::new(path);
        let manifest_path = app_dir.join(MANIFEST_FILE);
        if manifest_path.exists() {
            bail!("{} already exists", manifest_path.display());
        }

        fs::create_dir_all(app_dir)
            .with_context(|| format!("Could not create {}", app_dir.display()))?;
        let name = app_name(app_dir)?;
        let namespace = ctx.config().get(NAMESPACE_KEY).unwrap_or("default");
        tracing::debug!("creating app '{name}' in namespace '{namespace}'");

        let manifest = Manifest {
            environments: BTreeMap::from([(
                DEFAULT_ENVIRONMENT.to_string(),
                AppEnvironment {
                    name,
                    namespace: namespace.to_string(),
                },
            )]),
        };
        let body = toml::to_string(&manifest).context("Could not encode draft.toml")?;
        fs::write(&manifest_path, body)
            .with_context(|| format!("Could not write {}", manifest_path.display()))?;

        writeln!(out, "--> Ready to sail")?;
        Ok(())
    }
}

/// Application name: the final component of the canonical directory path.
fn app_name(dir: &Path) -> Result<String> {
    let canonical = dir
        .canonicalize()
        .with_context(|| format!("Could not resolve {}", dir.display()))?;
    canonical
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("Could not derive an app name from {}", dir.display()))
}
