//! Per-invocation state handed to every command.
use std::ffi::OsStr;
use std::process::Command;

use crate::cli::GlobalOpts;
use crate::config::{self, ConfigState};
use crate::env::{self, Environment};
use crate::error::DraftError;
use crate::home::{self, Home};
use crate::platform::Os;

/// Resolved home, loaded config and flags for one invocation.
///
/// Built once by the dispatcher's pre-execution hook and then only read
/// through shared references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    home: Home,
    config: ConfigState,
    debug: bool,
    helm_host: Option<String>,
    tiller_namespace: Option<String>,
}

impl ExecutionContext {
    /// Resolve the home directory and load its config.
    ///
    /// Home resolution always completes before the config is read.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::Config`] if the config file exists but cannot be
    /// read or decoded.
    pub fn prepare(
        globals: &GlobalOpts,
        environment: &Environment,
        os: Os,
    ) -> Result<Self, DraftError> {
        let home = Home::new(home::resolve(globals.home.as_deref(), environment, os));
        tracing::debug!("using home {home}");

        let config = config::load(&home)?;

        Ok(Self {
            home,
            config,
            debug: globals.debug,
            helm_host: environment.get(env::HELM_HOST).map(str::to_string),
            tiller_namespace: environment.get(env::TILLER_NAMESPACE).map(str::to_string),
        })
    }

    /// Assemble a context from parts that are already resolved.
    #[must_use]
    pub const fn new(home: Home, config: ConfigState, debug: bool) -> Self {
        Self {
            home,
            config,
            debug,
            helm_host: None,
            tiller_namespace: None,
        }
    }

    /// The resolved draft home.
    #[must_use]
    pub const fn home(&self) -> &Home {
        &self.home
    }

    /// The config loaded from the home directory.
    #[must_use]
    pub const fn config(&self) -> &ConfigState {
        &self.config
    }

    /// Whether `--debug` was given.
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }

    /// Variables exported to child processes so they observe the same home
    /// without resolving it again.
    #[must_use]
    pub fn exported_env(&self) -> Vec<(&'static str, String)> {
        let mut vars = vec![(env::DRAFT_HOME, self.home.to_string())];
        if let Some(host) = &self.helm_host {
            vars.push((env::HELM_HOST, host.clone()));
        }
        if let Some(namespace) = &self.tiller_namespace {
            vars.push((env::TILLER_NAMESPACE, namespace.clone()));
        }
        vars
    }

    /// A [`Command`] for `program` with [`exported_env`](Self::exported_env)
    /// applied.
    #[must_use]
    pub fn command(&self, program: impl AsRef<OsStr>) -> Command {
        let mut cmd = Command::new(program);
        cmd.envs(self.exported_env());
        cmd
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn globals(home: Option<&str>, debug: bool) -> GlobalOpts {
        GlobalOpts {
            home: home.map(str::to_string),
            debug,
        }
    }

    #[test]
    fn prepare_uses_flag_home_and_loads_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("config.toml"), "key = \"value\"\n").expect("write");
        let flag = dir.path().to_str().expect("utf-8 path");

        let ctx = ExecutionContext::prepare(
            &globals(Some(flag), false),
            &Environment::default(),
            Os::Linux,
        )
        .expect("prepare");

        assert_eq!(ctx.home().as_path(), dir.path());
        assert_eq!(ctx.config().get("key"), Some("value"));
        assert!(!ctx.debug());
    }

    #[test]
    fn prepare_with_missing_config_is_absent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let env = Environment::from_pairs([(env::DRAFT_HOME, dir.path().to_str().expect("utf-8"))]);

        let ctx = ExecutionContext::prepare(&globals(None, true), &env, Os::Linux).expect("prepare");

        assert_eq!(ctx.config(), &ConfigState::Absent);
        assert!(ctx.debug());
    }

    #[test]
    fn prepare_fails_on_malformed_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("config.toml"), "not = toml = here").expect("write");
        let flag = dir.path().to_str().expect("utf-8 path");

        let err = ExecutionContext::prepare(
            &globals(Some(flag), false),
            &Environment::default(),
            Os::Linux,
        )
        .expect_err("should fail");
        assert!(matches!(err, DraftError::Config(_)));
    }

    #[test]
    fn passthrough_variables_are_captured() {
        let dir = tempfile::tempdir().expect("tempdir");
        let env = Environment::from_pairs([
            (env::DRAFT_HOME, dir.path().to_str().expect("utf-8")),
            (env::HELM_HOST, "tiller:44134"),
            (env::TILLER_NAMESPACE, "kube-system"),
        ]);

        let ctx = ExecutionContext::prepare(&globals(None, false), &env, Os::Linux).expect("prepare");

        assert_eq!(
            ctx.exported_env(),
            vec![
                (env::DRAFT_HOME, dir.path().display().to_string()),
                (env::HELM_HOST, "tiller:44134".to_string()),
                (env::TILLER_NAMESPACE, "kube-system".to_string()),
            ]
        );
    }

    #[test]
    fn exported_env_always_carries_home() {
        let ctx = ExecutionContext::new(Home::new("/srv/draft"), ConfigState::Absent, false);
        assert_eq!(ctx.exported_env(), vec![(env::DRAFT_HOME, "/srv/draft".to_string())]);
    }

    #[test]
    fn command_applies_exported_env() {
        let env = Environment::from_pairs([
            (env::DRAFT_HOME, "/srv/draft"),
            (env::TILLER_NAMESPACE, "apps"),
        ]);
        let ctx = ExecutionContext::prepare(&globals(None, false), &env, Os::Linux).expect("prepare");

        let cmd = ctx.command("draft-plugin");
        let envs: Vec<(OsString, Option<OsString>)> = cmd
            .get_envs()
            .map(|(k, v)| (k.to_os_string(), v.map(OsStr::to_os_string)))
            .collect();

        assert!(envs.contains(&(OsString::from("DRAFT_HOME"), Some(OsString::from("/srv/draft")))));
        assert!(envs.contains(&(OsString::from("TILLER_NAMESPACE"), Some(OsString::from("apps")))));
        assert!(!envs.iter().any(|(k, _)| k == "HELM_HOST"));
    }
}
