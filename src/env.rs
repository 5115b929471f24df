//! Snapshot of the process environment taken once at startup.
use std::collections::HashMap;

/// Overrides the draft home directory.
pub const DRAFT_HOME: &str = "DRAFT_HOME";
/// Tiller/Helm endpoint, passed through to child processes.
pub const HELM_HOST: &str = "HELM_HOST";
/// Kubernetes namespace, passed through to child processes.
pub const TILLER_NAMESPACE: &str = "TILLER_NAMESPACE";
/// Standard user home directory variable.
pub const HOME: &str = "HOME";
/// Windows fallback for [`HOME`].
pub const USER_PROFILE: &str = "USERPROFILE";

/// Immutable copy of the environment variables visible to this invocation.
///
/// Everything downstream reads variables through this value rather than
/// calling [`std::env::var`], so resolution stays pure and testable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Capture the current process environment.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    #[must_use]
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Build an environment from explicit pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up `name`, treating an empty value the same as an unset one.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_value_is_unset() {
        let env = Environment::from_pairs([(DRAFT_HOME, "")]);
        assert_eq!(env.get(DRAFT_HOME), None);
    }

    #[test]
    fn get_returns_value() {
        let env = Environment::from_pairs([(HELM_HOST, "localhost:44134")]);
        assert_eq!(env.get(HELM_HOST), Some("localhost:44134"));
        assert_eq!(env.get(TILLER_NAMESPACE), None);
    }

    #[test]
    fn capture_matches_process_environment() {
        let env = Environment::capture();
        let expected = std::env::var("PATH").ok().filter(|v| !v.is_empty());
        assert_eq!(env.get("PATH"), expected.as_deref());
    }
}
