//! Resolution of the draft home directory and the paths derived from it.
//!
//! The home is resolved purely from the `--home` flag, a captured
//! [`Environment`] and the host [`Os`]; nothing here touches the filesystem.
use std::fmt;
use std::path::{Path, PathBuf};

use crate::env::{self, Environment};
use crate::platform::Os;

/// Name of the directory created under the user home by default.
pub const DEFAULT_DIR_NAME: &str = ".draft";

/// Root configuration directory for draft.
///
/// Only the root is stored. Every sub-path is computed on demand so moving
/// the root keeps them consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Home(PathBuf);

impl Home {
    /// Wrap an already-resolved home path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self(root.into())
    }

    /// The home directory itself.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Join `parts` onto the home directory.
    #[must_use]
    pub fn path(&self, parts: &[&str]) -> PathBuf {
        parts.iter().fold(self.0.clone(), |acc, p| acc.join(p))
    }

    /// `$DRAFT_HOME/config.toml`
    #[must_use]
    pub fn config(&self) -> PathBuf {
        self.path(&["config.toml"])
    }

    /// `$DRAFT_HOME/plugins`
    #[must_use]
    pub fn plugins(&self) -> PathBuf {
        self.path(&["plugins"])
    }

    /// `$DRAFT_HOME/packs`
    #[must_use]
    pub fn packs(&self) -> PathBuf {
        self.path(&["packs"])
    }

    /// `$DRAFT_HOME/logs`
    #[must_use]
    pub fn logs(&self) -> PathBuf {
        self.path(&["logs"])
    }

    /// `$DRAFT_HOME/cache`
    #[must_use]
    pub fn cache(&self) -> PathBuf {
        self.path(&["cache"])
    }
}

impl fmt::Display for Home {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Compute the draft home directory.
///
/// Precedence, highest first:
///
/// 1. `flag_home` (the `--home` flag), when the user supplied it
/// 2. `$DRAFT_HOME`, when non-empty
/// 3. `<user home>/.draft`, where the user home is `$HOME`, falling back to
///    `$USERPROFILE` on Windows only
///
/// Explicit values have `$VAR` / `${VAR}` references expanded against `env`.
#[must_use]
pub fn resolve(flag_home: Option<&str>, env: &Environment, os: Os) -> PathBuf {
    if let Some(flag) = flag_home.filter(|f| !f.is_empty()) {
        return PathBuf::from(expand_vars(flag, env));
    }
    if let Some(home) = env.get(env::DRAFT_HOME) {
        return PathBuf::from(expand_vars(home, env));
    }
    default_home(env, os)
}

/// The OS-dependent default: `<user home>/.draft`.
#[must_use]
pub fn default_home(env: &Environment, os: Os) -> PathBuf {
    let user_home = env.get(env::HOME).or_else(|| {
        if os.is_windows() {
            env.get(env::USER_PROFILE)
        } else {
            None
        }
    });
    PathBuf::from(user_home.unwrap_or_default()).join(DEFAULT_DIR_NAME)
}

/// Expand `$NAME` and `${NAME}` references in `raw` using `env`.
///
/// Unknown variables expand to the empty string. A `$` not followed by a
/// variable name, or an unterminated `${`, is kept literally.
#[must_use]
pub fn expand_vars(raw: &str, env: &Environment) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find('$') {
        let (literal, tail) = rest.split_at(pos);
        out.push_str(literal);
        let after = tail.strip_prefix('$').unwrap_or(tail);

        if let Some(braced) = after.strip_prefix('{')
            && let Some(end) = braced.find('}')
        {
            let (name, remainder) = braced.split_at(end);
            out.push_str(env.get(name).unwrap_or_default());
            rest = remainder.strip_prefix('}').unwrap_or(remainder);
            continue;
        }

        let len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        if len == 0 {
            out.push('$');
            rest = after;
            continue;
        }
        let (name, remainder) = after.split_at(len);
        out.push_str(env.get(name).unwrap_or_default());
        rest = remainder;
    }

    out.push_str(rest);
    out
}
