//! Process environment capture and the project-local `.env` scan.
//!
//! Settings resolution reads `CTW_*` variables and the working directory. Both
//! are captured once into an [`Environment`] so resolution never touches the
//! live process environment and tests can supply their own.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Prefix shared by every environment variable ctw reads.
pub const ENV_PREFIX: &str = "CTW_";

/// Variable naming the active profile.
pub const DEFAULT_TRACKER_VAR: &str = "CTW_DEFAULT_TRACKER";

/// Variable naming the backend, also the only key read from `.env`.
pub const PROVIDER_VAR: &str = "CTW_PROVIDER";

/// Variable overriding the configuration file path.
pub const CONFIG_PATH_VAR: &str = "CTW_CONFIG";

/// Name of the project-local override file.
const ENV_FILE_NAME: &str = ".env";

/// Returns the environment variable that maps to a settings field.
///
/// # Examples
///
/// ```
/// use ctw_config::env::env_key;
///
/// assert_eq!(env_key("linear_api_key"), "CTW_LINEAR_API_KEY");
/// ```
#[must_use]
pub fn env_key(field: &str) -> String {
    format!("{ENV_PREFIX}{}", field.to_ascii_uppercase())
}

/// A snapshot of the `CTW_*` variables and the working directory.
///
/// # Examples
///
/// ```
/// use ctw_config::Environment;
///
/// let env = Environment::new("/tmp/project")
///     .with_var("CTW_PROVIDER", "github")
///     .with_var("CTW_GITHUB_TOKEN", "");
/// assert_eq!(env.get("CTW_PROVIDER"), Some("github"));
/// // Empty values count as unset.
/// assert_eq!(env.get("CTW_GITHUB_TOKEN"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
    cwd: PathBuf,
}

impl Environment {
    /// Creates an environment with no variables, rooted at `cwd`.
    #[must_use]
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            vars: BTreeMap::new(),
            cwd: cwd.into(),
        }
    }

    /// Captures the `CTW_*` variables and working directory of this process.
    #[must_use]
    pub fn capture() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let vars = std::env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect();
        Self { vars, cwd }
    }

    /// Adds or replaces a variable.
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Returns a variable's value, treating empty strings as unset.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// The working directory `.env` is read from.
    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }
}

/// Reads `CTW_PROVIDER` from `.env` in `dir` by scanning lines.
///
/// This deliberately bypasses the settings machinery: it runs while deciding
/// which profile to load, before any profile can be validated. Surrounding
/// quotes are stripped. A missing or unreadable file, or an empty value,
/// yields `None`.
#[must_use]
pub fn read_env_file_provider(dir: &Path) -> Option<String> {
    let path = dir.join(ENV_FILE_NAME);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                debug!(path = %path.display(), error = %e, "ignoring unreadable .env");
            }
            return None;
        }
    };

    let prefix = format!("{PROVIDER_VAR}=");
    content
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix(prefix.as_str()))
        .map(|value| value.trim().trim_matches(['"', '\'']).to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_env(content: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".env"), content).unwrap();
        dir
    }

    #[test]
    fn env_file_missing() {
        let dir = TempDir::new().unwrap();
        assert_eq!(read_env_file_provider(dir.path()), None);
    }

    #[test]
    fn env_file_plain_value() {
        let dir = write_env("CTW_GITHUB_REPO=jdoss/quickvm\nCTW_PROVIDER=github\n");
        assert_eq!(read_env_file_provider(dir.path()).as_deref(), Some("github"));
    }

    #[test]
    fn env_file_quoted_and_indented() {
        let dir = write_env("  CTW_PROVIDER = \"linear\"\n");
        // The key must be immediately followed by '='.
        assert_eq!(read_env_file_provider(dir.path()), None);

        let dir = write_env("  CTW_PROVIDER=\"linear\"  \n");
        assert_eq!(read_env_file_provider(dir.path()).as_deref(), Some("linear"));

        let dir = write_env("CTW_PROVIDER='work'\n");
        assert_eq!(read_env_file_provider(dir.path()).as_deref(), Some("work"));
    }

    #[test]
    fn env_file_first_match_wins() {
        let dir = write_env("CTW_PROVIDER=github\nCTW_PROVIDER=linear\n");
        assert_eq!(read_env_file_provider(dir.path()).as_deref(), Some("github"));
    }

    #[test]
    fn env_file_empty_value_is_none() {
        let dir = write_env("CTW_PROVIDER=\n");
        assert_eq!(read_env_file_provider(dir.path()), None);
    }

    #[test]
    fn env_file_ignores_similar_keys() {
        let dir = write_env("CTW_PROVIDER_URL=https://example.com\n# CTW_PROVIDER=linear\n");
        assert_eq!(read_env_file_provider(dir.path()), None);
    }

    #[test]
    fn environment_get_and_override() {
        let env = Environment::new("/tmp")
            .with_var("CTW_PROVIDER", "linear")
            .with_var("CTW_PROVIDER", "github");
        assert_eq!(env.get("CTW_PROVIDER"), Some("github"));
        assert_eq!(env.get("CTW_MISSING"), None);
        assert_eq!(env.cwd(), Path::new("/tmp"));
    }
}
