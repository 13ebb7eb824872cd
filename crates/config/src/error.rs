//! Error types for configuration operations.
//!
//! This module defines the error types that can occur while loading the
//! configuration document, resolving the active profile and validating its
//! credentials. Every variant carries enough context to tell the user what to
//! edit.

use std::path::PathBuf;

/// Formats a profile list for error messages.
fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        "(none)".to_string()
    } else {
        available.join(", ")
    }
}

/// Errors that can occur during configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file at {}: {source}", .path.display())]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a configuration file.
    #[error("failed to write config file at {}: {source}", .path.display())]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML.
    #[error("failed to parse config file at {}: {source}", .path.display())]
    Parse {
        /// The path of the malformed file.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: toml_edit::TomlError,
    },

    /// Failed to determine home directory.
    #[error("could not determine home directory")]
    NoHomeDirectory,

    /// The selected profile does not exist in the configuration document.
    #[error(
        "Profile '{name}' not found in {}. Available: {}",
        .path.display(),
        format_available(.available)
    )]
    ProfileNotFound {
        /// The requested profile name.
        name: String,
        /// The configuration file that was searched.
        path: PathBuf,
        /// Profiles that do exist, in document order.
        available: Vec<String>,
    },

    /// No profile was selected and no backend was named explicitly.
    #[error(
        "No tracker configured. Add a profile to {}, or set CTW_PROVIDER to 'linear' or 'github'.",
        .path.display()
    )]
    NoTracker {
        /// The configuration file that was consulted.
        path: PathBuf,
    },

    /// A profile was selected but neither it nor the environment names a backend.
    #[error(
        "Profile '{profile}' does not declare a provider. Set provider = \"linear\" or \"github\" in the [{profile}] section of {}.",
        .path.display()
    )]
    MissingProvider {
        /// The profile lacking a `provider` key.
        profile: String,
        /// The configuration file to edit.
        path: PathBuf,
    },

    /// A backend tag that is not one of the supported backends.
    #[error("Unknown provider '{0}'. Valid: linear, github")]
    UnknownProvider(String),

    /// A `github_auth` value other than `token` or `gh-cli`.
    #[error("Invalid github_auth '{0}'. Valid: token, gh-cli")]
    InvalidAuthMode(String),

    /// The Linear backend was selected without an API key.
    #[error(
        "Missing Linear credentials. Set CTW_LINEAR_API_KEY or linear_api_key in the [{profile}] section of {}",
        .path.display()
    )]
    MissingLinearKey {
        /// The profile section to edit (or `profile` when none was selected).
        profile: String,
        /// The configuration file to edit.
        path: PathBuf,
    },

    /// The GitHub backend was selected in token mode without a token.
    #[error(
        "Missing GitHub credentials. Set CTW_GITHUB_TOKEN or github_token in the [{profile}] section of {}, or set github_auth = \"gh-cli\" to use the gh CLI.",
        .path.display()
    )]
    MissingGitHubToken {
        /// The profile section to edit (or `profile` when none was selected).
        profile: String,
        /// The configuration file to edit.
        path: PathBuf,
    },

    /// Failed to execute the `gh auth token` command.
    #[error("gh auth token failed. Run: gh auth login ({0})")]
    GhAuthFailed(#[source] std::io::Error),

    /// The `gh auth token` command returned an error.
    #[error("gh auth token failed. Run: gh auth login (exit code {code:?}: {stderr})")]
    GhAuthError {
        /// The exit code, if available.
        code: Option<i32>,
        /// The stderr output.
        stderr: String,
    },
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_not_found_lists_available() {
        let err = ConfigError::ProfileNotFound {
            name: "nonexistent".to_string(),
            path: PathBuf::from("/home/u/.config/ctw/config.toml"),
            available: vec!["work".to_string(), "personal".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Profile 'nonexistent' not found in /home/u/.config/ctw/config.toml. Available: work, personal"
        );
    }

    #[test]
    fn profile_not_found_with_no_profiles() {
        let err = ConfigError::ProfileNotFound {
            name: "work".to_string(),
            path: PathBuf::from("config.toml"),
            available: vec![],
        };
        assert!(err.to_string().ends_with("Available: (none)"));
    }

    #[test]
    fn missing_credentials_name_the_config_file() {
        let err = ConfigError::MissingLinearKey {
            profile: "work".to_string(),
            path: PathBuf::from("/cfg/config.toml"),
        };
        let msg = err.to_string();
        assert!(msg.contains("CTW_LINEAR_API_KEY"));
        assert!(msg.contains("[work] section of /cfg/config.toml"));

        let err = ConfigError::MissingGitHubToken {
            profile: "personal".to_string(),
            path: PathBuf::from("/cfg/config.toml"),
        };
        assert!(err.to_string().contains("github_auth = \"gh-cli\""));
    }
}
