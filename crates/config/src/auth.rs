//! GitHub token retrieval from the `gh` CLI.
//!
//! Profiles with `github_auth = "gh-cli"` store no token. The REST backend asks
//! the GitHub CLI for one on every call instead, so a `gh auth refresh` takes
//! effect immediately.

use secrecy::SecretString;
use tokio::process::Command;
use tracing::debug;

use crate::error::{ConfigError, Result};

/// The GitHub CLI executable.
pub const GH_PROGRAM: &str = "gh";

/// Gets a GitHub token from the `gh` CLI.
///
/// Runs `gh auth token` and returns its trimmed stdout.
///
/// # Errors
///
/// Returns an error if:
/// - `gh` cannot be started (for example because it is not installed)
/// - the command exits with a non-zero status
/// - the command prints an empty token
///
/// # Examples
///
/// ```no_run
/// use ctw_config::auth::gh_auth_token;
/// use secrecy::ExposeSecret;
///
/// # async fn example() -> ctw_config::Result<()> {
/// let token = gh_auth_token().await?;
/// assert!(!token.expose_secret().is_empty());
/// # Ok(())
/// # }
/// ```
pub async fn gh_auth_token() -> Result<SecretString> {
    gh_auth_token_from(GH_PROGRAM).await
}

/// Runs `<program> auth token` and reads the token from stdout.
///
/// Same as [`gh_auth_token`] with a different executable, e.g. a wrapper
/// script or an absolute path.
///
/// # Errors
///
/// See [`gh_auth_token`].
pub async fn gh_auth_token_from(program: &str) -> Result<SecretString> {
    let output = Command::new(program)
        .args(["auth", "token"])
        .output()
        .await
        .map_err(ConfigError::GhAuthFailed)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        debug!(program, code = ?output.status.code(), "gh auth token exited unsuccessfully");
        return Err(ConfigError::GhAuthError {
            code: output.status.code(),
            stderr,
        });
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(ConfigError::GhAuthError {
            code: output.status.code(),
            stderr: "no token printed".to_string(),
        });
    }

    Ok(SecretString::from(token))
}
