//! Where the GitHub token comes from.

use ctw_config::auth::{GH_PROGRAM, gh_auth_token_from};
use ctw_protocol::{ProviderError, Result};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

/// Message for a stored-token profile with no usable token.
pub const MISSING_TOKEN_MESSAGE: &str = "No GitHub credentials. Set CTW_GITHUB_TOKEN or github_token in the active config profile, or set github_auth = \"gh-cli\" to use the gh CLI.";

/// The source of the bearer token for each request.
///
/// # Examples
///
/// ```
/// use ctw_github::TokenSource;
/// use secrecy::SecretString;
///
/// let stored = TokenSource::Static(SecretString::from("ghp_xxx"));
/// let cli = TokenSource::gh_cli();
/// # let _ = (stored, cli);
/// ```
#[derive(Debug, Clone)]
pub enum TokenSource {
    /// A token from the profile or `CTW_GITHUB_TOKEN`.
    Static(SecretString),
    /// Run `<program> auth token` before every request.
    GhCli {
        /// The GitHub CLI executable.
        program: String,
    },
}

impl TokenSource {
    /// Uses the `gh` found on `PATH`.
    #[must_use]
    pub fn gh_cli() -> Self {
        Self::GhCli {
            program: GH_PROGRAM.to_string(),
        }
    }

    /// Produces the token for one request.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Authentication`] when no token can be
    /// obtained. An empty token is never sent.
    pub async fn resolve(&self) -> Result<SecretString> {
        match self {
            Self::Static(token) if token.expose_secret().is_empty() => Err(
                ProviderError::Authentication(MISSING_TOKEN_MESSAGE.to_string()),
            ),
            Self::Static(token) => Ok(token.clone()),
            Self::GhCli { program } => {
                debug!(program = %program, "fetching token from gh CLI");
                gh_auth_token_from(program)
                    .await
                    .map_err(|e| ProviderError::Authentication(e.to_string()))
            }
        }
    }
}
