//! Credential presence checks for resolved settings.

use ctw_protocol::ProviderKind;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{ConfigError, Result};
use crate::settings::{GitHubAuth, Settings};

fn is_present(secret: Option<&SecretString>) -> bool {
    secret.is_some_and(|s| !s.expose_secret().is_empty())
}

/// Checks that `settings` carries the credentials its backend needs.
///
/// - Linear requires `linear_api_key`.
/// - GitHub in `token` mode requires `github_token`.
/// - GitHub in `gh-cli` mode requires nothing here; the token is fetched per call.
///
/// # Errors
///
/// Returns [`ConfigError::MissingLinearKey`] or
/// [`ConfigError::MissingGitHubToken`] naming the profile section and the
/// configuration file to edit.
pub fn validate(settings: Settings) -> Result<Settings> {
    match (settings.provider, settings.github_auth) {
        (ProviderKind::Linear, _) if !is_present(settings.linear_api_key.as_ref()) => {
            Err(ConfigError::MissingLinearKey {
                profile: settings.profile_label().to_string(),
                path: settings.config_path.clone(),
            })
        }
        (ProviderKind::GitHub, GitHubAuth::Token)
            if !is_present(settings.github_token.as_ref()) =>
        {
            Err(ConfigError::MissingGitHubToken {
                profile: settings.profile_label().to_string(),
                path: settings.config_path.clone(),
            })
        }
        _ => Ok(settings),
    }
}
