//! Maps resolved settings to a concrete backend.
//!
//! This is the only module that names both backend crates. Everything else
//! talks to [`Provider`] through [`TicketProvider`].

use ctw_config::{GitHubAuth, Settings};
use ctw_github::{GitHubProvider, MISSING_TOKEN_MESSAGE, TokenSource};
use ctw_linear::LinearProvider;
use ctw_protocol::{
    CreatedIssue, Issue, NewIssue, ProviderError, ProviderKind, Result, Team, TicketProvider,
};

const MISSING_LINEAR_KEY_MESSAGE: &str = "Missing Linear credentials. Set CTW_LINEAR_API_KEY or linear_api_key in the active config profile.";

/// API roots for each backend.
///
/// The defaults are the public services; tests point these at mock servers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub linear: String,
    pub github: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            linear: ctw_linear::ENDPOINT.to_string(),
            github: ctw_github::BASE_URI.to_string(),
        }
    }
}

/// The active backend, chosen once per invocation.
#[derive(Debug, Clone)]
pub enum Provider {
    Linear(LinearProvider),
    GitHub(GitHubProvider),
}

impl Provider {
    /// Builds the provider named by `settings.provider` against the public APIs.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] if the settings lack the
    /// credential their backend needs.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::from_settings_with(settings, &Endpoints::default())
    }

    /// Builds the provider named by `settings.provider` against `endpoints`.
    ///
    /// # Errors
    ///
    /// See [`from_settings`](Self::from_settings).
    pub fn from_settings_with(settings: &Settings, endpoints: &Endpoints) -> Result<Self> {
        match settings.provider {
            ProviderKind::Linear => {
                let api_key = settings.linear_api_key.clone().ok_or_else(|| {
                    ProviderError::Configuration(MISSING_LINEAR_KEY_MESSAGE.to_string())
                })?;
                LinearProvider::with_endpoint(api_key, endpoints.linear.clone()).map(Self::Linear)
            }
            ProviderKind::GitHub => {
                let token = match settings.github_auth {
                    GitHubAuth::GhCli => TokenSource::gh_cli(),
                    GitHubAuth::Token => {
                        let token = settings.github_token.clone().ok_or_else(|| {
                            ProviderError::Configuration(MISSING_TOKEN_MESSAGE.to_string())
                        })?;
                        TokenSource::Static(token)
                    }
                };
                Ok(Self::GitHub(
                    GitHubProvider::new(token)
                        .with_default_repo(settings.github_repo.clone())
                        .with_base_uri(endpoints.github.clone()),
                ))
            }
        }
    }
}

impl TicketProvider for Provider {
    fn kind(&self) -> ProviderKind {
        match self {
            Self::Linear(p) => p.kind(),
            Self::GitHub(p) => p.kind(),
        }
    }

    async fn get_issue(&self, ticket_id: &str) -> Result<Issue> {
        match self {
            Self::Linear(p) => p.get_issue(ticket_id).await,
            Self::GitHub(p) => p.get_issue(ticket_id).await,
        }
    }

    async fn list_my_issues(&self) -> Result<Vec<Issue>> {
        match self {
            Self::Linear(p) => p.list_my_issues().await,
            Self::GitHub(p) => p.list_my_issues().await,
        }
    }

    async fn create_issue(&self, new: &NewIssue) -> Result<CreatedIssue> {
        match self {
            Self::Linear(p) => p.create_issue(new).await,
            Self::GitHub(p) => p.create_issue(new).await,
        }
    }

    async fn list_teams(&self) -> Result<Vec<Team>> {
        match self {
            Self::Linear(p) => p.list_teams().await,
            Self::GitHub(p) => p.list_teams().await,
        }
    }
}
