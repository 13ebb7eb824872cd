//! The resolved runtime settings for one invocation.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use ctw_protocol::ProviderKind;
use secrecy::SecretString;

use crate::error::ConfigError;

/// How the GitHub backend obtains its token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GitHubAuth {
    /// A personal access token stored in the profile or `CTW_GITHUB_TOKEN`.
    #[default]
    Token,
    /// Ask `gh auth token` on every call.
    GhCli,
}

impl GitHubAuth {
    /// Returns the configuration value for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::GhCli => "gh-cli",
        }
    }
}

impl fmt::Display for GitHubAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GitHubAuth {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "token" => Ok(Self::Token),
            "gh-cli" => Ok(Self::GhCli),
            other => Err(ConfigError::InvalidAuthMode(other.to_string())),
        }
    }
}

/// Validated settings for the active tracker.
///
/// Built fresh by [`SettingsResolver`](crate::SettingsResolver) on every
/// invocation and never written back as a whole. Credentials are held as
/// [`SecretString`] so they never appear in `Debug` output.
#[derive(Debug, Clone)]
pub struct Settings {
    /// The profile that was selected, if any.
    pub profile: Option<String>,
    /// The document- or environment-level default profile, for display.
    pub default_tracker: Option<String>,
    /// The active backend.
    pub provider: ProviderKind,
    pub linear_api_key: Option<SecretString>,
    /// Default Linear team for new issues.
    pub linear_team_id: Option<String>,
    pub github_token: Option<SecretString>,
    pub github_auth: GitHubAuth,
    /// Default `owner/repo` for bare issue numbers and new issues.
    pub github_repo: Option<String>,
    /// The configuration file the settings were resolved against.
    pub config_path: PathBuf,
}

impl Settings {
    /// Creates settings for `provider` with every optional field unset.
    ///
    /// Mostly useful for building providers directly, e.g. in tests.
    #[must_use]
    pub fn new(provider: ProviderKind, config_path: impl Into<PathBuf>) -> Self {
        Self {
            profile: None,
            default_tracker: None,
            provider,
            linear_api_key: None,
            linear_team_id: None,
            github_token: None,
            github_auth: GitHubAuth::default(),
            github_repo: None,
            config_path: config_path.into(),
        }
    }

    /// The team or repository new issues go to when none is given.
    ///
    /// # Examples
    ///
    /// ```
    /// use ctw_config::Settings;
    /// use ctw_protocol::ProviderKind;
    ///
    /// let mut settings = Settings::new(ProviderKind::GitHub, "config.toml");
    /// settings.linear_team_id = Some("team_1".into());
    /// settings.github_repo = Some("jdoss/quickvm".into());
    /// assert_eq!(settings.default_team(), Some("jdoss/quickvm"));
    /// ```
    #[must_use]
    pub fn default_team(&self) -> Option<&str> {
        match self.provider {
            ProviderKind::Linear => self.linear_team_id.as_deref(),
            ProviderKind::GitHub => self.github_repo.as_deref(),
        }
    }

    /// The profile name to mention in error messages.
    #[must_use]
    pub fn profile_label(&self) -> &str {
        self.profile.as_deref().unwrap_or("profile")
    }
}
