//! Active profile selection and settings merge.
//!
//! # Profile Selection
//!
//! The first of these that yields a value wins:
//!
//! 1. the explicit profile passed by the caller (`--tracker`)
//! 2. `CTW_DEFAULT_TRACKER`
//! 3. `default_tracker` in the configuration document
//! 4. `CTW_PROVIDER=` in `./.env`
//! 5. the first profile in document order
//!
//! Steps 1, 2, 3 and 5 name a profile, which must exist. Step 4 names a
//! profile when one with that name exists, and otherwise may name a backend
//! directly (`linear` or `github`), in which case no profile is used.
//!
//! # Field Merge
//!
//! Each field comes from the selected profile, then the matching `CTW_*`
//! variable, then its default. A missing `provider` falls back to
//! `CTW_PROVIDER` and then the `.env` value.

use ctw_protocol::ProviderKind;
use secrecy::SecretString;
use tracing::debug;

use crate::credentials;
use crate::env::{DEFAULT_TRACKER_VAR, Environment, PROVIDER_VAR, env_key, read_env_file_provider};
use crate::error::{ConfigError, Result};
use crate::settings::{GitHubAuth, Settings};
use crate::store::{ConfigDocument, ConfigStore, Profile};

/// Where the active profile name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Explicit,
    EnvDefaultTracker,
    DocumentDefault,
    EnvFile,
    FirstProfile,
}

impl Step {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::EnvDefaultTracker => DEFAULT_TRACKER_VAR,
            Self::DocumentDefault => "default_tracker",
            Self::EnvFile => ".env",
            Self::FirstProfile => "first profile",
        }
    }
}

/// Builds validated [`Settings`] from the configuration file and environment.
///
/// # Examples
///
/// ```no_run
/// use ctw_config::{ConfigStore, Environment, SettingsResolver};
///
/// # fn example() -> ctw_config::Result<()> {
/// let env = Environment::capture();
/// let store = ConfigStore::from_env(&env)?;
/// let settings = SettingsResolver::new(&store, &env).resolve(None)?;
/// println!("using {}", settings.provider);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SettingsResolver<'a> {
    store: &'a ConfigStore,
    env: &'a Environment,
}

impl<'a> SettingsResolver<'a> {
    /// Creates a resolver over `store` and `env`.
    #[must_use]
    pub const fn new(store: &'a ConfigStore, env: &'a Environment) -> Self {
        Self { store, env }
    }

    /// Loads the configuration document and resolves settings from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be loaded, the selected profile
    /// does not exist, no backend can be determined, a value is invalid, or
    /// the backend's credentials are missing.
    pub fn resolve(&self, explicit_profile: Option<&str>) -> Result<Settings> {
        let doc = self.store.load()?;
        self.resolve_document(&doc, explicit_profile)
    }

    /// Resolves settings from an already loaded document.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub fn resolve_document(
        &self,
        doc: &ConfigDocument,
        explicit_profile: Option<&str>,
    ) -> Result<Settings> {
        let env_file = read_env_file_provider(self.env.cwd());
        let profile_name = self.select_profile(doc, explicit_profile, env_file.as_deref())?;
        let profile = profile_name
            .as_deref()
            .and_then(|name| doc.profile(name))
            .unwrap_or_default();

        let provider = self.resolve_provider(&profile, profile_name.as_deref(), env_file.as_deref())?;
        let field = |name: &str| -> Option<String> {
            profile
                .get(name)
                .or_else(|| self.env.get(&env_key(name)))
                .map(str::to_string)
        };

        let github_auth = match field("github_auth") {
            Some(mode) => mode.parse()?,
            None => GitHubAuth::default(),
        };

        let settings = Settings {
            profile: profile_name,
            default_tracker: self
                .env
                .get(DEFAULT_TRACKER_VAR)
                .or_else(|| doc.default_tracker())
                .map(str::to_string),
            provider,
            linear_api_key: field("linear_api_key").map(SecretString::from),
            linear_team_id: field("linear_team_id"),
            github_token: field("github_token").map(SecretString::from),
            github_auth,
            github_repo: field("github_repo"),
            config_path: self.store.path().to_path_buf(),
        };

        debug!(
            profile = settings.profile.as_deref().unwrap_or("-"),
            provider = %settings.provider,
            github_auth = %settings.github_auth,
            "resolved settings"
        );
        credentials::validate(settings)
    }

    /// Runs the five selection steps. `Ok(None)` means no profile is used.
    fn select_profile(
        &self,
        doc: &ConfigDocument,
        explicit: Option<&str>,
        env_file: Option<&str>,
    ) -> Result<Option<String>> {
        let named = explicit
            .filter(|name| !name.is_empty())
            .map(|name| (name, Step::Explicit))
            .or_else(|| {
                self.env
                    .get(DEFAULT_TRACKER_VAR)
                    .map(|name| (name, Step::EnvDefaultTracker))
            })
            .or_else(|| doc.default_tracker().map(|name| (name, Step::DocumentDefault)));

        if let Some((name, step)) = named {
            return self.require_profile(doc, name, step).map(Some);
        }

        if let Some(value) = env_file {
            if doc.has_profile(value) {
                debug!(profile = value, step = Step::EnvFile.as_str(), "selected profile");
                return Ok(Some(value.to_string()));
            }
            if value.parse::<ProviderKind>().is_ok() {
                debug!(provider = value, step = Step::EnvFile.as_str(), "selected backend without profile");
                return Ok(None);
            }
            return Err(self.profile_not_found(doc, value));
        }

        let first = doc.profiles().into_iter().next();
        if let Some(name) = &first {
            debug!(profile = %name, step = Step::FirstProfile.as_str(), "selected profile");
        }
        Ok(first)
    }

    fn require_profile(&self, doc: &ConfigDocument, name: &str, step: Step) -> Result<String> {
        if doc.has_profile(name) {
            debug!(profile = name, step = step.as_str(), "selected profile");
            Ok(name.to_string())
        } else {
            Err(self.profile_not_found(doc, name))
        }
    }

    fn profile_not_found(&self, doc: &ConfigDocument, name: &str) -> ConfigError {
        ConfigError::ProfileNotFound {
            name: name.to_string(),
            path: self.store.path().to_path_buf(),
            available: doc.profiles(),
        }
    }

    fn resolve_provider(
        &self,
        profile: &Profile,
        profile_name: Option<&str>,
        env_file: Option<&str>,
    ) -> Result<ProviderKind> {
        let declared = profile
            .get("provider")
            .or_else(|| self.env.get(PROVIDER_VAR));

        if let Some(tag) = declared {
            return tag
                .parse()
                .map_err(|_| ConfigError::UnknownProvider(tag.to_string()));
        }

        if let Some(kind) = env_file.and_then(|tag| tag.parse::<ProviderKind>().ok()) {
            return Ok(kind);
        }

        Err(match profile_name {
            Some(name) => ConfigError::MissingProvider {
                profile: name.to_string(),
                path: self.store.path().to_path_buf(),
            },
            None => ConfigError::NoTracker {
                path: self.store.path().to_path_buf(),
            },
        })
    }
}
