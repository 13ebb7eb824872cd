//! Configuration management for ctw.
//!
//! This crate loads the profile document, picks the active profile and turns
//! it into validated [`Settings`] for one backend.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`store`]: The comment-preserving TOML document and its file store
//! - [`resolver`]: Profile selection and the settings merge
//! - [`settings`]: The resolved settings and GitHub auth mode
//! - [`credentials`]: Credential presence checks
//! - [`env`]: Environment capture and the `.env` scan
//! - [`auth`]: GitHub token retrieval through `gh auth token`
//! - [`persistence`]: Config file reading and writing
//! - [`error`]: Error types for configuration operations
//!
//! # Configuration File
//!
//! Profiles live in `~/.config/ctw/config.toml` (or `$CTW_CONFIG`):
//!
//! ```toml
//! default_tracker = "work"
//!
//! [work]
//! provider = "linear"
//! linear_api_key = "lin_api_..."
//! linear_team_id = "..."
//!
//! [personal]
//! provider = "github"
//! github_auth = "gh-cli"
//! github_repo = "jdoss/quickvm"
//! ```
//!
//! Every profile field can also come from a `CTW_*` environment variable, which
//! is used when the profile leaves the field unset.
//!
//! # Examples
//!
//! ```no_run
//! use ctw_config::{ConfigStore, Environment, SettingsResolver};
//!
//! # fn example() -> ctw_config::Result<()> {
//! let env = Environment::capture();
//! let store = ConfigStore::from_env(&env)?;
//! let settings = SettingsResolver::new(&store, &env).resolve(Some("work"))?;
//! println!("{} via profile {:?}", settings.provider, settings.profile);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod credentials;
pub mod env;
pub mod error;
pub mod persistence;
pub mod resolver;
pub mod settings;
pub mod store;

// Re-export primary types at crate root for convenience
pub use env::Environment;
pub use error::{ConfigError, Result};
pub use resolver::SettingsResolver;
pub use settings::{GitHubAuth, Settings};
pub use store::{ConfigDocument, ConfigStore, Profile};
