//! The comment-preserving configuration document.
//!
//! The configuration file is hand-edited and often committed, so every write
//! goes through [`toml_edit`] and only touches the entries being changed.
//! Comments, key order and whitespace elsewhere survive byte-for-byte.
//!
//! # Document Shape
//!
//! ```toml
//! default_tracker = "work"   # document-level scalar
//!
//! [work]                     # a profile
//! provider = "linear"
//! linear_api_key = "lin_api_..."
//!
//! personal = { provider = "github", github_auth = "gh-cli" }   # also a profile
//! ```
//!
//! Any top-level key whose value behaves like a table (standard or inline) is a
//! profile; scalar keys are document settings.

use std::fmt;
use std::path::{Path, PathBuf};

use toml_edit::{DocumentMut, Item, Table, Value};
use tracing::debug;

use crate::env::{CONFIG_PATH_VAR, Environment};
use crate::error::{ConfigError, Result};
use crate::persistence::{default_config_path, read_config_text, write_config_text};

/// Top-level key naming the default profile.
pub const DEFAULT_TRACKER_KEY: &str = "default_tracker";

/// The string-valued entries of one profile, in document order.
///
/// # Examples
///
/// ```
/// use ctw_config::Profile;
///
/// let profile = Profile::new()
///     .with("provider", "github")
///     .with("github_auth", "gh-cli");
/// assert_eq!(profile.get("provider"), Some("github"));
/// assert_eq!(profile.get("github_token"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    entries: Vec<(String, String)>,
}

impl Profile {
    /// Creates an empty profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing any previous value while keeping its position.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let (key, value) = (key.into(), value.into());
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Returns the value for `key`, treating empty strings as unset.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Iterates over entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Renders a scalar TOML value as a plain string, without its decoration.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.value().clone()),
        Value::Integer(i) => Some(i.value().to_string()),
        Value::Float(f) => Some(f.value().to_string()),
        Value::Boolean(b) => Some(b.value().to_string()),
        _ => None,
    }
}

/// A loaded configuration document.
///
/// This is an explicit handle: callers load it, inspect or mutate it, and hand
/// it back to [`ConfigStore::save`]. Nothing is cached behind the scenes.
#[derive(Debug, Clone, Default)]
pub struct ConfigDocument {
    doc: DocumentMut,
}

impl ConfigDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a document from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] attributed to `path` if the text is not
    /// valid TOML.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let doc = text.parse::<DocumentMut>().map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self { doc })
    }

    /// Returns every profile name in document order.
    ///
    /// A profile is any top-level key whose value is table-like, which covers
    /// both `[name]` sections and inline tables. Scalars such as
    /// `default_tracker` are never profiles.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use ctw_config::ConfigDocument;
    ///
    /// let doc = ConfigDocument::parse(
    ///     "default_tracker = \"work\"\n[work]\nprovider = \"linear\"\n",
    ///     Path::new("config.toml"),
    /// ).unwrap();
    /// assert_eq!(doc.profiles(), vec!["work".to_string()]);
    /// ```
    #[must_use]
    pub fn profiles(&self) -> Vec<String> {
        self.doc
            .iter()
            .filter(|(_, item)| item.is_table_like())
            .map(|(key, _)| key.to_string())
            .collect()
    }

    /// Returns `true` if `name` is a profile in this document.
    #[must_use]
    pub fn has_profile(&self, name: &str) -> bool {
        self.doc.get(name).is_some_and(Item::is_table_like)
    }

    /// Returns the `default_tracker` scalar, if set and non-empty.
    #[must_use]
    pub fn default_tracker(&self) -> Option<&str> {
        self.doc
            .get(DEFAULT_TRACKER_KEY)
            .and_then(Item::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Returns the scalar entries of profile `name`.
    ///
    /// Nested tables and arrays inside a profile are ignored.
    #[must_use]
    pub fn profile(&self, name: &str) -> Option<Profile> {
        let table = self.doc.get(name)?.as_table_like()?;
        let entries = table
            .iter()
            .filter_map(|(key, item)| {
                let value = item.as_value().and_then(scalar_to_string)?;
                Some((key.to_string(), value))
            })
            .collect();
        Some(Profile { entries })
    }

    /// Sets the `default_tracker` scalar.
    ///
    /// An existing value keeps its surrounding whitespace and trailing comment.
    pub fn set_default_tracker(&mut self, name: &str) {
        match self
            .doc
            .get_mut(DEFAULT_TRACKER_KEY)
            .and_then(Item::as_value_mut)
        {
            Some(existing) => {
                let decor = existing.decor().clone();
                *existing = Value::from(name);
                *existing.decor_mut() = decor;
            }
            None => {
                self.doc[DEFAULT_TRACKER_KEY] = toml_edit::value(name);
            }
        }
    }

    /// Inserts profile `name` or updates its entries in place.
    ///
    /// Keys not mentioned in `profile` are left untouched, as are comments
    /// inside an existing section.
    pub fn set_profile(&mut self, name: &str, profile: &Profile) {
        let existing = self
            .doc
            .get_mut(name)
            .and_then(Item::as_table_like_mut);

        match existing {
            Some(table) => {
                for (key, value) in profile.iter() {
                    match table.get_mut(key).and_then(Item::as_value_mut) {
                        Some(current) => {
                            let decor = current.decor().clone();
                            *current = Value::from(value);
                            *current.decor_mut() = decor;
                        }
                        None => {
                            table.insert(key, toml_edit::value(value));
                        }
                    }
                }
            }
            None => {
                let mut table = Table::new();
                for (key, value) in profile.iter() {
                    table.insert(key, toml_edit::value(value));
                }
                self.doc[name] = Item::Table(table);
            }
        }
    }
}

impl fmt::Display for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.doc, f)
    }
}

/// Read/write access to the configuration file.
///
/// # Examples
///
/// ```no_run
/// use ctw_config::ConfigStore;
///
/// # fn example() -> ctw_config::Result<()> {
/// let store = ConfigStore::default_location()?;
/// let mut doc = store.load()?;
/// doc.set_default_tracker("work");
/// store.save(&doc)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Creates a store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store backed by `~/.config/ctw/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(default_config_path()?))
    }

    /// Creates a store for `$CTW_CONFIG`, falling back to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if `CTW_CONFIG` is unset and the home directory cannot
    /// be determined.
    pub fn from_env(env: &Environment) -> Result<Self> {
        match env.get(CONFIG_PATH_VAR) {
            Some(path) => Ok(Self::new(path)),
            None => Self::default_location(),
        }
    }

    /// The file this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document, or an empty one if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<ConfigDocument> {
        match read_config_text(&self.path)? {
            Some(text) => {
                debug!(path = %self.path.display(), "loaded config document");
                ConfigDocument::parse(&text, &self.path)
            }
            None => {
                debug!(path = %self.path.display(), "no config document, using empty");
                Ok(ConfigDocument::new())
            }
        }
    }

    /// Makes `name` the default profile and writes the file.
    ///
    /// A missing file is created holding only `default_tracker`. An existing
    /// file must already define the profile.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ProfileNotFound`] if the file exists without
    /// profile `name`, or an error if the file cannot be read, parsed or
    /// written.
    pub fn set_default_tracker(&self, name: &str) -> Result<()> {
        let mut doc = match read_config_text(&self.path)? {
            Some(text) => {
                let doc = ConfigDocument::parse(&text, &self.path)?;
                if !doc.has_profile(name) {
                    return Err(ConfigError::ProfileNotFound {
                        name: name.to_string(),
                        path: self.path.clone(),
                        available: doc.profiles(),
                    });
                }
                doc
            }
            None => ConfigDocument::new(),
        };
        doc.set_default_tracker(name);
        self.save(&doc)
    }

    /// Writes `doc` back to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directory cannot be written.
    pub fn save(&self, doc: &ConfigDocument) -> Result<()> {
        write_config_text(&self.path, &doc.to_string())?;
        debug!(path = %self.path.display(), "saved config document");
        Ok(())
    }
}
