//! Error types for tracker provider operations.
//!
//! Every backend reports failures through [`ProviderError`] so callers can
//! special-case a missing ticket or bad credentials without knowing which
//! backend they are talking to.

use thiserror::Error;

use crate::issue::ProviderKind;

/// Errors that can occur while talking to a tracker backend.
///
/// None of these are retried automatically: a repeated create could open a
/// duplicate ticket.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Missing or invalid configuration, e.g. a bare GitHub issue number with
    /// no default repository.
    #[error("{0}")]
    Configuration(String),

    /// The backend has no ticket with this identifier.
    #[error("issue '{id}' not found in {name}", name = .provider.display_name())]
    NotFound {
        /// The identifier that was looked up.
        id: String,
        /// The backend that was asked.
        provider: ProviderKind,
    },

    /// Credentials were rejected or could not be obtained.
    ///
    /// The message always names the command that fixes it.
    #[error("{0}")]
    Authentication(String),

    /// The backend answered with an error payload or a non-success result.
    #[error("{name} API error: {message}", name = .provider.display_name())]
    Backend {
        /// The backend that reported the error.
        provider: ProviderKind,
        /// Backend-provided detail, verbatim where available.
        message: String,
    },

    /// The request never produced a response (network or TLS failure).
    #[error("request to {name} failed: {source}", name = .provider.display_name())]
    Transport {
        /// The backend that was being called.
        provider: ProviderKind,
        /// The underlying transport error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ProviderError {
    /// Builds a [`ProviderError::Backend`] from any displayable detail.
    pub fn backend(provider: ProviderKind, message: impl Into<String>) -> Self {
        Self::Backend {
            provider,
            message: message.into(),
        }
    }

    /// Builds a [`ProviderError::Transport`] wrapping `source`.
    pub fn transport(
        provider: ProviderKind,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Transport {
            provider,
            source: source.into(),
        }
    }

    /// Returns `true` for [`ProviderError::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// A specialized Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
