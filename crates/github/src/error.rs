//! Mapping of GitHub responses and octocrab failures onto [`ProviderError`].
//!
//! Responses are classified by HTTP status first; the body is only decoded
//! once the status says it carries the expected payload.

use ctw_protocol::{ProviderError, ProviderKind, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::warn;

pub(crate) const KIND: ProviderKind = ProviderKind::GitHub;

/// Message for a rejected token.
pub const UNAUTHORIZED_MESSAGE: &str = "GitHub API returned 401. Check CTW_GITHUB_TOKEN or github_token in the active config profile, or run: gh auth login (github_auth = \"gh-cli\").";

/// GitHub's JSON error body. Only the message is kept.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Decodes a response body according to its status.
///
/// - 401 is [`ProviderError::Authentication`], whatever the body.
/// - 404 is [`ProviderError::NotFound`] when `missing` names the ticket being
///   fetched, and a backend error otherwise.
/// - Any other non-success status is [`ProviderError::Backend`] carrying
///   GitHub's `message`, or the raw body when it is not JSON.
/// - A success body that does not match `T` is a backend error too.
pub(crate) fn decode_response<T: DeserializeOwned>(
    status: u16,
    body: &str,
    missing: Option<&str>,
) -> Result<T> {
    if (200..300).contains(&status) {
        return serde_json::from_str(body).map_err(|e| {
            warn!(status, error = %e, "unexpected GitHub response body");
            ProviderError::backend(KIND, format!("unexpected response: {e}"))
        });
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.trim().to_string());
    warn!(status, message = %message, "GitHub API error");

    match (status, missing) {
        (401, _) => Err(ProviderError::Authentication(
            UNAUTHORIZED_MESSAGE.to_string(),
        )),
        (404, Some(id)) => Err(ProviderError::NotFound {
            id: id.to_string(),
            provider: KIND,
        }),
        _ if message.is_empty() => Err(ProviderError::backend(KIND, format!("HTTP {status}"))),
        _ => Err(ProviderError::backend(KIND, message)),
    }
}

/// Wraps a failure that produced no response at all.
pub(crate) fn transport_error(err: octocrab::Error) -> ProviderError {
    warn!(error = %err, "request to GitHub failed");
    ProviderError::transport(KIND, err)
}
