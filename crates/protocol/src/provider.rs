//! The capability interface every tracker backend implements.

use std::future::Future;

use crate::error::Result;
use crate::issue::{CreatedIssue, Issue, NewIssue, ProviderKind, Team};

/// Operations a tracker backend must support.
///
/// Implementations return normalized values and never keep mutable state
/// between calls. Each call issues at most one outbound request and is never
/// retried.
pub trait TicketProvider {
    /// Which backend this is.
    fn kind(&self) -> ProviderKind;

    /// Fetches a single ticket.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotFound`](crate::ProviderError::NotFound) when
    /// the backend has no such ticket.
    fn get_issue(&self, ticket_id: &str) -> impl Future<Output = Result<Issue>> + Send;

    /// Lists open tickets assigned to the authenticated user.
    fn list_my_issues(&self) -> impl Future<Output = Result<Vec<Issue>>> + Send;

    /// Creates a ticket.
    ///
    /// Backends without a priority concept ignore [`NewIssue::priority`].
    fn create_issue(&self, new: &NewIssue)
    -> impl Future<Output = Result<CreatedIssue>> + Send;

    /// Lists teams, or repositories the user can push to.
    fn list_teams(&self) -> impl Future<Output = Result<Vec<Team>>> + Send;
}
