//! Normalized ticket types shared by every tracker backend.
//!
//! Both providers convert their raw API payloads into the types defined here,
//! so everything downstream (slugs, rendered context, the CLI) only ever sees
//! one shape regardless of where a ticket came from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// The tracker backend that produced a value.
///
/// # Examples
///
/// ```
/// use ctw_protocol::ProviderKind;
///
/// let kind: ProviderKind = "github".parse().unwrap();
/// assert_eq!(kind, ProviderKind::GitHub);
/// assert_eq!(kind.as_str(), "github");
/// assert_eq!(kind.display_name(), "GitHub");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Linear, accessed through its GraphQL API.
    Linear,
    /// GitHub Issues, accessed through the REST API.
    GitHub,
}

impl ProviderKind {
    /// Every supported backend, in the order they are offered to users.
    pub const ALL: [Self; 2] = [Self::Linear, Self::GitHub];

    /// Returns the tag used in configuration files and environment variables.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::GitHub => "github",
        }
    }

    /// Returns the human-facing product name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::GitHub => "GitHub",
        }
    }

    /// Whether this backend has a native priority concept.
    #[must_use]
    pub const fn supports_priority(self) -> bool {
        matches!(self, Self::Linear)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                ProviderError::Configuration(format!(
                    "unknown provider '{s}'. Valid: linear, github"
                ))
            })
    }
}

/// A ticket, normalized across backends.
///
/// `priority` is only ever populated for [`ProviderKind::Linear`]; GitHub has
/// no native priority and always reports `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Backend-native identifier (Linear UUID, GitHub numeric id).
    pub id: String,
    /// Human-readable identifier, e.g. `ENG-123` or `owner/repo#123`.
    pub identifier: String,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    /// Free-text workflow state name.
    pub state: String,
    /// 0 (none) to 4 (low), Linear only.
    pub priority: Option<u8>,
    pub assignee: Option<String>,
    /// Linear team name or GitHub `owner/repo`.
    pub team: Option<String>,
    pub labels: Vec<String>,
    /// Discussion thread as `"author: body"` lines, oldest first.
    pub comments: Vec<String>,
    pub provider: ProviderKind,
}

/// A Linear team, or a GitHub repository the user can push to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: String,
    pub name: String,
    /// Team key (`ENG`) or repository full name (`owner/repo`).
    pub key: String,
    pub provider: ProviderKind,
}

/// The minimal result of creating a ticket.
///
/// Only carries fields every backend guarantees right after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    pub identifier: String,
    pub title: String,
    pub url: String,
    pub provider: ProviderKind,
}

/// Input for [`TicketProvider::create_issue`](crate::TicketProvider::create_issue).
///
/// # Examples
///
/// ```
/// use ctw_protocol::NewIssue;
///
/// let new = NewIssue::new("Fix login", "ENG").with_priority(2);
/// assert_eq!(new.priority, Some(2));
/// assert!(new.description.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub title: String,
    pub description: Option<String>,
    /// Linear team id or GitHub `owner/repo`.
    pub team: String,
    /// Ignored by backends without a priority concept.
    pub priority: Option<u8>,
}

impl NewIssue {
    /// Creates a request with no description and no priority.
    #[must_use]
    pub fn new(title: impl Into<String>, team: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            team: team.into(),
            priority: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// An issue together with the exact markdown that was rendered for it.
///
/// Keeping both in one value lets callers persist precisely the text that was
/// displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueContext {
    pub issue: Issue,
    pub rendered: String,
}

impl IssueContext {
    /// Renders `issue` and pairs it with the result.
    #[must_use]
    pub fn new(issue: Issue) -> Self {
        let rendered = crate::context::render(&issue);
        Self { issue, rendered }
    }
}
