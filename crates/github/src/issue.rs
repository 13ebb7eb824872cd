//! GitHub REST payloads and their conversion to the shared model.
//!
//! Only the fields ctw reads are modelled; serde ignores the rest of
//! GitHub's (large) issue and repository objects.

use ctw_protocol::{CreatedIssue, Issue, ProviderKind, Team};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct LabelDto {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserDto {
    pub login: String,
}

/// An issue from `/repos/{owner}/{repo}/issues/{n}` or `/issues`.
#[derive(Debug, Deserialize)]
pub(crate) struct IssueDto {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub html_url: String,
    pub state: Option<String>,
    #[serde(default)]
    pub labels: Vec<LabelDto>,
    #[serde(default)]
    pub assignees: Vec<UserDto>,
    /// Present when the "issue" is a pull request.
    pub pull_request: Option<serde::de::IgnoredAny>,
}

/// Extracts `owner` and `repo` from `https://github.com/{owner}/{repo}/issues/{n}`.
pub(crate) fn repo_from_html_url(html_url: &str) -> Option<(&str, &str)> {
    let mut segments = html_url.split('/').skip(3);
    let owner = segments.next().filter(|s| !s.is_empty())?;
    let repo = segments.next().filter(|s| !s.is_empty())?;
    Some((owner, repo))
}

impl IssueDto {
    /// Normalizes the payload for an issue in `owner/repo`.
    ///
    /// GitHub has no priority, so `priority` is always `None`; comments would
    /// need a second request and are left empty.
    pub fn into_issue(self, owner: &str, repo: &str) -> Issue {
        let state = match self.state.as_deref().unwrap_or("open") {
            "open" => "Open",
            _ => "Closed",
        };

        Issue {
            id: self.id.to_string(),
            identifier: format!("{owner}/{repo}#{}", self.number),
            title: self.title,
            description: self.body,
            url: self.html_url,
            state: state.to_string(),
            priority: None,
            assignee: self.assignees.into_iter().next().map(|u| u.login),
            team: Some(format!("{owner}/{repo}")),
            labels: self.labels.into_iter().map(|l| l.name).collect(),
            comments: Vec::new(),
            provider: ProviderKind::GitHub,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PermissionsDto {
    #[serde(default)]
    pub push: bool,
}

/// A repository from `/user/repos`.
#[derive(Debug, Deserialize)]
pub(crate) struct RepoDto {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub permissions: Option<PermissionsDto>,
}

impl RepoDto {
    pub fn can_push(&self) -> bool {
        self.permissions.as_ref().is_some_and(|p| p.push)
    }
}

impl From<RepoDto> for Team {
    fn from(repo: RepoDto) -> Self {
        Self {
            id: repo.id.to_string(),
            name: repo.name,
            key: repo.full_name,
            provider: ProviderKind::GitHub,
        }
    }
}

/// Request body for `POST /repos/{owner}/{repo}/issues`.
#[derive(Debug, Serialize)]
pub(crate) struct CreateIssueBody<'a> {
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<&'a str>,
}

/// The subset of the created issue that ctw reports back.
#[derive(Debug, Deserialize)]
pub(crate) struct CreatedDto {
    pub number: u64,
    pub title: String,
    pub html_url: String,
}

impl CreatedDto {
    pub fn into_created(self, owner: &str, repo: &str) -> CreatedIssue {
        CreatedIssue {
            identifier: format!("{owner}/{repo}#{}", self.number),
            title: self.title,
            url: self.html_url,
            provider: ProviderKind::GitHub,
        }
    }
}
