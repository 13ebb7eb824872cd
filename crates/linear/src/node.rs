//! Wire shapes of Linear responses and their normalization.
//!
//! Only the fields ctw reads are modelled; serde ignores the rest.

use ctw_protocol::{CreatedIssue, Issue, ProviderKind, Team};
use serde::Deserialize;

/// A `{ nodes: [...] }` connection.
#[derive(Debug, Deserialize)]
pub(crate) struct Connection<T> {
    pub nodes: Vec<T>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

/// Any object where only `name` matters (state, assignee, team, label, user).
#[derive(Debug, Deserialize)]
pub(crate) struct Named {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentNode {
    pub body: String,
    pub user: Option<Named>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IssueNode {
    pub id: String,
    pub identifier: String,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    /// Linear types priority as a float; values are 0 through 4.
    pub priority: Option<f64>,
    pub state: Named,
    pub assignee: Option<Named>,
    pub team: Option<Named>,
    #[serde(default)]
    pub labels: Connection<Named>,
    #[serde(default)]
    pub comments: Connection<CommentNode>,
}

impl IssueNode {
    /// Flattens the nested node into an [`Issue`].
    ///
    /// Comments without an author (deleted users, integrations) are dropped.
    pub fn into_issue(self) -> Issue {
        let comments = self
            .comments
            .nodes
            .into_iter()
            .filter_map(|c| c.user.map(|user| format!("{}: {}", user.name, c.body)))
            .collect();

        Issue {
            id: self.id,
            identifier: self.identifier,
            title: self.title,
            description: self.description,
            url: self.url,
            state: self.state.name,
            priority: self.priority.map(|p| p as u8),
            assignee: self.assignee.map(|a| a.name),
            team: self.team.map(|t| t.name),
            labels: self.labels.nodes.into_iter().map(|l| l.name).collect(),
            comments,
            provider: ProviderKind::Linear,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TeamNode {
    pub id: String,
    pub name: String,
    pub key: String,
}

impl From<TeamNode> for Team {
    fn from(node: TeamNode) -> Self {
        Self {
            id: node.id,
            name: node.name,
            key: node.key,
            provider: ProviderKind::Linear,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedNode {
    pub identifier: String,
    pub title: String,
    pub url: String,
}

impl From<CreatedNode> for CreatedIssue {
    fn from(node: CreatedNode) -> Self {
        Self {
            identifier: node.identifier,
            title: node.title,
            url: node.url,
            provider: ProviderKind::Linear,
        }
    }
}

// Response `data` payloads, one per operation.

#[derive(Debug, Deserialize)]
pub(crate) struct IssueData {
    pub issue: Option<IssueNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Viewer {
    pub assigned_issues: Connection<IssueNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ViewerData {
    pub viewer: Viewer,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TeamsData {
    pub teams: Connection<TeamNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IssueCreatePayload {
    pub success: bool,
    pub issue: Option<CreatedNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateData {
    pub issue_create: IssueCreatePayload,
}
