//! The Linear [`TicketProvider`] over GraphQL.

use std::time::Duration;

use ctw_protocol::{
    CreatedIssue, Issue, NewIssue, ProviderError, ProviderKind, Result, Team, TicketProvider,
};
use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument, warn};

use crate::node::{CreateData, IssueData, TeamsData, ViewerData};
use crate::queries;

/// Linear's GraphQL endpoint.
pub const ENDPOINT: &str = "https://api.linear.app/graphql";

/// Applies to the whole request, connect through body.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const KIND: ProviderKind = ProviderKind::Linear;

/// Message for a rejected API key.
pub const UNAUTHORIZED_MESSAGE: &str = "Linear API returned 401. Check CTW_LINEAR_API_KEY or linear_api_key in the active config profile (see: ctw config-show).";

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// The response envelope. `data` is decoded separately once errors are ruled out.
#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

/// Linear tracker backend.
///
/// Authenticates with a personal API key sent verbatim in the
/// `Authorization` header, with no `Bearer` prefix.
///
/// # Examples
///
/// ```no_run
/// use ctw_linear::LinearProvider;
/// use ctw_protocol::TicketProvider;
/// use secrecy::SecretString;
///
/// # async fn example() -> ctw_protocol::Result<()> {
/// let linear = LinearProvider::new(SecretString::from("lin_api_xxx"))?;
/// for issue in linear.list_my_issues().await? {
///     println!("{} {}", issue.identifier, issue.title);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LinearProvider {
    http: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
}

impl LinearProvider {
    /// Creates a provider talking to [`ENDPOINT`].
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Transport`] if the HTTP client cannot be built.
    pub fn new(api_key: SecretString) -> Result<Self> {
        Self::with_endpoint(api_key, ENDPOINT)
    }

    /// Creates a provider talking to a different GraphQL endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Transport`] if the HTTP client cannot be built.
    pub fn with_endpoint(api_key: SecretString, endpoint: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::transport(KIND, e))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    /// Runs one GraphQL operation and decodes its `data`.
    ///
    /// A non-empty `errors` array wins over the HTTP status, since Linear
    /// reports most failures that way.
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        debug!(operation, endpoint = %self.endpoint, "sending GraphQL request");

        let response = self
            .http
            .post(&self.endpoint)
            .header(AUTHORIZATION, self.api_key.expose_secret())
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| ProviderError::transport(KIND, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderError::transport(KIND, e))?;
        let envelope = serde_json::from_slice::<GraphQlResponse>(&body).ok();

        if let Some(failed) = envelope.as_ref().filter(|e| !e.errors.is_empty()) {
            let message = failed
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            warn!(operation, %status, "GraphQL errors in response");
            return Err(ProviderError::backend(KIND, message));
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProviderError::Authentication(
                UNAUTHORIZED_MESSAGE.to_string(),
            ));
        }
        if !status.is_success() {
            return Err(ProviderError::backend(KIND, format!("HTTP {status}")));
        }

        let data = envelope
            .and_then(|e| e.data)
            .ok_or_else(|| ProviderError::backend(KIND, "response contained no data"))?;
        serde_json::from_value(data).map_err(|e| {
            warn!(operation, error = %e, "unexpected GraphQL data shape");
            ProviderError::backend(KIND, format!("unexpected {operation} response: {e}"))
        })
    }
}

impl TicketProvider for LinearProvider {
    fn kind(&self) -> ProviderKind {
        KIND
    }

    #[instrument(skip(self))]
    async fn get_issue(&self, ticket_id: &str) -> Result<Issue> {
        let data: IssueData = self
            .execute("GetIssue", queries::GET_ISSUE, json!({ "id": ticket_id }))
            .await?;
        data.issue
            .map(|node| node.into_issue())
            .ok_or_else(|| ProviderError::NotFound {
                id: ticket_id.to_string(),
                provider: KIND,
            })
    }

    #[instrument(skip(self))]
    async fn list_my_issues(&self) -> Result<Vec<Issue>> {
        let data: ViewerData = self
            .execute("ListMyIssues", queries::LIST_MY_ISSUES, json!({}))
            .await?;
        let issues: Vec<Issue> = data
            .viewer
            .assigned_issues
            .nodes
            .into_iter()
            .map(|node| node.into_issue())
            .collect();
        debug!(count = issues.len(), "listed assigned issues");
        Ok(issues)
    }

    #[instrument(skip(self, new), fields(team = %new.team))]
    async fn create_issue(&self, new: &NewIssue) -> Result<CreatedIssue> {
        let variables = json!({
            "title": new.title,
            "description": new.description,
            "teamId": new.team,
            "priority": new.priority,
        });
        let data: CreateData = self
            .execute("CreateIssue", queries::CREATE_ISSUE, variables)
            .await?;

        let payload = data.issue_create;
        if !payload.success {
            return Err(ProviderError::backend(
                KIND,
                "issueCreate returned success=false",
            ));
        }
        let created = payload
            .issue
            .map(CreatedIssue::from)
            .ok_or_else(|| ProviderError::backend(KIND, "issueCreate returned no issue"))?;
        debug!(identifier = %created.identifier, "created issue");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn list_teams(&self) -> Result<Vec<Team>> {
        let data: TeamsData = self
            .execute("ListTeams", queries::LIST_TEAMS, json!({}))
            .await?;
        Ok(data.teams.nodes.into_iter().map(Team::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const API_KEY: &str = "lin_api_test";

    fn issue_node() -> Value {
        json!({
            "id": "issue_abc",
            "identifier": "ENG-123",
            "title": "Fix null check",
            "description": "Desc text",
            "url": "https://linear.app/team/issue/ENG-123",
            "priority": 2,
            "state": {"name": "In Progress", "type": "started"},
            "assignee": {"name": "Jane Doe", "email": "jane@example.com"},
            "team": {"name": "Engineering", "key": "ENG"},
            "labels": {"nodes": [{"name": "bug"}]},
            "comments": {"nodes": [{"body": "Looking", "user": {"name": "Sam"}}]}
        })
    }

    async fn mock(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("authorization", API_KEY))
            .respond_with(template)
            .expect(1)
            .mount(server)
            .await;
    }

    fn provider(server: &MockServer) -> LinearProvider {
        LinearProvider::with_endpoint(
            SecretString::from(API_KEY),
            format!("{}/graphql", server.uri()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn get_issue_returns_normalized_issue() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_partial_json(json!({"variables": {"id": "ENG-123"}})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"issue": issue_node()}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let issue = provider(&server).get_issue("ENG-123").await.unwrap();
        assert_eq!(issue.identifier, "ENG-123");
        assert_eq!(issue.title, "Fix null check");
        assert_eq!(issue.provider, ProviderKind::Linear);
        assert_eq!(issue.priority, Some(2));
        assert_eq!(issue.assignee.as_deref(), Some("Jane Doe"));
        assert_eq!(issue.labels, vec!["bug"]);
        assert_eq!(issue.comments, vec!["Sam: Looking"]);
    }

    #[tokio::test]
    async fn get_issue_null_node_is_not_found() {
        let server = MockServer::start().await;
        mock(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"data": {"issue": null}})),
        )
        .await;

        let err = provider(&server).get_issue("ENG-999").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "issue 'ENG-999' not found in Linear");
    }

    #[tokio::test]
    async fn list_my_issues_returns_nodes() {
        let server = MockServer::start().await;
        mock(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "data": {"viewer": {"assignedIssues": {"nodes": [issue_node()]}}}
            })),
        )
        .await;

        let issues = provider(&server).list_my_issues().await.unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].identifier, "ENG-123");
    }

    #[tokio::test]
    async fn list_my_issues_empty() {
        let server = MockServer::start().await;
        mock(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "data": {"viewer": {"assignedIssues": {"nodes": []}}}
            })),
        )
        .await;

        assert!(provider(&server).list_my_issues().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_issue_sends_variables() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_partial_json(json!({
                "variables": {"title": "New bug", "description": "desc", "teamId": "team_id", "priority": 3}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"issueCreate": {"success": true, "issue": {
                    "id": "new_id",
                    "identifier": "ENG-456",
                    "title": "New bug",
                    "url": "https://linear.app/team/issue/ENG-456"
                }}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let new = NewIssue::new("New bug", "team_id")
            .with_description("desc")
            .with_priority(3);
        let created = provider(&server).create_issue(&new).await.unwrap();
        assert_eq!(created.identifier, "ENG-456");
        assert_eq!(created.provider, ProviderKind::Linear);
    }

    #[tokio::test]
    async fn create_issue_failure_is_backend_error() {
        let server = MockServer::start().await;
        mock(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "data": {"issueCreate": {"success": false, "issue": null}}
            })),
        )
        .await;

        let err = provider(&server)
            .create_issue(&NewIssue::new("Fail", "team_id"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("success=false"));
    }

    #[tokio::test]
    async fn list_teams_returns_teams() {
        let server = MockServer::start().await;
        mock(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "data": {"teams": {"nodes": [
                    {"id": "t1", "name": "Engineering", "key": "ENG"},
                    {"id": "t2", "name": "Design", "key": "DES"}
                ]}}
            })),
        )
        .await;

        let teams = provider(&server).list_teams().await.unwrap();
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].key, "ENG");
        assert!(teams.iter().all(|t| t.provider == ProviderKind::Linear));
    }

    #[tokio::test]
    async fn graphql_errors_are_backend_errors() {
        let server = MockServer::start().await;
        mock(
            &server,
            ResponseTemplate::new(200)
                .set_body_json(json!({"errors": [{"message": "Unauthorized"}]})),
        )
        .await;

        let err = provider(&server).get_issue("ENG-1").await.unwrap_err();
        assert!(matches!(err, ProviderError::Backend { .. }));
        assert_eq!(err.to_string(), "Linear API error: Unauthorized");
    }

    #[tokio::test]
    async fn graphql_errors_win_over_status() {
        let server = MockServer::start().await;
        mock(
            &server,
            ResponseTemplate::new(400)
                .set_body_json(json!({"errors": [{"message": "Field 'x' doesn't exist"}]})),
        )
        .await;

        let err = provider(&server).list_teams().await.unwrap_err();
        assert_eq!(err.to_string(), "Linear API error: Field 'x' doesn't exist");
    }

    #[tokio::test]
    async fn unauthorized_status_is_authentication_error() {
        let server = MockServer::start().await;
        mock(&server, ResponseTemplate::new(401).set_body_string("unauthorized")).await;

        let err = provider(&server).list_teams().await.unwrap_err();
        assert_eq!(err.to_string(), UNAUTHORIZED_MESSAGE);
        assert!(err.to_string().contains("linear_api_key"));
    }

    #[tokio::test]
    async fn server_error_status_is_backend_error() {
        let server = MockServer::start().await;
        mock(&server, ResponseTemplate::new(502)).await;

        let err = provider(&server).list_my_issues().await.unwrap_err();
        assert!(matches!(err, ProviderError::Backend { ref message, .. } if message.contains("502")));
    }

    #[tokio::test]
    async fn unexpected_data_shape_is_backend_error() {
        let server = MockServer::start().await;
        mock(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"data": {"teams": 5}})),
        )
        .await;

        let err = provider(&server).list_teams().await.unwrap_err();
        assert!(
            matches!(err, ProviderError::Backend { ref message, .. } if message.starts_with("unexpected ListTeams response"))
        );
    }

    #[tokio::test]
    async fn non_json_success_body_is_backend_error() {
        let server = MockServer::start().await;
        mock(&server, ResponseTemplate::new(200).set_body_string("<html>")).await;

        let err = provider(&server).list_teams().await.unwrap_err();
        assert!(matches!(err, ProviderError::Backend { .. }));
    }
}
