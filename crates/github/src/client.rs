//! The GitHub [`TicketProvider`] over the REST API.
//!
//! An [`Octocrab`] instance is built per call with the token of that moment,
//! so `gh-cli` mode always sends a fresh token. Retries are disabled: a
//! repeated `POST` could open a duplicate issue.

use std::time::Duration;

use ctw_protocol::{
    CreatedIssue, Issue, NewIssue, ProviderError, ProviderKind, Result, Team, TicketProvider,
};
use octocrab::Octocrab;
use octocrab::service::middleware::retry::RetryConfig;
use secrecy::ExposeSecret;
use tracing::{debug, instrument, warn};

use crate::error::{KIND, decode_response, transport_error};
use crate::issue::{CreateIssueBody, CreatedDto, IssueDto, RepoDto, repo_from_html_url};
use crate::ticket::{IssueRef, split_repo};
use crate::token::TokenSource;

/// The public GitHub API.
pub const BASE_URI: &str = "https://api.github.com";

/// Page size for assigned issues. Only the first page is fetched.
const ASSIGNED_PAGE_SIZE: u8 = 50;

/// Page size for repositories. Only the first page is fetched.
const REPOS_PAGE_SIZE: u8 = 100;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// GitHub tracker backend.
///
/// Issues are addressed as `owner/repo#123`, or as a bare number resolved
/// against the default repository. "Teams" are the repositories the user
/// can push to.
///
/// # Examples
///
/// ```no_run
/// use ctw_github::{GitHubProvider, TokenSource};
/// use ctw_protocol::TicketProvider;
///
/// # async fn example() -> ctw_protocol::Result<()> {
/// let github = GitHubProvider::new(TokenSource::gh_cli())
///     .with_default_repo(Some("jdoss/quickvm".to_string()));
/// let issue = github.get_issue("42").await?;
/// println!("{}: {}", issue.identifier, issue.title);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GitHubProvider {
    base_uri: String,
    token: TokenSource,
    default_repo: Option<String>,
}

impl GitHubProvider {
    /// Creates a provider for [`BASE_URI`] with no default repository.
    #[must_use]
    pub fn new(token: TokenSource) -> Self {
        Self {
            base_uri: BASE_URI.to_string(),
            token,
            default_repo: None,
        }
    }

    /// Sets the `owner/repo` used for bare issue numbers.
    #[must_use]
    pub fn with_default_repo(mut self, default_repo: Option<String>) -> Self {
        self.default_repo = default_repo.filter(|r| !r.is_empty());
        self
    }

    /// Points the provider at a different API root, such as GitHub Enterprise.
    #[must_use]
    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = base_uri.into();
        self
    }

    /// The default repository, if any.
    #[must_use]
    pub fn default_repo(&self) -> Option<&str> {
        self.default_repo.as_deref()
    }

    /// Builds a client carrying the current token.
    async fn client(&self) -> Result<Octocrab> {
        let token = self.token.resolve().await?;
        Octocrab::builder()
            .add_retry_config(RetryConfig::None)
            .set_connect_timeout(Some(REQUEST_TIMEOUT))
            .set_read_timeout(Some(REQUEST_TIMEOUT))
            .personal_token(token.expose_secret())
            .base_uri(self.base_uri.as_str())
            .map_err(|e| ProviderError::transport(KIND, e))?
            .build()
            .map_err(|e| ProviderError::transport(KIND, e))
    }
}

impl TicketProvider for GitHubProvider {
    fn kind(&self) -> ProviderKind {
        KIND
    }

    #[instrument(skip(self))]
    async fn get_issue(&self, ticket_id: &str) -> Result<Issue> {
        let issue_ref = IssueRef::parse(ticket_id, self.default_repo.as_deref())?;
        let route = format!(
            "/repos/{}/{}/issues/{}",
            issue_ref.owner, issue_ref.repo, issue_ref.number
        );
        debug!(%route, "fetching issue");

        let client = self.client().await?;
        let response = client._get(route.as_str()).await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = client
            .body_to_string(response)
            .await
            .map_err(transport_error)?;

        let dto: IssueDto = decode_response(status, &body, Some(ticket_id))?;
        Ok(dto.into_issue(&issue_ref.owner, &issue_ref.repo))
    }

    /// Returns the first page (50) of open issues assigned to the user across
    /// all repositories. Pull requests are skipped.
    #[instrument(skip(self))]
    async fn list_my_issues(&self) -> Result<Vec<Issue>> {
        let route = format!("/issues?filter=assigned&state=open&per_page={ASSIGNED_PAGE_SIZE}");
        let client = self.client().await?;
        let response = client._get(route.as_str()).await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = client
            .body_to_string(response)
            .await
            .map_err(transport_error)?;

        let dtos: Vec<IssueDto> = decode_response(status, &body, None)?;

        let mut issues = Vec::with_capacity(dtos.len());
        for dto in dtos.into_iter().filter(|d| d.pull_request.is_none()) {
            let Some((owner, repo)) = repo_from_html_url(&dto.html_url) else {
                warn!(url = %dto.html_url, "skipping issue with unexpected html_url");
                continue;
            };
            let (owner, repo) = (owner.to_string(), repo.to_string());
            issues.push(dto.into_issue(&owner, &repo));
        }
        debug!(count = issues.len(), "listed assigned issues");
        Ok(issues)
    }

    #[instrument(skip(self, new), fields(team = %new.team))]
    async fn create_issue(&self, new: &NewIssue) -> Result<CreatedIssue> {
        let (owner, repo) = split_repo(&new.team).ok_or_else(|| {
            ProviderError::Configuration(format!(
                "Invalid GitHub repository '{}'. Expected owner/repo.",
                new.team
            ))
        })?;
        if let Some(priority) = new.priority {
            debug!(priority, "GitHub has no issue priority, ignoring");
        }

        let body = CreateIssueBody {
            title: &new.title,
            body: new.description.as_deref().filter(|d| !d.is_empty()),
        };
        let client = self.client().await?;
        let response = client
            ._post(format!("/repos/{owner}/{repo}/issues"), Some(&body))
            .await
            .map_err(transport_error)?;
        let status = response.status().as_u16();
        let text = client
            .body_to_string(response)
            .await
            .map_err(transport_error)?;

        let dto: CreatedDto = decode_response(status, &text, None)?;

        let created = dto.into_created(owner, repo);
        debug!(identifier = %created.identifier, "created issue");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn list_teams(&self) -> Result<Vec<Team>> {
        let route = format!("/user/repos?per_page={REPOS_PAGE_SIZE}");
        let client = self.client().await?;
        let response = client._get(route.as_str()).await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = client
            .body_to_string(response)
            .await
            .map_err(transport_error)?;

        let repos: Vec<RepoDto> = decode_response(status, &body, None)?;

        Ok(repos
            .into_iter()
            .filter(RepoDto::can_push)
            .map(Team::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UNAUTHORIZED_MESSAGE;
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN: &str = "ghp_test";

    fn issue_node() -> Value {
        json!({
            "id": 987654321u64,
            "number": 42,
            "title": "Fix null check",
            "body": "Null pointer in logout handler.",
            "html_url": "https://github.com/jdoss/quickvm/issues/42",
            "state": "open",
            "labels": [{"name": "bug"}],
            "assignees": [{"login": "jdoss"}]
        })
    }

    fn github_error(message: &str) -> Value {
        json!({"message": message, "documentation_url": "https://docs.github.com/rest"})
    }

    fn provider(server: &MockServer) -> GitHubProvider {
        GitHubProvider::new(TokenSource::Static(SecretString::from(TOKEN)))
            .with_base_uri(server.uri())
    }

    #[tokio::test]
    async fn get_issue_qualified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/jdoss/quickvm/issues/42"))
            .and(header("authorization", "Bearer ghp_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(issue_node()))
            .expect(1)
            .mount(&server)
            .await;

        let issue = provider(&server).get_issue("jdoss/quickvm#42").await.unwrap();
        assert_eq!(issue.identifier, "jdoss/quickvm#42");
        assert_eq!(issue.state, "Open");
        assert_eq!(issue.priority, None);
        assert_eq!(issue.assignee.as_deref(), Some("jdoss"));
        assert_eq!(issue.provider, ProviderKind::GitHub);
    }

    #[tokio::test]
    async fn get_issue_bare_number_uses_default_repo() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/jdoss/quickvm/issues/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(issue_node()))
            .expect(1)
            .mount(&server)
            .await;

        let issue = provider(&server)
            .with_default_repo(Some("jdoss/quickvm".to_string()))
            .get_issue("42")
            .await
            .unwrap();
        assert_eq!(issue.identifier, "jdoss/quickvm#42");
    }

    #[tokio::test]
    async fn bare_number_without_repo_fails_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(issue_node()))
            .expect(0)
            .mount(&server)
            .await;

        let err = provider(&server).get_issue("42").await.unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
        assert!(err.to_string().contains("no default repo set"));
    }

    #[tokio::test]
    async fn get_issue_404_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/jdoss/quickvm/issues/999"))
            .respond_with(ResponseTemplate::new(404).set_body_json(github_error("Not Found")))
            .mount(&server)
            .await;

        let err = provider(&server)
            .get_issue("jdoss/quickvm#999")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "issue 'jdoss/quickvm#999' not found in GitHub"
        );
    }

    #[tokio::test]
    async fn unauthorized_is_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(github_error("Bad credentials")))
            .mount(&server)
            .await;

        let err = provider(&server)
            .get_issue("jdoss/quickvm#42")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Authentication(_)));
        assert_eq!(err.to_string(), UNAUTHORIZED_MESSAGE);
    }

    #[tokio::test]
    async fn unauthorized_plain_text_is_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .expect(1)
            .mount(&server)
            .await;

        let err = provider(&server).list_my_issues().await.unwrap_err();
        assert!(matches!(err, ProviderError::Authentication(_)));
        assert_eq!(err.to_string(), UNAUTHORIZED_MESSAGE);
    }

    #[tokio::test]
    async fn get_issue_404_empty_body_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/jdoss/quickvm/issues/999"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let err = provider(&server)
            .get_issue("jdoss/quickvm#999")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn unexpected_success_body_is_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/jdoss/quickvm/issues/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"nope": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let err = provider(&server)
            .get_issue("jdoss/quickvm#42")
            .await
            .unwrap_err();
        assert!(
            matches!(err, ProviderError::Backend { ref message, .. } if message.contains("missing field `id`"))
        );
    }

    #[tokio::test]
    async fn list_my_issues_is_cross_repo() {
        let server = MockServer::start().await;
        let other = json!({
            "id": 5, "number": 7, "title": "Docs", "body": null,
            "html_url": "https://github.com/rust-lang/rust/issues/7", "state": "open",
            "labels": [], "assignees": []
        });
        let pull = json!({
            "id": 6, "number": 8, "title": "PR", "body": null,
            "html_url": "https://github.com/rust-lang/rust/pull/8", "state": "open",
            "pull_request": {"url": "https://api.github.com/repos/rust-lang/rust/pulls/8"}
        });
        Mock::given(method("GET"))
            .and(path("/issues"))
            .and(query_param("filter", "assigned"))
            .and(query_param("state", "open"))
            .and(query_param("per_page", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([issue_node(), other, pull])))
            .expect(1)
            .mount(&server)
            .await;

        let issues = provider(&server).list_my_issues().await.unwrap();
        let ids: Vec<_> = issues.iter().map(|i| i.identifier.as_str()).collect();
        assert_eq!(ids, vec!["jdoss/quickvm#42", "rust-lang/rust#7"]);
        assert_eq!(issues[1].team.as_deref(), Some("rust-lang/rust"));
    }

    #[tokio::test]
    async fn create_issue_posts_title_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/jdoss/quickvm/issues"))
            .and(body_json(json!({"title": "New bug", "body": "desc"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "number": 43,
                "title": "New bug",
                "html_url": "https://github.com/jdoss/quickvm/issues/43"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let new = NewIssue::new("New bug", "jdoss/quickvm")
            .with_description("desc")
            .with_priority(2);
        let created = provider(&server).create_issue(&new).await.unwrap();
        assert_eq!(created.identifier, "jdoss/quickvm#43");
        assert_eq!(created.provider, ProviderKind::GitHub);
    }

    #[tokio::test]
    async fn create_issue_omits_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/jdoss/quickvm/issues"))
            .and(body_json(json!({"title": "Bare"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "number": 44,
                "title": "Bare",
                "html_url": "https://github.com/jdoss/quickvm/issues/44"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let new = NewIssue::new("Bare", "jdoss/quickvm").with_description("");
        let created = provider(&server).create_issue(&new).await.unwrap();
        assert_eq!(created.identifier, "jdoss/quickvm#44");
    }

    #[tokio::test]
    async fn create_issue_rejects_malformed_repo() {
        let server = MockServer::start().await;
        let err = provider(&server)
            .create_issue(&NewIssue::new("x", "quickvm"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }

    #[tokio::test]
    async fn list_teams_filters_to_push_access() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/repos"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "quickvm", "full_name": "jdoss/quickvm",
                 "permissions": {"admin": true, "push": true, "pull": true}},
                {"id": 2, "name": "rust", "full_name": "rust-lang/rust",
                 "permissions": {"admin": false, "push": false, "pull": true}}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let teams = provider(&server).list_teams().await.unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].key, "jdoss/quickvm");
        assert_eq!(teams[0].name, "quickvm");
        assert_eq!(teams[0].id, "1");
    }

    #[tokio::test]
    async fn server_error_is_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_json(github_error("Server Error")))
            .mount(&server)
            .await;

        let err = provider(&server).list_teams().await.unwrap_err();
        assert_eq!(err.to_string(), "GitHub API error: Server Error");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn gh_cli_failure_sends_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let github = GitHubProvider::new(TokenSource::GhCli {
            program: "false".to_string(),
        })
        .with_base_uri(server.uri());
        let err = github.list_teams().await.unwrap_err();
        assert!(matches!(err, ProviderError::Authentication(_)));
        assert!(err.to_string().contains("gh auth login"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn gh_cli_token_is_sent_as_bearer() {
        let server = MockServer::start().await;
        // `echo auth token` stands in for `gh auth token`.
        Mock::given(method("GET"))
            .and(path("/user/repos"))
            .and(header("authorization", "Bearer auth token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let github = GitHubProvider::new(TokenSource::GhCli {
            program: "echo".to_string(),
        })
        .with_base_uri(server.uri());
        assert!(github.list_teams().await.unwrap().is_empty());
    }
}
