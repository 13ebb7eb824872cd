//! GitHub backend for ctw.
//!
//! [`GitHubProvider`] implements [`ctw_protocol::TicketProvider`] against the
//! GitHub REST API using [`octocrab`].
//!
//! # Overview
//!
//! - [`GitHubProvider`]: The provider, one request per operation
//! - [`TokenSource`]: A stored token, or `gh auth token` per call
//! - [`IssueRef`]: `owner/repo#123` and bare-number parsing
//!
//! # Authentication
//!
//! Requests carry `Authorization: Bearer <token>`. Tokens are held in
//! [`secrecy::SecretString`] and never logged. A 401 response becomes
//! [`ProviderError::Authentication`](ctw_protocol::ProviderError::Authentication)
//! naming the profile key to fix, or `gh auth login` in `gh-cli` mode.
//!
//! # Limits
//!
//! `list_my_issues` and `list_teams` read a single page (50 issues and 100
//! repositories respectively) and do not paginate.
//!
//! # Examples
//!
//! ```no_run
//! use ctw_github::{GitHubProvider, TokenSource};
//! use ctw_protocol::{NewIssue, TicketProvider};
//! use secrecy::SecretString;
//!
//! # async fn example() -> ctw_protocol::Result<()> {
//! let github = GitHubProvider::new(TokenSource::Static(SecretString::from("ghp_xxx")));
//! let created = github
//!     .create_issue(&NewIssue::new("Fix null check", "jdoss/quickvm"))
//!     .await?;
//! println!("opened {}", created.url);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
mod issue;
pub mod ticket;
pub mod token;

pub use client::{BASE_URI, GitHubProvider};
pub use error::UNAUTHORIZED_MESSAGE;
pub use ticket::IssueRef;
pub use token::{MISSING_TOKEN_MESSAGE, TokenSource};
