//! Shared protocol types for ctw.
//!
//! This crate defines the normalized ticket model both tracker backends map
//! into, the [`TicketProvider`] capability trait they implement, and the two
//! pure projections built on top of the model: branch slugs and markdown
//! context documents.
//!
//! # Overview
//!
//! - [`issue`]: `Issue`, `Team`, `CreatedIssue`, `IssueContext` and `ProviderKind`
//! - [`provider`]: the `TicketProvider` trait
//! - [`slug`]: deterministic, git-safe branch names
//! - [`context`]: markdown context rendering
//! - [`error`]: error types for provider operations
//!
//! # Examples
//!
//! ```
//! use ctw_protocol::{Issue, IssueContext, ProviderKind, make_slug};
//!
//! let issue = Issue {
//!     id: "987654321".into(),
//!     identifier: "jdoss/quickvm#42".into(),
//!     title: "Fix null check".into(),
//!     description: None,
//!     url: "https://github.com/jdoss/quickvm/issues/42".into(),
//!     state: "Open".into(),
//!     priority: None,
//!     assignee: None,
//!     team: Some("jdoss/quickvm".into()),
//!     labels: vec!["bug".into()],
//!     comments: vec![],
//!     provider: ProviderKind::GitHub,
//! };
//!
//! assert_eq!(make_slug(&issue), "jdoss-quickvm-42-fix-null-check");
//!
//! let ctx = IssueContext::new(issue);
//! assert!(ctx.rendered.starts_with("# jdoss/quickvm#42: Fix null check"));
//! ```

pub mod context;
pub mod error;
pub mod issue;
pub mod provider;
pub mod slug;

// Re-export primary types at crate root for convenience
pub use context::render;
pub use error::{ProviderError, Result};
pub use issue::{CreatedIssue, Issue, IssueContext, NewIssue, ProviderKind, Team};
pub use provider::TicketProvider;
pub use slug::make_slug;
