//! GitHub ticket reference parsing.

use std::fmt;

use ctw_protocol::{ProviderError, Result};

/// A fully qualified issue: `owner/repo#number`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

/// Splits `owner/repo` on the first `/`. Both halves must be non-empty.
pub(crate) fn split_repo(full_name: &str) -> Option<(&str, &str)> {
    full_name
        .split_once('/')
        .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty())
}

fn parse_number(ticket_id: &str, number: &str) -> Result<u64> {
    number.trim().parse().map_err(|_| {
        ProviderError::Configuration(format!(
            "Invalid GitHub issue number in '{ticket_id}'. Expected owner/repo#123 or a bare issue number."
        ))
    })
}

impl IssueRef {
    /// Parses `owner/repo#123`, or a bare `123` against `default_repo`.
    ///
    /// The number is everything after the last `#`; the repository part is
    /// split on its first `/`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] for malformed references, and
    /// for bare numbers when no default repository is configured.
    ///
    /// # Examples
    ///
    /// ```
    /// use ctw_github::IssueRef;
    ///
    /// let full = IssueRef::parse("jdoss/quickvm#42", None).unwrap();
    /// assert_eq!(full.to_string(), "jdoss/quickvm#42");
    ///
    /// let bare = IssueRef::parse("7", Some("rust-lang/rust")).unwrap();
    /// assert_eq!((bare.owner.as_str(), bare.number), ("rust-lang", 7));
    ///
    /// assert!(IssueRef::parse("7", None).is_err());
    /// ```
    pub fn parse(ticket_id: &str, default_repo: Option<&str>) -> Result<Self> {
        let ticket_id = ticket_id.trim();

        let (owner, repo, number) = match ticket_id.rsplit_once('#') {
            Some((repo_part, number)) => {
                let (owner, repo) = split_repo(repo_part).ok_or_else(|| {
                    ProviderError::Configuration(format!(
                        "Invalid GitHub issue reference '{ticket_id}'. Expected owner/repo#123 or a bare issue number."
                    ))
                })?;
                (owner, repo, parse_number(ticket_id, number)?)
            }
            None => {
                let default_repo = default_repo.filter(|r| !r.is_empty()).ok_or_else(|| {
                    ProviderError::Configuration(format!(
                        "Cannot resolve bare issue number '{ticket_id}': no default repo set. \
                         Set CTW_GITHUB_REPO or github_repo in your config profile."
                    ))
                })?;
                let (owner, repo) = split_repo(default_repo).ok_or_else(|| {
                    ProviderError::Configuration(format!(
                        "Invalid github_repo '{default_repo}'. Expected owner/repo."
                    ))
                })?;
                (owner, repo, parse_number(ticket_id, ticket_id)?)
            }
        };

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number,
        })
    }
}

impl fmt::Display for IssueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}
