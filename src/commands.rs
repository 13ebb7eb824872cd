//! The work behind each CLI subcommand.
//!
//! Every command writes to a caller-supplied sink so the binary can hand in
//! stdout while tests capture a buffer.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use ctw_config::{ConfigStore, Settings};
use ctw_protocol::context::{NO_DESCRIPTION, priority_label};
use ctw_protocol::{IssueContext, NewIssue, TicketProvider, make_slug};
use secrecy::ExposeSecret;
use tracing::debug;

use crate::output::{NOT_SET, mask_secret, write_table};

/// Error text when `create-issue` has no team to file into.
pub const NO_TEAM_MESSAGE: &str = "No team specified. Use --team or set linear_team_id / github_repo in your config profile. Run 'ctw list-teams' to see available teams.";

/// Note printed when a priority is passed to a backend without priorities.
pub const PRIORITY_IGNORED_NOTE: &str = "(priority not supported for GitHub issues)";

/// Prints open tickets assigned to the current user.
pub async fn list_issues(provider: &impl TicketProvider, out: &mut impl Write) -> Result<()> {
    let issues = provider.list_my_issues().await?;
    if issues.is_empty() {
        writeln!(out, "No open issues assigned to you.")?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = issues
        .into_iter()
        .map(|issue| {
            vec![
                issue.identifier,
                issue.state,
                issue.priority.map_or_else(|| "—".to_string(), priority_label),
                issue.title,
                issue.url,
            ]
        })
        .collect();
    write_table(out, &["ID", "State", "Pri", "Title", "URL"], &rows)?;
    Ok(())
}

/// Prints one ticket as a field table, followed by its comments if any.
pub async fn get_issue(
    provider: &impl TicketProvider,
    issue_id: &str,
    out: &mut impl Write,
) -> Result<()> {
    let issue = provider.get_issue(issue_id).await?;

    let mut rows = vec![
        field("Provider", issue.provider.display_name()),
        field("State", &issue.state),
        field("Team", issue.team.as_deref().unwrap_or("—")),
        field("Assignee", issue.assignee.as_deref().unwrap_or("Unassigned")),
    ];
    if let (true, Some(priority)) = (issue.provider.supports_priority(), issue.priority) {
        rows.push(vec!["Priority".to_string(), priority_label(priority)]);
    }
    let labels = if issue.labels.is_empty() {
        "none".to_string()
    } else {
        issue.labels.join(", ")
    };
    rows.push(vec!["Labels".to_string(), labels]);
    rows.push(field("URL", &issue.url));
    rows.push(field(
        "Description",
        issue
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(NO_DESCRIPTION),
    ));

    writeln!(out, "{}: {}", issue.identifier, issue.title)?;
    writeln!(out)?;
    write_table(out, &["Field", "Value"], &rows)?;

    if !issue.comments.is_empty() {
        writeln!(out)?;
        writeln!(out, "Comments:")?;
        for comment in &issue.comments {
            writeln!(out, "  {comment}")?;
        }
    }
    Ok(())
}

fn field(name: &str, value: &str) -> Vec<String> {
    vec![name.to_string(), value.to_string()]
}

/// Options for [`create_issue`].
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub title: String,
    pub description: Option<String>,
    pub team: Option<String>,
    pub priority: Option<u8>,
}

/// Files a new ticket and prints its identifier and URL.
///
/// The team comes from `options.team`, then the profile default. Priority is
/// dropped with a note on `err` for backends without priorities.
///
/// # Errors
///
/// Fails with [`NO_TEAM_MESSAGE`] when no team can be determined, or with the
/// backend's error.
pub async fn create_issue(
    provider: &impl TicketProvider,
    settings: &Settings,
    options: CreateOptions,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<()> {
    let Some(team) = options
        .team
        .as_deref()
        .or_else(|| settings.default_team())
        .map(str::to_string)
    else {
        bail!(NO_TEAM_MESSAGE);
    };

    let mut new = NewIssue::new(options.title, team);
    if let Some(description) = options.description {
        new = new.with_description(description);
    }
    match options.priority {
        Some(priority) if provider.kind().supports_priority() => {
            new = new.with_priority(priority);
        }
        Some(_) => writeln!(err, "{PRIORITY_IGNORED_NOTE}")?,
        None => {}
    }

    let created = provider.create_issue(&new).await?;
    writeln!(out, "✓ {} {}", created.identifier, created.title)?;
    writeln!(out, "  {}", created.url)?;
    Ok(())
}

/// Prints the teams (or pushable repositories) tickets can be filed into.
pub async fn list_teams(provider: &impl TicketProvider, out: &mut impl Write) -> Result<()> {
    let teams = provider.list_teams().await?;
    if teams.is_empty() {
        writeln!(out, "No teams found.")?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = teams
        .into_iter()
        .map(|team| vec![team.key, team.name, team.id])
        .collect();
    write_table(out, &["Key", "Name", "ID"], &rows)?;
    Ok(())
}

/// Renders a ticket's context document to `output`, or to `out` when no file
/// is given.
pub async fn context(
    provider: &impl TicketProvider,
    issue_id: &str,
    output: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    let issue = provider.get_issue(issue_id).await?;
    let ctx = IssueContext::new(issue);

    match output {
        Some(path) => {
            std::fs::write(path, &ctx.rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            debug!(path = %path.display(), "wrote context file");
            writeln!(out, "✓ Wrote context to {}", path.display())?;
        }
        None => write!(out, "{}", ctx.rendered)?,
    }
    Ok(())
}

/// Prints the branch slug for a ticket, without a trailing newline.
pub async fn slug(
    provider: &impl TicketProvider,
    issue_id: &str,
    out: &mut impl Write,
) -> Result<()> {
    let issue = provider.get_issue(issue_id).await?;
    write!(out, "{}", make_slug(&issue))?;
    Ok(())
}

/// Makes `profile` the default tracker in the config file.
pub fn set_default(store: &ConfigStore, profile: &str, out: &mut impl Write) -> Result<()> {
    store.set_default_tracker(profile)?;
    writeln!(
        out,
        "✓ Default tracker set to \"{profile}\" in {}",
        store.path().display()
    )?;
    Ok(())
}

/// Prints the resolved settings with credentials masked.
pub fn config_show(settings: &Settings, out: &mut impl Write) -> Result<()> {
    let or_unset = |value: Option<&str>| value.unwrap_or(NOT_SET).to_string();

    let rows = vec![
        vec!["profile".to_string(), or_unset(settings.profile.as_deref())],
        vec!["provider".to_string(), settings.provider.to_string()],
        vec![
            "default_tracker".to_string(),
            or_unset(settings.default_tracker.as_deref()),
        ],
        vec![
            "linear_api_key".to_string(),
            mask_secret(
                settings.linear_api_key.as_ref().map(|k| k.expose_secret()),
                "lin_api_",
            ),
        ],
        vec![
            "linear_team_id".to_string(),
            or_unset(settings.linear_team_id.as_deref()),
        ],
        vec![
            "github_token".to_string(),
            mask_secret(
                settings.github_token.as_ref().map(|t| t.expose_secret()),
                "ghp_",
            ),
        ],
        vec!["github_auth".to_string(), settings.github_auth.to_string()],
        vec![
            "github_repo".to_string(),
            or_unset(settings.github_repo.as_deref()),
        ],
        vec![
            "config".to_string(),
            settings.config_path.display().to_string(),
        ],
    ];
    write_table(out, &["Setting", "Value"], &rows)?;
    Ok(())
}
