//! Markdown context documents for tickets.
//!
//! The rendered document is read by downstream tooling (it is usually written
//! to `TASK.md` inside a worktree), so field order and placeholder text are
//! fixed.

use crate::issue::{Issue, ProviderKind};

/// Placeholder used when a ticket has no description.
pub const NO_DESCRIPTION: &str = "_No description provided._";

/// Human label for a Linear priority value.
///
/// Unknown values fall back to the bare number.
#[must_use]
pub fn priority_label(priority: u8) -> String {
    match priority {
        0 => "— (No priority)".to_string(),
        1 => "🔴 Urgent".to_string(),
        2 => "🟠 High".to_string(),
        3 => "🟡 Medium".to_string(),
        4 => "🟢 Low".to_string(),
        other => other.to_string(),
    }
}

/// Renders `issue` as a markdown context document.
///
/// The priority line is only emitted for Linear tickets that carry a priority.
/// The document ends with the description; comments are not rendered.
#[must_use]
pub fn render(issue: &Issue) -> String {
    let mut lines = vec![
        format!("# {}: {}", issue.identifier, issue.title),
        String::new(),
        format!("**Provider:** {}", issue.provider.display_name()),
        format!("**State:** {}", issue.state),
        format!("**Team:** {}", issue.team.as_deref().unwrap_or("—")),
        format!(
            "**Assignee:** {}",
            issue.assignee.as_deref().unwrap_or("Unassigned")
        ),
    ];

    if let (ProviderKind::Linear, Some(priority)) = (issue.provider, issue.priority) {
        lines.push(format!("**Priority:** {}", priority_label(priority)));
    }

    let labels = if issue.labels.is_empty() {
        "none".to_string()
    } else {
        issue.labels.join(", ")
    };
    lines.extend([
        format!("**Labels:** {labels}"),
        format!("**URL:** {}", issue.url),
        String::new(),
        "## Description".to_string(),
        String::new(),
        issue
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(NO_DESCRIPTION)
            .to_string(),
    ]);

    lines.join("\n")
}
