//! GraphQL documents sent to Linear.

/// Fetches one issue, including its first 50 comments.
pub const GET_ISSUE: &str = r"
query GetIssue($id: String!) {
  issue(id: $id) {
    id
    identifier
    title
    description
    url
    priority
    state { name type }
    assignee { name email }
    team { name key }
    labels { nodes { name } }
    comments(first: 50) { nodes { body user { name } } }
  }
}
";

/// Lists started and unstarted issues assigned to the viewer.
pub const LIST_MY_ISSUES: &str = r"
query ListMyIssues {
  viewer {
    assignedIssues(
      filter: { state: { type: { in: [started, unstarted] } } }
      orderBy: updatedAt
    ) {
      nodes {
        id
        identifier
        title
        description
        url
        priority
        state { name type }
        assignee { name email }
        team { name key }
        labels { nodes { name } }
      }
    }
  }
}
";

pub const LIST_TEAMS: &str = r"
query ListTeams {
  teams {
    nodes {
      id
      name
      key
    }
  }
}
";

pub const CREATE_ISSUE: &str = r"
mutation CreateIssue($title: String!, $description: String, $teamId: String!, $priority: Int) {
  issueCreate(input: {
    title: $title
    description: $description
    teamId: $teamId
    priority: $priority
  }) {
    success
    issue {
      id
      identifier
      title
      url
    }
  }
}
";
