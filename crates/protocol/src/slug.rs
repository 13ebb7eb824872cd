//! Git-safe branch names derived from tickets.
//!
//! A slug is `<identifier>-<title>` where both halves are lowercased and every
//! run of characters outside `[a-z0-9]` collapses to a single hyphen. The title
//! half is capped at [`TITLE_MAX_LEN`] characters.
//!
//! # Examples
//!
//! ```
//! use ctw_protocol::slug::slugify;
//!
//! assert_eq!(slugify("jdoss/quickvm#42", None), "jdoss-quickvm-42");
//! assert_eq!(slugify("Fix: null & undefined", None), "fix-null-undefined");
//! ```

use crate::issue::Issue;

/// Maximum length of the title half of a slug.
pub const TITLE_MAX_LEN: usize = 40;

/// Lowercases `text` and collapses non-alphanumeric runs into single hyphens.
///
/// With `max_len`, the result is truncated to that many characters before the
/// trailing hyphen is trimmed, so truncation never leaves a dangling `-`.
#[must_use]
pub fn slugify(text: &str, max_len: Option<usize>) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    // Only ASCII is ever pushed, so byte length equals char count.
    if let Some(max) = max_len {
        slug.truncate(max);
    }
    slug.trim_end_matches('-').to_string()
}

/// Returns the branch name for `issue`.
///
/// An empty title slug yields the identifier slug alone.
///
/// # Examples
///
/// ```
/// use ctw_protocol::{Issue, ProviderKind, make_slug};
///
/// let issue = Issue {
///     id: "1".into(),
///     identifier: "ENG-123".into(),
///     title: "Fix null check in auth middleware".into(),
///     description: None,
///     url: "https://linear.app/acme/issue/ENG-123".into(),
///     state: "Todo".into(),
///     priority: None,
///     assignee: None,
///     team: None,
///     labels: vec![],
///     comments: vec![],
///     provider: ProviderKind::Linear,
/// };
/// assert_eq!(make_slug(&issue), "eng-123-fix-null-check-in-auth-middleware");
/// ```
#[must_use]
pub fn make_slug(issue: &Issue) -> String {
    let identifier = slugify(&issue.identifier, None);
    let title = slugify(&issue.title, Some(TITLE_MAX_LEN));
    match (identifier.is_empty(), title.is_empty()) {
        (_, true) => identifier,
        (true, false) => title,
        (false, false) => format!("{identifier}-{title}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::ProviderKind;

    fn issue(identifier: &str, title: &str, provider: ProviderKind) -> Issue {
        Issue {
            id: "1".to_string(),
            identifier: identifier.to_string(),
            title: title.to_string(),
            description: None,
            url: "https://example.com".to_string(),
            state: "Open".to_string(),
            priority: None,
            assignee: None,
            team: None,
            labels: vec![],
            comments: vec![],
            provider,
        }
    }

    #[test]
    fn linear_slug() {
        let slug = make_slug(&issue(
            "ENG-123",
            "Fix null check in auth middleware",
            ProviderKind::Linear,
        ));
        assert_eq!(slug, "eng-123-fix-null-check-in-auth-middleware");
    }

    #[test]
    fn github_slug() {
        let slug = make_slug(&issue("jdoss/quickvm#42", "Fix null check", ProviderKind::GitHub));
        assert_eq!(slug, "jdoss-quickvm-42-fix-null-check");
    }

    #[test]
    fn special_characters_collapse() {
        let slug = make_slug(&issue(
            "ENG-99",
            "Fix: null & undefined (edge case)",
            ProviderKind::Linear,
        ));
        assert_eq!(slug, "eng-99-fix-null-undefined-edge-case");
    }

    #[test]
    fn long_title_is_truncated() {
        let slug = slugify(
            "This is a very long title that exceeds forty characters easily",
            Some(TITLE_MAX_LEN),
        );
        assert_eq!(slug, "this-is-a-very-long-title-that-exceeds-f");
    }

    #[test]
    fn truncation_never_leaves_trailing_hyphen() {
        // Character 40 of the slugified title is a hyphen.
        let title = format!("{} tail", "a".repeat(39));
        let slug = slugify(&title, Some(TITLE_MAX_LEN));
        assert_eq!(slug, "a".repeat(39));
    }

    #[test]
    fn title_truncated_to_exactly_forty() {
        let slug = slugify(&"abcdefghij".repeat(6), Some(TITLE_MAX_LEN));
        assert_eq!(slug.len(), TITLE_MAX_LEN);
    }

    #[test]
    fn surrounding_punctuation_is_trimmed() {
        let slug = make_slug(&issue("ENG-1", "---Fix this---", ProviderKind::Linear));
        assert_eq!(slug, "eng-1-fix-this");
    }

    #[test]
    fn empty_title_yields_identifier_only() {
        assert_eq!(make_slug(&issue("ENG-1", "", ProviderKind::Linear)), "eng-1");
        assert_eq!(make_slug(&issue("ENG-1", "???", ProviderKind::Linear)), "eng-1");
    }

    #[test]
    fn non_ascii_letters_become_separators() {
        assert_eq!(slugify("Café déjà vu", None), "caf-d-j-vu");
    }
}
