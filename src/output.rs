//! Plain-text output helpers.

use std::io::{self, Write};

/// Placeholder for unset configuration values.
pub const NOT_SET: &str = "(not set)";

/// Writes an aligned table with a header row and a dashed separator.
///
/// Widths are counted in characters so labels such as `🟡 Medium` do not
/// throw off the columns by their byte length.
pub fn write_table(out: &mut impl Write, headers: &[&str], rows: &[Vec<String>]) -> io::Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<String>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{cell:w$}")
            })
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    writeln!(out, "{}", line(headers.iter().map(|h| (*h).to_string()).collect()))?;
    writeln!(out, "{}", line(widths.iter().map(|&w| "-".repeat(w)).collect()))?;
    for row in rows {
        writeln!(out, "{}", line(row.clone()))?;
    }
    Ok(())
}

/// Masks a credential for display as `prefix...last5`.
///
/// Values of five characters or fewer become `***`.
///
/// # Examples
///
/// ```
/// use ctw::output::mask_secret;
///
/// assert_eq!(mask_secret(Some("lin_api_abcdefghij"), "lin_api_"), "lin_api_...fghij");
/// assert_eq!(mask_secret(Some("abc"), "ghp_"), "***");
/// assert_eq!(mask_secret(None, "ghp_"), "(not set)");
/// ```
#[must_use]
pub fn mask_secret(value: Option<&str>, prefix: &str) -> String {
    let Some(value) = value else {
        return NOT_SET.to_string();
    };
    let len = value.chars().count();
    if len <= 5 {
        return "***".to_string();
    }
    let tail: String = value.chars().skip(len - 5).collect();
    format!("{prefix}...{tail}")
}
