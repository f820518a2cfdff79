//! Terminal styling for CLI output.
//!
//! Status lines get a coloured badge in front of plain text. Diff lines are
//! coloured whole so the `+`/`-` prefix and content read as one unit.

use console::Style;

fn badge(style: Style, symbol: &str, msg: &str) -> String {
    format!("{} {}", style.apply_to(symbol), msg)
}

pub fn success(msg: &str) -> String {
    badge(Style::new().green(), "✓", msg)
}

/// Conflict verdicts and ignored flags.
pub fn warn(msg: &str) -> String {
    badge(Style::new().yellow(), "⚠", msg)
}

pub fn header(msg: &str) -> String {
    Style::new().bold().apply_to(msg).to_string()
}

pub fn dim(msg: &str) -> String {
    Style::new().dim().apply_to(msg).to_string()
}

/// Line present only in the remote version.
pub fn added(line: &str) -> String {
    Style::new().green().apply_to(format!("+{line}")).to_string()
}

/// Line present only in the local version.
pub fn removed(line: &str) -> String {
    Style::new().red().apply_to(format!("-{line}")).to_string()
}
