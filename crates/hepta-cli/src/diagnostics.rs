//! Human-readable rendering of compiler and interpreter errors.

use hepta_core::{Error, Violation};

/// Line and column (both one-based) of a flattened-text index
pub fn locate(source: &str, flat_index: usize) -> Option<(usize, usize)> {
    let mut seen = 0;
    for (line_no, line) in source.lines().enumerate() {
        for (column, c) in line.chars().enumerate() {
            if c.is_whitespace() {
                continue;
            }
            if seen == flat_index {
                return Some((line_no + 1, column + 1));
            }
            seen += 1;
        }
    }
    None
}

/// Render `err` against the source it came from.
///
/// Encoding violations point at the offending line with a caret span; every
/// other error renders as its message.
pub fn render(source: &str, err: &Error) -> String {
    match err {
        Error::InvalidEncoding(violation) => render_violation(source, violation),
        other => format!("error: {}", other),
    }
}

fn render_violation(source: &str, violation: &Violation) -> String {
    let mut out = format!("error: invalid encoding: {}", violation);

    let Some((line_no, column)) = locate(source, violation.index) else {
        return out;
    };
    let line = source.lines().nth(line_no - 1).unwrap_or_default();
    let gutter = line_no.to_string().len();

    // Mark only the flattened characters of the run; it may continue on later lines.
    let mut remaining = violation.end() - violation.index;
    let mut marker = " ".repeat(column - 1);
    for c in line.chars().skip(column - 1) {
        if remaining == 0 {
            break;
        }
        if c.is_whitespace() {
            marker.push(' ');
        } else {
            marker.push('^');
            remaining -= 1;
        }
    }

    out.push_str(&format!("\n{:>gutter$}--> line {}, column {}", "", line_no, column));
    out.push_str(&format!("\n{:>gutter$} |", ""));
    out.push_str(&format!("\n{} | {}", line_no, line));
    out.push_str(&format!("\n{:>gutter$} | {}", "", marker));
    out
}
