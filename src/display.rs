use owo_colors::{OwoColorize, Stream, Style};

use crate::group::GroupedResult;
use crate::types::Record;

/// Truncate a line at word boundaries, appending "..." if truncated.
pub fn truncate_line(line: &str, max_chars: usize) -> String {
    let char_count = line.chars().count();
    if char_count <= max_chars {
        return line.to_string();
    }

    if max_chars < 3 {
        return ".".repeat(max_chars);
    }

    let limit = max_chars - 3;

    // Byte offset of the character at position `limit`
    let byte_limit = line
        .char_indices()
        .nth(limit)
        .map(|(i, _)| i)
        .unwrap_or(line.len());

    let truncated = &line[..byte_limit];
    match truncated
        .char_indices()
        .rev()
        .find(|(_, c)| *c == ' ' || *c == ',')
        .map(|(i, _)| i)
    {
        Some(cut) if cut > 0 => format!("{}...", &truncated[..cut]),
        _ => format!("{}...", truncated),
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

fn compact_json(record: &Record) -> String {
    serde_json::to_string(record).unwrap_or_else(|_| "{}".to_string())
}

// Style constants
fn style_group() -> Style {
    Style::new().cyan().bold()
}

fn style_dim_italic() -> Style {
    Style::new().dimmed().italic()
}

/// Default format: header, one block per group, footer with totals.
pub fn format_default(result: &GroupedResult, group_key: &str, max_line: usize) -> String {
    let mut out = String::new();

    let header = format!("Records grouped by '{}':", group_key);
    out.push_str(
        &header
            .if_supports_color(Stream::Stdout, |s| s.dimmed())
            .to_string(),
    );
    out.push_str("\n\n");

    if result.is_empty() {
        out.push_str(
            &"No records."
                .if_supports_color(Stream::Stdout, |s| s.style(style_dim_italic()))
                .to_string(),
        );
        out.push_str("\n\n");
    }

    for (value, residuals) in result.iter() {
        let label = value.label();
        let style = if value.is_missing() {
            style_dim_italic()
        } else {
            style_group()
        };
        let styled = label
            .if_supports_color(Stream::Stdout, |s| s.style(style))
            .to_string();
        out.push_str(&format!("{} ({})\n", styled, residuals.len()));

        // two-space indent counts against the width
        let width = max_line.saturating_sub(2);
        for residual in residuals {
            out.push_str("  ");
            out.push_str(&truncate_line(&compact_json(residual), width));
            out.push('\n');
        }
        out.push('\n');
    }

    let footer = format!(
        "{}, {}",
        plural(result.len(), "group"),
        plural(result.total_records(), "record")
    );
    out.push_str(
        &footer
            .if_supports_color(Stream::Stdout, |s| s.dimmed())
            .to_string(),
    );
    out.push('\n');

    out
}

/// Short format: `<key>\t<count>` per group, no header or footer.
pub fn format_short(result: &GroupedResult) -> String {
    let mut out = String::new();
    for (value, residuals) in result.iter() {
        out.push_str(&format!("{}\t{}\n", value.label(), residuals.len()));
    }
    out
}

/// JSON format: the grouped object, pretty-printed.
pub fn format_json(result: &GroupedResult) -> String {
    let mut out = serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string());
    out.push('\n');
    out
}
