//! Line diffs of pretty-printed records

use anyhow::Result;
use cg_core::Record;
use owo_colors::OwoColorize;
use similar::{ChangeTag, DiffOp, TextDiff};

/// Render a colored line diff, grouped around changes
///
/// Each group opens with the first old line it touches; `context_lines`
/// unchanged lines surround every change.
pub fn generate_unified_diff(old_text: &str, new_text: &str, context_lines: usize) -> String {
    let diff = TextDiff::from_lines(old_text, new_text);
    let mut output = String::new();

    for group in diff.grouped_ops(context_lines) {
        output.push_str(&format!("    {}\n", group_header(&group).cyan()));

        for op in &group {
            for change in diff.iter_changes(op) {
                output.push_str("    ");
                output.push_str(&render_line(change.tag(), change.value()));
                if change.missing_newline() {
                    output.push('\n');
                }
            }
        }
    }

    output
}

fn group_header(group: &[DiffOp]) -> String {
    let line = group.first().map_or(0, |op| op.old_range().start) + 1;
    format!("@ line {}", line)
}

fn render_line(tag: ChangeTag, line: &str) -> String {
    // ChangeTag displays as its marker: "-", "+" or " "
    let marked = format!("{}{}", tag, line);
    match tag {
        ChangeTag::Delete => marked.red().to_string(),
        ChangeTag::Insert => marked.green().to_string(),
        ChangeTag::Equal => marked.dimmed().to_string(),
    }
}

/// Diff two records by their pretty-printed JSON
pub fn record_diff(old: &Record, new: &Record, context_lines: usize) -> Result<String> {
    let old_text = serde_json::to_string_pretty(old)?;
    let new_text = serde_json::to_string_pretty(new)?;
    Ok(generate_unified_diff(&old_text, &new_text, context_lines))
}
