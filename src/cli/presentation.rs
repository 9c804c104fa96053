//! CLI presentation: text and json formatters for snapshot outputs.

use crate::error::ApiError;
use crate::snapshot::SnapshotOutput;
use owo_colors::OwoColorize;

fn heading(text: &str, color: bool) -> String {
    if color {
        format!("{}", text.bold().underline())
    } else {
        text.to_string()
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Human-readable output. `skipped` is the number of non-fatal traversal errors.
pub fn format_output_text(output: &SnapshotOutput, skipped: usize, color: bool) -> String {
    let mut s = match output {
        SnapshotOutput::Rendered { rendered, id } => {
            let mut s = format!(
                "{}\n  ID: {}",
                heading(&format!("Rendered {}", plural(output.len(), "file")), color),
                id
            );
            for (path, content) in rendered {
                s.push_str(&format!("\n\n--- {}\n{}", path, content));
            }
            s
        }
        SnapshotOutput::Listing { list, map, id } => {
            let mut s = format!(
                "{}\n  ID: {}",
                heading(&format!("Listed {}", plural(output.len(), "file")), color),
                id
            );
            for path in list {
                let name = map.get(path).map(String::as_str).unwrap_or_default();
                s.push_str(&format!("\n  {} ({})", path, name));
            }
            s
        }
    };

    if skipped > 0 {
        let noun = if skipped == 1 { "entry" } else { "entries" };
        let note = format!("Skipped {} unreadable {} (see log for details)", skipped, noun);
        let note = if color {
            format!("{}", note.yellow())
        } else {
            note
        };
        s.push_str(&format!("\n\n{}", note));
    }
    s
}

/// JSON output: `{"rendered": {...}, "id": ...}` or `{"list": [...], "map": {...}, "id": ...}`
pub fn format_output_json(output: &SnapshotOutput) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(output)?)
}
