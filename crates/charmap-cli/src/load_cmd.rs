use std::path::Path;

use charmap::TableSummary;

use crate::cli::OutputFormat;
use crate::shared::{open_session, print_json};

pub fn run(map: &Path, format: &OutputFormat, strict: bool, max_index: u32) -> Result<(), i32> {
    let (_session, summary) = open_session(map, strict, max_index)?;

    match format {
        OutputFormat::Text => print!("{}", render_text(&summary)),
        OutputFormat::Json => {
            let value = serde_json::to_value(&summary).map_err(|e| {
                eprintln!("Error: failed to serialize output: {e}");
                1
            })?;
            print_json(&value)?;
        }
    }
    Ok(())
}

/// Text report: diagnostics, a one-line summary, then the table listing.
pub fn render_text(summary: &TableSummary) -> String {
    let mut out = String::new();
    for diagnostic in &summary.diagnostics {
        out.push_str(&format!("{diagnostic}\n"));
    }
    if !summary.diagnostics.is_empty() {
        out.push('\n');
    }
    let source = summary
        .source
        .as_ref()
        .map(|p| format!(" from {}", p.display()))
        .unwrap_or_default();
    out.push_str(&format!(
        "Character mapping loaded{source}: size {}, {} assigned, {} warning(s)\n",
        summary.size,
        summary.assigned,
        summary.warning_count()
    ));
    for entry in &summary.entries {
        out.push_str(&format!("{entry}\n"));
    }
    out
}
