use std::path::{Path, PathBuf};

use charmap::{CodecStats, LoadOptions, Session, TableSummary};

/// Resolve the numbered-file shorthand: a path made only of ASCII digits `N`
/// becomes `N.txt`; anything else is returned unchanged.
pub fn resolve_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            PathBuf::from(format!("{s}.txt"))
        }
        _ => path.to_path_buf(),
    }
}

/// Build load options from the shared CLI flags.
pub fn load_options(strict: bool, max_index: u32) -> LoadOptions {
    LoadOptions { max_index, strict }
}

/// Create a session and load `map` into it, with user-friendly error messages.
///
/// Returns `Err(1)` with a message printed to stderr if the map cannot be
/// loaded.
pub fn open_session(
    map: &Path,
    strict: bool,
    max_index: u32,
) -> Result<(Session, TableSummary), i32> {
    let session = Session::with_options(load_options(strict, max_index));
    let map = resolve_path(map);
    let summary = session.load_mapping(&map).map_err(|e| {
        eprintln!("Error: failed to load character map: {e}");
        1
    })?;
    Ok((session, summary))
}

/// Print loader diagnostics to stderr, one per line.
pub fn report_diagnostics(summary: &TableSummary) {
    for diagnostic in &summary.diagnostics {
        eprintln!("{diagnostic}");
    }
}

/// Print a JSON value to stdout.
pub fn print_json(value: &serde_json::Value) -> Result<(), i32> {
    let text = serde_json::to_string_pretty(value).map_err(|e| {
        eprintln!("Error: failed to serialize output: {e}");
        1
    })?;
    println!("{text}");
    Ok(())
}

/// JSON object for a finished encode or decode.
pub fn stats_json(
    operation: &str,
    input: &Path,
    output: &Path,
    summary: &TableSummary,
    stats: &CodecStats,
) -> serde_json::Value {
    serde_json::json!({
        "operation": operation,
        "input": input.display().to_string(),
        "output": output.display().to_string(),
        "map": {
            "source": summary.source.as_ref().map(|p| p.display().to_string()),
            "size": summary.size,
            "warnings": summary.warning_count(),
        },
        "stats": stats,
    })
}
