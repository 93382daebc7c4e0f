use std::path::Path;

use crate::cli::OutputFormat;
use crate::shared::{open_session, print_json, report_diagnostics, resolve_path, stats_json};

pub fn run(
    map: &Path,
    input: &Path,
    output: &Path,
    format: &OutputFormat,
    strict: bool,
    max_index: u32,
) -> Result<(), i32> {
    let (session, summary) = open_session(map, strict, max_index)?;
    report_diagnostics(&summary);

    let input = resolve_path(input);
    let output = resolve_path(output);
    let stats = session.decode_file(&input, &output).map_err(|e| {
        eprintln!("Error: failed to decode file: {e}");
        1
    })?;

    match format {
        OutputFormat::Text => println!(
            "Decoded {} -> {}: {} tokens, {} bytes, {} placeholder(s), {} dropped",
            input.display(),
            output.display(),
            stats.tokens,
            stats.bytes_written,
            stats.sentinels,
            stats.dropped
        ),
        OutputFormat::Json => {
            print_json(&stats_json("decode", &input, &output, &summary, &stats))?
        }
    }
    Ok(())
}
