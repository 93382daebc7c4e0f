use std::io::{self, BufRead, Write};
use std::path::Path;

use charmap::{CharmapError, Session};

use crate::load_cmd::render_text;
use crate::shared::{load_options, resolve_path};

const MENU: &str = "\nCharacter map encoder/decoder\n\
    1. Load character mapping from file\n\
    2. Encode file to numeric format\n\
    3. Decode numeric file to text\n\
    4. Exit\n\
    Enter your choice: ";

pub fn run(strict: bool, max_index: u32) -> Result<(), i32> {
    let session = Session::with_options(load_options(strict, max_index));
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_menu(&session, stdin.lock(), stdout.lock()).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })
}

/// Read one trimmed line; `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    message: &str,
) -> io::Result<Option<String>> {
    write!(out, "{message}")?;
    out.flush()?;
    read_line(input)
}

/// Drive the menu until the user exits or input ends.
pub fn run_menu<R: BufRead, W: Write>(
    session: &Session,
    mut input: R,
    mut out: W,
) -> io::Result<()> {
    loop {
        let Some(choice) = prompt(&mut input, &mut out, MENU)? else {
            return Ok(());
        };
        match choice.as_str() {
            "1" => {
                let Some(map) = prompt(
                    &mut input,
                    &mut out,
                    "Enter the character map file (a number N loads N.txt): ",
                )?
                else {
                    return Ok(());
                };
                match session.load_mapping(resolve_path(Path::new(&map))) {
                    Ok(summary) => write!(out, "{}", render_text(&summary))?,
                    Err(e) => writeln!(out, "Error: {e}")?,
                }
            }
            "2" | "3" => {
                match session.table() {
                    Ok(_) => {}
                    Err(CharmapError::NotLoaded) => {
                        writeln!(out, "Please load a character map first (option 1).")?;
                        continue;
                    }
                    Err(e) => {
                        writeln!(out, "Error: {e}")?;
                        continue;
                    }
                }
                let encoding = choice == "2";
                let source_prompt = if encoding {
                    "Enter the file to encode: "
                } else {
                    "Enter the file to decode (a number N reads N.txt): "
                };
                let Some(source) = prompt(&mut input, &mut out, source_prompt)? else {
                    return Ok(());
                };
                let Some(target) = prompt(
                    &mut input,
                    &mut out,
                    "Enter the output file (a number N writes N.txt): ",
                )?
                else {
                    return Ok(());
                };
                let source = resolve_path(Path::new(&source));
                let target = resolve_path(Path::new(&target));

                let result = if encoding {
                    session.encode_file(&source, &target)
                } else {
                    session.decode_file(&source, &target)
                };
                match result {
                    Ok(stats) if encoding => writeln!(
                        out,
                        "Encoding complete: {} -> {} ({} tokens, {} unmapped)",
                        source.display(),
                        target.display(),
                        stats.tokens,
                        stats.sentinels
                    )?,
                    Ok(stats) => writeln!(
                        out,
                        "Decoding complete: {} -> {} ({} bytes)",
                        source.display(),
                        target.display(),
                        stats.bytes_written
                    )?,
                    Err(e) => writeln!(out, "Error: {e}")?,
                }
            }
            "4" => {
                writeln!(out, "Exiting program. Goodbye!")?;
                return Ok(());
            }
            _ => writeln!(out, "Invalid choice. Please try again.")?,
        }
    }
}
