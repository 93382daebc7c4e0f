//! Character map definition parser.
//!
//! A definition has one directive per line, `<index><TAB><representation>`.
//! Malformed lines never stop a load: each one produces a [`Diagnostic`] and
//! parsing moves on to the next line. Only failing to read the source at all
//! is an error.

use std::io::BufRead;
use std::num::IntErrorKind;

use log::{debug, trace};

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::error::{CharmapError, LoadOptions, LoadResult, Result};
use crate::escape::{decode_escape, display_byte};
use crate::table::MappingTable;

/// How a representation resolved to a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Representation {
    /// Applied exactly as written.
    Byte(u8),
    /// Empty text, read as a space.
    Empty,
    /// Multiple bytes, only the first applies.
    Truncated(u8),
    /// `\X` with an unrecognized `X`.
    UnknownEscape,
}

fn parse_representation(text: &[u8]) -> Representation {
    match text {
        b"Space" => Representation::Byte(b' '),
        b"Tab" => Representation::Byte(b'\t'),
        [] => Representation::Empty,
        [byte] => Representation::Byte(*byte),
        [b'\\', marker] => match decode_escape(*marker) {
            Some(byte) => Representation::Byte(byte),
            None => Representation::UnknownEscape,
        },
        [first, ..] => Representation::Truncated(*first),
    }
}

/// Parse the index segment. Surrounding ASCII whitespace is allowed.
///
/// Integers too large for `i64` saturate, so they still classify as out of
/// range rather than as malformed.
fn parse_index(text: &[u8]) -> Option<i64> {
    let text = std::str::from_utf8(text).ok()?.trim();
    match text.parse::<i64>() {
        Ok(index) => Some(index),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

fn strip_line_ending(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., b'\n' | b'\r'] = line {
        line = rest;
    }
    line
}

/// Incremental table builder; one instance per load.
struct Loader<'o> {
    options: &'o LoadOptions,
    table: MappingTable,
    diagnostics: Vec<Diagnostic>,
}

impl<'o> Loader<'o> {
    fn new(options: &'o LoadOptions) -> Self {
        Self {
            options,
            table: MappingTable::with_capacity(options.max_index),
            diagnostics: Vec::new(),
        }
    }

    fn report(&mut self, code: DiagnosticCode, line: usize, message: String) -> Result<()> {
        let diagnostic = Diagnostic::new(code, line, message);
        trace!("{diagnostic}");
        if self.options.strict && diagnostic.is_warning() {
            return Err(CharmapError::Strict(diagnostic));
        }
        self.diagnostics.push(diagnostic);
        Ok(())
    }

    fn line(&mut self, line_num: usize, raw: &[u8]) -> Result<()> {
        let line = strip_line_ending(raw);

        let Some(tab) = line.iter().position(|&b| b == b'\t') else {
            return self.report(
                DiagnosticCode::MissingSeparator,
                line_num,
                format!("Line {line_num} is not in the expected format (index<tab>character), skipping"),
            );
        };
        let (index_text, representation) = (&line[..tab], &line[tab + 1..]);

        let Some(index) = parse_index(index_text) else {
            return self.report(
                DiagnosticCode::InvalidIndex,
                line_num,
                format!("Line {line_num} has an invalid index, skipping"),
            );
        };
        let max = self.options.max_index;
        let index = match u32::try_from(index) {
            Ok(index) if (1..=max).contains(&index) => index,
            _ => {
                return self.report(
                    DiagnosticCode::IndexOutOfRange,
                    line_num,
                    format!(
                        "Line {line_num} has index {} outside 1..={max}, skipping",
                        String::from_utf8_lossy(index_text).trim()
                    ),
                );
            }
        };

        let byte = match parse_representation(representation) {
            Representation::Byte(byte) => byte,
            Representation::Empty => {
                self.report(
                    DiagnosticCode::EmptyRepresentation,
                    line_num,
                    format!("Empty character at line {line_num} interpreted as space"),
                )?;
                b' '
            }
            Representation::Truncated(first) => {
                self.report(
                    DiagnosticCode::Truncated,
                    line_num,
                    format!(
                        "Character part '{}' contains multiple characters, using first one: '{}'",
                        String::from_utf8_lossy(representation),
                        display_byte(first)
                    ),
                )?;
                first
            }
            Representation::UnknownEscape => {
                return self.report(
                    DiagnosticCode::UnknownEscape,
                    line_num,
                    format!(
                        "Unknown escape sequence {}, ignoring",
                        String::from_utf8_lossy(representation)
                    ),
                );
            }
        };

        self.table.assign(index, byte);
        Ok(())
    }

    fn finish(self) -> LoadResult<MappingTable> {
        debug!(
            "Character map loaded: size {}, {} slots assigned, {} diagnostics",
            self.table.size(),
            self.table.assigned(),
            self.diagnostics.len()
        );
        LoadResult::with_diagnostics(self.table, self.diagnostics)
    }
}

/// Load a character map from a buffered reader.
///
/// Returns the table and the diagnostics collected along the way. Fails only
/// if reading from `reader` fails, or in strict mode on the first warning.
pub fn load_reader<R: BufRead>(
    mut reader: R,
    options: &LoadOptions,
) -> Result<LoadResult<MappingTable>> {
    let mut loader = Loader::new(options);
    let mut buf = Vec::new();
    let mut line_num = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_num += 1;
        loader.line(line_num, &buf)?;
    }
    Ok(loader.finish())
}

/// Load a character map from an in-memory definition.
pub fn load(source: &[u8], options: &LoadOptions) -> Result<LoadResult<MappingTable>> {
    load_reader(source, options)
}
