//! Escape sequences accepted in character map definitions, and the
//! display form used when listing a table.

/// Return the byte for a two-character escape `\marker`.
///
/// Recognized markers are `n`, `t`, `r`, `0`, `\`, `'` and `"`.
#[must_use]
pub fn decode_escape(marker: u8) -> Option<u8> {
    match marker {
        b'n' => Some(b'\n'),
        b't' => Some(b'\t'),
        b'r' => Some(b'\r'),
        b'0' => Some(0),
        b'\\' => Some(b'\\'),
        b'\'' => Some(b'\''),
        b'"' => Some(b'"'),
        _ => None,
    }
}

/// Render a byte for a table listing.
///
/// Printable ASCII (space included) is shown as itself; everything else,
/// tab and newline included, as `\xNN`.
#[must_use]
pub fn display_byte(byte: u8) -> String {
    if byte == b' ' || byte.is_ascii_graphic() {
        char::from(byte).to_string()
    } else {
        format!("\\x{byte:02x}")
    }
}
