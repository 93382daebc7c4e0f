//! Byte ⇄ token codec over a [`MappingTable`].
//!
//! Encoding replaces every input byte with the lowest index holding it, or
//! [`SENTINEL`] when no index does, so the token count always equals the byte
//! count. Decoding maps [`SENTINEL`] to [`PLACEHOLDER`], assigned indices to
//! their byte, and silently drops everything else.
//!
//! The token text format is decimal numbers each followed by a single space.
//! The decode side accepts any whitespace between tokens and discards words
//! that are not non-negative decimal integers.

use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};

use log::debug;

use crate::table::MappingTable;

/// Token emitted for a byte with no mapping.
pub const SENTINEL: u32 = 0;

/// Byte emitted when decoding [`SENTINEL`].
pub const PLACEHOLDER: u8 = b'?';

/// Counters describing one encode or decode pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodecStats {
    /// Bytes consumed from the input.
    pub bytes_read: u64,
    /// Tokens produced (encode) or scanned (decode), malformed words included.
    pub tokens: u64,
    /// Bytes written to the output.
    pub bytes_written: u64,
    /// Sentinel tokens: unmapped bytes on encode, placeholders on decode.
    pub sentinels: u64,
    /// Decode only: words that were malformed, out of range, or unassigned.
    pub dropped: u64,
}

/// Lazy encoder created by [`encode`].
#[derive(Debug, Clone)]
pub struct Encode<'t, I> {
    table: &'t MappingTable,
    bytes: I,
}

impl<I: Iterator<Item = u8>> Iterator for Encode<'_, I> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let byte = self.bytes.next()?;
        Some(self.table.index_of(byte).unwrap_or(SENTINEL))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.bytes.size_hint()
    }
}

impl<I: ExactSizeIterator<Item = u8>> ExactSizeIterator for Encode<'_, I> {}

/// Encode bytes into tokens, one token per byte.
pub fn encode<I>(bytes: I, table: &MappingTable) -> Encode<'_, I::IntoIter>
where
    I: IntoIterator<Item = u8>,
{
    Encode {
        table,
        bytes: bytes.into_iter(),
    }
}

/// Decode a single token. `None` means the token emits nothing.
pub fn decode_token(token: u64, table: &MappingTable) -> Option<u8> {
    if token == u64::from(SENTINEL) {
        return Some(PLACEHOLDER);
    }
    u32::try_from(token).ok().and_then(|index| table.get(index))
}

/// Lazy decoder created by [`decode`].
#[derive(Debug, Clone)]
pub struct Decode<'t, I> {
    table: &'t MappingTable,
    tokens: I,
}

impl<I: Iterator<Item = u64>> Iterator for Decode<'_, I> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        self.tokens
            .by_ref()
            .find_map(|token| decode_token(token, self.table))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.tokens.size_hint().1)
    }
}

/// Decode tokens into bytes.
pub fn decode<I>(tokens: I, table: &MappingTable) -> Decode<'_, I::IntoIter>
where
    I: IntoIterator<Item = u64>,
{
    Decode {
        table,
        tokens: tokens.into_iter(),
    }
}

/// Whitespace as a C-style numeric scanner sees it (ASCII whitespace plus vertical tab).
fn is_token_space(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == 0x0b
}

/// Parse one whitespace-free word as a token.
///
/// Accepts an optional leading `+` followed by decimal digits. Values too
/// large for `u64` saturate, which keeps them out of range of every table.
pub fn parse_token(word: &[u8]) -> Option<u64> {
    let mut scanner = TokenScanner::default();
    for &byte in word {
        scanner.push(byte);
    }
    scanner.finish().flatten()
}

/// Parses one word a byte at a time in constant space.
#[derive(Debug, Default)]
struct TokenScanner {
    in_word: bool,
    valid: bool,
    digits: bool,
    value: u64,
}

impl TokenScanner {
    fn push(&mut self, byte: u8) {
        if !self.in_word {
            *self = Self {
                in_word: true,
                valid: true,
                ..Self::default()
            };
            if byte == b'+' {
                return;
            }
        }
        match byte {
            b'0'..=b'9' if self.valid => {
                self.digits = true;
                self.value = self
                    .value
                    .saturating_mul(10)
                    .saturating_add(u64::from(byte - b'0'));
            }
            _ => self.valid = false,
        }
    }

    /// End the current word. `None` if no word was started, otherwise the
    /// parsed token (`None` inside for a malformed word).
    fn finish(&mut self) -> Option<Option<u64>> {
        if !self.in_word {
            return None;
        }
        self.in_word = false;
        Some((self.valid && self.digits).then_some(self.value))
    }
}

/// Split `input` into whitespace-separated words and keep the valid tokens.
pub fn scan_tokens(input: &[u8]) -> impl Iterator<Item = u64> + '_ {
    input
        .split(|&b| is_token_space(b))
        .filter(|word| !word.is_empty())
        .filter_map(parse_token)
}

/// Call `f` with the parsed token of every whitespace-separated word of
/// `reader` (`None` for malformed words). Memory use does not depend on word
/// length. Returns the number of bytes read.
fn for_each_token<R: BufRead>(
    mut reader: R,
    mut f: impl FnMut(Option<u64>) -> io::Result<()>,
) -> io::Result<u64> {
    let mut scanner = TokenScanner::default();
    let mut read = 0u64;
    loop {
        let buf = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if buf.is_empty() {
            break;
        }
        let len = buf.len();
        for &byte in buf {
            if !is_token_space(byte) {
                scanner.push(byte);
            } else if let Some(token) = scanner.finish() {
                f(token)?;
            }
        }
        reader.consume(len);
        read += len as u64;
    }
    if let Some(token) = scanner.finish() {
        f(token)?;
    }
    Ok(read)
}

/// Encode everything from `reader` into `writer` as token text.
pub fn encode_stream<R: Read, W: Write>(
    reader: R,
    writer: W,
    table: &MappingTable,
) -> io::Result<CodecStats> {
    let mut reader = BufReader::new(reader);
    let mut writer = BufWriter::new(writer);
    let mut stats = CodecStats::default();
    loop {
        let buf = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if buf.is_empty() {
            break;
        }
        let len = buf.len();
        for token in encode(buf.iter().copied(), table) {
            if token == SENTINEL {
                stats.sentinels += 1;
            }
            write!(writer, "{token} ")?;
            stats.bytes_written += token_width(token);
            stats.tokens += 1;
        }
        reader.consume(len);
        stats.bytes_read += len as u64;
    }
    writer.flush()?;
    debug!(
        "Encoded {} bytes into {} tokens ({} unmapped)",
        stats.bytes_read, stats.tokens, stats.sentinels
    );
    Ok(stats)
}

/// Decode token text from `reader` into raw bytes on `writer`.
pub fn decode_stream<R: Read, W: Write>(
    reader: R,
    writer: W,
    table: &MappingTable,
) -> io::Result<CodecStats> {
    let mut writer = BufWriter::new(writer);
    let mut stats = CodecStats::default();
    let bytes_read = for_each_token(BufReader::new(reader), |token| {
        stats.tokens += 1;
        match token.and_then(|token| decode_token(token, table).map(|b| (token, b))) {
            Some((token, byte)) => {
                if token == u64::from(SENTINEL) {
                    stats.sentinels += 1;
                }
                writer.write_all(&[byte])?;
                stats.bytes_written += 1;
            }
            None => stats.dropped += 1,
        }
        Ok(())
    })?;
    stats.bytes_read = bytes_read;
    writer.flush()?;
    debug!(
        "Decoded {} tokens into {} bytes ({} placeholders, {} dropped)",
        stats.tokens, stats.bytes_written, stats.sentinels, stats.dropped
    );
    Ok(stats)
}

/// Length of `"{token} "`.
fn token_width(token: u32) -> u64 {
    u64::from(token.checked_ilog10().unwrap_or(0)) + 2
}

/// Encode `input` and return the token text.
pub fn encode_to_string(input: &[u8], table: &MappingTable) -> String {
    use std::fmt::Write as _;

    let mut out = String::with_capacity(input.len() * 3);
    for token in encode(input.iter().copied(), table) {
        // Writing to a String cannot fail.
        let _ = write!(out, "{token} ");
    }
    out
}

/// Decode token text and return the bytes.
pub fn decode_to_vec(input: &[u8], table: &MappingTable) -> Vec<u8> {
    decode(scan_tokens(input), table).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> MappingTable {
        MappingTable::from_entries([(1, b' '), (2, b'\t'), (3, b'A')])
    }

    #[test]
    fn encode_known_and_unknown_bytes() {
        let table = sample_table();
        let tokens: Vec<u32> = encode(*b" \tAZ", &table).collect();
        assert_eq!(tokens, vec![1, 2, 3, 0]);
    }

    #[test]
    fn encode_to_string_reference_shape() {
        let table = sample_table();
        assert_eq!(encode_to_string(b" \tAZ", &table), "1 2 3 0 ");
    }

    #[test]
    fn decode_reference_stream() {
        let table = sample_table();
        assert_eq!(decode_to_vec(b"1 2 3 0 ", &table), b" \tA?");
    }

    #[test]
    fn empty_in_empty_out() {
        let table = sample_table();
        assert_eq!(encode(Vec::<u8>::new(), &table).count(), 0);
        assert_eq!(encode_to_string(b"", &table), "");
        assert!(decode_to_vec(b"", &table).is_empty());
        assert!(decode_to_vec(b"   \n\t", &table).is_empty());
    }

    #[test]
    fn token_count_equals_byte_count() {
        let table = sample_table();
        let input: Vec<u8> = (0..=255u8).chain(*b"AAA   ").collect();
        let encoder = encode(input.iter().copied(), &table);
        assert_eq!(encoder.len(), input.len());
        assert_eq!(encoder.count(), input.len());
    }

    #[test]
    fn encode_uses_lowest_index_for_duplicates() {
        let table = MappingTable::from_entries([(7, b'x'), (4, b'x')]);
        assert_eq!(encode_to_string(b"x", &table), "4 ");
    }

    #[test]
    fn sentinel_decodes_to_placeholder() {
        let table = MappingTable::default();
        assert_eq!(decode_token(0, &table), Some(b'?'));
        assert_eq!(decode_to_vec(b"0 0", &table), b"??");
    }

    #[test]
    fn out_of_range_and_unassigned_emit_nothing() {
        let table = MappingTable::from_entries([(1, b'a'), (3, b'c')]);
        assert_eq!(decode_token(2, &table), None);
        assert_eq!(decode_token(4, &table), None);
        assert_eq!(decode_token(u64::MAX, &table), None);
        assert_eq!(decode_to_vec(b"2 4 1 99999", &table), b"a");
    }

    #[test]
    fn round_trip_mapped_bytes() {
        let table = MappingTable::from_entries(
            b"abcdefghijklmnopqrstuvwxyz{}();\n "
                .iter()
                .enumerate()
                .map(|(i, &b)| (i as u32 + 1, b)),
        );
        let source = b"int main() {\n  return 0;\n}\n";
        let encoded = encode_to_string(source, &table);
        let decoded = decode_to_vec(encoded.as_bytes(), &table);
        let expected: Vec<u8> = source
            .iter()
            .map(|&b| if table.index_of(b).is_some() { b } else { b'?' })
            .collect();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn unmapped_bytes_come_back_as_placeholder() {
        let table = sample_table();
        for byte in [b'Z', 0u8, 0xff] {
            let encoded = encode_to_string(&[byte], &table);
            assert_eq!(decode_to_vec(encoded.as_bytes(), &table), b"?");
        }
    }

    #[test]
    fn parse_token_accepts_plain_digits() {
        assert_eq!(parse_token(b"0"), Some(0));
        assert_eq!(parse_token(b"42"), Some(42));
        assert_eq!(parse_token(b"007"), Some(7));
        assert_eq!(parse_token(b"+5"), Some(5));
    }

    #[test]
    fn parse_token_rejects_malformed() {
        let words: [&[u8]; 8] = [b"abc", b"-1", b"-0", b"1.5", b"12abc", b"+", b"", b"0x10"];
        for word in words {
            assert_eq!(parse_token(word), None, "{:?}", String::from_utf8_lossy(word));
        }
    }

    #[test]
    fn parse_token_saturates() {
        assert_eq!(parse_token(b"99999999999999999999999"), Some(u64::MAX));
    }

    #[test]
    fn token_width_counts_digits_and_separator() {
        for token in [0, 7, 10, 99, 256, 65_536, u32::MAX] {
            assert_eq!(token_width(token), format!("{token} ").len() as u64);
        }
    }

    #[test]
    fn encode_stream_counts_bytes_written() {
        let table = MappingTable::from_entries((1..=200u32).map(|i| (i, i as u8)));
        let input: Vec<u8> = (0..=255u8).collect();
        let mut out = Vec::new();
        let stats = encode_stream(&input[..], &mut out, &table).unwrap();
        assert_eq!(stats.bytes_written, out.len() as u64);
    }

    #[test]
    fn long_unbroken_runs_are_dropped_as_single_words() {
        let table = MappingTable::from_entries([(1, b'a')]);
        let mut input = b"1 ".to_vec();
        input.extend(vec![b'9'; 1 << 20]);
        input.extend(b"x\n");
        input.extend(vec![b'7'; 1 << 20]);
        input.extend(b" 1");
        let mut out = Vec::new();
        let stats = decode_stream(&input[..], &mut out, &table).unwrap();
        assert_eq!(out, b"aa");
        assert_eq!(stats.tokens, 4);
        assert_eq!(stats.dropped, 2);
        assert_eq!(stats.bytes_read, input.len() as u64);
    }

    #[test]
    fn scanner_state_resets_between_words() {
        let table = MappingTable::from_entries([(1, b'a'), (2, b'b')]);
        assert_eq!(decode_to_vec(b"+ 1 x1 +2 ++2 2", &table), b"abb");
        let mut out = Vec::new();
        decode_stream(&b"+ 1 x1 +2 ++2 2"[..], &mut out, &table).unwrap();
        assert_eq!(out, b"abb");
    }

    #[test]
    fn scanner_skips_non_numeric_words() {
        let tokens: Vec<u64> = scan_tokens(b"1 x 2\t\n3\r\n foo 0\x0b4").collect();
        assert_eq!(tokens, vec![1, 2, 3, 0, 4]);
    }

    #[test]
    fn encode_stream_matches_in_memory() {
        let table = sample_table();
        let input = b"A \tAbc".repeat(5000);
        let mut out = Vec::new();
        let stats = encode_stream(&input[..], &mut out, &table).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), encode_to_string(&input, &table));
        assert_eq!(stats.bytes_read, input.len() as u64);
        assert_eq!(stats.tokens, input.len() as u64);
        assert_eq!(stats.sentinels, 2 * 5000);
    }

    #[test]
    fn decode_stream_matches_in_memory() {
        let table = sample_table();
        let input = "3 1 2 0 9 junk ".repeat(4000);
        let mut out = Vec::new();
        let stats = decode_stream(input.as_bytes(), &mut out, &table).unwrap();
        assert_eq!(out, decode_to_vec(input.as_bytes(), &table));
        assert_eq!(stats.tokens, 6 * 4000);
        assert_eq!(stats.bytes_written, 4 * 4000);
        assert_eq!(stats.sentinels, 4000);
        assert_eq!(stats.dropped, 2 * 4000);
    }

    #[test]
    fn decode_stream_handles_words_across_buffer_boundaries() {
        // One-byte reads force every multi-digit token to straddle refills.
        struct Trickle<'a>(&'a [u8]);
        impl Read for Trickle<'_> {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                match self.0.split_first() {
                    Some((&b, rest)) if !buf.is_empty() => {
                        buf[0] = b;
                        self.0 = rest;
                        Ok(1)
                    }
                    _ => Ok(0),
                }
            }
        }
        let table = MappingTable::from_entries([(12, b'x'), (345, b'y')]);
        let mut out = Vec::new();
        decode_stream(Trickle(b"12 345 12"), &mut out, &table).unwrap();
        assert_eq!(out, b"xyx");
    }

    #[test]
    fn decode_stream_empty_input() {
        let table = sample_table();
        let mut out = Vec::new();
        let stats = decode_stream(&b""[..], &mut out, &table).unwrap();
        assert!(out.is_empty());
        assert_eq!(stats, CodecStats::default());
    }
}
