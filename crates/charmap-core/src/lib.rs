//! charmap-core: Backend-independent types and algorithms for charmap-rs.
//!
//! This crate provides the mapping table ([`MappingTable`]), the definition
//! loader ([`load`], [`load_reader`]) with its [`Diagnostic`]s, and the
//! byte ⇄ token codec ([`encode`], [`decode`] and their streaming forms).
//! It performs no file-system access; see the `charmap` crate for that.

mod codec;
mod diagnostic;
mod error;
mod escape;
mod loader;
mod table;

pub use codec::{
    CodecStats, Decode, Encode, PLACEHOLDER, SENTINEL, decode, decode_stream, decode_to_vec,
    decode_token, encode, encode_stream, encode_to_string, parse_token, scan_tokens,
};
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use error::{CharmapError, DEFAULT_MAX_INDEX, LoadOptions, LoadResult, Result};
pub use escape::{decode_escape, display_byte};
pub use loader::{load, load_reader};
pub use table::{MappingEntry, MappingTable, TableSummary};
