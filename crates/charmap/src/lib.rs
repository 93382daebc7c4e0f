//! charmap: Encode text into index tokens and back with a character map.
//!
//! This is the public API facade crate for charmap-rs. It re-exports types from
//! charmap-core and adds [`Session`], which owns the loaded table and performs
//! the file-level operations front-ends call.
//!
//! # Architecture
//!
//! - **charmap-core**: Table, loader, diagnostics and codec (no file access)
//! - **charmap** (this crate): `Session` with `load_mapping`, `encode_file`, `decode_file`
//! - **charmap-cli**: Command-line and interactive menu front-end

mod session;

pub use charmap_core;
pub use charmap_core::{
    CharmapError, CodecStats, DEFAULT_MAX_INDEX, Diagnostic, DiagnosticCode, LoadOptions,
    LoadResult, MappingEntry, MappingTable, PLACEHOLDER, Result, SENTINEL, Severity, TableSummary,
    decode, decode_stream, decode_to_vec, display_byte, encode, encode_stream, encode_to_string,
    load, load_reader, scan_tokens,
};
pub use session::Session;
