//! Error types and load configuration for charmap.
//!
//! Provides [`CharmapError`] for failures that stop an operation,
//! [`LoadResult`] for pairing a loaded value with collected diagnostics, and
//! [`LoadOptions`] for configuring table capacity and strictness.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::diagnostic::Diagnostic;

/// Default table capacity: indices `1..=256` are accepted.
pub const DEFAULT_MAX_INDEX: u32 = 256;

/// Fatal error types for loading and transcoding.
///
/// These stop the current operation. Malformed definition lines are never
/// reported here; they become [`Diagnostic`]s instead.
#[derive(Debug, Error)]
pub enum CharmapError {
    /// A named file could not be opened, read, or written.
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        /// The file the operation was working on.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// I/O failure on a reader or writer with no associated path.
    #[error("I/O error: {0}")]
    Stream(#[from] io::Error),

    /// Encode or decode was requested before any mapping was loaded.
    #[error("no character map loaded; load a mapping first")]
    NotLoaded,

    /// Strict mode escalated a loader warning to an error.
    #[error("strict mode: {0}")]
    Strict(Diagnostic),

    /// The table lock was poisoned by a panic in another thread.
    #[error("character map lock poisoned by a panic in another thread")]
    LockPoisoned,
}

impl CharmapError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CharmapError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience `Result` alias using [`CharmapError`].
pub type Result<T> = std::result::Result<T, CharmapError>;

/// Result wrapper that pairs a value with the diagnostics collected while
/// producing it.
#[derive(Debug, Clone)]
pub struct LoadResult<T> {
    /// The loaded value.
    pub value: T,
    /// Diagnostics in source order.
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> LoadResult<T> {
    /// Create a result with no diagnostics.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    /// Create a result with diagnostics.
    pub fn with_diagnostics(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    /// Returns true if there are no diagnostics at all.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Iterate over warning diagnostics only.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }

    /// Transform the value while preserving diagnostics.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadResult<U> {
        LoadResult {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }
}

/// Options controlling how a character map is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Highest index accepted (default: 256). Lines above it are skipped with a warning.
    pub max_index: u32,
    /// When true, the first warning aborts the load with [`CharmapError::Strict`] (default: false).
    pub strict: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_index: DEFAULT_MAX_INDEX,
            strict: false,
        }
    }
}

impl LoadOptions {
    /// Default options with strict mode enabled.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }
}
