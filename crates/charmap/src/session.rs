//! The loaded character map and the file operations that use it.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::sync::{Arc, RwLock};

use charmap_core::{
    CharmapError, CodecStats, LoadOptions, MappingTable, Result, TableSummary, decode_stream,
    encode_stream, load_reader,
};
use log::{debug, info};
use tempfile::NamedTempFile;

/// A character map session shared by every front-end.
///
/// Holds at most one table. [`load_mapping`](Session::load_mapping) builds a
/// complete new table before swapping it in, so concurrent encode and decode
/// calls see either the old table or the new one, never a mix. Encode and
/// decode are refused with [`CharmapError::NotLoaded`] until a load succeeds.
///
/// # Example
///
/// ```ignore
/// let session = Session::new();
/// let summary = session.load_mapping("5.txt")?;
/// session.encode_file("main.c", "6.txt")?;
/// session.decode_file("6.txt", "main_decoded.c")?;
/// ```
#[derive(Debug)]
pub struct Session {
    options: LoadOptions,
    table: RwLock<Option<Arc<MappingTable>>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session with default load options and no table.
    pub fn new() -> Self {
        Self::with_options(LoadOptions::default())
    }

    /// Create a session that loads tables with `options`.
    pub fn with_options(options: LoadOptions) -> Self {
        Self {
            options,
            table: RwLock::new(None),
        }
    }

    /// The options used for every load.
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Returns `true` once a load has succeeded.
    ///
    /// Also `false` if the lock is poisoned; use [`table`](Session::table) to
    /// tell the two apart.
    pub fn is_loaded(&self) -> bool {
        self.table.read().map(|t| t.is_some()).unwrap_or(false)
    }

    /// The current table.
    ///
    /// # Errors
    ///
    /// [`CharmapError::NotLoaded`] if nothing has been loaded yet.
    pub fn table(&self) -> Result<Arc<MappingTable>> {
        let guard = self.table.read().map_err(|_| CharmapError::LockPoisoned)?;
        guard.clone().ok_or(CharmapError::NotLoaded)
    }

    fn replace(&self, table: MappingTable) -> Result<()> {
        let mut guard = self.table.write().map_err(|_| CharmapError::LockPoisoned)?;
        *guard = Some(Arc::new(table));
        Ok(())
    }

    /// Load a character map definition file, replacing the current table.
    ///
    /// Malformed lines are reported in the returned summary's diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`CharmapError::Io`] if the file cannot be opened or read, and
    /// [`CharmapError::Strict`] in strict mode. On error the previously loaded
    /// table (if any) stays in place.
    pub fn load_mapping(&self, path: impl AsRef<Path>) -> Result<TableSummary> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| CharmapError::io(path, e))?;
        let loaded = load_reader(BufReader::new(file), &self.options).map_err(|e| match e {
            CharmapError::Stream(source) => CharmapError::io(path, source),
            other => other,
        })?;

        let summary = loaded
            .value
            .summary(Some(path.to_path_buf()), loaded.diagnostics);
        self.replace(loaded.value)?;
        info!(
            "Loaded character map from {}: size {}, {} diagnostics",
            path.display(),
            summary.size,
            summary.diagnostics.len()
        );
        Ok(summary)
    }

    /// Load a character map definition from a reader, replacing the current table.
    pub fn load_mapping_from<R: BufRead>(&self, reader: R) -> Result<TableSummary> {
        let loaded = load_reader(reader, &self.options)?;
        let summary = loaded.value.summary(None, loaded.diagnostics);
        self.replace(loaded.value)?;
        Ok(summary)
    }

    /// Encode `input` into token text at `output`.
    ///
    /// # Errors
    ///
    /// [`CharmapError::NotLoaded`] before any load; [`CharmapError::Io`] if a
    /// file cannot be opened. `output` is only replaced once encoding finished.
    pub fn encode_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<CodecStats> {
        self.transcode(input.as_ref(), output.as_ref(), |r, w, t| {
            encode_stream(r, w, t)
        })
    }

    /// Decode token text at `input` into raw bytes at `output`.
    ///
    /// # Errors
    ///
    /// Same as [`encode_file`](Session::encode_file).
    pub fn decode_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<CodecStats> {
        self.transcode(input.as_ref(), output.as_ref(), |r, w, t| {
            decode_stream(r, w, t)
        })
    }

    fn transcode(
        &self,
        input: &Path,
        output: &Path,
        op: impl FnOnce(
            &mut InputFile,
            &mut NamedTempFile,
            &MappingTable,
        ) -> io::Result<CodecStats>,
    ) -> Result<CodecStats> {
        let table = self.table()?;

        let mut reader = InputFile {
            file: File::open(input).map_err(|e| CharmapError::io(input, e))?,
            failed: false,
        };
        let mut staged = stage_output(output).map_err(|e| CharmapError::io(output, e))?;

        let stats = op(&mut reader, &mut staged, &*table).map_err(|e| {
            if reader.failed {
                CharmapError::io(input, e)
            } else {
                CharmapError::io(output, e)
            }
        })?;
        staged
            .persist(output)
            .map_err(|e| CharmapError::io(output, e.error))?;
        debug!(
            "{} -> {}: {} bytes read, {} bytes written",
            input.display(),
            output.display(),
            stats.bytes_read,
            stats.bytes_written
        );
        Ok(stats)
    }
}

/// The input side of a transcode; remembers whether a read failed so errors
/// can name the right file.
#[derive(Debug)]
struct InputFile {
    file: File,
    failed: bool,
}

impl Read for InputFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf).inspect_err(|e| {
            if e.kind() != io::ErrorKind::Interrupted {
                self.failed = true;
            }
        })
    }
}

/// Create the temporary file that replaces `output` once complete.
///
/// It lives next to `output` so the final rename stays on one file system.
/// An existing destination keeps its permissions; a new one gets the usual
/// mode for created files, subject to the umask.
fn stage_output(output: &Path) -> io::Result<NamedTempFile> {
    let dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let existing = fs::metadata(output).ok().map(|meta| meta.permissions());

    let mut builder = tempfile::Builder::new();
    builder.prefix(".charmap");
    #[cfg(unix)]
    if existing.is_none() {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let staged = builder.tempfile_in(dir)?;
    if let Some(permissions) = existing {
        staged.as_file().set_permissions(permissions)?;
    }
    Ok(staged)
}
