//! The index → byte substitution table driving both codec directions.

use std::fmt;
use std::path::PathBuf;

use crate::diagnostic::Diagnostic;
use crate::error::DEFAULT_MAX_INDEX;
use crate::escape::display_byte;

/// One assigned slot of a [`MappingTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MappingEntry {
    /// 1-based index.
    pub index: u32,
    /// The byte stored at `index`.
    pub byte: u8,
}

impl fmt::Display for MappingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MAP[{}] = '{}'", self.index, display_byte(self.byte))
    }
}

/// A sparse table mapping 1-based indices to bytes.
///
/// Indices run from 1 to [`capacity`](MappingTable::capacity); any of them may
/// be empty. Several indices may hold the same byte, in which case
/// [`index_of`](MappingTable::index_of) reports the lowest one.
///
/// Tables are built by the loader (or [`from_entries`](MappingTable::from_entries))
/// and are read-only afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct MappingTable {
    /// `slots[i - 1]` holds the byte for index `i`. Grows only up to `size`.
    slots: Vec<Option<u8>>,
    /// Highest index accepted by `assign`.
    capacity: u32,
    /// Highest assigned index.
    size: u32,
    /// Lowest index holding each byte value.
    reverse: [Option<u32>; 256],
}

impl Default for MappingTable {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_INDEX)
    }
}

impl fmt::Debug for MappingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingTable")
            .field("capacity", &self.capacity())
            .field("size", &self.size)
            .field("entries", &self.entries().collect::<Vec<_>>())
            .finish()
    }
}

impl MappingTable {
    /// Create an empty table accepting indices `1..=capacity`.
    ///
    /// Nothing is allocated up front; slots grow as indices are assigned.
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            slots: Vec::new(),
            capacity,
            size: 0,
            reverse: [None; 256],
        }
    }

    /// Build a table from `(index, byte)` pairs, applied in order.
    ///
    /// Later pairs overwrite earlier ones at the same index. Index 0 is not a
    /// valid slot and is ignored. Capacity grows to fit the largest index.
    pub fn from_entries(entries: impl IntoIterator<Item = (u32, u8)>) -> Self {
        let mut table = Self::default();
        for (index, byte) in entries {
            if index == 0 {
                continue;
            }
            table.capacity = table.capacity.max(index);
            table.assign(index, byte);
        }
        table
    }

    /// Store `byte` at `index`, replacing any previous byte there.
    ///
    /// Returns `false` (and changes nothing) if `index` is 0 or beyond capacity.
    pub(crate) fn assign(&mut self, index: u32, byte: u8) -> bool {
        if index == 0 || index > self.capacity() {
            return false;
        }
        if index as usize > self.slots.len() {
            self.slots.resize(index as usize, None);
        }
        let slot = &mut self.slots[index as usize - 1];
        let previous = slot.replace(byte);

        if let Some(old) = previous {
            if old != byte && self.reverse[old as usize] == Some(index) {
                self.reverse[old as usize] = self.lowest_index_of(old);
            }
        }
        let best = &mut self.reverse[byte as usize];
        if best.is_none_or(|current| index < current) {
            *best = Some(index);
        }

        self.size = self.size.max(index);
        true
    }

    fn lowest_index_of(&self, byte: u8) -> Option<u32> {
        self.slots
            .iter()
            .position(|slot| *slot == Some(byte))
            .map(|pos| pos as u32 + 1)
    }

    /// Highest index this table can hold.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Highest assigned index (0 for an empty table).
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of assigned slots.
    pub fn assigned(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns `true` if no slot is assigned.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The byte at `index`, or `None` for index 0, indices above
    /// [`size`](MappingTable::size), and unassigned slots.
    pub fn get(&self, index: u32) -> Option<u8> {
        if index == 0 || index > self.size {
            return None;
        }
        self.slots[index as usize - 1]
    }

    /// The lowest index holding `byte`.
    pub fn index_of(&self, byte: u8) -> Option<u32> {
        self.reverse[byte as usize]
    }

    /// Iterate over assigned slots in index order.
    pub fn entries(&self) -> impl Iterator<Item = MappingEntry> + '_ {
        self.slots[..self.size as usize]
            .iter()
            .enumerate()
            .filter_map(|(pos, slot)| {
                slot.map(|byte| MappingEntry {
                    index: pos as u32 + 1,
                    byte,
                })
            })
    }

    /// Summarize this table together with the diagnostics its load produced.
    pub fn summary(&self, source: Option<PathBuf>, diagnostics: Vec<Diagnostic>) -> TableSummary {
        TableSummary {
            source,
            size: self.size,
            assigned: self.assigned(),
            entries: self.entries().collect(),
            diagnostics,
        }
    }
}

/// What a collaborator gets back from loading a mapping, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableSummary {
    /// Where the table was loaded from, if it came from a file.
    pub source: Option<PathBuf>,
    /// Highest assigned index.
    pub size: u32,
    /// Number of assigned slots.
    pub assigned: usize,
    /// Assigned slots in index order.
    pub entries: Vec<MappingEntry>,
    /// Diagnostics in source order.
    pub diagnostics: Vec<Diagnostic>,
}

impl TableSummary {
    /// Number of warning diagnostics.
    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }

    /// Number of informational diagnostics.
    pub fn info_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_info()).count()
    }
}
