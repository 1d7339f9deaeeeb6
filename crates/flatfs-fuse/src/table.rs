//! The in-memory file table.
//!
//! The table goes through three phases: empty, populating, sealed. The
//! first two live in [`FileTableBuilder`]; calling [`FileTableBuilder::seal`]
//! produces the read-only [`FileTable`] the dispatcher serves from. Because
//! sealing consumes the builder, a `FileTable` value can only exist after
//! population has finished, which is the happens-before edge concurrent
//! serving relies on.

use thiserror::Error;

/// Identifier of a record within the table (its insertion index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(pub u32);

/// A single file in the flat namespace: a name and its immutable content.
#[derive(Debug, Clone)]
pub struct FileRecord {
    name: String,
    content: Vec<u8>,
}

impl FileRecord {
    /// The file name (no path separators, never `.` or `..`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file content.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Content length in bytes, reported as the file size.
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// Errors raised while populating the table.
///
/// All of these are fatal to startup: the filesystem must not begin serving
/// from a partially or inconsistently populated table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// The configured capacity was reached.
    #[error("file table is full (capacity {0})")]
    TableFull(usize),

    /// A record with this name already exists.
    #[error("duplicate file name {0:?}")]
    DuplicateName(String),

    /// The name is empty, contains a path separator, or is `.`/`..`.
    #[error("invalid file name {0:?}")]
    InvalidName(String),
}

/// Builder for a [`FileTable`] (the populating phase).
#[derive(Debug)]
pub struct FileTableBuilder {
    records: Vec<FileRecord>,
    capacity: usize,
}

impl FileTableBuilder {
    /// Create an empty builder bounded at `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::new(),
            capacity,
        }
    }

    /// Insert a record, preserving insertion order.
    ///
    /// Duplicates are rejected rather than overwritten, and names that
    /// could not live in a flat root directory are rejected outright.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Result<RecordId, TableError> {
        let name = name.into();
        if name.is_empty() || name.contains('/') || name == "." || name == ".." {
            return Err(TableError::InvalidName(name));
        }
        if self.records.len() >= self.capacity {
            return Err(TableError::TableFull(self.capacity));
        }
        if self.records.iter().any(|r| r.name == name) {
            return Err(TableError::DuplicateName(name));
        }
        let id = RecordId(self.records.len() as u32);
        self.records.push(FileRecord {
            name,
            content: content.into(),
        });
        Ok(id)
    }

    /// Number of records inserted so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Finish population and produce the immutable table.
    pub fn seal(self) -> FileTable {
        FileTable {
            records: self.records,
        }
    }
}

/// The sealed, read-only file table.
///
/// Lookup is a linear scan by exact name; at the bounded entry counts this
/// table is built for, that is indistinguishable from a map and keeps the
/// insertion order needed for deterministic directory listing.
#[derive(Debug)]
pub struct FileTable {
    records: Vec<FileRecord>,
}

impl FileTable {
    /// Find a record by exact, case-sensitive name.
    pub fn lookup(&self, name: &str) -> Option<&FileRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Like [`lookup`](Self::lookup), but also yields the record's id.
    pub fn lookup_with_id(&self, name: &str) -> Option<(RecordId, &FileRecord)> {
        self.records
            .iter()
            .enumerate()
            .find(|(_, r)| r.name == name)
            .map(|(i, r)| (RecordId(i as u32), r))
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
