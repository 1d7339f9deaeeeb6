//! The filesystem dispatcher.
//!
//! `FlatFileSystem` implements `FuseOps` against a sealed [`FileTable`].
//! Every callback is a pure read of the table: there is no handle state, no
//! locking and no mutation path, so concurrent requests are safe by
//! construction once the table exists.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::FlatFsConfig;
use crate::ops::FuseOps;
use crate::reply::*;
use crate::table::{FileRecord, FileTable, RecordId};
use crate::types::*;

/// FOPEN_KEEP_CACHE from the FUSE protocol: keep page cache on open.
const FOPEN_KEEP_CACHE: u32 = 1 << 1;

/// The read-only flat-namespace filesystem.
pub struct FlatFileSystem {
    /// The sealed file table. Shared immutably with whoever populated it.
    table: Arc<FileTable>,

    /// Serving configuration.
    config: Arc<FlatFsConfig>,
}

impl FlatFileSystem {
    /// Create a filesystem serving the given sealed table.
    pub fn new(table: Arc<FileTable>, config: FlatFsConfig) -> Self {
        Self {
            table,
            config: Arc::new(config),
        }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &FlatFsConfig {
        &self.config
    }

    /// Returns the served table.
    pub fn table(&self) -> &FileTable {
        &self.table
    }

    /// Extract the file name from a request path.
    ///
    /// Valid paths are `/` and `/<name>`; everything else is unresolvable
    /// since the namespace is flat. Returns `None` for the root and for
    /// malformed paths; use [`Self::is_root`] to tell those apart.
    fn file_name(path: &str) -> Option<&str> {
        let name = path.strip_prefix('/')?;
        if name.is_empty() || name.contains('/') {
            return None;
        }
        Some(name)
    }

    fn is_root(path: &str) -> bool {
        path == "/"
    }

    /// Resolve a non-root path to its table record, or `ENOENT`.
    fn resolve(&self, path: &str) -> FuseResult<(RecordId, &FileRecord)> {
        Self::file_name(path)
            .and_then(|name| self.table.lookup_with_id(name))
            .ok_or(libc::ENOENT)
    }

    /// The inode number reported for a record.
    ///
    /// Root is `FUSE_ROOT_ID`; files follow it in table order.
    fn record_ino(id: RecordId) -> u64 {
        FUSE_ROOT_ID + 1 + id.0 as u64
    }

    fn root_attr(&self) -> FileAttr {
        FileAttr {
            mode: ROOT_DIR_MODE,
            nlink: 2,
            ..FileAttr::new(FUSE_ROOT_ID)
        }
    }

    fn file_attr(&self, id: RecordId, record: &FileRecord) -> FileAttr {
        FileAttr {
            size: record.size(),
            mode: FILE_MODE,
            nlink: 1,
            blksize: 4096,
            ..FileAttr::new(Self::record_ino(id))
        }
    }
}

#[async_trait::async_trait]
impl FuseOps for FlatFileSystem {
    async fn init(&self, conn_info: &mut FuseConnInfo) -> FuseResult<()> {
        info!(files = self.table.len(), "flatfs_init()");

        conn_info.max_readahead = self.config.max_readahead;
        conn_info.max_read = self.config.max_readahead;
        conn_info.kernel_cache = self.config.kernel_cache;
        if self.config.kernel_cache {
            info!("kernel page cache: ON");
        }

        Ok(())
    }

    async fn destroy(&self) {
        info!("flatfs_destroy()");
    }

    async fn getattr(&self, path: &str) -> FuseResult<ReplyAttr> {
        debug!(path, "getattr");

        let attr = if Self::is_root(path) {
            self.root_attr()
        } else {
            let (id, record) = self.resolve(path)?;
            self.file_attr(id, record)
        };

        Ok(ReplyAttr {
            attr,
            attr_timeout: self.config.attr_timeout(),
        })
    }

    async fn readdir(&self, path: &str, offset: i64) -> FuseResult<ReplyDirectory> {
        debug!(path, offset, "readdir");

        // Only the root is listable; no nested directories exist.
        if !Self::is_root(path) {
            return Err(libc::ENOENT);
        }

        let synthetic = [".", ".."].into_iter().map(|name| (FUSE_ROOT_ID, name));
        let files = self
            .table
            .records()
            .iter()
            .enumerate()
            .map(|(i, r)| (Self::record_ino(RecordId(i as u32)), r.name()));

        let entries: Vec<FuseDirEntry> = synthetic
            .chain(files)
            .enumerate()
            .skip(offset.max(0) as usize)
            .map(|(idx, (ino, name))| FuseDirEntry {
                ino,
                offset: (idx + 1) as i64,
                file_type: if idx < 2 {
                    libc::DT_DIR as u32
                } else {
                    libc::DT_REG as u32
                },
                name: name.to_string(),
            })
            .collect();

        Ok(ReplyDirectory { entries })
    }

    async fn open(&self, path: &str, flags: i32) -> FuseResult<ReplyOpen> {
        debug!(path, flags, "open");

        let (id, _) = self.resolve(path)?;

        // Anything that could mutate is denied on this read-only surface,
        // including O_CREAT/O_TRUNC with a read-only access mode.
        let parsed = OpenFlags::from_raw(flags);
        if parsed.wants_write() {
            return Err(libc::EACCES);
        }

        let reply_flags = if self.config.kernel_cache {
            FOPEN_KEEP_CACHE
        } else {
            0
        };

        Ok(ReplyOpen {
            fh: Self::record_ino(id),
            flags: reply_flags,
        })
    }

    async fn read(&self, path: &str, size: u32, offset: i64) -> FuseResult<ReplyData> {
        debug!(path, size, offset, "read");

        let (_, record) = self.resolve(path)?;

        if offset < 0 {
            return Err(libc::EINVAL);
        }
        let offset = offset as u64;
        let len = record.size();

        // At or past end of file: a zero-length read, not an error. The
        // bound check also keeps the subtraction below from underflowing.
        if offset >= len {
            return Ok(ReplyData { data: Vec::new() });
        }

        let count = (size as u64).min(len - offset) as usize;
        let start = offset as usize;
        Ok(ReplyData {
            data: record.content()[start..start + count].to_vec(),
        })
    }
}
