//! FUSE operations trait.
//!
//! Defines the `FuseOps` trait with the callbacks this filesystem serves.
//! The operations mirror the path-based FUSE high-level API (`struct
//! fuse_operations`): the namespace is flat, so paths are the natural key
//! and there is no inode table to manage.

use crate::reply::*;
use crate::types::FuseConnInfo;

/// Trait defining the filesystem operations.
///
/// Default implementations return `ENOSYS` (function not implemented), so
/// partial implementations stay testable.
///
/// # Error handling
///
/// Operations return `FuseResult<T>` where the error value is an errno
/// (positive integer, e.g., `libc::ENOENT`). Errors are per-request result
/// values and never abort the serving process.
#[async_trait::async_trait]
pub trait FuseOps: Send + Sync + 'static {
    /// Called when the filesystem is mounted.
    ///
    /// The implementation negotiates capabilities via `conn_info`, e.g.
    /// requesting kernel page caching for immutable content.
    async fn init(&self, conn_info: &mut FuseConnInfo) -> FuseResult<()> {
        let _ = conn_info;
        Ok(())
    }

    /// Called when the filesystem is unmounted.
    async fn destroy(&self) {
        // Default: no-op
    }

    /// Get attributes for a path (`/` or `/<name>`).
    async fn getattr(&self, path: &str) -> FuseResult<ReplyAttr> {
        let _ = path;
        Err(libc::ENOSYS)
    }

    /// Read directory entries.
    ///
    /// `offset` is a resume cursor; 0 means start from the beginning.
    async fn readdir(&self, path: &str, offset: i64) -> FuseResult<ReplyDirectory> {
        let _ = (path, offset);
        Err(libc::ENOSYS)
    }

    /// Open a file with the given raw POSIX flags.
    async fn open(&self, path: &str, flags: i32) -> FuseResult<ReplyOpen> {
        let _ = (path, flags);
        Err(libc::ENOSYS)
    }

    /// Read up to `size` bytes starting at `offset`.
    ///
    /// Reads at or past end of file return an empty reply, not an error.
    async fn read(&self, path: &str, size: u32, offset: i64) -> FuseResult<ReplyData> {
        let _ = (path, size, offset);
        Err(libc::ENOSYS)
    }
}
