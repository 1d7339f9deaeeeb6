//! Reply types for FUSE operations.
//!
//! Each operation produces one of these on success; the transport layer
//! turns them into kernel responses. Keeping replies as plain values lets
//! the `FuseOps` trait be tested without a real kernel connection.

use crate::types::{FileAttr, FuseDirEntry};
use std::time::Duration;

/// Reply for getattr.
#[derive(Debug, Clone)]
pub struct ReplyAttr {
    pub attr: FileAttr,
    /// How long the kernel may cache these attributes.
    pub attr_timeout: Duration,
}

/// Reply for open.
#[derive(Debug, Clone, Copy)]
pub struct ReplyOpen {
    /// File handle assigned by the filesystem.
    pub fh: u64,
    /// Flags back to the kernel (FOPEN_KEEP_CACHE etc.).
    pub flags: u32,
}

/// Reply for read.
#[derive(Debug)]
pub struct ReplyData {
    pub data: Vec<u8>,
}

/// Reply for readdir (ordered list of entries).
#[derive(Debug)]
pub struct ReplyDirectory {
    pub entries: Vec<FuseDirEntry>,
}

/// Result type for FUSE operations.
///
/// The error is an errno value (positive integer, e.g. `libc::ENOENT`).
pub type FuseResult<T> = std::result::Result<T, i32>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_data() {
        let r = ReplyData {
            data: vec![1, 2, 3],
        };
        assert_eq!(r.data.len(), 3);
    }

    #[test]
    fn test_reply_attr() {
        let r = ReplyAttr {
            attr: FileAttr::new(7),
            attr_timeout: Duration::from_secs(30),
        };
        assert_eq!(r.attr.ino, 7);
        assert_eq!(r.attr_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_fuse_result_err() {
        let result: FuseResult<ReplyOpen> = Err(libc::EACCES);
        assert_eq!(result.unwrap_err(), libc::EACCES);
    }
}
