//! FUSE-facing types.
//!
//! These mirror the structures of the FUSE high-level protocol so the
//! dispatcher can later be backed by `fuser` or a custom kernel binding
//! without changing the `FuseOps` surface.

use std::time::{SystemTime, UNIX_EPOCH};

/// The FUSE root inode number (always 1 in the kernel protocol).
pub const FUSE_ROOT_ID: u64 = 1;

/// Regular file type bits.
pub const S_IFREG: u32 = libc::S_IFREG as u32;
/// Directory type bits.
pub const S_IFDIR: u32 = libc::S_IFDIR as u32;

/// Mode of the root directory: read + execute for everyone.
pub const ROOT_DIR_MODE: u32 = S_IFDIR | 0o755;

/// Mode of every served file: read-only for everyone.
pub const FILE_MODE: u32 = S_IFREG | 0o444;

// ── File attributes ─────────────────────────────────────────────────────────

/// File attributes returned by getattr.
///
/// Mirrors the kernel `struct stat` fields FUSE cares about. Only
/// `mode`/`nlink`/`size` carry information here; timestamps stay at the
/// epoch since table content never changes.
#[derive(Debug, Clone)]
pub struct FileAttr {
    /// Inode number.
    pub ino: u64,
    /// File size in bytes (0 for directories).
    pub size: u64,
    /// Last access time.
    pub atime: SystemTime,
    /// Last modification time.
    pub mtime: SystemTime,
    /// Last status change time.
    pub ctime: SystemTime,
    /// File mode (type + permission bits).
    pub mode: u32,
    /// Number of hard links.
    pub nlink: u32,
    /// Owner UID.
    pub uid: u32,
    /// Owner GID.
    pub gid: u32,
    /// Preferred I/O block size.
    pub blksize: u32,
}

impl Default for FileAttr {
    fn default() -> Self {
        Self {
            ino: 0,
            size: 0,
            atime: UNIX_EPOCH,
            mtime: UNIX_EPOCH,
            ctime: UNIX_EPOCH,
            mode: 0,
            nlink: 0,
            uid: 0,
            gid: 0,
            blksize: 0,
        }
    }
}

impl FileAttr {
    /// Create a new `FileAttr` with the given inode and zero/default values.
    pub fn new(ino: u64) -> Self {
        Self {
            ino,
            ..Default::default()
        }
    }

    /// Whether the mode bits say directory.
    pub fn is_dir(&self) -> bool {
        self.mode & libc::S_IFMT as u32 == S_IFDIR
    }

    /// Whether the mode bits say regular file.
    pub fn is_file(&self) -> bool {
        self.mode & libc::S_IFMT as u32 == S_IFREG
    }
}

// ── Open flags ──────────────────────────────────────────────────────────────

/// Parsed POSIX open flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenFlags {
    /// File was opened read-only.
    pub read_only: bool,
    /// File was opened write-only.
    pub write_only: bool,
    /// File was opened read-write.
    pub read_write: bool,
    /// O_CREAT was specified.
    pub create: bool,
    /// O_TRUNC was specified.
    pub truncate: bool,
    /// O_APPEND was specified.
    pub append: bool,
}

impl OpenFlags {
    /// Parse raw POSIX open flags into structured form.
    pub fn from_raw(flags: i32) -> Self {
        let access_mode = flags & libc::O_ACCMODE;
        Self {
            read_only: access_mode == libc::O_RDONLY,
            write_only: access_mode == libc::O_WRONLY,
            read_write: access_mode == libc::O_RDWR,
            create: flags & libc::O_CREAT != 0,
            truncate: flags & libc::O_TRUNC != 0,
            append: flags & libc::O_APPEND != 0,
        }
    }

    /// True if the open could mutate the file: a writable access mode or
    /// any of the creation/truncation/append flags.
    pub fn wants_write(&self) -> bool {
        self.write_only || self.read_write || self.create || self.truncate || self.append
    }
}

// ── Directory entries ───────────────────────────────────────────────────────

/// A single directory entry returned by readdir.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuseDirEntry {
    /// Inode number.
    pub ino: u64,
    /// Offset of the next entry (opaque resume cursor).
    pub offset: i64,
    /// File type (`DT_REG`, `DT_DIR`, ...).
    pub file_type: u32,
    /// Entry name.
    pub name: String,
}

// ── Connection info ─────────────────────────────────────────────────────────

/// FUSE connection capabilities and parameters, negotiated during init.
///
/// Mirrors `struct fuse_conn_info` plus the high-level `fuse_config` bit:
/// `kernel_cache` asks the kernel to keep pages cached across opens, which
/// is always safe for immutable content.
#[derive(Debug, Clone)]
pub struct FuseConnInfo {
    /// Protocol major version.
    pub proto_major: u32,
    /// Protocol minor version.
    pub proto_minor: u32,
    /// Maximum readahead.
    pub max_readahead: u32,
    /// Maximum read size.
    pub max_read: u32,
    /// Time granularity in nanoseconds.
    pub time_gran: u32,
    /// Whether the filesystem requests kernel page caching.
    pub kernel_cache: bool,
}

impl Default for FuseConnInfo {
    fn default() -> Self {
        Self {
            proto_major: 7,
            proto_minor: 0,
            max_readahead: 0,
            max_read: 0,
            time_gran: 1_000_000_000, // 1 second
            kernel_cache: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_attr_new() {
        let attr = FileAttr::new(42);
        assert_eq!(attr.ino, 42);
        assert_eq!(attr.size, 0);
        assert_eq!(attr.nlink, 0);
        assert_eq!(attr.atime, UNIX_EPOCH);
    }

    #[test]
    fn test_file_attr_kind_helpers() {
        let mut attr = FileAttr::new(1);
        attr.mode = ROOT_DIR_MODE;
        assert!(attr.is_dir());
        assert!(!attr.is_file());

        attr.mode = FILE_MODE;
        assert!(attr.is_file());
        assert!(!attr.is_dir());
    }

    #[test]
    fn test_open_flags_read_only() {
        let flags = OpenFlags::from_raw(libc::O_RDONLY);
        assert!(flags.read_only);
        assert!(!flags.wants_write());
    }

    #[test]
    fn test_open_flags_write_modes() {
        assert!(OpenFlags::from_raw(libc::O_WRONLY).wants_write());
        assert!(OpenFlags::from_raw(libc::O_RDWR).wants_write());
        assert!(OpenFlags::from_raw(libc::O_RDONLY | libc::O_CREAT).wants_write());
        assert!(OpenFlags::from_raw(libc::O_RDONLY | libc::O_TRUNC).wants_write());
        assert!(OpenFlags::from_raw(libc::O_RDONLY | libc::O_APPEND).wants_write());
    }

    #[test]
    fn test_fuse_conn_info_default() {
        let info = FuseConnInfo::default();
        assert_eq!(info.proto_major, 7);
        assert_eq!(info.time_gran, 1_000_000_000);
        assert!(!info.kernel_cache);
    }
}
