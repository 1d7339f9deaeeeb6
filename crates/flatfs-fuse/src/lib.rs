//! flatfs-fuse: the read-only flat-namespace filesystem core.
//!
//! This crate holds everything needed to answer FUSE callbacks for a
//! filesystem whose entire contents live in a sealed in-memory table:
//!
//! - **[`table`]** - `FileRecord`, `FileTableBuilder` and the sealed
//!   `FileTable`. The table is populated once at startup and immutable
//!   afterwards, so serving requires no locking.
//!
//! - **[`config`]** - `FlatFsConfig`: mountpoint, cache timeouts, table
//!   capacity.
//!
//! - **[`types`]** - FUSE-facing types (`FileAttr`, `OpenFlags`,
//!   `FuseDirEntry`, `FuseConnInfo`).
//!
//! - **[`reply`]** - Reply types for each operation plus `FuseResult`.
//!
//! - **[`ops`]** - The `FuseOps` trait: init, destroy, getattr, readdir,
//!   open, read. Default implementations return `ENOSYS`.
//!
//! - **[`filesystem`]** - `FlatFileSystem`, the dispatcher implementing
//!   `FuseOps` against a `FileTable`.
//!
//! The FUSE kernel transport is deliberately not part of this crate: the
//! `FuseOps` trait is the boundary, so the dispatcher can be exercised in
//! tests without a real mount and later be backed by `fuser` or any other
//! session loop.

pub mod config;
pub mod filesystem;
pub mod ops;
pub mod reply;
pub mod table;
pub mod types;

pub use config::FlatFsConfig;
pub use filesystem::FlatFileSystem;
pub use ops::FuseOps;
pub use reply::FuseResult;
pub use table::{FileRecord, FileTable, FileTableBuilder, RecordId, TableError};
