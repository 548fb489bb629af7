//! # Provider Traits
//!
//! The interface a filesystem provider implements to be mounted through the
//! bridge.
//!
//! ## Component Traits
//!
//! Each native operation belongs to exactly one component trait:
//!
//! | Trait | Operations |
//! |-------|------------|
//! | [`FsAttr`] | getattr, truncate, utime, utimens |
//! | [`FsPermissions`] | chmod, chown, access |
//! | [`FsNodes`] | mknod, unlink, rename |
//! | [`FsLink`] | readlink, symlink, link |
//! | [`FsDir`] | mkdir, rmdir, opendir, readdir, releasedir, getdir |
//! | [`FsHandles`] | open, create, read, write, release, ftruncate, fgetattr |
//! | [`FsSync`] | flush, fsync, fsyncdir |
//! | [`FsLock`] | lock |
//! | [`FsXattr`] | setxattr, getxattr, listxattr, removexattr |
//! | [`FsStats`] | statfs, bmap |
//! | [`FsSession`] | operations, init, destroy |
//!
//! Every operation method has a default that returns
//! [`FsError::NotImplemented`](crate::FsError::NotImplemented), so a provider
//! only writes the operations it supports. Only
//! [`FsSession::operations`] is required.
//!
//! ## Blanket Implementation
//!
//! [`Filesystem`] combines all component traits and is implemented for any
//! type that implements them:
//!
//! ```rust
//! use anyfs_fuse::{
//!     Filesystem, FsAttr, FsDir, FsHandles, FsLink, FsLock, FsNodes, FsPermissions,
//!     FsSession, FsStats, FsSync, FsXattr, OperationSet,
//! };
//!
//! struct ReadOnly;
//!
//! impl FsAttr for ReadOnly {}
//! impl FsPermissions for ReadOnly {}
//! impl FsNodes for ReadOnly {}
//! impl FsLink for ReadOnly {}
//! impl FsDir for ReadOnly {}
//! impl FsHandles for ReadOnly {}
//! impl FsSync for ReadOnly {}
//! impl FsLock for ReadOnly {}
//! impl FsXattr for ReadOnly {}
//! impl FsStats for ReadOnly {}
//! impl FsSession for ReadOnly {
//!     fn operations(&self) -> OperationSet {
//!         OperationSet::empty()
//!     }
//! }
//!
//! fn mountable(_: &dyn Filesystem) {}
//! mountable(&ReadOnly); // ✓ Works
//! ```
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync`. Methods take `&self`; the native
//! dispatcher may call any operation from any of its worker threads at the
//! same time. Providers use interior mutability for their state.
//!
//! ## Object Safety
//!
//! All traits are object-safe. The bridge holds the provider as
//! `Arc<dyn Filesystem>`.

mod fs_attr;
mod fs_dir;
mod fs_handles;
mod fs_link;
mod fs_lock;
mod fs_nodes;
mod fs_permissions;
mod fs_session;
mod fs_stats;
mod fs_sync;
mod fs_xattr;

pub use fs_attr::FsAttr;
pub use fs_dir::FsDir;
pub use fs_handles::FsHandles;
pub use fs_link::FsLink;
pub use fs_lock::FsLock;
pub use fs_nodes::FsNodes;
pub use fs_permissions::FsPermissions;
pub use fs_session::FsSession;
pub use fs_stats::FsStats;
pub use fs_sync::FsSync;
pub use fs_xattr::FsXattr;

/// A complete filesystem provider.
///
/// # Blanket Implementation
///
/// Automatically implemented for any type implementing every component
/// trait. You never need to implement `Filesystem` directly.
pub trait Filesystem:
    FsAttr
    + FsPermissions
    + FsNodes
    + FsLink
    + FsDir
    + FsHandles
    + FsSync
    + FsLock
    + FsXattr
    + FsStats
    + FsSession
{
}

// Blanket implementation
impl<T> Filesystem for T where
    T: FsAttr
        + FsPermissions
        + FsNodes
        + FsLink
        + FsDir
        + FsHandles
        + FsSync
        + FsLock
        + FsXattr
        + FsStats
        + FsSession
{
}
