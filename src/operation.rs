//! The closed set of FUSE 2.6 high-level operations.
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`Operation`] | One native callback, with its name and signature |
//! | [`OperationSet`] | The operations a provider declares it implements |
//!
//! Operations appear in the field order of `struct fuse_operations`.

use std::fmt;

/// One native filesystem callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Operation {
    /// Get file attributes.
    Getattr,
    /// Read the target of a symbolic link.
    Readlink,
    /// Legacy directory listing.
    Getdir,
    /// Create a file node.
    Mknod,
    /// Create a directory.
    Mkdir,
    /// Remove a file.
    Unlink,
    /// Remove a directory.
    Rmdir,
    /// Create a symbolic link.
    Symlink,
    /// Rename a file.
    Rename,
    /// Create a hard link.
    Link,
    /// Change permission bits.
    Chmod,
    /// Change owner and group.
    Chown,
    /// Change file size.
    Truncate,
    /// Change access and modification times (second precision).
    Utime,
    /// Open a file.
    Open,
    /// Read from an open file.
    Read,
    /// Write to an open file.
    Write,
    /// Get filesystem statistics.
    Statfs,
    /// Flush cached data on close.
    Flush,
    /// Release an open file.
    Release,
    /// Synchronize file contents.
    Fsync,
    /// Set an extended attribute.
    Setxattr,
    /// Get an extended attribute.
    Getxattr,
    /// List extended attribute names.
    Listxattr,
    /// Remove an extended attribute.
    Removexattr,
    /// Open a directory.
    Opendir,
    /// Read a directory.
    Readdir,
    /// Release an open directory.
    Releasedir,
    /// Synchronize directory contents.
    Fsyncdir,
    /// Initialize the filesystem.
    Init,
    /// Clean up on unmount.
    Destroy,
    /// Check file access permissions.
    Access,
    /// Create and open a file.
    Create,
    /// Change the size of an open file.
    Ftruncate,
    /// Get attributes of an open file.
    Fgetattr,
    /// POSIX record locking.
    Lock,
    /// Change access and modification times (nanosecond precision).
    Utimens,
    /// Map a file block index to a device block index.
    Bmap,
}

impl Operation {
    /// Number of operations.
    pub const COUNT: usize = 38;

    /// Every operation, in native table order.
    pub const ALL: [Operation; Operation::COUNT] = [
        Operation::Getattr,
        Operation::Readlink,
        Operation::Getdir,
        Operation::Mknod,
        Operation::Mkdir,
        Operation::Unlink,
        Operation::Rmdir,
        Operation::Symlink,
        Operation::Rename,
        Operation::Link,
        Operation::Chmod,
        Operation::Chown,
        Operation::Truncate,
        Operation::Utime,
        Operation::Open,
        Operation::Read,
        Operation::Write,
        Operation::Statfs,
        Operation::Flush,
        Operation::Release,
        Operation::Fsync,
        Operation::Setxattr,
        Operation::Getxattr,
        Operation::Listxattr,
        Operation::Removexattr,
        Operation::Opendir,
        Operation::Readdir,
        Operation::Releasedir,
        Operation::Fsyncdir,
        Operation::Init,
        Operation::Destroy,
        Operation::Access,
        Operation::Create,
        Operation::Ftruncate,
        Operation::Fgetattr,
        Operation::Lock,
        Operation::Utimens,
        Operation::Bmap,
    ];

    /// Position in [`ALL`](Self::ALL).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Native callback name, as it appears in `struct fuse_operations`.
    pub const fn name(self) -> &'static str {
        match self {
            Operation::Getattr => "getattr",
            Operation::Readlink => "readlink",
            Operation::Getdir => "getdir",
            Operation::Mknod => "mknod",
            Operation::Mkdir => "mkdir",
            Operation::Unlink => "unlink",
            Operation::Rmdir => "rmdir",
            Operation::Symlink => "symlink",
            Operation::Rename => "rename",
            Operation::Link => "link",
            Operation::Chmod => "chmod",
            Operation::Chown => "chown",
            Operation::Truncate => "truncate",
            Operation::Utime => "utime",
            Operation::Open => "open",
            Operation::Read => "read",
            Operation::Write => "write",
            Operation::Statfs => "statfs",
            Operation::Flush => "flush",
            Operation::Release => "release",
            Operation::Fsync => "fsync",
            Operation::Setxattr => "setxattr",
            Operation::Getxattr => "getxattr",
            Operation::Listxattr => "listxattr",
            Operation::Removexattr => "removexattr",
            Operation::Opendir => "opendir",
            Operation::Readdir => "readdir",
            Operation::Releasedir => "releasedir",
            Operation::Fsyncdir => "fsyncdir",
            Operation::Init => "init",
            Operation::Destroy => "destroy",
            Operation::Access => "access",
            Operation::Create => "create",
            Operation::Ftruncate => "ftruncate",
            Operation::Fgetattr => "fgetattr",
            Operation::Lock => "lock",
            Operation::Utimens => "utimens",
            Operation::Bmap => "bmap",
        }
    }

    /// Provider-side signature, used to tell overloads apart in diagnostics.
    pub const fn signature(self) -> &'static str {
        match self {
            Operation::Getattr => "(path, &mut Stat) -> ()",
            Operation::Readlink => "(path, &mut [u8]) -> usize",
            Operation::Getdir => "(path, &mut DirHandle) -> ()",
            Operation::Mknod => "(path, mode, rdev) -> ()",
            Operation::Mkdir => "(path, mode) -> ()",
            Operation::Unlink => "(path) -> ()",
            Operation::Rmdir => "(path) -> ()",
            Operation::Symlink => "(target, link) -> ()",
            Operation::Rename => "(from, to) -> ()",
            Operation::Link => "(target, link) -> ()",
            Operation::Chmod => "(path, mode) -> ()",
            Operation::Chown => "(path, uid, gid) -> ()",
            Operation::Truncate => "(path, size) -> ()",
            Operation::Utime => "(path, &mut Utimbuf) -> ()",
            Operation::Open => "(path, &mut FileInfo) -> ()",
            Operation::Read => "(path, &mut [u8], offset, &mut FileInfo) -> usize",
            Operation::Write => "(path, &[u8], offset, &mut FileInfo) -> usize",
            Operation::Statfs => "(path, &mut StatVfs) -> ()",
            Operation::Flush => "(path, &mut FileInfo) -> ()",
            Operation::Release => "(path, &mut FileInfo) -> ()",
            Operation::Fsync => "(path, datasync, &mut FileInfo) -> ()",
            Operation::Setxattr => "(path, name, &[u8], flags, position) -> ()",
            Operation::Getxattr => "(path, name, &mut [u8], position) -> usize",
            Operation::Listxattr => "(path, &mut [u8]) -> usize",
            Operation::Removexattr => "(path, name) -> ()",
            Operation::Opendir => "(path, &mut FileInfo) -> ()",
            Operation::Readdir => "(path, &mut DirFiller, offset, &mut FileInfo) -> ()",
            Operation::Releasedir => "(path, &mut FileInfo) -> ()",
            Operation::Fsyncdir => "(path, datasync, &mut FileInfo) -> ()",
            Operation::Init => "(&mut ConnInfo) -> Option<PrivateData>",
            Operation::Destroy => "(Option<PrivateData>) -> ()",
            Operation::Access => "(path, mask) -> ()",
            Operation::Create => "(path, mode, &mut FileInfo) -> ()",
            Operation::Ftruncate => "(path, size, &mut FileInfo) -> ()",
            Operation::Fgetattr => "(path, &mut Stat, &mut FileInfo) -> ()",
            Operation::Lock => "(path, &mut FileInfo, cmd, &mut Flock) -> ()",
            Operation::Utimens => "(path, [Timespec; 2]) -> ()",
            Operation::Bmap => "(path, blocksize, &mut u64) -> ()",
        }
    }

    /// Look up an operation by its native name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of [`Operation`]s.
///
/// Providers return one from
/// [`FsSession::operations`](crate::FsSession::operations) to declare what
/// they implement. Anything outside the set answers `ENOSYS` without reaching
/// the provider.
///
/// # Example
///
/// ```rust
/// use anyfs_fuse::{Operation, OperationSet};
///
/// let ops = OperationSet::empty()
///     .with(Operation::Getattr)
///     .with(Operation::Readdir);
/// assert!(ops.contains(Operation::Readdir));
/// assert!(!ops.contains(Operation::Write));
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OperationSet(u64);

impl OperationSet {
    /// No operations.
    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every operation.
    #[inline]
    pub const fn all() -> Self {
        Self((1u64 << Operation::COUNT) - 1)
    }

    /// This set plus `op`.
    #[inline]
    #[must_use]
    pub const fn with(self, op: Operation) -> Self {
        Self(self.0 | (1u64 << op.index()))
    }

    /// This set minus `op`.
    #[inline]
    #[must_use]
    pub const fn without(self, op: Operation) -> Self {
        Self(self.0 & !(1u64 << op.index()))
    }

    /// Returns `true` if `op` is in the set.
    #[inline]
    pub const fn contains(self, op: Operation) -> bool {
        self.0 & (1u64 << op.index()) != 0
    }

    /// Number of operations in the set.
    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if the set holds no operations.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over the members in native table order.
    pub fn iter(self) -> impl Iterator<Item = Operation> {
        Operation::ALL.into_iter().filter(move |op| self.contains(*op))
    }
}

impl FromIterator<Operation> for OperationSet {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl fmt::Debug for OperationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
