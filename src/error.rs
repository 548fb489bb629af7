//! Error types for the FUSE bridge.
//!
//! Two families of failure cross the bridge:
//!
//! - [`FsError`] is what a provider returns when it wants the native caller
//!   to see a specific POSIX condition. Every variant maps to exactly one
//!   errno through [`FsError::errno`].
//! - [`BridgeError`] is a failure of the bridge itself (a binding could not
//!   be built or a result could not be represented). Bridge faults always
//!   surface to the native caller as `EIO`.

use std::ffi::OsString;
use std::path::PathBuf;

use libc::c_int;

/// Result type returned by every provider operation.
pub type FsResult<T> = Result<T, FsError>;

/// `errno` reported when an extended attribute does not exist.
#[cfg(any(target_os = "macos", target_os = "freebsd"))]
pub(crate) const ENOATTR: c_int = libc::ENOATTR;
#[cfg(not(any(target_os = "macos", target_os = "freebsd")))]
pub(crate) const ENOATTR: c_int = libc::ENODATA;

/// Filesystem error reported by a provider.
///
/// All error variants include relevant context (path, operation) where
/// applicable. Uses `#[non_exhaustive]` for forward compatibility.
///
/// # Examples
///
/// ```rust
/// use anyfs_fuse::FsError;
/// use std::path::PathBuf;
///
/// let err = FsError::NotFound { path: PathBuf::from("/missing") };
/// assert_eq!(err.errno(), libc::ENOENT);
/// assert!(err.to_string().contains("/missing"));
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    // Path/File Errors
    /// Path does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Path already exists when it shouldn't.
    #[error("{operation}: already exists: {path}")]
    AlreadyExists {
        /// The path that already exists.
        path: PathBuf,
        /// The operation that failed.
        operation: &'static str,
    },

    /// Expected a directory but found something else.
    #[error("not a directory: {path}")]
    NotADirectory {
        /// The path that is not a directory.
        path: PathBuf,
    },

    /// Expected something other than a directory.
    #[error("is a directory: {path}")]
    IsADirectory {
        /// The path that is a directory.
        path: PathBuf,
    },

    /// Directory is not empty when it should be.
    #[error("directory not empty: {path}")]
    DirectoryNotEmpty {
        /// The path to the non-empty directory.
        path: PathBuf,
    },

    /// A path component exceeds the name length limit.
    #[error("name too long: {path}")]
    NameTooLong {
        /// The offending path.
        path: PathBuf,
    },

    /// Too many symbolic links were encountered.
    #[error("too many levels of symbolic links: {path}")]
    SymlinkLoop {
        /// The path being resolved.
        path: PathBuf,
    },

    /// File handle is invalid or closed.
    #[error("invalid handle: {handle}")]
    InvalidHandle {
        /// The raw handle value.
        handle: u64,
    },

    /// Extended attribute not found.
    #[error("xattr not found: {} on {path}", name.to_string_lossy())]
    XattrNotFound {
        /// The path where the xattr was not found.
        path: PathBuf,
        /// The attribute name that was not found.
        name: OsString,
    },

    /// The caller's buffer cannot hold the result.
    #[error("buffer too small: need {needed} bytes, have {capacity}")]
    BufferTooSmall {
        /// Bytes required.
        needed: usize,
        /// Bytes available.
        capacity: usize,
    },

    // Permission/Access Errors
    /// Permission denied for operation.
    #[error("{operation}: permission denied: {path}")]
    PermissionDenied {
        /// The path where permission was denied.
        path: PathBuf,
        /// The operation that was denied.
        operation: &'static str,
    },

    /// The operation is not permitted for the caller.
    #[error("{operation}: operation not permitted: {path}")]
    NotPermitted {
        /// The path involved.
        path: PathBuf,
        /// The operation that was refused.
        operation: &'static str,
    },

    /// Filesystem is read-only.
    #[error("read-only filesystem: {operation}")]
    ReadOnly {
        /// The operation that was attempted.
        operation: &'static str,
    },

    // Resource Errors
    /// No space left on the filesystem.
    #[error("no space left on device")]
    NoSpace,

    /// The resource is busy.
    #[error("resource busy: {path}")]
    Busy {
        /// The busy path.
        path: PathBuf,
    },

    /// The operation would block (e.g. a conflicting lock is held).
    #[error("{operation}: would block")]
    WouldBlock {
        /// The operation that would block.
        operation: &'static str,
    },

    /// Link across filesystems.
    #[error("cross-device link: {from} -> {to}")]
    CrossDevice {
        /// Source path.
        from: PathBuf,
        /// Destination path.
        to: PathBuf,
    },

    // Argument Errors
    /// Invalid argument.
    #[error("invalid argument: {details}")]
    InvalidArgument {
        /// What was wrong with the argument.
        details: String,
    },

    // Backend/Operation Errors
    /// Operation is understood but not supported for this target.
    #[error("operation not supported: {operation}")]
    NotSupported {
        /// The unsupported operation.
        operation: &'static str,
    },

    /// The provider does not implement this operation.
    #[error("function not implemented: {operation}")]
    NotImplemented {
        /// The missing operation.
        operation: &'static str,
    },

    /// Raw errno chosen by the provider.
    #[error("os error {code}")]
    Os {
        /// Positive errno value.
        code: i32,
    },

    /// I/O error with context.
    #[error("{operation} failed for {path}: {source}")]
    Io {
        /// The operation that failed.
        operation: &'static str,
        /// The path involved in the operation.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Native (positive) errno for this error.
    ///
    /// The bridge returns the negation of this value to the native caller.
    pub fn errno(&self) -> c_int {
        match self {
            FsError::NotFound { .. } => libc::ENOENT,
            FsError::AlreadyExists { .. } => libc::EEXIST,
            FsError::NotADirectory { .. } => libc::ENOTDIR,
            FsError::IsADirectory { .. } => libc::EISDIR,
            FsError::DirectoryNotEmpty { .. } => libc::ENOTEMPTY,
            FsError::NameTooLong { .. } => libc::ENAMETOOLONG,
            FsError::SymlinkLoop { .. } => libc::ELOOP,
            FsError::InvalidHandle { .. } => libc::EBADF,
            FsError::XattrNotFound { .. } => ENOATTR,
            FsError::BufferTooSmall { .. } => libc::ERANGE,
            FsError::PermissionDenied { .. } => libc::EACCES,
            FsError::NotPermitted { .. } => libc::EPERM,
            FsError::ReadOnly { .. } => libc::EROFS,
            FsError::NoSpace => libc::ENOSPC,
            FsError::Busy { .. } => libc::EBUSY,
            FsError::WouldBlock { .. } => libc::EAGAIN,
            FsError::CrossDevice { .. } => libc::EXDEV,
            FsError::InvalidArgument { .. } => libc::EINVAL,
            FsError::NotSupported { .. } => libc::EOPNOTSUPP,
            FsError::NotImplemented { .. } => libc::ENOSYS,
            // A non-positive code is not an error the caller can act on.
            FsError::Os { code } if *code > 0 => *code,
            FsError::Os { .. } => libc::EIO,
            FsError::Io { source, .. } => source.raw_os_error().unwrap_or(libc::EIO),
        }
    }

    /// Build an error from a raw errno value.
    pub fn from_errno(code: i32) -> Self {
        FsError::Os { code: code.abs() }
    }
}

impl From<std::io::Error> for FsError {
    fn from(error: std::io::Error) -> Self {
        // Convert common io::ErrorKind to more specific FsError variants when possible
        match error.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound {
                path: PathBuf::new(),
            },
            std::io::ErrorKind::PermissionDenied => FsError::PermissionDenied {
                path: PathBuf::new(),
                operation: "io",
            },
            std::io::ErrorKind::AlreadyExists => FsError::AlreadyExists {
                path: PathBuf::new(),
                operation: "io",
            },
            _ => FsError::Io {
                operation: "io",
                path: PathBuf::new(),
                source: error,
            },
        }
    }
}

/// Failure of the bridge itself, as opposed to a provider-reported error.
///
/// Bridge faults are always logged and always reach the native caller as
/// `EIO`.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A required native pointer argument was null.
    #[error("null pointer for argument `{argument}`")]
    NullArgument {
        /// Name of the native parameter.
        argument: &'static str,
    },

    /// A native buffer has a null address but a non-zero length.
    #[error("unusable buffer `{argument}`: null address with length {len}")]
    InvalidBuffer {
        /// Name of the native parameter.
        argument: &'static str,
        /// Declared length.
        len: usize,
    },

    /// A provider result cannot be represented as a native `int`.
    #[error("result {count} does not fit the native return type")]
    CountOverflow {
        /// The count reported by the provider.
        count: usize,
    },

    /// No per-request context is available on this thread.
    #[error("no FUSE request context on this thread")]
    NoContext,

    /// The request context carries no session.
    #[error("request context has no session")]
    NoSession,

    /// The thread could not be attached (e.g. during thread teardown).
    #[error("thread cannot be attached to the bridge")]
    Detached,
}
