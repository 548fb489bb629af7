//! Symbolic and hard link operations.

use std::path::Path;

use crate::session::Request;
use crate::FsError;

/// Symbolic and hard link operations.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self` to allow
/// concurrent access.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsLink`.
pub trait FsLink: Send + Sync {
    /// Copy the target of the symbolic link at `path` into `buf`.
    ///
    /// `buf` is one byte shorter than the native buffer. Return the number of
    /// bytes written; the bridge adds the terminating NUL in the byte it kept.
    /// Truncate targets that do not fit.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    /// - [`FsError::InvalidArgument`] if the path is not a symlink
    fn readlink(&self, req: &Request<'_>, path: &Path, buf: &mut [u8]) -> Result<usize, FsError> {
        let _ = (req, path, buf);
        Err(FsError::NotImplemented {
            operation: "readlink",
        })
    }

    /// Create a symbolic link at `link` pointing to `target`.
    ///
    /// `target` is stored verbatim; it need not exist.
    ///
    /// # Errors
    ///
    /// - [`FsError::AlreadyExists`] if `link` exists
    fn symlink(&self, req: &Request<'_>, target: &Path, link: &Path) -> Result<(), FsError> {
        let _ = (req, target, link);
        Err(FsError::NotImplemented {
            operation: "symlink",
        })
    }

    /// Create a hard link at `link` to the existing file `target`.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if `target` does not exist
    /// - [`FsError::AlreadyExists`] if `link` exists
    fn link(&self, req: &Request<'_>, target: &Path, link: &Path) -> Result<(), FsError> {
        let _ = (req, target, link);
        Err(FsError::NotImplemented { operation: "link" })
    }
}
