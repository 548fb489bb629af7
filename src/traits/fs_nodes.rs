//! Node creation, removal and renaming.

use std::path::Path;

use crate::session::Request;
use crate::FsError;

/// Operations that add, remove or move directory entries for non-directories.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self` to allow
/// concurrent access.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsNodes`.
pub trait FsNodes: Send + Sync {
    /// Create a file node (regular file, device, FIFO or socket).
    ///
    /// Called for regular files only when the provider does not implement
    /// [`create`](crate::FsHandles::create).
    ///
    /// # Errors
    ///
    /// - [`FsError::AlreadyExists`] if the path exists
    /// - [`FsError::NotFound`] if the parent does not exist
    fn mknod(&self, req: &Request<'_>, path: &Path, mode: u32, rdev: u64) -> Result<(), FsError> {
        let _ = (req, path, mode, rdev);
        Err(FsError::NotImplemented { operation: "mknod" })
    }

    /// Remove a file.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    /// - [`FsError::IsADirectory`] if the path is a directory
    fn unlink(&self, req: &Request<'_>, path: &Path) -> Result<(), FsError> {
        let _ = (req, path);
        Err(FsError::NotImplemented {
            operation: "unlink",
        })
    }

    /// Rename `from` to `to`, replacing `to` if it exists.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if `from` does not exist
    /// - [`FsError::CrossDevice`] if the paths are on different filesystems
    fn rename(&self, req: &Request<'_>, from: &Path, to: &Path) -> Result<(), FsError> {
        let _ = (req, from, to);
        Err(FsError::NotImplemented {
            operation: "rename",
        })
    }
}
