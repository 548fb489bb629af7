//! Directory operations.
//!
//! This module provides the [`FsDir`] trait: creating and removing
//! directories, opening them, and listing their entries.
//!
//! # Listing
//!
//! Two listing styles exist:
//!
//! | Method | Sink | Per entry |
//! |--------|------|-----------|
//! | [`readdir`](FsDir::readdir) | [`DirFiller`] | name, optional [`Stat`], next offset |
//! | [`getdir`](FsDir::getdir) | [`DirHandle`] | name, [`FileType`], inode number |
//!
//! The native dispatcher prefers `readdir`; `getdir` only matters to very old
//! dispatchers. In both cases each entry goes straight to the native caller
//! as it is added; nothing is buffered.
//!
//! # Example
//!
//! ```rust
//! use anyfs_fuse::{DirFiller, FileInfo, FsDir, FsError, Request};
//! use std::ffi::OsStr;
//! use std::path::Path;
//!
//! struct Flat;
//!
//! impl FsDir for Flat {
//!     fn readdir(
//!         &self,
//!         _req: &Request<'_>,
//!         _path: &Path,
//!         filler: &mut DirFiller<'_>,
//!         _offset: i64,
//!         _fi: &mut FileInfo,
//!     ) -> Result<(), FsError> {
//!         for name in [".", "..", "readme.txt"] {
//!             if filler.add(OsStr::new(name), None, 0)? {
//!                 break;
//!             }
//!         }
//!         Ok(())
//!     }
//! }
//! ```
//!
//! # Thread Safety
//!
//! Like all provider traits, `FsDir` requires `Send + Sync`.
//!
//! [`Stat`]: crate::Stat
//! [`FileType`]: crate::FileType

use std::path::Path;

use crate::marshal::{DirFiller, DirHandle};
use crate::session::Request;
use crate::types::FileInfo;
use crate::FsError;

/// Directory operations.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsDir`.
pub trait FsDir: Send + Sync {
    /// Create a directory.
    ///
    /// # Errors
    ///
    /// - [`FsError::AlreadyExists`] if the path exists
    /// - [`FsError::NotFound`] if the parent does not exist
    fn mkdir(&self, req: &Request<'_>, path: &Path, mode: u32) -> Result<(), FsError> {
        let _ = (req, path, mode);
        Err(FsError::NotImplemented { operation: "mkdir" })
    }

    /// Remove an empty directory.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    /// - [`FsError::NotADirectory`] if the path is not a directory
    /// - [`FsError::DirectoryNotEmpty`] if the directory has entries
    fn rmdir(&self, req: &Request<'_>, path: &Path) -> Result<(), FsError> {
        let _ = (req, path);
        Err(FsError::NotImplemented { operation: "rmdir" })
    }

    /// Open a directory for listing.
    ///
    /// A handle stored in `fi.fh` is handed back to `readdir`, `releasedir`
    /// and `fsyncdir`.
    fn opendir(&self, req: &Request<'_>, path: &Path, fi: &mut FileInfo) -> Result<(), FsError> {
        let _ = (req, path, fi);
        Err(FsError::NotImplemented {
            operation: "opendir",
        })
    }

    /// List a directory.
    ///
    /// Add entries to `filler` until it reports full or the directory is
    /// exhausted. `offset` is the offset passed with the last entry of the
    /// previous call, or 0.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    /// - [`FsError::NotADirectory`] if the path is not a directory
    fn readdir(
        &self,
        req: &Request<'_>,
        path: &Path,
        filler: &mut DirFiller<'_>,
        offset: i64,
        fi: &mut FileInfo,
    ) -> Result<(), FsError> {
        let _ = (req, path, filler, offset, fi);
        Err(FsError::NotImplemented {
            operation: "readdir",
        })
    }

    /// Release a directory opened with [`opendir`](FsDir::opendir).
    fn releasedir(&self, req: &Request<'_>, path: &Path, fi: &mut FileInfo) -> Result<(), FsError> {
        let _ = (req, path, fi);
        Err(FsError::NotImplemented {
            operation: "releasedir",
        })
    }

    /// Legacy listing: add every entry of `path` to `handle`.
    fn getdir(&self, req: &Request<'_>, path: &Path, handle: &mut DirHandle<'_>) -> Result<(), FsError> {
        let _ = (req, path, handle);
        Err(FsError::NotImplemented {
            operation: "getdir",
        })
    }
}
