//! Open-file operations.
//!
//! This module provides the [`FsHandles`] trait: everything that works on a
//! file between `open` (or `create`) and `release`.
//!
//! # Handle Lifecycle
//!
//! 1. [`open`](FsHandles::open) or [`create`](FsHandles::create) stores a
//!    provider-chosen value in [`FileInfo::fh`]
//! 2. [`read`](FsHandles::read), [`write`](FsHandles::write),
//!    [`ftruncate`](FsHandles::ftruncate), [`fgetattr`](FsHandles::fgetattr),
//!    flush, fsync and lock receive the same `fh`
//! 3. [`release`](FsHandles::release) receives it one last time
//!
//! The bridge copies the whole [`FileInfo`] back after every call, so any
//! field the provider changes (`fh`, `direct_io`, `keep_cache`, ...) reaches
//! the native dispatcher.
//!
//! # Example
//!
//! ```rust
//! use anyfs_fuse::{FileInfo, FsError, FsHandles, Request};
//! use std::path::Path;
//! use std::sync::atomic::{AtomicU64, Ordering};
//!
//! struct Counter {
//!     next: AtomicU64,
//! }
//!
//! impl FsHandles for Counter {
//!     fn open(&self, _req: &Request<'_>, _path: &Path, fi: &mut FileInfo) -> Result<(), FsError> {
//!         fi.fh = self.next.fetch_add(1, Ordering::Relaxed);
//!         fi.keep_cache = true;
//!         Ok(())
//!     }
//! }
//! ```
//!
//! # Thread Safety
//!
//! Like all provider traits, `FsHandles` requires `Send + Sync`. Handles may
//! be used from several native threads at once.

use std::path::Path;

use crate::session::Request;
use crate::types::{FileInfo, Stat};
use crate::FsError;

/// Open-file operations.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsHandles`.
pub trait FsHandles: Send + Sync {
    /// Open a file. `fi.flags` carries the `open(2)` flags.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    /// - [`FsError::PermissionDenied`] if the access mode is not allowed
    fn open(&self, req: &Request<'_>, path: &Path, fi: &mut FileInfo) -> Result<(), FsError> {
        let _ = (req, path, fi);
        Err(FsError::NotImplemented { operation: "open" })
    }

    /// Create and open a file.
    ///
    /// # Errors
    ///
    /// - [`FsError::AlreadyExists`] if `O_EXCL` is set and the path exists
    /// - [`FsError::NotFound`] if the parent does not exist
    fn create(&self, req: &Request<'_>, path: &Path, mode: u32, fi: &mut FileInfo) -> Result<(), FsError> {
        let _ = (req, path, mode, fi);
        Err(FsError::NotImplemented {
            operation: "create",
        })
    }

    /// Read up to `buf.len()` bytes at `offset`.
    ///
    /// Returns the number of bytes placed in `buf`; 0 means end of file.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidHandle`] if `fi.fh` is not an open handle
    fn read(
        &self,
        req: &Request<'_>,
        path: &Path,
        buf: &mut [u8],
        offset: i64,
        fi: &mut FileInfo,
    ) -> Result<usize, FsError> {
        let _ = (req, path, buf, offset, fi);
        Err(FsError::NotImplemented { operation: "read" })
    }

    /// Write `data` at `offset`. Returns the number of bytes consumed.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidHandle`] if `fi.fh` is not an open handle
    /// - [`FsError::NoSpace`] if the filesystem is full
    fn write(
        &self,
        req: &Request<'_>,
        path: &Path,
        data: &[u8],
        offset: i64,
        fi: &mut FileInfo,
    ) -> Result<usize, FsError> {
        let _ = (req, path, data, offset, fi);
        Err(FsError::NotImplemented { operation: "write" })
    }

    /// Release an open file. Errors are not reported to the application.
    fn release(&self, req: &Request<'_>, path: &Path, fi: &mut FileInfo) -> Result<(), FsError> {
        let _ = (req, path, fi);
        Err(FsError::NotImplemented {
            operation: "release",
        })
    }

    /// Change the size of an open file.
    fn ftruncate(&self, req: &Request<'_>, path: &Path, size: i64, fi: &mut FileInfo) -> Result<(), FsError> {
        let _ = (req, path, size, fi);
        Err(FsError::NotImplemented {
            operation: "ftruncate",
        })
    }

    /// Attributes of an open file.
    fn fgetattr(&self, req: &Request<'_>, path: &Path, stat: &mut Stat, fi: &mut FileInfo) -> Result<(), FsError> {
        let _ = (req, path, stat, fi);
        Err(FsError::NotImplemented {
            operation: "fgetattr",
        })
    }
}
