//! Extended attribute operations.
//!
//! This module provides the [`FsXattr`] trait which enables extended
//! attribute (xattr) operations. Extended attributes are name-value pairs
//! associated with files and directories.
//!
//! # Buffer Protocol
//!
//! `getxattr` and `listxattr` follow the native two-step protocol:
//!
//! 1. The caller asks with an empty buffer; the provider returns the size it
//!    needs without writing anything.
//! 2. The caller asks again with a buffer of that size; the provider fills
//!    it and returns the number of bytes written.
//!
//! If a non-empty buffer is too small, return [`FsError::BufferTooSmall`]
//! (`ERANGE`). `listxattr` writes names as consecutive NUL-terminated
//! strings.
//!
//! # Position
//!
//! macOS passes a `position` with `setxattr`/`getxattr` (used for resource
//! forks). Elsewhere the provider always sees 0.
//!
//! # Namespaces
//!
//! Extended attribute names typically follow a namespace convention:
//! - `user.*` - User-defined attributes
//! - `system.*` - System-defined attributes
//! - `security.*` - Security-related attributes
//! - `trusted.*` - Trusted attributes (require privileges)
//!
//! # Thread Safety
//!
//! Like all provider traits, `FsXattr` requires `Send + Sync`. Implementations
//! must handle concurrent access appropriately.

use std::ffi::OsStr;
use std::path::Path;

use crate::session::Request;
use crate::types::XattrFlags;
use crate::FsError;

/// Extended attribute operations.
///
/// # Example
///
/// ```rust
/// use anyfs_fuse::{FsError, FsXattr, Request};
/// use std::ffi::OsStr;
/// use std::path::Path;
///
/// struct OneTag;
///
/// impl FsXattr for OneTag {
///     fn getxattr(
///         &self,
///         _req: &Request<'_>,
///         path: &Path,
///         name: &OsStr,
///         buf: &mut [u8],
///         _position: u32,
///     ) -> Result<usize, FsError> {
///         if name != "user.tag" {
///             return Err(FsError::XattrNotFound {
///                 path: path.to_path_buf(),
///                 name: name.to_owned(),
///             });
///         }
///         let value = b"blue";
///         if buf.is_empty() {
///             return Ok(value.len());
///         }
///         let capacity = buf.len();
///         let dst = buf.get_mut(..value.len()).ok_or(FsError::BufferTooSmall {
///             needed: value.len(),
///             capacity,
///         })?;
///         dst.copy_from_slice(value);
///         Ok(value.len())
///     }
/// }
/// ```
pub trait FsXattr: Send + Sync {
    /// Set an extended attribute value.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path doesn't exist
    /// - [`FsError::AlreadyExists`] with [`XattrFlags::CREATE`] if the attribute exists
    /// - [`FsError::XattrNotFound`] with [`XattrFlags::REPLACE`] if it doesn't
    fn setxattr(
        &self,
        req: &Request<'_>,
        path: &Path,
        name: &OsStr,
        value: &[u8],
        flags: XattrFlags,
        position: u32,
    ) -> Result<(), FsError> {
        let _ = (req, path, name, value, flags, position);
        Err(FsError::NotImplemented {
            operation: "setxattr",
        })
    }

    /// Get an extended attribute value.
    ///
    /// An empty `buf` is a size query: return the value's length.
    ///
    /// # Errors
    ///
    /// - [`FsError::XattrNotFound`] if the attribute doesn't exist
    /// - [`FsError::BufferTooSmall`] if a non-empty `buf` is too small
    fn getxattr(
        &self,
        req: &Request<'_>,
        path: &Path,
        name: &OsStr,
        buf: &mut [u8],
        position: u32,
    ) -> Result<usize, FsError> {
        let _ = (req, path, name, buf, position);
        Err(FsError::NotImplemented {
            operation: "getxattr",
        })
    }

    /// List attribute names as consecutive NUL-terminated strings.
    ///
    /// # Errors
    ///
    /// - [`FsError::BufferTooSmall`] if a non-empty `buf` is too small
    fn listxattr(&self, req: &Request<'_>, path: &Path, buf: &mut [u8]) -> Result<usize, FsError> {
        let _ = (req, path, buf);
        Err(FsError::NotImplemented {
            operation: "listxattr",
        })
    }

    /// Remove an extended attribute.
    ///
    /// # Errors
    ///
    /// - [`FsError::XattrNotFound`] if the attribute doesn't exist
    fn removexattr(&self, req: &Request<'_>, path: &Path, name: &OsStr) -> Result<(), FsError> {
        let _ = (req, path, name);
        Err(FsError::NotImplemented {
            operation: "removexattr",
        })
    }
}
