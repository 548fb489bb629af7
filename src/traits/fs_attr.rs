//! Attribute queries and timestamp/size updates by path.

use std::path::Path;

use crate::session::Request;
use crate::types::{Stat, Timespec, Utimbuf};
use crate::FsError;

/// Attribute operations on a path.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self` to allow
/// concurrent access.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsAttr`.
pub trait FsAttr: Send + Sync {
    /// Fill `stat` with the attributes of `path`.
    ///
    /// `stat` arrives holding whatever the native caller passed in; every
    /// field the provider leaves alone is copied back unchanged.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    fn getattr(&self, req: &Request<'_>, path: &Path, stat: &mut Stat) -> Result<(), FsError> {
        let _ = (req, path, stat);
        Err(FsError::NotImplemented {
            operation: "getattr",
        })
    }

    /// Change the size of a file.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    /// - [`FsError::IsADirectory`] if the path is a directory
    fn truncate(&self, req: &Request<'_>, path: &Path, size: i64) -> Result<(), FsError> {
        let _ = (req, path, size);
        Err(FsError::NotImplemented {
            operation: "truncate",
        })
    }

    /// Change access and modification times, second precision.
    ///
    /// Changes made to `times` are copied back to the caller.
    fn utime(&self, req: &Request<'_>, path: &Path, times: &mut Utimbuf) -> Result<(), FsError> {
        let _ = (req, path, times);
        Err(FsError::NotImplemented { operation: "utime" })
    }

    /// Change access (`times[0]`) and modification (`times[1]`) times.
    ///
    /// A `nsec` of [`Timespec::UTIME_NOW`] or [`Timespec::UTIME_OMIT`] has
    /// its `utimensat(2)` meaning.
    fn utimens(&self, req: &Request<'_>, path: &Path, times: &[Timespec; 2]) -> Result<(), FsError> {
        let _ = (req, path, times);
        Err(FsError::NotImplemented {
            operation: "utimens",
        })
    }
}
