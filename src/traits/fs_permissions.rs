//! Permission and ownership operations.

use std::path::Path;

use crate::session::Request;
use crate::FsError;

/// Permission, ownership and access checks.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self` to allow
/// concurrent access.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsPermissions`.
pub trait FsPermissions: Send + Sync {
    /// Change the permission bits of `path`.
    ///
    /// `mode` is the full native mode word; only the low 12 bits are
    /// normally meaningful.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    /// - [`FsError::NotPermitted`] if the caller does not own the file
    fn chmod(&self, req: &Request<'_>, path: &Path, mode: u32) -> Result<(), FsError> {
        let _ = (req, path, mode);
        Err(FsError::NotImplemented { operation: "chmod" })
    }

    /// Change owner and group. `u32::MAX` leaves the value unchanged.
    fn chown(&self, req: &Request<'_>, path: &Path, uid: u32, gid: u32) -> Result<(), FsError> {
        let _ = (req, path, uid, gid);
        Err(FsError::NotImplemented { operation: "chown" })
    }

    /// Check whether the caller may access `path` with `mask`
    /// (`R_OK | W_OK | X_OK`, or `F_OK`).
    ///
    /// # Errors
    ///
    /// - [`FsError::PermissionDenied`] if access is denied
    fn access(&self, req: &Request<'_>, path: &Path, mask: i32) -> Result<(), FsError> {
        let _ = (req, path, mask);
        Err(FsError::NotImplemented {
            operation: "access",
        })
    }
}
