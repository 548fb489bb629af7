//! Flush and synchronization operations.

use std::path::Path;

use crate::session::Request;
use crate::types::FileInfo;
use crate::FsError;

/// Flush and synchronization operations.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self` to allow
/// concurrent access.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsSync`.
pub trait FsSync: Send + Sync {
    /// Called on every `close(2)` of a descriptor for this open file.
    ///
    /// May be called several times per open.
    fn flush(&self, req: &Request<'_>, path: &Path, fi: &mut FileInfo) -> Result<(), FsError> {
        let _ = (req, path, fi);
        Err(FsError::NotImplemented { operation: "flush" })
    }

    /// Sync file contents. With `datasync`, metadata may be skipped.
    ///
    /// # Errors
    ///
    /// - [`FsError::Io`] for underlying I/O errors
    fn fsync(&self, req: &Request<'_>, path: &Path, datasync: bool, fi: &mut FileInfo) -> Result<(), FsError> {
        let _ = (req, path, datasync, fi);
        Err(FsError::NotImplemented { operation: "fsync" })
    }

    /// Sync directory contents.
    fn fsyncdir(&self, req: &Request<'_>, path: &Path, datasync: bool, fi: &mut FileInfo) -> Result<(), FsError> {
        let _ = (req, path, datasync, fi);
        Err(FsError::NotImplemented {
            operation: "fsyncdir",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_sync_is_object_safe() {
        fn _check(_: &dyn FsSync) {}
    }

    #[test]
    fn fs_sync_requires_send_sync() {
        fn _assert_send_sync<T: Send + Sync>() {}
        fn _check<T: FsSync>() {
            _assert_send_sync::<T>();
        }
    }
}
