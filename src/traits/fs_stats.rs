//! Filesystem statistics and block mapping.

use std::path::Path;

use crate::session::Request;
use crate::types::StatVfs;
use crate::FsError;

/// Filesystem statistics operations.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self` to allow
/// concurrent access.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsStats`.
pub trait FsStats: Send + Sync {
    /// Fill `stat` with statistics for the filesystem containing `path`.
    ///
    /// Every field of `stat` is copied back to the caller.
    fn statfs(&self, req: &Request<'_>, path: &Path, stat: &mut StatVfs) -> Result<(), FsError> {
        let _ = (req, path, stat);
        Err(FsError::NotImplemented {
            operation: "statfs",
        })
    }

    /// Map the file block index in `index` to a device block index, in place.
    ///
    /// Only meaningful for block-device backed filesystems.
    fn bmap(&self, req: &Request<'_>, path: &Path, blocksize: usize, index: &mut u64) -> Result<(), FsError> {
        let _ = (req, path, blocksize, index);
        Err(FsError::NotImplemented { operation: "bmap" })
    }
}
