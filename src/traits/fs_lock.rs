//! POSIX record locking.
//!
//! This module provides the [`FsLock`] trait, the target of `fcntl(2)` lock
//! commands on files opened through the mount.
//!
//! # Overview
//!
//! The native dispatcher passes the raw lock command (`F_GETLK`, `F_SETLK`,
//! `F_SETLKW`) and a [`Flock`] record. [`LockCommand::from_raw`] and
//! [`Flock::lock_type`] decode them:
//!
//! - **Shared locks** (`F_RDLCK`): multiple readers
//! - **Exclusive locks** (`F_WRLCK`): a single writer
//! - **Unlock** (`F_UNLCK`): release the range
//!
//! For `F_GETLK` the provider rewrites the record to describe a conflicting
//! lock, or sets its type to `F_UNLCK` if there is none; the bridge copies
//! the record back.
//!
//! # Example
//!
//! ```rust
//! use anyfs_fuse::{FileInfo, Flock, FsError, FsLock, LockCommand, LockType, Request};
//! use std::path::Path;
//!
//! struct NoConflicts;
//!
//! impl FsLock for NoConflicts {
//!     fn lock(
//!         &self,
//!         _req: &Request<'_>,
//!         _path: &Path,
//!         _fi: &mut FileInfo,
//!         cmd: i32,
//!         lock: &mut Flock,
//!     ) -> Result<(), FsError> {
//!         match LockCommand::from_raw(cmd) {
//!             Some(LockCommand::Get) => {
//!                 lock.set_lock_type(LockType::Unlock);
//!                 Ok(())
//!             }
//!             Some(_) => Ok(()),
//!             None => Err(FsError::InvalidArgument {
//!                 details: format!("lock command {cmd}"),
//!             }),
//!         }
//!     }
//! }
//! ```
//!
//! # Thread Safety
//!
//! Like all provider traits, `FsLock` requires `Send + Sync`. Implementations
//! must handle concurrent lock requests appropriately.
//!
//! [`LockCommand::from_raw`]: crate::LockCommand::from_raw
//! [`Flock::lock_type`]: crate::Flock::lock_type

use std::path::Path;

use crate::session::Request;
use crate::types::{FileInfo, Flock};
use crate::FsError;

/// POSIX record locking.
///
/// Locks are advisory; they coordinate cooperating processes but don't
/// prevent other access.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsLock`.
pub trait FsLock: Send + Sync {
    /// Handle a lock command for the open file `fi`.
    ///
    /// `fi.lock_owner` identifies the lock owner.
    ///
    /// # Errors
    ///
    /// - [`FsError::WouldBlock`] if `F_SETLK` conflicts with a held lock
    /// - [`FsError::InvalidArgument`] for an unknown command
    fn lock(
        &self,
        req: &Request<'_>,
        path: &Path,
        fi: &mut FileInfo,
        cmd: i32,
        lock: &mut Flock,
    ) -> Result<(), FsError> {
        let _ = (req, path, fi, cmd, lock);
        Err(FsError::NotImplemented { operation: "lock" })
    }
}
