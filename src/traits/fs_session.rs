//! Session lifecycle: capability declaration, init and destroy.
//!
//! This module provides the [`FsSession`] trait, the only provider trait
//! with a required method.
//!
//! # Capability Declaration
//!
//! [`operations`](FsSession::operations) declares which operations the
//! provider implements. The bridge asks once per operation per session and
//! caches the answer; an operation outside the set answers `ENOSYS` without
//! reaching the provider. This keeps undeclared operations cheap and lets the
//! kernel fall back (for example from `create` to `mknod` + `open`).
//!
//! # Private Data
//!
//! Whatever [`init`](FsSession::init) returns is stored in the session and is
//! reachable from every later call through
//! [`Request::private_data`](crate::Request::private_data).
//! [`destroy`](FsSession::destroy) receives the value current at unmount,
//! which includes any replacement made with
//! [`Request::set_private_data`](crate::Request::set_private_data).
//!
//! # Example
//!
//! ```rust
//! use anyfs_fuse::{ConnInfo, FsError, FsSession, Operation, OperationSet, PrivateData, Request};
//! use std::sync::Arc;
//!
//! struct Mounted;
//!
//! impl FsSession for Mounted {
//!     fn operations(&self) -> OperationSet {
//!         OperationSet::empty()
//!             .with(Operation::Init)
//!             .with(Operation::Destroy)
//!             .with(Operation::Getattr)
//!     }
//!
//!     fn init(&self, _req: &Request<'_>, conn: &mut ConnInfo) -> Result<Option<PrivateData>, FsError> {
//!         conn.max_write = conn.max_write.min(64 * 1024);
//!         Ok(Some(Arc::new(String::from("mounted"))))
//!     }
//!
//!     fn destroy(&self, _req: &Request<'_>, data: Option<PrivateData>) {
//!         drop(data);
//!     }
//! }
//! ```

use crate::operation::OperationSet;
use crate::session::{PrivateData, Request};
use crate::types::ConnInfo;
use crate::FsError;

/// Session lifecycle hooks.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. `init` and `destroy` each run
/// once per session; `operations` may be called from several threads during
/// the first calls of a session.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsSession`.
pub trait FsSession: Send + Sync {
    /// The operations this provider implements.
    fn operations(&self) -> OperationSet;

    /// Called once at mount time when the session enables init.
    ///
    /// `conn` may be adjusted: `async_read`, `max_write` and `max_readahead`
    /// are copied back. `Some(data)` becomes the session's private data;
    /// `None` leaves it untouched.
    fn init(&self, req: &Request<'_>, conn: &mut ConnInfo) -> Result<Option<PrivateData>, FsError> {
        let _ = (req, conn);
        Ok(None)
    }

    /// Called once at unmount with the session's current private data.
    ///
    /// The bridge releases its own reference after this returns.
    fn destroy(&self, req: &Request<'_>, private_data: Option<PrivateData>) {
        let _ = (req, private_data);
    }
}
