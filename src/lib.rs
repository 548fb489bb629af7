//! # anyfs-fuse
//!
//! A bridge between the **FUSE 2.6 native callback ABI** and filesystem
//! providers written in safe Rust.
//!
//! The native dispatcher (libfuse, or an in-process driver) calls a fixed
//! table of `extern "C"` entry points from many threads at once. This crate
//! supplies that table, converts every native argument into an owned or
//! borrowed Rust value, forwards the call to a provider, copies results back
//! into native memory and turns the outcome into the negative-errno integer
//! the ABI expects.
//!
//! ---
//!
//! ## Quick Start
//!
//! Implement the component traits you need, declare the implemented
//! operations, and hand the session pointer to `fuse_main`:
//!
//! ```rust
//! use anyfs_fuse::{
//!     FsAttr, FsDir, FsError, FsHandles, FsLink, FsLock, FsNodes, FsPermissions, FsSession,
//!     FsStats, FsSync, FsXattr, Operation, OperationSet, Request, Session, SessionConfig,
//!     SessionHandle, Stat, operations,
//! };
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! struct Hello;
//!
//! impl FsAttr for Hello {
//!     fn getattr(&self, _req: &Request<'_>, path: &Path, stat: &mut Stat) -> Result<(), FsError> {
//!         if path != Path::new("/") {
//!             return Err(FsError::NotFound { path: path.to_path_buf() });
//!         }
//!         stat.mode = libc::S_IFDIR as u32 | 0o755;
//!         stat.nlink = 2;
//!         Ok(())
//!     }
//! }
//! impl FsPermissions for Hello {}
//! impl FsNodes for Hello {}
//! impl FsLink for Hello {}
//! impl FsDir for Hello {}
//! impl FsHandles for Hello {}
//! impl FsSync for Hello {}
//! impl FsLock for Hello {}
//! impl FsXattr for Hello {}
//! impl FsStats for Hello {}
//! impl FsSession for Hello {
//!     fn operations(&self) -> OperationSet {
//!         OperationSet::empty().with(Operation::Getattr)
//!     }
//! }
//!
//! let handle = SessionHandle::new(Session::new(Arc::new(Hello), SessionConfig::default()));
//! let table = operations();
//! // fuse_main_real(argc, argv, &table, size_of_val(&table), handle.user_data());
//! # let _ = (table, handle);
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`operations`] | The `fuse_operations` table of trampolines |
//! | [`Filesystem`] | Everything a provider implements |
//! | [`Session`] | Per-mount context: provider, private data, capability flags |
//! | [`SessionHandle`] | Owner of a session for the duration of a mount |
//! | [`Request`] | A provider's view of the session during one call |
//! | [`Operation`] / [`OperationSet`] | The 38 native operations and sets of them |
//! | [`DescriptorCache`] | Once-per-session operation resolution |
//! | [`FsError`] | Provider errors, each with a native errno |
//! | [`BridgeError`] | Faults of the bridge itself |
//!
//! ---
//!
//! ## Call Protocol
//!
//! Every trampoline runs the same steps:
//!
//! 1. attach the calling thread and locate the session from the request
//!    context's `private_data`;
//! 2. bind each pointer argument (paths, structures, buffers);
//! 3. resolve the operation, answering `-ENOSYS` if the provider lacks it;
//! 4. run the provider, catching panics at the boundary;
//! 5. merge output structures back in reverse order;
//! 6. convert the result (`0`, a byte count, or `-errno`);
//! 7. report any unchecked provider fault as `-EIO`.
//!
//! A provider panic never unwinds into native code.
//!
//! ---
//!
//! ## Error Handling
//!
//! Providers return `Result<T, FsError>`. Every variant maps to one errno:
//!
//! ```rust
//! use anyfs_fuse::FsError;
//! use std::path::PathBuf;
//!
//! let err = FsError::NotFound { path: PathBuf::from("/missing.txt") };
//! assert_eq!(err.to_string(), "not found: /missing.txt");
//! assert_eq!(err.errno(), libc::ENOENT);
//! ```
//!
//! ---
//!
//! ## Thread Safety
//!
//! All provider traits require `Send + Sync`. The dispatcher may run any
//! operation on any of its threads concurrently; each thread attaches to the
//! bridge on its own and bindings never cross threads. Use
//! [`thread_stats`] to observe a thread's boundary state.
//!
//! ---
//!
//! ## Logging
//!
//! The bridge emits [`tracing`] events: `trace` at call entry and exit,
//! `debug` for provider errors and unsupported operations, `warn` for buffer
//! overruns and lifecycle anomalies, `error` for bridge faults and provider
//! panics. Install any subscriber to see them.
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialization for [`SessionConfig`] and the boundary value types; [`SessionConfig::from_json`] |
//! | `libfuse` | Read the request context from libfuse's `fuse_get_context()` |

// Private modules
mod abi;
mod boundary;
mod config;
mod constants;
mod descriptor;
mod dispatch;
mod error;
mod marshal;
mod native;
mod operation;
mod session;
mod traits;
mod types;

// Public re-exports - error types
pub use error::{BridgeError, FsError, FsResult};

// Public re-exports - boundary value types
pub use types::{
    ConnInfo, FileInfo, FileType, Flock, LockCommand, LockType, OpenFlags, Stat, StatVfs,
    Timespec, Utimbuf, XattrFlags,
};

// Public re-exports - operations and resolution
pub use descriptor::DescriptorCache;
pub use operation::{Operation, OperationSet};

// Public re-exports - sessions
pub use config::{CapabilityFlags, SessionConfig};
pub use session::{PrivateData, Request, Session, SessionHandle};

// Public re-exports - provider traits
pub use traits::{
    Filesystem, FsAttr, FsDir, FsHandles, FsLink, FsLock, FsNodes, FsPermissions, FsSession,
    FsStats, FsSync, FsXattr,
};

// Public re-exports - directory sinks
pub use marshal::{DirFiller, DirHandle};

// Public re-exports - native ABI
pub use abi::operations;
pub use native::{
    FileInfoBits, FuseConnInfo, FuseContext, FuseFileInfo, FuseOperations, enter_request,
    fuse_dirfil_t, fuse_dirh_t, fuse_fill_dir_t,
};

// Public re-exports - boundary diagnostics
pub use boundary::{Fault, ThreadStats, thread_stats};

// Public re-exports - constants
pub use constants::{NoSuchConstant, native_value};
