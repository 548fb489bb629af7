//! Per-mount capability context.
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Session`] | Provider, private data, capability flags and descriptor cache |
//! | [`SessionHandle`] | Owns a session for the duration of a mount |
//! | [`Request`] | What a provider sees of the session during one call |
//!
//! The session pointer travels to every trampoline as the FUSE
//! `private_data` of the request context. There is no process-wide session.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use libc::c_void;

use crate::config::{CapabilityFlags, SessionConfig};
use crate::descriptor::DescriptorCache;
use crate::operation::Operation;
use crate::traits::Filesystem;

/// Provider-owned state attached to a session.
///
/// Returned by [`FsSession::init`](crate::FsSession::init) and handed back to
/// [`FsSession::destroy`](crate::FsSession::destroy).
pub type PrivateData = Arc<dyn Any + Send + Sync>;

/// One mounted filesystem instance.
///
/// # Thread Safety
///
/// The provider and the capability flags are immutable after construction.
/// The private-data slot is guarded by a `RwLock`; the descriptor cache is
/// lock-free after first use.
pub struct Session {
    provider: Arc<dyn Filesystem>,
    private_data: RwLock<Option<PrivateData>>,
    flags: CapabilityFlags,
    descriptors: DescriptorCache,
    initialized: AtomicBool,
}

impl Session {
    /// Create a session for `provider`.
    pub fn new(provider: Arc<dyn Filesystem>, config: SessionConfig) -> Self {
        tracing::debug!(?config, "creating session");
        Self {
            provider,
            private_data: RwLock::new(None),
            flags: config.flags(),
            descriptors: DescriptorCache::new(),
            initialized: AtomicBool::new(false),
        }
    }

    /// Claim the one `init` of this session. Returns `false` if it already ran.
    pub(crate) fn begin_init(&self) -> bool {
        !self.initialized.swap(true, Ordering::AcqRel)
    }

    /// Whether the provider implements `op`.
    ///
    /// The provider's [`operations`](crate::FsSession::operations) is
    /// consulted at most once per operation.
    pub fn resolve(&self, op: Operation) -> bool {
        self.descriptors.resolve(op, || self.provider.operations())
    }

    /// The current private data.
    pub fn private_data(&self) -> Option<PrivateData> {
        self.private_data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the private data. The previous value is released.
    pub fn set_private_data(&self, data: Option<PrivateData>) {
        let previous = {
            let mut slot = self
                .private_data
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *slot, data)
        };
        // Released outside the lock; its destructor may call back in.
        drop(previous);
    }

    /// Capability flags fixed at construction.
    pub fn flags(&self) -> CapabilityFlags {
        self.flags
    }

    /// The provider.
    pub fn provider(&self) -> &dyn Filesystem {
        &*self.provider
    }

    /// The descriptor cache, for diagnostics.
    pub fn descriptors(&self) -> &DescriptorCache {
        &self.descriptors
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("flags", &self.flags)
            .field("has_private_data", &self.private_data().is_some())
            .field("descriptors", &self.descriptors)
            .finish_non_exhaustive()
    }
}

/// Owner of a mounted [`Session`].
///
/// Keep the handle alive until the mount has been torn down (after
/// `destroy`); the native side only holds the raw pointer from
/// [`user_data`](Self::user_data).
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use anyfs_fuse::{
///     FsAttr, FsDir, FsHandles, FsLink, FsLock, FsNodes, FsPermissions, FsSession,
///     FsStats, FsSync, FsXattr, OperationSet, Session, SessionConfig, SessionHandle,
/// };
///
/// struct Empty;
/// impl FsAttr for Empty {}
/// impl FsPermissions for Empty {}
/// impl FsNodes for Empty {}
/// impl FsLink for Empty {}
/// impl FsDir for Empty {}
/// impl FsHandles for Empty {}
/// impl FsSync for Empty {}
/// impl FsLock for Empty {}
/// impl FsXattr for Empty {}
/// impl FsStats for Empty {}
/// impl FsSession for Empty {
///     fn operations(&self) -> OperationSet { OperationSet::empty() }
/// }
///
/// let handle = SessionHandle::new(Session::new(Arc::new(Empty), SessionConfig::default()));
/// assert!(!handle.user_data().is_null());
/// ```
#[derive(Debug, Clone)]
pub struct SessionHandle {
    session: Arc<Session>,
}

impl SessionHandle {
    /// Take ownership of `session`.
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(session),
        }
    }

    /// The `user_data` pointer to pass to `fuse_main`.
    pub fn user_data(&self) -> *mut c_void {
        Arc::as_ptr(&self.session).cast_mut().cast()
    }

    /// The owned session.
    pub fn session(&self) -> &Session {
        &self.session
    }
}

/// A provider's view of the session during one call.
pub struct Request<'a> {
    session: &'a Session,
    uid: u32,
    gid: u32,
    pid: i32,
}

impl<'a> Request<'a> {
    pub(crate) fn new(session: &'a Session, uid: u32, gid: u32, pid: i32) -> Self {
        Self {
            session,
            uid,
            gid,
            pid,
        }
    }

    /// Caller's user id.
    pub fn uid(&self) -> u32 {
        self.uid
    }

    /// Caller's group id.
    pub fn gid(&self) -> u32 {
        self.gid
    }

    /// Caller's process id.
    pub fn pid(&self) -> i32 {
        self.pid
    }

    /// The session's current private data.
    pub fn private_data(&self) -> Option<PrivateData> {
        self.session.private_data()
    }

    /// The session's private data, if it is a `T`.
    pub fn private_data_as<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.private_data()?.downcast::<T>().ok()
    }

    /// Replace the session's private data. The previous value is released.
    pub fn set_private_data(&self, data: Option<PrivateData>) {
        self.session.set_private_data(data);
    }

    /// Capability flags of the session.
    pub fn flags(&self) -> CapabilityFlags {
        self.session.flags()
    }
}

impl fmt::Debug for Request<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("uid", &self.uid)
            .field("gid", &self.gid)
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}
