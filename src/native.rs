//! `#[repr(C)]` mirrors of the FUSE 2.6 high-level ABI.
//!
//! Layouts follow `fuse.h` / `fuse_common.h` at `FUSE_USE_VERSION 26`.
//! The operation table is built by [`operations`](crate::operations).
//!
//! # Request context
//!
//! Every trampoline needs the `fuse_context` of the request it serves: the
//! caller's credentials and the `private_data` pointer, which is how the
//! bridge finds its [`Session`](crate::Session). The context is looked up in
//! this order:
//!
//! 1. a context installed on this thread by [`enter_request`], used by
//!    in-process dispatchers and tests;
//! 2. with the `libfuse` feature, libfuse's own `fuse_get_context()`.

#![allow(non_camel_case_types)]

use std::cell::Cell;
use std::ptr;

use libc::{c_char, c_int, c_uint, c_ulong, c_void, dev_t, gid_t, mode_t, off_t, pid_t, size_t, uid_t};

use crate::error::BridgeError;

/// `struct fuse_file_info`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct FuseFileInfo {
    /// Open flags.
    pub flags: c_int,
    /// Legacy file handle.
    pub fh_old: c_ulong,
    /// Write originates from the page cache.
    pub writepage: c_int,
    /// Bitfield word, see [`FileInfoBits`].
    pub bits: c_uint,
    /// File handle.
    pub fh: u64,
    /// Lock owner id.
    pub lock_owner: u64,
}

bitflags::bitflags! {
    /// Bits of the `fuse_file_info` bitfield word.
    ///
    /// Bits not named here are padding and must be preserved.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FileInfoBits: c_uint {
        /// `direct_io:1`
        const DIRECT_IO = 1 << 0;
        /// `keep_cache:1`
        const KEEP_CACHE = 1 << 1;
        /// `flush:1`
        const FLUSH = 1 << 2;
        /// `nonseekable:1`
        const NONSEEKABLE = 1 << 3;
    }
}

/// `struct fuse_conn_info`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FuseConnInfo {
    /// Protocol major version.
    pub proto_major: c_uint,
    /// Protocol minor version.
    pub proto_minor: c_uint,
    /// Asynchronous reads enabled.
    pub async_read: c_uint,
    /// Maximum write size.
    pub max_write: c_uint,
    /// Maximum readahead.
    pub max_readahead: c_uint,
    /// Capability enable bits (`case_insensitive`, `setvolname`, `xtimes`).
    #[cfg(target_os = "macos")]
    pub enable: c_uint,
    /// Reserved.
    #[cfg(target_os = "macos")]
    pub reserved: [c_uint; 26],
    /// Reserved.
    #[cfg(not(target_os = "macos"))]
    pub reserved: [c_uint; 27],
}

impl Default for FuseConnInfo {
    fn default() -> Self {
        Self {
            proto_major: 0,
            proto_minor: 0,
            async_read: 0,
            max_write: 0,
            max_readahead: 0,
            #[cfg(target_os = "macos")]
            enable: 0,
            #[cfg(target_os = "macos")]
            reserved: [0; 26],
            #[cfg(not(target_os = "macos"))]
            reserved: [0; 27],
        }
    }
}

/// `xtimes` bit of [`FuseConnInfo::enable`].
#[cfg(target_os = "macos")]
pub(crate) const CONN_ENABLE_XTIMES: c_uint = 1 << 2;

/// `struct fuse_context`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FuseContext {
    /// Opaque `struct fuse *`.
    pub fuse: *mut c_void,
    /// Caller's user id.
    pub uid: uid_t,
    /// Caller's group id.
    pub gid: gid_t,
    /// Caller's process id.
    pub pid: pid_t,
    /// The `user_data` given to `fuse_main`, later the value returned by `init`.
    pub private_data: *mut c_void,
}

impl FuseContext {
    /// A context carrying `private_data` and the given credentials.
    pub fn new(private_data: *mut c_void, uid: uid_t, gid: gid_t, pid: pid_t) -> Self {
        Self {
            fuse: ptr::null_mut(),
            uid,
            gid,
            pid,
            private_data,
        }
    }
}

/// Opaque handle passed to the legacy `getdir` filler.
pub type fuse_dirh_t = *mut c_void;

/// Legacy `getdir` filler callback.
pub type fuse_dirfil_t =
    unsafe extern "C" fn(h: fuse_dirh_t, name: *const c_char, typ: c_int, ino: libc::ino_t) -> c_int;

/// `readdir` filler callback. Returns non-zero when the buffer is full.
pub type fuse_fill_dir_t = unsafe extern "C" fn(
    buf: *mut c_void,
    name: *const c_char,
    stbuf: *const libc::stat,
    off: off_t,
) -> c_int;

#[cfg(target_os = "macos")]
type XattrSet = unsafe extern "C" fn(
    *const c_char,
    *const c_char,
    *const c_char,
    size_t,
    c_int,
    u32,
) -> c_int;
#[cfg(not(target_os = "macos"))]
type XattrSet =
    unsafe extern "C" fn(*const c_char, *const c_char, *const c_char, size_t, c_int) -> c_int;

#[cfg(target_os = "macos")]
type XattrGet = unsafe extern "C" fn(*const c_char, *const c_char, *mut c_char, size_t, u32) -> c_int;
#[cfg(not(target_os = "macos"))]
type XattrGet = unsafe extern "C" fn(*const c_char, *const c_char, *mut c_char, size_t) -> c_int;

/// `struct fuse_operations`, FUSE 2.6 field order.
///
/// Pass a pointer to this table and `size_of::<FuseOperations>()` to
/// `fuse_main_real`. Unset entries are `None`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
#[allow(missing_docs)]
pub struct FuseOperations {
    pub getattr: Option<unsafe extern "C" fn(*const c_char, *mut libc::stat) -> c_int>,
    pub readlink: Option<unsafe extern "C" fn(*const c_char, *mut c_char, size_t) -> c_int>,
    pub getdir: Option<unsafe extern "C" fn(*const c_char, fuse_dirh_t, Option<fuse_dirfil_t>) -> c_int>,
    pub mknod: Option<unsafe extern "C" fn(*const c_char, mode_t, dev_t) -> c_int>,
    pub mkdir: Option<unsafe extern "C" fn(*const c_char, mode_t) -> c_int>,
    pub unlink: Option<unsafe extern "C" fn(*const c_char) -> c_int>,
    pub rmdir: Option<unsafe extern "C" fn(*const c_char) -> c_int>,
    pub symlink: Option<unsafe extern "C" fn(*const c_char, *const c_char) -> c_int>,
    pub rename: Option<unsafe extern "C" fn(*const c_char, *const c_char) -> c_int>,
    pub link: Option<unsafe extern "C" fn(*const c_char, *const c_char) -> c_int>,
    pub chmod: Option<unsafe extern "C" fn(*const c_char, mode_t) -> c_int>,
    pub chown: Option<unsafe extern "C" fn(*const c_char, uid_t, gid_t) -> c_int>,
    pub truncate: Option<unsafe extern "C" fn(*const c_char, off_t) -> c_int>,
    pub utime: Option<unsafe extern "C" fn(*const c_char, *mut libc::utimbuf) -> c_int>,
    pub open: Option<unsafe extern "C" fn(*const c_char, *mut FuseFileInfo) -> c_int>,
    pub read: Option<
        unsafe extern "C" fn(*const c_char, *mut c_char, size_t, off_t, *mut FuseFileInfo) -> c_int,
    >,
    pub write: Option<
        unsafe extern "C" fn(*const c_char, *const c_char, size_t, off_t, *mut FuseFileInfo) -> c_int,
    >,
    pub statfs: Option<unsafe extern "C" fn(*const c_char, *mut libc::statvfs) -> c_int>,
    pub flush: Option<unsafe extern "C" fn(*const c_char, *mut FuseFileInfo) -> c_int>,
    pub release: Option<unsafe extern "C" fn(*const c_char, *mut FuseFileInfo) -> c_int>,
    pub fsync: Option<unsafe extern "C" fn(*const c_char, c_int, *mut FuseFileInfo) -> c_int>,
    pub setxattr: Option<XattrSet>,
    pub getxattr: Option<XattrGet>,
    pub listxattr: Option<unsafe extern "C" fn(*const c_char, *mut c_char, size_t) -> c_int>,
    pub removexattr: Option<unsafe extern "C" fn(*const c_char, *const c_char) -> c_int>,
    pub opendir: Option<unsafe extern "C" fn(*const c_char, *mut FuseFileInfo) -> c_int>,
    pub readdir: Option<
        unsafe extern "C" fn(
            *const c_char,
            *mut c_void,
            Option<fuse_fill_dir_t>,
            off_t,
            *mut FuseFileInfo,
        ) -> c_int,
    >,
    pub releasedir: Option<unsafe extern "C" fn(*const c_char, *mut FuseFileInfo) -> c_int>,
    pub fsyncdir: Option<unsafe extern "C" fn(*const c_char, c_int, *mut FuseFileInfo) -> c_int>,
    pub init: Option<unsafe extern "C" fn(*mut FuseConnInfo) -> *mut c_void>,
    pub destroy: Option<unsafe extern "C" fn(*mut c_void)>,
    pub access: Option<unsafe extern "C" fn(*const c_char, c_int) -> c_int>,
    pub create: Option<unsafe extern "C" fn(*const c_char, mode_t, *mut FuseFileInfo) -> c_int>,
    pub ftruncate: Option<unsafe extern "C" fn(*const c_char, off_t, *mut FuseFileInfo) -> c_int>,
    pub fgetattr:
        Option<unsafe extern "C" fn(*const c_char, *mut libc::stat, *mut FuseFileInfo) -> c_int>,
    pub lock: Option<
        unsafe extern "C" fn(*const c_char, *mut FuseFileInfo, c_int, *mut libc::flock) -> c_int,
    >,
    pub utimens: Option<unsafe extern "C" fn(*const c_char, *const libc::timespec) -> c_int>,
    pub bmap: Option<unsafe extern "C" fn(*const c_char, size_t, *mut u64) -> c_int>,
}

thread_local! {
    static REQUEST: Cell<*const FuseContext> = const { Cell::new(ptr::null()) };
}

/// Run `f` with `ctx` installed as this thread's request context.
///
/// This is what an in-process dispatcher does around each call into the
/// operation table. Calls nest; the previous context is restored when `f`
/// returns or unwinds.
///
/// # Example
///
/// ```rust,no_run
/// use anyfs_fuse::{enter_request, operations, FuseContext, SessionHandle};
///
/// fn stat_root(handle: &SessionHandle) -> i32 {
///     let ops = operations();
///     let ctx = FuseContext::new(handle.user_data(), 0, 0, 1);
///     let mut st: libc::stat = unsafe { std::mem::zeroed() };
///     enter_request(&ctx, || unsafe { (ops.getattr.unwrap())(c"/".as_ptr(), &mut st) })
/// }
/// ```
pub fn enter_request<R>(ctx: &FuseContext, f: impl FnOnce() -> R) -> R {
    struct Restore(*const FuseContext);

    impl Drop for Restore {
        fn drop(&mut self) {
            let _ = REQUEST.try_with(|cell| cell.set(self.0));
        }
    }

    let previous = REQUEST.with(|cell| cell.replace(ctx as *const FuseContext));
    let _restore = Restore(previous);
    f()
}

#[cfg(feature = "libfuse")]
#[link(name = "fuse")]
unsafe extern "C" {
    fn fuse_get_context() -> *mut FuseContext;
}

/// Copy of the current request's context.
pub(crate) fn current_context() -> Result<FuseContext, BridgeError> {
    let installed = REQUEST
        .try_with(Cell::get)
        .map_err(|_| BridgeError::Detached)?;
    // SAFETY: `enter_request` keeps the pointee borrowed while it is installed.
    if let Some(ctx) = unsafe { installed.as_ref() } {
        return Ok(*ctx);
    }
    library_context()
}

#[cfg(feature = "libfuse")]
fn library_context() -> Result<FuseContext, BridgeError> {
    // SAFETY: libfuse returns either null or its per-thread context.
    unsafe { fuse_get_context().as_ref() }
        .copied()
        .ok_or(BridgeError::NoContext)
}

#[cfg(not(feature = "libfuse"))]
fn library_context() -> Result<FuseContext, BridgeError> {
    Err(BridgeError::NoContext)
}
