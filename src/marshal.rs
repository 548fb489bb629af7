//! Argument marshalling between native structures and boundary values.
//!
//! Every pointer argument of a trampoline becomes one binding for the
//! duration of the call:
//!
//! | Binding | Native argument | Merged back |
//! |---------|-----------------|-------------|
//! | [`Binding<Stat>`](Binding) | `struct stat *` | yes |
//! | [`Binding<StatVfs>`](Binding) | `struct statvfs *` | yes |
//! | [`Binding<FileInfo>`](Binding) | `struct fuse_file_info *` | yes (unless null) |
//! | [`Binding<Flock>`](Binding) | `struct flock *` | yes |
//! | [`Binding<Utimbuf>`](Binding) | `struct utimbuf *` | yes |
//! | [`Binding<Timespec>`](Binding) | `const struct timespec *` | no |
//! | [`Binding<ConnInfo>`](Binding) | `struct fuse_conn_info *` | negotiable fields |
//! | [`Binding<u64>`](Binding) | `uint64_t *` | yes |
//! | [`BufMut`] | `char *buf, size_t size` | written in place |
//! | [`Buf`] | `const char *buf, size_t size` | no |
//! | [`CStrArg`] | `const char *path` | no |
//! | [`DirFiller`] | `void *buf, fuse_fill_dir_t` | entries forwarded |
//! | [`DirHandle`] | `fuse_dirh_t, fuse_dirfil_t` | entries forwarded |
//!
//! Each binding registers with the thread's [`Env`] when created and
//! deregisters when dropped. Bindings borrow the `Env`, so none can outlive
//! the call that created it.

use std::ffi::{CStr, CString, OsStr};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::{ptr, slice};

use libc::{c_char, c_int, c_void};

use crate::boundary::{Env, Registration};
use crate::error::{BridgeError, FsError, FsResult};
use crate::native::{FileInfoBits, FuseConnInfo, FuseFileInfo, fuse_dirfil_t, fuse_dirh_t, fuse_fill_dir_t};
use crate::types::{ConnInfo, FileInfo, FileType, Flock, Stat, StatVfs, Timespec, Utimbuf};

/// Conversion between a native structure and its boundary value.
pub(crate) trait Marshal: Sized {
    /// The `#[repr(C)]` structure this value mirrors.
    type Native;

    /// Copy a native structure into a boundary value.
    fn convert_in(native: &Self::Native) -> Self;

    /// Copy the boundary value's output fields back into `native`.
    fn merge(&self, native: &mut Self::Native);
}

impl Marshal for Stat {
    type Native = libc::stat;

    fn convert_in(st: &libc::stat) -> Self {
        Stat {
            dev: st.st_dev as u64,
            ino: st.st_ino as u64,
            mode: st.st_mode as u32,
            nlink: st.st_nlink as u64,
            uid: st.st_uid,
            gid: st.st_gid,
            rdev: st.st_rdev as u64,
            size: st.st_size as i64,
            blksize: st.st_blksize as i64,
            blocks: st.st_blocks as i64,
            atime: Timespec::new(st.st_atime as i64, st.st_atime_nsec as i64),
            mtime: Timespec::new(st.st_mtime as i64, st.st_mtime_nsec as i64),
            ctime: Timespec::new(st.st_ctime as i64, st.st_ctime_nsec as i64),
            #[cfg(target_os = "macos")]
            birthtime: Timespec::new(st.st_birthtime as i64, st.st_birthtime_nsec as i64),
            #[cfg(not(target_os = "macos"))]
            birthtime: Timespec::default(),
            #[cfg(target_os = "macos")]
            flags: st.st_flags,
            #[cfg(not(target_os = "macos"))]
            flags: 0,
        }
    }

    fn merge(&self, st: &mut libc::stat) {
        st.st_dev = self.dev as _;
        st.st_ino = self.ino as _;
        st.st_mode = self.mode as _;
        st.st_nlink = self.nlink as _;
        st.st_uid = self.uid;
        st.st_gid = self.gid;
        st.st_rdev = self.rdev as _;
        st.st_size = self.size as _;
        st.st_blksize = self.blksize as _;
        st.st_blocks = self.blocks as _;
        st.st_atime = self.atime.sec as _;
        st.st_atime_nsec = self.atime.nsec as _;
        st.st_mtime = self.mtime.sec as _;
        st.st_mtime_nsec = self.mtime.nsec as _;
        st.st_ctime = self.ctime.sec as _;
        st.st_ctime_nsec = self.ctime.nsec as _;
        #[cfg(target_os = "macos")]
        {
            st.st_birthtime = self.birthtime.sec as _;
            st.st_birthtime_nsec = self.birthtime.nsec as _;
            st.st_flags = self.flags;
        }
    }
}

impl Marshal for StatVfs {
    type Native = libc::statvfs;

    fn convert_in(sv: &libc::statvfs) -> Self {
        StatVfs {
            bsize: sv.f_bsize as u64,
            frsize: sv.f_frsize as u64,
            blocks: sv.f_blocks as u64,
            bfree: sv.f_bfree as u64,
            bavail: sv.f_bavail as u64,
            files: sv.f_files as u64,
            ffree: sv.f_ffree as u64,
            favail: sv.f_favail as u64,
            fsid: sv.f_fsid as u64,
            flag: sv.f_flag as u64,
            namemax: sv.f_namemax as u64,
        }
    }

    fn merge(&self, sv: &mut libc::statvfs) {
        sv.f_bsize = self.bsize as _;
        sv.f_frsize = self.frsize as _;
        sv.f_blocks = self.blocks as _;
        sv.f_bfree = self.bfree as _;
        sv.f_bavail = self.bavail as _;
        sv.f_files = self.files as _;
        sv.f_ffree = self.ffree as _;
        sv.f_favail = self.favail as _;
        sv.f_fsid = self.fsid as _;
        sv.f_flag = self.flag as _;
        sv.f_namemax = self.namemax as _;
    }
}

impl Marshal for FileInfo {
    type Native = FuseFileInfo;

    fn convert_in(fi: &FuseFileInfo) -> Self {
        let bits = FileInfoBits::from_bits_retain(fi.bits);
        FileInfo {
            flags: fi.flags,
            fh_old: fi.fh_old as u64,
            writepage: fi.writepage,
            direct_io: bits.contains(FileInfoBits::DIRECT_IO),
            keep_cache: bits.contains(FileInfoBits::KEEP_CACHE),
            flush: bits.contains(FileInfoBits::FLUSH),
            nonseekable: bits.contains(FileInfoBits::NONSEEKABLE),
            fh: fi.fh,
            lock_owner: fi.lock_owner,
        }
    }

    fn merge(&self, fi: &mut FuseFileInfo) {
        let mut bits = FileInfoBits::from_bits_retain(fi.bits);
        bits.set(FileInfoBits::DIRECT_IO, self.direct_io);
        bits.set(FileInfoBits::KEEP_CACHE, self.keep_cache);
        bits.set(FileInfoBits::FLUSH, self.flush);
        bits.set(FileInfoBits::NONSEEKABLE, self.nonseekable);

        fi.flags = self.flags;
        fi.fh_old = self.fh_old as _;
        fi.writepage = self.writepage;
        fi.bits = bits.bits();
        fi.fh = self.fh;
        fi.lock_owner = self.lock_owner;
    }
}

impl Marshal for Flock {
    type Native = libc::flock;

    fn convert_in(fl: &libc::flock) -> Self {
        Flock {
            kind: fl.l_type as i16,
            whence: fl.l_whence as i16,
            start: fl.l_start as i64,
            len: fl.l_len as i64,
            pid: fl.l_pid as i32,
        }
    }

    fn merge(&self, fl: &mut libc::flock) {
        fl.l_type = self.kind as _;
        fl.l_whence = self.whence as _;
        fl.l_start = self.start as _;
        fl.l_len = self.len as _;
        fl.l_pid = self.pid as _;
    }
}

impl Marshal for Utimbuf {
    type Native = libc::utimbuf;

    fn convert_in(buf: &libc::utimbuf) -> Self {
        Utimbuf {
            actime: buf.actime as i64,
            modtime: buf.modtime as i64,
        }
    }

    fn merge(&self, buf: &mut libc::utimbuf) {
        buf.actime = self.actime as _;
        buf.modtime = self.modtime as _;
    }
}

impl Marshal for Timespec {
    type Native = libc::timespec;

    fn convert_in(ts: &libc::timespec) -> Self {
        Timespec::new(ts.tv_sec as i64, ts.tv_nsec as i64)
    }

    fn merge(&self, ts: &mut libc::timespec) {
        ts.tv_sec = self.sec as _;
        ts.tv_nsec = self.nsec as _;
    }
}

impl Marshal for ConnInfo {
    type Native = FuseConnInfo;

    fn convert_in(conn: &FuseConnInfo) -> Self {
        ConnInfo {
            proto_major: conn.proto_major,
            proto_minor: conn.proto_minor,
            async_read: conn.async_read != 0,
            max_write: conn.max_write,
            max_readahead: conn.max_readahead,
        }
    }

    // The protocol version is fixed by the kernel.
    fn merge(&self, conn: &mut FuseConnInfo) {
        conn.async_read = u32::from(self.async_read);
        conn.max_write = self.max_write;
        conn.max_readahead = self.max_readahead;
    }
}

impl Marshal for u64 {
    type Native = u64;

    fn convert_in(native: &u64) -> Self {
        *native
    }

    fn merge(&self, native: &mut u64) {
        *native = *self;
    }
}

/// One native structure argument and its boundary value.
pub(crate) struct Binding<'e, M: Marshal> {
    native: *mut M::Native,
    value: M,
    output: bool,
    _registration: Registration<'e>,
}

impl<'e, M: Marshal> Binding<'e, M> {
    /// Bind a structure the provider only reads.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or valid for reads for the duration of the call.
    pub(crate) unsafe fn input(
        env: &'e Env,
        ptr: *const M::Native,
        argument: &'static str,
    ) -> Result<Self, BridgeError> {
        // SAFETY: caller guarantees `ptr` is null or readable.
        let native = unsafe { ptr.as_ref() }.ok_or(BridgeError::NullArgument { argument })?;
        Ok(Self {
            native: ptr.cast_mut(),
            value: M::convert_in(native),
            output: false,
            _registration: Registration::new(env),
        })
    }

    /// Bind a structure the provider may modify.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or valid for reads and writes for the duration of
    /// the call.
    pub(crate) unsafe fn output(
        env: &'e Env,
        ptr: *mut M::Native,
        argument: &'static str,
    ) -> Result<Self, BridgeError> {
        // SAFETY: caller guarantees `ptr` is null or readable.
        let mut binding = unsafe { Self::input(env, ptr, argument) }?;
        binding.output = true;
        Ok(binding)
    }

    /// Mutable access to the boundary value.
    pub(crate) fn get_mut(&mut self) -> &mut M {
        &mut self.value
    }

    /// Shared access to the boundary value.
    pub(crate) fn get(&self) -> &M {
        &self.value
    }

    /// Copy the boundary value back into native memory if this binding is
    /// output-bearing.
    pub(crate) fn merge(&mut self) {
        if !self.output {
            return;
        }
        // SAFETY: output bindings are only built from non-null pointers the
        // caller declared writable for the call.
        if let Some(native) = unsafe { self.native.as_mut() } {
            self.value.merge(native);
        }
    }
}

impl<'e, M: Marshal + Default> Binding<'e, M> {
    /// Bind a structure that may legitimately be absent.
    ///
    /// A null pointer binds `M::default()`, which is never merged.
    ///
    /// # Safety
    ///
    /// Same as [`Binding::output`].
    pub(crate) unsafe fn optional(env: &'e Env, ptr: *mut M::Native) -> Self {
        // SAFETY: caller guarantees `ptr` is null or readable.
        match unsafe { ptr.as_ref() } {
            Some(native) => Self {
                native: ptr,
                value: M::convert_in(native),
                output: true,
                _registration: Registration::new(env),
            },
            None => Self {
                native: ptr::null_mut(),
                value: M::default(),
                output: false,
                _registration: Registration::new(env),
            },
        }
    }
}

/// A null-terminated native string seen as a path or name.
pub(crate) struct CStrArg<'e> {
    value: &'e CStr,
    _registration: Registration<'e>,
}

impl<'e> CStrArg<'e> {
    /// # Safety
    ///
    /// `ptr` must be null or point to a null-terminated string that stays
    /// valid and unchanged for the duration of the call.
    pub(crate) unsafe fn new(
        env: &'e Env,
        ptr: *const c_char,
        argument: &'static str,
    ) -> Result<Self, BridgeError> {
        if ptr.is_null() {
            return Err(BridgeError::NullArgument { argument });
        }
        Ok(Self {
            // SAFETY: non-null and null-terminated per the caller's contract.
            value: unsafe { CStr::from_ptr(ptr) },
            _registration: Registration::new(env),
        })
    }

    pub(crate) fn as_os_str(&self) -> &OsStr {
        OsStr::from_bytes(self.value.to_bytes())
    }

    pub(crate) fn as_path(&self) -> &Path {
        Path::new(self.as_os_str())
    }
}

fn checked_base(ptr: *const c_char, len: usize, argument: &'static str) -> Result<*const u8, BridgeError> {
    if ptr.is_null() && len > 0 {
        return Err(BridgeError::InvalidBuffer { argument, len });
    }
    Ok(ptr.cast())
}

/// A native buffer the provider fills.
///
/// The provider sees exactly `size` bytes; it cannot write past them.
pub(crate) struct BufMut<'e> {
    data: &'e mut [u8],
    _registration: Registration<'e>,
}

impl<'e> BufMut<'e> {
    /// # Safety
    ///
    /// `ptr` must be null with `len == 0`, or valid for writes of `len` bytes
    /// for the duration of the call and not aliased elsewhere.
    pub(crate) unsafe fn new(
        env: &'e Env,
        ptr: *mut c_char,
        len: usize,
        argument: &'static str,
    ) -> Result<Self, BridgeError> {
        let base = checked_base(ptr, len, argument)?;
        let data: &'e mut [u8] = if base.is_null() || len == 0 {
            &mut []
        } else {
            // SAFETY: non-null, writable for `len` bytes per the caller's contract.
            unsafe { slice::from_raw_parts_mut(base.cast_mut(), len) }
        };
        Ok(Self {
            data,
            _registration: Registration::new(env),
        })
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        self.data
    }

    pub(crate) fn capacity(&self) -> usize {
        self.data.len()
    }

    /// The buffer without its last byte, which stays free for a terminating NUL.
    pub(crate) fn as_text_slice(&mut self) -> &mut [u8] {
        let end = self.text_capacity();
        &mut self.data[..end]
    }

    pub(crate) fn text_capacity(&self) -> usize {
        self.data.len().saturating_sub(1)
    }

    /// Write a terminating NUL after `len` bytes if there is room.
    pub(crate) fn terminate(&mut self, len: usize) {
        if let Some(byte) = self.data.get_mut(len) {
            *byte = 0;
        }
    }
}

/// A native buffer the provider consumes.
pub(crate) struct Buf<'e> {
    data: &'e [u8],
    _registration: Registration<'e>,
}

impl<'e> Buf<'e> {
    /// # Safety
    ///
    /// `ptr` must be null with `len == 0`, or valid for reads of `len` bytes
    /// for the duration of the call.
    pub(crate) unsafe fn new(
        env: &'e Env,
        ptr: *const c_char,
        len: usize,
        argument: &'static str,
    ) -> Result<Self, BridgeError> {
        let base = checked_base(ptr, len, argument)?;
        let data: &'e [u8] = if base.is_null() || len == 0 {
            &[]
        } else {
            // SAFETY: non-null, readable for `len` bytes per the caller's contract.
            unsafe { slice::from_raw_parts(base, len) }
        };
        Ok(Self {
            data,
            _registration: Registration::new(env),
        })
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        self.data
    }
}

/// Directory entry sink for `readdir`.
///
/// Every [`add`](Self::add) is forwarded to the native filler immediately;
/// nothing is buffered.
pub struct DirFiller<'e> {
    buf: *mut c_void,
    filler: fuse_fill_dir_t,
    added: usize,
    _registration: Registration<'e>,
}

impl<'e> DirFiller<'e> {
    /// # Safety
    ///
    /// `filler` must be safe to call with `buf` for the duration of the call.
    pub(crate) unsafe fn new(
        env: &'e Env,
        buf: *mut c_void,
        filler: Option<fuse_fill_dir_t>,
    ) -> Result<Self, BridgeError> {
        let filler = filler.ok_or(BridgeError::NullArgument { argument: "filler" })?;
        Ok(Self {
            buf,
            filler,
            added: 0,
            _registration: Registration::new(env),
        })
    }

    /// Emit one directory entry.
    ///
    /// `offset` is the offset of the *next* entry, or 0 if the provider
    /// returns the whole directory in one call.
    ///
    /// Returns `Ok(true)` when the native buffer is full; the provider should
    /// stop adding entries.
    ///
    /// # Errors
    ///
    /// [`FsError::InvalidArgument`] if `name` contains a NUL byte.
    pub fn add(&mut self, name: &OsStr, stat: Option<&Stat>, offset: i64) -> FsResult<bool> {
        let name = CString::new(name.as_bytes()).map_err(|_| FsError::InvalidArgument {
            details: format!("directory entry name contains NUL: {}", name.to_string_lossy()),
        })?;
        let native = stat.map(|stat| {
            // SAFETY: `struct stat` is plain data; all-zero is a valid value.
            let mut st: libc::stat = unsafe { std::mem::zeroed() };
            stat.merge(&mut st);
            st
        });
        let stp = native.as_ref().map_or(ptr::null(), |st| st as *const libc::stat);
        // SAFETY: `filler` and `buf` come from the native caller of this
        // `readdir` and are valid until it returns.
        let full = unsafe { (self.filler)(self.buf, name.as_ptr(), stp, offset as _) } != 0;
        if !full {
            self.added += 1;
        }
        Ok(full)
    }

    /// Entries accepted so far.
    pub fn len(&self) -> usize {
        self.added
    }

    /// Returns `true` if no entry was accepted yet.
    pub fn is_empty(&self) -> bool {
        self.added == 0
    }
}

/// Directory entry sink for the legacy `getdir`.
pub struct DirHandle<'e> {
    handle: fuse_dirh_t,
    filler: fuse_dirfil_t,
    _registration: Registration<'e>,
}

impl<'e> DirHandle<'e> {
    /// # Safety
    ///
    /// `filler` must be safe to call with `handle` for the duration of the call.
    pub(crate) unsafe fn new(
        env: &'e Env,
        handle: fuse_dirh_t,
        filler: Option<fuse_dirfil_t>,
    ) -> Result<Self, BridgeError> {
        let filler = filler.ok_or(BridgeError::NullArgument { argument: "filler" })?;
        Ok(Self {
            handle,
            filler,
            _registration: Registration::new(env),
        })
    }

    /// Emit one directory entry with its type and inode number.
    ///
    /// # Errors
    ///
    /// [`FsError::InvalidArgument`] if `name` contains a NUL byte, or the
    /// error the native filler reported.
    pub fn add(&mut self, name: &OsStr, kind: Option<FileType>, ino: u64) -> FsResult<()> {
        let name = CString::new(name.as_bytes()).map_err(|_| FsError::InvalidArgument {
            details: format!("directory entry name contains NUL: {}", name.to_string_lossy()),
        })?;
        // `getdir` wants the DT_* value, which is the S_IFMT nibble.
        let typ = kind.map_or(0, |k| (k.mode_bits() >> 12) as c_int);
        // SAFETY: `filler` and `handle` come from the native caller of this
        // `getdir` and are valid until it returns.
        let rc = unsafe { (self.filler)(self.handle, name.as_ptr(), typ, ino as _) };
        if rc != 0 {
            return Err(FsError::from_errno(rc));
        }
        Ok(())
    }
}
