//! `extern "C"` trampolines and the operation table.
//!
//! Each trampoline builds its bindings in native parameter order, runs the
//! provider through [`Call::invoke`], merges outputs in reverse order and
//! converts the result. The surrounding protocol lives in
//! [`dispatch`](crate::dispatch).

use std::ptr;

use libc::{c_char, c_int, c_void, dev_t, gid_t, mode_t, off_t, size_t, uid_t};

use crate::dispatch::{Abort, byte_count, dispatch, run, status};
use crate::marshal::{Binding, Buf, BufMut, CStrArg, DirFiller, DirHandle};
use crate::native::{self, FuseConnInfo, FuseFileInfo, FuseOperations, fuse_dirfil_t, fuse_dirh_t, fuse_fill_dir_t};
use crate::operation::Operation;
use crate::types::{ConnInfo, FileInfo, Flock, Stat, StatVfs, Timespec, Utimbuf, XattrFlags};

/// The operation table to hand to `fuse_main_real`.
///
/// Every entry is set; operations the provider does not implement answer
/// `-ENOSYS` at call time.
pub fn operations() -> FuseOperations {
    FuseOperations {
        getattr: Some(getattr),
        readlink: Some(readlink),
        getdir: Some(getdir),
        mknod: Some(mknod),
        mkdir: Some(mkdir),
        unlink: Some(unlink),
        rmdir: Some(rmdir),
        symlink: Some(symlink),
        rename: Some(rename),
        link: Some(link),
        chmod: Some(chmod),
        chown: Some(chown),
        truncate: Some(truncate),
        utime: Some(utime),
        open: Some(open),
        read: Some(read),
        write: Some(write),
        statfs: Some(statfs),
        flush: Some(flush),
        release: Some(release),
        fsync: Some(fsync),
        setxattr: Some(setxattr),
        getxattr: Some(getxattr),
        listxattr: Some(listxattr),
        removexattr: Some(removexattr),
        opendir: Some(opendir),
        readdir: Some(readdir),
        releasedir: Some(releasedir),
        fsyncdir: Some(fsyncdir),
        init: Some(init),
        destroy: Some(destroy),
        access: Some(access),
        create: Some(create),
        ftruncate: Some(ftruncate),
        fgetattr: Some(fgetattr),
        lock: Some(lock),
        utimens: Some(utimens),
        bmap: Some(bmap),
    }
}

unsafe extern "C" fn getattr(path: *const c_char, stbuf: *mut libc::stat) -> c_int {
    dispatch(Operation::Getattr, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let mut stat = unsafe { Binding::<Stat>::output(call.env(), stbuf, "stbuf") }?;
        let result = call.invoke(|fs, req| fs.getattr(req, path.as_path(), stat.get_mut()))?;
        stat.merge();
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn readlink(path: *const c_char, buf: *mut c_char, size: size_t) -> c_int {
    dispatch(Operation::Readlink, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let mut buf = unsafe { BufMut::new(call.env(), buf, size, "buf") }?;
        let result = call.invoke(|fs, req| fs.readlink(req, path.as_path(), buf.as_text_slice()))?;
        let count = byte_count(call.op(), result, buf.text_capacity(), false)?;
        if let Ok(len) = usize::try_from(count) {
            buf.terminate(len);
        }
        Ok(count)
    })
}

unsafe extern "C" fn getdir(path: *const c_char, h: fuse_dirh_t, filler: Option<fuse_dirfil_t>) -> c_int {
    dispatch(Operation::Getdir, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let mut handle = unsafe { DirHandle::new(call.env(), h, filler) }?;
        let result = call.invoke(|fs, req| fs.getdir(req, path.as_path(), &mut handle))?;
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn mknod(path: *const c_char, mode: mode_t, rdev: dev_t) -> c_int {
    dispatch(Operation::Mknod, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let result = call.invoke(|fs, req| fs.mknod(req, path.as_path(), mode as u32, rdev as u64))?;
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn mkdir(path: *const c_char, mode: mode_t) -> c_int {
    dispatch(Operation::Mkdir, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let result = call.invoke(|fs, req| fs.mkdir(req, path.as_path(), mode as u32))?;
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn unlink(path: *const c_char) -> c_int {
    dispatch(Operation::Unlink, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let result = call.invoke(|fs, req| fs.unlink(req, path.as_path()))?;
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn rmdir(path: *const c_char) -> c_int {
    dispatch(Operation::Rmdir, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let result = call.invoke(|fs, req| fs.rmdir(req, path.as_path()))?;
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn symlink(target: *const c_char, link: *const c_char) -> c_int {
    dispatch(Operation::Symlink, |call| {
        let target = unsafe { CStrArg::new(call.env(), target, "target") }?;
        let link = unsafe { CStrArg::new(call.env(), link, "link") }?;
        let result = call.invoke(|fs, req| fs.symlink(req, target.as_path(), link.as_path()))?;
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn rename(from: *const c_char, to: *const c_char) -> c_int {
    dispatch(Operation::Rename, |call| {
        let from = unsafe { CStrArg::new(call.env(), from, "from") }?;
        let to = unsafe { CStrArg::new(call.env(), to, "to") }?;
        let result = call.invoke(|fs, req| fs.rename(req, from.as_path(), to.as_path()))?;
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn link(target: *const c_char, link: *const c_char) -> c_int {
    dispatch(Operation::Link, |call| {
        let target = unsafe { CStrArg::new(call.env(), target, "target") }?;
        let link = unsafe { CStrArg::new(call.env(), link, "link") }?;
        let result = call.invoke(|fs, req| fs.link(req, target.as_path(), link.as_path()))?;
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn chmod(path: *const c_char, mode: mode_t) -> c_int {
    dispatch(Operation::Chmod, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let result = call.invoke(|fs, req| fs.chmod(req, path.as_path(), mode as u32))?;
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn chown(path: *const c_char, uid: uid_t, gid: gid_t) -> c_int {
    dispatch(Operation::Chown, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let result = call.invoke(|fs, req| fs.chown(req, path.as_path(), uid, gid))?;
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn truncate(path: *const c_char, size: off_t) -> c_int {
    dispatch(Operation::Truncate, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let result = call.invoke(|fs, req| fs.truncate(req, path.as_path(), size as i64))?;
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn utime(path: *const c_char, times: *mut libc::utimbuf) -> c_int {
    dispatch(Operation::Utime, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let mut times = unsafe { Binding::<Utimbuf>::output(call.env(), times, "times") }?;
        let result = call.invoke(|fs, req| fs.utime(req, path.as_path(), times.get_mut()))?;
        times.merge();
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn open(path: *const c_char, fi: *mut FuseFileInfo) -> c_int {
    dispatch(Operation::Open, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let mut info = unsafe { Binding::<FileInfo>::optional(call.env(), fi) };
        let result = call.invoke(|fs, req| fs.open(req, path.as_path(), info.get_mut()))?;
        info.merge();
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn read(
    path: *const c_char,
    buf: *mut c_char,
    size: size_t,
    offset: off_t,
    fi: *mut FuseFileInfo,
) -> c_int {
    dispatch(Operation::Read, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let mut buf = unsafe { BufMut::new(call.env(), buf, size, "buf") }?;
        let mut info = unsafe { Binding::<FileInfo>::optional(call.env(), fi) };
        let result = call.invoke(|fs, req| {
            fs.read(req, path.as_path(), buf.as_mut_slice(), offset as i64, info.get_mut())
        })?;
        info.merge();
        byte_count(call.op(), result, buf.capacity(), false)
    })
}

unsafe extern "C" fn write(
    path: *const c_char,
    buf: *const c_char,
    size: size_t,
    offset: off_t,
    fi: *mut FuseFileInfo,
) -> c_int {
    dispatch(Operation::Write, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let data = unsafe { Buf::new(call.env(), buf, size, "buf") }?;
        let mut info = unsafe { Binding::<FileInfo>::optional(call.env(), fi) };
        let result = call.invoke(|fs, req| {
            fs.write(req, path.as_path(), data.as_slice(), offset as i64, info.get_mut())
        })?;
        info.merge();
        byte_count(call.op(), result, data.as_slice().len(), false)
    })
}

unsafe extern "C" fn statfs(path: *const c_char, stbuf: *mut libc::statvfs) -> c_int {
    dispatch(Operation::Statfs, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let mut stat = unsafe { Binding::<StatVfs>::output(call.env(), stbuf, "stbuf") }?;
        let result = call.invoke(|fs, req| fs.statfs(req, path.as_path(), stat.get_mut()))?;
        stat.merge();
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn flush(path: *const c_char, fi: *mut FuseFileInfo) -> c_int {
    dispatch(Operation::Flush, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let mut info = unsafe { Binding::<FileInfo>::optional(call.env(), fi) };
        let result = call.invoke(|fs, req| fs.flush(req, path.as_path(), info.get_mut()))?;
        info.merge();
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn release(path: *const c_char, fi: *mut FuseFileInfo) -> c_int {
    dispatch(Operation::Release, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let mut info = unsafe { Binding::<FileInfo>::optional(call.env(), fi) };
        let result = call.invoke(|fs, req| fs.release(req, path.as_path(), info.get_mut()))?;
        info.merge();
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn fsync(path: *const c_char, datasync: c_int, fi: *mut FuseFileInfo) -> c_int {
    dispatch(Operation::Fsync, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let mut info = unsafe { Binding::<FileInfo>::optional(call.env(), fi) };
        let result = call.invoke(|fs, req| fs.fsync(req, path.as_path(), datasync != 0, info.get_mut()))?;
        info.merge();
        Ok(status(call.op(), result))
    })
}

#[cfg(target_os = "macos")]
unsafe extern "C" fn setxattr(
    path: *const c_char,
    name: *const c_char,
    value: *const c_char,
    size: size_t,
    flags: c_int,
    position: u32,
) -> c_int {
    unsafe { setxattr_at(path, name, value, size, flags, position) }
}

#[cfg(not(target_os = "macos"))]
unsafe extern "C" fn setxattr(
    path: *const c_char,
    name: *const c_char,
    value: *const c_char,
    size: size_t,
    flags: c_int,
) -> c_int {
    unsafe { setxattr_at(path, name, value, size, flags, 0) }
}

unsafe fn setxattr_at(
    path: *const c_char,
    name: *const c_char,
    value: *const c_char,
    size: size_t,
    flags: c_int,
    position: u32,
) -> c_int {
    dispatch(Operation::Setxattr, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let name = unsafe { CStrArg::new(call.env(), name, "name") }?;
        let value = unsafe { Buf::new(call.env(), value, size, "value") }?;
        let flags = XattrFlags::from_bits_retain(flags);
        let result = call.invoke(|fs, req| {
            fs.setxattr(req, path.as_path(), name.as_os_str(), value.as_slice(), flags, position)
        })?;
        Ok(status(call.op(), result))
    })
}

#[cfg(target_os = "macos")]
unsafe extern "C" fn getxattr(
    path: *const c_char,
    name: *const c_char,
    value: *mut c_char,
    size: size_t,
    position: u32,
) -> c_int {
    unsafe { getxattr_at(path, name, value, size, position) }
}

#[cfg(not(target_os = "macos"))]
unsafe extern "C" fn getxattr(
    path: *const c_char,
    name: *const c_char,
    value: *mut c_char,
    size: size_t,
) -> c_int {
    unsafe { getxattr_at(path, name, value, size, 0) }
}

unsafe fn getxattr_at(
    path: *const c_char,
    name: *const c_char,
    value: *mut c_char,
    size: size_t,
    position: u32,
) -> c_int {
    dispatch(Operation::Getxattr, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let name = unsafe { CStrArg::new(call.env(), name, "name") }?;
        let mut value = unsafe { BufMut::new(call.env(), value, size, "value") }?;
        let result = call.invoke(|fs, req| {
            fs.getxattr(req, path.as_path(), name.as_os_str(), value.as_mut_slice(), position)
        })?;
        byte_count(call.op(), result, value.capacity(), true)
    })
}

unsafe extern "C" fn listxattr(path: *const c_char, list: *mut c_char, size: size_t) -> c_int {
    dispatch(Operation::Listxattr, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let mut list = unsafe { BufMut::new(call.env(), list, size, "list") }?;
        let result = call.invoke(|fs, req| fs.listxattr(req, path.as_path(), list.as_mut_slice()))?;
        byte_count(call.op(), result, list.capacity(), true)
    })
}

unsafe extern "C" fn removexattr(path: *const c_char, name: *const c_char) -> c_int {
    dispatch(Operation::Removexattr, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let name = unsafe { CStrArg::new(call.env(), name, "name") }?;
        let result = call.invoke(|fs, req| fs.removexattr(req, path.as_path(), name.as_os_str()))?;
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn opendir(path: *const c_char, fi: *mut FuseFileInfo) -> c_int {
    dispatch(Operation::Opendir, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let mut info = unsafe { Binding::<FileInfo>::optional(call.env(), fi) };
        let result = call.invoke(|fs, req| fs.opendir(req, path.as_path(), info.get_mut()))?;
        info.merge();
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn readdir(
    path: *const c_char,
    buf: *mut c_void,
    filler: Option<fuse_fill_dir_t>,
    offset: off_t,
    fi: *mut FuseFileInfo,
) -> c_int {
    dispatch(Operation::Readdir, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let mut filler = unsafe { DirFiller::new(call.env(), buf, filler) }?;
        let mut info = unsafe { Binding::<FileInfo>::optional(call.env(), fi) };
        let result = call.invoke(|fs, req| {
            fs.readdir(req, path.as_path(), &mut filler, offset as i64, info.get_mut())
        })?;
        info.merge();
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn releasedir(path: *const c_char, fi: *mut FuseFileInfo) -> c_int {
    dispatch(Operation::Releasedir, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let mut info = unsafe { Binding::<FileInfo>::optional(call.env(), fi) };
        let result = call.invoke(|fs, req| fs.releasedir(req, path.as_path(), info.get_mut()))?;
        info.merge();
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn fsyncdir(path: *const c_char, datasync: c_int, fi: *mut FuseFileInfo) -> c_int {
    dispatch(Operation::Fsyncdir, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let mut info = unsafe { Binding::<FileInfo>::optional(call.env(), fi) };
        let result =
            call.invoke(|fs, req| fs.fsyncdir(req, path.as_path(), datasync != 0, info.get_mut()))?;
        info.merge();
        Ok(status(call.op(), result))
    })
}

#[cfg(target_os = "macos")]
unsafe fn request_xtimes(conn: *mut FuseConnInfo) {
    // SAFETY: `conn` is null or the connection info libfuse passed to `init`.
    if let Some(conn) = unsafe { conn.as_mut() } {
        conn.enable |= native::CONN_ENABLE_XTIMES;
        tracing::debug!("enabled extended timestamps");
    }
}

#[cfg(not(target_os = "macos"))]
unsafe fn request_xtimes(_conn: *mut FuseConnInfo) {
    tracing::debug!("extended timestamps requested but not supported on this platform");
}

unsafe extern "C" fn init(conn: *mut FuseConnInfo) -> *mut c_void {
    let result = run(Operation::Init, |call| {
        let session = call.session();
        if !session.begin_init() {
            tracing::warn!("init called more than once for this session");
            return Ok(call.user_data());
        }
        if session.flags().xtimes {
            unsafe { request_xtimes(conn) };
        }
        // Without the init capability the call exists only to set xtimes.
        if !session.flags().init {
            return Ok(call.user_data());
        }

        let mut info = unsafe { Binding::<ConnInfo>::output(call.env(), conn, "conn") }?;
        match call.invoke(|fs, req| fs.init(req, info.get_mut())) {
            Ok(result) => {
                info.merge();
                match result {
                    Ok(Some(data)) => session.set_private_data(Some(data)),
                    Ok(None) => {}
                    Err(err) => tracing::warn!(error = %err, "provider init failed"),
                }
            }
            Err(Abort::Unsupported) => tracing::debug!("provider has no init hook"),
            Err(abort) => return Err(abort),
        }
        Ok(call.user_data())
    });
    // libfuse stores the return value as every later request's private_data,
    // so the session pointer must survive a failed hook.
    result.unwrap_or_else(|_| {
        native::current_context()
            .map(|ctx| ctx.private_data)
            .unwrap_or(ptr::null_mut())
    })
}

unsafe extern "C" fn destroy(private_data: *mut c_void) {
    let _ = run(Operation::Destroy, |call| {
        if private_data != call.user_data() {
            tracing::warn!(
                received = ?private_data,
                expected = ?call.user_data(),
                "destroy received unexpected private data"
            );
        }
        let session = call.session();
        let data = session.private_data();
        let outcome = call.invoke(|fs, req| {
            fs.destroy(req, data);
            Ok(())
        });
        session.set_private_data(None);
        match outcome {
            Ok(_) | Err(Abort::Unsupported) => Ok(()),
            Err(abort) => Err(abort),
        }
    });
}

unsafe extern "C" fn access(path: *const c_char, mask: c_int) -> c_int {
    dispatch(Operation::Access, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let result = call.invoke(|fs, req| fs.access(req, path.as_path(), mask))?;
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn create(path: *const c_char, mode: mode_t, fi: *mut FuseFileInfo) -> c_int {
    dispatch(Operation::Create, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let mut info = unsafe { Binding::<FileInfo>::optional(call.env(), fi) };
        let result = call.invoke(|fs, req| fs.create(req, path.as_path(), mode as u32, info.get_mut()))?;
        info.merge();
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn ftruncate(path: *const c_char, size: off_t, fi: *mut FuseFileInfo) -> c_int {
    dispatch(Operation::Ftruncate, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let mut info = unsafe { Binding::<FileInfo>::optional(call.env(), fi) };
        let result = call.invoke(|fs, req| fs.ftruncate(req, path.as_path(), size as i64, info.get_mut()))?;
        info.merge();
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn fgetattr(path: *const c_char, stbuf: *mut libc::stat, fi: *mut FuseFileInfo) -> c_int {
    dispatch(Operation::Fgetattr, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let mut stat = unsafe { Binding::<Stat>::output(call.env(), stbuf, "stbuf") }?;
        let mut info = unsafe { Binding::<FileInfo>::optional(call.env(), fi) };
        let result = call.invoke(|fs, req| fs.fgetattr(req, path.as_path(), stat.get_mut(), info.get_mut()))?;
        info.merge();
        stat.merge();
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn lock(path: *const c_char, fi: *mut FuseFileInfo, cmd: c_int, lock: *mut libc::flock) -> c_int {
    dispatch(Operation::Lock, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let mut info = unsafe { Binding::<FileInfo>::optional(call.env(), fi) };
        let mut record = unsafe { Binding::<Flock>::output(call.env(), lock, "lock") }?;
        let result = call.invoke(|fs, req| fs.lock(req, path.as_path(), info.get_mut(), cmd, record.get_mut()))?;
        record.merge();
        info.merge();
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn utimens(path: *const c_char, tv: *const libc::timespec) -> c_int {
    dispatch(Operation::Utimens, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let atime = unsafe { Binding::<Timespec>::input(call.env(), tv, "tv[0]") }?;
        let mtime = unsafe { Binding::<Timespec>::input(call.env(), tv.wrapping_add(1), "tv[1]") }?;
        let times = [*atime.get(), *mtime.get()];
        let result = call.invoke(|fs, req| fs.utimens(req, path.as_path(), &times))?;
        Ok(status(call.op(), result))
    })
}

unsafe extern "C" fn bmap(path: *const c_char, blocksize: size_t, idx: *mut u64) -> c_int {
    dispatch(Operation::Bmap, |call| {
        let path = unsafe { CStrArg::new(call.env(), path, "path") }?;
        let mut index = unsafe { Binding::<u64>::output(call.env(), idx, "idx") }?;
        let result = call.invoke(|fs, req| fs.bmap(req, path.as_path(), blocksize, index.get_mut()))?;
        index.merge();
        Ok(status(call.op(), result))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entry_is_set() {
        let ops = operations();
        assert!(ops.getattr.is_some());
        assert!(ops.getdir.is_some());
        assert!(ops.setxattr.is_some());
        assert!(ops.init.is_some());
        assert!(ops.destroy.is_some());
        assert!(ops.bmap.is_some());
    }

    #[test]
    fn trampoline_without_context_fails_with_eio() {
        #[cfg(not(feature = "libfuse"))]
        {
            let mut st: libc::stat = unsafe { std::mem::zeroed() };
            let rc = unsafe { getattr(c"/".as_ptr(), &mut st) };
            assert_eq!(rc, -libc::EIO);
        }
    }
}
