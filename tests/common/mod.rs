//! Shared fixtures: an in-memory provider and a harness that drives the
//! native operation table the way a FUSE dispatcher would.

#![allow(dead_code)]

use anyfs_fuse::*;
use libc::{c_char, c_int, c_void};
use std::collections::{BTreeMap, HashMap};
use std::ffi::{CStr, CString, OsStr, OsString};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

// =============================================================================
// Logging
// =============================================================================

/// Route bridge logs to the test output (`RUST_LOG=anyfs_fuse=trace`).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// In-Memory Provider
// =============================================================================

/// State returned from `init` and replaced by `access`.
#[derive(Debug)]
pub struct MountState {
    pub generation: u64,
}

#[derive(Clone)]
struct Node {
    kind: FileType,
    perm: u32,
    ino: u64,
    data: Vec<u8>,
    target: Option<PathBuf>,
    xattrs: BTreeMap<OsString, Vec<u8>>,
    atime: Timespec,
    mtime: Timespec,
    ctime: Timespec,
}

/// A small path-keyed filesystem that records every provider call.
pub struct MemFs {
    nodes: RwLock<HashMap<PathBuf, Node>>,
    handles: RwLock<HashMap<u64, PathBuf>>,
    next_ino: AtomicU64,
    next_handle: AtomicU64,
    operations: OperationSet,
    calls: Mutex<Vec<Operation>>,
    destroyed_with: Mutex<Option<Option<u64>>>,
}

impl MemFs {
    /// Every operation this provider implements.
    pub fn supported() -> OperationSet {
        [
            Operation::Getattr,
            Operation::Readlink,
            Operation::Getdir,
            Operation::Mknod,
            Operation::Mkdir,
            Operation::Unlink,
            Operation::Rmdir,
            Operation::Symlink,
            Operation::Rename,
            Operation::Chmod,
            Operation::Truncate,
            Operation::Open,
            Operation::Read,
            Operation::Write,
            Operation::Statfs,
            Operation::Flush,
            Operation::Release,
            Operation::Setxattr,
            Operation::Getxattr,
            Operation::Listxattr,
            Operation::Removexattr,
            Operation::Opendir,
            Operation::Readdir,
            Operation::Releasedir,
            Operation::Init,
            Operation::Destroy,
            Operation::Access,
            Operation::Create,
            Operation::Fgetattr,
            Operation::Ftruncate,
            Operation::Fsync,
            Operation::Lock,
            Operation::Utimens,
            Operation::Bmap,
        ]
        .into_iter()
        .collect()
    }

    pub fn new() -> Self {
        Self::with_operations(Self::supported())
    }

    /// A provider that declares only `operations`.
    pub fn with_operations(operations: OperationSet) -> Self {
        let fs = Self {
            nodes: RwLock::new(HashMap::new()),
            handles: RwLock::new(HashMap::new()),
            next_ino: AtomicU64::new(2),
            next_handle: AtomicU64::new(1),
            operations,
            calls: Mutex::new(Vec::new()),
            destroyed_with: Mutex::new(None),
        };
        let root = fs.node(FileType::Directory, 0o755);
        fs.nodes.write().unwrap().insert(PathBuf::from("/"), Node { ino: 1, ..root });
        fs
    }

    /// Operations that reached the provider, in call order.
    pub fn calls(&self) -> Vec<Operation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, op: Operation) -> usize {
        self.calls.lock().unwrap().iter().filter(|&&c| c == op).count()
    }

    /// Generation of the private data `destroy` received, if it ran.
    pub fn destroyed_with(&self) -> Option<Option<u64>> {
        *self.destroyed_with.lock().unwrap()
    }

    pub fn contents(&self, path: &str) -> Option<Vec<u8>> {
        self.nodes.read().unwrap().get(Path::new(path)).map(|n| n.data.clone())
    }

    fn record(&self, op: Operation) {
        self.calls.lock().unwrap().push(op);
    }

    fn node(&self, kind: FileType, perm: u32) -> Node {
        let now = Timespec::now();
        Node {
            kind,
            perm: perm & 0o7777,
            ino: self.next_ino.fetch_add(1, Ordering::SeqCst),
            data: Vec::new(),
            target: None,
            xattrs: BTreeMap::new(),
            atime: now,
            mtime: now,
            ctime: now,
        }
    }

    fn insert(&self, path: &Path, node: Node, operation: &'static str) -> Result<(), FsError> {
        let mut nodes = self.nodes.write().unwrap();
        if nodes.contains_key(path) {
            return Err(FsError::AlreadyExists {
                path: path.to_path_buf(),
                operation,
            });
        }
        let parent = path.parent().ok_or_else(|| FsError::InvalidArgument {
            details: "cannot create the root".into(),
        })?;
        match nodes.get(parent) {
            Some(p) if p.kind == FileType::Directory => {}
            Some(_) => {
                return Err(FsError::NotADirectory {
                    path: parent.to_path_buf(),
                });
            }
            None => {
                return Err(FsError::NotFound {
                    path: parent.to_path_buf(),
                });
            }
        }
        nodes.insert(path.to_path_buf(), node);
        Ok(())
    }

    fn with_node<T>(&self, path: &Path, f: impl FnOnce(&mut Node) -> Result<T, FsError>) -> Result<T, FsError> {
        let mut nodes = self.nodes.write().unwrap();
        let node = nodes.get_mut(path).ok_or_else(|| FsError::NotFound {
            path: path.to_path_buf(),
        })?;
        f(node)
    }

    fn handle_path(&self, fi: &FileInfo) -> Result<PathBuf, FsError> {
        self.handles
            .read()
            .unwrap()
            .get(&fi.fh)
            .cloned()
            .ok_or(FsError::InvalidHandle { handle: fi.fh })
    }

    fn open_handle(&self, path: &Path, fi: &mut FileInfo) {
        let fh = self.next_handle.fetch_add(1, Ordering::SeqCst);
        self.handles.write().unwrap().insert(fh, path.to_path_buf());
        fi.fh = fh;
        fi.keep_cache = true;
    }

    fn children(&self, dir: &Path) -> Result<Vec<(OsString, FileType, u64)>, FsError> {
        let nodes = self.nodes.read().unwrap();
        match nodes.get(dir) {
            Some(n) if n.kind == FileType::Directory => {}
            Some(_) => return Err(FsError::NotADirectory { path: dir.to_path_buf() }),
            None => return Err(FsError::NotFound { path: dir.to_path_buf() }),
        }
        let mut entries: Vec<_> = nodes
            .iter()
            .filter(|(p, _)| p.parent() == Some(dir))
            .filter_map(|(p, n)| Some((p.file_name()?.to_owned(), n.kind, n.ino)))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }
}

fn fill_stat(node: &Node, stat: &mut Stat) {
    let size = match &node.target {
        Some(target) => target.as_os_str().len(),
        None => node.data.len(),
    } as i64;
    stat.ino = node.ino;
    stat.mode = node.kind.mode_bits() | node.perm;
    stat.nlink = if node.kind == FileType::Directory { 2 } else { 1 };
    stat.size = size;
    stat.blksize = 4096;
    stat.blocks = (size + 511) / 512;
    stat.atime = node.atime;
    stat.mtime = node.mtime;
    stat.ctime = node.ctime;
}

impl FsAttr for MemFs {
    fn getattr(&self, _req: &Request<'_>, path: &Path, stat: &mut Stat) -> Result<(), FsError> {
        self.record(Operation::Getattr);
        if path == Path::new("/panic") {
            panic!("simulated provider failure");
        }
        self.with_node(path, |node| {
            fill_stat(node, stat);
            Ok(())
        })
    }

    fn truncate(&self, _req: &Request<'_>, path: &Path, size: i64) -> Result<(), FsError> {
        self.record(Operation::Truncate);
        let size = usize::try_from(size).map_err(|_| FsError::InvalidArgument {
            details: format!("negative size {size}"),
        })?;
        self.with_node(path, |node| {
            node.data.resize(size, 0);
            Ok(())
        })
    }

    fn utimens(&self, _req: &Request<'_>, path: &Path, times: &[Timespec; 2]) -> Result<(), FsError> {
        self.record(Operation::Utimens);
        let resolve = |t: Timespec| if t.is_now() { Timespec::now() } else { t };
        self.with_node(path, |node| {
            if !times[0].is_omit() {
                node.atime = resolve(times[0]);
            }
            if !times[1].is_omit() {
                node.mtime = resolve(times[1]);
            }
            Ok(())
        })
    }
}

impl FsPermissions for MemFs {
    fn chmod(&self, _req: &Request<'_>, path: &Path, mode: u32) -> Result<(), FsError> {
        self.record(Operation::Chmod);
        self.with_node(path, |node| {
            node.perm = mode & 0o7777;
            Ok(())
        })
    }

    // Also refreshes the mount state so tests can watch private data change.
    fn access(&self, req: &Request<'_>, path: &Path, _mask: i32) -> Result<(), FsError> {
        self.record(Operation::Access);
        self.with_node(path, |_| Ok(()))?;
        let generation = req.private_data_as::<MountState>().map_or(0, |s| s.generation);
        req.set_private_data(Some(Arc::new(MountState {
            generation: generation + 1,
        })));
        Ok(())
    }
}

impl FsNodes for MemFs {
    fn mknod(&self, _req: &Request<'_>, path: &Path, mode: u32, _rdev: u64) -> Result<(), FsError> {
        self.record(Operation::Mknod);
        let kind = FileType::from_mode(mode).unwrap_or(FileType::File);
        self.insert(path, self.node(kind, mode), "mknod")
    }

    fn unlink(&self, _req: &Request<'_>, path: &Path) -> Result<(), FsError> {
        self.record(Operation::Unlink);
        let mut nodes = self.nodes.write().unwrap();
        match nodes.get(path) {
            Some(n) if n.kind == FileType::Directory => Err(FsError::IsADirectory {
                path: path.to_path_buf(),
            }),
            Some(_) => {
                nodes.remove(path);
                Ok(())
            }
            None => Err(FsError::NotFound {
                path: path.to_path_buf(),
            }),
        }
    }

    fn rename(&self, _req: &Request<'_>, from: &Path, to: &Path) -> Result<(), FsError> {
        self.record(Operation::Rename);
        let mut nodes = self.nodes.write().unwrap();
        let node = nodes.remove(from).ok_or_else(|| FsError::NotFound {
            path: from.to_path_buf(),
        })?;
        nodes.insert(to.to_path_buf(), node);
        Ok(())
    }
}

impl FsLink for MemFs {
    fn readlink(&self, _req: &Request<'_>, path: &Path, buf: &mut [u8]) -> Result<usize, FsError> {
        self.record(Operation::Readlink);
        let nodes = self.nodes.read().unwrap();
        let target = nodes
            .get(path)
            .and_then(|n| n.target.as_ref())
            .ok_or_else(|| FsError::InvalidArgument {
                details: format!("not a symlink: {}", path.display()),
            })?;
        let bytes = target.as_os_str().as_bytes();
        let len = bytes.len().min(buf.len());
        buf[..len].copy_from_slice(&bytes[..len]);
        Ok(len)
    }

    fn symlink(&self, _req: &Request<'_>, target: &Path, link: &Path) -> Result<(), FsError> {
        self.record(Operation::Symlink);
        let node = Node {
            target: Some(target.to_path_buf()),
            ..self.node(FileType::Symlink, 0o777)
        };
        self.insert(link, node, "symlink")
    }
}

impl FsDir for MemFs {
    fn mkdir(&self, _req: &Request<'_>, path: &Path, mode: u32) -> Result<(), FsError> {
        self.record(Operation::Mkdir);
        self.insert(path, self.node(FileType::Directory, mode), "mkdir")
    }

    fn rmdir(&self, _req: &Request<'_>, path: &Path) -> Result<(), FsError> {
        self.record(Operation::Rmdir);
        if !self.children(path)?.is_empty() {
            return Err(FsError::DirectoryNotEmpty {
                path: path.to_path_buf(),
            });
        }
        self.nodes.write().unwrap().remove(path);
        Ok(())
    }

    fn opendir(&self, _req: &Request<'_>, path: &Path, fi: &mut FileInfo) -> Result<(), FsError> {
        self.record(Operation::Opendir);
        self.children(path)?;
        self.open_handle(path, fi);
        Ok(())
    }

    fn readdir(
        &self,
        _req: &Request<'_>,
        path: &Path,
        filler: &mut DirFiller<'_>,
        _offset: i64,
        _fi: &mut FileInfo,
    ) -> Result<(), FsError> {
        self.record(Operation::Readdir);
        let entries = self.children(path)?;
        for name in [".", ".."] {
            if filler.add(OsStr::new(name), None, 0)? {
                return Ok(());
            }
        }
        for (name, kind, ino) in entries {
            let stat = Stat {
                ino,
                mode: kind.mode_bits(),
                ..Default::default()
            };
            if filler.add(&name, Some(&stat), 0)? {
                break;
            }
        }
        Ok(())
    }

    fn releasedir(&self, _req: &Request<'_>, _path: &Path, fi: &mut FileInfo) -> Result<(), FsError> {
        self.record(Operation::Releasedir);
        self.handles
            .write()
            .unwrap()
            .remove(&fi.fh)
            .map(drop)
            .ok_or(FsError::InvalidHandle { handle: fi.fh })
    }

    fn getdir(&self, _req: &Request<'_>, path: &Path, handle: &mut DirHandle<'_>) -> Result<(), FsError> {
        self.record(Operation::Getdir);
        for (name, kind, ino) in self.children(path)? {
            handle.add(&name, Some(kind), ino)?;
        }
        Ok(())
    }
}

impl FsHandles for MemFs {
    fn open(&self, _req: &Request<'_>, path: &Path, fi: &mut FileInfo) -> Result<(), FsError> {
        self.record(Operation::Open);
        let truncate = fi.open_flags().truncate;
        self.with_node(path, |node| {
            if node.kind == FileType::Directory {
                return Err(FsError::IsADirectory {
                    path: path.to_path_buf(),
                });
            }
            if truncate {
                node.data.clear();
            }
            Ok(())
        })?;
        self.open_handle(path, fi);
        Ok(())
    }

    fn create(&self, _req: &Request<'_>, path: &Path, mode: u32, fi: &mut FileInfo) -> Result<(), FsError> {
        self.record(Operation::Create);
        self.insert(path, self.node(FileType::File, mode), "create")?;
        self.open_handle(path, fi);
        Ok(())
    }

    fn read(
        &self,
        _req: &Request<'_>,
        _path: &Path,
        buf: &mut [u8],
        offset: i64,
        fi: &mut FileInfo,
    ) -> Result<usize, FsError> {
        self.record(Operation::Read);
        let path = self.handle_path(fi)?;
        let nodes = self.nodes.read().unwrap();
        let data = &nodes
            .get(&path)
            .ok_or(FsError::NotFound { path: path.clone() })?
            .data;
        let start = (offset.max(0) as usize).min(data.len());
        let len = buf.len().min(data.len() - start);
        buf[..len].copy_from_slice(&data[start..start + len]);
        Ok(len)
    }

    fn write(
        &self,
        _req: &Request<'_>,
        _path: &Path,
        data: &[u8],
        offset: i64,
        fi: &mut FileInfo,
    ) -> Result<usize, FsError> {
        self.record(Operation::Write);
        let path = self.handle_path(fi)?;
        let start = offset.max(0) as usize;
        self.with_node(&path, |node| {
            if node.data.len() < start + data.len() {
                node.data.resize(start + data.len(), 0);
            }
            node.data[start..start + data.len()].copy_from_slice(data);
            node.mtime = Timespec::now();
            Ok(data.len())
        })
    }

    fn release(&self, _req: &Request<'_>, _path: &Path, fi: &mut FileInfo) -> Result<(), FsError> {
        self.record(Operation::Release);
        self.handles
            .write()
            .unwrap()
            .remove(&fi.fh)
            .map(drop)
            .ok_or(FsError::InvalidHandle { handle: fi.fh })
    }

    fn ftruncate(&self, _req: &Request<'_>, _path: &Path, size: i64, fi: &mut FileInfo) -> Result<(), FsError> {
        self.record(Operation::Ftruncate);
        let path = self.handle_path(fi)?;
        self.with_node(&path, |node| {
            node.data.resize(size.max(0) as usize, 0);
            Ok(())
        })
    }

    fn fgetattr(&self, req: &Request<'_>, _path: &Path, stat: &mut Stat, fi: &mut FileInfo) -> Result<(), FsError> {
        self.record(Operation::Fgetattr);
        let path = self.handle_path(fi)?;
        self.with_node(&path, |node| {
            fill_stat(node, stat);
            Ok(())
        })
        .map(|()| {
            stat.uid = req.uid();
            stat.gid = req.gid();
        })
    }
}

impl FsSync for MemFs {
    fn flush(&self, _req: &Request<'_>, _path: &Path, fi: &mut FileInfo) -> Result<(), FsError> {
        self.record(Operation::Flush);
        self.handle_path(fi).map(drop)
    }

    fn fsync(&self, _req: &Request<'_>, _path: &Path, datasync: bool, fi: &mut FileInfo) -> Result<(), FsError> {
        self.record(Operation::Fsync);
        self.handle_path(fi)?;
        // Data-only syncs are refused so tests can tell the two apart.
        if datasync {
            return Err(FsError::NotSupported { operation: "fdatasync" });
        }
        Ok(())
    }
}

// Never conflicts: every range is reported free.
impl FsLock for MemFs {
    fn lock(
        &self,
        _req: &Request<'_>,
        _path: &Path,
        fi: &mut FileInfo,
        cmd: i32,
        lock: &mut Flock,
    ) -> Result<(), FsError> {
        self.record(Operation::Lock);
        self.handle_path(fi)?;
        match LockCommand::from_raw(cmd) {
            Some(LockCommand::Get) => {
                lock.set_lock_type(LockType::Unlock);
                lock.pid = 0;
                Ok(())
            }
            Some(_) => Ok(()),
            None => Err(FsError::InvalidArgument {
                details: format!("lock command {cmd}"),
            }),
        }
    }
}

impl FsXattr for MemFs {
    fn setxattr(
        &self,
        _req: &Request<'_>,
        path: &Path,
        name: &OsStr,
        value: &[u8],
        flags: XattrFlags,
        _position: u32,
    ) -> Result<(), FsError> {
        self.record(Operation::Setxattr);
        self.with_node(path, |node| {
            let exists = node.xattrs.contains_key(name);
            if flags.contains(XattrFlags::CREATE) && exists {
                return Err(FsError::AlreadyExists {
                    path: path.to_path_buf(),
                    operation: "setxattr",
                });
            }
            if flags.contains(XattrFlags::REPLACE) && !exists {
                return Err(FsError::XattrNotFound {
                    path: path.to_path_buf(),
                    name: name.to_owned(),
                });
            }
            node.xattrs.insert(name.to_owned(), value.to_vec());
            Ok(())
        })
    }

    fn getxattr(
        &self,
        _req: &Request<'_>,
        path: &Path,
        name: &OsStr,
        buf: &mut [u8],
        _position: u32,
    ) -> Result<usize, FsError> {
        self.record(Operation::Getxattr);
        self.with_node(path, |node| {
            let value = node.xattrs.get(name).ok_or_else(|| FsError::XattrNotFound {
                path: path.to_path_buf(),
                name: name.to_owned(),
            })?;
            copy_out(value, buf)
        })
    }

    fn listxattr(&self, _req: &Request<'_>, path: &Path, buf: &mut [u8]) -> Result<usize, FsError> {
        self.record(Operation::Listxattr);
        self.with_node(path, |node| {
            let mut names = Vec::new();
            for name in node.xattrs.keys() {
                names.extend_from_slice(name.as_bytes());
                names.push(0);
            }
            copy_out(&names, buf)
        })
    }

    fn removexattr(&self, _req: &Request<'_>, path: &Path, name: &OsStr) -> Result<(), FsError> {
        self.record(Operation::Removexattr);
        self.with_node(path, |node| {
            node.xattrs
                .remove(name)
                .map(drop)
                .ok_or_else(|| FsError::XattrNotFound {
                    path: path.to_path_buf(),
                    name: name.to_owned(),
                })
        })
    }
}

fn copy_out(value: &[u8], buf: &mut [u8]) -> Result<usize, FsError> {
    if buf.is_empty() {
        return Ok(value.len());
    }
    let capacity = buf.len();
    let dst = buf.get_mut(..value.len()).ok_or(FsError::BufferTooSmall {
        needed: value.len(),
        capacity,
    })?;
    dst.copy_from_slice(value);
    Ok(value.len())
}

impl FsStats for MemFs {
    fn statfs(&self, _req: &Request<'_>, _path: &Path, stat: &mut StatVfs) -> Result<(), FsError> {
        self.record(Operation::Statfs);
        let used = self.nodes.read().unwrap().len() as u64;
        *stat = StatVfs {
            bsize: 4096,
            frsize: 4096,
            blocks: 1024,
            bfree: 1000,
            bavail: 900,
            files: 100,
            ffree: 100 - used,
            favail: 100 - used,
            fsid: 0x2a,
            flag: 0,
            namemax: 255,
        };
        Ok(())
    }

    // Files are stored as one contiguous run starting at block 1000.
    fn bmap(&self, _req: &Request<'_>, path: &Path, blocksize: usize, index: &mut u64) -> Result<(), FsError> {
        self.record(Operation::Bmap);
        self.with_node(path, |_| Ok(()))?;
        if blocksize == 0 {
            return Err(FsError::InvalidArgument {
                details: "zero block size".into(),
            });
        }
        *index += 1000;
        Ok(())
    }
}

impl FsSession for MemFs {
    fn operations(&self) -> OperationSet {
        self.operations
    }

    fn init(&self, _req: &Request<'_>, conn: &mut ConnInfo) -> Result<Option<PrivateData>, FsError> {
        self.record(Operation::Init);
        conn.max_write = conn.max_write.min(64 * 1024);
        conn.async_read = false;
        Ok(Some(Arc::new(MountState { generation: 1 })))
    }

    fn destroy(&self, _req: &Request<'_>, private_data: Option<PrivateData>) {
        self.record(Operation::Destroy);
        let generation = private_data
            .and_then(|data| data.downcast::<MountState>().ok())
            .map(|state| state.generation);
        *self.destroyed_with.lock().unwrap() = Some(generation);
    }
}

// =============================================================================
// Native Harness
// =============================================================================

pub const UID: u32 = 1000;
pub const GID: u32 = 100;
pub const PID: i32 = 4242;

/// A session mounted on the operation table, driven in-process.
pub struct Mount<F: Filesystem + 'static> {
    pub fs: Arc<F>,
    pub handle: SessionHandle,
    pub ops: FuseOperations,
}

impl Mount<MemFs> {
    pub fn mem() -> Self {
        Self::new(MemFs::new(), SessionConfig::new().enable_init(true))
    }
}

fn cstr(s: &str) -> CString {
    CString::new(s).unwrap()
}

unsafe extern "C" fn collect_names(
    buf: *mut c_void,
    name: *const c_char,
    _stbuf: *const libc::stat,
    _off: libc::off_t,
) -> c_int {
    let names = unsafe { &mut *buf.cast::<Vec<String>>() };
    names.push(unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned());
    0
}

unsafe extern "C" fn collect_typed(
    h: *mut c_void,
    name: *const c_char,
    typ: c_int,
    ino: libc::ino_t,
) -> c_int {
    let entries = unsafe { &mut *h.cast::<Vec<(String, c_int, u64)>>() };
    let name = unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned();
    entries.push((name, typ, ino as u64));
    0
}

impl<F: Filesystem + 'static> Mount<F> {
    pub fn new(fs: F, config: SessionConfig) -> Self {
        init_tracing();
        let fs = Arc::new(fs);
        let session = Session::new(fs.clone(), config);
        Self {
            fs,
            handle: SessionHandle::new(session),
            ops: operations(),
        }
    }

    pub fn context(&self) -> FuseContext {
        FuseContext::new(self.handle.user_data(), UID, GID, PID)
    }

    /// Run `f` as one request of this mount.
    pub fn request<R>(&self, f: impl FnOnce(&FuseOperations) -> R) -> R {
        enter_request(&self.context(), || f(&self.ops))
    }

    pub fn init(&self, conn: &mut FuseConnInfo) -> *mut c_void {
        self.request(|ops| unsafe { ops.init.unwrap()(conn) })
    }

    pub fn destroy(&self, private_data: *mut c_void) {
        self.request(|ops| unsafe { ops.destroy.unwrap()(private_data) })
    }

    pub fn getattr(&self, path: &str) -> (c_int, libc::stat) {
        let path = cstr(path);
        let mut st: libc::stat = unsafe { std::mem::zeroed() };
        let rc = self.request(|ops| unsafe { ops.getattr.unwrap()(path.as_ptr(), &mut st) });
        (rc, st)
    }

    pub fn fgetattr(&self, path: &str, fi: &mut FuseFileInfo) -> (c_int, libc::stat) {
        let path = cstr(path);
        let mut st: libc::stat = unsafe { std::mem::zeroed() };
        let rc = self.request(|ops| unsafe { ops.fgetattr.unwrap()(path.as_ptr(), &mut st, fi) });
        (rc, st)
    }

    pub fn statfs(&self, path: &str) -> (c_int, libc::statvfs) {
        let path = cstr(path);
        let mut sv: libc::statvfs = unsafe { std::mem::zeroed() };
        let rc = self.request(|ops| unsafe { ops.statfs.unwrap()(path.as_ptr(), &mut sv) });
        (rc, sv)
    }

    pub fn mkdir(&self, path: &str, mode: u32) -> c_int {
        let path = cstr(path);
        self.request(|ops| unsafe { ops.mkdir.unwrap()(path.as_ptr(), mode as libc::mode_t) })
    }

    pub fn rmdir(&self, path: &str) -> c_int {
        let path = cstr(path);
        self.request(|ops| unsafe { ops.rmdir.unwrap()(path.as_ptr()) })
    }

    pub fn unlink(&self, path: &str) -> c_int {
        let path = cstr(path);
        self.request(|ops| unsafe { ops.unlink.unwrap()(path.as_ptr()) })
    }

    pub fn rename(&self, from: &str, to: &str) -> c_int {
        let (from, to) = (cstr(from), cstr(to));
        self.request(|ops| unsafe { ops.rename.unwrap()(from.as_ptr(), to.as_ptr()) })
    }

    pub fn symlink(&self, target: &str, link: &str) -> c_int {
        let (target, link) = (cstr(target), cstr(link));
        self.request(|ops| unsafe { ops.symlink.unwrap()(target.as_ptr(), link.as_ptr()) })
    }

    pub fn link(&self, target: &str, link: &str) -> c_int {
        let (target, link) = (cstr(target), cstr(link));
        self.request(|ops| unsafe { ops.link.unwrap()(target.as_ptr(), link.as_ptr()) })
    }

    pub fn readlink(&self, path: &str, size: usize) -> (c_int, Vec<u8>) {
        let path = cstr(path);
        let mut buf = vec![0xFFu8; size];
        let rc = self.request(|ops| unsafe {
            ops.readlink.unwrap()(path.as_ptr(), buf.as_mut_ptr().cast(), size)
        });
        (rc, buf)
    }

    pub fn access(&self, path: &str, mask: c_int) -> c_int {
        let path = cstr(path);
        self.request(|ops| unsafe { ops.access.unwrap()(path.as_ptr(), mask) })
    }

    pub fn create(&self, path: &str, mode: u32) -> (c_int, FuseFileInfo) {
        let path = cstr(path);
        let mut fi = FuseFileInfo {
            flags: libc::O_CREAT | libc::O_RDWR,
            ..Default::default()
        };
        let rc = self.request(|ops| unsafe {
            ops.create.unwrap()(path.as_ptr(), mode as libc::mode_t, &mut fi)
        });
        (rc, fi)
    }

    pub fn open(&self, path: &str, flags: c_int) -> (c_int, FuseFileInfo) {
        let path = cstr(path);
        let mut fi = FuseFileInfo {
            flags,
            ..Default::default()
        };
        let rc = self.request(|ops| unsafe { ops.open.unwrap()(path.as_ptr(), &mut fi) });
        (rc, fi)
    }

    pub fn write(&self, path: &str, data: &[u8], offset: i64, fi: &mut FuseFileInfo) -> c_int {
        let path = cstr(path);
        self.request(|ops| unsafe {
            ops.write.unwrap()(path.as_ptr(), data.as_ptr().cast(), data.len(), offset as libc::off_t, fi)
        })
    }

    pub fn read(&self, path: &str, size: usize, offset: i64, fi: &mut FuseFileInfo) -> (c_int, Vec<u8>) {
        let path = cstr(path);
        let mut buf = vec![0u8; size];
        let rc = self.request(|ops| unsafe {
            ops.read.unwrap()(path.as_ptr(), buf.as_mut_ptr().cast(), size, offset as libc::off_t, fi)
        });
        (rc, buf)
    }

    pub fn flush(&self, path: &str, fi: &mut FuseFileInfo) -> c_int {
        let path = cstr(path);
        self.request(|ops| unsafe { ops.flush.unwrap()(path.as_ptr(), fi) })
    }

    pub fn release(&self, path: &str, fi: &mut FuseFileInfo) -> c_int {
        let path = cstr(path);
        self.request(|ops| unsafe { ops.release.unwrap()(path.as_ptr(), fi) })
    }

    pub fn truncate(&self, path: &str, size: i64) -> c_int {
        let path = cstr(path);
        self.request(|ops| unsafe { ops.truncate.unwrap()(path.as_ptr(), size as libc::off_t) })
    }

    pub fn utimens(&self, path: &str, times: &[libc::timespec; 2]) -> c_int {
        let path = cstr(path);
        self.request(|ops| unsafe { ops.utimens.unwrap()(path.as_ptr(), times.as_ptr()) })
    }

    pub fn setxattr(&self, path: &str, name: &str, value: &[u8], flags: c_int) -> c_int {
        let (path, name) = (cstr(path), cstr(name));
        self.request(|ops| unsafe {
            #[cfg(target_os = "macos")]
            {
                ops.setxattr.unwrap()(path.as_ptr(), name.as_ptr(), value.as_ptr().cast(), value.len(), flags, 0)
            }
            #[cfg(not(target_os = "macos"))]
            {
                ops.setxattr.unwrap()(path.as_ptr(), name.as_ptr(), value.as_ptr().cast(), value.len(), flags)
            }
        })
    }

    pub fn getxattr(&self, path: &str, name: &str, size: usize) -> (c_int, Vec<u8>) {
        let (path, name) = (cstr(path), cstr(name));
        let mut buf = vec![0u8; size];
        let ptr = if size == 0 { std::ptr::null_mut() } else { buf.as_mut_ptr().cast() };
        let rc = self.request(|ops| unsafe {
            #[cfg(target_os = "macos")]
            {
                ops.getxattr.unwrap()(path.as_ptr(), name.as_ptr(), ptr, size, 0)
            }
            #[cfg(not(target_os = "macos"))]
            {
                ops.getxattr.unwrap()(path.as_ptr(), name.as_ptr(), ptr, size)
            }
        });
        (rc, buf)
    }

    pub fn listxattr(&self, path: &str, size: usize) -> (c_int, Vec<u8>) {
        let path = cstr(path);
        let mut buf = vec![0u8; size];
        let ptr = if size == 0 { std::ptr::null_mut() } else { buf.as_mut_ptr().cast() };
        let rc = self.request(|ops| unsafe { ops.listxattr.unwrap()(path.as_ptr(), ptr, size) });
        (rc, buf)
    }

    pub fn removexattr(&self, path: &str, name: &str) -> c_int {
        let (path, name) = (cstr(path), cstr(name));
        self.request(|ops| unsafe { ops.removexattr.unwrap()(path.as_ptr(), name.as_ptr()) })
    }

    pub fn mknod(&self, path: &str, mode: u32) -> c_int {
        let path = cstr(path);
        self.request(|ops| unsafe { ops.mknod.unwrap()(path.as_ptr(), mode as libc::mode_t, 0) })
    }

    pub fn chmod(&self, path: &str, mode: u32) -> c_int {
        let path = cstr(path);
        self.request(|ops| unsafe { ops.chmod.unwrap()(path.as_ptr(), mode as libc::mode_t) })
    }

    pub fn ftruncate(&self, path: &str, size: i64, fi: &mut FuseFileInfo) -> c_int {
        let path = cstr(path);
        self.request(|ops| unsafe { ops.ftruncate.unwrap()(path.as_ptr(), size as libc::off_t, fi) })
    }

    pub fn fsync(&self, path: &str, datasync: bool, fi: &mut FuseFileInfo) -> c_int {
        let path = cstr(path);
        self.request(|ops| unsafe { ops.fsync.unwrap()(path.as_ptr(), c_int::from(datasync), fi) })
    }

    pub fn lock(&self, path: &str, fi: &mut FuseFileInfo, cmd: c_int, lock: &mut libc::flock) -> c_int {
        let path = cstr(path);
        self.request(|ops| unsafe { ops.lock.unwrap()(path.as_ptr(), fi, cmd, lock) })
    }

    pub fn bmap(&self, path: &str, blocksize: usize, index: &mut u64) -> c_int {
        let path = cstr(path);
        self.request(|ops| unsafe { ops.bmap.unwrap()(path.as_ptr(), blocksize, index) })
    }

    pub fn readdir(&self, path: &str) -> (c_int, Vec<String>) {
        let path = cstr(path);
        let mut names: Vec<String> = Vec::new();
        let buf = (&mut names as *mut Vec<String>).cast::<c_void>();
        let rc = self.request(|ops| unsafe {
            ops.readdir.unwrap()(path.as_ptr(), buf, Some(collect_names), 0, std::ptr::null_mut())
        });
        (rc, names)
    }

    pub fn getdir(&self, path: &str) -> (c_int, Vec<(String, c_int, u64)>) {
        let path = cstr(path);
        let mut entries: Vec<(String, c_int, u64)> = Vec::new();
        let h = (&mut entries as *mut Vec<(String, c_int, u64)>).cast::<c_void>();
        let rc = self.request(|ops| unsafe { ops.getdir.unwrap()(path.as_ptr(), h, Some(collect_typed)) });
        (rc, entries)
    }
}
