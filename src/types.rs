//! Boundary-side values for the native FUSE structures.
//!
//! Each type here is an owned, safe copy of one native structure. The
//! marshaller fills them from native memory before a provider call and, for
//! output-bearing arguments, copies them back afterwards. Providers never
//! see native pointers.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A point in time with nanosecond precision (`struct timespec`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timespec {
    /// Seconds since the Unix epoch.
    pub sec: i64,
    /// Nanoseconds within the second.
    pub nsec: i64,
}

impl Timespec {
    /// `tv_nsec` value asking for the current time (`utimensat` semantics).
    pub const UTIME_NOW: i64 = libc::UTIME_NOW as i64;
    /// `tv_nsec` value asking to leave the timestamp unchanged.
    pub const UTIME_OMIT: i64 = libc::UTIME_OMIT as i64;

    /// Create a timestamp from seconds and nanoseconds.
    #[inline]
    pub const fn new(sec: i64, nsec: i64) -> Self {
        Self { sec, nsec }
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Self::from(SystemTime::now())
    }

    /// Returns `true` if this value asks for the current time.
    #[inline]
    pub const fn is_now(&self) -> bool {
        self.nsec == Self::UTIME_NOW
    }

    /// Returns `true` if this value asks to leave the timestamp unchanged.
    #[inline]
    pub const fn is_omit(&self) -> bool {
        self.nsec == Self::UTIME_OMIT
    }
}

impl From<SystemTime> for Timespec {
    fn from(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(d) => Self::new(d.as_secs() as i64, i64::from(d.subsec_nanos())),
            Err(before) => {
                let d = before.duration();
                if d.subsec_nanos() == 0 {
                    Self::new(-(d.as_secs() as i64), 0)
                } else {
                    Self::new(
                        -(d.as_secs() as i64) - 1,
                        1_000_000_000 - i64::from(d.subsec_nanos()),
                    )
                }
            }
        }
    }
}

impl From<Timespec> for SystemTime {
    fn from(ts: Timespec) -> Self {
        let nanos = Duration::from_nanos(ts.nsec.clamp(0, 999_999_999) as u64);
        if ts.sec >= 0 {
            UNIX_EPOCH + Duration::from_secs(ts.sec as u64) + nanos
        } else {
            UNIX_EPOCH - Duration::from_secs(ts.sec.unsigned_abs()) + nanos
        }
    }
}

/// Type of a filesystem entry, decoded from the `S_IFMT` bits of a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FileType {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Character device.
    CharDevice,
    /// Block device.
    BlockDevice,
    /// Named pipe.
    Fifo,
    /// Unix domain socket.
    Socket,
}

impl FileType {
    /// Decode the file type from a full mode word.
    pub fn from_mode(mode: u32) -> Option<Self> {
        match mode & libc::S_IFMT as u32 {
            m if m == libc::S_IFREG as u32 => Some(FileType::File),
            m if m == libc::S_IFDIR as u32 => Some(FileType::Directory),
            m if m == libc::S_IFLNK as u32 => Some(FileType::Symlink),
            m if m == libc::S_IFCHR as u32 => Some(FileType::CharDevice),
            m if m == libc::S_IFBLK as u32 => Some(FileType::BlockDevice),
            m if m == libc::S_IFIFO as u32 => Some(FileType::Fifo),
            m if m == libc::S_IFSOCK as u32 => Some(FileType::Socket),
            _ => None,
        }
    }

    /// The `S_IFMT` bits for this type.
    pub fn mode_bits(self) -> u32 {
        (match self {
            FileType::File => libc::S_IFREG,
            FileType::Directory => libc::S_IFDIR,
            FileType::Symlink => libc::S_IFLNK,
            FileType::CharDevice => libc::S_IFCHR,
            FileType::BlockDevice => libc::S_IFBLK,
            FileType::Fifo => libc::S_IFIFO,
            FileType::Socket => libc::S_IFSOCK,
        }) as u32
    }
}

/// File status record (`struct stat`).
///
/// `birthtime` and `flags` only reach native memory on platforms whose
/// `struct stat` carries them (macOS).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stat {
    /// Device containing the entry.
    pub dev: u64,
    /// Inode number.
    pub ino: u64,
    /// File type and permission bits.
    pub mode: u32,
    /// Number of hard links.
    pub nlink: u64,
    /// Owner user id.
    pub uid: u32,
    /// Owner group id.
    pub gid: u32,
    /// Device id for special files.
    pub rdev: u64,
    /// Size in bytes.
    pub size: i64,
    /// Preferred I/O block size.
    pub blksize: i64,
    /// Number of 512-byte blocks allocated.
    pub blocks: i64,
    /// Last access time.
    pub atime: Timespec,
    /// Last modification time.
    pub mtime: Timespec,
    /// Last status change time.
    pub ctime: Timespec,
    /// Creation time.
    pub birthtime: Timespec,
    /// User-settable flags (`chflags`).
    pub flags: u32,
}

impl Stat {
    /// The entry type encoded in [`mode`](Self::mode).
    #[inline]
    pub fn file_type(&self) -> Option<FileType> {
        FileType::from_mode(self.mode)
    }

    /// Permission bits only (`mode & 0o7777`).
    #[inline]
    pub fn permissions(&self) -> u32 {
        self.mode & 0o7777
    }

    /// Returns `true` if this is a directory.
    #[inline]
    pub fn is_dir(&self) -> bool {
        self.file_type() == Some(FileType::Directory)
    }
}

/// Filesystem statistics (`struct statvfs`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatVfs {
    /// Filesystem block size.
    pub bsize: u64,
    /// Fundamental block size.
    pub frsize: u64,
    /// Total blocks, in units of `frsize`.
    pub blocks: u64,
    /// Free blocks.
    pub bfree: u64,
    /// Blocks available to unprivileged users.
    pub bavail: u64,
    /// Total inodes.
    pub files: u64,
    /// Free inodes.
    pub ffree: u64,
    /// Inodes available to unprivileged users.
    pub favail: u64,
    /// Filesystem id.
    pub fsid: u64,
    /// Mount flags.
    pub flag: u64,
    /// Maximum filename length.
    pub namemax: u64,
}

/// Open-file descriptor (`struct fuse_file_info`).
///
/// Providers assign [`fh`](Self::fh) in `open`, `create` and `opendir`; the
/// same value is handed back on every later call for that open file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileInfo {
    /// Open flags as passed to `open(2)`.
    pub flags: i32,
    /// Legacy handle field.
    pub fh_old: u64,
    /// Set when a write comes from the page cache.
    pub writepage: i32,
    /// Bypass the page cache for this file.
    pub direct_io: bool,
    /// Keep cached data across opens.
    pub keep_cache: bool,
    /// Set on `flush` triggered by `close`.
    pub flush: bool,
    /// The file is not seekable.
    pub nonseekable: bool,
    /// Provider-assigned handle.
    pub fh: u64,
    /// Lock owner id.
    pub lock_owner: u64,
}

impl FileInfo {
    /// Decode [`flags`](Self::flags) into an [`OpenFlags`].
    #[inline]
    pub fn open_flags(&self) -> OpenFlags {
        OpenFlags::from_raw(self.flags)
    }
}

/// Decoded open flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpenFlags {
    /// Open for reading.
    pub read: bool,
    /// Open for writing.
    pub write: bool,
    /// Create file if it doesn't exist.
    pub create: bool,
    /// Fail if the file exists (with `create`).
    pub exclusive: bool,
    /// Truncate file to zero length.
    pub truncate: bool,
    /// Append to end of file.
    pub append: bool,
}

impl OpenFlags {
    /// Decode a raw `open(2)` flag word.
    pub fn from_raw(flags: i32) -> Self {
        let access = flags & libc::O_ACCMODE;
        Self {
            read: access == libc::O_RDONLY || access == libc::O_RDWR,
            write: access == libc::O_WRONLY || access == libc::O_RDWR,
            create: flags & libc::O_CREAT != 0,
            exclusive: flags & libc::O_EXCL != 0,
            truncate: flags & libc::O_TRUNC != 0,
            append: flags & libc::O_APPEND != 0,
        }
    }
}

/// Type of file lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LockType {
    /// Shared lock (`F_RDLCK`) - multiple readers allowed.
    Shared,
    /// Exclusive lock (`F_WRLCK`) - single writer only.
    Exclusive,
    /// Release (`F_UNLCK`).
    Unlock,
}

/// Lock command passed to the `lock` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LockCommand {
    /// `F_GETLK`: test for a conflicting lock.
    Get,
    /// `F_SETLK`: acquire or release without waiting.
    Set,
    /// `F_SETLKW`: acquire, waiting if needed.
    SetWait,
}

impl LockCommand {
    /// Decode a raw `fcntl` lock command.
    pub fn from_raw(cmd: i32) -> Option<Self> {
        match cmd {
            libc::F_GETLK => Some(LockCommand::Get),
            libc::F_SETLK => Some(LockCommand::Set),
            libc::F_SETLKW => Some(LockCommand::SetWait),
            _ => None,
        }
    }
}

/// POSIX lock record (`struct flock`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flock {
    /// Raw lock type (`F_RDLCK`, `F_WRLCK`, `F_UNLCK`).
    pub kind: i16,
    /// How `start` is interpreted (`SEEK_SET`, ...).
    pub whence: i16,
    /// Start offset of the locked range.
    pub start: i64,
    /// Length of the range; 0 means to end of file.
    pub len: i64,
    /// Process holding the lock.
    pub pid: i32,
}

impl Flock {
    /// Decoded lock type.
    pub fn lock_type(&self) -> Option<LockType> {
        match i32::from(self.kind) {
            k if k == libc::F_RDLCK as i32 => Some(LockType::Shared),
            k if k == libc::F_WRLCK as i32 => Some(LockType::Exclusive),
            k if k == libc::F_UNLCK as i32 => Some(LockType::Unlock),
            _ => None,
        }
    }

    /// Set the raw lock type from a [`LockType`].
    pub fn set_lock_type(&mut self, lock: LockType) {
        self.kind = match lock {
            LockType::Shared => libc::F_RDLCK,
            LockType::Exclusive => libc::F_WRLCK,
            LockType::Unlock => libc::F_UNLCK,
        } as i16;
    }
}

/// Legacy second-precision timestamp pair (`struct utimbuf`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Utimbuf {
    /// Access time, seconds since the epoch.
    pub actime: i64,
    /// Modification time, seconds since the epoch.
    pub modtime: i64,
}

/// Connection parameters negotiated in `init` (`struct fuse_conn_info`).
///
/// `async_read`, `max_write` and `max_readahead` may be lowered by the
/// provider; the protocol version is informational.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnInfo {
    /// Kernel protocol major version.
    pub proto_major: u32,
    /// Kernel protocol minor version.
    pub proto_minor: u32,
    /// Asynchronous reads are enabled.
    pub async_read: bool,
    /// Maximum size of a write request.
    pub max_write: u32,
    /// Maximum readahead.
    pub max_readahead: u32,
}

bitflags::bitflags! {
    /// Flags passed to `setxattr`.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct XattrFlags: i32 {
        /// Fail if the attribute already exists.
        const CREATE = libc::XATTR_CREATE;
        /// Fail if the attribute does not exist.
        const REPLACE = libc::XATTR_REPLACE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_type_round_trips_through_mode() {
        for ty in [
            FileType::File,
            FileType::Directory,
            FileType::Symlink,
            FileType::CharDevice,
            FileType::BlockDevice,
            FileType::Fifo,
            FileType::Socket,
        ] {
            assert_eq!(FileType::from_mode(ty.mode_bits() | 0o644), Some(ty));
        }
        assert_eq!(FileType::from_mode(0o644), None);
    }

    #[test]
    fn stat_permissions_masks_type_bits() {
        let st = Stat {
            mode: libc::S_IFDIR as u32 | 0o755,
            ..Default::default()
        };
        assert!(st.is_dir());
        assert_eq!(st.permissions(), 0o755);
    }

    #[test]
    fn open_flags_decodes_access_mode() {
        let ro = OpenFlags::from_raw(libc::O_RDONLY);
        assert!(ro.read && !ro.write);

        let wo = OpenFlags::from_raw(libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC);
        assert!(!wo.read && wo.write && wo.create && wo.truncate);

        let rw = OpenFlags::from_raw(libc::O_RDWR | libc::O_APPEND | libc::O_EXCL);
        assert!(rw.read && rw.write && rw.append && rw.exclusive);
    }

    #[test]
    fn flock_lock_type_round_trip() {
        let mut fl = Flock::default();
        for lock in [LockType::Shared, LockType::Exclusive, LockType::Unlock] {
            fl.set_lock_type(lock);
            assert_eq!(fl.lock_type(), Some(lock));
        }
        fl.kind = 99;
        assert_eq!(fl.lock_type(), None);
    }

    #[test]
    fn lock_command_from_raw() {
        assert_eq!(LockCommand::from_raw(libc::F_GETLK), Some(LockCommand::Get));
        assert_eq!(LockCommand::from_raw(libc::F_SETLKW), Some(LockCommand::SetWait));
        assert_eq!(LockCommand::from_raw(-1), None);
    }

    #[test]
    fn timespec_system_time_conversion() {
        let t = UNIX_EPOCH + Duration::new(1_700_000_000, 123);
        let ts = Timespec::from(t);
        assert_eq!(ts, Timespec::new(1_700_000_000, 123));
        assert_eq!(SystemTime::from(ts), t);
    }

    #[test]
    fn timespec_before_epoch_is_normalized() {
        let t = UNIX_EPOCH - Duration::new(1, 250_000_000);
        let ts = Timespec::from(t);
        assert_eq!(ts, Timespec::new(-2, 750_000_000));
        assert_eq!(SystemTime::from(ts), t);
    }

    #[test]
    fn timespec_special_values() {
        assert!(Timespec::new(0, Timespec::UTIME_NOW).is_now());
        assert!(Timespec::new(0, Timespec::UTIME_OMIT).is_omit());
        assert!(!Timespec::new(0, 0).is_now());
    }

    #[test]
    fn xattr_flags_keep_unknown_bits() {
        let flags = XattrFlags::from_bits_retain(libc::XATTR_CREATE | 0x100);
        assert!(flags.contains(XattrFlags::CREATE));
        assert!(!flags.contains(XattrFlags::REPLACE));
        assert_eq!(flags.bits() & 0x100, 0x100);
    }

    #[test]
    fn types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Stat>();
        assert_send_sync::<StatVfs>();
        assert_send_sync::<FileInfo>();
        assert_send_sync::<Flock>();
        assert_send_sync::<Timespec>();
        assert_send_sync::<ConnInfo>();
    }
}
