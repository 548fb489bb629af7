//! Symbolic names for native constants.
//!
//! Providers receive raw flag words (`open` flags, xattr flags, mode bits)
//! and raw errno values. [`native_value`] maps the C name of such a constant
//! to its value on the running platform.
//!
//! ```rust
//! use anyfs_fuse::native_value;
//!
//! assert_eq!(native_value("O_RDONLY"), Ok(0));
//! assert!(native_value("O_NOT_A_FLAG").is_err());
//! ```

use thiserror::Error;

/// The requested constant is unknown on this platform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no such constant: {name}")]
pub struct NoSuchConstant {
    /// The name that was looked up.
    pub name: String,
}

macro_rules! constant_table {
    ($($(#[$attr:meta])* $name:ident => $value:expr,)*) => {
        /// Look up a native constant by its C name.
        ///
        /// Covers open flags (`O_*`), xattr flags (`XATTR_*`), stat mode bits
        /// (`S_I*`) and errno names (`E*`).
        ///
        /// # Errors
        ///
        /// [`NoSuchConstant`] if `name` is not known on this platform.
        pub fn native_value(name: &str) -> Result<i32, NoSuchConstant> {
            $(
                $(#[$attr])*
                if name == stringify!($name) {
                    return Ok($value as i32);
                }
            )*
            Err(NoSuchConstant { name: name.to_owned() })
        }
    };
}

constant_table! {
    O_RDONLY => libc::O_RDONLY,
    O_WRONLY => libc::O_WRONLY,
    O_RDWR => libc::O_RDWR,
    O_ACCMODE => libc::O_ACCMODE,
    O_CREAT => libc::O_CREAT,
    O_EXCL => libc::O_EXCL,
    O_NOCTTY => libc::O_NOCTTY,
    O_TRUNC => libc::O_TRUNC,
    O_APPEND => libc::O_APPEND,
    O_NONBLOCK => libc::O_NONBLOCK,
    O_SYNC => libc::O_SYNC,
    O_NOFOLLOW => libc::O_NOFOLLOW,
    O_DIRECTORY => libc::O_DIRECTORY,
    #[cfg(target_os = "macos")]
    O_SHLOCK => libc::O_SHLOCK,
    #[cfg(target_os = "macos")]
    O_EXLOCK => libc::O_EXLOCK,
    #[cfg(target_os = "macos")]
    O_SYMLINK => libc::O_SYMLINK,

    XATTR_CREATE => libc::XATTR_CREATE,
    XATTR_REPLACE => libc::XATTR_REPLACE,
    #[cfg(target_os = "macos")]
    XATTR_NOFOLLOW => libc::XATTR_NOFOLLOW,

    S_IFMT => libc::S_IFMT,
    S_IFIFO => libc::S_IFIFO,
    S_IFCHR => libc::S_IFCHR,
    S_IFDIR => libc::S_IFDIR,
    S_IFBLK => libc::S_IFBLK,
    S_IFREG => libc::S_IFREG,
    S_IFLNK => libc::S_IFLNK,
    S_IFSOCK => libc::S_IFSOCK,
    S_ISUID => libc::S_ISUID,
    S_ISGID => libc::S_ISGID,
    S_ISVTX => libc::S_ISVTX,
    S_IRWXU => libc::S_IRWXU,
    S_IRUSR => libc::S_IRUSR,
    S_IWUSR => libc::S_IWUSR,
    S_IXUSR => libc::S_IXUSR,
    S_IRWXG => libc::S_IRWXG,
    S_IRGRP => libc::S_IRGRP,
    S_IWGRP => libc::S_IWGRP,
    S_IXGRP => libc::S_IXGRP,
    S_IRWXO => libc::S_IRWXO,
    S_IROTH => libc::S_IROTH,
    S_IWOTH => libc::S_IWOTH,
    S_IXOTH => libc::S_IXOTH,

    EPERM => libc::EPERM,
    ENOENT => libc::ENOENT,
    EIO => libc::EIO,
    EBADF => libc::EBADF,
    EAGAIN => libc::EAGAIN,
    EACCES => libc::EACCES,
    EBUSY => libc::EBUSY,
    EEXIST => libc::EEXIST,
    EXDEV => libc::EXDEV,
    ENOTDIR => libc::ENOTDIR,
    EISDIR => libc::EISDIR,
    EINVAL => libc::EINVAL,
    EFBIG => libc::EFBIG,
    ENOSPC => libc::ENOSPC,
    EROFS => libc::EROFS,
    EMLINK => libc::EMLINK,
    ERANGE => libc::ERANGE,
    ENAMETOOLONG => libc::ENAMETOOLONG,
    ENOSYS => libc::ENOSYS,
    ENOTEMPTY => libc::ENOTEMPTY,
    ELOOP => libc::ELOOP,
    ENOTSUP => libc::ENOTSUP,
    #[cfg(target_os = "macos")]
    ENOATTR => libc::ENOATTR,
    #[cfg(not(target_os = "macos"))]
    ENODATA => libc::ENODATA,
}
