//! The dispatcher module defines the interface between the NFS protocol
//! engine and the underlying file system implementation.
//!
//! This module provides:
//! - The core [NfsDispatcher] trait that must be implemented to expose a
//!   file system through the engine
//! - POSIX-shaped attribute snapshots ([FileStat], [StatFs]) that
//!   implementations return and the engine converts to NFS attributes
//! - Result envelopes for mutating operations that carry the directory
//!   attributes sampled around the mutation, enabling weak cache
//!   consistency data in replies
//! - The [VfsError] type classifying failures into POSIX errno, timeout,
//!   and opaque errors
//!
//! The dispatcher is stateless from the engine's point of view: objects are
//! identified by 64-bit inode numbers carried in opaque file handles, and a
//! single dispatcher instance is shared by all in-flight requests, so
//! implementations must be safe for concurrent invocation.
//!
//! Other requirements
//! ------------------
//!  getattr needs to be fast. NFS uses that a lot.
//!
//!  The 0 inode number is reserved and should not be used.

use async_trait::async_trait;
use thiserror::Error;

use crate::protocol::xdr::nfs3;

// POSIX file type and permission bits, as found in `stat.st_mode`. The
// dispatcher speaks POSIX modes; the engine translates them to NFS file
// types and permission bits.
/// Bit mask for extracting the file type from a mode
pub const S_IFMT: u32 = 0o170000;
/// Regular file
pub const S_IFREG: u32 = 0o100000;
/// Directory
pub const S_IFDIR: u32 = 0o040000;
/// Symbolic link
pub const S_IFLNK: u32 = 0o120000;
/// Character device
pub const S_IFCHR: u32 = 0o020000;
/// Block device
pub const S_IFBLK: u32 = 0o060000;
/// FIFO
pub const S_IFIFO: u32 = 0o010000;
/// Socket
pub const S_IFSOCK: u32 = 0o140000;
/// Execute permission for the owner
pub const S_IXUSR: u32 = 0o100;

/// A POSIX timestamp with nanosecond resolution.
///
/// Values are expected to be non-negative; the engine narrows them to the
/// unsigned 32-bit fields of the NFS wire format.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TimeSpec {
    /// Seconds since the Unix epoch
    pub sec: i64,
    /// Nanoseconds (0-999999999)
    pub nsec: i64,
}

/// A POSIX `stat`-shaped attribute snapshot for one file system object.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FileStat {
    /// File type and permission bits (`S_IF*` plus mode bits)
    pub mode: u32,
    /// Number of hard links
    pub nlink: u32,
    /// Owner user ID
    pub uid: u32,
    /// Owner group ID
    pub gid: u32,
    /// Size in bytes
    pub size: u64,
    /// Allocated storage in 512-byte units
    pub blocks: u64,
    /// Device the object lives on
    pub dev: u64,
    /// Inode number
    pub ino: u64,
    /// Time of last access
    pub atime: TimeSpec,
    /// Time of last data modification
    pub mtime: TimeSpec,
    /// Time of last status change
    pub ctime: TimeSpec,
}

/// A POSIX `statfs`-shaped snapshot of file system wide counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StatFs {
    /// Total data blocks in the file system
    pub blocks: u64,
    /// Fundamental block size in bytes
    pub bsize: u64,
    /// Free blocks
    pub bfree: u64,
    /// Free blocks available to unprivileged users
    pub bavail: u64,
    /// Total file slots
    pub files: u64,
    /// Free file slots
    pub ffree: u64,
}

/// Result of a [NfsDispatcher::write] call.
///
/// The directory-style pre/post stats are optional: an implementation that
/// cannot sample them cheaply may leave them out, and the reply will carry
/// an empty weak cache consistency side for the missing sample.
#[derive(Debug, Default)]
pub struct WriteRes {
    /// Number of bytes actually written
    pub written: u64,
    /// Attributes of the file sampled just before the write
    pub pre_stat: Option<FileStat>,
    /// Attributes of the file sampled just after the write
    pub post_stat: Option<FileStat>,
}

/// Result of a [NfsDispatcher::create] call.
#[derive(Debug, Default)]
pub struct CreateRes {
    /// Inode number of the newly created file
    pub ino: nfs3::fileid3,
    /// Attributes of the newly created file
    pub stat: FileStat,
    /// Attributes of the parent directory sampled before the creation
    pub pre_dir_stat: Option<FileStat>,
    /// Attributes of the parent directory sampled after the creation
    pub post_dir_stat: Option<FileStat>,
}

/// Result of a [NfsDispatcher::mkdir] call. Same shape as [CreateRes].
#[derive(Debug, Default)]
pub struct MkdirRes {
    /// Inode number of the newly created directory
    pub ino: nfs3::fileid3,
    /// Attributes of the newly created directory
    pub stat: FileStat,
    /// Attributes of the parent directory sampled before the creation
    pub pre_dir_stat: Option<FileStat>,
    /// Attributes of the parent directory sampled after the creation
    pub post_dir_stat: Option<FileStat>,
}

/// Failure of a dispatcher operation.
///
/// The engine maps these onto `nfsstat3` codes: errnos through the POSIX
/// translation table, timeouts to NFS3ERR_JUKEBOX (retry later), and
/// everything else to NFS3ERR_SERVERFAULT.
#[derive(Debug, Error)]
pub enum VfsError {
    /// The operation failed with a POSIX errno
    #[error("errno {0}")]
    Errno(i32),
    /// The operation did not complete within its deadline
    #[error("filesystem operation timed out")]
    Timeout,
    /// Any other failure
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VfsError {
    /// Returns the embedded errno, if this error carries one.
    pub fn errno(&self) -> Option<i32> {
        match self {
            VfsError::Errno(errno) => Some(*errno),
            _ => None,
        }
    }

    /// Tests whether this error carries the given errno.
    pub fn is_errno(&self, errno: i32) -> bool {
        self.errno() == Some(errno)
    }
}

impl From<std::io::Error> for VfsError {
    fn from(err: std::io::Error) -> VfsError {
        match err.raw_os_error() {
            Some(errno) => VfsError::Errno(errno),
            None => VfsError::Other(err.into()),
        }
    }
}

pub type VfsResult<T> = Result<T, VfsError>;

/// Per-request context handed to every dispatcher call.
///
/// Carries a static cause-detail string naming the procedure that initiated
/// the call, for tracing inside dispatcher implementations. Credentials
/// from the RPC layer will be threaded through here once per-request
/// identities are introduced.
#[derive(Copy, Clone, Debug)]
pub struct RequestContext {
    cause: &'static str,
}

impl RequestContext {
    /// Builds a context labeled with the originating procedure name.
    pub fn with_cause(cause: &'static str) -> RequestContext {
        RequestContext { cause }
    }

    /// The procedure name this request originated from.
    pub fn cause(&self) -> &'static str {
        self.cause
    }
}

/// The basic API to implement to expose a file system through the engine.
///
/// Opaque FH
/// ---------
/// Files are uniquely identified by a 64-bit inode number. The engine wraps
/// it into the opaque NFS file handle and never interprets it otherwise;
/// every operation below receives the inode number extracted from the
/// caller's handle.
///
/// Weak cache consistency
/// ----------------------
/// Mutating operations return optional before/after attribute samples of
/// the affected directory (or file, for write). Implementations should
/// sample them atomically with the mutation when they can; the engine
/// degrades missing samples to the "no attributes" wire form.
#[async_trait]
pub trait NfsDispatcher: Send + Sync {
    /// Returns the attributes of a file or directory.
    async fn getattr(&self, ino: nfs3::fileid3, ctx: &RequestContext) -> VfsResult<FileStat>;

    /// Returns the inode number of the parent directory of `ino`.
    ///
    /// Used to resolve ".." lookups. The parent of the root directory is
    /// the root directory itself.
    async fn get_parent(&self, ino: nfs3::fileid3, ctx: &RequestContext)
        -> VfsResult<nfs3::fileid3>;

    /// Looks up `name` within the directory `dir`.
    ///
    /// Returns the inode number and attributes of the child. The engine
    /// resolves "." and ".." itself; implementations only see real names.
    async fn lookup(
        &self,
        dir: nfs3::fileid3,
        name: &nfs3::filename3,
        ctx: &RequestContext,
    ) -> VfsResult<(nfs3::fileid3, FileStat)>;

    /// Reads the target of the symbolic link `ino`.
    async fn readlink(&self, ino: nfs3::fileid3, ctx: &RequestContext)
        -> VfsResult<nfs3::nfspath3>;

    /// Writes `data` into the file `ino` starting at `offset`.
    ///
    /// Returns the number of bytes written together with the optional
    /// before/after attribute samples of the file.
    async fn write(
        &self,
        ino: nfs3::fileid3,
        data: Vec<u8>,
        offset: u64,
        ctx: &RequestContext,
    ) -> VfsResult<WriteRes>;

    /// Creates the regular file `name` in the directory `dir` with the
    /// given POSIX mode.
    async fn create(
        &self,
        dir: nfs3::fileid3,
        name: &nfs3::filename3,
        mode: u32,
        ctx: &RequestContext,
    ) -> VfsResult<CreateRes>;

    /// Creates the directory `name` in the directory `dir` with the given
    /// POSIX mode.
    async fn mkdir(
        &self,
        dir: nfs3::fileid3,
        name: &nfs3::filename3,
        mode: u32,
        ctx: &RequestContext,
    ) -> VfsResult<MkdirRes>;

    /// Returns file system wide counters for the file system containing
    /// `ino`.
    async fn statfs(&self, ino: nfs3::fileid3, ctx: &RequestContext) -> VfsResult<StatFs>;
}
