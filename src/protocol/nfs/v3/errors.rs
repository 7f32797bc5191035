//! Mapping from dispatcher failures to NFS version 3 status codes.

use crate::dispatcher::VfsError;
use crate::protocol::xdr::nfs3::nfsstat3;

/// Convert a dispatcher failure to the appropriate NFS error value.
///
/// Errnos translate through the table below; anything the table does not
/// know (ENFILE included) is a server fault. Timeouts and the transient
/// resource errnos map to NFS3ERR_JUKEBOX so clients retry later instead
/// of surfacing a hard failure.
pub fn nfsstat3_from_error(err: &VfsError) -> nfsstat3 {
    match err {
        VfsError::Errno(errno) => match *errno {
            libc::EPERM => nfsstat3::NFS3ERR_PERM,
            libc::ENOENT => nfsstat3::NFS3ERR_NOENT,
            libc::EIO | libc::ETXTBSY => nfsstat3::NFS3ERR_IO,
            libc::ENXIO => nfsstat3::NFS3ERR_NXIO,
            libc::EACCES => nfsstat3::NFS3ERR_ACCES,
            libc::EEXIST => nfsstat3::NFS3ERR_EXIST,
            libc::EXDEV => nfsstat3::NFS3ERR_XDEV,
            libc::ENODEV => nfsstat3::NFS3ERR_NODEV,
            libc::ENOTDIR => nfsstat3::NFS3ERR_NOTDIR,
            libc::EISDIR => nfsstat3::NFS3ERR_ISDIR,
            libc::EINVAL => nfsstat3::NFS3ERR_INVAL,
            libc::EFBIG => nfsstat3::NFS3ERR_FBIG,
            libc::EROFS => nfsstat3::NFS3ERR_ROFS,
            libc::EMLINK => nfsstat3::NFS3ERR_MLINK,
            libc::ENAMETOOLONG => nfsstat3::NFS3ERR_NAMETOOLONG,
            libc::ENOTEMPTY => nfsstat3::NFS3ERR_NOTEMPTY,
            libc::EDQUOT => nfsstat3::NFS3ERR_DQUOT,
            libc::ESTALE => nfsstat3::NFS3ERR_STALE,
            libc::ETIMEDOUT | libc::EAGAIN | libc::ENOMEM => nfsstat3::NFS3ERR_JUKEBOX,
            libc::ENOTSUP => nfsstat3::NFS3ERR_NOTSUPP,
            _ => nfsstat3::NFS3ERR_SERVERFAULT,
        },
        VfsError::Timeout => nfsstat3::NFS3ERR_JUKEBOX,
        VfsError::Other(_) => nfsstat3::NFS3ERR_SERVERFAULT,
    }
}
