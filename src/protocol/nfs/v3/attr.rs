//! Conversions from the dispatcher's POSIX attribute snapshots to the NFS
//! version 3 wire attribute structures.
//!
//! The dispatcher speaks `stat`: POSIX modes, 512-byte block counts and
//! signed timespecs. Replies speak `fattr3` and the weak cache consistency
//! structures. Everything that bridges the two lives here so the per
//! procedure handlers only assemble result unions.

use crate::dispatcher::{
    FileStat, TimeSpec, VfsError, S_IFBLK, S_IFCHR, S_IFDIR, S_IFIFO, S_IFLNK, S_IFMT, S_IFREG,
    S_IFSOCK, S_IXUSR,
};
use crate::protocol::xdr::nfs3;

/// Convert the POSIX mode to the NFS file type.
///
/// The dispatcher owns the mode bits, so a mode without any known file
/// type bits is a contract violation on its side.
pub fn mode_to_ftype3(mode: u32) -> nfs3::ftype3 {
    match mode & S_IFMT {
        S_IFREG => nfs3::ftype3::NF3REG,
        S_IFDIR => nfs3::ftype3::NF3DIR,
        S_IFBLK => nfs3::ftype3::NF3BLK,
        S_IFCHR => nfs3::ftype3::NF3CHR,
        S_IFLNK => nfs3::ftype3::NF3LNK,
        S_IFSOCK => nfs3::ftype3::NF3SOCK,
        other => {
            debug_assert!(other == S_IFIFO, "unknown file type bits in mode {:o}", mode);
            nfs3::ftype3::NF3FIFO
        }
    }
}

/// Convert the POSIX mode to the NFS mode bits.
///
/// TODO: the owner is always granted read and write, the group read, and
/// others nothing; translate the real owner/group/other bits once the
/// dispatcher reports per-user permissions.
pub fn mode_to_nfs_mode(mode: u32) -> nfs3::mode3 {
    nfs3::MODE_READ_OWNER
        | nfs3::MODE_WRITE_OWNER
        | nfs3::MODE_READ_GROUP
        | if mode & S_IXUSR != 0 { nfs3::MODE_EXEC_OWNER } else { 0 }
}

/// Convert a POSIX timespec to an NFS time.
///
/// Seconds and nanoseconds narrow to the unsigned 32-bit wire fields.
/// Negative values never come out of a well-behaved dispatcher.
pub fn timespec_to_nfstime3(time: TimeSpec) -> nfs3::nfstime3 {
    debug_assert!(
        time.sec >= 0 && time.nsec >= 0,
        "negative timestamp from dispatcher: {:?}",
        time
    );
    nfs3::nfstime3 { seconds: time.sec as u32, nseconds: time.nsec as u32 }
}

/// Build the full NFS attribute record from a POSIX stat snapshot.
///
/// `used` is the allocated storage in bytes; NFS convention is the POSIX
/// 512-byte block count times 512 regardless of the file system's real
/// block size.
pub fn stat_to_fattr3(stat: &FileStat) -> nfs3::fattr3 {
    nfs3::fattr3 {
        ftype: mode_to_ftype3(stat.mode),
        mode: mode_to_nfs_mode(stat.mode),
        nlink: stat.nlink,
        uid: stat.uid,
        gid: stat.gid,
        size: stat.size,
        used: stat.blocks * 512,
        rdev: nfs3::specdata3::default(),
        fsid: stat.dev,
        fileid: stat.ino,
        atime: timespec_to_nfstime3(stat.atime),
        mtime: timespec_to_nfstime3(stat.mtime),
        ctime: timespec_to_nfstime3(stat.ctime),
    }
}

/// Wrap a getattr outcome into the optional post-operation attributes.
///
/// A failed attribute fetch degrades to the "no attributes" wire form
/// rather than failing the surrounding procedure.
pub fn stat_to_post_op_attr(stat: Result<FileStat, VfsError>) -> nfs3::post_op_attr {
    match stat {
        Ok(stat) => nfs3::post_op_attr::Some(stat_to_fattr3(&stat)),
        Err(_) => nfs3::post_op_attr::None,
    }
}

/// Build the pre-operation attributes from a stat snapshot.
///
/// Absence is represented one level up by not calling this function.
pub fn stat_to_pre_op_attr(stat: &FileStat) -> nfs3::pre_op_attr {
    nfs3::pre_op_attr::Some(nfs3::wcc_attr {
        size: stat.size,
        mtime: timespec_to_nfstime3(stat.mtime),
        ctime: timespec_to_nfstime3(stat.ctime),
    })
}

/// Assemble weak cache consistency data from the optional before/after
/// samples a mutating dispatcher operation returned.
pub fn stats_to_wcc_data(pre: Option<&FileStat>, post: Option<&FileStat>) -> nfs3::wcc_data {
    nfs3::wcc_data {
        before: match pre {
            Some(stat) => stat_to_pre_op_attr(stat),
            None => nfs3::pre_op_attr::None,
        },
        after: match post {
            Some(stat) => nfs3::post_op_attr::Some(stat_to_fattr3(stat)),
            None => nfs3::post_op_attr::None,
        },
    }
}
