//! Implementation of the `FSINFO` procedure (procedure 19) for NFS
//! version 3 protocol as defined in RFC 1813 section 3.3.19.
//!
//! `FSINFO` reports the static characteristics of the file system:
//! preferred and maximum transfer sizes, the maximum file size, the time
//! stamp resolution and the property bitmask. The values here are fixed
//! for every export served by this engine, so no dispatcher call is made.

use tracing::debug;

use crate::protocol::rpc;
use crate::protocol::xdr::{self, nfs3, Serialize};

/// Handles `NFSv3` `FSINFO` procedure (procedure 19)
pub async fn nfsproc3_fsinfo(
    xid: u32,
    _args: &[u8],
    output: &mut Vec<u8>,
    _context: &rpc::Context,
) -> Result<(), anyhow::Error> {
    xdr::rpc::serialize_reply(output, xdr::rpc::accept_stat::SUCCESS)?;
    debug!("nfsproc3_fsinfo({:?}) ", xid);

    // TODO: fill the post_op_attr from a root getattr instead of leaving
    // it absent.
    let res = nfs3::fs::FSINFO3resok {
        obj_attributes: nfs3::post_op_attr::None,
        rtmax: 1024 * 1024,
        rtpref: 1024 * 1024,
        rtmult: 1,
        wtmax: 1024 * 1024,
        wtpref: 1024 * 1024,
        wtmult: 1,
        dtpref: 1024 * 1024,
        maxfilesize: u64::MAX,
        time_delta: nfs3::nfstime3 { seconds: 0, nseconds: 1 },
        properties: nfs3::fs::FSF_SYMLINK | nfs3::fs::FSF_HOMOGENEOUS | nfs3::fs::FSF_CANSETTIME,
    };

    nfs3::nfsstat3::NFS3_OK.serialize(output)?;
    res.serialize(output)?;
    Ok(())
}
