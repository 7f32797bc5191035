//! Implementation of the `PATHCONF` procedure (procedure 20) for NFS
//! version 3 protocol as defined in RFC 1813 section 3.3.20.
//!
//! `PATHCONF` reports the POSIX pathconf values for an object. All
//! objects served by this engine share the same limits, so the reply is
//! assembled from configuration alone; only the case sensitivity field
//! varies, per the server's configuration.

use tracing::debug;

use crate::protocol::rpc;
use crate::protocol::xdr::{self, nfs3, Serialize};

/// Handles `NFSv3` `PATHCONF` procedure (procedure 20)
pub async fn nfsproc3_pathconf(
    xid: u32,
    _args: &[u8],
    output: &mut Vec<u8>,
    context: &rpc::Context,
) -> Result<(), anyhow::Error> {
    xdr::rpc::serialize_reply(output, xdr::rpc::accept_stat::SUCCESS)?;
    debug!("nfsproc3_pathconf({:?}) ", xid);

    // TODO: fill the post_op_attr from a getattr of the object instead of
    // leaving it absent.
    let res = nfs3::fs::PATHCONF3resok {
        obj_attributes: nfs3::post_op_attr::None,
        linkmax: 0,
        name_max: nfs3::NAME_MAX,
        no_trunc: true,
        chown_restricted: true,
        case_insensitive: !context.case_sensitive,
        case_preserving: true,
    };

    nfs3::nfsstat3::NFS3_OK.serialize(output)?;
    res.serialize(output)?;
    Ok(())
}
