//! Implementation of the `ACCESS` procedure (procedure 4) for NFS version 3
//! protocol as defined in RFC 1813 section 3.3.4.
//!
//! The `ACCESS` procedure determines the access rights a caller has for an
//! object, letting clients avoid local permission guesses that the server
//! would reject.

use std::io::Cursor;

use tracing::{debug, error};

use crate::dispatcher::{FileStat, RequestContext};
use crate::protocol::nfs::v3::attr::stat_to_fattr3;
use crate::protocol::nfs::v3::errors::nfsstat3_from_error;
use crate::protocol::rpc;
use crate::protocol::xdr::{self, deserialize, nfs3, Serialize};

/// Computes the access bits the caller is granted on the object.
///
/// TODO: evaluate the caller's uid/gid from the RPC credentials against
/// the object's ownership; until then every requested bit is granted.
fn effective_access_rights(_stat: &FileStat, desired_access: u32) -> u32 {
    desired_access
}

/// Handles `NFSv3` `ACCESS` procedure (procedure 4)
///
/// Takes a file handle and a bitmask of desired access rights, returns the
/// object attributes and the subset of rights the server grants.
pub async fn nfsproc3_access(
    xid: u32,
    args: &[u8],
    output: &mut Vec<u8>,
    context: &rpc::Context,
) -> Result<(), anyhow::Error> {
    xdr::rpc::serialize_reply(output, xdr::rpc::accept_stat::SUCCESS)?;

    let mut input = Cursor::new(args);
    let parsed = deserialize::<nfs3::nfs_fh3>(&mut input)
        .and_then(|handle| deserialize::<u32>(&mut input).map(|access| (handle, access)));
    let (handle, desired_access) = match parsed {
        Ok(args) => args,
        Err(err) => {
            error!("nfsproc3_access({:?}) malformed arguments: {:?}", xid, err);
            nfs3::nfsstat3::NFS3ERR_SERVERFAULT.serialize(output)?;
            nfs3::post_op_attr::None.serialize(output)?;
            return Ok(());
        }
    };
    debug!("nfsproc3_access({:?},{:?},{:#x}) ", xid, handle, desired_access);

    let req_ctx = RequestContext::with_cause("access");
    match context.dispatcher.getattr(handle.ino, &req_ctx).await {
        Ok(stat) => {
            nfs3::nfsstat3::NFS3_OK.serialize(output)?;
            nfs3::post_op_attr::Some(stat_to_fattr3(&stat)).serialize(output)?;
            effective_access_rights(&stat, desired_access).serialize(output)?;
        }
        Err(err) => {
            error!("nfsproc3_access error {:?} --> {:?}", xid, err);
            nfsstat3_from_error(&err).serialize(output)?;
            nfs3::post_op_attr::None.serialize(output)?;
        }
    }
    Ok(())
}
