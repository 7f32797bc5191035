//! Implementation of the `READLINK` procedure (procedure 5) for NFS
//! version 3 protocol as defined in RFC 1813 section 3.3.5.
//!
//! `READLINK` reads the target path stored in a symbolic link. The link
//! attributes are fetched concurrently with the target so the reply can
//! carry post-op attributes on both the success and failure paths.

use std::io::Cursor;

use tracing::{debug, error};

use crate::dispatcher::RequestContext;
use crate::protocol::nfs::v3::attr::stat_to_post_op_attr;
use crate::protocol::nfs::v3::errors::nfsstat3_from_error;
use crate::protocol::rpc;
use crate::protocol::xdr::{self, deserialize, nfs3, Serialize};

/// Handles `NFSv3` `READLINK` procedure (procedure 5)
pub async fn nfsproc3_readlink(
    xid: u32,
    args: &[u8],
    output: &mut Vec<u8>,
    context: &rpc::Context,
) -> Result<(), anyhow::Error> {
    xdr::rpc::serialize_reply(output, xdr::rpc::accept_stat::SUCCESS)?;

    let mut input = Cursor::new(args);
    let handle = match deserialize::<nfs3::nfs_fh3>(&mut input) {
        Ok(handle) => handle,
        Err(err) => {
            error!("nfsproc3_readlink({:?}) malformed arguments: {:?}", xid, err);
            nfs3::nfsstat3::NFS3ERR_SERVERFAULT.serialize(output)?;
            nfs3::post_op_attr::None.serialize(output)?;
            return Ok(());
        }
    };
    debug!("nfsproc3_readlink({:?},{:?}) ", xid, handle);

    let req_ctx = RequestContext::with_cause("readlink");
    let attr_fut = context.dispatcher.getattr(handle.ino, &req_ctx);
    let readlink_fut = context.dispatcher.readlink(handle.ino, &req_ctx);

    let (readlink_res, attr) = tokio::join!(readlink_fut, attr_fut);

    match readlink_res {
        Ok(path) => {
            debug!("nfsproc3_readlink success {:?} --> {:?}", xid, path);
            let res = nfs3::file::READLINK3resok {
                symlink_attributes: stat_to_post_op_attr(attr),
                data: path,
            };
            nfs3::nfsstat3::NFS3_OK.serialize(output)?;
            res.serialize(output)?;
        }
        Err(err) => {
            error!("nfsproc3_readlink error {:?} --> {:?}", xid, err);
            nfsstat3_from_error(&err).serialize(output)?;
            stat_to_post_op_attr(attr).serialize(output)?;
        }
    }
    Ok(())
}
