//! Implementation of the `GETATTR` procedure (procedure 1) for NFS version 3
//! protocol as defined in RFC 1813 section 3.3.1.
//!
//! The `GETATTR` procedure retrieves file attributes for a specified file
//! system object. It is used by NFS clients to:
//! - Check if cached attributes are still valid
//! - Get initial attributes for files and directories
//! - Check file/directory sizes, permissions, ownership, etc.
//!
//! `GETATTR` takes a file handle as input and returns the complete file
//! attribute structure defined in RFC 1813 section 2.3.5 (fattr3).

use std::io::Cursor;

use tracing::{debug, error};

use crate::dispatcher::RequestContext;
use crate::protocol::nfs::v3::attr::stat_to_fattr3;
use crate::protocol::nfs::v3::errors::nfsstat3_from_error;
use crate::protocol::rpc;
use crate::protocol::xdr::{self, deserialize, nfs3, Serialize};

/// Handles `NFSv3` `GETATTR` procedure (procedure 1)
///
/// `GETATTR` retrieves attributes for a specified file system object.
/// Takes a file handle as input and returns the file's attributes.
pub async fn nfsproc3_getattr(
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
            error!("nfsproc3_getattr({:?}) malformed arguments: {:?}", xid, err);
            nfs3::nfsstat3::NFS3ERR_SERVERFAULT.serialize(output)?;
            return Ok(());
        }
    };
    debug!("nfsproc3_getattr({:?},{:?}) ", xid, handle);

    let req_ctx = RequestContext::with_cause("getattr");
    match context.dispatcher.getattr(handle.ino, &req_ctx).await {
        Ok(stat) => {
            debug!(" {:?} --> {:?}", xid, stat);
            nfs3::nfsstat3::NFS3_OK.serialize(output)?;
            stat_to_fattr3(&stat).serialize(output)?;
        }
        Err(err) => {
            error!("nfsproc3_getattr error {:?} --> {:?}", xid, err);
            nfsstat3_from_error(&err).serialize(output)?;
        }
    }
    Ok(())
}
