//! Implementation of the LINK procedure (procedure 15) for NFS version 3
//! protocol as defined in RFC 1813 section 3.3.15.
//!
//! Hard links are not supported by the underlying file system model, so
//! every request is answered NFS3ERR_NOTSUPP. The attributes of the source
//! file are still collected so the client can refresh its cache.

use std::io::Cursor;

use tracing::{debug, error};

use crate::dispatcher::RequestContext;
use crate::protocol::nfs::v3::attr::stat_to_post_op_attr;
use crate::protocol::rpc;
use crate::protocol::xdr::{self, deserialize, nfs3, Serialize};

/// Handles NFSv3 LINK procedure (procedure 15)
pub async fn nfsproc3_link(
    xid: u32,
    args: &[u8],
    output: &mut Vec<u8>,
    context: &rpc::Context,
) -> Result<(), anyhow::Error> {
    xdr::rpc::serialize_reply(output, xdr::rpc::accept_stat::SUCCESS)?;

    let mut input = Cursor::new(args);
    let args = match deserialize::<nfs3::file::LINK3args>(&mut input) {
        Ok(args) => args,
        Err(err) => {
            error!("nfsproc3_link({:?}) malformed arguments: {:?}", xid, err);
            nfs3::nfsstat3::NFS3ERR_SERVERFAULT.serialize(output)?;
            nfs3::file::LINK3resfail::default().serialize(output)?;
            return Ok(());
        }
    };
    debug!("nfsproc3_link({:?},{:?},{:?}) ", xid, args.file, args.link);

    let req_ctx = RequestContext::with_cause("link");
    let attr = context.dispatcher.getattr(args.file.ino, &req_ctx).await;

    let res = nfs3::file::LINK3resfail {
        file_attributes: stat_to_post_op_attr(attr),
        linkdir_wcc: nfs3::wcc_data::default(),
    };
    nfs3::nfsstat3::NFS3ERR_NOTSUPP.serialize(output)?;
    res.serialize(output)?;
    Ok(())
}
