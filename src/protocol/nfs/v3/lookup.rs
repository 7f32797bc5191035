//! Implementation of the `LOOKUP` procedure (procedure 3) for NFS version 3
//! protocol as defined in RFC 1813 section 3.3.3.
//!
//! The `LOOKUP` procedure performs file name lookup in a directory. It
//! translates a file name into a file handle that can be used for
//! subsequent operations on the file. The client specifies:
//! - The file handle for the directory to search
//! - The filename to look up within that directory
//!
//! On successful return, the server provides:
//! - The file handle of the requested file
//! - The attributes of the requested file
//! - The attributes of the directory (for cache validation)
//!
//! "." and ".." are resolved here rather than in the dispatcher: "." is
//! the directory itself and ".." is whatever the dispatcher reports as the
//! directory's parent.

use std::io::Cursor;

use tracing::{debug, error};

use crate::dispatcher::{FileStat, RequestContext, VfsResult};
use crate::protocol::nfs::v3::attr::{stat_to_fattr3, stat_to_post_op_attr};
use crate::protocol::nfs::v3::errors::nfsstat3_from_error;
use crate::protocol::rpc;
use crate::protocol::xdr::{self, deserialize, nfs3, Serialize};

/// Handles `NFSv3` `LOOKUP` procedure (procedure 3)
///
/// The directory attribute fetch is started eagerly so that the reply can
/// always carry directory post-op attributes; it runs concurrently with
/// the lookup itself and both results are joined before serializing.
pub async fn nfsproc3_lookup(
    xid: u32,
    args: &[u8],
    output: &mut Vec<u8>,
    context: &rpc::Context,
) -> Result<(), anyhow::Error> {
    xdr::rpc::serialize_reply(output, xdr::rpc::accept_stat::SUCCESS)?;

    let mut input = Cursor::new(args);
    let dirops = match deserialize::<nfs3::diropargs3>(&mut input) {
        Ok(dirops) => dirops,
        Err(err) => {
            error!("nfsproc3_lookup({:?}) malformed arguments: {:?}", xid, err);
            nfs3::nfsstat3::NFS3ERR_SERVERFAULT.serialize(output)?;
            nfs3::post_op_attr::None.serialize(output)?;
            return Ok(());
        }
    };
    debug!("nfsproc3_lookup({:?},{:?}) ", xid, dirops);

    let req_ctx = RequestContext::with_cause("lookup");
    let dispatcher = &context.dispatcher;

    let dir_attr_fut = dispatcher.getattr(dirops.dir.ino, &req_ctx);

    if dirops.name.len() > nfs3::NAME_MAX as usize {
        // The filename is too long; still try to report the directory
        // attributes alongside the failure.
        let dir_attr = dir_attr_fut.await;
        nfs3::nfsstat3::NFS3ERR_NAMETOOLONG.serialize(output)?;
        stat_to_post_op_attr(dir_attr).serialize(output)?;
        return Ok(());
    }

    let lookup_fut = async {
        if dirops.name.as_ref() == b"." {
            let stat = dispatcher.getattr(dirops.dir.ino, &req_ctx).await?;
            VfsResult::<(nfs3::fileid3, FileStat)>::Ok((dirops.dir.ino, stat))
        } else if dirops.name.as_ref() == b".." {
            let parent = dispatcher.get_parent(dirops.dir.ino, &req_ctx).await?;
            let stat = dispatcher.getattr(parent, &req_ctx).await?;
            Ok((parent, stat))
        } else {
            dispatcher.lookup(dirops.dir.ino, &dirops.name, &req_ctx).await
        }
    };

    let (lookup_res, dir_attr) = tokio::join!(lookup_fut, dir_attr_fut);

    match lookup_res {
        Ok((ino, stat)) => {
            debug!("nfsproc3_lookup success {:?} --> {:?}", xid, ino);
            let res = nfs3::dir::LOOKUP3resok {
                object: nfs3::nfs_fh3 { ino },
                obj_attributes: nfs3::post_op_attr::Some(stat_to_fattr3(&stat)),
                dir_attributes: stat_to_post_op_attr(dir_attr),
            };
            nfs3::nfsstat3::NFS3_OK.serialize(output)?;
            res.serialize(output)?;
        }
        Err(err) => {
            debug!("nfsproc3_lookup error {:?}({:?}) --> {:?}", xid, dirops.name, err);
            nfsstat3_from_error(&err).serialize(output)?;
            stat_to_post_op_attr(dir_attr).serialize(output)?;
        }
    }
    Ok(())
}
