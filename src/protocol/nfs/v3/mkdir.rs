//! Implementation of the MKDIR procedure (procedure 9) for NFS version 3
//! protocol as defined in RFC 1813 section 3.3.9.
//!
//! The MKDIR procedure creates a directory in a specified parent
//! directory. "." and ".." always exist, so creating them is rejected
//! before the dispatcher is involved.

use std::io::Cursor;

use tracing::{debug, error};

use crate::dispatcher::{RequestContext, S_IFDIR};
use crate::protocol::nfs::v3::attr::{stat_to_fattr3, stats_to_wcc_data};
use crate::protocol::nfs::v3::errors::nfsstat3_from_error;
use crate::protocol::rpc;
use crate::protocol::xdr::{self, deserialize, nfs3, Serialize};

/// Handles NFSv3 MKDIR procedure (procedure 9)
pub async fn nfsproc3_mkdir(
    xid: u32,
    args: &[u8],
    output: &mut Vec<u8>,
    context: &rpc::Context,
) -> Result<(), anyhow::Error> {
    xdr::rpc::serialize_reply(output, xdr::rpc::accept_stat::SUCCESS)?;

    let mut input = Cursor::new(args);
    let args = match deserialize::<nfs3::dir::MKDIR3args>(&mut input) {
        Ok(args) => args,
        Err(err) => {
            error!("nfsproc3_mkdir({:?}) malformed arguments: {:?}", xid, err);
            nfs3::nfsstat3::NFS3ERR_SERVERFAULT.serialize(output)?;
            nfs3::wcc_data::default().serialize(output)?;
            return Ok(());
        }
    };
    debug!("nfsproc3_mkdir({:?},{:?}) ", xid, args.dirops);

    // Don't allow creating this directory or its parent.
    if args.dirops.name.as_ref() == b"." || args.dirops.name.as_ref() == b".." {
        nfs3::nfsstat3::NFS3ERR_EXIST.serialize(output)?;
        nfs3::wcc_data::default().serialize(output)?;
        return Ok(());
    }

    // If the mode isn't set, make the directory writable by the owner,
    // readable by the group and traversable by others.
    let mode = match args.attributes.mode {
        nfs3::set_mode3::Some(mode) => mode,
        nfs3::set_mode3::None => S_IFDIR | 0o751,
    };

    // The remaining requested attributes are ignored for now.

    let req_ctx = RequestContext::with_cause("mkdir");
    match context
        .dispatcher
        .mkdir(args.dirops.dir.ino, &args.dirops.name, mode, &req_ctx)
        .await
    {
        Ok(mkdir_res) => {
            debug!("mkdir success {:?} --> {:?}", xid, mkdir_res.ino);
            let res = nfs3::dir::MKDIR3resok {
                obj: nfs3::post_op_fh3::Some(nfs3::nfs_fh3 { ino: mkdir_res.ino }),
                obj_attributes: nfs3::post_op_attr::Some(stat_to_fattr3(&mkdir_res.stat)),
                dir_wcc: stats_to_wcc_data(
                    mkdir_res.pre_dir_stat.as_ref(),
                    mkdir_res.post_dir_stat.as_ref(),
                ),
            };
            nfs3::nfsstat3::NFS3_OK.serialize(output)?;
            res.serialize(output)?;
        }
        Err(err) => {
            error!("mkdir error {:?} --> {:?}", xid, err);
            nfsstat3_from_error(&err).serialize(output)?;
            nfs3::wcc_data::default().serialize(output)?;
        }
    }
    Ok(())
}
