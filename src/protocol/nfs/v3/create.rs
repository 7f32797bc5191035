//! Implementation of the CREATE procedure (procedure 8) for NFS version 3
//! protocol as defined in RFC 1813 section 3.3.8.
//!
//! The CREATE procedure creates a regular file in a specified directory.
//! The client specifies:
//! - The file handle of the parent directory
//! - The name for the new file
//! - The method of creation (UNCHECKED, GUARDED, or EXCLUSIVE)
//! - The initial attributes for the new file (for UNCHECKED and GUARDED)
//!
//! Exclusive creation relies on the server persisting the client verifier
//! so retransmitted creates stay idempotent; that machinery does not exist
//! here, so EXCLUSIVE requests are answered NFS3ERR_NOTSUPP and clients
//! fall back to GUARDED.

use std::io::Cursor;

use tracing::{debug, error, warn};

use crate::dispatcher::{RequestContext, S_IFREG};
use crate::protocol::nfs::v3::attr::{stat_to_fattr3, stats_to_wcc_data};
use crate::protocol::nfs::v3::errors::nfsstat3_from_error;
use crate::protocol::rpc;
use crate::protocol::xdr::{self, deserialize, nfs3, Serialize};

/// Handles NFSv3 CREATE procedure (procedure 8)
pub async fn nfsproc3_create(
    xid: u32,
    args: &[u8],
    output: &mut Vec<u8>,
    context: &rpc::Context,
) -> Result<(), anyhow::Error> {
    xdr::rpc::serialize_reply(output, xdr::rpc::accept_stat::SUCCESS)?;

    let mut input = Cursor::new(args);
    let args = match deserialize::<nfs3::dir::CREATE3args>(&mut input) {
        Ok(args) => args,
        Err(err) => {
            error!("nfsproc3_create({:?}) malformed arguments: {:?}", xid, err);
            nfs3::nfsstat3::NFS3ERR_SERVERFAULT.serialize(output)?;
            nfs3::wcc_data::default().serialize(output)?;
            return Ok(());
        }
    };
    debug!("nfsproc3_create({:?},{:?},{:?}) ", xid, args.dirops, args.how);

    let attr = match &args.how {
        nfs3::dir::createhow3::UNCHECKED(attr) | nfs3::dir::createhow3::GUARDED(attr) => *attr,
        nfs3::dir::createhow3::EXCLUSIVE(_) => {
            nfs3::nfsstat3::NFS3ERR_NOTSUPP.serialize(output)?;
            nfs3::wcc_data::default().serialize(output)?;
            return Ok(());
        }
    };
    let unchecked = matches!(args.how, nfs3::dir::createhow3::UNCHECKED(_));

    // If the mode isn't set, make the file writable by the owner and
    // readable by the group and others, consistent with a default umask
    // of 022.
    let mode = match attr.mode {
        nfs3::set_mode3::Some(mode) => mode,
        nfs3::set_mode3::None => S_IFREG | 0o644,
    };

    let req_ctx = RequestContext::with_cause("create");
    match context
        .dispatcher
        .create(args.dirops.dir.ino, &args.dirops.name, mode, &req_ctx)
        .await
    {
        Ok(create_res) => {
            debug!("create success {:?} --> {:?}", xid, create_res.ino);
            let res = nfs3::dir::CREATE3resok {
                obj: nfs3::post_op_fh3::Some(nfs3::nfs_fh3 { ino: create_res.ino }),
                obj_attributes: nfs3::post_op_attr::Some(stat_to_fattr3(&create_res.stat)),
                dir_wcc: stats_to_wcc_data(
                    create_res.pre_dir_stat.as_ref(),
                    create_res.post_dir_stat.as_ref(),
                ),
            };
            nfs3::nfsstat3::NFS3_OK.serialize(output)?;
            res.serialize(output)?;
        }
        Err(err) if unchecked && err.is_errno(libc::EEXIST) => {
            warn!("Unchecked file creation returned EEXIST");
            // A file already exists at that location. Since this is an
            // UNCHECKED creation, pretend the file was created just fine.
            // No fields are populated, which forces the client to issue a
            // LOOKUP to gather the handle and attributes for this file.
            // TODO: apply the requested attributes to the existing file.
            let res = nfs3::dir::CREATE3resok {
                obj: nfs3::post_op_fh3::None,
                obj_attributes: nfs3::post_op_attr::None,
                dir_wcc: nfs3::wcc_data::default(),
            };
            nfs3::nfsstat3::NFS3_OK.serialize(output)?;
            res.serialize(output)?;
        }
        Err(err) => {
            error!("create error {:?} --> {:?}", xid, err);
            nfsstat3_from_error(&err).serialize(output)?;
            nfs3::wcc_data::default().serialize(output)?;
        }
    }
    Ok(())
}
