//! Implementation of the `WRITE` procedure (procedure 7) for NFS version 3
//! protocol as defined in RFC 1813 section 3.3.7.
//!
//! The `WRITE` procedure writes data to a regular file. The client
//! specifies:
//! - The file handle of the file to which data is to be written
//! - The offset within the file where the write should begin
//! - The amount of data to be written (count)
//! - A stability level (`UNSTABLE`, `DATA_SYNC`, or `FILE_SYNC`)
//! - The data to be written
//!
//! On successful return, the server provides:
//! - The file attributes before and after the write (weak cache consistency)
//! - The number of bytes actually written
//! - The stability level used for the write
//! - A write verifier to detect server restarts

use std::io::Cursor;

use tracing::{debug, error};

use crate::dispatcher::RequestContext;
use crate::protocol::nfs::v3::attr::stats_to_wcc_data;
use crate::protocol::nfs::v3::errors::nfsstat3_from_error;
use crate::protocol::rpc;
use crate::protocol::xdr::{self, deserialize, nfs3, Serialize};

/// Generate the write verifier returned to clients.
///
/// TODO: a per-process random cookie would let clients detect server
/// restarts; a fixed zero never invalidates their cached verifier.
fn make_write_verf() -> nfs3::writeverf3 {
    0
}

/// Handles `NFSv3` `WRITE` procedure (procedure 7)
///
/// Clients occasionally send more bytes than `count` claims; only the
/// first `count` bytes are handed to the dispatcher.
pub async fn nfsproc3_write(
    xid: u32,
    args: &[u8],
    output: &mut Vec<u8>,
    context: &rpc::Context,
) -> Result<(), anyhow::Error> {
    xdr::rpc::serialize_reply(output, xdr::rpc::accept_stat::SUCCESS)?;

    let mut input = Cursor::new(args);
    let args = match deserialize::<nfs3::file::WRITE3args>(&mut input) {
        Ok(args) => args,
        Err(err) => {
            error!("nfsproc3_write({:?}) malformed arguments: {:?}", xid, err);
            nfs3::nfsstat3::NFS3ERR_SERVERFAULT.serialize(output)?;
            nfs3::wcc_data::default().serialize(output)?;
            return Ok(());
        }
    };
    debug!(
        "nfsproc3_write({:?},{:?},offset={},count={},stable={:?}) ",
        xid, args.file, args.offset, args.count, args.stable
    );

    let mut data = args.data;
    data.truncate(args.count as usize);

    let req_ctx = RequestContext::with_cause("write");
    match context.dispatcher.write(args.file.ino, data, args.offset, &req_ctx).await {
        Ok(write_res) => {
            debug!("write success {:?} --> {} bytes", xid, write_res.written);

            // NFS is limited to writing a maximum of 4GB (2^32) of data per
            // write call, so despite the dispatcher reporting a u64, the
            // count always fits in the u32 wire field.
            debug_assert!(write_res.written <= u64::from(u32::MAX));

            let res = nfs3::file::WRITE3resok {
                file_wcc: stats_to_wcc_data(
                    write_res.pre_stat.as_ref(),
                    write_res.post_stat.as_ref(),
                ),
                count: write_res.written as nfs3::count3,
                // TODO: issue a data sync when the client asked for
                // DATA_SYNC or FILE_SYNC instead of unconditionally
                // claiming FILE_SYNC.
                committed: nfs3::file::stable_how::FILE_SYNC,
                verf: make_write_verf(),
            };
            nfs3::nfsstat3::NFS3_OK.serialize(output)?;
            res.serialize(output)?;
        }
        Err(err) => {
            error!("write error {:?} --> {:?}", xid, err);
            nfsstat3_from_error(&err).serialize(output)?;
            nfs3::wcc_data::default().serialize(output)?;
        }
    }
    Ok(())
}
