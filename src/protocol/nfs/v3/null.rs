//! Implementation of the NULL procedure (procedure 0) for NFS version 3
//! protocol as defined in RFC 1813 section 3.3.0.
//!
//! The NULL procedure does no work and is typically used to:
//! - Check if the server is responding (ping)
//! - Measure basic RPC round-trip time
//!
//! NULL takes no arguments and returns no results, just an accept status
//! indicating success.

use tracing::debug;

use crate::protocol::rpc;
use crate::protocol::xdr;

/// Handles `NFSv3` NULL procedure
///
/// NULL is a no-operation call used to check if the server is responding.
pub async fn nfsproc3_null(
    xid: u32,
    _args: &[u8],
    output: &mut Vec<u8>,
    _context: &rpc::Context,
) -> Result<(), anyhow::Error> {
    debug!("nfsproc3_null({:?}) ", xid);
    xdr::rpc::serialize_reply(output, xdr::rpc::accept_stat::SUCCESS)?;
    Ok(())
}
