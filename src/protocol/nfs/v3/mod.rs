//! NFSv3 (Network File System version 3) procedure dispatch as specified
//! in RFC 1813.
//!
//! This module routes incoming RPC calls to the per-procedure handlers:
//!
//! 1. NULL - Do nothing (ping the server)
//! 2. GETATTR - Get file attributes
//! 3. SETATTR - Set file attributes
//! 4. LOOKUP - Look up file name
//! 5. ACCESS - Check access permission
//! 6. READLINK - Read from symbolic link
//! 7. READ - Read from file
//! 8. WRITE - Write to file
//! 9. CREATE - Create a file
//! 10. MKDIR - Create a directory
//! 11. SYMLINK - Create a symbolic link
//! 12. MKNOD - Create a special device
//! 13. REMOVE - Remove a file
//! 14. RMDIR - Remove a directory
//! 15. RENAME - Rename a file or directory
//! 16. LINK - Create a hard link
//! 17. READDIR - Read from directory
//! 18. READDIRPLUS - Extended read from directory
//! 19. FSSTAT - Get file system statistics
//! 20. FSINFO - Get file system information
//! 21. PATHCONF - Get path configuration
//! 22. COMMIT - Commit cached data
//!
//! Routing goes through a fixed table of 22 entries indexed by the RFC
//! procedure number, each carrying the procedure name for trace logging
//! and the handler function. Procedures outside the table, foreign program
//! numbers and foreign program versions are declined at the accept-status
//! level before any handler runs.

use std::future::Future;
use std::pin::Pin;

use tracing::{error, trace, warn};

use crate::protocol::rpc::Context;
use crate::protocol::xdr::{self, nfs3, Serialize};

pub mod attr;
pub mod errors;

mod access;
mod create;
mod fsinfo;
mod fsstat;
mod getattr;
mod link;
mod lookup;
mod mkdir;
mod null;
mod pathconf;
mod readlink;
mod unresolved;
mod write;

/// The future a procedure handler returns; boxed so handlers fit behind a
/// plain function pointer in the dispatch table.
type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<(), anyhow::Error>> + Send + 'a>>;

/// Shape shared by every procedure handler: transaction id, raw argument
/// bytes, the reply buffer the handler owns until completion, and the
/// shared server context.
type HandlerFn =
    for<'a> fn(u32, &'a [u8], &'a mut Vec<u8>, &'a Context) -> HandlerFuture<'a>;

/// One slot of the dispatch table.
struct HandlerEntry {
    /// Procedure name as spelled in RFC 1813, for trace logging
    name: &'static str,
    handler: HandlerFn,
}

macro_rules! handler_entry {
    ($name:literal, $handler:path) => {{
        fn shim<'a>(
            xid: u32,
            args: &'a [u8],
            output: &'a mut Vec<u8>,
            context: &'a Context,
        ) -> HandlerFuture<'a> {
            Box::pin($handler(xid, args, output, context))
        }
        HandlerEntry { name: $name, handler: shim }
    }};
}

/// The fixed dispatch table, indexed by RFC 1813 procedure number. Every
/// index 0..=21 corresponds to a defined procedure; there are no holes.
const NFS3_HANDLERS: [HandlerEntry; 22] = [
    handler_entry!("NULL", null::nfsproc3_null),
    handler_entry!("GETATTR", getattr::nfsproc3_getattr),
    handler_entry!("SETATTR", unresolved::nfsproc3_setattr),
    handler_entry!("LOOKUP", lookup::nfsproc3_lookup),
    handler_entry!("ACCESS", access::nfsproc3_access),
    handler_entry!("READLINK", readlink::nfsproc3_readlink),
    handler_entry!("READ", unresolved::nfsproc3_read),
    handler_entry!("WRITE", write::nfsproc3_write),
    handler_entry!("CREATE", create::nfsproc3_create),
    handler_entry!("MKDIR", mkdir::nfsproc3_mkdir),
    handler_entry!("SYMLINK", unresolved::nfsproc3_symlink),
    handler_entry!("MKNOD", unresolved::nfsproc3_mknod),
    handler_entry!("REMOVE", unresolved::nfsproc3_remove),
    handler_entry!("RMDIR", unresolved::nfsproc3_rmdir),
    handler_entry!("RENAME", unresolved::nfsproc3_rename),
    handler_entry!("LINK", link::nfsproc3_link),
    handler_entry!("READDIR", unresolved::nfsproc3_readdir),
    handler_entry!("READDIRPLUS", unresolved::nfsproc3_readdirplus),
    handler_entry!("FSSTAT", fsstat::nfsproc3_fsstat),
    handler_entry!("FSINFO", fsinfo::nfsproc3_fsinfo),
    handler_entry!("PATHCONF", pathconf::nfsproc3_pathconf),
    handler_entry!("COMMIT", unresolved::nfsproc3_commit),
];

/// Main dispatch entry for NFSv3 requests.
///
/// Validates the program number, program version and procedure number,
/// then routes to the handler. Rejections are expressed through the
/// accept status that opens the reply; once a handler runs, the accept
/// status is SUCCESS and any failure travels inside the NFS result body.
///
/// # Arguments
///
/// * `xid` - Transaction ID from the RPC call, passed through for logging
/// * `prog` - RPC program number from the call
/// * `vers` - Program version from the call
/// * `proc` - Procedure number from the call
/// * `args` - XDR-encoded procedure arguments, envelope already stripped
/// * `output` - Reply buffer, owned by this request until completion
/// * `context` - Server context containing the dispatcher and configuration
pub async fn dispatch_rpc(
    xid: u32,
    prog: u32,
    vers: u32,
    proc: u32,
    args: &[u8],
    output: &mut Vec<u8>,
    context: &Context,
) -> Result<(), anyhow::Error> {
    if prog != nfs3::PROGRAM {
        warn!("Invalid program number {} != {}", prog, nfs3::PROGRAM);
        xdr::rpc::serialize_reply(output, xdr::rpc::accept_stat::PROG_UNAVAIL)?;
        return Ok(());
    }

    if vers != nfs3::VERSION {
        warn!("Invalid NFS version number {} != {}", vers, nfs3::VERSION);
        xdr::rpc::serialize_reply(output, xdr::rpc::accept_stat::PROG_MISMATCH)?;
        xdr::rpc::mismatch_info { low: nfs3::VERSION, high: nfs3::VERSION }.serialize(output)?;
        return Ok(());
    }

    let Some(entry) = NFS3_HANDLERS.get(proc as usize) else {
        error!("Invalid procedure: {}", proc);
        xdr::rpc::serialize_reply(output, xdr::rpc::accept_stat::PROC_UNAVAIL)?;
        return Ok(());
    };

    trace!("{}()", entry.name);
    (entry.handler)(xid, args, output, context).await
}
