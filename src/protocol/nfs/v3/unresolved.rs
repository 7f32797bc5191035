//! Procedures this engine does not yet resolve.
//!
//! SETATTR, READ, SYMLINK, MKNOD, REMOVE, RMDIR, RENAME, READDIR,
//! READDIRPLUS and COMMIT are declined at the RPC accept level: the reply
//! is a bare PROC_UNAVAIL with no NFS result body, which tells well-behaved
//! clients not to retry. They keep their slots in the handler table so the
//! procedure numbering stays aligned with RFC 1813.

use tracing::debug;

use crate::protocol::rpc;
use crate::protocol::xdr;

macro_rules! unresolved_proc {
    ($func:ident) => {
        #[doc = concat!("Declines the ", stringify!($func), " procedure with PROC_UNAVAIL.")]
        pub async fn $func(
            xid: u32,
            _args: &[u8],
            output: &mut Vec<u8>,
            _context: &rpc::Context,
        ) -> Result<(), anyhow::Error> {
            debug!("{}({:?}) unavailable", stringify!($func), xid);
            xdr::rpc::serialize_reply(output, xdr::rpc::accept_stat::PROC_UNAVAIL)?;
            Ok(())
        }
    };
}

unresolved_proc!(nfsproc3_setattr);
unresolved_proc!(nfsproc3_read);
unresolved_proc!(nfsproc3_symlink);
unresolved_proc!(nfsproc3_mknod);
unresolved_proc!(nfsproc3_remove);
unresolved_proc!(nfsproc3_rmdir);
unresolved_proc!(nfsproc3_rename);
unresolved_proc!(nfsproc3_readdir);
unresolved_proc!(nfsproc3_readdirplus);
unresolved_proc!(nfsproc3_commit);
