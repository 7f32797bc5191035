//! NFS Sable - an NFSv3 server protocol engine in Rust
//!
//! This library implements the server side of the NFS version 3 protocol
//! as defined in RFC 1813, translating decoded RPC calls into operations
//! against an abstract file system dispatcher and producing wire-correct
//! replies. It is the protocol core of a user-space virtual file system:
//! the surrounding transport handles sockets, record framing, transaction
//! IDs and authentication, while the dispatcher behind the engine owns the
//! inode graph and file contents.
//!
//! ## Main Components
//!
//! - `dispatcher`: The file system contract. Implement [dispatcher::NfsDispatcher]
//!   to expose a file system through the engine; operations speak POSIX
//!   (stat snapshots, errnos, modes) and the engine handles the protocol
//!   translation.
//!
//! - `server`: The [server::Nfsd3] façade a transport embeds: per-call
//!   dispatch plus a stop future signaled at teardown.
//!
//! - `protocol`: The NFS procedure handlers, the dispatch table, and the
//!   XDR (External Data Representation) encoding/decoding layer.
//!
//! ## Standards Compliance
//!
//! This implementation follows these RFCs:
//! - RFC 1813: NFS Version 3 Protocol Specification
//! - RFC 5531: RPC: Remote Procedure Call Protocol Specification Version 2
//! - RFC 1832: XDR: External Data Representation Standard
//!
//! ## Procedure coverage
//!
//! NULL, GETATTR, LOOKUP, ACCESS, READLINK, WRITE, CREATE, MKDIR, LINK,
//! FSSTAT, FSINFO and PATHCONF are served. The remaining RFC 1813
//! procedures currently answer PROC_UNAVAIL at the accept level, and LINK
//! always reports that hard links are unsupported.

pub mod dispatcher;
pub mod protocol;
pub mod server;

pub use protocol::xdr;
