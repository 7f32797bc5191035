//! Protocol implementation modules.
//!
//! - `xdr`: wire types and the XDR serialization layer
//! - `nfs`: procedure handlers and the dispatch router
//! - `rpc`: shared request-processing state

pub mod nfs;
pub mod rpc;
pub mod xdr;
