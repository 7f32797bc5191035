//! Reply-status data structures for the Remote Procedure Call (RPC) protocol
//! as defined in RFC 5531 (previously RFC 1057).
//!
//! The transport layer owns the RPC envelope: record framing, transaction
//! IDs, credentials, and the outer reply header. What this engine emits is
//! the tail of an accepted reply: an `accept_stat` discriminant, optionally
//! followed by `mismatch_info` for version mismatches, followed by the
//! procedure-specific result union on success.

// Keep original RFC naming conventions for consistency with the specification
#![allow(non_camel_case_types)]

use std::io::Write;

use num_derive::{FromPrimitive, ToPrimitive};

use crate::protocol::xdr::{Deserialize, Serialize};
use crate::{DeserializeEnum, DeserializeStruct, SerializeEnum, SerializeStruct};

/// Status codes for accepted replies, indicating the outcome of the
/// procedure call.
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum accept_stat {
    /// The RPC call completed and a procedure-specific result follows
    #[default]
    SUCCESS = 0,
    /// The requested program number is not available on this server
    PROG_UNAVAIL = 1,
    /// The requested program version is not supported by the server
    PROG_MISMATCH = 2,
    /// The requested procedure number is not implemented by this program
    PROC_UNAVAIL = 3,
    /// The server could not decode the procedure arguments
    GARBAGE_ARGS = 4,
}
SerializeEnum!(accept_stat);
DeserializeEnum!(accept_stat);

/// Information about program version mismatch
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct mismatch_info {
    /// Lowest version supported
    pub low: u32,
    /// Highest version supported
    pub high: u32,
}
DeserializeStruct!(mismatch_info, low, high);
SerializeStruct!(mismatch_info, low, high);

/// Writes the accept status that opens every reply produced by this engine.
///
/// Emitting the status is always the first act of a handler; the result
/// union (if any) follows directly behind it in the same buffer.
pub fn serialize_reply(output: &mut impl Write, stat: accept_stat) -> std::io::Result<()> {
    stat.serialize(output)
}
