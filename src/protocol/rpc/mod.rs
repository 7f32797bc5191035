//! Shared state for request processing.
//!
//! The transport layer owns connections, record framing, transaction IDs
//! and credentials; what the engine needs per request is captured by
//! [Context]: the dispatcher every handler calls into and the
//! configuration that shapes replies.

mod context;

pub use context::Context;
