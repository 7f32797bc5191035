//! Execution context shared by all procedure handlers.

use std::fmt;
use std::sync::Arc;

use crate::dispatcher::NfsDispatcher;

/// Represents the execution context for NFS procedure handlers.
///
/// The context is cheap to clone and shared across all in-flight requests:
/// the dispatcher must be internally safe for concurrent invocation, while
/// the configuration fields are immutable after construction.
#[derive(Clone)]
pub struct Context {
    /// File system dispatcher that handles the actual file operations
    pub dispatcher: Arc<dyn NfsDispatcher>,

    /// Whether the exported file system treats names case sensitively.
    /// Surfaced to clients through the PATHCONF procedure.
    pub case_sensitive: bool,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("rpc::Context")
            .field("case_sensitive", &self.case_sensitive)
            .finish()
    }
}
