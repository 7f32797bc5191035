//! Server façade tying the dispatcher, configuration and lifecycle
//! together.
//!
//! [Nfsd3] is what a transport embeds: it hands each decoded call to
//! [Nfsd3::dispatch_rpc] together with the reply buffer for that request,
//! and watches the stop future to learn when the server goes away. The
//! transport remains responsible for sockets, record framing and XID
//! bookkeeping.

use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::debug;

use crate::dispatcher::NfsDispatcher;
use crate::protocol::nfs::v3;
use crate::protocol::rpc;

/// Value delivered through the stop future when the server shuts down.
///
/// Empty today; will grow fields (outstanding request counts, socket
/// takeover state) as shutdown choreography is built out.
#[derive(Debug, Default)]
pub struct StopData {}

/// The NFSv3 protocol engine.
///
/// Holds the shared request context and signals the stop future exactly
/// once when dropped. Dispatch may be invoked from any number of tasks
/// concurrently; each call owns its reply buffer for the duration of the
/// request.
pub struct Nfsd3 {
    context: rpc::Context,
    stop_tx: Option<oneshot::Sender<StopData>>,
    stop_rx: Option<oneshot::Receiver<StopData>>,
}

impl Nfsd3 {
    /// Creates the engine around a dispatcher.
    ///
    /// `case_sensitive` describes how the dispatcher's file system treats
    /// name case; it is surfaced to clients through PATHCONF.
    pub fn new(dispatcher: Arc<dyn NfsDispatcher>, case_sensitive: bool) -> Nfsd3 {
        let (stop_tx, stop_rx) = oneshot::channel();
        Nfsd3 {
            context: rpc::Context { dispatcher, case_sensitive },
            stop_tx: Some(stop_tx),
            stop_rx: Some(stop_rx),
        }
    }

    /// Dispatches one decoded RPC call and writes the reply into `output`.
    ///
    /// See [v3::dispatch_rpc] for the routing rules.
    pub async fn dispatch_rpc(
        &self,
        xid: u32,
        prog: u32,
        vers: u32,
        proc: u32,
        args: &[u8],
        output: &mut Vec<u8>,
    ) -> Result<(), anyhow::Error> {
        v3::dispatch_rpc(xid, prog, vers, proc, args, output, &self.context).await
    }

    /// Takes the future resolved when the server shuts down.
    ///
    /// Returns `None` if the future was already taken; there is exactly
    /// one stop signal per server instance.
    pub fn stop_future(&mut self) -> Option<oneshot::Receiver<StopData>> {
        self.stop_rx.take()
    }
}

impl Drop for Nfsd3 {
    fn drop(&mut self) {
        // TODO: wait for pending requests before signaling, so transports
        // can drain instead of cutting replies off mid-flight.
        debug!("Nfsd3 shutting down");
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(StopData::default());
        }
    }
}
