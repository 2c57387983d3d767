use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use cruiser_proxy::ProxyServer;
use tokio::net::TcpListener;
use tracing::{Instrument, debug, error, info, instrument};

use crate::worker::serve_connection;

// Pause after a failed accept so fd exhaustion does not spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// Binds `listen_addr`, logging the address actually bound (port 0 resolves here).
pub(crate) async fn bind_listener(listen_addr: SocketAddr) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind(listen_addr)
        .await
        .inspect_err(|e| {
            error!(target: "cruiser::master", listen = %listen_addr, error = ?e, "Bind failed");
        })
        .with_context(|| format!("binding listener on {listen_addr}"))?;

    let bound = listener.local_addr()?;
    info!(
        target: "cruiser::master",
        requested = %listen_addr,
        bound = %bound,
        "Listener ready"
    );
    Ok(listener)
}

/// Accepts connections until `shutdown` resolves, one task per connection.
///
/// There is no connection limit. A failed accept is logged and the loop
/// keeps going; in-flight connections are not awaited on shutdown.
#[instrument(skip_all, fields(listen = ?listener.local_addr().ok()))]
pub async fn serve<F>(
    listener: TcpListener,
    proxy: Arc<ProxyServer>,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    info!(
        target: "cruiser::master",
        "Accept loop started. Waiting for incoming connections (Ctrl+C to stop)..."
    );

    tokio::pin!(shutdown);

    loop {
        let (stream, addr) = tokio::select! {
            _ = &mut shutdown => {
                info!(target: "cruiser::master", "Accept loop stopped");
                return Ok(());
            }
            accepted = listener.accept() => match accepted {
                Ok(pair) => pair,
                Err(e) => {
                    error!(
                        target: "cruiser::master",
                        error = ?e,
                        "Failed to accept connection"
                    );
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            },
        };

        debug!(
            target: "cruiser::master",
            client_addr = %addr,
            "Connection accepted"
        );

        let proxy = proxy.clone();
        let span = tracing::info_span!("worker_connection", client_addr = %addr);

        tokio::spawn(
            async move {
                if let Err(e) = serve_connection(stream, addr, proxy).await {
                    error!(
                        target: "cruiser::worker",
                        client_addr = %addr,
                        error = ?e,
                        "Error while handling connection"
                    );
                } else {
                    debug!(
                        target: "cruiser::worker",
                        client_addr = %addr,
                        "Connection handled successfully"
                    );
                }
            }
            .instrument(span),
        );
    }
}
