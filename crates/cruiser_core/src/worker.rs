//! Per-connection HTTP/1 handler.

use std::{convert::Infallible, net::SocketAddr, sync::Arc};

use cruiser_proxy::ProxyServer;
use http::Request;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tracing::debug;

/// Serves every request arriving on one client connection (keep-alive
/// included) through [`ProxyServer::handle`].
pub async fn serve_connection(
    stream: TcpStream,
    client_addr: SocketAddr,
    proxy: Arc<ProxyServer>,
) -> Result<(), hyper::Error> {
    debug!(target: "cruiser::worker", client_addr = %client_addr, "Handling new client connection");

    let io = TokioIo::new(stream);
    let service = service_fn(move |req: Request<Incoming>| {
        let proxy = proxy.clone();
        async move { Ok::<_, Infallible>(proxy.handle(req).await) }
    });

    http1::Builder::new().serve_connection(io, service).await?;

    debug!(target: "cruiser::worker", "Finished handling connection");
    Ok(())
}
