use std::{
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
};

use cruiser_config::CruiserConfig;
use cruiser_proxy::ProxyServer;
use tracing::{error, info, instrument};

mod accept;

pub use accept::serve;
pub(crate) use accept::bind_listener;

/// Owns the listening socket for the lifetime of the process.
pub struct Master {
    cfg: Arc<CruiserConfig>,
    proxy: Arc<ProxyServer>,
}

impl Master {
    pub fn new(cfg: CruiserConfig, proxy: ProxyServer) -> Self {
        Self {
            cfg: Arc::new(cfg),
            proxy: Arc::new(proxy),
        }
    }

    /// All interfaces, configured port.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.cfg.proxy().port()))
    }

    /// Binds the listener and serves until Ctrl+C.
    #[instrument(skip(self), fields(
        port = self.cfg.proxy().port(),
        origin = %self.proxy.origin(),
        cache_type = %self.cfg.cache().kind(),
    ))]
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.listen_addr();
        let listener = bind_listener(addr).await?;

        info!(
            target: "cruiser::master",
            "Starting cruiser on {}, forwarding to {}",
            addr,
            self.proxy.origin()
        );

        serve(listener, self.proxy, shutdown_signal()).await
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(
            target: "cruiser::master",
            error = ?e,
            "Unable to listen for Ctrl+C; running until killed"
        );
        std::future::pending::<()>().await;
    }

    info!(target: "cruiser::master", "Shutdown signal received");
}
