mod cli;

use anyhow::Context;
use clap::Parser;
use cruiser_config::CruiserConfig;
use cruiser_core::{Master, build_cache};
use cruiser_proxy::ProxyServer;
use tracing::warn;
use utils::init_tracing;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing().context("installing tracing subscriber")?;

    let mut cfg = CruiserConfig::load(cli.config.as_deref()).context("loading configuration")?;
    cli.apply_to(&mut cfg);
    cfg.log_summary();

    let cache = build_cache(cfg.cache()).with_context(|| {
        format!(
            "initializing {} cache at {}",
            cfg.cache().kind(),
            cfg.cache().dir().display()
        )
    })?;

    if cli.clear_cache {
        cache.clear().await;
        println!("Cache cleared | exiting program...");
        return Ok(());
    }

    let report = cfg.check()?;
    for warning in report.warnings() {
        warn!(target: "cruiser::config", "{warning}");
    }

    let proxy = ProxyServer::new(cfg.proxy().origin(), cache)
        .context("invalid origin")?
        .with_default_ttl(cfg.cache().ttl());

    Master::new(cfg, proxy).run().await
}
