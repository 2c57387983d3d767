use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use cruiser_config::{CacheKind, CruiserConfig};

/// Caching HTTP proxy: forwards requests to an origin and replays cached GETs.
#[derive(Debug, Parser)]
#[command(name = "cruiser", version, about)]
pub struct Cli {
    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,

    /// Origin base URL requests are forwarded to
    #[arg(long)]
    pub origin: Option<String>,

    /// Clear the configured cache and exit
    #[arg(long)]
    pub clear_cache: bool,

    /// Cache backend
    #[arg(long, value_enum)]
    pub cache_type: Option<CacheType>,

    /// Base directory for the disk cache
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// TOML configuration file (defaults to ./cruiser.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Expire stored responses after this many seconds
    #[arg(long)]
    pub cache_ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheType {
    Memory,
    Disk,
}

impl From<CacheType> for CacheKind {
    fn from(value: CacheType) -> Self {
        match value {
            CacheType::Memory => CacheKind::Memory,
            CacheType::Disk => CacheKind::Disk,
        }
    }
}

impl Cli {
    /// Flags win over file and environment values.
    pub fn apply_to(&self, cfg: &mut CruiserConfig) {
        if let Some(port) = self.port {
            cfg.proxy.port = port;
        }
        if let Some(origin) = &self.origin {
            cfg.proxy.origin = origin.clone();
        }
        if let Some(kind) = self.cache_type {
            cfg.cache.kind = kind.into();
        }
        if let Some(dir) = &self.cache_dir {
            cfg.cache.dir = dir.clone();
        }
        if let Some(ttl) = self.cache_ttl_secs {
            cfg.cache.ttl_secs = Some(ttl);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CacheType, Cli};
    use clap::Parser;
    use cruiser_config::{CacheKind, CruiserConfig};
    use std::path::PathBuf;

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "cruiser",
            "--port",
            "3000",
            "--origin",
            "http://dummyjson.com",
            "--cache-type",
            "disk",
            "--cache-dir",
            "/tmp/cruiser",
            "--cache-ttl-secs",
            "30",
        ])
        .expect("valid flags");

        let mut cfg = CruiserConfig::default();
        cfg.proxy.port = 8080;
        cli.apply_to(&mut cfg);

        assert_eq!(cfg.proxy.port, 3000);
        assert_eq!(cfg.proxy.origin, "http://dummyjson.com");
        assert_eq!(cfg.cache.kind, CacheKind::Disk);
        assert_eq!(cfg.cache.dir, PathBuf::from("/tmp/cruiser"));
        assert_eq!(cfg.cache.ttl_secs, Some(30));
        assert!(!cli.clear_cache);
    }

    #[test]
    fn absent_flags_keep_loaded_values() {
        let cli = Cli::try_parse_from(["cruiser", "--clear-cache"]).expect("valid flags");

        let mut cfg = CruiserConfig::default();
        cfg.proxy.port = 8080;
        cfg.proxy.origin = "http://a.test".into();
        cli.apply_to(&mut cfg);

        assert!(cli.clear_cache);
        assert_eq!(cfg.proxy.port, 8080);
        assert_eq!(cfg.proxy.origin, "http://a.test");
        assert_eq!(cfg.cache.kind, CacheKind::Memory);
    }

    #[test]
    fn unknown_cache_type_is_a_usage_error() {
        let err = Cli::try_parse_from(["cruiser", "--cache-type", "redis"]).expect_err("rejected");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn cache_type_maps_to_kind() {
        assert_eq!(CacheKind::from(CacheType::Memory), CacheKind::Memory);
        assert_eq!(CacheKind::from(CacheType::Disk), CacheKind::Disk);
    }
}
