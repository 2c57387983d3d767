use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::info;

use crate::validation::{ConfigReport, validate};
use crate::{CacheConfig, ConfigError, ProxyConfig};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "cruiser.toml";

/// Environment overrides: `CRUISER_PROXY__PORT=8080`, `CRUISER_CACHE__TYPE=disk`...
pub const ENV_PREFIX: &str = "CRUISER";

// =======================================================
// CRUISER CONFIG: root of cruiser.toml
// =======================================================
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CruiserConfig {
    #[serde(default)]
    pub proxy: ProxyConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

impl CruiserConfig {
    pub fn proxy(&self) -> &ProxyConfig {
        &self.proxy
    }

    pub fn cache(&self) -> &CacheConfig {
        &self.cache
    }

    /// Layers defaults, the TOML file and `CRUISER_*` variables, in that order.
    ///
    /// An explicit `path` must exist; the default `cruiser.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, environment())
    }

    pub(crate) fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => File::new(&p.to_string_lossy(), FileFormat::Toml).required(true),
            None => File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false),
        };

        let built = Config::builder().add_source(file).add_source(env).build()?;
        Ok(built.try_deserialize()?)
    }

    /// Validate the configuration and return a report of warnings and errors.
    pub fn validate(&self) -> ConfigReport {
        validate(self)
    }

    /// Like [`validate`](Self::validate), but errors become a [`ConfigError`].
    pub fn check(&self) -> Result<ConfigReport, ConfigError> {
        let report = self.validate();
        if report.has_errors() {
            return Err(ConfigError::Invalid(report.format()));
        }
        Ok(report)
    }

    pub fn log_summary(&self) {
        info!(
            target: "cruiser::config",
            port = self.proxy.port,
            origin = %self.proxy.origin,
            cache_type = %self.cache.kind,
            cache_dir = %self.cache.dir.display(),
            cache_ttl_secs = ?self.cache.ttl_secs,
            "Configuration loaded"
        );
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::{CruiserConfig, environment};
    use crate::{CacheKind, ConfigError};
    use config::Environment;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    fn env(pairs: &[(&str, &str)]) -> Environment {
        environment().source(Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ))
    }

    #[test]
    fn explicit_file_must_exist() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("absent.toml");
        let err = CruiserConfig::load_with_env(Some(&missing), env(&[]))
            .expect_err("explicit file must exist");
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn defaults() {
        let cfg = CruiserConfig::default();
        assert_eq!(cfg.proxy.port, 0);
        assert!(cfg.proxy.origin.is_empty());
        assert_eq!(cfg.cache.kind, CacheKind::Memory);
        assert_eq!(cfg.cache.dir, PathBuf::from("./disk-cache-data"));
        assert_eq!(cfg.cache.ttl(), None);
    }

    #[test]
    fn file_values_are_loaded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cruiser.toml");
        std::fs::write(
            &path,
            "[proxy]\nport = 3000\norigin = \"http://dummyjson.com\"\n\n[cache]\ntype = \"disk\"\ndir = \"/tmp/cruiser\"\nttl_secs = 60\n",
        )
        .expect("write config");

        let cfg = CruiserConfig::load_with_env(Some(&path), env(&[])).expect("config");

        assert_eq!(cfg.proxy.port, 3000);
        assert_eq!(cfg.proxy.origin, "http://dummyjson.com");
        assert_eq!(cfg.cache.kind, CacheKind::Disk);
        assert_eq!(cfg.cache.dir(), Path::new("/tmp/cruiser"));
        assert_eq!(cfg.cache.ttl(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cruiser.toml");
        std::fs::write(&path, "[proxy]\nport = 3000\norigin = \"http://a.test\"\n")
            .expect("write config");

        let cfg = CruiserConfig::load_with_env(
            Some(&path),
            env(&[
                ("CRUISER_PROXY__PORT", "4000"),
                ("CRUISER_CACHE__TYPE", "disk"),
            ]),
        )
        .expect("config");

        assert_eq!(cfg.proxy.port, 4000);
        assert_eq!(cfg.proxy.origin, "http://a.test");
        assert_eq!(cfg.cache.kind, CacheKind::Disk);
    }

    #[test]
    fn unknown_cache_type_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cruiser.toml");
        std::fs::write(&path, "[cache]\ntype = \"redis\"\n").expect("write config");

        let err = CruiserConfig::load_with_env(Some(&path), env(&[])).expect_err("must fail");
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn check_turns_errors_into_config_error() {
        let cfg = CruiserConfig::default();
        let err = cfg.check().expect_err("port and origin are missing");
        let ConfigError::Invalid(message) = err else {
            panic!("expected invalid configuration");
        };
        assert!(message.contains("proxy.port"));
        assert!(message.contains("proxy.origin"));
    }
}
