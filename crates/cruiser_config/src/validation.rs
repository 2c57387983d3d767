use std::fmt::{self, Write};
use std::path::Path;

use url::Url;

use crate::{CacheKind, CruiserConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// One finding about a configuration key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub severity: Severity,
    /// Dotted key as written in `cruiser.toml`, e.g. `proxy.origin`.
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Everything `validate` found, in discovery order.
#[derive(Debug, Default)]
pub struct ConfigReport {
    issues: Vec<Issue>,
}

impl ConfigReport {
    pub fn is_ok(&self) -> bool {
        !self.has_errors()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.with_severity(Severity::Warning)
    }

    /// One `[severity] field: message` line per issue, errors first.
    pub fn format(&self) -> String {
        let mut sorted: Vec<&Issue> = self.issues.iter().collect();
        sorted.sort_by_key(|issue| issue.severity);

        let mut out = String::new();
        for issue in sorted {
            let _ = writeln!(out, "[{}] {issue}", issue.severity.label());
        }
        out
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |issue| issue.severity == severity)
    }

    fn push(&mut self, severity: Severity, field: &'static str, message: impl Into<String>) {
        self.issues.push(Issue {
            severity,
            field,
            message: message.into(),
        });
    }
}

/// Validate a cruiser configuration and return a report of issues.
pub fn validate(cfg: &CruiserConfig) -> ConfigReport {
    let mut report = ConfigReport::default();

    validate_proxy(cfg, &mut report);
    validate_cache(cfg, &mut report);

    report
}

fn validate_proxy(cfg: &CruiserConfig, report: &mut ConfigReport) {
    if cfg.proxy.port == 0 {
        report.push(Severity::Error, "proxy.port", "required and must be non-zero (--port)");
    }

    let origin = cfg.proxy.origin.trim();
    if origin.is_empty() {
        report.push(Severity::Error, "proxy.origin", "required (--origin)");
        return;
    }

    match Url::parse(origin) {
        Ok(url) if url.scheme() != "http" => report.push(
            Severity::Error,
            "proxy.origin",
            format!(
                "'{origin}' uses scheme '{scheme}'; only http origins are supported",
                scheme = url.scheme()
            ),
        ),
        Ok(_) => {}
        Err(e) => report.push(
            Severity::Error,
            "proxy.origin",
            format!("'{origin}' is not a valid URL: {e}"),
        ),
    }
}

fn validate_cache(cfg: &CruiserConfig, report: &mut ConfigReport) {
    if cfg.cache.ttl_secs == Some(0) {
        report.push(Severity::Warning, "cache.ttl_secs", "is 0; responses will not be stored");
    }

    if cfg.cache.kind != CacheKind::Disk {
        return;
    }

    let dir = cfg.cache.dir.display();
    let path: &Path = &cfg.cache.dir;
    if path.exists() {
        if !path.is_dir() {
            report.push(
                Severity::Error,
                "cache.dir",
                format!("'{dir}' exists but is not a directory"),
            );
        }
    } else {
        report.push(
            Severity::Warning,
            "cache.dir",
            format!("'{dir}' does not exist; it will be created at startup"),
        );
    }
}
