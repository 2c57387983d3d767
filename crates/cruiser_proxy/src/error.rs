#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("invalid origin URL '{url}': {source}")]
    InvalidOrigin {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("origin URL '{0}' must use the http scheme")]
    UnsupportedScheme(String),

    #[error("cannot build origin request URI '{uri}': {source}")]
    TargetUri {
        uri: String,
        #[source]
        source: http::Error,
    },

    #[error("origin request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),
}
