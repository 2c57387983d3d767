use std::{sync::Arc, time::Duration};

use bytes::Bytes;
use cruiser_cache::{Cache, CacheKey, CachedResponse};
use cruiser_http::responses::{bad_gateway, internal_error};
use cruiser_http::{BoxError, ProxyBody};
use http::{Method, Request, Response};
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use tracing::{debug, error, info, instrument, warn};

use crate::ProxyError;

mod response;
mod upstream;

pub use response::{CACHE_STATUS_HEADER, CacheStatus};
pub use upstream::Origin;

/// =======================================================
/// PROXY STATE
/// =======================================================
///
/// Everything a request handler needs, shared behind an `Arc<ProxyServer>`
/// by every connection task:
/// - the origin base URL
/// - one pooled HTTP client (no timeouts, no retries)
/// - the cache, injected as a trait object so any backend (or a test fake)
///   can be plugged in
pub struct ProxyServer {
    origin: Origin,
    client: Client<HttpConnector, ProxyBody>,
    cache: Arc<dyn Cache>,

    /// When set, misses are stored with this TTL instead of forever.
    default_ttl: Option<Duration>,
}

impl ProxyServer {
    pub fn new(origin: &str, cache: Arc<dyn Cache>) -> Result<Self, ProxyError> {
        let origin = Origin::parse(origin)?;
        let client = Client::builder(TokioExecutor::new()).build_http();

        Ok(Self {
            origin,
            client,
            cache,
            default_ttl: None,
        })
    }

    pub fn with_default_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Entry point for every client request.
    ///
    /// - non-GET: forwarded and streamed back, cache untouched, `X-Cache: MISS`
    /// - GET hit: stored status/headers/body replayed, `X-Cache: HIT`
    /// - GET miss: forwarded, body buffered, stored, replied with `X-Cache: MISS`
    ///
    /// Failures never escape: transport errors become 502, a broken origin
    /// body becomes 500, and neither is cached.
    #[instrument(
        skip_all,
        fields(method = %req.method(), uri = %req.uri())
    )]
    pub async fn handle<B>(&self, req: Request<B>) -> Response<ProxyBody>
    where
        B: hyper::body::Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        info!(target: "cruiser::proxy", "Received request");

        if req.method() != Method::GET {
            return self.pass_through(req).await;
        }

        let key = CacheKey::from_request(&req);

        if let Some(cached) = self.cache.get(&key).await {
            debug!(target: "cruiser::proxy", cache_key = %key, "Cache HIT");
            return response::replay(&cached, CacheStatus::Hit);
        }

        debug!(target: "cruiser::proxy", cache_key = %key, "Cache MISS");

        let upstream = match self.forward(req).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(target: "cruiser::proxy", cache_key = %key, error = %e, "Origin request failed");
                return bad_gateway();
            }
        };

        let (parts, body) = upstream.into_parts();
        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                error!(target: "cruiser::proxy", cache_key = %key, error = %e, "Error reading origin response body");
                return internal_error();
            }
        };

        let cached = CachedResponse::new(
            parts.status,
            response::cacheable_headers(&parts.headers),
            body,
        );
        let resp = response::replay(&cached, CacheStatus::Miss);
        self.store(key, cached).await;

        resp
    }

    async fn pass_through<B>(&self, req: Request<B>) -> Response<ProxyBody>
    where
        B: hyper::body::Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        match self.forward(req).await {
            Ok(upstream) => {
                let (parts, body) = upstream.into_parts();
                response::relay(parts, body)
            }
            Err(e) => {
                warn!(target: "cruiser::proxy", error = %e, "Origin request failed");
                bad_gateway()
            }
        }
    }

    async fn forward<B>(&self, req: Request<B>) -> Result<Response<Incoming>, ProxyError>
    where
        B: hyper::body::Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        let outbound = upstream::origin_request(&self.origin, req)?;

        debug!(
            target: "cruiser::proxy",
            method = %outbound.method(),
            url = %outbound.uri(),
            "Forwarding to origin"
        );

        Ok(self.client.request(outbound).await?)
    }

    async fn store(&self, key: CacheKey, cached: CachedResponse) {
        match self.default_ttl {
            Some(ttl) => self.cache.set_with_expiry(key, cached, ttl).await,
            None => self.cache.set(key, cached).await,
        }
    }
}
