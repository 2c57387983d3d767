use cruiser_cache::CachedResponse;
use cruiser_http::ProxyBody;
use cruiser_http::body::{full, stream};
use cruiser_http::headers::copy_end_to_end;
use http::{HeaderMap, HeaderName, HeaderValue, Response, response};
use hyper::body::Incoming;

/// Response header telling clients whether the cache answered.
pub const CACHE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-cache");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }

    fn header_value(self) -> HeaderValue {
        HeaderValue::from_static(self.as_str())
    }
}

/// Builds a client response from a buffered origin response.
pub(super) fn replay(cached: &CachedResponse, status: CacheStatus) -> Response<ProxyBody> {
    let mut resp = Response::new(full(cached.body.clone()));
    *resp.status_mut() = cached.status;
    *resp.headers_mut() = cached.headers.clone();
    resp.headers_mut()
        .insert(CACHE_STATUS_HEADER, status.header_value());
    resp
}

/// Streams an origin response straight through to the client.
pub(super) fn relay(parts: response::Parts, body: Incoming) -> Response<ProxyBody> {
    let mut resp = Response::new(stream(body));
    *resp.status_mut() = parts.status;
    copy_end_to_end(&parts.headers, resp.headers_mut());
    resp.headers_mut()
        .insert(CACHE_STATUS_HEADER, CacheStatus::Miss.header_value());
    resp
}

/// End-to-end headers of an origin response, as they will be stored.
pub(super) fn cacheable_headers(origin: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(origin.len());
    copy_end_to_end(origin, &mut headers);
    headers
}
