use std::fmt;

use bytes::Bytes;
use cruiser_http::body::stream;
use cruiser_http::headers::copy_end_to_end;
use cruiser_http::{BoxError, ProxyBody};
use http::{Request, header};
use url::Url;

use crate::ProxyError;

/// Base URL every request is forwarded to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Origin {
    /// Serialized URL without trailing slashes, ready for concatenation.
    base: String,
}

impl Origin {
    pub fn parse(raw: &str) -> Result<Self, ProxyError> {
        let url = Url::parse(raw.trim()).map_err(|source| ProxyError::InvalidOrigin {
            url: raw.to_string(),
            source,
        })?;

        if url.scheme() != "http" {
            return Err(ProxyError::UnsupportedScheme(raw.to_string()));
        }

        let base = url.as_str().trim_end_matches('/').to_string();
        Ok(Self { base })
    }

    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// Origin base followed by the incoming path and query, untouched.
    pub fn target(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base, path_and_query)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}

/// Builds the outbound request: same method, origin URL + incoming target,
/// end-to-end headers copied, body streamed as-is.
///
/// `Host` is not copied; the client derives it from the origin URI.
pub(super) fn origin_request<B>(origin: &Origin, req: Request<B>) -> Result<Request<ProxyBody>, ProxyError>
where
    B: hyper::body::Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let (parts, body) = req.into_parts();
    let path = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let target = origin.target(path);

    let mut outbound = Request::builder()
        .method(parts.method.clone())
        .uri(target.as_str())
        .body(stream(body))
        .map_err(|source| ProxyError::TargetUri {
            uri: target.clone(),
            source,
        })?;

    copy_end_to_end(&parts.headers, outbound.headers_mut());
    outbound.headers_mut().remove(header::HOST);

    Ok(outbound)
}

#[cfg(test)]
mod tests {
    use super::{Origin, origin_request};
    use crate::ProxyError;
    use bytes::Bytes;
    use http::{HeaderValue, Method, Request, header};
    use http_body_util::Full;

    #[test]
    fn origin_trims_trailing_slash() {
        let origin = Origin::parse("http://127.0.0.1:8080/").expect("valid origin");
        assert_eq!(origin.as_str(), "http://127.0.0.1:8080");
        assert_eq!(origin.target("/a?x=1"), "http://127.0.0.1:8080/a?x=1");
    }

    #[test]
    fn origin_keeps_base_path() {
        let origin = Origin::parse("http://example.com/api").expect("valid origin");
        assert_eq!(origin.target("/users"), "http://example.com/api/users");
    }

    #[test]
    fn origin_rejects_garbage_and_other_schemes() {
        assert!(matches!(
            Origin::parse("not a url"),
            Err(ProxyError::InvalidOrigin { .. })
        ));
        assert!(matches!(
            Origin::parse(""),
            Err(ProxyError::InvalidOrigin { .. })
        ));
        assert!(matches!(
            Origin::parse("ftp://example.com"),
            Err(ProxyError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn origin_request_copies_method_target_and_headers() {
        let origin = Origin::parse("http://origin.test:9000").expect("valid origin");
        let req = Request::builder()
            .method(Method::POST)
            .uri("/b?q=1")
            .header(header::HOST, "proxy.local:8080")
            .header(header::CONNECTION, "keep-alive")
            .header("x-client", "abc")
            .header(header::ACCEPT, "text/plain")
            .header(header::ACCEPT, "application/json")
            .body(Full::new(Bytes::from_static(b"payload")))
            .expect("request");

        let outbound = origin_request(&origin, req).expect("outbound request");

        assert_eq!(outbound.method(), Method::POST);
        assert_eq!(outbound.uri(), "http://origin.test:9000/b?q=1");
        assert_eq!(
            outbound.headers().get("x-client"),
            Some(&HeaderValue::from_static("abc"))
        );
        assert_eq!(outbound.headers().get_all(header::ACCEPT).iter().count(), 2);
        assert!(!outbound.headers().contains_key(header::HOST));
        assert!(!outbound.headers().contains_key(header::CONNECTION));
    }
}
