//! Canned responses for failures the proxy answers itself.

use http::{HeaderValue, Response, StatusCode, header};

use crate::body::{ProxyBody, full};

/// Plain-text response with an explicit length.
pub fn text_response(status: StatusCode, body: &'static str) -> Response<ProxyBody> {
    let mut resp = Response::new(full(body));
    *resp.status_mut() = status;
    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    resp.headers_mut()
        .insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
    resp
}

pub fn bad_gateway() -> Response<ProxyBody> {
    text_response(StatusCode::BAD_GATEWAY, "Bad Gateway\n")
}

pub fn internal_error() -> Response<ProxyBody> {
    text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error\n")
}

#[cfg(test)]
mod tests {
    use super::{bad_gateway, internal_error};
    use http::{StatusCode, header};
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn bad_gateway_is_plain_text_502() {
        let resp = bad_gateway();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(resp.headers()[header::CONTENT_LENGTH], "12");

        let body = resp.into_body().collect().await.expect("body").to_bytes();
        assert_eq!(&body[..], b"Bad Gateway\n");
    }

    #[test]
    fn internal_error_is_500() {
        assert_eq!(internal_error().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
