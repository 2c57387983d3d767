use http::{HeaderMap, HeaderName};

/// Hop-by-hop headers describe one connection and are owned by the
/// transport on each side of the proxy.
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-connection"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}

/// Appends every end-to-end header of `src` to `dst`, keeping repeated
/// values and their order.
pub fn copy_end_to_end(src: &HeaderMap, dst: &mut HeaderMap) {
    for (name, value) in src.iter() {
        if is_hop_by_hop(name) {
            continue;
        }
        dst.append(name.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::{copy_end_to_end, is_hop_by_hop};
    use http::{HeaderMap, HeaderValue, header};

    #[test]
    fn hop_by_hop_detection() {
        assert!(is_hop_by_hop(&header::CONNECTION));
        assert!(is_hop_by_hop(&header::TRANSFER_ENCODING));
        assert!(!is_hop_by_hop(&header::CONTENT_TYPE));
        assert!(!is_hop_by_hop(&header::CONTENT_LENGTH));
    }

    #[test]
    fn copy_keeps_repeated_values_and_drops_hop_by_hop() {
        let mut src = HeaderMap::new();
        src.append(header::SET_COOKIE, HeaderValue::from_static("a=1"));
        src.append(header::SET_COOKIE, HeaderValue::from_static("b=2"));
        src.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        src.insert("x-test", HeaderValue::from_static("1"));

        let mut dst = HeaderMap::new();
        copy_end_to_end(&src, &mut dst);

        let cookies: Vec<_> = dst.get_all(header::SET_COOKIE).iter().collect();
        assert_eq!(cookies, vec!["a=1", "b=2"]);
        assert_eq!(dst.get("x-test").map(|v| v.as_bytes()), Some(&b"1"[..]));
        assert!(!dst.contains_key(header::CONNECTION));
    }
}
