//! Canonical message construction for signed HTTP requests.
//!
//! Both sides of the protocol reduce a request to the same byte string:
//!
//! ```text
//! METHOD || HOST || ESCAPED_PATH || CANONICAL_QUERY || TIMESTAMP
//! ```
//!
//! concatenated with no separators. The fields are self-delimiting for the
//! character sets HTTP allows in practice; callers must not feed values that
//! could splice across field boundaries (e.g. a host ending in a path-like
//! suffix). The query string is canonicalized so that the client (signing
//! from the pre-send URL) and the server (re-signing from the parsed query)
//! always agree byte-for-byte, no matter how the parameters were ordered or
//! percent-encoded on the wire.

use std::collections::BTreeMap;

use http::header::HOST;
use http::{HeaderMap, Request, Uri};

/// Build the canonical message over the five request components.
///
/// An empty escaped path is normalized to `/` (HTTP treats the empty and
/// root path as equivalent). No other normalization is applied; `method`,
/// `host` and `timestamp` are included as given and `canonical_query` is
/// expected to come from [`build_canonical_query`].
///
/// # Examples
///
/// ```
/// use httpsign_http::canonical::build_canonical_message;
///
/// let message = build_canonical_message(
///     "GET",
///     "example.com",
///     "/r",
///     "a=3&b=1&b=2",
///     "2024-01-01T00:00:00Z",
/// );
/// assert_eq!(message, "GETexample.com/ra=3&b=1&b=22024-01-01T00:00:00Z");
/// ```
#[must_use]
pub fn build_canonical_message(
    method: &str,
    host: &str,
    path: &str,
    canonical_query: &str,
    timestamp: &str,
) -> String {
    let path = if path.is_empty() { "/" } else { path };
    format!("{method}{host}{path}{canonical_query}{timestamp}")
}

/// Build the canonical query string from a raw query string.
///
/// The raw query is parsed into a key → values multimap, keys are sorted
/// lexicographically, the values under each key are sorted lexicographically,
/// and the pairs are re-encoded as `key=value` joined with `&`. The result
/// is a pure function of the multimap: parameter order and equivalent
/// percent-encodings on the wire do not affect it. An empty query produces
/// the empty string.
///
/// # Examples
///
/// ```
/// use httpsign_http::canonical::build_canonical_query;
///
/// assert_eq!(build_canonical_query(""), "");
/// assert_eq!(build_canonical_query("b=2&a=3&b=1"), "a=3&b=1&b=2");
/// ```
#[must_use]
pub fn build_canonical_query(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    // Decode into a multimap keyed by sorted key, then re-encode with one
    // serializer so both sides of the protocol produce identical escaping.
    let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        params
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, mut values) in params {
        values.sort_unstable();
        for value in values {
            serializer.append_pair(&key, &value);
        }
    }
    serializer.finish()
}

/// Resolve the host a request addresses.
///
/// Prefers the `Host` header (what a server sees on HTTP/1.1), falling back
/// to the URI authority (what a client-side request carries before the
/// `Host` header has been synthesized). Clients and servers resolve the same
/// value either way, which keeps the two canonical reconstructions aligned.
#[must_use]
pub fn request_host(uri: &Uri, headers: &HeaderMap) -> String {
    if let Some(value) = headers.get(HOST) {
        if let Ok(host) = value.to_str() {
            return host.to_owned();
        }
    }

    match uri.authority() {
        Some(authority) => match authority.port() {
            Some(port) => format!("{}:{}", authority.host(), port),
            None => authority.host().to_owned(),
        },
        None => String::new(),
    }
}

/// Build the canonical message for a request with the given timestamp.
///
/// This is the shared reconstruction used by both the outbound signer (with
/// a freshly generated timestamp) and the inbound verifier (with the
/// timestamp echoed from the request headers).
#[must_use]
pub fn request_message<B>(req: &Request<B>, timestamp: &str) -> String {
    let host = request_host(req.uri(), req.headers());
    let query = build_canonical_query(req.uri().query().unwrap_or(""));
    build_canonical_message(
        req.method().as_str(),
        &host,
        req.uri().path(),
        &query,
        timestamp,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_encode_empty_query_as_empty_string() {
        assert_eq!(build_canonical_query(""), "");
    }

    #[test]
    fn test_should_encode_single_pair() {
        assert_eq!(build_canonical_query("k=v"), "k=v");
    }

    #[test]
    fn test_should_sort_keys() {
        assert_eq!(build_canonical_query("k2=v2&k1=v1"), "k1=v1&k2=v2");
        assert_eq!(build_canonical_query("b=2&a=1&c=3"), "a=1&b=2&c=3");
    }

    #[test]
    fn test_should_sort_values_under_duplicate_keys() {
        assert_eq!(
            build_canonical_query("k1=v1_2&k1=v1_1&k2=v2"),
            "k1=v1_1&k1=v1_2&k2=v2"
        );
        assert_eq!(build_canonical_query("k=v4&k=v3&k=v2&k=v1"), "k=v1&k=v2&k=v3&k=v4");
    }

    #[test]
    fn test_should_be_independent_of_parameter_order() {
        let orderings = [
            "k1=v1&k2=v2_1&k2=v2_2&k3=v3_1&k3=v3_2",
            "k3=v3_2&k3=v3_1&k2=v2_2&k2=v2_1&k1=v1",
            "k2=v2_2&k1=v1&k3=v3_1&k2=v2_1&k3=v3_2",
        ];
        for raw in orderings {
            assert_eq!(
                build_canonical_query(raw),
                "k1=v1&k2=v2_1&k2=v2_2&k3=v3_1&k3=v3_2",
                "ordering {raw:?} should canonicalize identically"
            );
        }
    }

    #[test]
    fn test_should_canonicalize_mixed_duplicate_and_single_keys() {
        assert_eq!(build_canonical_query("b=2&b=1&a=3"), "a=3&b=1&b=2");
    }

    #[test]
    fn test_should_normalize_equivalent_percent_encodings() {
        // %68%69 is "hi"; both spellings decode to the same pair and
        // re-encode identically.
        assert_eq!(
            build_canonical_query("k=%68%69"),
            build_canonical_query("k=hi")
        );
    }

    #[test]
    fn test_should_escape_reserved_characters_consistently() {
        // The serializer, not the wire form, decides the escaping.
        assert_eq!(build_canonical_query("k=a%20b"), "k=a+b");
        assert_eq!(build_canonical_query("k=a+b"), "k=a+b");
        assert_eq!(build_canonical_query("k=a%26b"), "k=a%26b");
    }

    #[test]
    fn test_should_keep_valueless_keys() {
        assert_eq!(build_canonical_query("k"), "k=");
        assert_eq!(build_canonical_query("k="), "k=");
    }

    #[test]
    fn test_should_concatenate_fields_without_separators() {
        let message = build_canonical_message(
            "GET",
            "example.com",
            "/r",
            &build_canonical_query("b=2&b=1&a=3"),
            "2024-01-01T00:00:00Z",
        );
        assert_eq!(message, "GETexample.com/ra=3&b=1&b=22024-01-01T00:00:00Z");
    }

    #[test]
    fn test_should_normalize_empty_path_to_slash() {
        let message = build_canonical_message("GET", "example.com", "", "", "2024-01-01T00:00:00Z");
        assert_eq!(message, "GETexample.com/2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_should_resolve_host_from_header_first() {
        let req = Request::builder()
            .uri("http://internal:8080/p")
            .header(HOST, "public.example.com")
            .body(())
            .unwrap();
        assert_eq!(
            request_host(req.uri(), req.headers()),
            "public.example.com"
        );
    }

    #[test]
    fn test_should_resolve_host_from_uri_authority() {
        let req = Request::builder()
            .uri("http://example.com:8080/p")
            .body(())
            .unwrap();
        assert_eq!(request_host(req.uri(), req.headers()), "example.com:8080");
    }

    #[test]
    fn test_should_resolve_empty_host_for_origin_form_without_header() {
        let req = Request::builder().uri("/p").body(()).unwrap();
        assert_eq!(request_host(req.uri(), req.headers()), "");
    }

    #[test]
    fn test_should_build_identical_messages_for_reordered_queries() {
        let first = Request::builder()
            .uri("http://example.com/r?b=2&b=1&a=3")
            .body(())
            .unwrap();
        let second = Request::builder()
            .uri("http://example.com/r?a=3&b=1&b=2")
            .body(())
            .unwrap();

        assert_eq!(
            request_message(&first, "2024-01-01T00:00:00Z"),
            request_message(&second, "2024-01-01T00:00:00Z")
        );
    }
}
