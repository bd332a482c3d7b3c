//! Error policy: maps verification failures to HTTP responses.
//!
//! The middleware never writes responses for failed requests itself; it asks
//! its configured [`ErrorPolicy`]. The default policy performs exactly the
//! two-way classification the protocol defines and nothing else. Callers may
//! substitute their own policy (e.g. to log rejections or attach headers) as
//! long as it preserves that classification.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Response, StatusCode};
use http_body_util::Full;

use crate::error::VerifyError;

/// Produces the HTTP response for a request that failed verification.
pub trait ErrorPolicy: Send + Sync {
    /// Build the response for the given verification failure.
    fn response(&self, err: &VerifyError) -> Response<Full<Bytes>>;
}

/// The default policy:
///
/// - verification errors (bad signature, undecodable signature header) map
///   to `401 Unauthorized`;
/// - any other error maps to `500 Internal Server Error`.
///
/// The body is the plain status text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorPolicy;

impl ErrorPolicy for DefaultErrorPolicy {
    fn response(&self, err: &VerifyError) -> Response<Full<Bytes>> {
        let status = if err.is_verification() {
            StatusCode::UNAUTHORIZED
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        status_text_response(status)
    }
}

/// Build a plain-text response carrying the status text of `status`.
#[must_use]
pub fn status_text_response(status: StatusCode) -> Response<Full<Bytes>> {
    let text = status.canonical_reason().unwrap_or_default();
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(format!("{text}\n"))))
        .expect("static response parts are valid")
}
