//! The signature envelope: the two headers carried by a signed request.
//!
//! | Header | Content |
//! |--------|---------|
//! | `X-Signature-Timestamp` | RFC-3339 UTC timestamp, generated by the sender |
//! | `X-Signature` | base64url (no padding) encoding of the raw signature bytes |
//!
//! The timestamp is opaque to this layer: it is echoed verbatim into the
//! canonical message on both sides and never validated against the clock.
//! Freshness enforcement, if wanted, belongs to the caller.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{SecondsFormat, Utc};
use http::header::HeaderName;
use http::{HeaderMap, HeaderValue};

use crate::error::VerifyError;

/// Header carrying the signature timestamp.
pub static TIMESTAMP_HEADER: HeaderName = HeaderName::from_static("x-signature-timestamp");

/// Header carrying the base64url-encoded signature.
pub static SIGNATURE_HEADER: HeaderName = HeaderName::from_static("x-signature");

/// The two header values attached by the signer and read back by the
/// verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureEnvelope {
    /// RFC-3339 UTC timestamp string, as generated or as received.
    pub timestamp: String,
    /// Raw (decoded) signature bytes.
    pub signature: Vec<u8>,
}

impl SignatureEnvelope {
    /// Create an envelope from a timestamp and raw signature bytes.
    #[must_use]
    pub fn new(timestamp: impl Into<String>, signature: Vec<u8>) -> Self {
        Self {
            timestamp: timestamp.into(),
            signature,
        }
    }

    /// Insert both headers into the given header map.
    pub fn apply(&self, headers: &mut HeaderMap) {
        let timestamp = HeaderValue::from_str(&self.timestamp)
            .expect("RFC-3339 timestamps are valid header values");
        let signature = HeaderValue::from_str(&URL_SAFE_NO_PAD.encode(&self.signature))
            .expect("base64url strings are valid header values");
        headers.insert(&TIMESTAMP_HEADER, timestamp);
        headers.insert(&SIGNATURE_HEADER, signature);
    }

    /// Read the envelope back from a header map.
    ///
    /// The timestamp is read verbatim; a missing or unreadable timestamp
    /// header yields the empty string, which simply fails to verify later.
    /// The signature header is decoded as base64url without padding; a
    /// missing header decodes to an empty signature, while an undecodable
    /// one is a verification error.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::InvalidSignatureEncoding`] if the signature
    /// header is not a readable base64url value.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, VerifyError> {
        let timestamp = headers
            .get(&TIMESTAMP_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();

        let encoded = match headers.get(&SIGNATURE_HEADER) {
            Some(value) => value
                .to_str()
                .map_err(|err| VerifyError::InvalidSignatureEncoding(err.to_string()))?,
            None => "",
        };
        let signature = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|err| VerifyError::InvalidSignatureEncoding(err.to_string()))?;

        Ok(Self {
            timestamp,
            signature,
        })
    }
}

/// The current UTC time in the RFC-3339 form used for signature timestamps,
/// e.g. `2024-01-01T00:00:00Z`.
#[must_use]
pub fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
