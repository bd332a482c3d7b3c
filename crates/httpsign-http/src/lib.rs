//! Signing transport and verification middleware for HTTP requests.
//!
//! This crate implements the wire protocol around the capability traits from
//! `httpsign-core`: a client-side service wrapper that signs outgoing
//! requests and a server-side middleware that verifies them before they
//! reach application logic. It authenticates the request line — method,
//! host, path, query — plus a sender-chosen timestamp; bodies are not
//! covered, and confidentiality is TLS's job.
//!
//! # Architecture
//!
//! ```text
//! Client                                        Server
//!   -> SignService (hyper Service wrapper)        -> VerifyService (middleware)
//!     -> canonical message (fresh timestamp)        -> canonical message (timestamp header)
//!     -> Signer::sign                               -> base64url-decode X-Signature
//!     -> attach X-Signature-Timestamp,              -> Verifier::verify
//!        X-Signature                                -> ok: downstream handler
//!     -> underlying sender                          -> failure: ErrorPolicy (401 / 500)
//! ```
//!
//! Both sides reduce the request to the same canonical byte string:
//!
//! ```text
//! METHOD || HOST || ESCAPED_PATH || CANONICAL_QUERY || TIMESTAMP
//! ```
//!
//! The query string is re-canonicalized from the parsed parameters on both
//! sides (keys sorted, then values sorted within each key), so any
//! equivalent ordering or encoding of the same parameters verifies.
//!
//! # Modules
//!
//! - [`canonical`] — canonical message and query construction
//! - [`envelope`] — the two signature headers and their encoding
//! - [`transport`] — the outbound [`SignService`](transport::SignService)
//! - [`middleware`] — the inbound [`VerifyService`](middleware::VerifyService)
//! - [`policy`] — pluggable mapping from failures to HTTP responses
//! - [`error`] — error taxonomy for both sides
//!
//! # Usage
//!
//! ```rust
//! use std::convert::Infallible;
//! use std::sync::Arc;
//!
//! use bytes::Bytes;
//! use http::{Request, Response};
//! use http_body_util::Full;
//! use hyper::service::service_fn;
//! use httpsign_core::HmacKey;
//! use httpsign_http::middleware::VerifyService;
//! use httpsign_http::transport::SignService;
//!
//! // One shared key; asymmetric backends work the same way, with the
//! // server holding only the verifying half.
//! let key = Arc::new(HmacKey::new(b"shared secret"));
//!
//! // Server: wrap the application handler service.
//! let handler = service_fn(|_req: Request<()>| async {
//!     Ok::<_, Infallible>(Response::new(Full::new(Bytes::from_static(b"hello"))))
//! });
//! let app = VerifyService::new(key.clone(), handler);
//!
//! // Client: wrap the request-sending service. Here the "network" is the
//! // server service itself, which is also how the tests exercise the
//! // whole protocol in-process.
//! let client = SignService::new(key, app);
//! # let _ = client;
//! ```
//!
//! Neither wrapper enforces timestamp freshness or replay protection; both
//! are deliberately left to the caller.

pub mod canonical;
pub mod envelope;
pub mod error;
pub mod middleware;
pub mod policy;
pub mod transport;

pub use canonical::{build_canonical_message, build_canonical_query, request_message};
pub use envelope::{SIGNATURE_HEADER, SignatureEnvelope, TIMESTAMP_HEADER, current_timestamp};
pub use error::{BoxError, SignRequestError, VerifyError};
pub use middleware::{VerifyBody, VerifyConfig, VerifyService, verify_request};
pub use policy::{DefaultErrorPolicy, ErrorPolicy};
pub use transport::{SignService, sign_request};
