//! Inbound verification middleware.
//!
//! [`VerifyService`] wraps a downstream handler service. Every incoming
//! request has its canonical message rebuilt from the parsed request
//! components plus the caller-supplied timestamp header; the signature
//! header is decoded and checked against it. Authentic requests are passed
//! through untouched, everything else is answered by the configured
//! [`ErrorPolicy`] without ever reaching the handler.
//!
//! Verification is stateless per call: the service holds only the shared
//! verifier, the config, and the inner service, all of them immutable.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use hyper::service::Service;
use tracing::{debug, warn};

use httpsign_core::Verifier;

use crate::canonical::request_message;
use crate::envelope::SignatureEnvelope;
use crate::error::VerifyError;
use crate::policy::{DefaultErrorPolicy, ErrorPolicy};

/// Configuration for the verification middleware.
#[derive(Clone)]
pub struct VerifyConfig {
    /// Maps verification failures to HTTP responses.
    pub error_policy: Arc<dyn ErrorPolicy>,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            error_policy: Arc::new(DefaultErrorPolicy),
        }
    }
}

impl std::fmt::Debug for VerifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifyConfig")
            .field("error_policy", &"...")
            .finish()
    }
}

/// Middleware service that verifies request signatures before dispatching
/// to the wrapped service.
pub struct VerifyService<S> {
    inner: S,
    verifier: Arc<dyn Verifier>,
    config: Arc<VerifyConfig>,
}

impl<S> VerifyService<S> {
    /// Wrap `inner` with signature verification using the default
    /// configuration.
    pub fn new(verifier: Arc<dyn Verifier>, inner: S) -> Self {
        Self::with_config(verifier, inner, VerifyConfig::default())
    }

    /// Wrap `inner` with signature verification using the given
    /// configuration.
    pub fn with_config(verifier: Arc<dyn Verifier>, inner: S, config: VerifyConfig) -> Self {
        Self {
            inner,
            verifier,
            config: Arc::new(config),
        }
    }
}

impl<S: Clone> Clone for VerifyService<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            verifier: Arc::clone(&self.verifier),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S> std::fmt::Debug for VerifyService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifyService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Verify the signature of an incoming request.
///
/// Rebuilds the canonical message from the request's parsed components and
/// the timestamp header, decodes the signature header, and asks the
/// verifier.
///
/// # Errors
///
/// Returns a [`VerifyError`] classified for the error policy: encoding and
/// mismatch failures are verification errors, verifier failures are not.
pub fn verify_request<B>(verifier: &dyn Verifier, req: &Request<B>) -> Result<(), VerifyError> {
    let envelope = SignatureEnvelope::from_headers(req.headers())?;
    let message = request_message(req, &envelope.timestamp);

    debug!(
        method = %req.method(),
        uri = %req.uri(),
        canonical = %message,
        "verifying request signature"
    );

    match verifier.verify(message.as_bytes(), &envelope.signature) {
        Ok(true) => Ok(()),
        Ok(false) => Err(VerifyError::SignatureMismatch),
        Err(err) => Err(VerifyError::Capability(err)),
    }
}

impl<S, B, RB> Service<Request<B>> for VerifyService<S>
where
    S: Service<Request<B>, Response = Response<RB>>,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    RB: http_body::Body<Data = Bytes> + Send + 'static,
{
    type Response = Response<VerifyBody<RB>>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<B>) -> Self::Future {
        match verify_request(self.verifier.as_ref(), &req) {
            Ok(()) => {
                let future = self.inner.call(req);
                Box::pin(async move {
                    let response = future.await?;
                    Ok(response.map(|body| VerifyBody::Downstream { inner: body }))
                })
            }
            Err(err) => {
                warn!(method = %req.method(), uri = %req.uri(), error = %err, "rejecting request");
                let response = self
                    .config
                    .error_policy
                    .response(&err)
                    .map(|body| VerifyBody::Rejection { inner: body });
                Box::pin(std::future::ready(Ok(response)))
            }
        }
    }
}

pin_project_lite::pin_project! {
    /// Response body of [`VerifyService`]: either the downstream handler's
    /// body or the buffered rejection body produced by the error policy.
    #[project = VerifyBodyProj]
    pub enum VerifyBody<B> {
        /// Body produced by the wrapped service.
        Downstream {
            #[pin]
            inner: B,
        },
        /// Buffered body produced by the error policy.
        Rejection {
            #[pin]
            inner: Full<Bytes>,
        },
    }
}

impl<B> http_body::Body for VerifyBody<B>
where
    B: http_body::Body<Data = Bytes>,
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<http_body::Frame<Self::Data>, Self::Error>>> {
        match self.project() {
            VerifyBodyProj::Downstream { inner } => inner.poll_frame(cx),
            VerifyBodyProj::Rejection { inner } => {
                inner.poll_frame(cx).map_err(|never| match never {})
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            Self::Downstream { inner } => inner.is_end_stream(),
            Self::Rejection { inner } => inner.is_end_stream(),
        }
    }

    fn size_hint(&self) -> http_body::SizeHint {
        match self {
            Self::Downstream { inner } => inner.size_hint(),
            Self::Rejection { inner } => inner.size_hint(),
        }
    }
}

impl<B> std::fmt::Debug for VerifyBody<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Downstream { .. } => f.write_str("VerifyBody::Downstream"),
            Self::Rejection { .. } => f.write_str("VerifyBody::Rejection"),
        }
    }
}
