//! Outbound signing transport.
//!
//! [`SignService`] wraps an underlying request-sending service. Every
//! outgoing request is stamped with a fresh RFC-3339 UTC timestamp, reduced
//! to its canonical message, signed, and forwarded with the signature
//! envelope headers attached. If signing fails the request is dropped — the
//! underlying sender never sees it, and the body is released with it.
//!
//! The request is owned by the service for the duration of the call, so the
//! caller never observes a mutated request.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use http::Request;
use hyper::service::Service;
use tracing::debug;

use httpsign_core::Signer;

use crate::canonical::request_message;
use crate::envelope::{SignatureEnvelope, current_timestamp};
use crate::error::{BoxError, SignRequestError};

/// Transport service that signs outgoing requests before delegating to the
/// underlying sender.
pub struct SignService<S> {
    inner: S,
    signer: Arc<dyn Signer>,
}

impl<S> SignService<S> {
    /// Wrap `inner` so that every request it sends carries a signature
    /// envelope produced by `signer`.
    pub fn new(signer: Arc<dyn Signer>, inner: S) -> Self {
        Self { inner, signer }
    }
}

impl<S: Clone> Clone for SignService<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            signer: Arc::clone(&self.signer),
        }
    }
}

impl<S> std::fmt::Debug for SignService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignService").finish_non_exhaustive()
    }
}

/// Sign a request in place: build the canonical message over its current
/// components with a fresh timestamp, and attach the envelope headers.
///
/// # Errors
///
/// Returns a [`SignRequestError`] if the signer fails; the request headers
/// are left untouched in that case.
pub fn sign_request<B>(signer: &dyn Signer, req: &mut Request<B>) -> Result<(), SignRequestError> {
    let timestamp = current_timestamp();
    let message = request_message(req, &timestamp);

    debug!(method = %req.method(), uri = %req.uri(), canonical = %message, "signing request");

    let signature = signer.sign(message.as_bytes())?;
    SignatureEnvelope::new(timestamp, signature).apply(req.headers_mut());
    Ok(())
}

impl<S, B> Service<Request<B>> for SignService<S>
where
    S: Service<Request<B>>,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
    S::Error: Into<BoxError>,
{
    type Response = S::Response;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, mut req: Request<B>) -> Self::Future {
        if let Err(err) = sign_request(self.signer.as_ref(), &mut req) {
            // Never send an unsigned request; dropping it here also drops
            // the body before the underlying sender can take ownership.
            return Box::pin(std::future::ready(Err(err.into())));
        }

        let future = self.inner.call(req);
        Box::pin(async move { future.await.map_err(Into::into) })
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::sync::Mutex;

    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use http::{Response, StatusCode};
    use httpsign_core::SignatureError;

    use super::*;
    use crate::envelope::{SIGNATURE_HEADER, TIMESTAMP_HEADER};

    /// Signs every message with the same fixed bytes.
    struct FixedSigner(Vec<u8>);

    impl Signer for FixedSigner {
        fn sign(&self, _message: &[u8]) -> Result<Vec<u8>, SignatureError> {
            Ok(self.0.clone())
        }
    }

    /// Returns the message itself as its signature.
    struct IdentitySigner;

    impl Signer for IdentitySigner {
        fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignatureError> {
            Ok(message.to_vec())
        }
    }

    struct FailingSigner;

    impl Signer for FailingSigner {
        fn sign(&self, _message: &[u8]) -> Result<Vec<u8>, SignatureError> {
            Err(SignatureError::Signing("no entropy".into()))
        }
    }

    /// Records every request it is asked to send.
    #[derive(Clone, Default)]
    struct CaptureService {
        seen: Arc<Mutex<Vec<Request<()>>>>,
    }

    impl Service<Request<()>> for CaptureService {
        type Response = Response<()>;
        type Error = Infallible;
        type Future = std::future::Ready<Result<Self::Response, Self::Error>>;

        fn call(&self, req: Request<()>) -> Self::Future {
            self.seen.lock().unwrap().push(req);
            std::future::ready(Ok(Response::new(())))
        }
    }

    /// Always fails like a broken connection.
    #[derive(Clone)]
    struct BrokenService;

    impl Service<Request<()>> for BrokenService {
        type Response = Response<()>;
        type Error = std::io::Error;
        type Future = std::future::Ready<Result<Self::Response, Self::Error>>;

        fn call(&self, _req: Request<()>) -> Self::Future {
            std::future::ready(Err(std::io::Error::other("connection reset")))
        }
    }

    #[tokio::test]
    async fn test_should_attach_envelope_headers_and_forward() {
        let capture = CaptureService::default();
        let service = SignService::new(Arc::new(FixedSigner(vec![1, 2, 3])), capture.clone());

        let req = Request::builder()
            .uri("http://example.com/p?k=v")
            .body(())
            .unwrap();
        let response = service.call(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let seen = capture.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let sent = &seen[0];

        let timestamp = sent.headers().get(&TIMESTAMP_HEADER).unwrap();
        chrono::DateTime::parse_from_rfc3339(timestamp.to_str().unwrap())
            .expect("timestamp header should be RFC-3339");

        let signature = sent.headers().get(&SIGNATURE_HEADER).unwrap();
        assert_eq!(
            signature.to_str().unwrap(),
            URL_SAFE_NO_PAD.encode([1, 2, 3])
        );
    }

    #[tokio::test]
    async fn test_should_sign_the_canonical_message_of_the_sent_request() {
        let capture = CaptureService::default();
        let service = SignService::new(Arc::new(IdentitySigner), capture.clone());

        let req = Request::builder()
            .uri("http://example.com/r?b=2&b=1&a=3")
            .body(())
            .unwrap();
        service.call(req).await.unwrap();

        let seen = capture.seen.lock().unwrap();
        let sent = &seen[0];

        // Rebuilding the message from the request the sender received, with
        // the timestamp it carries, must reproduce the signed bytes exactly.
        let timestamp = sent
            .headers()
            .get(&TIMESTAMP_HEADER)
            .unwrap()
            .to_str()
            .unwrap();
        let expected = request_message(sent, timestamp);

        let signature = sent
            .headers()
            .get(&SIGNATURE_HEADER)
            .unwrap()
            .to_str()
            .unwrap();
        let signed = URL_SAFE_NO_PAD.decode(signature).unwrap();
        assert_eq!(signed, expected.into_bytes());
    }

    #[tokio::test]
    async fn test_should_not_send_request_when_signing_fails() {
        let capture = CaptureService::default();
        let service = SignService::new(Arc::new(FailingSigner), capture.clone());

        let req = Request::builder()
            .uri("http://example.com/p")
            .body(())
            .unwrap();
        let err = service.call(req).await.unwrap_err();

        assert!(err.to_string().contains("Sign request"), "error: {err}");
        assert!(capture.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_should_propagate_sender_errors_unchanged() {
        let service = SignService::new(Arc::new(FixedSigner(vec![9])), BrokenService);

        let req = Request::builder()
            .uri("http://example.com/p")
            .body(())
            .unwrap();
        let err = service.call(req).await.unwrap_err();

        assert!(err.to_string().contains("connection reset"), "error: {err}");
    }
}
