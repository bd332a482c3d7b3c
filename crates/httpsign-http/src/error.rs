//! Error types for the signing transport and verification middleware.

use httpsign_core::SignatureError;

/// Boxed error type used at the service boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while verifying an inbound request.
///
/// The two-way split consumed by the error policy: [`is_verification`]
/// distinguishes "this request is not authentic" (mapped to an
/// unauthorized-class response) from "something inside the verifier broke"
/// (mapped to an internal-error-class response).
///
/// [`is_verification`]: VerifyError::is_verification
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The signature header was missing, not valid base64url, or not a
    /// readable header value.
    #[error("Invalid signature encoding: {0}")]
    InvalidSignatureEncoding(String),

    /// The signature decoded cleanly but does not match the request.
    #[error("Signature does not match")]
    SignatureMismatch,

    /// The verifier backend failed for a reason other than a mismatch.
    #[error(transparent)]
    Capability(#[from] SignatureError),
}

impl VerifyError {
    /// Whether this error means the request failed authentication, as
    /// opposed to the verifier itself failing.
    #[must_use]
    pub fn is_verification(&self) -> bool {
        matches!(
            self,
            Self::InvalidSignatureEncoding(_) | Self::SignatureMismatch
        )
    }
}

/// Error raised when signing an outbound request fails.
///
/// The request is never handed to the underlying sender in this case.
#[derive(Debug, thiserror::Error)]
#[error("Sign request: {source}")]
pub struct SignRequestError {
    #[from]
    source: SignatureError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_classify_encoding_errors_as_verification() {
        let err = VerifyError::InvalidSignatureEncoding("bad padding".into());
        assert!(err.is_verification());
    }

    #[test]
    fn test_should_classify_mismatch_as_verification() {
        assert!(VerifyError::SignatureMismatch.is_verification());
    }

    #[test]
    fn test_should_classify_capability_failure_as_other() {
        let err = VerifyError::Capability(SignatureError::Verification("backend down".into()));
        assert!(!err.is_verification());
    }
}
