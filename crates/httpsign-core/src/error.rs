//! Error types for signature capabilities.
//!
//! Backend construction preconditions (key length, key validity) and runtime
//! signing/verification failures are all represented by [`SignatureError`].
//! A signature that simply does not match is *not* an error — capabilities
//! report that as `Ok(false)` from [`Verifier::verify`](crate::Verifier::verify).

/// Errors raised by signature capability backends.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// The provided key material has the wrong length for the algorithm.
    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// The key length the algorithm requires.
        expected: usize,
        /// The length of the key material that was provided.
        actual: usize,
    },

    /// The provided key material could not be interpreted as a valid key.
    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    /// The backend failed while producing a signature.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// The backend failed while verifying a signature, for a reason other
    /// than the signature not matching.
    #[error("Verification failed: {0}")]
    Verification(String),
}
