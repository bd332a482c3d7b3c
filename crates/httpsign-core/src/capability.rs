//! The signature capability boundary.
//!
//! [`Signer`] and [`Verifier`] are the only interface the HTTP layer depends
//! on; every algorithm backend in this crate implements one or both. They are
//! deliberately minimal: a signer turns message bytes into signature bytes,
//! a verifier decides whether signature bytes match message bytes.
//!
//! A signing backend always implements `Verifier` as well (signing key
//! material subsumes the verifying half), while the standalone verifier types
//! can be built from public key material alone and handed to parties that
//! must not be able to sign.

use crate::error::SignatureError;

/// Signs messages.
///
/// Implementations must be safe for unsynchronized concurrent use from
/// multiple tasks or threads; none of the backends in this crate hold
/// mutable state.
pub trait Signer: Send + Sync {
    /// Sign a message, returning the raw signature bytes.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignatureError>;
}

/// Verifies message signatures.
///
/// Implementations must be safe for unsynchronized concurrent use from
/// multiple tasks or threads.
pub trait Verifier: Send + Sync {
    /// Verify the signature of a message.
    ///
    /// Returns `Ok(false)` when the signature is well-formed for the
    /// algorithm but does not match the message (including undecodable
    /// signature bytes), and `Err` only for failures unrelated to the
    /// match itself.
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, SignatureError>;
}
