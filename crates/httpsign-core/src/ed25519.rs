//! Ed25519 signature backend.
//!
//! Ed25519 hashes internally and produces fixed 64-byte signatures; there is
//! no hash or randomness to configure. Key material is validated for length
//! at construction time.

use ed25519_dalek::{
    PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH, Signature, Signer as _, SigningKey, Verifier as _,
    VerifyingKey,
};

use crate::capability::{Signer, Verifier};
use crate::error::SignatureError;

/// Signs messages using Ed25519.
///
/// Also verifies: the signer carries the verifying half derived from its
/// private key.
pub struct Ed25519Signer {
    verifier: Ed25519Verifier,
    key: SigningKey,
}

impl Ed25519Signer {
    /// Create a new signer from an Ed25519 signing key.
    #[must_use]
    pub fn new(key: SigningKey) -> Self {
        let verifier = Ed25519Verifier::new(key.verifying_key());
        Self { verifier, key }
    }

    /// Create a new signer from a raw 32-byte secret key.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::InvalidKeyLength`] if `bytes` is not exactly
    /// 32 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        let bytes: &[u8; SECRET_KEY_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| SignatureError::InvalidKeyLength {
                    expected: SECRET_KEY_LENGTH,
                    actual: bytes.len(),
                })?;
        Ok(Self::new(SigningKey::from_bytes(bytes)))
    }

    /// The verifying half of this signer.
    #[must_use]
    pub fn verifier(&self) -> &Ed25519Verifier {
        &self.verifier
    }
}

impl Signer for Ed25519Signer {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignatureError> {
        Ok(self.key.sign(message).to_bytes().to_vec())
    }
}

impl Verifier for Ed25519Signer {
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, SignatureError> {
        self.verifier.verify(message, signature)
    }
}

impl std::fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519Signer").finish_non_exhaustive()
    }
}

/// Verifies Ed25519 message signatures.
///
/// Built from public key material only, so it can be distributed to parties
/// that verify but never sign.
#[derive(Clone)]
pub struct Ed25519Verifier {
    key: VerifyingKey,
}

impl Ed25519Verifier {
    /// Create a new verifier from an Ed25519 verifying key.
    #[must_use]
    pub fn new(key: VerifyingKey) -> Self {
        Self { key }
    }

    /// Create a new verifier from a raw 32-byte public key.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::InvalidKeyLength`] if `bytes` is not exactly
    /// 32 bytes long, or [`SignatureError::InvalidKey`] if the bytes do not
    /// encode a valid curve point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        let bytes: &[u8; PUBLIC_KEY_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| SignatureError::InvalidKeyLength {
                    expected: PUBLIC_KEY_LENGTH,
                    actual: bytes.len(),
                })?;
        VerifyingKey::from_bytes(bytes)
            .map(Self::new)
            .map_err(|err| SignatureError::InvalidKey(err.to_string()))
    }
}

impl Verifier for Ed25519Verifier {
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, SignatureError> {
        // A signature of the wrong length cannot match any message.
        let Ok(signature) = Signature::from_slice(signature) else {
            return Ok(false);
        };
        Ok(self.key.verify(message, &signature).is_ok())
    }
}

impl std::fmt::Debug for Ed25519Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519Verifier").finish_non_exhaustive()
    }
}
