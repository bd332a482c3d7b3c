//! ECDSA signature backend over the NIST P-256 curve.
//!
//! Messages are hashed with SHA-256 and signatures are produced in ASN.1 DER
//! form, the interchange encoding most tooling expects for ECDSA. Signing is
//! deterministic (RFC 6979), so no randomness source is needed at sign time.

use p256::ecdsa::signature::{Signer as _, Verifier as _};
use p256::ecdsa::{DerSignature, SigningKey, VerifyingKey};

use crate::capability::{Signer, Verifier};
use crate::error::SignatureError;

/// Signs messages using ECDSA over P-256 with SHA-256.
///
/// Also verifies: the signer carries the verifying half derived from its
/// private key.
pub struct EcdsaSigner {
    verifier: EcdsaVerifier,
    key: SigningKey,
}

impl EcdsaSigner {
    /// Create a new signer from a P-256 signing key.
    #[must_use]
    pub fn new(key: SigningKey) -> Self {
        let verifier = EcdsaVerifier::new(VerifyingKey::from(&key));
        Self { verifier, key }
    }

    /// Create a new signer from a raw 32-byte scalar.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::InvalidKey`] if the bytes are not a valid
    /// non-zero scalar for the curve.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        SigningKey::from_slice(bytes)
            .map(Self::new)
            .map_err(|err| SignatureError::InvalidKey(err.to_string()))
    }

    /// The verifying half of this signer.
    #[must_use]
    pub fn verifier(&self) -> &EcdsaVerifier {
        &self.verifier
    }
}

impl Signer for EcdsaSigner {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignatureError> {
        let signature: DerSignature = self.key.sign(message);
        Ok(signature.as_bytes().to_vec())
    }
}

impl Verifier for EcdsaSigner {
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, SignatureError> {
        self.verifier.verify(message, signature)
    }
}

impl std::fmt::Debug for EcdsaSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcdsaSigner").finish_non_exhaustive()
    }
}

/// Verifies ECDSA P-256 message signatures.
///
/// Built from public key material only, so it can be distributed to parties
/// that verify but never sign.
#[derive(Clone)]
pub struct EcdsaVerifier {
    key: VerifyingKey,
}

impl EcdsaVerifier {
    /// Create a new verifier from a P-256 verifying key.
    #[must_use]
    pub fn new(key: VerifyingKey) -> Self {
        Self { key }
    }

    /// Create a new verifier from a SEC1-encoded public key.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::InvalidKey`] if the bytes are not a valid
    /// SEC1 encoding of a curve point.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        VerifyingKey::from_sec1_bytes(bytes)
            .map(Self::new)
            .map_err(|err| SignatureError::InvalidKey(err.to_string()))
    }
}

impl Verifier for EcdsaVerifier {
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, SignatureError> {
        // An undecodable DER blob cannot match any message.
        let Ok(signature) = DerSignature::try_from(signature) else {
            return Ok(false);
        };
        Ok(self.key.verify(message, &signature).is_ok())
    }
}

impl std::fmt::Debug for EcdsaVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcdsaVerifier").finish_non_exhaustive()
    }
}
