//! RSA signature backends: PKCS#1 v1.5 and PSS, both over SHA-256.
//!
//! PKCS#1 v1.5 signing is deterministic. PSS is randomized: every signature
//! over the same message differs, and signing draws from the thread-local
//! CSPRNG. Verification of both schemes is deterministic.

use rsa::signature::{RandomizedSigner, SignatureEncoding, Signer as _, Verifier as _};
use rsa::{RsaPrivateKey, RsaPublicKey, pkcs1v15, pss};
use sha2::Sha256;

use crate::capability::{Signer, Verifier};
use crate::error::SignatureError;

/// Signs messages using RSA PKCS#1 v1.5 with SHA-256.
///
/// Also verifies: the signer carries the verifying half derived from its
/// private key.
pub struct RsaPkcsSigner {
    verifier: RsaPkcsVerifier,
    key: pkcs1v15::SigningKey<Sha256>,
}

impl RsaPkcsSigner {
    /// Create a new signer from an RSA private key.
    #[must_use]
    pub fn new(private_key: RsaPrivateKey) -> Self {
        let verifier = RsaPkcsVerifier::new(private_key.to_public_key());
        Self {
            verifier,
            key: pkcs1v15::SigningKey::new(private_key),
        }
    }

    /// The verifying half of this signer.
    #[must_use]
    pub fn verifier(&self) -> &RsaPkcsVerifier {
        &self.verifier
    }
}

impl Signer for RsaPkcsSigner {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignatureError> {
        self.key
            .try_sign(message)
            .map(|signature| signature.to_vec())
            .map_err(|err| SignatureError::Signing(err.to_string()))
    }
}

impl Verifier for RsaPkcsSigner {
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, SignatureError> {
        self.verifier.verify(message, signature)
    }
}

impl std::fmt::Debug for RsaPkcsSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaPkcsSigner").finish_non_exhaustive()
    }
}

/// Verifies RSA PKCS#1 v1.5 message signatures.
#[derive(Clone)]
pub struct RsaPkcsVerifier {
    key: pkcs1v15::VerifyingKey<Sha256>,
}

impl RsaPkcsVerifier {
    /// Create a new verifier from an RSA public key.
    #[must_use]
    pub fn new(public_key: RsaPublicKey) -> Self {
        Self {
            key: pkcs1v15::VerifyingKey::new(public_key),
        }
    }
}

impl Verifier for RsaPkcsVerifier {
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, SignatureError> {
        // A signature of the wrong size for the modulus cannot match.
        let Ok(signature) = pkcs1v15::Signature::try_from(signature) else {
            return Ok(false);
        };
        Ok(self.key.verify(message, &signature).is_ok())
    }
}

impl std::fmt::Debug for RsaPkcsVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaPkcsVerifier").finish_non_exhaustive()
    }
}

/// Signs messages using RSA-PSS with SHA-256.
///
/// Signing is randomized (message blinding plus a fresh salt per signature),
/// so two signatures over the same message differ while both verify.
pub struct RsaPssSigner {
    verifier: RsaPssVerifier,
    key: pss::BlindedSigningKey<Sha256>,
}

impl RsaPssSigner {
    /// Create a new signer from an RSA private key.
    #[must_use]
    pub fn new(private_key: RsaPrivateKey) -> Self {
        let verifier = RsaPssVerifier::new(private_key.to_public_key());
        Self {
            verifier,
            key: pss::BlindedSigningKey::new(private_key),
        }
    }

    /// The verifying half of this signer.
    #[must_use]
    pub fn verifier(&self) -> &RsaPssVerifier {
        &self.verifier
    }
}

impl Signer for RsaPssSigner {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignatureError> {
        self.key
            .try_sign_with_rng(&mut rand::thread_rng(), message)
            .map(|signature| signature.to_vec())
            .map_err(|err| SignatureError::Signing(err.to_string()))
    }
}

impl Verifier for RsaPssSigner {
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, SignatureError> {
        self.verifier.verify(message, signature)
    }
}

impl std::fmt::Debug for RsaPssSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaPssSigner").finish_non_exhaustive()
    }
}

/// Verifies RSA-PSS message signatures.
#[derive(Clone)]
pub struct RsaPssVerifier {
    key: pss::VerifyingKey<Sha256>,
}

impl RsaPssVerifier {
    /// Create a new verifier from an RSA public key.
    #[must_use]
    pub fn new(public_key: RsaPublicKey) -> Self {
        Self {
            key: pss::VerifyingKey::new(public_key),
        }
    }
}

impl Verifier for RsaPssVerifier {
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, SignatureError> {
        let Ok(signature) = pss::Signature::try_from(signature) else {
            return Ok(false);
        };
        Ok(self.key.verify(message, &signature).is_ok())
    }
}

impl std::fmt::Debug for RsaPssVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaPssVerifier").finish_non_exhaustive()
    }
}
