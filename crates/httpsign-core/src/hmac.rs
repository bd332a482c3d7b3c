//! HMAC-SHA256 signature backend.
//!
//! The symmetric case: one shared key both signs and verifies, so a single
//! type implements both capabilities. Verification compares digests in
//! constant time to prevent timing attacks.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::capability::{Signer, Verifier};
use crate::error::SignatureError;

type HmacSha256 = Hmac<Sha256>;

/// Signs messages and verifies message signatures using HMAC-SHA256.
///
/// Keys of any length are accepted, per the HMAC construction.
#[derive(Clone)]
pub struct HmacKey {
    key: Vec<u8>,
}

impl HmacKey {
    /// Create a new HMAC key from the given key material.
    #[must_use]
    pub fn new(key: impl AsRef<[u8]>) -> Self {
        Self {
            key: key.as_ref().to_vec(),
        }
    }

    fn digest(&self, message: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .expect("HMAC can accept keys of any length");
        mac.update(message);
        mac.finalize().into_bytes().to_vec()
    }
}

impl Signer for HmacKey {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignatureError> {
        Ok(self.digest(message))
    }
}

impl Verifier for HmacKey {
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, SignatureError> {
        let expected = self.digest(message);
        Ok(bool::from(signature.ct_eq(&expected)))
    }
}

impl std::fmt::Debug for HmacKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacKey").finish_non_exhaustive()
    }
}
