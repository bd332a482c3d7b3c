//! Signature capabilities for HTTP request signing.
//!
//! This crate defines the two-operation capability boundary — [`Signer`] and
//! [`Verifier`] — and the interchangeable algorithm backends that implement
//! it. The HTTP layer (`httpsign-http`) depends only on the traits, never on
//! a concrete backend.
//!
//! # Backends
//!
//! | Module | Algorithm | Signing |
//! |--------|-----------|---------|
//! | [`ecdsa`] | ECDSA P-256 / SHA-256, DER signatures | deterministic (RFC 6979) |
//! | [`ed25519`] | Ed25519 | deterministic |
//! | [`rsa`] | RSA PKCS#1 v1.5 / SHA-256 | deterministic |
//! | [`rsa`] | RSA-PSS / SHA-256 | randomized |
//! | [`hmac`] | HMAC-SHA256 (symmetric) | deterministic |
//!
//! Every signing type also verifies, and each asymmetric backend provides a
//! standalone verifier constructible from public key material alone, so the
//! verifying side of a deployment never needs to hold a private key.
//!
//! # Usage
//!
//! ```rust
//! use httpsign_core::{HmacKey, Signer, Verifier};
//!
//! let key = HmacKey::new(b"shared secret");
//! let signature = key.sign(b"message").unwrap();
//! assert!(key.verify(b"message", &signature).unwrap());
//! ```
//!
//! # Concurrency
//!
//! All backends are `Send + Sync` and hold no mutable state; a single
//! instance (typically behind an `Arc<dyn Signer>` or `Arc<dyn Verifier>`)
//! can serve any number of concurrent requests without locking.

pub mod capability;
pub mod ecdsa;
pub mod ed25519;
pub mod error;
pub mod hmac;
pub mod rsa;

pub use capability::{Signer, Verifier};
pub use ecdsa::{EcdsaSigner, EcdsaVerifier};
pub use ed25519::{Ed25519Signer, Ed25519Verifier};
pub use error::SignatureError;
pub use self::hmac::HmacKey;
pub use self::rsa::{RsaPkcsSigner, RsaPkcsVerifier, RsaPssSigner, RsaPssVerifier};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_should_share_one_capability_across_threads() {
        let key: Arc<dyn Signer> = Arc::new(HmacKey::new(b"secret"));
        let verifier: Arc<dyn Verifier> = Arc::new(HmacKey::new(b"secret"));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let key = Arc::clone(&key);
                let verifier = Arc::clone(&verifier);
                std::thread::spawn(move || {
                    let message = format!("message {i}");
                    let signature = key.sign(message.as_bytes()).unwrap();
                    assert!(verifier.verify(message.as_bytes(), &signature).unwrap());
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
