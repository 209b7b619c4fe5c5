//! # Signature Provider
//!
//! Trait-based abstraction for producing signatures over SECOM payloads.
//! The default backend, [`SoftwareSignatureProvider`], signs in-process
//! with `ed25519-dalek`; hardware-backed providers implement the same trait.
//!
//! ## Concurrency
//!
//! Providers are `Send + Sync` and sign through `&self`. The software
//! provider's key map is fixed at construction, so concurrent signing needs
//! no locking by callers and shares no mutable state.

use std::collections::HashMap;
use std::str::FromStr;

use secom_core::SigningError;

use crate::certificate::DigitalSignatureCertificate;
use crate::ed25519::{self, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};

// ---------------------------------------------------------------------------
// Algorithm allow-list
// ---------------------------------------------------------------------------

/// Signature algorithms recognised by SECOM signature providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    /// Pure Ed25519 (RFC 8032).
    Ed25519,
}

impl SignatureAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ed25519 => "Ed25519",
        }
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = SigningError;

    /// Case-insensitive; `EdDSA` is accepted as an alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ed25519" | "eddsa" => Ok(Self::Ed25519),
            _ => Err(SigningError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl std::fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SignatureProvider trait
// ---------------------------------------------------------------------------

/// Produces digital signatures over arbitrary payloads.
///
/// Implementations MUST:
/// - Reject algorithms outside the allow-list and structurally invalid
///   certificates with a [`SigningError`].
/// - Be safe to call concurrently through `&self`.
///
/// The trait is object-safe for use with `Arc<dyn SignatureProvider>`.
pub trait SignatureProvider: Send + Sync {
    /// Sign `payload` with the key behind `certificate`, returning the
    /// signature as lowercase hex.
    fn generate_signature(
        &self,
        certificate: &DigitalSignatureCertificate,
        algorithm: &str,
        payload: &[u8],
    ) -> Result<String, SigningError>;
}

// ---------------------------------------------------------------------------
// SoftwareSignatureProvider
// ---------------------------------------------------------------------------

/// In-process provider holding Ed25519 key pairs indexed by public key.
pub struct SoftwareSignatureProvider {
    keys: HashMap<Ed25519PublicKey, Ed25519KeyPair>,
}

impl SoftwareSignatureProvider {
    pub fn new() -> Self {
        Self {
            keys: HashMap::new(),
        }
    }

    /// Add a key pair while building the provider.
    pub fn with_key_pair(mut self, key_pair: Ed25519KeyPair) -> Self {
        self.keys.insert(key_pair.public_key(), key_pair);
        self
    }

    pub fn holds_key_for(&self, certificate: &DigitalSignatureCertificate) -> bool {
        self.keys.contains_key(&certificate.public_key)
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }
}

impl Default for SoftwareSignatureProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SoftwareSignatureProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwareSignatureProvider")
            .field("key_count", &self.keys.len())
            .field("public_keys", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SignatureProvider for SoftwareSignatureProvider {
    fn generate_signature(
        &self,
        certificate: &DigitalSignatureCertificate,
        algorithm: &str,
        payload: &[u8],
    ) -> Result<String, SigningError> {
        let algorithm = SignatureAlgorithm::from_str(algorithm)?;
        certificate.validate()?;
        let key_pair = self.keys.get(&certificate.public_key).ok_or_else(|| {
            SigningError::UnknownCertificate(certificate.certificate_alias.clone())
        })?;

        let signature = match algorithm {
            SignatureAlgorithm::Ed25519 => key_pair.sign(payload),
        };
        tracing::debug!(
            alias = %certificate.certificate_alias,
            algorithm = %algorithm,
            payload_len = payload.len(),
            "payload signed"
        );
        Ok(signature.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify a hex signature using only the certificate's public material.
pub fn verify_signature(
    certificate: &DigitalSignatureCertificate,
    algorithm: &str,
    payload: &[u8],
    signature_hex: &str,
) -> Result<(), SigningError> {
    match SignatureAlgorithm::from_str(algorithm)? {
        SignatureAlgorithm::Ed25519 => {
            let signature = Ed25519Signature::from_hex(signature_hex)?;
            ed25519::verify(payload, &signature, &certificate.public_key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn certificate_for(key_pair: &Ed25519KeyPair) -> DigitalSignatureCertificate {
        let now = Utc::now();
        DigitalSignatureCertificate::for_key_pair(
            "urn:mrn:mcp:service:grad:test",
            "urn:mrn:mcp:org:grad",
            key_pair,
            now - Duration::hours(1),
            now + Duration::days(30),
        )
    }

    fn provider_and_cert(seed: u8) -> (SoftwareSignatureProvider, DigitalSignatureCertificate) {
        let kp = Ed25519KeyPair::from_seed(&[seed; 32]);
        let cert = certificate_for(&kp);
        (SoftwareSignatureProvider::new().with_key_pair(kp), cert)
    }

    #[test]
    fn algorithm_allow_list() {
        assert_eq!("Ed25519".parse::<SignatureAlgorithm>().unwrap(), SignatureAlgorithm::Ed25519);
        assert_eq!("eddsa".parse::<SignatureAlgorithm>().unwrap(), SignatureAlgorithm::Ed25519);
        assert!(matches!(
            "SHA3-384withECDSA".parse::<SignatureAlgorithm>(),
            Err(SigningError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn sign_then_verify_independently() {
        let (provider, cert) = provider_and_cert(3);
        let sig = provider
            .generate_signature(&cert, "Ed25519", b"encryption key")
            .unwrap();
        assert_eq!(sig.len(), 128);
        verify_signature(&cert, "Ed25519", b"encryption key", &sig).unwrap();
    }

    #[test]
    fn unsupported_algorithm_fails() {
        let (provider, cert) = provider_and_cert(3);
        let err = provider
            .generate_signature(&cert, "SHA256withRSA", b"x")
            .unwrap_err();
        assert!(matches!(err, SigningError::UnsupportedAlgorithm(_)));
    }

    #[test]
    fn unknown_certificate_fails() {
        let (provider, _) = provider_and_cert(3);
        let other = certificate_for(&Ed25519KeyPair::from_seed(&[9u8; 32]));
        assert!(!provider.holds_key_for(&other));
        let err = provider.generate_signature(&other, "Ed25519", b"x").unwrap_err();
        assert!(matches!(err, SigningError::UnknownCertificate(_)));
    }

    #[test]
    fn malformed_certificate_fails() {
        let (provider, mut cert) = provider_and_cert(3);
        cert.not_after = cert.not_before - Duration::seconds(1);
        let err = provider.generate_signature(&cert, "Ed25519", b"x").unwrap_err();
        assert!(matches!(err, SigningError::InvalidCertificate(_)));
    }

    #[test]
    fn verification_rejects_tampered_payload() {
        let (provider, cert) = provider_and_cert(4);
        let sig = provider.generate_signature(&cert, "Ed25519", b"a").unwrap();
        assert!(matches!(
            verify_signature(&cert, "Ed25519", b"b", &sig),
            Err(SigningError::VerificationFailed(_))
        ));
    }

    #[test]
    fn provider_is_object_safe() {
        let (provider, cert) = provider_and_cert(5);
        let dynamic: Arc<dyn SignatureProvider> = Arc::new(provider);
        assert!(dynamic.generate_signature(&cert, "Ed25519", b"").is_ok());
    }

    #[test]
    fn concurrent_signing_has_no_cross_talk() {
        let (provider, cert) = provider_and_cert(6);
        let provider = Arc::new(provider);
        let handles: Vec<_> = (0..100u32)
            .map(|i| {
                let provider = Arc::clone(&provider);
                let cert = cert.clone();
                std::thread::spawn(move || {
                    let payload = format!("payload-{i}").into_bytes();
                    let sig = provider.generate_signature(&cert, "Ed25519", &payload).unwrap();
                    (payload, sig)
                })
            })
            .collect();
        for handle in handles {
            let (payload, sig) = handle.join().unwrap();
            verify_signature(&cert, "Ed25519", &payload, &sig).unwrap();
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]
        #[test]
        fn round_trip_for_any_payload(payload in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let (provider, cert) = provider_and_cert(8);
            let sig = provider.generate_signature(&cert, "Ed25519", &payload).unwrap();
            prop_assert!(verify_signature(&cert, "Ed25519", &payload, &sig).is_ok());
        }
    }
}
