//! # Digital Signature Certificates
//!
//! The certificate presented to the signature provider: public key,
//! issuer and validity window. Owned by the caller and immutable once
//! presented.

use chrono::{DateTime, Utc};
use secom_core::SigningError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ed25519::{bytes_to_hex, Ed25519KeyPair, Ed25519PublicKey};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalSignatureCertificate {
    /// Human-readable alias, e.g. the service MRN.
    pub certificate_alias: String,
    pub public_key: Ed25519PublicKey,
    pub issuer: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
}

impl DigitalSignatureCertificate {
    /// Describe a key pair's public half.
    pub fn for_key_pair(
        certificate_alias: impl Into<String>,
        issuer: impl Into<String>,
        key_pair: &Ed25519KeyPair,
        not_before: DateTime<Utc>,
        not_after: DateTime<Utc>,
    ) -> Self {
        Self {
            certificate_alias: certificate_alias.into(),
            public_key: key_pair.public_key(),
            issuer: issuer.into(),
            not_before,
            not_after,
        }
    }

    /// Check structural validity. Expiry relative to "now" is not checked
    /// here; see [`is_valid_at`](Self::is_valid_at).
    pub fn validate(&self) -> Result<(), SigningError> {
        if self.certificate_alias.trim().is_empty() {
            return Err(SigningError::InvalidCertificate(
                "certificate alias must not be empty".to_string(),
            ));
        }
        if self.issuer.trim().is_empty() {
            return Err(SigningError::InvalidCertificate(
                "issuer must not be empty".to_string(),
            ));
        }
        if self.not_before >= self.not_after {
            return Err(SigningError::InvalidCertificate(format!(
                "validity window is empty: notBefore {} >= notAfter {}",
                self.not_before, self.not_after
            )));
        }
        self.public_key
            .to_verifying_key()
            .map_err(|e| SigningError::InvalidCertificate(e.to_string()))?;
        Ok(())
    }

    pub fn is_valid_at(&self, instant: DateTime<Utc>) -> bool {
        self.not_before <= instant && instant < self.not_after
    }

    /// SHA-256 over the public key bytes, hex-encoded.
    pub fn thumbprint(&self) -> String {
        bytes_to_hex(&Sha256::digest(self.public_key.as_bytes()))
    }
}
