//! # Signed Encryption Key Responses
//!
//! Builds an [`EncryptionKeyResponse`] whose key material is signed by a
//! [`SignatureProvider`]. The signed payload is the key length as a 4-byte
//! big-endian integer, then the raw key bytes, then the raw IV bytes.

use secom_core::{EncryptionKeyResponse, SignedKeyMaterial, SigningError};

use crate::certificate::DigitalSignatureCertificate;
use crate::ed25519::{bytes_to_hex, hex_to_bytes};
use crate::provider::{verify_signature, SignatureProvider};

/// Sign the framed key material and wrap it in a success response.
pub fn sign_encryption_key(
    provider: &dyn SignatureProvider,
    certificate: &DigitalSignatureCertificate,
    algorithm: &str,
    encryption_key: &[u8],
    iv: &[u8],
) -> Result<EncryptionKeyResponse, SigningError> {
    let payload = framed_payload(encryption_key, iv)?;
    let signature = provider.generate_signature(certificate, algorithm, &payload)?;
    let certificate = serde_json::to_value(certificate)
        .map_err(|e| SigningError::SigningFailed(format!("certificate encoding failed: {e}")))?;

    Ok(EncryptionKeyResponse::signed(SignedKeyMaterial {
        encryption_key: bytes_to_hex(encryption_key),
        iv: bytes_to_hex(iv),
        certificate,
        algorithm: algorithm.to_string(),
        signature,
    }))
}

/// Verify the signature carried in signed key material against the
/// certificate embedded alongside it.
pub fn verify_key_material(material: &SignedKeyMaterial) -> Result<(), SigningError> {
    let certificate: DigitalSignatureCertificate =
        serde_json::from_value(material.certificate.clone())
            .map_err(|e| SigningError::InvalidCertificate(e.to_string()))?;
    certificate.validate()?;
    let key = hex_to_bytes(&material.encryption_key).map_err(SigningError::KeyError)?;
    let iv = hex_to_bytes(&material.iv).map_err(SigningError::KeyError)?;
    let payload = framed_payload(&key, &iv)?;
    verify_signature(&certificate, &material.algorithm, &payload, &material.signature)
}

/// `len(key) as u32 BE || key || iv`. The length prefix pins the key/IV
/// boundary.
fn framed_payload(encryption_key: &[u8], iv: &[u8]) -> Result<Vec<u8>, SigningError> {
    let key_len = u32::try_from(encryption_key.len()).map_err(|_| {
        SigningError::KeyError(format!(
            "encryption key too long: {} bytes",
            encryption_key.len()
        ))
    })?;
    let mut payload = Vec::with_capacity(4 + encryption_key.len() + iv.len());
    payload.extend_from_slice(&key_len.to_be_bytes());
    payload.extend_from_slice(encryption_key);
    payload.extend_from_slice(iv);
    Ok(payload)
}
