//! # secom-cli: CLI Tool for SECOM Signing
//!
//! Provides the `secom` command-line interface over `secom-crypto`.
//!
//! ## Subcommands
//!
//! - `secom keygen`: Ed25519 key pair plus a digital signature certificate.
//! - `secom sign`: sign a file's raw bytes through the signature provider.
//! - `secom verify`: verify a signature using only the certificate.
//! - `secom encryption-key`: build a signed encryption-key response.
//! - `secom verify-key-material`: check a signed encryption-key response.
//!
//! ```bash
//! secom keygen --output keys --alias urn:mrn:mcp:service:grad:navwarn --issuer urn:mrn:mcp:org:grad
//! secom sign --key keys/secom.key --cert keys/secom.cert.json message.bin
//! secom verify --cert keys/secom.cert.json --signature <hex> message.bin
//! ```

pub mod signing;

use std::path::Path;

use anyhow::{bail, Context, Result};
use secom_crypto::{DigitalSignatureCertificate, Ed25519KeyPair};

/// Load a hex-encoded Ed25519 seed from a key file.
pub fn load_key_pair(path: &Path) -> Result<Ed25519KeyPair> {
    if !path.exists() {
        bail!("private key file not found: {}", path.display());
    }
    let seed_hex = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read private key: {}", path.display()))?;
    Ed25519KeyPair::from_seed_hex(seed_hex.trim())
        .map_err(|e| anyhow::anyhow!("invalid private key: {e}"))
}

/// Load a JSON certificate file.
pub fn load_certificate(path: &Path) -> Result<DigitalSignatureCertificate> {
    if !path.exists() {
        bail!("certificate file not found: {}", path.display());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read certificate: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse certificate: {}", path.display()))
}

/// Decode a hex string into bytes.
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>> {
    if hex.len() % 2 != 0 {
        bail!("hex string has odd length: {}", hex.len());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .with_context(|| format!("invalid hex at position {i}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_to_bytes_valid() {
        assert_eq!(hex_to_bytes("deadbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert!(hex_to_bytes("").unwrap().is_empty());
    }

    #[test]
    fn hex_to_bytes_rejects_bad_input() {
        assert!(hex_to_bytes("abc").is_err());
        assert!(hex_to_bytes("zz").is_err());
        assert!(hex_to_bytes("é0").is_err());
    }

    #[test]
    fn missing_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_key_pair(&dir.path().join("absent.key")).unwrap_err();
        assert!(err.to_string().contains("not found"));
        let err = load_certificate(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
