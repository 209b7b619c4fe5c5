//! # Signing Subcommands
//!
//! Key generation, payload signing, verification and signed encryption-key
//! responses. Every signature is produced through a
//! [`SoftwareSignatureProvider`] holding the loaded key, so the CLI
//! exercises the same path a service would.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Duration, Utc};
use clap::{Args, Subcommand};
use rand::RngCore;
use secom_core::EncryptionKeyResponse;
use secom_crypto::{
    sign_encryption_key, verify_key_material, verify_signature, DigitalSignatureCertificate,
    Ed25519KeyPair, SignatureProvider, SoftwareSignatureProvider,
};

use crate::{hex_to_bytes, load_certificate, load_key_pair};

/// Default algorithm identifier.
pub const DEFAULT_ALGORITHM: &str = "Ed25519";

#[derive(Subcommand, Debug)]
pub enum SigningCommand {
    /// Generate an Ed25519 key pair and a certificate describing it.
    Keygen(KeygenArgs),

    /// Sign the raw bytes of a file.
    Sign {
        /// Private key file (hex-encoded 32-byte seed).
        #[arg(long)]
        key: PathBuf,
        /// Certificate file (JSON).
        #[arg(long)]
        cert: PathBuf,
        #[arg(long, default_value = DEFAULT_ALGORITHM)]
        algorithm: String,
        /// File whose bytes are signed.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Verify a signature over the raw bytes of a file.
    Verify {
        /// Certificate file (JSON).
        #[arg(long)]
        cert: PathBuf,
        #[arg(long, default_value = DEFAULT_ALGORITHM)]
        algorithm: String,
        /// Hex-encoded signature.
        #[arg(long)]
        signature: String,
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Produce a signed encryption-key response as JSON.
    EncryptionKey {
        #[arg(long)]
        key: PathBuf,
        #[arg(long)]
        cert: PathBuf,
        #[arg(long, default_value = DEFAULT_ALGORITHM)]
        algorithm: String,
        /// Hex-encoded encryption key. Random 32 bytes when omitted.
        #[arg(long)]
        encryption_key: Option<String>,
        /// Hex-encoded IV. Random 16 bytes when omitted.
        #[arg(long)]
        iv: Option<String>,
    },

    /// Verify the signed key material inside an encryption-key response.
    VerifyKeyMaterial {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Output directory for the key and certificate files.
    #[arg(long, short, default_value = ".")]
    pub output: PathBuf,
    /// Prefix for the generated filenames.
    #[arg(long, default_value = "secom")]
    pub prefix: String,
    /// Certificate alias, usually the service MRN.
    #[arg(long)]
    pub alias: String,
    /// Issuer MRN.
    #[arg(long)]
    pub issuer: String,
    /// Validity period in days, starting now.
    #[arg(long, default_value_t = 365)]
    pub valid_days: u32,
}

/// Execute a signing subcommand. Returns the process exit code.
pub fn run_signing(command: &SigningCommand) -> Result<u8> {
    match command {
        SigningCommand::Keygen(args) => cmd_keygen(args),
        SigningCommand::Sign {
            key,
            cert,
            algorithm,
            file,
        } => cmd_sign(key, cert, algorithm, file),
        SigningCommand::Verify {
            cert,
            algorithm,
            signature,
            file,
        } => cmd_verify(cert, algorithm, signature, file),
        SigningCommand::EncryptionKey {
            key,
            cert,
            algorithm,
            encryption_key,
            iv,
        } => cmd_encryption_key(
            key,
            cert,
            algorithm,
            encryption_key.as_deref(),
            iv.as_deref(),
        ),
        SigningCommand::VerifyKeyMaterial { file } => cmd_verify_key_material(file),
    }
}

fn cmd_keygen(args: &KeygenArgs) -> Result<u8> {
    if args.valid_days == 0 {
        bail!("--valid-days must be at least 1");
    }
    std::fs::create_dir_all(&args.output).with_context(|| {
        format!(
            "failed to create output directory: {}",
            args.output.display()
        )
    })?;

    let key_pair = Ed25519KeyPair::generate();
    let now = Utc::now();
    let certificate = DigitalSignatureCertificate::for_key_pair(
        &args.alias,
        &args.issuer,
        &key_pair,
        now,
        now + Duration::days(i64::from(args.valid_days)),
    );
    certificate
        .validate()
        .map_err(|e| anyhow::anyhow!("generated certificate is invalid: {e}"))?;

    let key_path = args.output.join(format!("{}.key", args.prefix));
    let cert_path = args.output.join(format!("{}.cert.json", args.prefix));

    std::fs::write(&key_path, key_pair.seed_hex())
        .with_context(|| format!("failed to write private key: {}", key_path.display()))?;
    let cert_json = serde_json::to_string_pretty(&certificate)?;
    std::fs::write(&cert_path, cert_json)
        .with_context(|| format!("failed to write certificate: {}", cert_path.display()))?;

    tracing::info!(alias = %certificate.certificate_alias, "key pair generated");
    println!("OK: generated Ed25519 key pair");
    println!("  Private key: {}", key_path.display());
    println!("  Certificate: {}", cert_path.display());
    println!("  Thumbprint:  {}", certificate.thumbprint());

    Ok(0)
}

/// Build a provider holding `key_path`'s key, checking it matches `cert_path`.
fn provider_for(
    key_path: &Path,
    cert_path: &Path,
) -> Result<(SoftwareSignatureProvider, DigitalSignatureCertificate)> {
    let key_pair = load_key_pair(key_path)?;
    let certificate = load_certificate(cert_path)?;
    let provider = SoftwareSignatureProvider::new().with_key_pair(key_pair);
    if !provider.holds_key_for(&certificate) {
        bail!(
            "private key {} does not match certificate {}",
            key_path.display(),
            cert_path.display()
        );
    }
    Ok((provider, certificate))
}

fn read_payload(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        bail!("payload file not found: {}", path.display());
    }
    std::fs::read(path).with_context(|| format!("failed to read payload: {}", path.display()))
}

fn cmd_sign(key: &Path, cert: &Path, algorithm: &str, file: &Path) -> Result<u8> {
    let (provider, certificate) = provider_for(key, cert)?;
    let payload = read_payload(file)?;
    let signature = provider
        .generate_signature(&certificate, algorithm, &payload)
        .map_err(|e| anyhow::anyhow!("signing failed: {e}"))?;
    println!("{signature}");
    Ok(0)
}

fn cmd_verify(cert: &Path, algorithm: &str, signature: &str, file: &Path) -> Result<u8> {
    let certificate = load_certificate(cert)?;
    let payload = read_payload(file)?;
    match verify_signature(&certificate, algorithm, &payload, signature.trim()) {
        Ok(()) => {
            println!("OK: signature is valid");
            Ok(0)
        }
        Err(e) => {
            println!("FAIL: signature verification failed: {e}");
            Ok(1)
        }
    }
}

fn cmd_encryption_key(
    key: &Path,
    cert: &Path,
    algorithm: &str,
    encryption_key: Option<&str>,
    iv: Option<&str>,
) -> Result<u8> {
    let (provider, certificate) = provider_for(key, cert)?;
    let encryption_key = match encryption_key {
        Some(hex) => hex_to_bytes(hex.trim()).context("invalid encryption key hex")?,
        None => random_bytes(32),
    };
    let iv = match iv {
        Some(hex) => hex_to_bytes(hex.trim()).context("invalid IV hex")?,
        None => random_bytes(16),
    };

    let response = sign_encryption_key(&provider, &certificate, algorithm, &encryption_key, &iv)
        .map_err(|e| anyhow::anyhow!("signing failed: {e}"))?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(0)
}

fn cmd_verify_key_material(file: &Path) -> Result<u8> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read response: {}", file.display()))?;
    let response: EncryptionKeyResponse = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse response: {}", file.display()))?;
    let Some(material) = response.encryption_key else {
        println!("FAIL: response carries no key material");
        return Ok(1);
    };
    match verify_key_material(&material) {
        Ok(()) => {
            println!("OK: key material signature is valid");
            Ok(0)
        }
        Err(e) => {
            println!("FAIL: key material verification failed: {e}");
            Ok(1)
        }
    }
}

fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keygen(dir: &Path) -> (PathBuf, PathBuf) {
        let args = KeygenArgs {
            output: dir.to_path_buf(),
            prefix: "test".into(),
            alias: "urn:mrn:mcp:service:grad:test".into(),
            issuer: "urn:mrn:mcp:org:grad".into(),
            valid_days: 30,
        };
        assert_eq!(cmd_keygen(&args).unwrap(), 0);
        (dir.join("test.key"), dir.join("test.cert.json"))
    }

    #[test]
    fn keygen_creates_files() {
        let dir = tempfile::tempdir().unwrap();
        let (key, cert) = keygen(dir.path());
        assert_eq!(std::fs::read_to_string(&key).unwrap().len(), 64);
        let certificate = load_certificate(&cert).unwrap();
        assert!(certificate.validate().is_ok());
        assert!(certificate.is_valid_at(Utc::now() + Duration::days(1)));
    }

    #[test]
    fn keygen_rejects_zero_validity() {
        let dir = tempfile::tempdir().unwrap();
        let args = KeygenArgs {
            output: dir.path().to_path_buf(),
            prefix: "test".into(),
            alias: "a".into(),
            issuer: "i".into(),
            valid_days: 0,
        };
        assert!(cmd_keygen(&args).is_err());
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let (key, cert) = keygen(dir.path());
        let payload = dir.path().join("payload.bin");
        std::fs::write(&payload, b"S-124 navigational warning").unwrap();

        let (provider, certificate) = provider_for(&key, &cert).unwrap();
        let signature = provider
            .generate_signature(&certificate, DEFAULT_ALGORITHM, b"S-124 navigational warning")
            .unwrap();

        assert_eq!(cmd_verify(&cert, "EdDSA", &signature, &payload).unwrap(), 0);
        std::fs::write(&payload, b"tampered").unwrap();
        assert_eq!(cmd_verify(&cert, "EdDSA", &signature, &payload).unwrap(), 1);
    }

    #[test]
    fn mismatched_key_and_certificate_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (key, _) = keygen(dir.path());
        let other = dir.path().join("other");
        let (_, other_cert) = keygen(&other);
        assert!(provider_for(&key, &other_cert).is_err());
    }

    #[test]
    fn unsupported_algorithm_fails_sign() {
        let dir = tempfile::tempdir().unwrap();
        let (key, cert) = keygen(dir.path());
        let payload = dir.path().join("payload.bin");
        std::fs::write(&payload, b"x").unwrap();
        assert!(cmd_sign(&key, &cert, "SHA256withRSA", &payload).is_err());
        assert_eq!(cmd_sign(&key, &cert, DEFAULT_ALGORITHM, &payload).unwrap(), 0);
    }

    #[test]
    fn encryption_key_response_verifies() {
        let dir = tempfile::tempdir().unwrap();
        let (key, cert) = keygen(dir.path());
        let (provider, certificate) = provider_for(&key, &cert).unwrap();
        let response = sign_encryption_key(
            &provider,
            &certificate,
            DEFAULT_ALGORITHM,
            &random_bytes(32),
            &random_bytes(16),
        )
        .unwrap();
        let path = dir.path().join("response.json");
        std::fs::write(&path, serde_json::to_string(&response).unwrap()).unwrap();
        assert_eq!(cmd_verify_key_material(&path).unwrap(), 0);

        std::fs::write(&path, r#"{"responseText":"Bad Request"}"#).unwrap();
        assert_eq!(cmd_verify_key_material(&path).unwrap(), 1);
    }

    #[test]
    fn encryption_key_accepts_explicit_material() {
        let dir = tempfile::tempdir().unwrap();
        let (key, cert) = keygen(dir.path());
        let code =
            cmd_encryption_key(&key, &cert, DEFAULT_ALGORITHM, Some("00ff"), Some("0a0b")).unwrap();
        assert_eq!(code, 0);
        assert!(cmd_encryption_key(&key, &cert, DEFAULT_ALGORITHM, Some("0g"), None).is_err());
    }
}
