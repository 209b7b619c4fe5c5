//! # secom-crypto: Signature Provider for SECOM Interfaces
//!
//! - **Ed25519** signing and verification over raw payload bytes.
//! - **Digital signature certificates** carrying the public key, issuer and
//!   validity window used to parameterise signing.
//! - **[`SignatureProvider`]**, the pluggable signing contract, with an
//!   in-process [`SoftwareSignatureProvider`] backend.
//! - **Signed encryption-key responses** built through any provider.
//!
//! Signing failures are reported as [`secom_core::SigningError`], which
//! every endpoint family maps to a server fault.

pub mod certificate;
pub mod ed25519;
pub mod envelope;
pub mod provider;

pub use certificate::DigitalSignatureCertificate;
pub use ed25519::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
pub use envelope::{sign_encryption_key, verify_key_material};
pub use provider::{
    verify_signature, SignatureAlgorithm, SignatureProvider, SoftwareSignatureProvider,
};
