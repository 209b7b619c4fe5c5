//! # Error Types: SECOM Failure Taxonomy
//!
//! Defines the closed set of failures an endpoint contract can report.
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - [`SecomError`] is raised by validation and by collaborators, and is
//!   routed through the family error mapper exactly once.
//! - [`SigningError`] covers the signature provider. It always surfaces as a
//!   server fault, never as a client error.
//! - [`FailureKind`] is the classification the mapper dispatches on.

use std::time::Duration;

use thiserror::Error;

/// Classification of a [`SecomError`] used to select a status code and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Malformed or out-of-policy input.
    Validation,
    /// The caller lacks rights to the requested information.
    NotAuthorised,
    /// A referenced entity is absent.
    NotFound,
    /// A cryptographic signing operation failed.
    Signing,
    /// Anything else, including collaborator-internal failures.
    Unclassified,
}

impl FailureKind {
    /// Every kind, in mapper dispatch order.
    pub const ALL: [FailureKind; 5] = [
        Self::Validation,
        Self::NotAuthorised,
        Self::NotFound,
        Self::Signing,
        Self::Unclassified,
    ];

    /// Return the string representation of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotAuthorised => "not_authorised",
            Self::NotFound => "not_found",
            Self::Signing => "signing",
            Self::Unclassified => "unclassified",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised at a SECOM endpoint boundary.
#[derive(Error, Debug)]
pub enum SecomError {
    /// Request failed structural or semantic validation.
    #[error("validation failure: {0}")]
    Validation(String),

    /// A resource referenced by the request does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The requester is not authorised for the requested information.
    #[error("not authorised: {0}")]
    NotAuthorised(String),

    /// The signature provider failed.
    #[error("signing failure: {0}")]
    Signing(#[from] SigningError),

    /// The collaborator does not implement this operation (501).
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// The collaborator did not answer within the request deadline (504).
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Any other failure, optionally carrying its own HTTP status.
    #[error("{message}")]
    Other {
        /// Status declared by the raiser, if any.
        status: Option<u16>,
        /// Diagnostic message. Never returned to clients.
        message: String,
    },
}

impl SecomError {
    /// Build an unclassified failure without a declared status.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Other {
            status: None,
            message: message.into(),
        }
    }

    /// Build an unclassified failure that declares its own status.
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self::Other {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Classify this failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Validation(_) => FailureKind::Validation,
            Self::NotAuthorised(_) => FailureKind::NotAuthorised,
            Self::NotFound(_) => FailureKind::NotFound,
            Self::Signing(_) => FailureKind::Signing,
            Self::NotImplemented(_) | Self::Timeout(_) | Self::Other { .. } => {
                FailureKind::Unclassified
            }
        }
    }

    /// The status this failure declares for itself, consulted by the
    /// common fallback rule when a family has no specific entry.
    pub fn declared_status(&self) -> Option<u16> {
        match self {
            Self::Validation(_) => Some(400),
            Self::NotAuthorised(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::Signing(_) => Some(500),
            Self::NotImplemented(_) => Some(501),
            Self::Timeout(_) => Some(504),
            Self::Other { status, .. } => *status,
        }
    }
}

/// Errors from the signature provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    /// The algorithm identifier is not on the allow-list.
    #[error("unsupported signature algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The certificate material is structurally invalid.
    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),

    /// The provider holds no private key for the certificate.
    #[error("no signing key for certificate: {0}")]
    UnknownCertificate(String),

    /// The underlying cryptographic operation failed.
    #[error("signature generation failed: {0}")]
    SigningFailed(String),

    /// A signature did not verify against the certificate's public key.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Key material could not be parsed.
    #[error("key error: {0}")]
    KeyError(String),
}
