//! # Error Mapping
//!
//! Maps a raised [`SecomError`] to the `(status, body)` pair defined for an
//! interface family. Each family owns an [`ErrorTable`]; a shared resolver
//! applies the fixed dispatch order Validation → NotAuthorised → NotFound →
//! common fallback.
//!
//! The fallback uses the failure's declared status when it is a 4xx/5xx
//! code and 500 otherwise. Signing failures are pinned to 500. Resolution
//! is total and never panics.

use std::marker::PhantomData;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use secom_core::{FailureKind, ResponseObject, SecomError, SigningError};

use crate::contract::SecomContract;

/// A family-specific status and fixed response text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub status: StatusCode,
    pub text: &'static str,
}

/// Per-family dispatch table.
///
/// Kinds without an entry (and every unclassified or signing failure) fall
/// through to the common fallback rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorTable {
    pub validation: Rule,
    pub not_authorised: Option<Rule>,
    pub not_found: Option<Rule>,
}

const BAD_REQUEST: Rule = Rule {
    status: StatusCode::BAD_REQUEST,
    text: "Bad Request",
};

/// Access family. Not-found is deliberately reported as 400.
pub const ACCESS_ERRORS: ErrorTable = ErrorTable {
    validation: BAD_REQUEST,
    not_authorised: Some(Rule {
        status: StatusCode::FORBIDDEN,
        text: "Not authorized to requested information",
    }),
    not_found: Some(BAD_REQUEST),
};

pub const DISCOVERY_ERRORS: ErrorTable = ErrorTable {
    validation: BAD_REQUEST,
    not_authorised: None,
    not_found: Some(Rule {
        status: StatusCode::NOT_FOUND,
        text: "Information not found",
    }),
};

pub const SUBSCRIPTION_ERRORS: ErrorTable = ErrorTable {
    validation: BAD_REQUEST,
    not_authorised: None,
    not_found: None,
};

impl ErrorTable {
    /// Resolve a failure to exactly one status and response text.
    pub fn resolve(&self, err: &SecomError) -> (StatusCode, String) {
        let rule = match err.kind() {
            FailureKind::Validation => Some(self.validation),
            FailureKind::NotAuthorised => self.not_authorised,
            FailureKind::NotFound => self.not_found,
            FailureKind::Signing | FailureKind::Unclassified => None,
        };
        match rule {
            Some(rule) => (rule.status, rule.text.to_string()),
            None => common_fallback(err),
        }
    }
}

/// Common rule shared by every family for failures without a family entry.
pub fn common_fallback(err: &SecomError) -> (StatusCode, String) {
    let status = match err.kind() {
        FailureKind::Signing => StatusCode::INTERNAL_SERVER_ERROR,
        _ => err
            .declared_status()
            .and_then(|code| StatusCode::from_u16(code).ok())
            .filter(|s| s.is_client_error() || s.is_server_error())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
    };
    let text = status.canonical_reason().unwrap_or(if status.is_client_error() {
        "Client Error"
    } else {
        "Server Error"
    });
    (status, text.to_string())
}

/// A failure bound to the contract whose error table renders it.
///
/// Wraps exactly one [`SecomError`]; conversion into a response is the
/// single point where the failure is classified.
pub struct ContractError<C> {
    error: SecomError,
    _contract: PhantomData<fn() -> C>,
}

impl<C> ContractError<C> {
    pub fn new(error: SecomError) -> Self {
        Self {
            error,
            _contract: PhantomData,
        }
    }

    pub fn error(&self) -> &SecomError {
        &self.error
    }
}

impl<C> std::fmt::Debug for ContractError<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ContractError").field(&self.error).finish()
    }
}

impl<C> From<SecomError> for ContractError<C> {
    fn from(error: SecomError) -> Self {
        Self::new(error)
    }
}

impl<C> From<SigningError> for ContractError<C> {
    fn from(error: SigningError) -> Self {
        Self::new(SecomError::Signing(error))
    }
}

impl<C: SecomContract> IntoResponse for ContractError<C> {
    fn into_response(self) -> Response {
        let (status, body) = C::error_response(&self.error);

        // Server faults carry operator-relevant detail; client faults do not.
        if status.is_server_error() {
            tracing::error!(
                family = %C::FAMILY,
                kind = %self.error.kind(),
                status = status.as_u16(),
                error = %self.error,
                "request failed"
            );
        } else {
            tracing::debug!(
                family = %C::FAMILY,
                kind = %self.error.kind(),
                status = status.as_u16(),
                error = %self.error,
                "request rejected"
            );
        }

        debug_assert!(!body.response_text().is_empty());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn all_failures() -> Vec<SecomError> {
        vec![
            SecomError::Validation("pageSize".into()),
            SecomError::NotAuthorised("urn:mrn:x".into()),
            SecomError::NotFound("instance".into()),
            SecomError::Signing(SigningError::SigningFailed("hsm offline".into())),
            SecomError::NotImplemented("search".into()),
            SecomError::Timeout(Duration::from_millis(10)),
            SecomError::internal("db down"),
            SecomError::with_status(503, "registry unavailable"),
        ]
    }

    #[test]
    fn access_table() {
        let t = ACCESS_ERRORS;
        assert_eq!(
            t.resolve(&SecomError::Validation("x".into())),
            (StatusCode::BAD_REQUEST, "Bad Request".to_string())
        );
        assert_eq!(
            t.resolve(&SecomError::NotAuthorised("x".into())),
            (
                StatusCode::FORBIDDEN,
                "Not authorized to requested information".to_string()
            )
        );
        assert_eq!(
            t.resolve(&SecomError::NotFound("x".into())),
            (StatusCode::BAD_REQUEST, "Bad Request".to_string())
        );
    }

    #[test]
    fn discovery_table() {
        let t = DISCOVERY_ERRORS;
        assert_eq!(
            t.resolve(&SecomError::Validation("x".into())).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            t.resolve(&SecomError::NotFound("x".into())),
            (StatusCode::NOT_FOUND, "Information not found".to_string())
        );
        // No family entry: the declared 403 is used by the fallback.
        assert_eq!(
            t.resolve(&SecomError::NotAuthorised("x".into())),
            (StatusCode::FORBIDDEN, "Forbidden".to_string())
        );
    }

    #[test]
    fn subscription_table_falls_back_for_not_found() {
        assert_eq!(
            SUBSCRIPTION_ERRORS.resolve(&SecomError::NotFound("x".into())),
            (StatusCode::NOT_FOUND, "Not Found".to_string())
        );
    }

    #[test]
    fn fallback_uses_reason_phrase() {
        assert_eq!(
            common_fallback(&SecomError::internal("boom")),
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string()
            )
        );
        assert_eq!(
            common_fallback(&SecomError::with_status(503, "x")),
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service Unavailable".to_string()
            )
        );
        assert_eq!(
            common_fallback(&SecomError::Timeout(Duration::from_secs(2))).0,
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            common_fallback(&SecomError::NotImplemented("x".into())).0,
            StatusCode::NOT_IMPLEMENTED
        );
    }

    #[test]
    fn fallback_ignores_non_error_declared_status() {
        assert_eq!(
            common_fallback(&SecomError::with_status(204, "x")).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            common_fallback(&SecomError::with_status(42, "x")).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn signing_failures_are_server_faults_in_every_family() {
        let err = SecomError::Signing(SigningError::UnsupportedAlgorithm("RSA".into()));
        for table in [ACCESS_ERRORS, DISCOVERY_ERRORS, SUBSCRIPTION_ERRORS] {
            let (status, text) = table.resolve(&err);
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(text, "Internal Server Error");
        }
    }

    #[test]
    fn every_failure_resolves_in_every_family() {
        for table in [ACCESS_ERRORS, DISCOVERY_ERRORS, SUBSCRIPTION_ERRORS] {
            for err in all_failures() {
                let (status, text) = table.resolve(&err);
                assert!(status.is_client_error() || status.is_server_error());
                assert!(!text.is_empty(), "empty text for {err:?}");
            }
        }
    }

    proptest::proptest! {
        #[test]
        fn fallback_is_total_for_any_declared_status(code in proptest::option::of(0u16..=u16::MAX)) {
            let err = SecomError::Other { status: code, message: "x".into() };
            for table in [ACCESS_ERRORS, DISCOVERY_ERRORS, SUBSCRIPTION_ERRORS] {
                let (status, text) = table.resolve(&err);
                proptest::prop_assert!(status.is_client_error() || status.is_server_error());
                proptest::prop_assert!(!text.is_empty());
            }
        }
    }
}
