//! # Extractors & Rejection Mapping
//!
//! Helpers that turn axum's extractor rejections into [`SecomError`] so the
//! contract's error table, not the framework, decides the response.
//! Handlers take `Result<Json<T>, JsonRejection>` (or the query equivalent)
//! and pass it through these functions.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;
use secom_core::{SecomError, Validate};

/// Extract a JSON body.
///
/// Malformed JSON and JSON of the wrong shape are validation failures.
/// Other rejections (missing content type, unreadable body) keep the status
/// axum assigned and go through the common fallback.
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, SecomError> {
    result.map(|Json(v)| v).map_err(|rejection| match rejection {
        JsonRejection::JsonDataError(e) => SecomError::Validation(e.body_text()),
        JsonRejection::JsonSyntaxError(e) => SecomError::Validation(e.body_text()),
        other => SecomError::with_status(other.status().as_u16(), other.body_text()),
    })
}

/// Extract a JSON body and run its [`Validate`] rules.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, SecomError> {
    let value = extract_json(result)?;
    value.validated()?;
    Ok(value)
}

/// Extract query parameters; any deserialization failure is a validation
/// failure.
pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, SecomError> {
    result
        .map(|Query(v)| v)
        .map_err(|rejection| SecomError::Validation(rejection.body_text()))
}
