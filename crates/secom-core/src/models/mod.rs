//! # SECOM Data Model
//!
//! Request and response objects for the access, discovery and subscription
//! interfaces. Wire names are camelCase, matching the SECOM JSON schema.
//!
//! Every response object implements [`ResponseObject`], which guarantees the
//! failure shape `{ "responseText": "..." }` is always constructible.

pub mod access;
pub mod discovery;
pub mod encryption_key;
pub mod subscription;

/// A response object that can be built in a failure state carrying only a
/// human-readable response text.
pub trait ResponseObject: serde::Serialize + Send {
    /// Build the failure-shaped object.
    fn failure(response_text: impl Into<String>) -> Self;

    /// The response text carried by this object.
    fn response_text(&self) -> &str;
}

/// True for empty or whitespace-only strings.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Reject a present-but-blank optional string field.
pub(crate) fn not_blank_if_present(field: &str, value: &Option<String>) -> Result<(), String> {
    match value {
        Some(v) if is_blank(v) => Err(format!("{field} must not be blank when present")),
        _ => Ok(()),
    }
}
