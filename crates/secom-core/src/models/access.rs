//! # Access Interface Objects
//!
//! `POST /v1/access`: access to service instance information is requested
//! through an [`AccessRequest`] and answered with an [`AccessResponse`].

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{is_blank, ResponseObject};
use crate::validate::Validate;

/// Access request submitted by a consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequest {
    /// Why access is requested.
    pub reason: String,
    /// Transaction the request belongs to.
    pub transaction_identifier: Uuid,
    /// MRN of the requesting party.
    pub identity: String,
    /// The data set access is requested for. Absent means the whole service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_reference: Option<Uuid>,
}

impl Validate for AccessRequest {
    fn validate(&self) -> Result<(), String> {
        if is_blank(&self.reason) {
            return Err("reason must not be empty".to_string());
        }
        if is_blank(&self.identity) {
            return Err("identity must not be empty".to_string());
        }
        Ok(())
    }
}

/// Outcome of an access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    Granted,
    Denied,
}

impl AccessDecision {
    /// Default response text for this decision.
    pub fn default_text(&self) -> &'static str {
        match self {
            Self::Granted => "Access granted",
            Self::Denied => "Access denied",
        }
    }
}

/// Access response.
///
/// `response_text` is populated on both the success and the failure path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessResponse {
    pub response_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_identifier: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<AccessDecision>,
}

impl AccessResponse {
    /// Build a decision-bearing response for a transaction.
    pub fn decided(transaction_identifier: Uuid, decision: AccessDecision) -> Self {
        Self {
            response_text: decision.default_text().to_string(),
            transaction_identifier: Some(transaction_identifier),
            decision: Some(decision),
        }
    }

    /// Fill a blank response text from the decision.
    pub fn with_response_text_populated(mut self) -> Self {
        if is_blank(&self.response_text) {
            self.response_text = self
                .decision
                .map(|d| d.default_text())
                .unwrap_or("OK")
                .to_string();
        }
        self
    }
}

impl ResponseObject for AccessResponse {
    fn failure(response_text: impl Into<String>) -> Self {
        Self {
            response_text: response_text.into(),
            transaction_identifier: None,
            decision: None,
        }
    }

    fn response_text(&self) -> &str {
        &self.response_text
    }
}
