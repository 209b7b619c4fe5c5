//! # Subscription Interface Objects
//!
//! `GET /v1/subscription`: the list of currently active subscriptions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::ResponseObject;

/// Subscription lifecycle flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
}

/// A subscription held by a consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub subscription_identifier: Uuid,
    /// MRN of the subscriber.
    pub subscriber: String,
    pub status: SubscriptionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_reference: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_period_start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_period_end: Option<DateTime<Utc>>,
}

impl Subscription {
    /// An active subscription with no optional attributes.
    pub fn active(subscriber: impl Into<String>) -> Self {
        Self {
            subscription_identifier: Uuid::new_v4(),
            subscriber: subscriber.into(),
            status: SubscriptionStatus::Active,
            data_product_type: None,
            data_reference: None,
            callback_endpoint: None,
            subscription_period_start: None,
            subscription_period_end: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }
}

/// Subscription response object; the subscription family's error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub response_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_identifier: Option<Uuid>,
}

impl ResponseObject for SubscriptionResponse {
    fn failure(response_text: impl Into<String>) -> Self {
        Self {
            response_text: response_text.into(),
            subscription_identifier: None,
        }
    }

    fn response_text(&self) -> &str {
        &self.response_text
    }
}
