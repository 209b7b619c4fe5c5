//! # Subscription Interface
//!
//! `GET /v1/subscription`. Only active subscriptions are returned, whatever
//! the collaborator supplies; an empty list is a normal answer.

use axum::extract::State;
use axum::Json;
use secom_core::Subscription;

use crate::contract::{invoke, SubscriptionContract};
use crate::error::ContractError;
use crate::state::AppState;

/// GET /v1/subscription: List active subscriptions.
#[utoipa::path(
    get,
    path = "/v1/subscription",
    responses(
        (status = 200, description = "Active subscriptions", body = [Subscription]),
        (status = 500, description = "Internal Server Error", body = secom_core::SubscriptionResponse),
    ),
    tag = "subscription"
)]
pub async fn get_subscription_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<Subscription>>, ContractError<SubscriptionContract>> {
    let all = invoke(state.deadline(), state.subscriptions.subscriptions()).await?;
    let total = all.len();
    let active: Vec<_> = all.into_iter().filter(Subscription::is_active).collect();
    if active.len() != total {
        tracing::debug!(
            dropped = total - active.len(),
            "inactive subscriptions filtered"
        );
    }
    Ok(Json(active))
}
