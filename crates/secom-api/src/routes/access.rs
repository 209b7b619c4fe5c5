//! # Access Interface
//!
//! `POST /v1/access`. Validated requests go to the [`AccessService`]
//! collaborator; failures render through the access error table.
//!
//! [`AccessService`]: crate::services::AccessService

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use secom_core::{AccessRequest, AccessResponse};

use crate::contract::{invoke, AccessContract};
use crate::error::ContractError;
use crate::extractors::extract_validated_json;
use crate::state::AppState;

/// POST /v1/access: Request access to service instance information.
#[utoipa::path(
    post,
    path = "/v1/access",
    request_body = AccessRequest,
    responses(
        (status = 200, description = "Access decision", body = AccessResponse),
        (status = 400, description = "Bad Request", body = AccessResponse),
        (status = 403, description = "Not authorized to requested information", body = AccessResponse),
        (status = 500, description = "Internal Server Error", body = AccessResponse),
    ),
    tag = "access"
)]
pub async fn request_access(
    State(state): State<AppState>,
    body: Result<Json<AccessRequest>, JsonRejection>,
) -> Result<Json<AccessResponse>, ContractError<AccessContract>> {
    let request = extract_validated_json(body)?;
    tracing::debug!(
        transaction = %request.transaction_identifier,
        identity = %request.identity,
        "access requested"
    );

    let response = invoke(state.deadline(), state.access.request_access(request)).await?;
    Ok(Json(response.with_response_text_populated()))
}
