//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented contract routes into one OpenAPI
//! document served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// OpenAPI document for the SECOM interfaces.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SECOM Interfaces",
        version = "0.1.0",
        description = "Access, discovery search and subscription interfaces with per-family error bodies.",
        license(name = "Apache-2.0")
    ),
    paths(
        crate::routes::access::request_access,
        crate::routes::discovery::search,
        crate::routes::subscription::get_subscription_list,
    ),
    components(schemas(
        secom_core::AccessRequest,
        secom_core::AccessResponse,
        secom_core::AccessDecision,
        secom_core::SearchFilter,
        secom_core::SearchParameters,
        secom_core::SearchObjectResult,
        secom_core::Subscription,
        secom_core::SubscriptionStatus,
        secom_core::SubscriptionResponse,
        secom_core::EncryptionKeyResponse,
        secom_core::SignedKeyMaterial,
    )),
    tags(
        (name = "access", description = "Access Interface"),
        (name = "discovery", description = "Discovery Search Interface"),
        (name = "subscription", description = "Subscription Interface"),
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI JSON document at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
