//! # Discovery Interface
//!
//! `POST /v1/searchService?page=&pageSize=`. Pagination is checked before
//! the body is read and before the search collaborator runs, so a negative
//! page or page size never reaches it.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use secom_core::{Pagination, SearchFilter, SearchObjectResult};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::contract::{invoke, DiscoveryContract};
use crate::error::ContractError;
use crate::extractors::{extract_query, extract_validated_json};
use crate::state::AppState;

/// Raw paging query. Signed so that negative values reach validation
/// instead of failing deserialization.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Zero-based page number.
    #[param(minimum = 0)]
    pub page: Option<i64>,
    /// Results per page. Absent means no limit.
    #[serde(rename = "pageSize")]
    #[param(minimum = 0)]
    pub page_size: Option<i64>,
}

/// POST /v1/searchService: Search for service instances.
#[utoipa::path(
    post,
    path = "/v1/searchService",
    params(PageParams),
    request_body = SearchFilter,
    responses(
        (status = 200, description = "Matching service instances, possibly none", body = [SearchObjectResult]),
        (status = 400, description = "Bad Request", body = secom_core::EncryptionKeyResponse),
        (status = 404, description = "Information not found", body = secom_core::EncryptionKeyResponse),
        (status = 500, description = "Internal Server Error", body = secom_core::EncryptionKeyResponse),
    ),
    tag = "discovery"
)]
pub async fn search(
    State(state): State<AppState>,
    query: Result<Query<PageParams>, QueryRejection>,
    body: Result<Json<SearchFilter>, JsonRejection>,
) -> Result<Json<Vec<SearchObjectResult>>, ContractError<DiscoveryContract>> {
    let params = extract_query(query)?;
    let pagination = Pagination::new(params.page, params.page_size)?;
    let filter = extract_validated_json(body)?;

    let results = invoke(state.deadline(), state.discovery.search(filter, pagination)).await?;
    tracing::debug!(results = results.len(), "search completed");
    Ok(Json(results))
}
