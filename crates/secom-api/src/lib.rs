//! # secom-api: Axum Service for SECOM Interfaces
//!
//! Serves the SECOM endpoint contracts over HTTP. Each contract fixes a
//! path, a method and a failure body; every failure is rendered by the
//! error table of the family it was raised in.
//!
//! ## API Surface
//!
//! | Path                 | Method | Module                        | Family       |
//! |----------------------|--------|-------------------------------|--------------|
//! | `/v1/access`         | POST   | [`routes::access`]            | Access       |
//! | `/v1/searchService`  | POST   | [`routes::discovery`]         | Discovery    |
//! | `/v1/subscription`   | GET    | [`routes::subscription`]      | Subscription |
//! | `/openapi.json`      | GET    | [`openapi`]                   |              |
//! | `/health/liveness`   | GET    |                               |              |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → DefaultBodyLimit → Handler
//! ```
//!
//! ## Crate Policy
//!
//! - No business logic in route handlers; collaborators live behind the
//!   traits in [`services`].
//! - Validation runs before any collaborator is called.
//! - Every error leaves a handler as a [`ContractError`].

pub mod contract;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

pub use contract::{
    AccessContract, DiscoveryContract, InterfaceFamily, SecomContract, SubscriptionContract,
};
pub use error::ContractError;
pub use state::{AppConfig, AppState};

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.body_limit_bytes;

    let api = Router::new()
        .merge(routes::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::tracing_layer::layer())
        .with_state(state);

    let health = Router::new().route("/health/liveness", get(liveness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe. Always 200 while the process is up.
async fn liveness() -> &'static str {
    "ok"
}
