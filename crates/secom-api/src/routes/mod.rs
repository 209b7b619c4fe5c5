//! # Route Table
//!
//! Every SECOM contract is registered from one explicit table of
//! `(path, method, handler)` entries built at startup. Each entry's method
//! router falls back to a 405 rendered in the contract's own body shape.

pub mod access;
pub mod discovery;
pub mod subscription;

use axum::http::Method;
use axum::routing::{get, post, MethodRouter};
use axum::Router;

use crate::contract::{
    method_not_allowed, AccessContract, DiscoveryContract, InterfaceFamily, SecomContract,
    SubscriptionContract,
};
use crate::state::AppState;

/// One registered contract endpoint.
pub struct RouteEntry {
    pub path: &'static str,
    pub method: Method,
    pub family: InterfaceFamily,
    pub handler: MethodRouter<AppState>,
}

impl std::fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEntry")
            .field("path", &self.path)
            .field("method", &self.method)
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

fn entry<C: SecomContract>(handler: MethodRouter<AppState>) -> RouteEntry {
    RouteEntry {
        path: C::PATH,
        method: C::METHOD,
        family: C::FAMILY,
        handler: handler.fallback(method_not_allowed::<C>),
    }
}

/// The contract endpoints served by this crate.
pub fn route_table() -> Vec<RouteEntry> {
    vec![
        entry::<AccessContract>(post(access::request_access)),
        entry::<DiscoveryContract>(post(discovery::search)),
        entry::<SubscriptionContract>(get(subscription::get_subscription_list)),
    ]
}

/// Fold the route table into a router.
pub fn router() -> Router<AppState> {
    route_table()
        .into_iter()
        .fold(Router::new(), |router, entry| {
            tracing::info!(
                method = %entry.method,
                path = entry.path,
                family = %entry.family,
                "route registered"
            );
            router.route(entry.path, entry.handler)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_every_family_once() {
        let table = route_table();
        let families: Vec<_> = table.iter().map(|e| e.family).collect();
        assert_eq!(
            families,
            vec![
                InterfaceFamily::Access,
                InterfaceFamily::Discovery,
                InterfaceFamily::Subscription
            ]
        );
        let rows: Vec<_> = table
            .iter()
            .map(|e| (e.path, e.method.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("/v1/access", "POST"),
                ("/v1/searchService", "POST"),
                ("/v1/subscription", "GET"),
            ]
        );
    }
}
