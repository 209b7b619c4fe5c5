//! # Collaborators
//!
//! Business logic behind each contract is pluggable. Handlers see only the
//! traits below, held as `Arc<dyn ...>` in [`AppState`](crate::state::AppState).
//!
//! The in-memory implementations back the binary and the test suite:
//!
//! - [`StaticAccessPolicy`] grants a fixed set of identities.
//! - [`InMemoryServiceRegistry`] matches service instances by substring.
//! - [`InMemorySubscriptions`] holds subscriptions in a lock-guarded list.
//!
//! None of them retain per-request state.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use secom_core::{
    AccessDecision, AccessRequest, AccessResponse, Pagination, SearchFilter, SearchObjectResult,
    SecomError, Subscription, SubscriptionStatus,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::state::ConfigError;

// -- Traits -------------------------------------------------------------------

/// Decides access requests.
#[async_trait]
pub trait AccessService: Send + Sync {
    async fn request_access(&self, request: AccessRequest) -> Result<AccessResponse, SecomError>;
}

/// Executes discovery searches.
///
/// `pagination` has already been validated. Ranking and windowing are the
/// implementation's choice.
#[async_trait]
pub trait DiscoveryService: Send + Sync {
    async fn search(
        &self,
        filter: SearchFilter,
        pagination: Pagination,
    ) -> Result<Vec<SearchObjectResult>, SecomError>;
}

/// Lists the caller's subscriptions.
///
/// May return cancelled entries; the subscription contract drops them.
#[async_trait]
pub trait SubscriptionService: Send + Sync {
    async fn subscriptions(&self) -> Result<Vec<Subscription>, SecomError>;
}

// -- Access -------------------------------------------------------------------

/// Grants access to a fixed set of identities.
///
/// A request naming a data reference outside `data_references` is a
/// not-found failure. An identity outside `granted` is not authorised.
/// An empty `data_references` set accepts any reference.
#[derive(Debug, Clone, Default)]
pub struct StaticAccessPolicy {
    granted: HashSet<String>,
    data_references: HashSet<Uuid>,
}

impl StaticAccessPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(mut self, identity: impl Into<String>) -> Self {
        self.granted.insert(identity.into());
        self
    }

    pub fn with_data_reference(mut self, reference: Uuid) -> Self {
        self.data_references.insert(reference);
        self
    }
}

#[async_trait]
impl AccessService for StaticAccessPolicy {
    async fn request_access(&self, request: AccessRequest) -> Result<AccessResponse, SecomError> {
        if let Some(reference) = request.data_reference {
            if !self.data_references.is_empty() && !self.data_references.contains(&reference) {
                return Err(SecomError::NotFound(format!("data reference {reference}")));
            }
        }
        if !self.granted.contains(&request.identity) {
            return Err(SecomError::NotAuthorised(request.identity));
        }
        tracing::info!(
            identity = %request.identity,
            transaction = %request.transaction_identifier,
            "access granted"
        );
        Ok(AccessResponse::decided(
            request.transaction_identifier,
            AccessDecision::Granted,
        ))
    }
}

// -- Discovery ----------------------------------------------------------------

/// Service instances searched by case-insensitive substring.
///
/// Filter attributes with no counterpart on [`SearchObjectResult`]
/// (geometry, validity window, MMSI, IMO, service type, specification id)
/// do not narrow the result. Results keep registration order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryServiceRegistry {
    instances: Vec<SearchObjectResult>,
}

impl InMemoryServiceRegistry {
    pub fn new(instances: Vec<SearchObjectResult>) -> Self {
        Self { instances }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    fn matches(instance: &SearchObjectResult, filter: &SearchFilter) -> bool {
        if let Some(text) = &filter.freetext {
            let hit = contains(&instance.name, text)
                || opt_contains(&instance.description, text)
                || opt_contains(&instance.keywords, text);
            if !hit {
                return false;
            }
        }
        let Some(q) = &filter.query else {
            return true;
        };
        let checks: [(Option<&str>, &Option<String>); 9] = [
            (Some(instance.name.as_str()), &q.name),
            (instance.status.as_deref(), &q.status),
            (instance.version.as_deref(), &q.version),
            (instance.keywords.as_deref(), &q.keywords),
            (instance.description.as_deref(), &q.description),
            (instance.data_product_type.as_deref(), &q.data_product_type),
            (instance.organization_id.as_deref(), &q.organization_id),
            (instance.unlocode.as_deref(), &q.unlocode),
            (instance.endpoint_uri.as_deref(), &q.endpoint_uri),
        ];
        let attributes_match = checks.iter().all(|(value, wanted)| match wanted {
            None => true,
            Some(w) => value.is_some_and(|v| contains(v, w)),
        });
        attributes_match
            && q.design_id.as_ref().map_or(true, |d| {
                instance.implements_design.as_deref() == Some(d.as_str())
            })
            && q
                .instance_id
                .as_ref()
                .map_or(true, |id| &instance.instance_id == id)
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn opt_contains(haystack: &Option<String>, needle: &str) -> bool {
    haystack.as_deref().is_some_and(|h| contains(h, needle))
}

#[async_trait]
impl DiscoveryService for InMemoryServiceRegistry {
    async fn search(
        &self,
        filter: SearchFilter,
        pagination: Pagination,
    ) -> Result<Vec<SearchObjectResult>, SecomError> {
        if let Some(id) = filter.query.as_ref().and_then(|q| q.instance_id.as_ref()) {
            if !self.instances.iter().any(|i| &i.instance_id == id) {
                return Err(SecomError::NotFound(format!("service instance {id}")));
            }
        }

        let matched = self
            .instances
            .iter()
            .filter(|i| Self::matches(i, &filter))
            .skip(pagination.offset());
        let results: Vec<_> = match pagination.page_size() {
            Some(size) => matched.take(size as usize).cloned().collect(),
            None => matched.cloned().collect(),
        };
        tracing::debug!(
            results = results.len(),
            page = ?pagination.page(),
            page_size = ?pagination.page_size(),
            "search executed"
        );
        Ok(results)
    }
}

// -- Subscription -------------------------------------------------------------

/// Subscriptions held in memory. Cloning shares the underlying list.
#[derive(Debug, Clone, Default)]
pub struct InMemorySubscriptions {
    entries: Arc<RwLock<Vec<Subscription>>>,
}

impl InMemorySubscriptions {
    pub fn new(entries: Vec<Subscription>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    pub fn insert(&self, subscription: Subscription) {
        self.entries.write().push(subscription);
    }

    /// Mark a subscription cancelled. Returns `false` if it is unknown.
    pub fn cancel(&self, id: &Uuid) -> bool {
        let mut guard = self.entries.write();
        match guard.iter_mut().find(|s| &s.subscription_identifier == id) {
            Some(entry) => {
                entry.status = SubscriptionStatus::Cancelled;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl SubscriptionService for InMemorySubscriptions {
    async fn subscriptions(&self) -> Result<Vec<Subscription>, SecomError> {
        Ok(self.entries.read().clone())
    }
}

// -- Seed data ----------------------------------------------------------------

/// Initial content for the in-memory collaborators, read from JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeedData {
    #[serde(default)]
    pub granted_identities: Vec<String>,
    #[serde(default)]
    pub data_references: Vec<Uuid>,
    #[serde(default)]
    pub instances: Vec<SearchObjectResult>,
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
}

impl SeedData {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::SeedRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::SeedParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn access_policy(&self) -> StaticAccessPolicy {
        let policy = self
            .granted_identities
            .iter()
            .fold(StaticAccessPolicy::new(), |p, id| p.grant(id.clone()));
        self.data_references
            .iter()
            .fold(policy, |p, r| p.with_data_reference(*r))
    }

    pub fn registry(&self) -> InMemoryServiceRegistry {
        InMemoryServiceRegistry::new(self.instances.clone())
    }

    pub fn subscription_store(&self) -> InMemorySubscriptions {
        InMemorySubscriptions::new(self.subscriptions.clone())
    }
}
