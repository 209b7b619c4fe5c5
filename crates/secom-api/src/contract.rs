//! # Endpoint Contracts
//!
//! Each SECOM interface family is a zero-sized marker implementing
//! [`SecomContract`]: the fixed path and method, the response object used as
//! the error body, and the family's [`ErrorTable`]. Handlers return
//! [`ContractError<C>`](crate::error::ContractError) so that every failure
//! is rendered by the table of the contract it was raised under.

use std::future::Future;
use std::time::Duration;

use axum::http::{Method, StatusCode};
use secom_core::{
    AccessResponse, EncryptionKeyResponse, ResponseObject, SecomError, SubscriptionResponse,
};

use crate::error::{
    ContractError, ErrorTable, ACCESS_ERRORS, DISCOVERY_ERRORS, SUBSCRIPTION_ERRORS,
};

/// The endpoint families defined by the interface standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceFamily {
    Access,
    Discovery,
    Subscription,
}

impl InterfaceFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Discovery => "discovery",
            Self::Subscription => "subscription",
        }
    }
}

impl std::fmt::Display for InterfaceFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability shared by every endpoint family.
///
/// Implementors only declare data; the failure rendering is the shared
/// [`ErrorTable::resolve`] applied to [`Self::ERRORS`].
pub trait SecomContract: Send + Sync + 'static {
    /// Response object used for failure bodies.
    type Failure: ResponseObject;

    const FAMILY: InterfaceFamily;
    const PATH: &'static str;
    const METHOD: Method;
    const ERRORS: ErrorTable;

    /// Map a failure to its status and failure-shaped body.
    fn error_response(err: &SecomError) -> (StatusCode, Self::Failure) {
        let (status, text) = Self::ERRORS.resolve(err);
        (status, Self::Failure::failure(text))
    }
}

/// `POST /v1/access`
#[derive(Debug, Clone, Copy)]
pub struct AccessContract;

impl SecomContract for AccessContract {
    type Failure = AccessResponse;
    const FAMILY: InterfaceFamily = InterfaceFamily::Access;
    const PATH: &'static str = "/v1/access";
    const METHOD: Method = Method::POST;
    const ERRORS: ErrorTable = ACCESS_ERRORS;
}

/// `POST /v1/searchService`
///
/// Failure bodies use [`EncryptionKeyResponse`].
#[derive(Debug, Clone, Copy)]
pub struct DiscoveryContract;

impl SecomContract for DiscoveryContract {
    type Failure = EncryptionKeyResponse;
    const FAMILY: InterfaceFamily = InterfaceFamily::Discovery;
    const PATH: &'static str = "/v1/searchService";
    const METHOD: Method = Method::POST;
    const ERRORS: ErrorTable = DISCOVERY_ERRORS;
}

/// `GET /v1/subscription`
#[derive(Debug, Clone, Copy)]
pub struct SubscriptionContract;

impl SecomContract for SubscriptionContract {
    type Failure = SubscriptionResponse;
    const FAMILY: InterfaceFamily = InterfaceFamily::Subscription;
    const PATH: &'static str = "/v1/subscription";
    const METHOD: Method = Method::GET;
    const ERRORS: ErrorTable = SUBSCRIPTION_ERRORS;
}

/// Await a collaborator call, bounded by `deadline` when one is configured.
///
/// Expiry yields [`SecomError::Timeout`]. Dropping the returned future
/// cancels the collaborator call with it.
pub async fn invoke<T, F>(deadline: Option<Duration>, call: F) -> Result<T, SecomError>
where
    F: Future<Output = Result<T, SecomError>>,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| SecomError::Timeout(limit))?,
        None => call.await,
    }
}

/// Method fallback for a contract path: 405 in the family's body shape.
pub async fn method_not_allowed<C: SecomContract>() -> ContractError<C> {
    ContractError::new(SecomError::with_status(
        405,
        format!("{} only accepts {}", C::PATH, C::METHOD),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_and_methods_are_fixed() {
        assert_eq!(AccessContract::PATH, "/v1/access");
        assert_eq!(AccessContract::METHOD, Method::POST);
        assert_eq!(DiscoveryContract::PATH, "/v1/searchService");
        assert_eq!(DiscoveryContract::METHOD, Method::POST);
        assert_eq!(SubscriptionContract::PATH, "/v1/subscription");
        assert_eq!(SubscriptionContract::METHOD, Method::GET);
    }

    #[test]
    fn access_not_authorised_body() {
        let (status, body) =
            AccessContract::error_response(&SecomError::NotAuthorised("urn:mrn:x".into()));
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({"responseText": "Not authorized to requested information"})
        );
    }

    #[test]
    fn discovery_not_found_body() {
        let (status, body) =
            DiscoveryContract::error_response(&SecomError::NotFound("urn:mrn:svc".into()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.response_text(), "Information not found");
        assert!(body.encryption_key.is_none());
    }

    #[test]
    fn subscription_validation_body() {
        let (status, body) =
            SubscriptionContract::error_response(&SecomError::Validation("x".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.response_text(), "Bad Request");
    }

    #[tokio::test]
    async fn invoke_without_deadline_passes_through() {
        let out = invoke(None, async { Ok::<_, SecomError>(7) }).await.unwrap();
        assert_eq!(out, 7);
        let err = invoke(None, async { Err::<u8, _>(SecomError::NotFound("x".into())) })
            .await
            .unwrap_err();
        assert!(matches!(err, SecomError::NotFound(_)));
    }

    #[tokio::test]
    async fn invoke_past_deadline_times_out() {
        let limit = Duration::from_millis(10);
        let err = invoke(Some(limit), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, SecomError>(())
        })
        .await
        .unwrap_err();
        assert!(matches!(err, SecomError::Timeout(d) if d == limit));
    }

    #[tokio::test]
    async fn cancelled_invoke_drops_the_collaborator_call() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        struct DropFlag(Arc<AtomicBool>);
        impl Drop for DropFlag {
            fn drop(&mut self) {
                self.0.store(true, Ordering::SeqCst);
            }
        }

        let finished = Arc::new(AtomicBool::new(false));
        let dropped = Arc::new(AtomicBool::new(false));
        let (started_tx, started_rx) = tokio::sync::oneshot::channel();
        let call = {
            let finished = finished.clone();
            let guard = DropFlag(dropped.clone());
            async move {
                let _guard = guard;
                let _ = started_tx.send(());
                tokio::time::sleep(Duration::from_secs(5)).await;
                finished.store(true, Ordering::SeqCst);
                Ok::<_, SecomError>(())
            }
        };

        let handle = tokio::spawn(invoke(Some(Duration::from_secs(10)), call));
        started_rx.await.unwrap();
        handle.abort();

        // The caller sees a cancelled task, not a mapped failure.
        let join_error = handle.await.unwrap_err();
        assert!(join_error.is_cancelled());
        assert!(dropped.load(Ordering::SeqCst));
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn method_not_allowed_declares_405() {
        let err = method_not_allowed::<SubscriptionContract>().await;
        assert_eq!(err.error().declared_status(), Some(405));
        let (status, body) = SubscriptionContract::error_response(err.error());
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body.response_text(), "Method Not Allowed");
    }
}
