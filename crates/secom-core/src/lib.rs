//! # secom-core: Foundational Types for SECOM Interfaces
//!
//! This crate defines the data model shared by every SECOM-conforming
//! service endpoint and the failure taxonomy those endpoints report through.
//! Every other crate in the workspace depends on `secom-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One failure taxonomy.** [`SecomError`] is the only error type that
//!    crosses an endpoint boundary. Its [`FailureKind`] drives the per-family
//!    status mapping in `secom-api`.
//!
//! 2. **Every response object has a failure shape.** The [`ResponseObject`]
//!    trait guarantees a `{ "responseText": ... }` body can always be built,
//!    even when the success payload cannot.
//!
//! 3. **Validation before collaborators.** Request types implement
//!    [`Validate`]; pagination is only constructible through
//!    [`Pagination::new`], which rejects negative values.
//!
//! 4. **Per-request, transient entities.** Nothing in this crate holds state
//!    across requests.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `secom-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod models;
pub mod validate;

pub use error::{FailureKind, SecomError, SigningError};
pub use models::access::{AccessDecision, AccessRequest, AccessResponse};
pub use models::discovery::{SearchFilter, SearchObjectResult, SearchParameters};
pub use models::encryption_key::{EncryptionKeyResponse, SignedKeyMaterial};
pub use models::subscription::{Subscription, SubscriptionResponse, SubscriptionStatus};
pub use models::ResponseObject;
pub use validate::{Pagination, Validate};
