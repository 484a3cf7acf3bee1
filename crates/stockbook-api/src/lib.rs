//! # stockbook-api: REST Collaborator Clients
//!
//! Owns every network call Stockbook makes. The rest of the workspace talks
//! to the outside world exclusively through the [`OrderSubmitter`] and
//! [`CatalogLookup`] traits defined here, so the pure core and the import
//! pipeline stay testable with in-memory fakes.
//!
//! Submission is a suspending operation with no caller-visible timeout and
//! no automatic retry; callers decide what a failure means (the interactive
//! flow surfaces it, the batch executor counts it and continues).

pub mod client;
pub mod error;

pub use client::{order_payload, BackofficeClient, CatalogLookup, OrderSubmitter};
pub use error::{ApiError, ApiResult};
