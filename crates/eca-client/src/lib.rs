//! Client for the remote ECA compliance service.
//!
//! One call serializes a [`eca_types::ValidationRequest`], posts it under a
//! per-call deadline and reads back a [`eca_types::ValidationResponse`], whether
//! the service answered with a success or an error status.

pub mod client;
pub mod error;

pub use client::{ClientConfig, ComplianceClient, HttpComplianceClient, DEFAULT_BASE_URL};
pub use error::{ClientError, ClientResult};
pub use tokio_util::sync::CancellationToken;
