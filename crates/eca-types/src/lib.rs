//! Core type definitions for ECA commit validation.
//!
//! This crate holds the wire schema spoken with the remote compliance service and
//! the verdict shapes produced from it. Types only, no business logic.
//! Every ECA crate depends on this crate.

pub mod commit;
pub mod error;
pub mod policy;
pub mod request;
pub mod response;
pub mod verdict;

// Re-export primary types at crate root for ergonomic use.
pub use commit::{CommitDescriptor, GitIdentity};
pub use error::TypeError;
pub use policy::{ProjectPolicy, DEFAULT_API_TIMEOUT_SECS};
pub use request::{ValidationRequest, PROVIDER};
pub use response::{CommitStatus, CommitStatusMessage, ValidationResponse};
pub use verdict::{SubmitVerdict, ValidationMessage, Verdict};
