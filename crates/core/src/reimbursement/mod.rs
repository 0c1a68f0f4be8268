//! Reimbursement lifecycle management.
//!
//! Governs how an expense claim moves between pending, approved, and
//! rejected, and how category metadata is validated and enriched.
//!
//! # Modules
//!
//! - `types` - Domain types (Reimbursement, ReimbursementStatus, metadata)
//! - `error` - Reimbursement-specific error types
//! - `workflow` - Stateless lifecycle and metadata rules
//! - `service` - Async service over the repository collaborator

pub mod error;
pub mod service;
pub mod types;
pub mod workflow;

#[cfg(test)]
mod workflow_props;

pub use error::ReimbursementError;
pub use service::{ReimbursementRepository, ReimbursementService};
pub use types::{
    MealsMetadata, RecordError, Reimbursement, ReimbursementCategory, ReimbursementMetadata,
    ReimbursementStatus, StatusKind, TravelMetadata,
};
pub use workflow::ReimbursementWorkflow;
