//! Core business logic for Reimburse.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached only through the `ReimbursementRepository` trait.
//!
//! # Modules
//!
//! - `reimbursement` - Reimbursement lifecycle and metadata rules

pub mod reimbursement;

pub use reimburse_shared::types::ReimbursementId;
