//! Lifecycle rules for reimbursement requests.
//!
//! Accept and reject only re-confirm a record that is already in the target
//! status: they restamp the timestamp, they do not move a pending request.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::reimbursement::error::ReimbursementError;
use crate::reimbursement::types::{
    ReimbursementCategory, ReimbursementMetadata, ReimbursementStatus, StatusKind,
};

/// Stateless rules for reimbursement status and metadata changes.
pub struct ReimbursementWorkflow;

impl ReimbursementWorkflow {
    /// Status assigned to every newly created request.
    #[must_use]
    pub const fn initial_status() -> ReimbursementStatus {
        ReimbursementStatus::Pending
    }

    /// Restamp an approved reimbursement.
    ///
    /// # Returns
    /// * `Ok(ReimbursementStatus::Approved)` carrying `approved_at`
    /// * `Err(ReimbursementError::InvalidStateTransition)` if not approved
    pub fn confirm_approval(
        current: ReimbursementStatus,
        approved_at: DateTime<Utc>,
    ) -> Result<ReimbursementStatus, ReimbursementError> {
        match current {
            ReimbursementStatus::Approved { .. } => {
                Ok(ReimbursementStatus::Approved { approved_at })
            }
            other => Err(ReimbursementError::InvalidStateTransition {
                current: other.kind(),
                expected: StatusKind::Approved,
            }),
        }
    }

    /// Restamp a rejected reimbursement.
    ///
    /// # Returns
    /// * `Ok(ReimbursementStatus::Rejected)` carrying `rejected_at`
    /// * `Err(ReimbursementError::InvalidStateTransition)` if not rejected
    pub fn confirm_rejection(
        current: ReimbursementStatus,
        rejected_at: DateTime<Utc>,
    ) -> Result<ReimbursementStatus, ReimbursementError> {
        match current {
            ReimbursementStatus::Rejected { .. } => {
                Ok(ReimbursementStatus::Rejected { rejected_at })
            }
            other => Err(ReimbursementError::InvalidStateTransition {
                current: other.kind(),
                expected: StatusKind::Rejected,
            }),
        }
    }

    /// Check that `metadata` may be attached to a record of `expected` category.
    ///
    /// Travel metadata needs at least one participant, a non-negative
    /// per-person insurance cost, and a total that fits in a `Decimal`.
    pub fn validate_metadata(
        expected: ReimbursementCategory,
        metadata: &ReimbursementMetadata,
    ) -> Result<(), ReimbursementError> {
        let actual = metadata.category();
        if actual != expected {
            return Err(ReimbursementError::CategoryMismatch { expected, actual });
        }

        if let ReimbursementMetadata::Travel(travel) = metadata {
            if travel.participants == 0 {
                return Err(ReimbursementError::InvalidMetadata(
                    "participants must be at least 1".to_string(),
                ));
            }
            if travel.single_insurance_cost < Decimal::ZERO {
                return Err(ReimbursementError::InvalidMetadata(
                    "singleInsuranceCost must not be negative".to_string(),
                ));
            }
            if travel.compute_total_insurance_cost().is_none() {
                return Err(ReimbursementError::InvalidMetadata(
                    "totalInsuranceCost overflows".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Fill in derived fields. The travel total is always recomputed,
    /// whatever the caller supplied.
    ///
    /// # Returns
    /// * `Ok` with the enriched metadata
    /// * `Err(ReimbursementError::InvalidMetadata)` if the travel total overflows
    pub fn enrich_metadata(
        metadata: ReimbursementMetadata,
    ) -> Result<ReimbursementMetadata, ReimbursementError> {
        match metadata {
            ReimbursementMetadata::Travel(mut travel) => {
                let total = travel.compute_total_insurance_cost().ok_or_else(|| {
                    ReimbursementError::InvalidMetadata("totalInsuranceCost overflows".to_string())
                })?;
                travel.total_insurance_cost = Some(total);
                Ok(ReimbursementMetadata::Travel(travel))
            }
            other => Ok(other),
        }
    }
}
