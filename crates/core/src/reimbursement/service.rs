//! Reimbursement service implementation.

use std::sync::Arc;

use chrono::Utc;
use reimburse_shared::types::ReimbursementId;
use tracing::{debug, info, warn};

use super::error::ReimbursementError;
use super::types::{Reimbursement, ReimbursementMetadata};
use super::workflow::ReimbursementWorkflow;

/// Repository trait for reimbursement persistence.
///
/// Storage lives outside this crate. Implementations own atomicity; the
/// service never holds a lock across a read and the following write.
pub trait ReimbursementRepository: Send + Sync {
    /// Full snapshot of every reimbursement, no pagination.
    fn find_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Reimbursement>, ReimbursementError>> + Send;

    /// Persist a new reimbursement and return its stored form.
    fn create(
        &self,
        reimbursement: Reimbursement,
    ) -> impl std::future::Future<Output = Result<Reimbursement, ReimbursementError>> + Send;

    /// Find a reimbursement by ID. Absence is `Ok(None)`, never an error.
    fn find_one_by_id(
        &self,
        id: ReimbursementId,
    ) -> impl std::future::Future<Output = Result<Option<Reimbursement>, ReimbursementError>> + Send;

    /// Persist the full state of an existing reimbursement.
    fn update(
        &self,
        reimbursement: Reimbursement,
    ) -> impl std::future::Future<Output = Result<Reimbursement, ReimbursementError>> + Send;
}

/// Reimbursement service enforcing lifecycle rules over a repository.
pub struct ReimbursementService<R: ReimbursementRepository> {
    repo: Arc<R>,
}

impl<R: ReimbursementRepository> ReimbursementService<R> {
    /// Create a new reimbursement service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// List every reimbursement exactly as the repository reports it.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository read fails.
    pub async fn get_reimbursements(&self) -> Result<Vec<Reimbursement>, ReimbursementError> {
        let reimbursements = self.repo.find_all().await?;
        debug!(count = reimbursements.len(), "Listed reimbursements");
        Ok(reimbursements)
    }

    /// Submit a new reimbursement request.
    ///
    /// The status is forced to pending whatever the caller supplied.
    /// Category and metadata are stored as given.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository write fails.
    pub async fn create_reimbursement_request(
        &self,
        mut reimbursement: Reimbursement,
    ) -> Result<Reimbursement, ReimbursementError> {
        reimbursement.status = ReimbursementWorkflow::initial_status();

        let created = self.repo.create(reimbursement).await?;
        info!(
            reimbursement_id = %created.id,
            employee_id = %created.employee_id,
            category = %created.category(),
            "Reimbursement request created"
        );
        Ok(created)
    }

    /// Confirm an approved reimbursement, stamping a fresh `approved_at`.
    ///
    /// This does not approve a pending request.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No reimbursement exists for `id`
    /// - The reimbursement is not already approved
    /// - The repository fails
    pub async fn accept_reimbursement_request(
        &self,
        id: ReimbursementId,
    ) -> Result<(), ReimbursementError> {
        let mut reimbursement = self.find(id).await?;

        reimbursement.status = ReimbursementWorkflow::confirm_approval(
            reimbursement.status,
            Utc::now(),
        )
        .inspect_err(|e| warn!(reimbursement_id = %id, error = %e, "Accept refused"))?;

        self.repo.update(reimbursement).await?;
        info!(reimbursement_id = %id, "Reimbursement approval confirmed");
        Ok(())
    }

    /// Confirm a rejected reimbursement, stamping a fresh `rejected_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No reimbursement exists for `id`
    /// - The reimbursement is not already rejected
    /// - The repository fails
    pub async fn reject_reimbursement_request(
        &self,
        id: ReimbursementId,
    ) -> Result<(), ReimbursementError> {
        let mut reimbursement = self.find(id).await?;

        reimbursement.status = ReimbursementWorkflow::confirm_rejection(
            reimbursement.status,
            Utc::now(),
        )
        .inspect_err(|e| warn!(reimbursement_id = %id, error = %e, "Reject refused"))?;

        self.repo.update(reimbursement).await?;
        info!(reimbursement_id = %id, "Reimbursement rejection confirmed");
        Ok(())
    }

    /// Replace the metadata of a reimbursement in any status.
    ///
    /// Travel metadata gets its `total_insurance_cost` recomputed, overriding
    /// any supplied value.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No reimbursement exists for `id`
    /// - The metadata belongs to another category
    /// - Travel metadata has no participants, a negative insurance cost, or
    ///   a total that overflows
    /// - The repository fails
    pub async fn update_reimbursement_metadata(
        &self,
        id: ReimbursementId,
        metadata: ReimbursementMetadata,
    ) -> Result<Reimbursement, ReimbursementError> {
        let mut reimbursement = self.find(id).await?;

        ReimbursementWorkflow::validate_metadata(reimbursement.category(), &metadata)
            .inspect_err(|e| warn!(reimbursement_id = %id, error = %e, "Metadata refused"))?;
        reimbursement.metadata = ReimbursementWorkflow::enrich_metadata(metadata)?;

        self.repo.update(reimbursement.clone()).await?;
        info!(reimbursement_id = %id, "Reimbursement metadata updated");
        Ok(reimbursement)
    }

    async fn find(&self, id: ReimbursementId) -> Result<Reimbursement, ReimbursementError> {
        debug!(reimbursement_id = %id, "Looking up reimbursement");
        self.repo
            .find_one_by_id(id)
            .await?
            .ok_or(ReimbursementError::NotFound(id))
            .inspect_err(|_| warn!(reimbursement_id = %id, "Reimbursement not found"))
    }
}
