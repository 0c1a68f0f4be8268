//! Reimbursement domain types.
//!
//! Status and metadata are sum types: a record cannot carry an approval
//! timestamp while pending, and its category is read off the metadata
//! variant so the two can never disagree.

use std::fmt;

use chrono::{DateTime, Utc};
use reimburse_shared::types::ReimbursementId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Expense category of a reimbursement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReimbursementCategory {
    /// Travel expenses (carries [`TravelMetadata`]).
    Travel,
    /// Meal expenses (carries [`MealsMetadata`]).
    Meals,
    /// Office or work supplies.
    Supplies,
    /// Anything else.
    Other,
}

impl ReimbursementCategory {
    /// Returns the wire representation of the category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Travel => "TRAVEL",
            Self::Meals => "MEALS",
            Self::Supplies => "SUPPLIES",
            Self::Other => "OTHER",
        }
    }

    /// Parses a category from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "TRAVEL" => Some(Self::Travel),
            "MEALS" => Some(Self::Meals),
            "SUPPLIES" => Some(Self::Supplies),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for ReimbursementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fieldless discriminant of [`ReimbursementStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusKind {
    /// Awaiting a decision.
    Pending,
    /// Approved (terminal).
    Approved,
    /// Rejected (terminal).
    Rejected,
}

impl StatusKind {
    /// Returns the wire representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Lowercase form used in messages.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true if no further transition is exposed from this status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a reimbursement, with the timestamp each terminal
/// status requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReimbursementStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved.
    Approved {
        /// When the approval was stamped.
        approved_at: DateTime<Utc>,
    },
    /// Rejected.
    Rejected {
        /// When the rejection was stamped.
        rejected_at: DateTime<Utc>,
    },
}

impl ReimbursementStatus {
    /// Returns the fieldless discriminant.
    #[must_use]
    pub fn kind(&self) -> StatusKind {
        match self {
            Self::Pending => StatusKind::Pending,
            Self::Approved { .. } => StatusKind::Approved,
            Self::Rejected { .. } => StatusKind::Rejected,
        }
    }

    /// Approval timestamp, if approved.
    #[must_use]
    pub fn approved_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Approved { approved_at } => Some(*approved_at),
            _ => None,
        }
    }

    /// Rejection timestamp, if rejected.
    #[must_use]
    pub fn rejected_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Rejected { rejected_at } => Some(*rejected_at),
            _ => None,
        }
    }
}

/// Travel-specific metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelMetadata {
    /// Where the trip went.
    pub destination: String,
    /// Business purpose of the trip.
    pub purpose: String,
    /// Number of travellers, at least one.
    pub participants: u32,
    /// Insurance cost per participant.
    pub single_insurance_cost: Decimal,
    /// `single_insurance_cost × participants`; `None` until computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_insurance_cost: Option<Decimal>,
}

impl TravelMetadata {
    /// Creates travel metadata with the total not yet computed.
    #[must_use]
    pub fn new(
        destination: impl Into<String>,
        purpose: impl Into<String>,
        participants: u32,
        single_insurance_cost: Decimal,
    ) -> Self {
        Self {
            destination: destination.into(),
            purpose: purpose.into(),
            participants,
            single_insurance_cost,
            total_insurance_cost: None,
        }
    }

    /// Insurance cost for the whole party, `None` if it overflows `Decimal`.
    #[must_use]
    pub fn compute_total_insurance_cost(&self) -> Option<Decimal> {
        self.single_insurance_cost
            .checked_mul(Decimal::from(self.participants))
    }
}

/// Meal-specific metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealsMetadata {
    /// Restaurant where the meal took place.
    pub restaurant_name: String,
    /// Breakfast, lunch, dinner, ...
    pub meal_type: String,
}

impl MealsMetadata {
    /// Creates meal metadata.
    #[must_use]
    pub fn new(restaurant_name: impl Into<String>, meal_type: impl Into<String>) -> Self {
        Self {
            restaurant_name: restaurant_name.into(),
            meal_type: meal_type.into(),
        }
    }
}

/// Category-specific payload; the variant determines the category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReimbursementMetadata {
    /// Travel details.
    Travel(TravelMetadata),
    /// Meal details.
    Meals(MealsMetadata),
    /// Supplies carry no extra details.
    Supplies,
    /// Other expenses carry no extra details.
    Other,
}

impl ReimbursementMetadata {
    /// The category this payload belongs to.
    #[must_use]
    pub fn category(&self) -> ReimbursementCategory {
        match self {
            Self::Travel(_) => ReimbursementCategory::Travel,
            Self::Meals(_) => ReimbursementCategory::Meals,
            Self::Supplies => ReimbursementCategory::Supplies,
            Self::Other => ReimbursementCategory::Other,
        }
    }

    /// Travel details, if this is travel metadata.
    #[must_use]
    pub fn as_travel(&self) -> Option<&TravelMetadata> {
        match self {
            Self::Travel(travel) => Some(travel),
            _ => None,
        }
    }
}

/// An employee's expense claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ReimbursementRecord", try_from = "ReimbursementRecord")]
pub struct Reimbursement {
    /// Unique identifier.
    pub id: ReimbursementId,
    /// Employee that filed the claim, e.g. `EMP001`.
    pub employee_id: String,
    /// Claimed amount, expected positive.
    pub amount: Decimal,
    /// When the expense occurred.
    pub date: DateTime<Utc>,
    /// Lifecycle status.
    pub status: ReimbursementStatus,
    /// Category-specific payload.
    pub metadata: ReimbursementMetadata,
    /// Free-form description.
    pub description: String,
}

impl Reimbursement {
    /// Creates a pending reimbursement with a fresh id.
    #[must_use]
    pub fn new(
        employee_id: impl Into<String>,
        amount: Decimal,
        date: DateTime<Utc>,
        metadata: ReimbursementMetadata,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: ReimbursementId::new(),
            employee_id: employee_id.into(),
            amount,
            date,
            status: ReimbursementStatus::Pending,
            metadata,
            description: description.into(),
        }
    }

    /// Category, derived from the metadata variant.
    #[must_use]
    pub fn category(&self) -> ReimbursementCategory {
        self.metadata.category()
    }
}

/// Errors raised when a flat record does not describe a valid reimbursement.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// Status and timestamps disagree.
    #[error("status {status} does not match the approvedAt/rejectedAt fields")]
    StatusTimestampMismatch {
        /// Declared status.
        status: StatusKind,
    },

    /// Metadata does not belong to the declared category.
    #[error("metadata does not match category {category}")]
    MetadataMismatch {
        /// Declared category.
        category: ReimbursementCategory,
    },
}

/// Flat wire shape of a reimbursement.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReimbursementRecord {
    id: ReimbursementId,
    employee_id: String,
    amount: Decimal,
    date: DateTime<Utc>,
    status: StatusKind,
    category: ReimbursementCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<MetadataRecord>,
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    approved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rejected_at: Option<DateTime<Utc>>,
}

/// Wire metadata. Payload-free categories serialize without a `metadata`
/// key but also accept `null` or `{}` on input.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum MetadataRecord {
    Travel(TravelMetadata),
    Meals(MealsMetadata),
    Empty(EmptyMetadata),
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct EmptyMetadata {}

impl From<Reimbursement> for ReimbursementRecord {
    fn from(r: Reimbursement) -> Self {
        let category = r.category();
        let metadata = match r.metadata {
            ReimbursementMetadata::Travel(travel) => Some(MetadataRecord::Travel(travel)),
            ReimbursementMetadata::Meals(meals) => Some(MetadataRecord::Meals(meals)),
            ReimbursementMetadata::Supplies | ReimbursementMetadata::Other => None,
        };
        Self {
            id: r.id,
            employee_id: r.employee_id,
            amount: r.amount,
            date: r.date,
            status: r.status.kind(),
            category,
            metadata,
            description: r.description,
            approved_at: r.status.approved_at(),
            rejected_at: r.status.rejected_at(),
        }
    }
}

impl TryFrom<ReimbursementRecord> for Reimbursement {
    type Error = RecordError;

    fn try_from(record: ReimbursementRecord) -> Result<Self, Self::Error> {
        let status = match (record.status, record.approved_at, record.rejected_at) {
            (StatusKind::Pending, None, None) => ReimbursementStatus::Pending,
            (StatusKind::Approved, Some(approved_at), None) => {
                ReimbursementStatus::Approved { approved_at }
            }
            (StatusKind::Rejected, None, Some(rejected_at)) => {
                ReimbursementStatus::Rejected { rejected_at }
            }
            (status, _, _) => return Err(RecordError::StatusTimestampMismatch { status }),
        };

        let metadata = match (record.category, record.metadata) {
            (ReimbursementCategory::Travel, Some(MetadataRecord::Travel(travel))) => {
                ReimbursementMetadata::Travel(travel)
            }
            (ReimbursementCategory::Meals, Some(MetadataRecord::Meals(meals))) => {
                ReimbursementMetadata::Meals(meals)
            }
            (ReimbursementCategory::Supplies, None | Some(MetadataRecord::Empty(_))) => {
                ReimbursementMetadata::Supplies
            }
            (ReimbursementCategory::Other, None | Some(MetadataRecord::Empty(_))) => {
                ReimbursementMetadata::Other
            }
            (category, _) => return Err(RecordError::MetadataMismatch { category }),
        };

        Ok(Self {
            id: record.id,
            employee_id: record.employee_id,
            amount: record.amount,
            date: record.date,
            status,
            metadata,
            description: record.description,
        })
    }
}
