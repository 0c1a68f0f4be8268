//! Property-based tests for ReimbursementWorkflow.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::reimbursement::error::ReimbursementError;
use crate::reimbursement::types::{
    MealsMetadata, ReimbursementCategory, ReimbursementMetadata, ReimbursementStatus, StatusKind,
    TravelMetadata,
};
use crate::reimbursement::workflow::ReimbursementWorkflow;

/// Strategy for generating timestamps within a few decades.
fn arb_timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..2_000_000_000).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

/// Strategy for generating random statuses with timestamps.
fn arb_status() -> impl Strategy<Value = ReimbursementStatus> {
    prop_oneof![
        Just(ReimbursementStatus::Pending),
        arb_timestamp().prop_map(|approved_at| ReimbursementStatus::Approved { approved_at }),
        arb_timestamp().prop_map(|rejected_at| ReimbursementStatus::Rejected { rejected_at }),
    ]
}

/// Strategy for non-negative money amounts with two decimal places.
fn arb_cost() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_travel() -> impl Strategy<Value = TravelMetadata> {
    (
        "[A-Za-z ]{1,20}",
        "[A-Za-z ]{1,40}",
        1u32..500,
        arb_cost(),
        proptest::option::of(arb_cost()),
    )
        .prop_map(|(destination, purpose, participants, single, supplied_total)| {
            let mut travel = TravelMetadata::new(destination, purpose, participants, single);
            travel.total_insurance_cost = supplied_total;
            travel
        })
}

fn arb_metadata() -> impl Strategy<Value = ReimbursementMetadata> {
    prop_oneof![
        arb_travel().prop_map(ReimbursementMetadata::Travel),
        ("[A-Za-z' ]{1,30}", "[A-Za-z]{1,10}").prop_map(|(restaurant, meal)| {
            ReimbursementMetadata::Meals(MealsMetadata::new(restaurant, meal))
        }),
        Just(ReimbursementMetadata::Supplies),
        Just(ReimbursementMetadata::Other),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Accept succeeds exactly when the status is already approved.
    #[test]
    fn prop_confirm_approval_only_from_approved(status in arb_status(), at in arb_timestamp()) {
        let result = ReimbursementWorkflow::confirm_approval(status, at);
        if status.kind() == StatusKind::Approved {
            prop_assert_eq!(result.unwrap(), ReimbursementStatus::Approved { approved_at: at });
        } else {
            let is_invalid_transition =
                matches!(result, Err(ReimbursementError::InvalidStateTransition { .. }));
            prop_assert!(is_invalid_transition);
        }
    }

    /// Reject succeeds exactly when the status is already rejected.
    #[test]
    fn prop_confirm_rejection_only_from_rejected(status in arb_status(), at in arb_timestamp()) {
        let result = ReimbursementWorkflow::confirm_rejection(status, at);
        if status.kind() == StatusKind::Rejected {
            prop_assert_eq!(result.unwrap(), ReimbursementStatus::Rejected { rejected_at: at });
        } else {
            prop_assert!(result.is_err());
        }
    }

    /// The travel total always equals single cost times participants.
    #[test]
    fn prop_enrich_recomputes_travel_total(travel in arb_travel()) {
        let expected = travel.single_insurance_cost.checked_mul(Decimal::from(travel.participants));
        let enriched =
            ReimbursementWorkflow::enrich_metadata(ReimbursementMetadata::Travel(travel)).unwrap();
        prop_assert_eq!(enriched.as_travel().unwrap().total_insurance_cost, expected);
    }

    /// Enrichment never changes the category.
    #[test]
    fn prop_enrich_preserves_category(metadata in arb_metadata()) {
        let category = metadata.category();
        prop_assert_eq!(ReimbursementWorkflow::enrich_metadata(metadata).unwrap().category(), category);
    }

    /// Validation accepts well-formed metadata for its own category only.
    #[test]
    fn prop_validate_matches_category(metadata in arb_metadata()) {
        for expected in [
            ReimbursementCategory::Travel,
            ReimbursementCategory::Meals,
            ReimbursementCategory::Supplies,
            ReimbursementCategory::Other,
        ] {
            let result = ReimbursementWorkflow::validate_metadata(expected, &metadata);
            prop_assert_eq!(result.is_ok(), expected == metadata.category());
        }
    }
}
