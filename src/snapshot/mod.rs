//! Read surface of a pricing widget.
//!
//! A snapshot captures everything a UI needs to render the widget (state,
//! quantity, selected coupon, loading and failure indicators) and can be
//! persisted as JSON. Timers and in-flight fetches are never captured.

use crate::core::{State, StateHistory};
use crate::effects::PricingMachine;
use crate::pricing::{PricingContext, PricingState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::SnapshotError;

/// Version identifier for the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable view of one pricing machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// Widget the snapshot belongs to
    pub widget_id: Uuid,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,

    pub state: PricingState,

    pub context: PricingContext,

    pub history: StateHistory<PricingState>,
}

impl PricingSnapshot {
    /// Capture the current state of `machine`.
    pub fn capture(widget_id: Uuid, machine: &PricingMachine) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            widget_id,
            taken_at: Utc::now(),
            state: *machine.current_state(),
            context: machine.context().clone(),
            history: machine.history().clone(),
        }
    }

    pub fn state_name(&self) -> &str {
        self.state.name()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Whether the widget reached its terminal failure state.
    pub fn has_failed(&self) -> bool {
        self.state.is_error()
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    /// Decode a snapshot, rejecting unknown format versions.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }
}

impl PricingMachine {
    /// Rebuild a pure machine from a snapshot.
    pub fn restore(snapshot: PricingSnapshot) -> Self {
        Self::from_parts(snapshot.state, snapshot.context, snapshot.history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::PricingEvent;
    use crate::pricing::CouponStatus;
    use serde_json::json;

    fn loaded_machine() -> PricingMachine {
        let (mut machine, _) = PricingMachine::start(PricingContext::default().with_price_id("p1"));
        machine
            .send(&PricingEvent::FetchSucceeded {
                fetch_id: 1,
                payload: json!({
                    "plans": [{"planId": "p1", "priceDiscounted": 10}],
                    "available_coupons": {"default": {"coupon_code": "D1"}},
                    "applied_coupon": {"coupon_code": "D1"}
                }),
            })
            .unwrap();
        machine
    }

    #[test]
    fn capture_reflects_machine() {
        let machine = loaded_machine();
        let snapshot = PricingSnapshot::capture(Uuid::new_v4(), &machine);

        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.state_name(), "pricesLoaded.withDefaultCoupon");
        assert!(!snapshot.is_loading());
        assert!(!snapshot.has_failed());
        assert_eq!(snapshot.history.transitions().len(), 1);
    }

    #[test]
    fn json_round_trip_restores_machine() {
        let machine = loaded_machine();
        let snapshot = PricingSnapshot::capture(Uuid::new_v4(), &machine);

        let restored = PricingSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(restored, snapshot);

        let rebuilt = PricingMachine::restore(restored);
        assert_eq!(rebuilt, machine);
        assert_eq!(
            rebuilt.current_state(),
            &PricingState::PricesLoaded(CouponStatus::WithDefaultCoupon)
        );
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut snapshot = PricingSnapshot::capture(Uuid::new_v4(), &loaded_machine());
        snapshot.version = 99;
        let json = snapshot.to_json().unwrap();

        match PricingSnapshot::from_json(&json) {
            Err(SnapshotError::UnsupportedVersion { found, supported }) => {
                assert_eq!(found, 99);
                assert_eq!(supported, SNAPSHOT_VERSION);
            }
            other => panic!("expected version error, got {other:?}"),
        }
    }

    #[test]
    fn garbage_fails_to_decode() {
        assert!(matches!(
            PricingSnapshot::from_json("{not json"),
            Err(SnapshotError::DeserializationFailed(_))
        ));
    }
}
