//! Pricing machine: a pure functional state machine for pricing widgets
//!
//! The machine governs how a pricing/checkout widget fetches, re-fetches,
//! and mutates pricing data as the user changes quantity, applies or
//! removes a regional (PPP) discount, switches plans, and confirms
//! checkout.
//!
//! Following the "pure core, imperative shell" split:
//!
//! - [`effects::transition`] is a pure function from state, event, and
//!   context to the next state, context, and requested commands.
//! - [`orchestrator`] runs the machine on tokio, owns the single debounce
//!   timer, and calls the [`PricingClient`] collaborator.
//!
//! # Core Concepts
//!
//! - **State**: [`PricingState`], with coupon sub-states under `pricesLoaded`
//! - **Guards**: ordered predicates deciding the coupon sub-state
//! - **History**: immutable tracking of state transitions over time
//!
//! # Example
//!
//! ```rust
//! use pricing_machine::{Command, PricingContext, PricingEvent, PricingMachine, PricingState};
//! use pricing_machine::pricing::{CouponStatus, CouponToApply};
//! use serde_json::json;
//!
//! let (mut machine, commands) = PricingMachine::start(PricingContext::default().with_price_id("p1"));
//! assert!(matches!(&commands[..], [Command::FetchPricing(_)]));
//!
//! machine
//!     .send(&PricingEvent::FetchSucceeded {
//!         fetch_id: 1,
//!         payload: json!({
//!             "plans": [{"planId": "p1", "priceDiscounted": 10}],
//!             "available_coupons": {"default": {"coupon_code": "D1"}},
//!             "applied_coupon": {"coupon_code": "D1"}
//!         }),
//!     })
//!     .unwrap();
//!
//! assert_eq!(
//!     machine.current_state(),
//!     &PricingState::PricesLoaded(CouponStatus::WithDefaultCoupon)
//! );
//! assert_eq!(
//!     machine.context().coupon_to_apply,
//!     Some(CouponToApply::default_coupon("D1"))
//! );
//! ```

pub mod config;
pub mod core;
pub mod effects;
pub mod error;
pub mod orchestrator;
pub mod pricing;
pub mod snapshot;

// Re-export commonly used types
pub use config::{ConfigError, OrchestratorConfig};
pub use crate::core::{Choice, Guard, State, StateHistory, StateTransition};
pub use effects::{Command, FetchRequest, PricingEvent, PricingMachine, TransitionError};
pub use error::PricingError;
pub use orchestrator::{FetchError, PricingClient, PricingHandle};
pub use pricing::{PricingContext, PricingState};
pub use snapshot::{PricingSnapshot, SnapshotError};
