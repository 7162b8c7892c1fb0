//! Pricing domain: widget context, fetched payloads, coupon actions, and
//! the states the widget moves through.

mod context;
mod coupon;
mod payload;
mod state;

pub use context::{CouponToApply, CouponType, FetchId, PricingContext};
pub use coupon::{apply_ppp_coupon, assign_pricing_data, evaluate_coupon_status, remove_ppp_coupon};
pub use payload::{validate_plans, AvailableCoupons, Coupon, Plan, PlanViolation, PricingData};
pub use state::{CouponStatus, PricingState};
