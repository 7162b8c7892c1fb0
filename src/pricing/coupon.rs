//! Coupon actions.
//!
//! Every action takes the current context by reference and returns the
//! next one. None of them can fail: missing coupon data is an expected
//! case and simply leaves no coupon selected.

use super::context::{CouponToApply, CouponType, PricingContext};
use super::payload::PricingData;
use super::state::CouponStatus;
use crate::core::{Choice, Guard};
use serde_json::Value;
use tracing::{debug, warn};

/// Store a freshly fetched payload and reconcile the coupon selection.
///
/// - A payload whose plans fail validation is stored as-is and the coupon
///   selection is left alone.
/// - If the selected plan has no discounted price the coupon is cleared.
/// - If the server applied the coupon it lists as the default one, that
///   coupon becomes the selection.
/// - Otherwise the previous selection (for example a PPP coupon the user
///   applied) is kept.
pub fn assign_pricing_data(context: &PricingContext, payload: Value) -> PricingContext {
    let data = PricingData::from_payload(payload);
    let mut next = context.clone();

    if !data.is_valid() {
        warn!(
            violations = ?data.violations(),
            "pricing payload failed validation, keeping it without coupon inference"
        );
        next.pricing_data = Some(data);
        return next;
    }

    let has_discount = data
        .selected_plan(context.price_id.as_deref())
        .and_then(|plan| plan.price_discounted)
        .is_some();

    if !has_discount {
        if next.coupon_to_apply.is_some() {
            debug!(
                price_id = ?context.price_id,
                "selected plan has no discounted price, clearing coupon"
            );
        }
        next.coupon_to_apply = None;
    } else if let Some(code) = applied_default_coupon(&data) {
        next.coupon_to_apply = Some(CouponToApply::default_coupon(code));
    }

    next.pricing_data = Some(data);
    next
}

/// Default coupon code, provided the server both offers and applied it.
fn applied_default_coupon(data: &PricingData) -> Option<&str> {
    let offered = data.available_coupons().default.as_ref()?;
    let applied = data.applied_coupon()?;
    (offered.coupon_code == applied.coupon_code).then_some(offered.coupon_code.as_str())
}

/// Select the regional coupon from the loaded pricing data.
///
/// When the data offers no PPP coupon the selection becomes empty.
pub fn apply_ppp_coupon(context: &PricingContext) -> PricingContext {
    let coupon = context
        .pricing_data
        .as_ref()
        .and_then(|data| data.available_coupons().ppp.as_ref())
        .map(|ppp| CouponToApply::ppp(ppp.coupon_code.clone()));

    if coupon.is_none() {
        debug!("no PPP coupon available");
    }

    PricingContext {
        coupon_to_apply: coupon,
        ..context.clone()
    }
}

/// Drop whatever coupon is selected.
pub fn remove_ppp_coupon(context: &PricingContext) -> PricingContext {
    PricingContext {
        coupon_to_apply: None,
        ..context.clone()
    }
}

/// Pick the coupon sub-state for a context entering `pricesLoaded`.
pub fn evaluate_coupon_status(context: &PricingContext) -> CouponStatus {
    coupon_status_choice().choose(context)
}

fn coupon_status_choice() -> Choice<PricingContext, CouponStatus> {
    Choice::new(CouponStatus::WithoutCoupon)
        .when(
            Guard::new(|c: &PricingContext| c.coupon_type() == Some(CouponType::Ppp)),
            CouponStatus::WithPppCoupon,
        )
        .when(
            Guard::new(|c: &PricingContext| c.coupon_type() == Some(CouponType::Default)),
            CouponStatus::WithDefaultCoupon,
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn discounted_payload(applied: &str) -> Value {
        json!({
            "plans": [{"planId": "p1", "priceDiscounted": 10}],
            "available_coupons": {"default": {"coupon_code": "D1"}},
            "applied_coupon": {"coupon_code": applied}
        })
    }

    #[test]
    fn default_coupon_is_inferred_when_server_applied_it() {
        let context = PricingContext::default().with_price_id("p1");

        let next = assign_pricing_data(&context, discounted_payload("D1"));

        assert_eq!(next.coupon_to_apply, Some(CouponToApply::default_coupon("D1")));
        assert_eq!(evaluate_coupon_status(&next), CouponStatus::WithDefaultCoupon);
    }

    #[test]
    fn mismatched_applied_coupon_is_not_inferred() {
        let context = PricingContext::default().with_price_id("p1");

        let next = assign_pricing_data(&context, discounted_payload("OTHER"));

        assert_eq!(next.coupon_to_apply, None);
        assert_eq!(evaluate_coupon_status(&next), CouponStatus::WithoutCoupon);
    }

    #[test]
    fn existing_ppp_coupon_survives_when_no_default_applies() {
        let mut context = PricingContext::default().with_price_id("p1");
        context.coupon_to_apply = Some(CouponToApply::ppp("PPP-IN"));

        let next = assign_pricing_data(&context, discounted_payload("OTHER"));

        assert_eq!(next.coupon_to_apply, Some(CouponToApply::ppp("PPP-IN")));
        assert_eq!(evaluate_coupon_status(&next), CouponStatus::WithPppCoupon);
    }

    #[test]
    fn coupon_is_cleared_for_plan_without_discount() {
        let mut context = PricingContext::default().with_price_id("p2");
        context.coupon_to_apply = Some(CouponToApply::ppp("PPP-IN"));

        let next = assign_pricing_data(
            &context,
            json!({
                "plans": [{"planId": "p1", "priceDiscounted": 10}, {"planId": "p2"}],
                "available_coupons": {
                    "ppp": {"coupon_code": "PPP-IN"},
                    "default": {"coupon_code": "D1"}
                },
                "applied_coupon": {"coupon_code": "D1"}
            }),
        );

        assert_eq!(next.coupon_to_apply, None);
    }

    #[test]
    fn unknown_price_id_clears_coupon() {
        let mut context = PricingContext::default().with_price_id("gone");
        context.coupon_to_apply = Some(CouponToApply::default_coupon("D1"));

        let next = assign_pricing_data(&context, discounted_payload("D1"));

        assert_eq!(next.coupon_to_apply, None);
    }

    #[test]
    fn first_plan_stands_in_when_nothing_is_selected() {
        let next = assign_pricing_data(&PricingContext::default(), discounted_payload("D1"));

        assert_eq!(next.coupon_to_apply, Some(CouponToApply::default_coupon("D1")));
    }

    #[test]
    fn malformed_payload_leaves_coupon_untouched() {
        let mut context = PricingContext::default().with_price_id("p1");
        context.coupon_to_apply = Some(CouponToApply::ppp("PPP-IN"));
        let raw = json!({"plans": "broken", "applied_coupon": {"coupon_code": "D1"}});

        let next = assign_pricing_data(&context, raw.clone());

        assert_eq!(next.coupon_to_apply, Some(CouponToApply::ppp("PPP-IN")));
        assert_eq!(next.pricing_data.as_ref().map(|d| d.raw()), Some(&raw));
    }

    #[test]
    fn apply_ppp_uses_regional_coupon() {
        let context = assign_pricing_data(
            &PricingContext::default(),
            json!({
                "plans": [{"planId": "p1"}],
                "available_coupons": {"ppp": {"coupon_code": "PPP-IN"}}
            }),
        );

        let next = apply_ppp_coupon(&context);

        assert_eq!(next.coupon_to_apply, Some(CouponToApply::ppp("PPP-IN")));
    }

    #[test]
    fn apply_ppp_without_regional_coupon_clears_selection() {
        let mut context = assign_pricing_data(
            &PricingContext::default(),
            json!({"plans": [{"planId": "p1", "priceDiscounted": 3}]}),
        );
        context.coupon_to_apply = Some(CouponToApply::default_coupon("D1"));

        assert_eq!(apply_ppp_coupon(&context).coupon_to_apply, None);
        assert_eq!(
            apply_ppp_coupon(&PricingContext::default()).coupon_to_apply,
            None
        );
    }

    #[test]
    fn remove_clears_any_coupon() {
        let mut context = PricingContext::default();
        context.coupon_to_apply = Some(CouponToApply::ppp("PPP-IN"));

        assert_eq!(remove_ppp_coupon(&context).coupon_to_apply, None);
    }

    #[test]
    fn status_follows_coupon_type() {
        let mut context = PricingContext::default();
        assert_eq!(evaluate_coupon_status(&context), CouponStatus::WithoutCoupon);

        context.coupon_to_apply = Some(CouponToApply::ppp("PPP"));
        assert_eq!(evaluate_coupon_status(&context), CouponStatus::WithPppCoupon);

        context.coupon_to_apply = Some(CouponToApply::default_coupon("D1"));
        assert_eq!(evaluate_coupon_status(&context), CouponStatus::WithDefaultCoupon);
    }
}
