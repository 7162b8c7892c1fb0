//! Pricing payload returned by the fetch collaborator.
//!
//! The collaborator hands back an opaque JSON document. The plan list is
//! validated with [`Validation`] so every problem is reported at once; a
//! payload that fails validation is still kept so the widget can render
//! whatever it contains.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use stillwater::validation::Validation;
use thiserror::Error;

/// A coupon record as sent by the server.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Coupon {
    pub coupon_code: String,
}

/// Coupons the server offers for this widget.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct AvailableCoupons {
    pub ppp: Option<Coupon>,
    pub default: Option<Coupon>,
}

/// A purchasable plan.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Plan {
    #[serde(rename = "planId")]
    pub plan_id: String,
    #[serde(rename = "priceDiscounted", default)]
    pub price_discounted: Option<f64>,
}

/// Problems found in the `plans` list of a payload.
#[derive(Clone, PartialEq, Eq, Debug, Error, Serialize, Deserialize)]
pub enum PlanViolation {
    #[error("payload has no `plans` list")]
    MissingPlans,

    #[error("`plans` is not a list")]
    NotAList,

    #[error("plan #{index} is not an object")]
    NotAnObject { index: usize },

    #[error("plan #{index} has no string `planId`")]
    MissingPlanId { index: usize },

    #[error("plan #{index} has an empty `planId`")]
    EmptyPlanId { index: usize },

    #[error("plan #{index} has an invalid `priceDiscounted`")]
    InvalidDiscount { index: usize },
}

/// Pricing data as stored in the widget context.
///
/// `plans` is `None` when validation failed; `violations` then lists why.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingData {
    raw: Value,
    plans: Option<Vec<Plan>>,
    violations: Vec<PlanViolation>,
    available_coupons: AvailableCoupons,
    applied_coupon: Option<Coupon>,
}

impl PricingData {
    /// Wrap a fetched payload, validating its plan list.
    ///
    /// Coupon records are read leniently: a malformed record counts as
    /// absent.
    pub fn from_payload(raw: Value) -> Self {
        let (plans, violations) = match validate_plans(&raw) {
            Validation::Success(plans) => (Some(plans), Vec::new()),
            Validation::Failure(violations) => (None, violations),
        };

        let available_coupons = AvailableCoupons {
            ppp: read_coupon(&raw, "/available_coupons/ppp"),
            default: read_coupon(&raw, "/available_coupons/default"),
        };
        let applied_coupon = read_coupon(&raw, "/applied_coupon");

        Self {
            raw,
            plans,
            violations,
            available_coupons,
            applied_coupon,
        }
    }

    /// The payload exactly as the collaborator returned it.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Validated plans, or `None` if the plan list was malformed.
    pub fn plans(&self) -> Option<&[Plan]> {
        self.plans.as_deref()
    }

    pub fn is_valid(&self) -> bool {
        self.plans.is_some()
    }

    pub fn violations(&self) -> &[PlanViolation] {
        &self.violations
    }

    pub fn available_coupons(&self) -> &AvailableCoupons {
        &self.available_coupons
    }

    pub fn applied_coupon(&self) -> Option<&Coupon> {
        self.applied_coupon.as_ref()
    }

    /// The plan a widget with `price_id` selected is looking at.
    ///
    /// Without a selection the first plan stands in for it.
    pub fn selected_plan(&self, price_id: Option<&str>) -> Option<&Plan> {
        let plans = self.plans.as_deref()?;
        match price_id {
            Some(id) => plans.iter().find(|plan| plan.plan_id == id),
            None => plans.first(),
        }
    }
}

fn read_coupon(raw: &Value, pointer: &str) -> Option<Coupon> {
    raw.pointer(pointer)
        .and_then(|value| Coupon::deserialize(value).ok())
}

/// Validate the `plans` list of a raw payload, accumulating every violation.
pub fn validate_plans(raw: &Value) -> Validation<Vec<Plan>, Vec<PlanViolation>> {
    let entries = match raw.get("plans") {
        None | Some(Value::Null) => return Validation::Failure(vec![PlanViolation::MissingPlans]),
        Some(Value::Array(entries)) => entries,
        Some(_) => return Validation::Failure(vec![PlanViolation::NotAList]),
    };

    let mut plans = Vec::with_capacity(entries.len());
    let mut violations = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        match validate_plan(index, entry) {
            Validation::Success(plan) => plans.push(plan),
            Validation::Failure(mut found) => violations.append(&mut found),
        }
    }

    if violations.is_empty() {
        Validation::Success(plans)
    } else {
        Validation::Failure(violations)
    }
}

fn validate_plan(index: usize, entry: &Value) -> Validation<Plan, Vec<PlanViolation>> {
    let Some(fields) = entry.as_object() else {
        return Validation::Failure(vec![PlanViolation::NotAnObject { index }]);
    };

    let mut violations = Vec::new();

    let plan_id = match fields.get("planId").and_then(Value::as_str) {
        Some("") => {
            violations.push(PlanViolation::EmptyPlanId { index });
            None
        }
        Some(id) => Some(id.to_string()),
        None => {
            violations.push(PlanViolation::MissingPlanId { index });
            None
        }
    };

    // A null discount is the same as no discount.
    let price_discounted = match fields.get("priceDiscounted") {
        None | Some(Value::Null) => None,
        Some(value) => match value.as_f64() {
            Some(price) if price.is_finite() && price >= 0.0 => Some(price),
            _ => {
                violations.push(PlanViolation::InvalidDiscount { index });
                None
            }
        },
    };

    match plan_id {
        Some(plan_id) if violations.is_empty() => Validation::Success(Plan {
            plan_id,
            price_discounted,
        }),
        _ => Validation::Failure(violations),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_payload_exposes_plans_and_coupons() {
        let data = PricingData::from_payload(json!({
            "plans": [
                {"planId": "p1", "priceDiscounted": 10},
                {"planId": "p2", "name": "Team"}
            ],
            "available_coupons": {
                "ppp": {"coupon_code": "PPP-IN"},
                "default": {"coupon_code": "D1"}
            },
            "applied_coupon": {"coupon_code": "D1"}
        }));

        assert!(data.is_valid());
        let plans = data.plans().unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].price_discounted, Some(10.0));
        assert_eq!(plans[1].price_discounted, None);
        assert_eq!(
            data.available_coupons().ppp.as_ref().map(|c| c.coupon_code.as_str()),
            Some("PPP-IN")
        );
        assert_eq!(
            data.applied_coupon().map(|c| c.coupon_code.as_str()),
            Some("D1")
        );
    }

    #[test]
    fn validation_accumulates_every_violation() {
        let result = validate_plans(&json!({
            "plans": [
                "not a plan",
                {"priceDiscounted": -1},
                {"planId": "", "priceDiscounted": "cheap"},
                {"planId": "ok"}
            ]
        }));

        match result {
            Validation::Failure(violations) => assert_eq!(
                violations,
                vec![
                    PlanViolation::NotAnObject { index: 0 },
                    PlanViolation::MissingPlanId { index: 1 },
                    PlanViolation::InvalidDiscount { index: 1 },
                    PlanViolation::EmptyPlanId { index: 2 },
                    PlanViolation::InvalidDiscount { index: 2 },
                ]
            ),
            Validation::Success(_) => panic!("expected validation to fail"),
        }
    }

    #[test]
    fn missing_or_wrong_plans_shape_is_reported() {
        assert!(matches!(
            validate_plans(&json!({})),
            Validation::Failure(v) if v == vec![PlanViolation::MissingPlans]
        ));
        assert!(matches!(
            validate_plans(&json!({"plans": {"planId": "p1"}})),
            Validation::Failure(v) if v == vec![PlanViolation::NotAList]
        ));
    }

    #[test]
    fn malformed_payload_is_kept_raw() {
        let raw = json!({"plans": 42, "available_coupons": {"ppp": {"coupon_code": "PPP"}}});
        let data = PricingData::from_payload(raw.clone());

        assert!(!data.is_valid());
        assert_eq!(data.raw(), &raw);
        assert_eq!(data.violations(), &[PlanViolation::NotAList]);
        assert!(data.selected_plan(None).is_none());
        // Coupons are still readable from the raw document.
        assert!(data.available_coupons().ppp.is_some());
    }

    #[test]
    fn malformed_coupon_counts_as_absent() {
        let data = PricingData::from_payload(json!({
            "plans": [],
            "available_coupons": {"ppp": {"code": "WRONG-FIELD"}, "default": null},
            "applied_coupon": "D1"
        }));

        assert_eq!(data.available_coupons(), &AvailableCoupons::default());
        assert!(data.applied_coupon().is_none());
    }

    #[test]
    fn selected_plan_defaults_to_first() {
        let data = PricingData::from_payload(json!({
            "plans": [{"planId": "p1"}, {"planId": "p2", "priceDiscounted": 5}]
        }));

        assert_eq!(data.selected_plan(None).map(|p| p.plan_id.as_str()), Some("p1"));
        assert_eq!(
            data.selected_plan(Some("p2")).map(|p| p.plan_id.as_str()),
            Some("p2")
        );
        assert!(data.selected_plan(Some("missing")).is_none());
    }
}
