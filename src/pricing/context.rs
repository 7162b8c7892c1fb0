//! Mutable record owned by one pricing widget.

use super::payload::PricingData;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Identifier attached to every issued fetch.
pub type FetchId = u64;

/// Kind of discount the widget intends to apply.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouponType {
    /// Regional purchasing-power-parity discount
    Ppp,
    /// Site-wide discount
    Default,
}

/// Discount sent along with the next fetch or checkout.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponToApply {
    pub coupon_code: String,
    pub coupon_type: CouponType,
}

impl CouponToApply {
    pub fn ppp(coupon_code: impl Into<String>) -> Self {
        Self {
            coupon_code: coupon_code.into(),
            coupon_type: CouponType::Ppp,
        }
    }

    pub fn default_coupon(coupon_code: impl Into<String>) -> Self {
        Self {
            coupon_code: coupon_code.into(),
            coupon_type: CouponType::Default,
        }
    }
}

/// Widget context.
///
/// Created once per widget and only ever changed by the machine's own
/// actions.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingContext {
    pub pricing_data: Option<PricingData>,
    pub price_id: Option<String>,
    pub quantity: NonZeroU32,
    pub coupon_to_apply: Option<CouponToApply>,
    /// Id of the most recently issued fetch; `0` before the first one.
    pub fetch_id: FetchId,
}

impl Default for PricingContext {
    fn default() -> Self {
        Self::with_quantity(NonZeroU32::MIN)
    }
}

impl PricingContext {
    pub fn with_quantity(quantity: NonZeroU32) -> Self {
        Self {
            pricing_data: None,
            price_id: None,
            quantity,
            coupon_to_apply: None,
            fetch_id: 0,
        }
    }

    /// Preselect a plan before the first fetch completes.
    pub fn with_price_id(mut self, price_id: impl Into<String>) -> Self {
        self.price_id = Some(price_id.into());
        self
    }

    pub fn coupon_type(&self) -> Option<CouponType> {
        self.coupon_to_apply.as_ref().map(|c| c.coupon_type)
    }

    pub fn coupon_code(&self) -> Option<&str> {
        self.coupon_to_apply
            .as_ref()
            .map(|c| c.coupon_code.as_str())
    }
}
