//! States of the pricing widget.

use crate::core::State;
use serde::{Deserialize, Serialize};

/// Coupon sub-state held while prices are loaded.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CouponStatus {
    /// A regional purchasing-power-parity coupon is selected
    #[serde(rename = "withPPPCoupon")]
    WithPppCoupon,
    /// The server applied the site-wide default coupon
    WithDefaultCoupon,
    WithoutCoupon,
}

/// Top-level pricing state.
///
/// `PricesLoaded` carries the coupon sub-state decided on entry.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "coupon")]
pub enum PricingState {
    LoadingPrices,
    DebouncingQuantityChange,
    PricesLoaded(CouponStatus),
    PricingFetchFailed,
}

impl PricingState {
    /// The coupon sub-state, if prices are loaded.
    pub fn coupon_status(&self) -> Option<CouponStatus> {
        match self {
            Self::PricesLoaded(status) => Some(*status),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::LoadingPrices | Self::DebouncingQuantityChange)
    }
}

impl Default for PricingState {
    fn default() -> Self {
        Self::LoadingPrices
    }
}

impl State for PricingState {
    fn name(&self) -> &str {
        match self {
            Self::LoadingPrices => "loadingPrices",
            Self::DebouncingQuantityChange => "debouncingQuantityChange",
            Self::PricesLoaded(CouponStatus::WithPppCoupon) => "pricesLoaded.withPPPCoupon",
            Self::PricesLoaded(CouponStatus::WithDefaultCoupon) => {
                "pricesLoaded.withDefaultCoupon"
            }
            Self::PricesLoaded(CouponStatus::WithoutCoupon) => "pricesLoaded.withoutCoupon",
            Self::PricingFetchFailed => "pricingFetchFailed",
        }
    }

    fn is_final(&self) -> bool {
        matches!(self, Self::PricingFetchFailed)
    }

    fn is_error(&self) -> bool {
        matches!(self, Self::PricingFetchFailed)
    }
}
