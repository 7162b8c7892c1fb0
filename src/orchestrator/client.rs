//! Fetch collaborator interface.

use async_trait::async_trait;
use serde_json::Value;
use std::num::NonZeroU32;
use thiserror::Error;

/// Failures reported by a pricing client.
///
/// Any of these moves the widget to its terminal failure state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("server responded with {status}: {message}")]
    Server { status: u16, message: String },
}

/// Retrieves pricing data for the widget.
///
/// Implementations must return an error on transport or server failure
/// instead of an empty payload.
#[async_trait]
pub trait PricingClient: Send + Sync {
    async fn fetch_pricing(
        &self,
        quantity: NonZeroU32,
        coupon_code: Option<String>,
    ) -> Result<Value, FetchError>;
}
