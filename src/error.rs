//! Errors surfaced by the pricing handle.

use crate::config::ConfigError;
use thiserror::Error;

/// Errors returned to callers driving a pricing widget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("quantity must be a positive integer, got {0}")]
    InvalidQuantity(u32),

    #[error("pricing widget has shut down")]
    Closed,

    #[error(transparent)]
    Config(#[from] ConfigError),
}
