//! Core State trait for machine states.
//!
//! States are plain values. Inspecting them never has side effects, which
//! keeps transition logic testable without a runtime.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: states are copied into history records and snapshots
/// - `PartialEq`: transitions compare states to detect re-entry
/// - `Debug`: states show up in logs and test failures
/// - `Serialize` + `Deserialize`: snapshots persist the current state
///
/// # Example
///
/// ```rust
/// use pricing_machine::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum CartState {
///     Open,
///     Paid,
///     Abandoned,
/// }
///
/// impl State for CartState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "open",
///             Self::Paid => "paid",
///             Self::Abandoned => "abandoned",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Paid | Self::Abandoned)
///     }
///
///     fn is_error(&self) -> bool {
///         matches!(self, Self::Abandoned)
///     }
/// }
///
/// assert!(CartState::Abandoned.is_error());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Name used for display and logging.
    fn name(&self) -> &str;

    /// Whether the state is terminal.
    ///
    /// A machine in a final state accepts no further events.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Whether the state represents a failure.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}
