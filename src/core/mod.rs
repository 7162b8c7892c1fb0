//! Core state machine vocabulary.
//!
//! - State definitions via the `State` trait
//! - Guard predicates and ordered guarded choices
//! - Immutable history tracking
//!
//! Everything here is pure; the pricing machine builds on these pieces.

mod guard;
mod history;
mod state;

pub use guard::{Choice, Guard};
pub use history::{StateHistory, StateTransition};
pub use state::State;
