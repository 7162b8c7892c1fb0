//! Pure step logic of the pricing machine.
//!
//! Steps describe their side effects as [`Command`]s instead of running
//! them; the orchestrator is the imperative shell that executes them.
//!
//! # Key Concepts
//!
//! - **Transition**: `(state, event, context) -> Step`, referentially transparent
//! - **Commands**: fetch, debounce, and checkout requests for the shell
//! - **Machine**: applies steps and records history

mod machine;
mod transition;

pub use machine::{PricingMachine, DEFAULT_HISTORY_LIMIT};
pub use transition::{start, transition, Command, FetchRequest, PricingEvent, Step, TransitionError};
