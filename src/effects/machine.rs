//! Pricing machine value: current state, context, and history.

use crate::core::{State, StateHistory, StateTransition};
use crate::effects::transition::{self, Command, PricingEvent, Step, TransitionError};
use crate::pricing::{PricingContext, PricingState};
use chrono::Utc;
use tracing::debug;

/// Transitions a machine keeps unless told otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 64;

/// Pricing state machine.
///
/// Holds no timers and performs no I/O. `send` applies the pure transition
/// and hands back the commands the caller must execute.
#[derive(Clone, Debug, PartialEq)]
pub struct PricingMachine {
    current: PricingState,
    context: PricingContext,
    history: StateHistory<PricingState>,
}

impl PricingMachine {
    /// Create a machine in `loadingPrices` along with the initial fetch.
    ///
    /// History keeps the last [`DEFAULT_HISTORY_LIMIT`] transitions.
    pub fn start(context: PricingContext) -> (Self, Vec<Command>) {
        let step = transition::start(context);
        let machine = Self {
            current: step.state,
            context: step.context,
            history: StateHistory::new().with_limit(DEFAULT_HISTORY_LIMIT),
        };
        (machine, step.commands)
    }

    /// Keep at most `limit` transitions in the history.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history = self.history.with_limit(limit);
        self
    }

    /// Rebuild a machine from previously captured parts.
    pub fn from_parts(
        current: PricingState,
        context: PricingContext,
        history: StateHistory<PricingState>,
    ) -> Self {
        Self {
            current,
            context,
            history,
        }
    }

    pub fn current_state(&self) -> &PricingState {
        &self.current
    }

    pub fn context(&self) -> &PricingContext {
        &self.context
    }

    pub fn history(&self) -> &StateHistory<PricingState> {
        &self.history
    }

    pub fn is_final(&self) -> bool {
        self.current.is_final()
    }

    /// Process one event to completion.
    ///
    /// On error the machine is unchanged; ignored events are not faults.
    pub fn send(&mut self, event: &PricingEvent) -> Result<Vec<Command>, TransitionError> {
        let step = transition::transition(&self.current, event, &self.context)?;
        Ok(self.apply(event, step))
    }

    fn apply(&mut self, event: &PricingEvent, step: Step) -> Vec<Command> {
        if step.transitioned {
            debug!(
                from = self.current.name(),
                to = step.state.name(),
                event = event.name(),
                "pricing transition"
            );
            self.history = std::mem::take(&mut self.history).record(StateTransition {
                from: self.current,
                to: step.state,
                event: event.name().to_string(),
                timestamp: Utc::now(),
            });
        }
        self.current = step.state;
        self.context = step.context;
        step.commands
    }
}
