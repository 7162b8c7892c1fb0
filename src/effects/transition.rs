//! The pure transition function of the pricing machine.
//!
//! `transition` maps `(state, event, context)` to the next state, the next
//! context, and the commands the shell must carry out. It performs no I/O
//! and reads no clock, so the same inputs always give the same step.

use crate::core::State;
use crate::pricing::{
    apply_ppp_coupon, assign_pricing_data, evaluate_coupon_status, remove_ppp_coupon,
    CouponStatus, FetchId, PricingContext, PricingState,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::num::NonZeroU32;

/// Events the pricing machine accepts.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "type")]
pub enum PricingEvent {
    QuantityChanged { quantity: NonZeroU32 },
    /// The debounce window passed without further quantity edits.
    DebounceElapsed,
    ApplyPppCoupon,
    RemovePppCoupon,
    SwitchPrice { price_id: String },
    ConfirmPrice,
    FetchSucceeded { fetch_id: FetchId, payload: Value },
    FetchFailed { fetch_id: FetchId, reason: String },
}

impl PricingEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::QuantityChanged { .. } => "quantityChanged",
            Self::DebounceElapsed => "debounceElapsed",
            Self::ApplyPppCoupon => "applyPppCoupon",
            Self::RemovePppCoupon => "removePppCoupon",
            Self::SwitchPrice { .. } => "switchPrice",
            Self::ConfirmPrice => "confirmPrice",
            Self::FetchSucceeded { .. } => "fetchSucceeded",
            Self::FetchFailed { .. } => "fetchFailed",
        }
    }
}

/// Arguments for one call to the fetch collaborator.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
    pub fetch_id: FetchId,
    pub quantity: NonZeroU32,
    pub coupon_code: Option<String>,
}

/// Side effects requested by a step.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Command {
    FetchPricing(FetchRequest),
    /// Cancel any running debounce timer and start a fresh one.
    StartDebounce,
    /// Invoke the checkout callback that came with `ConfirmPrice`.
    RunCheckout,
}

/// Outcome of a handled event.
#[derive(Clone, PartialEq, Debug)]
pub struct Step {
    pub state: PricingState,
    pub context: PricingContext,
    pub commands: Vec<Command>,
    /// `false` when the event was handled without entering a state.
    pub transitioned: bool,
}

impl Step {
    fn enter(state: PricingState, context: PricingContext, commands: Vec<Command>) -> Self {
        Self {
            state,
            context,
            commands,
            transitioned: true,
        }
    }

    fn stay(state: PricingState, context: PricingContext, commands: Vec<Command>) -> Self {
        Self {
            state,
            context,
            commands,
            transitioned: false,
        }
    }
}

/// Reasons an event leaves the machine untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("state '{state}' is terminal, ignoring '{event}'")]
    Terminal { state: String, event: &'static str },

    #[error("state '{state}' does not handle '{event}'")]
    Unhandled { state: String, event: &'static str },

    #[error("discarding completion of fetch #{fetch_id}, latest is #{latest} in state '{state}'")]
    StaleFetch {
        fetch_id: FetchId,
        latest: FetchId,
        state: String,
    },
}

/// Compute the step for `event` in `state` with `context`.
pub fn transition(
    state: &PricingState,
    event: &PricingEvent,
    context: &PricingContext,
) -> Result<Step, TransitionError> {
    if state.is_final() {
        return Err(TransitionError::Terminal {
            state: state.name().to_string(),
            event: event.name(),
        });
    }

    match (state, event) {
        (_, PricingEvent::QuantityChanged { quantity }) => {
            let next = PricingContext {
                quantity: *quantity,
                ..context.clone()
            };
            Ok(Step::enter(
                PricingState::DebouncingQuantityChange,
                next,
                vec![Command::StartDebounce],
            ))
        }

        (PricingState::DebouncingQuantityChange, PricingEvent::DebounceElapsed) => {
            Ok(enter_loading(context.clone()))
        }

        (
            PricingState::LoadingPrices,
            PricingEvent::FetchSucceeded { fetch_id, payload },
        ) if *fetch_id == context.fetch_id => {
            let next = assign_pricing_data(context, payload.clone());
            Ok(enter_prices_loaded(next))
        }

        (PricingState::LoadingPrices, PricingEvent::FetchFailed { fetch_id, .. })
            if *fetch_id == context.fetch_id =>
        {
            Ok(Step::enter(
                PricingState::PricingFetchFailed,
                context.clone(),
                Vec::new(),
            ))
        }

        (
            _,
            PricingEvent::FetchSucceeded { fetch_id, .. } | PricingEvent::FetchFailed { fetch_id, .. },
        ) => Err(TransitionError::StaleFetch {
            fetch_id: *fetch_id,
            latest: context.fetch_id,
            state: state.name().to_string(),
        }),

        (PricingState::PricesLoaded(_), PricingEvent::SwitchPrice { price_id }) => {
            let next = PricingContext {
                price_id: Some(price_id.clone()),
                ..context.clone()
            };
            Ok(Step::stay(*state, next, Vec::new()))
        }

        (PricingState::PricesLoaded(_), PricingEvent::ConfirmPrice) => Ok(Step::stay(
            *state,
            context.clone(),
            vec![Command::RunCheckout],
        )),

        (
            PricingState::PricesLoaded(CouponStatus::WithPppCoupon),
            PricingEvent::RemovePppCoupon,
        ) => Ok(enter_loading(remove_ppp_coupon(context))),

        (
            PricingState::PricesLoaded(
                CouponStatus::WithDefaultCoupon | CouponStatus::WithoutCoupon,
            ),
            PricingEvent::ApplyPppCoupon,
        ) => Ok(enter_loading(apply_ppp_coupon(context))),

        _ => Err(TransitionError::Unhandled {
            state: state.name().to_string(),
            event: event.name(),
        }),
    }
}

/// Initial step: the machine starts by loading prices.
pub fn start(context: PricingContext) -> Step {
    enter_loading(context)
}

fn enter_loading(mut context: PricingContext) -> Step {
    context.fetch_id += 1;
    let request = FetchRequest {
        fetch_id: context.fetch_id,
        quantity: context.quantity,
        coupon_code: context.coupon_code().map(str::to_string),
    };
    Step::enter(
        PricingState::LoadingPrices,
        context,
        vec![Command::FetchPricing(request)],
    )
}

fn enter_prices_loaded(context: PricingContext) -> Step {
    let status = evaluate_coupon_status(&context);
    Step::enter(PricingState::PricesLoaded(status), context, Vec::new())
}
