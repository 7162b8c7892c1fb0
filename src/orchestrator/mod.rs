//! Imperative shell around the pricing machine.
//!
//! Each widget gets one tokio task that owns its [`PricingMachine`], its
//! debounce timer, and the pricing client. Handles talk to the task over a
//! queue, so events are processed one at a time in submission order.
//! Fetch completions and timer firings come back through a second,
//! internal queue and are fed to the machine like any other event.

mod client;
mod timer;

pub use client::{FetchError, PricingClient};

use crate::config::{ConfigError, OrchestratorConfig};
use crate::core::State;
use crate::effects::{Command, FetchRequest, PricingEvent, PricingMachine};
use crate::error::PricingError;
use crate::pricing::PricingContext;
use crate::snapshot::PricingSnapshot;
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use timer::DebounceTimer;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

type CheckoutCallback = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

enum Input {
    Event(PricingEvent),
    ConfirmPrice(CheckoutCallback),
}

enum Internal {
    DebounceFired(u64),
    Fetched(PricingEvent),
}

/// Handle to a running pricing widget.
///
/// Cheap to clone. The widget task stops once every handle is dropped.
#[derive(Clone, Debug)]
pub struct PricingHandle {
    widget_id: Uuid,
    events: mpsc::Sender<Input>,
    snapshots: watch::Receiver<PricingSnapshot>,
}

impl std::fmt::Debug for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Event(event) => f.debug_tuple("Event").field(event).finish(),
            Self::ConfirmPrice(_) => f.write_str("ConfirmPrice(..)"),
        }
    }
}

impl PricingHandle {
    /// Start a widget with a fresh context and begin loading prices.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        client: Arc<dyn PricingClient>,
        config: OrchestratorConfig,
    ) -> Result<Self, PricingError> {
        let context = PricingContext::with_quantity(config.initial_quantity());
        Self::spawn_with_context(client, config, context)
    }

    /// Start a widget from a prepared context, for example one with a plan
    /// already selected.
    pub fn spawn_with_context(
        client: Arc<dyn PricingClient>,
        config: OrchestratorConfig,
        context: PricingContext,
    ) -> Result<Self, PricingError> {
        config
            .validate()
            .into_result()
            .map_err(ConfigError::Invalid)?;

        let widget_id = Uuid::new_v4();
        let (machine, initial) = PricingMachine::start(context);
        let machine = machine.with_history_limit(config.history_limit);
        let (snapshot_tx, snapshot_rx) =
            watch::channel(PricingSnapshot::capture(widget_id, &machine));
        let (events_tx, events_rx) = mpsc::channel(config.event_buffer);
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();

        let orchestrator = Orchestrator {
            widget_id,
            machine,
            client,
            timer: DebounceTimer::new(config.debounce),
            internal: internal_tx,
            snapshots: snapshot_tx,
        };
        let span = info_span!("pricing_widget", %widget_id);
        tokio::spawn(
            orchestrator
                .run(events_rx, internal_rx, initial)
                .instrument(span),
        );

        Ok(Self {
            widget_id,
            events: events_tx,
            snapshots: snapshot_rx,
        })
    }

    pub fn widget_id(&self) -> Uuid {
        self.widget_id
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> PricingSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified after every processed event.
    pub fn subscribe(&self) -> watch::Receiver<PricingSnapshot> {
        self.snapshots.clone()
    }

    /// Wait until a published snapshot satisfies `predicate`.
    ///
    /// The current snapshot is checked first.
    pub async fn wait_for<P>(&self, predicate: P) -> Result<PricingSnapshot, PricingError>
    where
        P: FnMut(&PricingSnapshot) -> bool,
    {
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(predicate)
            .await
            .map_err(|_| PricingError::Closed)?;
        Ok(snapshot.clone())
    }

    /// Record a quantity edit. Prices reload once edits go quiet.
    pub async fn change_quantity(&self, quantity: u32) -> Result<(), PricingError> {
        let quantity = NonZeroU32::new(quantity).ok_or(PricingError::InvalidQuantity(quantity))?;
        self.send(Input::Event(PricingEvent::QuantityChanged { quantity }))
            .await
    }

    pub async fn apply_ppp_coupon(&self) -> Result<(), PricingError> {
        self.send(Input::Event(PricingEvent::ApplyPppCoupon)).await
    }

    pub async fn remove_ppp_coupon(&self) -> Result<(), PricingError> {
        self.send(Input::Event(PricingEvent::RemovePppCoupon)).await
    }

    pub async fn switch_price(&self, price_id: impl Into<String>) -> Result<(), PricingError> {
        self.send(Input::Event(PricingEvent::SwitchPrice {
            price_id: price_id.into(),
        }))
        .await
    }

    /// Confirm the selected price and run `on_click_checkout`.
    ///
    /// The callback is spawned only if prices are loaded. Its outcome is
    /// never observed by the widget.
    pub async fn confirm_price<F, Fut>(&self, on_click_checkout: F) -> Result<(), PricingError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let callback: CheckoutCallback = Box::new(move || on_click_checkout().boxed());
        self.send(Input::ConfirmPrice(callback)).await
    }

    async fn send(&self, input: Input) -> Result<(), PricingError> {
        self.events
            .send(input)
            .await
            .map_err(|_| PricingError::Closed)
    }
}

struct Orchestrator {
    widget_id: Uuid,
    machine: PricingMachine,
    client: Arc<dyn PricingClient>,
    timer: DebounceTimer,
    internal: mpsc::UnboundedSender<Internal>,
    snapshots: watch::Sender<PricingSnapshot>,
}

impl Orchestrator {
    async fn run(
        mut self,
        mut events: mpsc::Receiver<Input>,
        mut internal: mpsc::UnboundedReceiver<Internal>,
        initial: Vec<Command>,
    ) {
        info!("pricing widget started");
        self.execute(initial, None);

        loop {
            tokio::select! {
                Some(message) = internal.recv() => self.handle_internal(message),
                input = events.recv() => match input {
                    Some(input) => self.handle_input(input),
                    None => break,
                },
            }
        }

        self.timer.cancel();
        info!(state = %self.machine.current_state().name(), "pricing widget stopped");
    }

    fn handle_input(&mut self, input: Input) {
        match input {
            Input::Event(event) => self.dispatch(&event, None),
            Input::ConfirmPrice(callback) => {
                self.dispatch(&PricingEvent::ConfirmPrice, Some(callback))
            }
        }
    }

    fn handle_internal(&mut self, message: Internal) {
        match message {
            Internal::DebounceFired(generation) => {
                if self.timer.take_if_current(generation) {
                    self.dispatch(&PricingEvent::DebounceElapsed, None);
                } else {
                    debug!(generation, "dropping superseded debounce firing");
                }
            }
            Internal::Fetched(event) => self.dispatch(&event, None),
        }
    }

    fn dispatch(&mut self, event: &PricingEvent, checkout: Option<CheckoutCallback>) {
        match self.machine.send(event) {
            Ok(commands) => {
                self.execute(commands, checkout);
                self.publish();
            }
            Err(err) => debug!(event = event.name(), error = %err, "event ignored"),
        }
    }

    fn execute(&mut self, commands: Vec<Command>, mut checkout: Option<CheckoutCallback>) {
        for command in commands {
            match command {
                Command::FetchPricing(request) => self.fetch(request),
                Command::StartDebounce => {
                    self.timer
                        .restart(self.internal.clone(), Internal::DebounceFired);
                }
                Command::RunCheckout => match checkout.take() {
                    Some(callback) => {
                        debug!("running checkout callback");
                        tokio::spawn(callback().in_current_span());
                    }
                    None => warn!("checkout requested without a callback"),
                },
            }
        }
    }

    fn fetch(&self, request: FetchRequest) {
        let FetchRequest {
            fetch_id,
            quantity,
            coupon_code,
        } = request;
        info!(
            fetch_id,
            quantity = quantity.get(),
            coupon = ?coupon_code,
            "fetching prices"
        );

        let client = Arc::clone(&self.client);
        let internal = self.internal.clone();
        tokio::spawn(
            async move {
                let event = match client.fetch_pricing(quantity, coupon_code).await {
                    Ok(payload) => PricingEvent::FetchSucceeded { fetch_id, payload },
                    Err(err) => {
                        warn!(fetch_id, error = %err, "pricing fetch failed");
                        PricingEvent::FetchFailed {
                            fetch_id,
                            reason: err.to_string(),
                        }
                    }
                };
                // The widget may already be gone.
                let _ = internal.send(Internal::Fetched(event));
            }
            .in_current_span(),
        );
    }

    fn publish(&self) {
        self.snapshots
            .send_replace(PricingSnapshot::capture(self.widget_id, &self.machine));
    }
}
