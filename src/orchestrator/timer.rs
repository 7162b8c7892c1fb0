//! Re-triggerable debounce timer.

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Single outstanding debounce timer.
///
/// Restarting aborts the previous sleep and bumps the generation, so a
/// firing that slipped into the queue before the abort is recognised as
/// stale by [`DebounceTimer::take_if_current`].
#[derive(Debug)]
pub(crate) struct DebounceTimer {
    window: Duration,
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl DebounceTimer {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            window,
            generation: 0,
            handle: None,
        }
    }

    /// Cancel any running timer and start a new one that sends its
    /// generation on `fired` once the window elapses.
    pub(crate) fn restart<M, F>(&mut self, fired: UnboundedSender<M>, message: F)
    where
        M: Send + 'static,
        F: FnOnce(u64) -> M + Send + 'static,
    {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        let window = self.window;
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let _ = fired.send(message(generation));
        }));
    }

    /// Consume a firing. Returns `false` for a stale generation.
    pub(crate) fn take_if_current(&mut self, generation: u64) -> bool {
        if self.handle.is_some() && generation == self.generation {
            self.handle = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
