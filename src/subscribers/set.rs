//! # Sink fan-out for run and provider spans.
//!
//! The orchestrator and every provider task publish into one [`SubscriberSet`]
//! per orchestrator. Publishing never waits on a subscriber, so a slow or broken
//! sink cannot stretch a run past its deadline.
//!
//! ```text
//! Orchestrator::run ─┐                 ┌─► [bounded queue] ─► worker ─► LogWriter::on_event
//! run_provider (×N) ─┴─► emit(Event) ──┼─► [bounded queue] ─► worker ─► Metrics::on_event
//!                                      └─► [bounded queue] ─► worker ─► ...
//! ```
//!
//! - Events reach each subscriber in publish order; two subscribers may see them at different times.
//! - A full queue drops the event for that subscriber only (logged, never retried).
//! - A panicking `on_event` is logged; the worker keeps consuming.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::warn;

use crate::error::panic_message;
use crate::events::Event;

use super::Subscribe;

/// Sending side of one subscriber's queue.
struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Per-orchestrator fan-out of span events to registered subscribers.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
}

impl SubscriberSet {
    /// Spawns one delivery worker per subscriber.
    ///
    /// `default_capacity` sizes the queue of every subscriber without its own
    /// [`Subscribe::queue_capacity`]. Spawning requires a tokio runtime unless
    /// `subs` is empty.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, default_capacity: usize) -> Self {
        let (channels, workers): (Vec<_>, Vec<_>) = subs
            .into_iter()
            .map(|sub| {
                let capacity = sub.queue_capacity().unwrap_or(default_capacity).max(1);
                let (sender, receiver) = mpsc::channel::<Arc<Event>>(capacity);
                let channel = SubscriberChannel {
                    name: sub.name(),
                    sender,
                };
                (channel, tokio::spawn(deliver(sub, receiver)))
            })
            .unzip();

        Self { channels, workers }
    }

    /// Hands `event` to every subscriber queue without waiting.
    ///
    /// A subscriber whose queue is full or whose worker is gone misses this event;
    /// the miss is logged under its name.
    pub fn emit(&self, event: Event) {
        if self.channels.is_empty() {
            return;
        }
        let ev = Arc::new(event);
        for channel in &self.channels {
            match channel.sender.try_send(Arc::clone(&ev)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(subscriber = channel.name, seq = ev.seq, "dropped event: queue full");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    warn!(subscriber = channel.name, seq = ev.seq, "dropped event: worker closed");
                }
            }
        }
    }

    /// Closes every queue and waits for the workers to deliver what is already queued.
    ///
    /// Used by `Orchestrator::shutdown` once no run is in flight.
    pub async fn shutdown(self) {
        let Self { channels, workers } = self;
        drop(channels);
        for worker in workers {
            if let Err(err) = worker.await {
                warn!(error = %err, "subscriber worker did not finish cleanly");
            }
        }
    }

    /// True when events go nowhere (no subscriber registered).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of registered subscribers, one worker each.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}

/// Drains one subscriber's queue until every sender is gone.
async fn deliver(sub: Arc<dyn Subscribe>, mut receiver: mpsc::Receiver<Arc<Event>>) {
    while let Some(event) = receiver.recv().await {
        let handled = AssertUnwindSafe(sub.on_event(&event)).catch_unwind().await;
        if let Err(payload) = handled {
            warn!(
                subscriber = sub.name(),
                seq = event.seq,
                panic = %panic_message(payload.as_ref()),
                "subscriber panicked; event skipped"
            );
        }
    }
}
