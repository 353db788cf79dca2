//! # SubscriberSet: per-activation, lossless delivery to subscribers
//!
//! A [`SubscriberSet`] lives for one [`Sequencer::activate`](crate::Sequencer::activate)
//! call. Every subscriber gets a worker task and a bounded lane; the sequencer
//! hands each event to every lane and waits for room when a lane is full.
//!
//! ```text
//!   deliver(&Event).await
//!        ├──► [lane S1] (send.await, waits when full) ─► worker S1 ─► on_event()
//!        └──► [lane SN] (send.await, waits when full) ─► worker SN ─► on_event()
//!
//!   close().await ─► lanes dropped ─► workers finish the backlog ─► joined
//! ```
//!
//! ## Guarantees
//! - No event is dropped: a full lane slows the activation down instead.
//! - Per-subscriber FIFO, matching the order the sequencer produced events in.
//! - After [`SubscriberSet::close`] returns, every delivered event was handled.
//! - A subscriber that panics keeps receiving later events; the panic is reported on stderr.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::Event;

use super::Subscribe;

/// Delivery lane of one subscriber.
struct Lane {
    subscriber: &'static str,
    tx: mpsc::Sender<Arc<Event>>,
    worker: JoinHandle<()>,
}

/// Subscribers attached to a single activation.
pub struct SubscriberSet {
    lanes: Vec<Lane>,
}

impl SubscriberSet {
    /// Opens one lane and one worker per subscriber.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let lanes = subs.into_iter().map(Self::open_lane).collect();
        Self { lanes }
    }

    fn open_lane(sub: Arc<dyn Subscribe>) -> Lane {
        let subscriber = sub.name();
        let (tx, mut rx) = mpsc::channel::<Arc<Event>>(sub.queue_capacity().max(1));

        let worker = tokio::spawn(async move {
            while let Some(ev) = rx.recv().await {
                let handled = AssertUnwindSafe(sub.on_event(&ev)).catch_unwind().await;
                if handled.is_err() {
                    eprintln!(
                        "[bootvisor] subscriber '{subscriber}' panicked on event seq={}",
                        ev.seq
                    );
                }
            }
        });

        Lane {
            subscriber,
            tx,
            worker,
        }
    }

    /// Hands `event` to every subscriber, waiting while a lane is full.
    pub async fn deliver(&self, event: &Event) {
        let ev = Arc::new(event.clone());
        for lane in &self.lanes {
            if lane.tx.send(Arc::clone(&ev)).await.is_err() {
                // Only reachable if the worker task itself was aborted.
                eprintln!(
                    "[bootvisor] subscriber '{}' is gone; event seq={} not delivered",
                    lane.subscriber, ev.seq
                );
            }
        }
    }

    /// Closes every lane and waits until the workers handled their backlog.
    pub async fn close(self) {
        let workers: Vec<JoinHandle<()>> = self
            .lanes
            .into_iter()
            .map(|lane| {
                drop(lane.tx);
                lane.worker
            })
            .collect();
        for worker in workers {
            let _ = worker.await;
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lanes.len()
    }
}
