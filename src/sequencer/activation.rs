//! # Sequencer: bootstrap first, then hand steady-state tasks to the supervisor.
//!
//! A [`Sequencer`] holds two ordered task lists and a [`Register`] handle to
//! the supervisor. It is typically registered with that same supervisor as a
//! task of its own, so the supervisor's start protocol activates it exactly once.
//!
//! ## Activation flow
//! ```text
//! activate(ctx)
//!   ├─► for each bootstrap task, in order:
//!   │     publish BootstrapStarting
//!   │     task.run(ctx).await              (same token, one at a time)
//!   │       ├─ Ok  ─► publish BootstrapCompleted, continue
//!   │       └─ Err ─► publish BootstrapFailed
//!   │                 return SequenceError::Bootstrap   (nothing else runs or registers)
//!   │
//!   ├─► for each steady-state task, in order:
//!   │     registrar.register(task)
//!   │       ├─ Ok  ─► publish TaskRegistered, continue
//!   │       └─ Err ─► publish RegistrationFailed
//!   │                 return SequenceError::Registration (earlier ones stay registered)
//!   │
//!   └─► publish SequenceCompleted, Ok(())
//! ```
//!
//! ## Rules
//! - Bootstrap tasks never overlap: each starts after the previous one returned.
//! - Steady-state tasks are **not** run here; the supervisor runs them.
//! - Cancellation is the tasks' job. A task started on an already cancelled
//!   token is expected to fail fast; that failure ends the sequence like any other.
//! - No retries. One failure ends the activation.
//! - Activation is not idempotent: calling it again re-runs every bootstrap task.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use tokio_util::sync::CancellationToken;
//! use bootvisor::{Register, RegistrationError, Sequencer, TaskError, TaskFn, TaskRef};
//!
//! #[derive(Default)]
//! struct Pending(Mutex<Vec<String>>);
//!
//! impl Register for Pending {
//!     fn register(&self, task: TaskRef) -> Result<(), RegistrationError> {
//!         self.0.lock().map_err(|_| RegistrationError::Closed)?.push(task.name().to_string());
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let supervisor = Arc::new(Pending::default());
//!
//!     let warm: TaskRef = TaskFn::arc("warm-cache", |_ctx: CancellationToken| async {
//!         Ok::<_, TaskError>(())
//!     });
//!     let serve: TaskRef = TaskFn::arc("serve", |ctx: CancellationToken| async move {
//!         ctx.cancelled().await;
//!         Ok::<_, TaskError>(())
//!     });
//!
//!     let seq = Sequencer::new(supervisor.clone(), vec![warm], vec![serve]);
//!     seq.activate(CancellationToken::new()).await?;
//!
//!     assert_eq!(*supervisor.0.lock().unwrap(), vec!["serve".to_string()]);
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::{
    config::SequencerConfig,
    error::{SequenceError, TaskError},
    events::{Bus, Event, EventKind},
    registrar::{Register, register_each},
    sequencer::builder::SequencerBuilder,
    subscribers::{Subscribe, SubscriberSet},
    tasks::{Task, TaskRef},
};

/// Runs bootstrap tasks to completion, then registers steady-state tasks.
pub struct Sequencer<R> {
    cfg: SequencerConfig,
    registrar: R,
    bootstrap: Vec<TaskRef>,
    steady: Vec<TaskRef>,
    bus: Bus,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

/// Publishes to the bus and, when present, to the activation's subscriber set.
///
/// Bus receivers may lag and skip events; the subscriber set never drops one.
struct Emitter<'a> {
    bus: &'a Bus,
    subs: Option<&'a SubscriberSet>,
}

impl Emitter<'_> {
    async fn publish(&self, ev: Event) {
        if let Some(set) = self.subs {
            set.deliver(&ev).await;
        }
        self.bus.publish(ev);
    }
}

impl<R: Register> Sequencer<R> {
    /// Creates a sequencer with default configuration and no subscribers.
    ///
    /// Both lists keep the order they are given in.
    pub fn new(registrar: R, bootstrap: Vec<TaskRef>, steady: Vec<TaskRef>) -> Self {
        Self::from_parts(
            SequencerConfig::default(),
            registrar,
            bootstrap,
            steady,
            Vec::new(),
        )
    }

    /// Starts a fluent builder around `registrar`.
    pub fn builder(registrar: R) -> SequencerBuilder<R> {
        SequencerBuilder::new(registrar)
    }

    pub(crate) fn from_parts(
        cfg: SequencerConfig,
        registrar: R,
        bootstrap: Vec<TaskRef>,
        steady: Vec<TaskRef>,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self {
            cfg,
            registrar,
            bootstrap,
            steady,
            bus,
            subscribers,
        }
    }

    /// Name reported by the sequencer's [`Task`] implementation.
    pub fn name(&self) -> &str {
        &self.cfg.name
    }

    /// Bootstrap tasks, in run order.
    pub fn bootstrap_tasks(&self) -> &[TaskRef] {
        &self.bootstrap
    }

    /// Steady-state tasks, in registration order.
    pub fn steady_tasks(&self) -> &[TaskRef] {
        &self.steady
    }

    /// Receives events of subsequent activations.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Runs every bootstrap task, then registers every steady-state task.
    ///
    /// `ctx` is handed unchanged to each bootstrap task. Configured subscribers
    /// have handled every event of this activation by the time it returns.
    ///
    /// # Errors
    /// - [`SequenceError::Bootstrap`] if a bootstrap task fails (its error is the source);
    /// - [`SequenceError::Registration`] if the registrar refuses a steady-state task.
    pub async fn activate(&self, ctx: CancellationToken) -> Result<(), SequenceError> {
        let subs = if self.subscribers.is_empty() {
            None
        } else {
            Some(SubscriberSet::new(self.subscribers.clone()))
        };

        let res = {
            let emit = Emitter {
                bus: &self.bus,
                subs: subs.as_ref(),
            };
            match self.run_bootstrap(&ctx, &emit).await {
                Ok(()) => self.register_steady(&emit).await,
                Err(e) => Err(e),
            }
        };

        if let Some(set) = subs {
            set.close().await;
        }
        res
    }

    /// Runs bootstrap tasks one by one, stopping at the first error.
    async fn run_bootstrap(
        &self,
        ctx: &CancellationToken,
        emit: &Emitter<'_>,
    ) -> Result<(), SequenceError> {
        let total = self.bootstrap.len();

        for (index, task) in self.bootstrap.iter().enumerate() {
            emit.publish(
                Event::new(EventKind::BootstrapStarting)
                    .with_task(task.name())
                    .with_position(index, total),
            )
            .await;

            if let Err(source) = task.run(ctx.clone()).await {
                emit.publish(
                    Event::new(EventKind::BootstrapFailed)
                        .with_task(task.name())
                        .with_position(index, total)
                        .with_reason(source.to_string()),
                )
                .await;
                return Err(SequenceError::Bootstrap {
                    task: task.name().to_string(),
                    source,
                });
            }

            emit.publish(
                Event::new(EventKind::BootstrapCompleted)
                    .with_task(task.name())
                    .with_position(index, total),
            )
            .await;
        }
        Ok(())
    }

    /// Registers steady-state tasks in order, stopping at the first refusal.
    ///
    /// Registration is synchronous; its events are published once it stops.
    async fn register_steady(&self, emit: &Emitter<'_>) -> Result<(), SequenceError> {
        let total = self.steady.len();
        let mut events = Vec::with_capacity(total + 1);

        let res = register_each(&self.registrar, self.steady.iter().cloned(), |index, task| {
            events.push(
                Event::new(EventKind::TaskRegistered)
                    .with_task(task.name())
                    .with_position(index, total),
            );
        });

        let accepted = events.len();
        events.push(match &res {
            Ok(()) => Event::new(EventKind::SequenceCompleted).with_total(total),
            Err(err) => Event::new(EventKind::RegistrationFailed)
                .with_task(err.task())
                .with_position(accepted, total)
                .with_reason(err.to_string()),
        });

        for ev in events {
            emit.publish(ev).await;
        }
        res
    }
}

#[async_trait]
impl<R: Register + 'static> Task for Sequencer<R> {
    fn name(&self) -> &str {
        &self.cfg.name
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
        self.activate(ctx).await.map_err(TaskError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistrationError;
    use crate::tasks::TaskFn;
    use crate::testing::{Journal, RecordingRegistrar, Step, step};
    use std::sync::Mutex;

    fn kinds(rx: &mut broadcast::Receiver<Event>) -> Vec<EventKind> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            out.push(ev.kind);
        }
        out
    }

    #[tokio::test]
    async fn test_bootstrap_runs_sequentially_in_order() {
        let journal = Journal::new();
        let reg = RecordingRegistrar::new().with_journal(&journal);
        let bootstrap = vec![
            Step::new("a", &journal) as TaskRef,
            Step::new("b", &journal),
            Step::new("c", &journal),
        ];

        let seq = Sequencer::new(&reg, bootstrap, vec![step("x"), step("y")]);
        seq.activate(CancellationToken::new()).await.unwrap();

        assert_eq!(
            journal.entries(),
            vec![
                "start:a", "end:a", "start:b", "end:b", "start:c", "end:c", "register:x",
                "register:y",
            ]
        );
        assert_eq!(journal.peak(), 1);
        assert_eq!(reg.registered(), vec!["x", "y"]);
    }

    #[tokio::test]
    async fn test_bootstrap_failure_stops_everything() {
        let journal = Journal::new();
        let reg = RecordingRegistrar::new();
        let a = Step::new("a", &journal);
        let b = Step::failing("b", &journal, "disk unavailable");
        let c = Step::new("c", &journal);
        let steady_c = Step::new("C", &journal);
        let steady_d = Step::new("D", &journal);

        let seq = Sequencer::new(
            &reg,
            vec![a.clone() as TaskRef, b.clone(), c.clone()],
            vec![steady_c.clone() as TaskRef, steady_d.clone()],
        );
        let err = seq.activate(CancellationToken::new()).await.unwrap_err();

        assert_eq!(a.runs(), 1);
        assert_eq!(b.runs(), 1);
        assert_eq!(c.runs(), 0);
        assert_eq!(reg.calls(), 0);
        assert_eq!(steady_c.runs() + steady_d.runs(), 0);

        assert!(err.is_bootstrap());
        assert_eq!(err.task(), "b");
        assert!(err.to_string().contains("bootstrapping"));
        assert!(matches!(
            err.bootstrap_cause(),
            Some(TaskError::Fail { error }) if error == "disk unavailable"
        ));
    }

    #[tokio::test]
    async fn test_registration_failure_keeps_earlier_registrations() {
        let journal = Journal::new();
        let reg = RecordingRegistrar::new().refusing(
            "D",
            RegistrationError::Rejected {
                reason: "duplicate name".into(),
            },
        );
        let a = Step::new("a", &journal);

        let seq = Sequencer::new(
            &reg,
            vec![a.clone() as TaskRef],
            vec![step("C"), step("D"), step("E")],
        );
        let err = seq.activate(CancellationToken::new()).await.unwrap_err();

        assert_eq!(a.runs(), 1);
        assert!(err.is_registration());
        assert_eq!(err.task(), "D");
        assert!(err.to_string().contains("duplicate name"));
        assert_eq!(reg.registered(), vec!["C"]);
        assert_eq!(reg.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_lists_do_nothing() {
        let reg = RecordingRegistrar::new();
        let seq = Sequencer::new(&reg, Vec::new(), Vec::new());
        let mut rx = seq.subscribe();

        seq.activate(CancellationToken::new()).await.unwrap();
        assert_eq!(reg.calls(), 0);
        assert_eq!(kinds(&mut rx), vec![EventKind::SequenceCompleted]);
    }

    #[tokio::test]
    async fn test_empty_steady_list_never_calls_registrar() {
        let journal = Journal::new();
        let reg = RecordingRegistrar::new();
        let a = Step::new("a", &journal);

        let seq = Sequencer::new(&reg, vec![a.clone() as TaskRef], Vec::new());
        seq.activate(CancellationToken::new()).await.unwrap();

        assert_eq!(a.runs(), 1);
        assert_eq!(reg.calls(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_context_fails_bootstrap() {
        let journal = Journal::new();
        let reg = RecordingRegistrar::new();
        let a = Step::new("a", &journal);
        let b = Step::new("b", &journal);

        let ctx = CancellationToken::new();
        ctx.cancel();

        let seq = Sequencer::new(&reg, vec![a.clone() as TaskRef, b.clone()], vec![step("x")]);
        let err = seq.activate(ctx).await.unwrap_err();

        assert!(matches!(err.bootstrap_cause(), Some(TaskError::Canceled)));
        assert_eq!(a.runs(), 1);
        assert_eq!(b.runs(), 0);
        assert_eq!(reg.calls(), 0);
        assert_eq!(journal.entries(), vec!["canceled:a"]);
    }

    #[tokio::test]
    async fn test_context_is_passed_unchanged() {
        let reg = RecordingRegistrar::new();
        let cancel_own = TaskFn::arc("cancel-own", |ctx: CancellationToken| async move {
            ctx.cancel();
            Ok::<_, TaskError>(())
        });

        let ctx = CancellationToken::new();
        let seq = Sequencer::new(&reg, vec![cancel_own], Vec::new());
        seq.activate(ctx.clone()).await.unwrap();

        // A child token would not cancel its parent.
        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_events_follow_activation() {
        let journal = Journal::new();
        let reg = RecordingRegistrar::new().refusing("y", RegistrationError::Closed);
        let seq = Sequencer::new(
            &reg,
            vec![Step::new("a", &journal) as TaskRef],
            vec![step("x"), step("y")],
        );
        let mut rx = seq.subscribe();

        let _ = seq.activate(CancellationToken::new()).await;

        let events: Vec<Event> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        let got: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
        assert_eq!(
            got,
            vec![
                EventKind::BootstrapStarting,
                EventKind::BootstrapCompleted,
                EventKind::TaskRegistered,
                EventKind::RegistrationFailed,
            ]
        );

        let failed = events.last().unwrap();
        assert_eq!(failed.task.as_deref(), Some("y"));
        assert_eq!(failed.index, Some(1));
        assert_eq!(failed.total, Some(2));
        assert!(events.windows(2).all(|w| w[0].seq < w[1].seq));
    }

    #[derive(Default)]
    struct Collect(Mutex<Vec<EventKind>>);

    #[async_trait]
    impl Subscribe for Collect {
        async fn on_event(&self, event: &Event) {
            self.0.lock().unwrap().push(event.kind);
        }
    }

    #[tokio::test]
    async fn test_subscribers_are_drained_before_return() {
        let journal = Journal::new();
        let reg = RecordingRegistrar::new();
        let collect = Arc::new(Collect::default());

        let seq = Sequencer::builder(&reg)
            .bootstrap(Step::failing("a", &journal, "boom"))
            .with_subscribers(vec![collect.clone() as Arc<dyn Subscribe>])
            .build();

        assert!(seq.activate(CancellationToken::new()).await.is_err());
        assert_eq!(
            *collect.0.lock().unwrap(),
            vec![EventKind::BootstrapStarting, EventKind::BootstrapFailed]
        );
    }

    #[tokio::test]
    async fn test_subscribers_get_every_event_of_a_long_bootstrap() {
        let reg = RecordingRegistrar::new();
        let collect = Arc::new(Collect::default());
        let instant = (0..200).map(|i| {
            TaskFn::arc(format!("step-{i}"), |_ctx: CancellationToken| async {
                Ok::<_, TaskError>(())
            })
        });

        let seq = Sequencer::builder(&reg)
            .bootstraps(instant)
            .with_subscribers(vec![collect.clone() as Arc<dyn Subscribe>])
            .build();
        seq.activate(CancellationToken::new()).await.unwrap();

        let seen = collect.0.lock().unwrap();
        assert_eq!(seen.len(), 2 * 200 + 1);
        assert_eq!(seen.first(), Some(&EventKind::BootstrapStarting));
        assert_eq!(seen.last(), Some(&EventKind::SequenceCompleted));
    }

    #[tokio::test]
    async fn test_runs_as_task() {
        let journal = Journal::new();
        let reg = Arc::new(RecordingRegistrar::new());
        let seq: TaskRef = Arc::new(Sequencer::new(
            reg.clone(),
            vec![Step::failing("a", &journal, "disk unavailable") as TaskRef],
            vec![step("x")],
        ));

        assert_eq!(seq.name(), "sequencer");
        let err = seq.run(CancellationToken::new()).await.unwrap_err();
        let inner = err.sequence_cause().expect("sequence error");
        assert!(inner.is_bootstrap());
        assert!(err.to_string().contains("disk unavailable"));
        assert_eq!(reg.calls(), 0);
    }
}
