//! Startup demo: a toy supervisor runs a sequencer that warms a cache and runs
//! a migration before the long-running workers are registered.
//!
//! Run with: `cargo run --example startup --features logging`

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use bootvisor::{
    LogWriter, Register, RegistrationError, Sequencer, SequencerConfig, Subscribe, TaskError,
    TaskFn, TaskRef,
};

/// Minimal supervisor: every registered task is spawned as soon as the run loop sees it.
struct MiniSupervisor {
    tx: mpsc::UnboundedSender<TaskRef>,
    names: Mutex<HashSet<String>>,
}

impl Register for MiniSupervisor {
    fn register(&self, task: TaskRef) -> Result<(), RegistrationError> {
        let mut names = self.names.lock().map_err(|_| RegistrationError::Closed)?;
        if !names.insert(task.name().to_string()) {
            return Err(RegistrationError::AlreadyRegistered {
                name: task.name().to_string(),
            });
        }
        self.tx.send(task).map_err(|_| RegistrationError::Closed)
    }
}

async fn supervise(
    mut rx: mpsc::UnboundedReceiver<TaskRef>,
    token: CancellationToken,
) -> anyhow::Result<()> {
    let mut set = JoinSet::new();
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            Some(task) = rx.recv() => {
                let ctx = token.clone();
                set.spawn(async move {
                    let name = task.name().to_string();
                    (name, task.run(ctx).await)
                });
            }
            Some(joined) = set.join_next() => {
                let (name, res) = joined?;
                match res {
                    Ok(()) => println!("[supervisor] {name} finished"),
                    Err(e) => {
                        token.cancel();
                        return Err(anyhow::anyhow!("{name} failed: {e}"));
                    }
                }
            }
        }
    }
    while set.join_next().await.is_some() {}
    Ok(())
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    let supervisor = Arc::new(MiniSupervisor {
        tx,
        names: Mutex::new(HashSet::new()),
    });

    let cache = Arc::new(Mutex::new(Vec::<String>::new()));

    let warm_cache: TaskRef = {
        let cache = cache.clone();
        TaskFn::arc("warm-cache", move |ctx: CancellationToken| {
            let cache = cache.clone();
            async move {
                for key in ["users", "orders", "products"] {
                    if ctx.is_cancelled() {
                        return Err(TaskError::Canceled);
                    }
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    cache
                        .lock()
                        .map_err(|_| TaskError::fail("cache poisoned"))?
                        .push(key.to_string());
                }
                Ok::<(), TaskError>(())
            }
        })
    };

    let migrate: TaskRef = TaskFn::arc("migrate", |ctx: CancellationToken| async move {
        tokio::select! {
            _ = ctx.cancelled() => Err(TaskError::Canceled),
            _ = tokio::time::sleep(Duration::from_millis(150)) => Ok(()),
        }
    });

    let ticks = Arc::new(AtomicU64::new(0));
    let ticker: TaskRef = {
        let ticks = ticks.clone();
        TaskFn::arc("ticker", move |ctx: CancellationToken| {
            let ticks = ticks.clone();
            async move {
                while !ctx.is_cancelled() {
                    tokio::time::sleep(Duration::from_millis(250)).await;
                    println!("tick #{}", ticks.fetch_add(1, Ordering::Relaxed) + 1);
                }
                Ok(())
            }
        })
    };

    let reporter: TaskRef = {
        let cache = cache.clone();
        TaskFn::arc("reporter", move |_ctx: CancellationToken| {
            let cache = cache.clone();
            async move {
                let keys = cache
                    .lock()
                    .map_err(|_| TaskError::fail("cache poisoned"))?
                    .clone();
                println!("cache ready: {keys:?}");
                Ok::<(), TaskError>(())
            }
        })
    };

    let sequencer: TaskRef = Arc::new(
        Sequencer::builder(supervisor.clone())
            .with_config(SequencerConfig::default().with_name("startup"))
            .bootstraps(vec![warm_cache, migrate])
            .steadies(vec![reporter, ticker])
            .with_subscribers(vec![Arc::new(LogWriter::new()) as Arc<dyn Subscribe>])
            .build(),
    );
    supervisor.register(sequencer)?;

    let token = CancellationToken::new();
    let stopper = token.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = tokio::time::sleep(Duration::from_secs(2)) => {},
        }
        stopper.cancel();
    });

    supervise(rx, token).await
}
