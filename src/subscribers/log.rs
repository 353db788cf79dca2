//! # LogWriter - simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//!
//! ## Example output
//! ```text
//! [bootstrap-starting] task="warm-cache" 1/2
//! [bootstrap-completed] task="warm-cache" 1/2
//! [bootstrap-failed] task="migrate" 2/2 err="disk unavailable"
//! [registered] task="http" 1/3
//! [registration-failed] task="grpc" 2/3 err="task \"grpc\" is already registered"
//! [sequence-completed] registered=3
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn line(e: &Event) -> String {
        let task = e.task.as_deref().unwrap_or("unknown");
        let pos = match (e.index, e.total) {
            (Some(i), Some(n)) => format!("{}/{}", i + 1, n),
            _ => "-".to_string(),
        };
        let err = e.reason.as_deref().unwrap_or("unknown");

        match e.kind {
            EventKind::BootstrapStarting => format!("[bootstrap-starting] task={task:?} {pos}"),
            EventKind::BootstrapCompleted => format!("[bootstrap-completed] task={task:?} {pos}"),
            EventKind::BootstrapFailed => {
                format!("[bootstrap-failed] task={task:?} {pos} err={err:?}")
            }
            EventKind::TaskRegistered => format!("[registered] task={task:?} {pos}"),
            EventKind::RegistrationFailed => {
                format!("[registration-failed] task={task:?} {pos} err={err:?}")
            }
            EventKind::SequenceCompleted => {
                format!("[sequence-completed] registered={}", e.total.unwrap_or(0))
            }
        }
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        println!("{}", Self::line(e));
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
