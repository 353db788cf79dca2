//! Test doubles shared by unit tests: step tasks and a recording registrar.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::{RegistrationError, TaskError};
use crate::registrar::Register;
use crate::tasks::{Task, TaskRef};

/// Shared, ordered log of what happened during a test.
#[derive(Default)]
pub(crate) struct Journal {
    entries: Mutex<Vec<String>>,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl Journal {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    /// Highest number of steps observed running at the same time.
    pub(crate) fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Bootstrap-style task that records `start:<name>` / `end:<name>` and
/// optionally fails.
pub(crate) struct Step {
    name: String,
    journal: Arc<Journal>,
    fail: Option<String>,
    work: Duration,
    runs: AtomicUsize,
}

impl Step {
    pub(crate) fn new(name: &str, journal: &Arc<Journal>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            journal: journal.clone(),
            fail: None,
            work: Duration::from_millis(5),
            runs: AtomicUsize::new(0),
        })
    }

    pub(crate) fn failing(name: &str, journal: &Arc<Journal>, error: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            journal: journal.clone(),
            fail: Some(error.to_string()),
            work: Duration::from_millis(5),
            runs: AtomicUsize::new(0),
        })
    }

    pub(crate) fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Task for Step {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if ctx.is_cancelled() {
            self.journal.push(format!("canceled:{}", self.name));
            return Err(TaskError::Canceled);
        }

        let now = self.journal.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.journal.peak.fetch_max(now, Ordering::SeqCst);
        self.journal.push(format!("start:{}", self.name));

        tokio::time::sleep(self.work).await;

        self.journal.push(format!("end:{}", self.name));
        self.journal.active.fetch_sub(1, Ordering::SeqCst);

        match &self.fail {
            Some(error) => Err(TaskError::Fail {
                error: error.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Steady-state task placeholder with its own journal.
pub(crate) fn step(name: &str) -> TaskRef {
    Step::new(name, &Journal::new())
}

/// In-memory registrar that records accepted task names.
#[derive(Default)]
pub(crate) struct RecordingRegistrar {
    registered: Mutex<Vec<String>>,
    calls: AtomicUsize,
    refuse: Option<(String, RegistrationError)>,
    journal: Option<Arc<Journal>>,
}

impl RecordingRegistrar {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Refuses the task named `name` with `err`.
    pub(crate) fn refusing(mut self, name: &str, err: RegistrationError) -> Self {
        self.refuse = Some((name.to_string(), err));
        self
    }

    /// Also records `register:<name>` into `journal`.
    pub(crate) fn with_journal(mut self, journal: &Arc<Journal>) -> Self {
        self.journal = Some(journal.clone());
        self
    }

    pub(crate) fn registered(&self) -> Vec<String> {
        self.registered.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Register for RecordingRegistrar {
    fn register(&self, task: TaskRef) -> Result<(), RegistrationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(journal) = &self.journal {
            journal.push(format!("register:{}", task.name()));
        }
        if let Some((name, err)) = &self.refuse {
            if name == task.name() {
                return Err(err.clone());
            }
        }
        self.registered.lock().unwrap().push(task.name().to_string());
        Ok(())
    }
}
