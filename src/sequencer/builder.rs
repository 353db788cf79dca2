use std::sync::Arc;

use crate::{
    config::SequencerConfig, registrar::Register, sequencer::activation::Sequencer,
    subscribers::Subscribe, tasks::TaskRef,
};

/// Builder for constructing a [`Sequencer`] with optional features.
///
/// Tasks are appended in call order; that order is the run order for
/// bootstrap tasks and the registration order for steady-state tasks.
pub struct SequencerBuilder<R> {
    registrar: R,
    cfg: SequencerConfig,
    bootstrap: Vec<TaskRef>,
    steady: Vec<TaskRef>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl<R: Register> SequencerBuilder<R> {
    /// Creates a new builder around the supervisor's registrar.
    pub fn new(registrar: R) -> Self {
        Self {
            registrar,
            cfg: SequencerConfig::default(),
            bootstrap: Vec::new(),
            steady: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: SequencerConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Appends one bootstrap task.
    pub fn bootstrap(mut self, task: TaskRef) -> Self {
        self.bootstrap.push(task);
        self
    }

    /// Appends bootstrap tasks, keeping their order.
    pub fn bootstraps(mut self, tasks: impl IntoIterator<Item = TaskRef>) -> Self {
        self.bootstrap.extend(tasks);
        self
    }

    /// Appends one steady-state task.
    pub fn steady(mut self, task: TaskRef) -> Self {
        self.steady.push(task);
        self
    }

    /// Appends steady-state tasks, keeping their order.
    pub fn steadies(mut self, tasks: impl IntoIterator<Item = TaskRef>) -> Self {
        self.steady.extend(tasks);
        self
    }

    /// Sets event subscribers.
    ///
    /// Each activation spawns one worker per subscriber and drains them before returning.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the sequencer. Both task lists are fixed from here on.
    pub fn build(self) -> Sequencer<R> {
        Sequencer::from_parts(
            self.cfg,
            self.registrar,
            self.bootstrap,
            self.steady,
            self.subscribers,
        )
    }
}
