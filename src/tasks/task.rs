//! # Task abstraction.
//!
//! This module defines the [`Task`] trait (async, cancelable) and the shared handle [`TaskRef`].
//!
//! The same trait describes both kinds of work handled by the [`Sequencer`](crate::Sequencer):
//! - **bootstrap tasks** are run in place, one after another, until they return;
//! - **steady-state tasks** are only handed to the supervisor, which runs them later.
//!
//! A task receives a [`CancellationToken`] and should check it to stop cooperatively.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;

/// # Shared handle to a task object.
///
/// This is the type held by the sequencer and passed to registrars.
pub type TaskRef = Arc<dyn Task>;

/// # Asynchronous, cancelable unit.
///
/// A `Task` has a stable [`name`](Task::name) and an async [`run`](Task::run) method that receives a [`CancellationToken`].
/// `run` completes when the work is done or the token is cancelled.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use bootvisor::{Task, TaskError};
///
/// struct WarmCache;
///
/// #[async_trait]
/// impl Task for WarmCache {
///     fn name(&self) -> &str { "warm-cache" }
///
///     async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
///         if ctx.is_cancelled() {
///             return Err(TaskError::Canceled);
///         }
///         // populate caches...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Task: Send + Sync + 'static {
    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Executes the task until completion or cancellation.
    ///
    /// Implementations should check `ctx.is_cancelled()` and return quickly once it is set.
    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError>;
}
