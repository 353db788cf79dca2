//! Error types used by tasks, registrars and the startup sequencer.
//!
//! This module defines three error enums:
//!
//! - [`TaskError`] - errors raised by individual task executions.
//! - [`RegistrationError`] - errors raised by a [`Register`](crate::Register) implementation.
//! - [`SequenceError`] - terminal errors of a startup sequence (bootstrap or registration).
//!
//! All types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//! [`SequenceError`] keeps the original error as its [`source`](std::error::Error::source).

use thiserror::Error;

/// # Errors produced by task execution.
///
/// These represent failures of individual async tasks, whether they run as
/// bootstrap steps inside the sequencer or under the external supervisor.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// Non-recoverable fatal error.
    #[error("fatal error: {error}")]
    Fatal {
        /// The underlying error message.
        error: String,
    },

    /// Task execution failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Task was cancelled due to parent context shutdown.
    #[error("context cancelled")]
    Canceled,

    /// A startup sequence running as a task failed.
    #[error("startup sequence failed: {0}")]
    Sequence(#[source] Box<SequenceError>),
}

impl TaskError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use bootvisor::TaskError;
    ///
    /// let err = TaskError::Fail { error: "boom".into() };
    /// assert_eq!(err.as_label(), "task_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fatal { .. } => "task_fatal",
            TaskError::Fail { .. } => "task_failed",
            TaskError::Canceled => "task_canceled",
            TaskError::Sequence(_) => "task_sequence_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fatal { error } => format!("fatal: {error}"),
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Canceled => "context cancelled".to_string(),
            TaskError::Sequence(inner) => format!("sequence: {}", inner.as_message()),
        }
    }

    /// Convenience constructor for [`TaskError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }

    /// The wrapped startup sequence error, if any.
    pub fn sequence_cause(&self) -> Option<&SequenceError> {
        match self {
            TaskError::Sequence(inner) => Some(inner),
            _ => None,
        }
    }

    /// Returns `true` if the task stopped because its context was cancelled.
    pub fn is_canceled(&self) -> bool {
        matches!(self, TaskError::Canceled)
    }
}

impl From<SequenceError> for TaskError {
    fn from(err: SequenceError) -> Self {
        TaskError::Sequence(Box::new(err))
    }
}

/// # Errors produced by a registrar.
///
/// Returned by [`Register::register`](crate::Register::register) when the
/// supervisor refuses to accept a task.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// A task with the same name is already registered.
    #[error("task {name:?} is already registered")]
    AlreadyRegistered {
        /// Name of the conflicting task.
        name: String,
    },

    /// The supervisor no longer accepts tasks (stopping or stopped).
    #[error("supervisor is closed")]
    Closed,

    /// The supervisor rejected the task for another reason.
    #[error("rejected: {reason}")]
    Rejected {
        /// Supervisor-provided reason.
        reason: String,
    },
}

impl RegistrationError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use bootvisor::RegistrationError;
    ///
    /// let err = RegistrationError::AlreadyRegistered { name: "worker".into() };
    /// assert_eq!(err.as_label(), "registration_already_registered");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistrationError::AlreadyRegistered { .. } => "registration_already_registered",
            RegistrationError::Closed => "registration_closed",
            RegistrationError::Rejected { .. } => "registration_rejected",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RegistrationError::AlreadyRegistered { name } => format!("duplicate: {name}"),
            RegistrationError::Closed => "supervisor closed".to_string(),
            RegistrationError::Rejected { reason } => format!("rejected: {reason}"),
        }
    }
}

/// # Terminal errors of a startup sequence.
///
/// Both variants stop the sequence. The original error stays inspectable
/// through [`std::error::Error::source`] and the typed accessors.
///
/// # Example
/// ```
/// use std::error::Error;
/// use bootvisor::{SequenceError, TaskError};
///
/// let err = SequenceError::Bootstrap {
///     task: "warm-cache".into(),
///     source: TaskError::Fail { error: "disk unavailable".into() },
/// };
/// assert!(err.is_bootstrap());
/// assert_eq!(err.task(), "warm-cache");
/// assert!(err.source().unwrap().to_string().contains("disk unavailable"));
/// ```
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SequenceError {
    /// A bootstrap task returned an error; nothing after it was run or registered.
    #[error("failed during bootstrapping (task {task:?}): {source}")]
    Bootstrap {
        /// Name of the failing bootstrap task.
        task: String,
        /// Error returned by the task.
        #[source]
        source: TaskError,
    },

    /// Adding a task to the supervisor failed; earlier registrations are kept.
    #[error("failed adding task {task:?} to supervisor: {source}")]
    Registration {
        /// Name of the task whose registration failed.
        task: String,
        /// Error returned by the registrar.
        #[source]
        source: RegistrationError,
    },
}

impl SequenceError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SequenceError::Bootstrap { .. } => "sequence_bootstrap_failed",
            SequenceError::Registration { .. } => "sequence_registration_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SequenceError::Bootstrap { task, source } => {
                format!("bootstrap task={task} {}", source.as_message())
            }
            SequenceError::Registration { task, source } => {
                format!("register task={task} {}", source.as_message())
            }
        }
    }

    /// Name of the task the sequence stopped at.
    pub fn task(&self) -> &str {
        match self {
            SequenceError::Bootstrap { task, .. } | SequenceError::Registration { task, .. } => {
                task
            }
        }
    }

    /// True if the failure happened while running bootstrap tasks.
    pub fn is_bootstrap(&self) -> bool {
        matches!(self, SequenceError::Bootstrap { .. })
    }

    /// True if the failure happened while registering steady-state tasks.
    pub fn is_registration(&self) -> bool {
        matches!(self, SequenceError::Registration { .. })
    }

    /// The bootstrap task error, if this is a bootstrap failure.
    pub fn bootstrap_cause(&self) -> Option<&TaskError> {
        match self {
            SequenceError::Bootstrap { source, .. } => Some(source),
            _ => None,
        }
    }

    /// The registrar error, if this is a registration failure.
    pub fn registration_cause(&self) -> Option<&RegistrationError> {
        match self {
            SequenceError::Registration { source, .. } => Some(source),
            _ => None,
        }
    }
}
