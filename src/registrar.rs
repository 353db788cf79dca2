//! # Registration of tasks with a supervisor.
//!
//! [`Register`] is the only supervisor capability this crate needs: accept one
//! task for later execution. Keeping it this narrow lets any supervisor plug in
//! (and tests use a minimal fake).
//!
//! [`register_all`] registers an ordered list of tasks, stopping at the first
//! refusal.
//!
//! ## Partial failure
//! Registrations are **not rolled back**. If the task at index `j` is refused,
//! tasks `0..j` stay registered and tasks after `j` are never offered. Callers
//! that need all-or-nothing must validate up front or treat the process as
//! failed on any registration error.
//!
//! ```text
//! register_all(reg, [C, D, E])
//!   ├─► reg.register(C)  Ok   (C now owned by the supervisor)
//!   ├─► reg.register(D)  Err  ─► SequenceError::Registration { task: "D", .. }
//!   └─  E never offered
//! ```

use std::sync::Arc;

use crate::error::{RegistrationError, SequenceError};
use crate::tasks::TaskRef;

/// Narrow supervisor capability: accept a task for execution.
///
/// A supervisor that is already running is expected to start the task
/// right away; otherwise it starts it together with everything else on its own start.
///
/// # Example
/// ```
/// use std::sync::Mutex;
/// use bootvisor::{Register, RegistrationError, TaskRef};
///
/// #[derive(Default)]
/// struct Pending(Mutex<Vec<TaskRef>>);
///
/// impl Register for Pending {
///     fn register(&self, task: TaskRef) -> Result<(), RegistrationError> {
///         let mut tasks = self.0.lock().map_err(|_| RegistrationError::Closed)?;
///         if tasks.iter().any(|t| t.name() == task.name()) {
///             return Err(RegistrationError::AlreadyRegistered { name: task.name().to_string() });
///         }
///         tasks.push(task);
///         Ok(())
///     }
/// }
/// ```
pub trait Register: Send + Sync {
    /// Hands `task` to the supervisor.
    fn register(&self, task: TaskRef) -> Result<(), RegistrationError>;
}

impl<R: Register + ?Sized> Register for &R {
    fn register(&self, task: TaskRef) -> Result<(), RegistrationError> {
        (**self).register(task)
    }
}

impl<R: Register + ?Sized> Register for Arc<R> {
    fn register(&self, task: TaskRef) -> Result<(), RegistrationError> {
        (**self).register(task)
    }
}

impl<R: Register + ?Sized> Register for Box<R> {
    fn register(&self, task: TaskRef) -> Result<(), RegistrationError> {
        (**self).register(task)
    }
}

/// Registers every task with `registrar`, in order.
///
/// Returns `Ok(())` once all tasks are accepted (immediately, without touching
/// the registrar, when `tasks` is empty). On the first refusal returns
/// [`SequenceError::Registration`] naming the task and carrying the registrar
/// error; earlier registrations remain in place.
pub fn register_all<R, I>(registrar: &R, tasks: I) -> Result<(), SequenceError>
where
    R: Register + ?Sized,
    I: IntoIterator<Item = TaskRef>,
{
    register_each(registrar, tasks, |_, _| {})
}

/// Same as [`register_all`], calling `on_registered(index, &task)` after each accepted task.
pub(crate) fn register_each<R, I, F>(
    registrar: &R,
    tasks: I,
    mut on_registered: F,
) -> Result<(), SequenceError>
where
    R: Register + ?Sized,
    I: IntoIterator<Item = TaskRef>,
    F: FnMut(usize, &TaskRef),
{
    for (index, task) in tasks.into_iter().enumerate() {
        let name = task.name().to_string();
        if let Err(source) = registrar.register(task.clone()) {
            return Err(SequenceError::Registration { task: name, source });
        }
        on_registered(index, &task);
    }
    Ok(())
}
