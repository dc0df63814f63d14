//! Request lifecycle tracking for a single asynchronous operation.
//!
//! A [`ResourceController`] turns any `async` operation into a consistent
//! `(status, data, error)` view. Controllers are cheap handles over shared
//! state: a clone observes and mutates the same request state, which is how a
//! screen lets one controller's hook splice a value into another.
//!
//! Overlapping `execute` calls on the same controller are not serialized.
//! Whichever operation settles last decides the final state.

use std::{
    fmt,
    future::Future,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use tracing::debug;

/// Used when a failed operation's error renders as an empty string.
pub const GENERIC_FAILURE_MESSAGE: &str = "API call failed";

pub type SuccessHook<T> = Arc<dyn Fn(&T) + Send + Sync>;
pub type ErrorHook = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestState<T> {
    pub status: RequestStatus,
    /// Last successful result. Kept while a later request is pending or failed.
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            status: RequestStatus::Idle,
            data: None,
            error: None,
        }
    }
}

impl<T> RequestState<T> {
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

pub struct ResourceController<T> {
    label: &'static str,
    state: Arc<RwLock<RequestState<T>>>,
    on_success: Option<SuccessHook<T>>,
    on_error: Option<ErrorHook>,
}

impl<T> Clone for ResourceController<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label,
            state: Arc::clone(&self.state),
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

impl<T> fmt::Debug for ResourceController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read();
        f.debug_struct("ResourceController")
            .field("label", &self.label)
            .field("status", &state.status)
            .field("has_data", &state.data.is_some())
            .field("error", &state.error)
            .finish()
    }
}

impl<T> ResourceController<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            state: Arc::new(RwLock::new(RequestState::default())),
            on_success: None,
            on_error: None,
        }
    }

    pub fn with_on_success(mut self, hook: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(hook));
        self
    }

    pub fn with_on_error(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(hook));
        self
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn status(&self) -> RequestStatus {
        self.read().status
    }

    pub fn is_pending(&self) -> bool {
        self.read().is_pending()
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn has_data(&self) -> bool {
        self.read().data.is_some()
    }

    /// Borrows the current data without cloning it.
    pub fn with_data<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        f(self.read().data.as_ref())
    }

    /// Back to `Idle` with no data and no error. Hooks do not fire.
    pub fn reset(&self) {
        *self.write() = RequestState::default();
    }

    /// Overwrites `data` only. Status, error and hooks are untouched.
    pub fn set_data(&self, value: Option<T>) {
        self.write().data = value;
    }

    fn read(&self) -> RwLockReadGuard<'_, RequestState<T>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RequestState<T>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> ResourceController<T> {
    pub fn data(&self) -> Option<T> {
        self.read().data.clone()
    }

    pub fn snapshot(&self) -> RequestState<T> {
        self.read().clone()
    }

    /// Runs `operation`, recording its lifecycle.
    ///
    /// The operation's error is returned unchanged after it has been recorded,
    /// so callers that want to recover must handle it themselves.
    pub async fn execute<F, Fut, E>(&self, operation: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let mut guard = PendingGuard::enter(&self.state);
        debug!(resource = self.label, "request started");

        match operation().await {
            Ok(value) => {
                guard.settle(|state| {
                    state.status = RequestStatus::Succeeded;
                    state.data = Some(value.clone());
                    state.error = None;
                });
                debug!(resource = self.label, "request succeeded");
                if let Some(hook) = &self.on_success {
                    hook(&value);
                }
                Ok(value)
            }
            Err(err) => {
                let message = failure_message(&err);
                guard.settle(|state| {
                    state.status = RequestStatus::Failed;
                    state.error = Some(message.clone());
                });
                debug!(resource = self.label, error = %message, "request failed");
                if let Some(hook) = &self.on_error {
                    hook(&message);
                }
                Err(err)
            }
        }
    }
}

fn failure_message(err: &impl fmt::Display) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        GENERIC_FAILURE_MESSAGE.to_string()
    } else {
        message
    }
}

/// Marks the state pending for the lifetime of one `execute` call.
///
/// If the call is dropped before settling, the status and error it replaced are
/// put back, unless another call has moved the state on in the meantime.
struct PendingGuard<'a, T> {
    state: &'a RwLock<RequestState<T>>,
    replaced: Option<(RequestStatus, Option<String>)>,
}

impl<'a, T> PendingGuard<'a, T> {
    fn enter(state: &'a RwLock<RequestState<T>>) -> Self {
        let mut locked = state.write().unwrap_or_else(PoisonError::into_inner);
        let replaced = (locked.status, locked.error.take());
        locked.status = RequestStatus::Pending;
        drop(locked);
        Self {
            state,
            replaced: Some(replaced),
        }
    }

    fn settle(&mut self, apply: impl FnOnce(&mut RequestState<T>)) {
        let mut locked = self.state.write().unwrap_or_else(PoisonError::into_inner);
        apply(&mut locked);
        self.replaced = None;
    }
}

impl<T> Drop for PendingGuard<'_, T> {
    fn drop(&mut self) {
        let Some((status, error)) = self.replaced.take() else {
            return;
        };
        let mut locked = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if locked.status == RequestStatus::Pending {
            locked.status = status;
            locked.error = error;
        }
    }
}

#[cfg(test)]
#[path = "tests/resource_tests.rs"]
mod tests;
