//! Deferred call outcomes observable through a future, a callback, or both.
//!
//! A call is started eagerly on the current Tokio runtime. The returned
//! [`Pending`] resolves to the outcome; an optional [`Callback`] is attached
//! to the same outcome and runs once, before the future resolves. Dropping
//! the `Pending` does not cancel the call.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::FutureExt;
use tokio::task::JoinHandle;

use crate::error::{Error, ErrorKind, Result};
use crate::response::Payload;

type CallbackFn = dyn FnOnce(std::result::Result<&Payload, &Error>) + Send + 'static;

/// Completion notification for a call.
pub struct Callback(Box<CallbackFn>);

impl Callback {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(std::result::Result<&Payload, &Error>) + Send + 'static,
    {
        Self(Box::new(f))
    }

    fn notify(self, outcome: &Result<Payload>) {
        (self.0)(outcome.as_ref())
    }
}

impl std::fmt::Debug for Callback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Callback")
    }
}

/// The eventual outcome of a call.
#[derive(Debug)]
pub struct Pending {
    state: State,
}

#[derive(Debug)]
enum State {
    Running(JoinHandle<Result<Payload>>),
    Ready(Option<Result<Payload>>),
}

impl Pending {
    /// Start `operation` and attach `callback` to its outcome.
    ///
    /// Without a Tokio runtime the outcome is an immediate
    /// [`ErrorKind::Runtime`] error, delivered to both consumers.
    pub(crate) fn spawn<F>(operation: F, callback: Option<Callback>) -> Self
    where
        F: Future<Output = Result<Payload>> + Send + 'static,
    {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                let outcome = Err(Error::with_source(
                    ErrorKind::Runtime("no Tokio runtime available".to_string()),
                    e,
                ));
                if let Some(callback) = callback {
                    callback.notify(&outcome);
                }
                return Self {
                    state: State::Ready(Some(outcome)),
                };
            }
        };

        let task = runtime.spawn(async move {
            let outcome = operation.await;
            if let Some(callback) = callback {
                callback.notify(&outcome);
            }
            outcome
        });

        Self {
            state: State::Running(task),
        }
    }

    /// Returns true once the outcome is available.
    pub fn is_finished(&self) -> bool {
        match &self.state {
            State::Running(task) => task.is_finished(),
            State::Ready(_) => true,
        }
    }
}

impl Future for Pending {
    type Output = Result<Payload>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.state {
            State::Running(task) => task
                .poll_unpin(cx)
                .map(|joined| joined.unwrap_or_else(|e| Err(e.into()))),
            State::Ready(outcome) => Poll::Ready(outcome.take().unwrap_or_else(|| {
                Err(Error::new(ErrorKind::Runtime(
                    "outcome already taken".to_string(),
                )))
            })),
        }
    }
}
