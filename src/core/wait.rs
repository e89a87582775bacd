//! # Suspension handles (`wait` / `error`).
//!
//! [`Wait`] is a future that resolves with the next payload delivered on one
//! `(event, priority)`; [`Failure`] resolves in an error state instead.
//! Both are backed by an implicit `once` registration and a
//! [`CancellationToken`] used as abort signal.
//!
//! ## Lifecycle
//! ```text
//! wait(key)
//!   ├─► registry.insert(once listener ─► oneshot::Sender)
//!   │
//!   ├─ event fires first  ─► listener detaches, sends payload ─► Ok(payload)
//!   ├─ abort cancelled    ─► handle.off()                     ─► Err(Aborted)
//!   ├─ emitter dropped    ─► sender dropped                   ─► Err(Closed)
//!   └─ Wait dropped       ─► handle.off()
//! ```
//!
//! Independent waits on the same event are independent one-shot registrations:
//! one never consumes the event for another.

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};

use crate::error::WaitError;
use crate::events::{Event, Priority};
use crate::listeners::registry::Registry;
use crate::listeners::{Flow, Listener, ListenerHandle};
use crate::payload::Payload;

/// Future resolving with the next payload of one event.
///
/// Output: `Ok(payload)`, or `Err(WaitError::Aborted)` / `Err(WaitError::Closed)`.
#[must_use = "futures do nothing unless awaited; dropping a Wait detaches it"]
pub struct Wait<P: Payload> {
    event: &'static str,
    rx: oneshot::Receiver<P>,
    abort: CancellationToken,
    aborted: Pin<Box<WaitForCancellationFutureOwned>>,
    handle: ListenerHandle,
}

impl<P: Payload> Wait<P> {
    pub(crate) fn register<E>(
        registry: &Arc<Registry>,
        priority: Priority,
        abort: CancellationToken,
    ) -> Self
    where
        E: Event<Payload = P>,
    {
        let (tx, rx) = oneshot::channel::<P>();
        let tx = Mutex::new(Some(tx));

        let listener = Listener::sync(move |payload: &P| {
            if let Some(tx) = tx.lock().take() {
                let _ = tx.send(payload.clone());
            }
            Ok(Flow::Pass)
        })
        .named("wait");

        let handle = registry.insert::<E>(priority, listener, true);
        let aborted = Box::pin(abort.clone().cancelled_owned());

        Self {
            event: E::NAME,
            rx,
            abort,
            aborted,
            handle,
        }
    }

    /// Aborts the wait: detaches the listener and resolves with `Err(Aborted)`
    /// unless the event already fired.
    pub fn abort(&self) {
        self.abort.cancel();
    }

    /// Token that aborts this wait when cancelled.
    pub fn abort_token(&self) -> CancellationToken {
        self.abort.clone()
    }

    /// The implicit `once` registration.
    pub fn handle(&self) -> &ListenerHandle {
        &self.handle
    }

    /// Name of the awaited event.
    pub fn event(&self) -> &'static str {
        self.event
    }
}

impl<P: Payload> Future for Wait<P> {
    type Output = Result<P, WaitError<P>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;

        if let Poll::Ready(res) = Pin::new(&mut this.rx).poll(cx) {
            return Poll::Ready(res.map_err(|_| WaitError::Closed));
        }
        if this.aborted.as_mut().poll(cx).is_ready() {
            this.handle.off();
            return Poll::Ready(Err(WaitError::Aborted));
        }
        Poll::Pending
    }
}

impl<P: Payload> Drop for Wait<P> {
    fn drop(&mut self) {
        self.handle.off();
    }
}

impl<P: Payload> fmt::Debug for Wait<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wait")
            .field("event", &self.event)
            .field("aborted", &self.abort.is_cancelled())
            .field("handle", &self.handle)
            .finish()
    }
}

/// Future that fails when one event fires.
///
/// Output: always `Err`, with [`WaitError::Raised`] carrying the payload, or
/// `Aborted` / `Closed` as for [`Wait`].
#[must_use = "futures do nothing unless awaited; dropping a Failure detaches it"]
pub struct Failure<P: Payload> {
    inner: Wait<P>,
}

impl<P: Payload> Failure<P> {
    pub(crate) fn new(inner: Wait<P>) -> Self {
        Self { inner }
    }

    /// See [`Wait::abort`].
    pub fn abort(&self) {
        self.inner.abort();
    }

    /// See [`Wait::abort_token`].
    pub fn abort_token(&self) -> CancellationToken {
        self.inner.abort_token()
    }

    /// The implicit `once` registration.
    pub fn handle(&self) -> &ListenerHandle {
        self.inner.handle()
    }
}

impl<P: Payload> Future for Failure<P> {
    type Output = Result<Infallible, WaitError<P>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let event = self.inner.event;
        match Pin::new(&mut self.inner).poll(cx) {
            Poll::Ready(Ok(payload)) => Poll::Ready(Err(WaitError::Raised { event, payload })),
            Poll::Ready(Err(err)) => Poll::Ready(Err(err)),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<P: Payload> fmt::Debug for Failure<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Failure").field(&self.inner).finish()
    }
}
