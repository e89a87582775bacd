//! # Listener contract
//!
//! A listener receives the current payload and answers with a [`Flow`]:
//!
//! ```text
//!   Ok(Flow::Pass)          ─► payload unchanged, next listener
//!   Ok(Flow::Patch(patch))  ─► payload.merge(patch), next listener
//!   Ok(Flow::Cancel(c))     ─► stop dispatch, Emitted::Cancelled
//!   Err(error)              ─► stop dispatch, EmitError::Listener
//! ```
//!
//! [`Listener`] is the type-erased, cheaply cloneable form stored in the registry.
//! Clones share identity, which is what [`Emitter::off`](crate::Emitter::off) matches on.
//!
//! ## Example
//! ```rust
//! use mutevents::{Flow, Listener};
//!
//! let shout: Listener<String> = Listener::sync(|msg: &String| {
//!     Ok(Flow::Patch(msg.to_uppercase()))
//! })
//! .named("shout");
//!
//! let same = shout.clone();
//! assert!(shout.same_as(&same));
//! assert_eq!(shout.name(), "shout");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::BoxError;
use crate::payload::Payload;

/// What a listener asks the dispatch loop to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow<T> {
    /// Leave the payload untouched.
    Pass,
    /// Merge this patch into the running payload.
    Patch(T),
    /// Stop the dispatch here.
    Cancel(Cancelled),
}

impl<T> Flow<T> {
    /// Cancellation without a reason.
    pub fn cancel() -> Self {
        Flow::Cancel(Cancelled::new())
    }

    /// Cancellation with a human-readable reason.
    pub fn cancel_with(reason: impl Into<String>) -> Self {
        Flow::Cancel(Cancelled::with_reason(reason))
    }

    /// True for [`Flow::Cancel`].
    pub fn is_cancel(&self) -> bool {
        matches!(self, Flow::Cancel(_))
    }
}

/// Cancellation token returned by a listener to halt dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cancelled {
    reason: Option<String>,
}

impl Cancelled {
    /// Cancellation without a reason.
    #[must_use]
    pub fn new() -> Self {
        Self { reason: None }
    }

    /// Cancellation with a human-readable reason.
    #[must_use]
    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
        }
    }

    /// The reason, if one was given.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "cancelled: {reason}"),
            None => f.write_str("cancelled"),
        }
    }
}

impl std::error::Error for Cancelled {}

/// Return type of every listener for payload `P`.
pub type ListenerResult<P> = Result<Flow<<P as Payload>::Patch>, BoxError>;

/// Asynchronous listener as a trait object.
///
/// Use it when a listener carries its own state or needs a stable name in logs;
/// wrap it with [`Listener::from_listen`].
///
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use async_trait::async_trait;
/// use mutevents::{Flow, Listen, Listener, ListenerResult};
///
/// struct Counter(AtomicUsize);
///
/// #[async_trait]
/// impl Listen<u32> for Counter {
///     async fn on_event(&self, _n: u32) -> ListenerResult<u32> {
///         self.0.fetch_add(1, Ordering::Relaxed);
///         Ok(Flow::Pass)
///     }
///     fn name(&self) -> &'static str { "counter" }
/// }
///
/// let listener = Listener::from_listen(Arc::new(Counter(AtomicUsize::new(0))));
/// assert_eq!(listener.name(), "counter");
/// ```
#[async_trait]
pub trait Listen<P: Payload>: Send + Sync + 'static {
    /// Handles one dispatch with an owned copy of the current payload.
    async fn on_event(&self, payload: P) -> ListenerResult<P>;

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

type SyncFn<P> = dyn Fn(&P) -> ListenerResult<P> + Send + Sync;
type AsyncFn<P> = dyn Fn(P) -> BoxFuture<'static, ListenerResult<P>> + Send + Sync;

/// How a listener is invoked.
pub(crate) enum Call<P: Payload> {
    /// Runs to completion on the caller's stack.
    Sync(Arc<SyncFn<P>>),
    /// Returns a future awaited before the next listener starts.
    Async(Arc<AsyncFn<P>>),
}

impl<P: Payload> Clone for Call<P> {
    fn clone(&self) -> Self {
        match self {
            Call::Sync(f) => Call::Sync(Arc::clone(f)),
            Call::Async(f) => Call::Async(Arc::clone(f)),
        }
    }
}

/// Registered callable for payload `P`.
pub struct Listener<P: Payload> {
    call: Call<P>,
    name: Cow<'static, str>,
}

impl<P: Payload> Listener<P> {
    /// Wraps a synchronous closure.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&P) -> ListenerResult<P> + Send + Sync + 'static,
    {
        Self {
            call: Call::Sync(Arc::new(f)),
            name: Cow::Borrowed("sync"),
        }
    }

    /// Wraps a closure producing a fresh future per invocation.
    pub fn future<F, Fut>(f: F) -> Self
    where
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ListenerResult<P>> + Send + 'static,
    {
        Self {
            call: Call::Async(Arc::new(
                move |payload: P| -> BoxFuture<'static, ListenerResult<P>> { Box::pin(f(payload)) },
            )),
            name: Cow::Borrowed("async"),
        }
    }

    /// Wraps a [`Listen`] trait object; the listener takes its name.
    pub fn from_listen(listen: Arc<dyn Listen<P>>) -> Self {
        let name = listen.name();
        let call: Arc<AsyncFn<P>> = Arc::new(move |payload: P| -> BoxFuture<'static, ListenerResult<P>> {
            let listen = Arc::clone(&listen);
            Box::pin(async move { listen.on_event(payload).await })
        });
        Self {
            call: Call::Async(call),
            name: Cow::Borrowed(name),
        }
    }

    /// Sets the name used in logs.
    #[must_use]
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Name used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if `other` is a clone of this listener.
    pub fn same_as(&self, other: &Listener<P>) -> bool {
        match (&self.call, &other.call) {
            (Call::Sync(a), Call::Sync(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            (Call::Async(a), Call::Async(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            _ => false,
        }
    }

    /// True if invoking this listener may suspend.
    pub fn is_async(&self) -> bool {
        matches!(self.call, Call::Async(_))
    }

    pub(crate) fn call(&self) -> &Call<P> {
        &self.call
    }
}

impl<P: Payload> Clone for Listener<P> {
    fn clone(&self) -> Self {
        Self {
            call: self.call.clone(),
            name: self.name.clone(),
        }
    }
}

impl<P: Payload> fmt::Debug for Listener<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("name", &self.name)
            .field("async", &self.is_async())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_display() {
        assert_eq!(Cancelled::new().to_string(), "cancelled");
        assert_eq!(
            Cancelled::with_reason("muted").to_string(),
            "cancelled: muted"
        );
        assert_eq!(Cancelled::with_reason("muted").reason(), Some("muted"));
    }

    #[test]
    fn test_flow_helpers() {
        let flow: Flow<u8> = Flow::cancel_with("stop");
        assert!(flow.is_cancel());
        assert_eq!(flow, Flow::Cancel(Cancelled::with_reason("stop")));
        assert!(!Flow::<u8>::Pass.is_cancel());
    }

    #[test]
    fn test_identity_follows_clones() {
        let a: Listener<u32> = Listener::sync(|_| Ok(Flow::Pass));
        let b: Listener<u32> = Listener::sync(|_| Ok(Flow::Pass));
        let a2 = a.clone().named("renamed");

        assert!(a.same_as(&a2));
        assert!(!a.same_as(&b));
        assert_eq!(a2.name(), "renamed");
    }

    #[test]
    fn test_future_listener_is_async() {
        let l: Listener<u32> = Listener::future(|n| async move { Ok(Flow::Patch(n + 1)) });
        assert!(l.is_async());
        assert_eq!(l.name(), "async");
    }
}
