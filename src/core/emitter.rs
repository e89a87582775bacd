//! # Emitter: typed registry plus dispatch.
//!
//! [`Emitter<S>`] accepts only the events declared by schema `S`, and only
//! listeners whose payload type matches the event. It is a cheap, cloneable
//! handle: clones share one registry.
//!
//! ## Operations
//! | Area          | Methods                                                        |
//! |---------------|----------------------------------------------------------------|
//! | Registration  | `on`, `on_async`, `once`, `once_async`, `attach`, `attach_once`|
//! | Removal       | `ListenerHandle::off`, `off`                                   |
//! | Dispatch      | `emit` (async), `emit_sync`                                    |
//! | Suspension    | `wait`, `wait_with`, `error`, `error_with`                     |
//! | Bridging      | `reemit`                                                       |
//!
//! ## Example
//! ```rust
//! use mutevents::{Emitter, Flow, Priority};
//!
//! mutevents::event! {
//!     pub Woof => String;
//! }
//! mutevents::schema! {
//!     pub DogEvents { Woof }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), mutevents::EmitError> {
//! let dog = Emitter::<DogEvents>::named("dog");
//!
//! // Modifier
//! dog.on(Woof, |_msg| Ok(Flow::Patch("Waf!".to_string())));
//!
//! // Canceller, runs after the modifier
//! dog.on((Woof, Priority::After), |msg| {
//!     if msg == "Waf!" {
//!         return Ok(Flow::cancel());
//!     }
//!     Ok(Flow::Pass)
//! });
//!
//! let out = dog.emit(Woof, "Woof!".to_string()).await?;
//! assert!(out.is_cancelled());
//! assert_eq!(out.payload(), "Waf!");
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::{Arc, Weak};

use tokio_util::sync::CancellationToken;

use crate::config::EmitterConfig;
use crate::core::dispatch::{self, Emitted};
use crate::core::wait::{Failure, Wait};
use crate::error::{BoxError, EmitError};
use crate::events::{Emits, Event, EventKey, PayloadOf, Schema};
use crate::listeners::registry::Registry;
use crate::listeners::{Flow, Listener, ListenerHandle, ListenerResult};

/// Typed event emitter for schema `S`.
pub struct Emitter<S: Schema> {
    registry: Arc<Registry>,
    _schema: PhantomData<fn() -> S>,
}

impl<S: Schema> Emitter<S> {
    /// Creates an emitter with [`EmitterConfig::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    /// Creates an emitter whose logs carry `label`.
    #[must_use]
    pub fn named(label: impl Into<std::borrow::Cow<'static, str>>) -> Self {
        Self::with_config(EmitterConfig::named(label))
    }

    /// Creates an emitter with an explicit configuration.
    #[must_use]
    pub fn with_config(config: EmitterConfig) -> Self {
        Self {
            registry: Registry::new(config),
            _schema: PhantomData,
        }
    }

    /// Configuration this emitter was built with.
    pub fn config(&self) -> &EmitterConfig {
        self.registry.config()
    }

    // ---------------------------
    // Registration
    // ---------------------------

    /// Runs `listener` on every dispatch of the key's event, in the key's tier.
    ///
    /// `key` is an event (`Woof`, tier `Normal`) or a pair `(Woof, Priority::After)`.
    pub fn on<K, F>(&self, key: K, listener: F) -> ListenerHandle
    where
        K: EventKey,
        S: Emits<K::Event>,
        F: Fn(&PayloadOf<K>) -> ListenerResult<PayloadOf<K>> + Send + Sync + 'static,
    {
        self.insert(key, Listener::sync(listener), false)
    }

    /// Like [`on`](Self::on) with an async listener.
    ///
    /// The listener receives an owned copy of the current payload; dispatch waits for
    /// its future before moving on.
    pub fn on_async<K, F, Fut>(&self, key: K, listener: F) -> ListenerHandle
    where
        K: EventKey,
        S: Emits<K::Event>,
        F: Fn(PayloadOf<K>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ListenerResult<PayloadOf<K>>> + Send + 'static,
    {
        self.insert(key, Listener::future(listener), false)
    }

    /// Runs `listener` at most once: the registration removes itself right before
    /// the first invocation.
    pub fn once<K, F>(&self, key: K, listener: F) -> ListenerHandle
    where
        K: EventKey,
        S: Emits<K::Event>,
        F: Fn(&PayloadOf<K>) -> ListenerResult<PayloadOf<K>> + Send + Sync + 'static,
    {
        self.insert(key, Listener::sync(listener), true)
    }

    /// Like [`once`](Self::once) with an async listener.
    ///
    /// The registration is consumed when dispatch reaches it, before its future
    /// is polled. Under [`emit_sync`](Self::emit_sync) a future that does not
    /// complete immediately is dropped, so the listener never produces a result.
    pub fn once_async<K, F, Fut>(&self, key: K, listener: F) -> ListenerHandle
    where
        K: EventKey,
        S: Emits<K::Event>,
        F: Fn(PayloadOf<K>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ListenerResult<PayloadOf<K>>> + Send + 'static,
    {
        self.insert(key, Listener::future(listener), true)
    }

    /// Registers a prebuilt listener. Keep a clone to remove it later with [`off`](Self::off).
    pub fn attach<K>(&self, key: K, listener: &Listener<PayloadOf<K>>) -> ListenerHandle
    where
        K: EventKey,
        S: Emits<K::Event>,
    {
        self.insert(key, listener.clone(), false)
    }

    /// Registers a prebuilt listener for at most one invocation.
    pub fn attach_once<K>(&self, key: K, listener: &Listener<PayloadOf<K>>) -> ListenerHandle
    where
        K: EventKey,
        S: Emits<K::Event>,
    {
        self.insert(key, listener.clone(), true)
    }

    /// Removes every registration of `listener` (same identity) on the key.
    ///
    /// Returns how many were removed; removing nothing is not an error.
    pub fn off<K>(&self, key: K, listener: &Listener<PayloadOf<K>>) -> usize
    where
        K: EventKey,
        S: Emits<K::Event>,
    {
        self.registry
            .remove_matching::<K::Event>(key.priority(), listener)
    }

    /// Number of live registrations on the key's `(event, priority)`.
    pub fn listener_count<K>(&self, key: K) -> usize
    where
        K: EventKey,
        S: Emits<K::Event>,
    {
        self.registry.len::<K::Event>(key.priority())
    }

    fn insert<K>(&self, key: K, listener: Listener<PayloadOf<K>>, once: bool) -> ListenerHandle
    where
        K: EventKey,
    {
        self.registry
            .insert::<K::Event>(key.priority(), listener, once)
    }

    // ---------------------------
    // Dispatch
    // ---------------------------

    /// Dispatches `payload` to every listener of `event`: `Before`, `Normal`, `After`.
    ///
    /// ### Returns
    /// - `Ok(Emitted::Done(p))`: every listener ran, `p` is the final payload
    /// - `Ok(Emitted::Cancelled { .. })`: a listener cancelled, later ones did not run
    /// - `Err(EmitError::Listener { .. })`: a listener failed, later ones did not run
    pub async fn emit<E>(&self, _event: E, payload: E::Payload) -> Result<Emitted<E::Payload>, EmitError>
    where
        E: Event,
        S: Emits<E>,
    {
        dispatch::run::<E>(&self.registry, payload).await
    }

    /// Same semantics as [`emit`](Self::emit) without suspending.
    ///
    /// Async listeners are polled once; one that would suspend stops dispatch with
    /// [`EmitError::Suspended`]. Its future is dropped, and a `once` registration
    /// reached this way stays removed.
    pub fn emit_sync<E>(&self, _event: E, payload: E::Payload) -> Result<Emitted<E::Payload>, EmitError>
    where
        E: Event,
        S: Emits<E>,
    {
        dispatch::run_sync::<E>(&self.registry, payload)
    }

    // ---------------------------
    // Suspension
    // ---------------------------

    /// Resolves with the next payload delivered on the key.
    pub fn wait<K>(&self, key: K) -> Wait<PayloadOf<K>>
    where
        K: EventKey,
        S: Emits<K::Event>,
    {
        self.wait_with(key, CancellationToken::new())
    }

    /// Like [`wait`](Self::wait); cancelling `abort` detaches it and resolves `Err(Aborted)`.
    pub fn wait_with<K>(&self, key: K, abort: CancellationToken) -> Wait<PayloadOf<K>>
    where
        K: EventKey,
        S: Emits<K::Event>,
    {
        Wait::register::<K::Event>(&self.registry, key.priority(), abort)
    }

    /// Fails with [`WaitError::Raised`](crate::WaitError::Raised) when the key's event fires.
    pub fn error<K>(&self, key: K) -> Failure<PayloadOf<K>>
    where
        K: EventKey,
        S: Emits<K::Event>,
    {
        self.error_with(key, CancellationToken::new())
    }

    /// Like [`error`](Self::error) with an abort token.
    pub fn error_with<K>(&self, key: K, abort: CancellationToken) -> Failure<PayloadOf<K>>
    where
        K: EventKey,
        S: Emits<K::Event>,
    {
        Failure::new(self.wait_with(key, abort))
    }

    // ---------------------------
    // Bridging
    // ---------------------------

    /// Builds a listener that re-emits its payload as `target` on this emitter.
    ///
    /// Register it on another emitter to bridge events. The emitter is held weakly;
    /// once it is gone the listener passes. A cancelled re-emit cancels the source
    /// dispatch, a failed one fails it.
    pub fn reemit<E>(&self, target: E) -> Listener<E::Payload>
    where
        E: Event,
        S: Emits<E>,
    {
        let owner = self.downgrade();
        Listener::future(move |payload: E::Payload| {
            let owner = owner.clone();
            async move {
                let Some(owner) = owner.upgrade() else {
                    return Ok(Flow::Pass);
                };
                let flow = match owner.emit(target, payload).await {
                    Ok(Emitted::Done(_)) => Flow::Pass,
                    Ok(Emitted::Cancelled { cancelled, .. }) => Flow::Cancel(cancelled),
                    Err(err) => return Err(BoxError::from(err)),
                };
                Ok(flow)
            }
        })
        .named(E::NAME)
    }

    /// Non-owning handle to this emitter.
    pub fn downgrade(&self) -> WeakEmitter<S> {
        WeakEmitter {
            registry: Arc::downgrade(&self.registry),
            _schema: PhantomData,
        }
    }
}

impl<S: Schema> Default for Emitter<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Schema> Clone for Emitter<S> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            _schema: PhantomData,
        }
    }
}

impl<S: Schema> fmt::Debug for Emitter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("label", &self.config().label)
            .field("tiers", &self.registry.tiers())
            .finish()
    }
}

/// Weak counterpart of [`Emitter`]; does not keep listeners alive.
pub struct WeakEmitter<S: Schema> {
    registry: Weak<Registry>,
    _schema: PhantomData<fn() -> S>,
}

impl<S: Schema> WeakEmitter<S> {
    /// Returns the emitter if it still exists.
    pub fn upgrade(&self) -> Option<Emitter<S>> {
        self.registry.upgrade().map(|registry| Emitter {
            registry,
            _schema: PhantomData,
        })
    }
}

impl<S: Schema> Clone for WeakEmitter<S> {
    fn clone(&self) -> Self {
        Self {
            registry: Weak::clone(&self.registry),
            _schema: PhantomData,
        }
    }
}

impl<S: Schema> fmt::Debug for WeakEmitter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakEmitter")
            .field("alive", &(self.registry.strong_count() > 0))
            .finish()
    }
}
