//! # Dispatch loop.
//!
//! Runs every listener registered on one event, tier by tier, threading the
//! payload through them.
//!
//! ## Flow
//! ```text
//! payload ──► for tier in [Before, Normal, After]:
//!               snapshot = registry.snapshot(event, tier)
//!               for entry in snapshot:
//!                 ├─ !entry.claim()        ─► skip (removed meanwhile / once already fired)
//!                 ├─ Ok(Pass)              ─► continue
//!                 ├─ Ok(Patch(p))          ─► payload.merge(p), continue
//!                 ├─ Ok(Cancel(c))         ─► return Emitted::Cancelled { payload, c }
//!                 └─ Err(e)                ─► return EmitError::Listener { e }
//!           ──► Emitted::Done(payload)
//! ```
//!
//! ## Rules
//! - Listeners run strictly one after another; an async listener's future is
//!   awaited before the next listener starts.
//! - Each tier is snapshotted when its iteration starts: listeners added to a
//!   tier while it runs are not observed by this pass.
//! - `run_sync` polls async listeners once; a pending future is a usage error
//!   ([`EmitError::Suspended`]).

use futures::FutureExt;

use crate::error::EmitError;
use crate::events::{Event, Priority};
use crate::listeners::registry::{Entry, Registry};
use crate::listeners::{Call, Cancelled, Flow, ListenerResult};
use crate::payload::Payload;

/// Outcome of a dispatch that no listener failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emitted<P> {
    /// Every listener ran; carries the final payload.
    Done(P),
    /// A listener cancelled; later listeners did not run.
    Cancelled {
        /// Payload as it was when the cancelling listener returned.
        payload: P,
        /// The listener's cancellation token.
        cancelled: Cancelled,
    },
}

impl<P> Emitted<P> {
    /// True if the dispatch was cut short.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Emitted::Cancelled { .. })
    }

    /// The cancellation token, if any.
    pub fn cancelled(&self) -> Option<&Cancelled> {
        match self {
            Emitted::Done(_) => None,
            Emitted::Cancelled { cancelled, .. } => Some(cancelled),
        }
    }

    /// The payload, final or as of cancellation.
    pub fn payload(&self) -> &P {
        match self {
            Emitted::Done(payload) | Emitted::Cancelled { payload, .. } => payload,
        }
    }

    /// Consumes the outcome and returns the payload, final or as of cancellation.
    pub fn into_payload(self) -> P {
        match self {
            Emitted::Done(payload) | Emitted::Cancelled { payload, .. } => payload,
        }
    }

    /// Returns the payload only for a full run.
    pub fn done(self) -> Option<P> {
        match self {
            Emitted::Done(payload) => Some(payload),
            Emitted::Cancelled { .. } => None,
        }
    }
}

/// Asynchronous dispatch of `E`.
pub(crate) async fn run<E: Event>(
    registry: &Registry,
    mut payload: E::Payload,
) -> Result<Emitted<E::Payload>, EmitError> {
    tracing::trace!(emitter = %registry.config().label, event = E::NAME, "emit");

    for priority in Priority::ORDER {
        for entry in registry.snapshot::<E>(priority) {
            if !entry.claim() {
                continue;
            }
            trace_invoke::<E>(registry, priority, &entry);

            let result = match entry.listener.call() {
                Call::Sync(f) => f(&payload),
                Call::Async(f) => f(payload.clone()).await,
            };
            if let Some(cancelled) = apply::<E>(registry, priority, &entry, &mut payload, result)? {
                return Ok(Emitted::Cancelled { payload, cancelled });
            }
        }
    }
    Ok(Emitted::Done(payload))
}

/// Synchronous dispatch of `E`; never suspends.
pub(crate) fn run_sync<E: Event>(
    registry: &Registry,
    mut payload: E::Payload,
) -> Result<Emitted<E::Payload>, EmitError> {
    tracing::trace!(emitter = %registry.config().label, event = E::NAME, "emit_sync");

    for priority in Priority::ORDER {
        for entry in registry.snapshot::<E>(priority) {
            if !entry.claim() {
                continue;
            }
            trace_invoke::<E>(registry, priority, &entry);

            let result = match entry.listener.call() {
                Call::Sync(f) => f(&payload),
                Call::Async(f) => match f(payload.clone()).now_or_never() {
                    Some(result) => result,
                    None => {
                        tracing::warn!(
                            emitter = %registry.config().label,
                            event = E::NAME,
                            %priority,
                            listener = entry.listener.name(),
                            "listener suspended during synchronous emit"
                        );
                        return Err(EmitError::Suspended { event: E::NAME });
                    }
                },
            };
            if let Some(cancelled) = apply::<E>(registry, priority, &entry, &mut payload, result)? {
                return Ok(Emitted::Cancelled { payload, cancelled });
            }
        }
    }
    Ok(Emitted::Done(payload))
}

fn trace_invoke<E: Event>(registry: &Registry, priority: Priority, entry: &Entry<E::Payload>) {
    tracing::trace!(
        emitter = %registry.config().label,
        event = E::NAME,
        %priority,
        id = entry.handle.id(),
        listener = entry.listener.name(),
        "invoking listener"
    );
}

/// Folds one listener result into the running payload.
///
/// Returns `Some(cancelled)` when dispatch must stop.
fn apply<E: Event>(
    registry: &Registry,
    priority: Priority,
    entry: &Entry<E::Payload>,
    payload: &mut E::Payload,
    result: ListenerResult<E::Payload>,
) -> Result<Option<Cancelled>, EmitError> {
    match result {
        Ok(Flow::Pass) => Ok(None),
        Ok(Flow::Patch(patch)) => {
            payload.merge(patch);
            Ok(None)
        }
        Ok(Flow::Cancel(cancelled)) => {
            tracing::debug!(
                emitter = %registry.config().label,
                event = E::NAME,
                %priority,
                listener = entry.listener.name(),
                reason = cancelled.reason().unwrap_or(""),
                "dispatch cancelled"
            );
            Ok(Some(cancelled))
        }
        Err(source) => {
            tracing::debug!(
                emitter = %registry.config().label,
                event = E::NAME,
                %priority,
                listener = entry.listener.name(),
                error = %source,
                "listener failed"
            );
            Err(EmitError::Listener {
                event: E::NAME,
                source,
            })
        }
    }
}
