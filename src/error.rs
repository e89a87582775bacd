//! Error types used by the emitter and its suspension handles.
//!
//! This module defines two main error enums:
//!
//! - [`EmitError`]: failures that terminate a dispatch (`emit` / `emit_sync`).
//! - [`WaitError`]: non-data outcomes of a [`Wait`](crate::Wait) or [`Failure`](crate::Failure).
//!
//! Cancellation is **not** an error: a listener returning [`Flow::Cancel`](crate::Flow::Cancel)
//! produces [`Emitted::Cancelled`](crate::Emitted::Cancelled).
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use thiserror::Error;

/// Boxed error returned by failing listeners.
///
/// Any `std::error::Error + Send + Sync` converts into it with `?` or `.into()`,
/// including `&str` and `String`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// # Errors produced by a dispatch.
///
/// Either a listener failed (the failure is carried unmodified in `source`),
/// or the synchronous dispatch path met a listener that wanted to suspend.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum EmitError {
    /// A listener returned an error; no listener after it ran.
    #[error("listener on `{event}` failed: {source}")]
    Listener {
        /// Name of the event being dispatched.
        event: &'static str,
        /// The listener's own error.
        #[source]
        source: BoxError,
    },

    /// An async listener did not complete immediately under `emit_sync`.
    ///
    /// This is a contract violation by the caller, not a listener failure.
    #[error("listener on `{event}` suspended during synchronous emit")]
    Suspended {
        /// Name of the event being dispatched.
        event: &'static str,
    },
}

impl EmitError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use mutevents::EmitError;
    ///
    /// let err = EmitError::Suspended { event: "woof" };
    /// assert_eq!(err.as_label(), "emit_suspended");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            EmitError::Listener { .. } => "emit_listener_failed",
            EmitError::Suspended { .. } => "emit_suspended",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            EmitError::Listener { event, source } => format!("event={event} error: {source}"),
            EmitError::Suspended { event } => format!("event={event} listener would suspend"),
        }
    }

    /// Name of the event whose dispatch failed.
    pub fn event(&self) -> &'static str {
        match self {
            EmitError::Listener { event, .. } | EmitError::Suspended { event } => event,
        }
    }

    /// Recovers the listener's original error, if this is a listener failure.
    ///
    /// # Example
    /// ```
    /// use mutevents::{BoxError, EmitError};
    ///
    /// let err = EmitError::Listener { event: "woof", source: BoxError::from("boom") };
    /// assert_eq!(err.into_source().map(|e| e.to_string()).as_deref(), Some("boom"));
    /// ```
    pub fn into_source(self) -> Option<BoxError> {
        match self {
            EmitError::Listener { source, .. } => Some(source),
            EmitError::Suspended { .. } => None,
        }
    }
}

/// # Non-data outcomes of a suspension handle.
///
/// `P` is the payload type of the awaited event.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WaitError<P> {
    /// The event fired while awaited through [`Emitter::error`](crate::Emitter::error).
    #[error("event `{event}` raised")]
    Raised {
        /// Name of the event that fired.
        event: &'static str,
        /// Payload delivered with it.
        payload: P,
    },

    /// The abort token was cancelled before the event fired.
    #[error("wait aborted")]
    Aborted,

    /// The emitter was dropped before the event fired.
    #[error("emitter closed")]
    Closed,
}

impl<P> WaitError<P> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use mutevents::WaitError;
    ///
    /// let err: WaitError<()> = WaitError::Aborted;
    /// assert_eq!(err.as_label(), "wait_aborted");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WaitError::Raised { .. } => "wait_raised",
            WaitError::Aborted => "wait_aborted",
            WaitError::Closed => "wait_closed",
        }
    }

    /// Indicates whether the wait ended because its abort token fired.
    pub fn is_aborted(&self) -> bool {
        matches!(self, WaitError::Aborted)
    }

    /// Returns the raised payload, if any.
    pub fn into_payload(self) -> Option<P> {
        match self {
            WaitError::Raised { payload, .. } => Some(payload),
            WaitError::Aborted | WaitError::Closed => None,
        }
    }
}
