//! # LogWriter: reference listener that records payloads
//!
//! [`log_writer`] returns a listener that records every payload it sees through
//! `tracing` and never changes it. Use it for tests or demos, typically in the
//! [`Priority::After`](crate::Priority::After) tier to see the final payload.
//!
//! ## Example output (with a `fmt` subscriber)
//! ```text
//! INFO mutevents::listeners::log: payload=Bark { msg: "Waf!" } event="Woof"
//! ```

use std::fmt::Debug;

use crate::events::Event;
use crate::listeners::{Flow, Listener};

/// Builds a pass-through listener that logs each payload of `E` at `INFO`.
pub fn log_writer<E>(_event: E) -> Listener<E::Payload>
where
    E: Event,
    E::Payload: Debug,
{
    Listener::sync(|payload: &E::Payload| {
        tracing::info!(event = E::NAME, ?payload);
        Ok(Flow::Pass)
    })
    .named("log_writer")
}
