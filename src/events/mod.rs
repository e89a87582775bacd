//! Event names, schemas and priority tiers.
//!
//! This module groups the **static contract** of an emitter: which events exist,
//! which payload each one carries, and in which tier a listener runs.
//!
//! ## Contents
//! - [`Event`], [`Schema`], [`Emits`] compile-time event/payload mapping
//! - [`EventKey`] registration key (`event` or `(event, priority)`)
//! - [`Priority`] dispatch tiers
//! - `event!` / `schema!` declaration macros

mod event;
mod macros;
mod priority;

pub use event::{Emits, Event, EventKey, PayloadOf, Schema};
pub use priority::Priority;
