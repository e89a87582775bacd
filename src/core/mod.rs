//! Emitter core: registration, dispatch and suspension.
//!
//! The only public API from this module is [`Emitter`] (with its weak handle),
//! the dispatch outcome [`Emitted`], and the [`Wait`] / [`Failure`] futures.
//!
//! Internal modules:
//! - [`dispatch`]: the tiered dispatch loop shared by `emit` and `emit_sync`;
//! - [`emitter`]: the typed front-end over the listener registry;
//! - [`wait`]: one-shot suspension handles with abort tokens.

mod dispatch;
mod emitter;
mod wait;

pub use dispatch::Emitted;
pub use emitter::{Emitter, WeakEmitter};
pub use wait::{Failure, Wait};
