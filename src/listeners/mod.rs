//! # Listeners and their registry.
//!
//! This module provides the [`Listener`] contract, the [`Listen`] extension trait,
//! cleanup [`ListenerHandle`]s and the per-emitter registry that stores them.
//!
//! ## Architecture
//! ```text
//! Emitter::on(key, f) ──► Listener::sync(f) ──► Registry::insert ──► ListenerHandle
//!                                                    │
//! Emitter::emit(event) ──► Registry::snapshot(tier) ◄┘
//!                               │
//!                               ├──► entry.claim()  (active? once → detach)
//!                               └──► listener(payload) ─► Flow / Err
//! ```
//!
//! ## Listener kinds
//! - **Sync closures** `Fn(&P) -> ListenerResult<P>`: usable from `emit` and `emit_sync`.
//! - **Async closures** `Fn(P) -> impl Future`: awaited by `emit`; under `emit_sync`
//!   they must complete on first poll.
//! - **Trait objects** `Arc<dyn Listen<P>>`: stateful listeners with a name.
//!
//! ## Implementing custom listeners
//! ```rust
//! use async_trait::async_trait;
//! use mutevents::{Flow, Listen, ListenerResult};
//!
//! struct Censor;
//!
//! #[async_trait]
//! impl Listen<String> for Censor {
//!     async fn on_event(&self, msg: String) -> ListenerResult<String> {
//!         if msg.contains("secret") {
//!             return Ok(Flow::cancel_with("censored"));
//!         }
//!         Ok(Flow::Pass)
//!     }
//! }
//! ```

mod handle;
mod listener;
#[cfg(feature = "logging")]
mod log;
pub(crate) mod registry;

pub use handle::ListenerHandle;
pub(crate) use listener::Call;
pub use listener::{Cancelled, Flow, Listen, Listener, ListenerResult};
#[cfg(feature = "logging")]
pub use log::log_writer;
pub use registry::ListenerId;
