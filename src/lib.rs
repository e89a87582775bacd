//! # mutevents
//!
//! **mutevents** is a typed, in-process event emitter for Rust.
//!
//! A producer broadcasts a payload tagged by an event name to any number of
//! listeners. Listeners run in three priority tiers, may patch the payload for
//! the listeners after them, and may cancel the dispatch. Event names and their
//! payload types form a compile-time schema per emitter.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  Listener A  │   │  Listener B  │   │  Listener C  │
//!     │   (Before)   │   │   (Normal)   │   │   (After)    │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼ on()             ▼ on()             ▼ once()
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Emitter<Schema>                                                  │
//! │  - Registry: (event, priority) → ordered entries                  │
//! │  - ListenerHandle per entry (idempotent off)                      │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼ emit(event, payload)
//!            ┌───────────────────────────────────────────┐
//!            │ Before[..] ──► Normal[..] ──► After[..]   │
//!            │   Pass    → next listener                 │
//!            │   Patch   → payload.merge(patch)          │
//!            │   Cancel  → Emitted::Cancelled            │
//!            │   Err     → EmitError::Listener           │
//!            └───────────────────────────────────────────┘
//! ```
//!
//! ### Dispatch
//! ```text
//! emit(event, payload) ──► for tier in [Before, Normal, After]
//!                            snapshot(tier) ──► claim ──► invoke ──► fold result
//!                          ──► Emitted::Done(final payload)
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                           |
//! |-------------------|---------------------------------------------------------------|----------------------------------------------|
//! | **Schema**        | Compile-time event → payload mapping.                         | [`Event`], [`Schema`], [`Emits`]             |
//! | **Registration**  | Tiered listeners with cleanup handles.                        | [`Emitter`], [`ListenerHandle`], [`Priority`]|
//! | **Listeners**     | Sync closures, async closures, trait objects.                 | [`Listener`], [`Listen`], [`Flow`]           |
//! | **Payloads**      | Shallow patch merging between listeners.                      | [`Payload`]                                  |
//! | **Suspension**    | Await the next event, or fail on it, with abort tokens.       | [`Wait`], [`Failure`]                        |
//! | **Errors**        | Typed dispatch and wait errors.                               | [`EmitError`], [`WaitError`]                 |
//! | **Configuration** | Per-emitter label and storage settings.                       | [`EmitterConfig`]                            |
//!
//! ## Optional features
//! - `logging`: exports [`log_writer`], a reference listener recording payloads via `tracing`.
//!
//! ## Example
//! ```rust
//! use mutevents::{Emitted, Emitter, Flow, Priority};
//!
//! mutevents::payload! {
//!     #[derive(Clone, Debug, PartialEq)]
//!     pub struct Bark { pub msg: String, pub volume: u8 }
//!     patch BarkPatch;
//! }
//!
//! mutevents::event! {
//!     pub Woof => Bark;
//!     pub Death => ();
//! }
//!
//! mutevents::schema! {
//!     pub DogEvents { Woof, Death }
//! }
//!
//! // Composition: the dog holds an emitter scoped to its own schema.
//! struct Dog {
//!     events: Emitter<DogEvents>,
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dog = Dog { events: Emitter::named("dog") };
//!
//!     dog.events.on((Woof, Priority::Before), |bark| {
//!         println!("Before: {}", bark.msg);
//!         Ok(Flow::Pass)
//!     });
//!     dog.events.on(Woof, |_| Ok(Flow::Patch(BarkPatch::default().msg("Waf!".into()))));
//!
//!     let out = dog.events.emit(Woof, Bark { msg: "Woof!".into(), volume: 3 }).await?;
//!     assert_eq!(out, Emitted::Done(Bark { msg: "Waf!".into(), volume: 3 }));
//!
//!     let death = dog.events.wait(Death);
//!     dog.events.emit(Death, ()).await?;
//!     death.await?;
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod listeners;
mod payload;

// ---- Public re-exports ----

pub use config::EmitterConfig;
pub use core::{Emitted, Emitter, Failure, Wait, WeakEmitter};
pub use error::{BoxError, EmitError, WaitError};
pub use events::{Emits, Event, EventKey, PayloadOf, Priority, Schema};
pub use listeners::{Cancelled, Flow, Listen, Listener, ListenerHandle, ListenerId, ListenerResult};
pub use payload::Payload;

// Optional: expose a simple built-in logging listener (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use listeners::log_writer;
