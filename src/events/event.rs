//! # Event names and schemas.
//!
//! An event name is a zero-sized marker type implementing [`Event`]; its
//! [`Event::Payload`] fixes the data carried with it. A [`Schema`] is the closed
//! set of events an emitter accepts, declared with one [`Emits`] impl per event.
//!
//! ```text
//!   schema AnimalEvents ── Death ─► ()
//!   schema DogEvents    ── Death ─► ()
//!                       └─ Woof  ─► Bark { msg }
//! ```
//!
//! Markers may be shared by several schemas. Use [`event!`](crate::event) and
//! [`schema!`](crate::schema) to declare them without boilerplate.
//!
//! ## Example
//! ```rust
//! use mutevents::{Emits, Event, Schema};
//!
//! #[derive(Clone, Copy, Debug)]
//! struct Ready;
//!
//! impl Event for Ready {
//!     type Payload = u32;
//!     const NAME: &'static str = "ready";
//! }
//!
//! struct Boot;
//! impl Schema for Boot {}
//! impl Emits<Ready> for Boot {}
//!
//! assert_eq!(Ready::NAME, "ready");
//! ```

use crate::events::Priority;
use crate::payload::Payload;

/// A statically known event name.
pub trait Event: Copy + Send + Sync + 'static {
    /// Data delivered with this event.
    type Payload: Payload;

    /// Human-readable name (logs, errors).
    const NAME: &'static str;
}

/// A closed set of events accepted by an [`Emitter`](crate::Emitter).
pub trait Schema: 'static {}

/// Declares that schema `Self` carries event `E`.
pub trait Emits<E: Event>: Schema {}

/// Registration key: an event plus the tier to register in.
///
/// Implemented for every [`Event`] (tier [`Priority::Normal`]) and for
/// `(event, priority)` pairs.
pub trait EventKey {
    /// The event this key addresses.
    type Event: Event;

    /// Tier addressed by this key.
    fn priority(&self) -> Priority;
}

impl<E: Event> EventKey for E {
    type Event = E;

    fn priority(&self) -> Priority {
        Priority::Normal
    }
}

impl<E: Event> EventKey for (E, Priority) {
    type Event = E;

    fn priority(&self) -> Priority {
        self.1
    }
}

/// Payload type addressed by a key.
pub type PayloadOf<K> = <<K as EventKey>::Event as Event>::Payload;
