//! Event payloads and how listeners patch them.
//!
//! - [`Payload`] merge contract and impls for std types
//! - `payload!` macro for record payloads with field-wise patches

mod merge;
mod record;

pub use merge::Payload;
