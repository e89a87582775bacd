//! # Payload merge contract.
//!
//! A listener may return a *patch* instead of a whole new payload. The dispatch
//! loop folds it into the running payload with [`Payload::merge`].
//!
//! ## Merge rule
//! Shallow, first level only:
//! - scalars, strings, `Option`, `Arc`: the patch **replaces** the value;
//! - tuples: patch is a tuple of `Option`s, `Some` overwrites that element;
//! - `Vec<T>`: index-wise overwrite of the leading elements, extending the
//!   vector when the patch is longer;
//! - records declared with [`payload!`](crate::payload): one `Option` per field.
//!
//! ```rust
//! use mutevents::Payload;
//!
//! let mut pair = (1, String::from("keep"));
//! pair.merge((Some(9), None));
//! assert_eq!(pair, (9, String::from("keep")));
//! ```

use std::sync::Arc;

/// Data carried by an event.
///
/// Must be cheap enough to clone: async listeners receive an owned copy.
pub trait Payload: Clone + Send + Sync + 'static {
    /// Partial replacement accepted by [`merge`](Payload::merge).
    type Patch: Send + 'static;

    /// Overwrites the parts of `self` present in `patch`.
    fn merge(&mut self, patch: Self::Patch);
}

impl Payload for () {
    type Patch = ();

    fn merge(&mut self, _patch: ()) {}
}

macro_rules! replace_payload {
    ($($t:ty),* $(,)?) => {
        $(
            impl Payload for $t {
                type Patch = $t;

                fn merge(&mut self, patch: $t) {
                    *self = patch;
                }
            }
        )*
    };
}

replace_payload!(
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    String,
    &'static str,
    std::time::Duration,
);

impl<T: Clone + Send + Sync + 'static> Payload for Option<T> {
    type Patch = Option<T>;

    fn merge(&mut self, patch: Option<T>) {
        *self = patch;
    }
}

impl<T: ?Sized + Send + Sync + 'static> Payload for Arc<T> {
    type Patch = Arc<T>;

    fn merge(&mut self, patch: Arc<T>) {
        *self = patch;
    }
}

impl<T: Clone + Send + Sync + 'static> Payload for Vec<T> {
    type Patch = Vec<T>;

    fn merge(&mut self, patch: Vec<T>) {
        for (i, value) in patch.into_iter().enumerate() {
            match self.get_mut(i) {
                Some(slot) => *slot = value,
                None => self.push(value),
            }
        }
    }
}

macro_rules! tuple_payload {
    ($(($($t:ident . $idx:tt),+))+) => {
        $(
            impl<$($t: Clone + Send + Sync + 'static),+> Payload for ($($t,)+) {
                type Patch = ($(Option<$t>,)+);

                fn merge(&mut self, patch: Self::Patch) {
                    $(
                        if let Some(value) = patch.$idx {
                            self.$idx = value;
                        }
                    )+
                }
            }
        )+
    };
}

tuple_payload! {
    (A.0)
    (A.0, B.1)
    (A.0, B.1, C.2)
    (A.0, B.1, C.2, D.3)
    (A.0, B.1, C.2, D.3, E.4)
    (A.0, B.1, C.2, D.3, E.4, F.5)
}
