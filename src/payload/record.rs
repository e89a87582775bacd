//! Record payloads with field-wise patches.

/// Declares a record payload and its patch type.
///
/// The patch struct has one `Option` field per record field plus builder-style
/// setters of the same name; [`merge`](crate::Payload::merge) overwrites only the
/// fields that are `Some`. The record must derive `Clone`.
///
/// ```rust
/// use mutevents::Payload;
///
/// mutevents::payload! {
///     #[derive(Clone, Debug, PartialEq)]
///     pub struct Point { pub x: i32, pub y: i32 }
///     #[derive(Debug)]
///     patch PointPatch;
/// }
///
/// let mut p = Point { x: 1, y: 2 };
/// p.merge(PointPatch::default().x(9));
/// assert_eq!(p, Point { x: 9, y: 2 });
/// ```
#[macro_export]
macro_rules! payload {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident { $($fvis:vis $field:ident : $ty:ty),* $(,)? }
        $(#[$pmeta:meta])*
        patch $patch:ident;
    ) => {
        $(#[$meta])*
        $vis struct $name { $($fvis $field: $ty),* }

        $(#[$pmeta])*
        #[derive(Clone, Default)]
        $vis struct $patch { $(pub $field: ::std::option::Option<$ty>),* }

        impl $patch {
            $(
                /// Sets this field in the patch.
                #[must_use]
                pub fn $field(mut self, value: $ty) -> Self {
                    self.$field = ::std::option::Option::Some(value);
                    self
                }
            )*
        }

        impl $crate::Payload for $name {
            type Patch = $patch;

            fn merge(&mut self, patch: $patch) {
                $(
                    if let ::std::option::Option::Some(value) = patch.$field {
                        self.$field = value;
                    }
                )*
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::Payload;

    crate::payload! {
        #[derive(Clone, Debug, PartialEq)]
        struct Bark { msg: String, volume: u8 }
        patch BarkPatch;
    }

    #[test]
    fn test_record_patch_touches_only_present_fields() {
        let mut bark = Bark {
            msg: "Woof!".into(),
            volume: 3,
        };
        bark.merge(BarkPatch::default().msg("Waf!".into()));
        assert_eq!(
            bark,
            Bark {
                msg: "Waf!".into(),
                volume: 3
            }
        );

        bark.merge(BarkPatch {
            volume: Some(10),
            ..Default::default()
        });
        assert_eq!(bark.volume, 10);
        assert_eq!(bark.msg, "Waf!");
    }
}
