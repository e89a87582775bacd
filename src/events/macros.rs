//! Declarative helpers for event markers and schemas.

/// Declares zero-sized event markers.
///
/// Each entry `Name => PayloadType` produces a `Copy` unit struct implementing
/// [`Event`](crate::Event) with `NAME = "Name"`.
///
/// ```rust
/// mutevents::event! {
///     /// A dog barked.
///     pub Woof => String;
///     pub Death => ();
/// }
///
/// use mutevents::Event;
/// assert_eq!(Woof::NAME, "Woof");
/// ```
#[macro_export]
macro_rules! event {
    ($( $(#[$meta:meta])* $vis:vis $name:ident => $payload:ty );+ $(;)?) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
            $vis struct $name;

            impl $crate::Event for $name {
                type Payload = $payload;
                const NAME: &'static str = stringify!($name);
            }
        )+
    };
}

/// Declares a schema marker and the events it carries.
///
/// ```rust
/// mutevents::event! {
///     pub Woof => String;
///     pub Death => ();
/// }
///
/// mutevents::schema! {
///     /// Everything a dog can emit.
///     pub DogEvents { Woof, Death }
/// }
///
/// let dog = mutevents::Emitter::<DogEvents>::new();
/// assert_eq!(dog.listener_count(Woof), 0);
/// ```
#[macro_export]
macro_rules! schema {
    ($(#[$meta:meta])* $vis:vis $name:ident { $($event:ty),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default)]
        $vis struct $name;

        impl $crate::Schema for $name {}

        $( impl $crate::Emits<$event> for $name {} )*
    };
}
