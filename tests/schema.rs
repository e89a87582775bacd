//! Declaration macros and composition through the public API only.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mutevents::{Emitted, Emitter, Event, Flow, Payload, Priority, WaitError};

mutevents::payload! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct Bark { pub msg: String, pub volume: u8 }
    #[derive(Debug)]
    patch BarkPatch;
}

mutevents::event! {
    /// Shared by every animal.
    pub Death => ();
    pub Woof => Bark;
    pub Quack => (String, u8);
    pub Feed => Vec<u32>;
}

mutevents::schema! {
    pub AnimalEvents { Death }
}
mutevents::schema! {
    pub DogEvents { Death, Woof, Feed }
}
mutevents::schema! {
    pub DuckEvents { Death, Quack }
}

struct Animal<S: mutevents::Schema> {
    events: Emitter<S>,
}

impl<S: mutevents::Schema + mutevents::Emits<Death>> Animal<S> {
    fn new(label: &'static str) -> Self {
        Self {
            events: Emitter::named(label),
        }
    }

    async fn die(&self) -> Result<Emitted<()>, mutevents::EmitError> {
        self.events.emit(Death, ()).await
    }
}

#[test]
fn event_names_come_from_markers() {
    assert_eq!(Woof::NAME, "Woof");
    assert_eq!(Death::NAME, "Death");
}

#[tokio::test]
async fn shared_event_works_for_every_schema() {
    let dog = Animal::<DogEvents>::new("dog");
    let duck = Animal::<DuckEvents>::new("duck");
    let lizard = Animal::<AnimalEvents>::new("lizard");
    let deaths = Arc::new(AtomicUsize::new(0));

    assert_eq!(
        [
            dog.events.listener_count(Death),
            duck.events.listener_count(Death),
            lizard.events.listener_count(Death),
        ],
        [0, 0, 0]
    );

    let counter = Arc::clone(&deaths);
    duck.events.on(Death, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Flow::Pass)
    });

    assert_eq!(dog.die().await.unwrap(), Emitted::Done(()));
    assert_eq!(duck.die().await.unwrap(), Emitted::Done(()));
    assert_eq!(lizard.die().await.unwrap(), Emitted::Done(()));
    assert_eq!(deaths.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn modifier_then_canceller() {
    let dog = Animal::<DogEvents>::new("dog");
    let seen_after = Arc::new(AtomicUsize::new(0));

    let after = Arc::clone(&seen_after);
    dog.events.on((Woof, Priority::LOW), move |_| {
        after.fetch_add(1, Ordering::SeqCst);
        Ok(Flow::Pass)
    });
    dog.events.on(Woof, |_| Ok(Flow::Patch(BarkPatch::default().msg("Waf!".into()))));
    dog.events.on(Woof, |bark| {
        if bark.msg == "Waf!" {
            return Ok(Flow::cancel());
        }
        Ok(Flow::Pass)
    });

    let out = dog
        .events
        .emit(
            Woof,
            Bark {
                msg: "Woof!".into(),
                volume: 4,
            },
        )
        .await
        .unwrap();

    assert!(out.is_cancelled());
    assert_eq!(
        out.into_payload(),
        Bark {
            msg: "Waf!".into(),
            volume: 4
        }
    );
    assert_eq!(seen_after.load(Ordering::SeqCst), 0);
}

#[test]
fn tuple_and_vec_payloads_merge_shallowly() {
    let duck = Animal::<DuckEvents>::new("duck");
    duck.events.on(Quack, |_| Ok(Flow::Patch((None, Some(9)))));
    let out = duck.events.emit_sync(Quack, ("quack".into(), 1)).unwrap();
    assert_eq!(out.done(), Some(("quack".to_string(), 9)));

    let dog = Animal::<DogEvents>::new("dog");
    dog.events.on(Feed, |_| Ok(Flow::Patch(vec![7])));
    let out = dog.events.emit_sync(Feed, vec![1, 2, 3]).unwrap();
    assert_eq!(out.into_payload(), vec![7, 2, 3]);
}

#[test]
fn record_patch_builder() {
    let mut bark = Bark {
        msg: "Woof!".into(),
        volume: 1,
    };
    bark.merge(BarkPatch::default().volume(11));
    assert_eq!(bark.msg, "Woof!");
    assert_eq!(bark.volume, 11);
}

#[tokio::test]
async fn error_on_close_reports_payload() {
    let dog = Animal::<DogEvents>::new("dog");
    let failure = dog.events.error((Death, Priority::HIGH));

    dog.die().await.unwrap();
    let err = failure.await.unwrap_err();
    assert_eq!(err.as_label(), "wait_raised");
    assert!(matches!(err, WaitError::Raised { event: "Death", .. }));
}
