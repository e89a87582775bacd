//! # Example: animals
//!
//! Demonstrates schemas shared through composition and the four listener roles.
//!
//! Shows how to:
//! - Declare events and schemas with [`event!`] / [`schema!`].
//! - Give each animal type its own [`Emitter`] over a schema that includes `Death`.
//! - Register observers, a modifier and a canceller in different tiers.
//!
//! ## Flow
//! ```text
//! dog.bark("Woof!")
//!   ├─► Before: print "Before: Woof!"
//!   ├─► Normal: modifier  ─► msg = "Waf!"
//!   ├─► Normal: canceller ─► msg == "Waf!" ─► Cancel
//!   └─► After:  never reached
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example animals
//! RUST_LOG=mutevents=trace cargo run --example animals
//! RUST_LOG=info cargo run --example animals --features logging
//! ```

use mutevents::{Emitted, Emitter, Flow, Priority};
use tracing_subscriber::EnvFilter;

mutevents::payload! {
    #[derive(Clone, Debug)]
    pub struct Bark { pub msg: String }
    patch BarkPatch;
}

mutevents::event! {
    pub Death => ();
    pub Woof => Bark;
    pub Quack => String;
}

mutevents::schema! {
    /// What every animal can emit.
    pub AnimalEvents { Death }
}
mutevents::schema! {
    pub DogEvents { Death, Woof }
}
mutevents::schema! {
    pub DuckEvents { Death, Quack }
}

struct Dog {
    events: Emitter<DogEvents>,
}

impl Dog {
    fn new() -> Self {
        Self {
            events: Emitter::named("dog"),
        }
    }

    async fn bark(&self, msg: &str) -> anyhow::Result<Emitted<Bark>> {
        let bark = Bark { msg: msg.into() };
        Ok(self.events.emit(Woof, bark).await?)
    }

    async fn die(&self) -> anyhow::Result<Emitted<()>> {
        Ok(self.events.emit(Death, ()).await?)
    }
}

struct Duck {
    events: Emitter<DuckEvents>,
}

struct Lizard {
    events: Emitter<AnimalEvents>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let dog = Dog::new();

    // After-observer
    dog.events.on((Woof, Priority::After), |bark| {
        println!("After: {}", bark.msg);
        Ok(Flow::Pass)
    });

    // Modifier
    dog.events.on(Woof, |_| {
        Ok(Flow::Patch(BarkPatch::default().msg("Waf!".into())))
    });

    // Canceller
    dog.events.on(Woof, |bark| {
        if bark.msg == "Waf!" {
            return Ok(Flow::cancel_with("dogs say woof"));
        }
        Ok(Flow::Pass)
    });

    // Before-observer
    dog.events.on((Woof, Priority::Before), |bark| {
        println!("Before: {}", bark.msg);
        Ok(Flow::Pass)
    });

    // Optional: record every bark as it arrives (requires "logging" feature)
    #[cfg(feature = "logging")]
    dog.events.attach((Woof, Priority::Before), &mutevents::log_writer(Woof));

    let out = dog.bark("Woof!").await?;
    if let Some(cancelled) = out.cancelled() {
        println!("{cancelled}");
    }
    println!("Result: {}", out.payload().msg);

    // Other animals share `Death` but not each other's sounds.
    let duck = Duck {
        events: Emitter::named("duck"),
    };
    let lizard = Lizard {
        events: Emitter::named("lizard"),
    };
    duck.events.on(Quack, |msg| {
        println!("Duck says {msg}");
        Ok(Flow::Pass)
    });
    duck.events.emit(Quack, "Quack!".to_string()).await?;

    for (name, count) in [
        ("dog", dog.events.listener_count(Death)),
        ("duck", duck.events.listener_count(Death)),
        ("lizard", lizard.events.listener_count(Death)),
    ] {
        println!("{name}: {count} death listener(s)");
    }

    let death = dog.events.wait(Death);
    dog.die().await?;
    death.await?;
    println!("The dog is gone");
    Ok(())
}
