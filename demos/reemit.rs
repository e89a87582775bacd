//! # Example: reemit
//!
//! Demonstrates bridging a child emitter into its parent with [`Emitter::reemit`].
//!
//! The child's `Foo` is re-emitted as the parent's `Bar` and vice versa; payload
//! types must line up.
//!
//! ## Run
//! ```bash
//! cargo run --example reemit
//! ```

use mutevents::{Emitter, Flow};
use tracing_subscriber::EnvFilter;

mutevents::event! {
    pub Foo => String;
    pub Bar => String;
}

mutevents::schema! {
    pub ParentEvents { Foo, Bar }
}
mutevents::schema! {
    pub ChildEvents { Foo, Bar }
}

struct Parent {
    events: Emitter<ParentEvents>,
    child: Emitter<ChildEvents>,
}

impl Parent {
    fn new() -> Self {
        let events = Emitter::named("parent");
        let child = Emitter::named("child");

        child.attach(Foo, &events.reemit(Bar));
        child.attach(Bar, &events.reemit(Foo));

        Self { events, child }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let parent = Parent::new();

    parent.events.on(Foo, |text| {
        println!("Foo {text}");
        Ok(Flow::Pass)
    });
    parent.events.on(Bar, |text| {
        eprintln!("Bar {text}");
        Ok(Flow::Pass)
    });

    parent.child.emit(Bar, "It works!".to_string()).await?;
    parent.child.emit(Foo, "It works too".to_string()).await?;
    Ok(())
}
