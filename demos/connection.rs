//! # Example: connection
//!
//! Demonstrates racing a [`Wait`](mutevents::Wait) against a [`Failure`](mutevents::Failure).
//!
//! Shows how to:
//! - Read the next `Message` unless `Close` fires first.
//! - Bound a request with [`tokio::time::timeout`].
//! - Rely on drop to detach the losing side of each race.
//!
//! ## Flow
//! ```text
//! read()    ─► select { wait(Message), error(Close) }
//! request() ─► write() ─► timeout(1s, select { wait(Message), error(Close) })
//!
//! peer: Message("Hello!") ─► 100ms ─► Close("Closed!")
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example connection
//! ```

use std::time::Duration;

use anyhow::{anyhow, bail};
use mutevents::Emitter;
use tracing_subscriber::EnvFilter;

mutevents::event! {
    pub Message => String;
    pub Close => String;
}

mutevents::schema! {
    pub ConnectionEvents { Message, Close }
}

#[derive(Clone)]
struct Connection {
    events: Emitter<ConnectionEvents>,
}

impl Connection {
    fn new() -> Self {
        Self {
            events: Emitter::named("connection"),
        }
    }

    async fn on_message(&self, message: &str) -> anyhow::Result<()> {
        self.events.emit(Message, message.to_string()).await?;
        Ok(())
    }

    async fn on_close(&self, reason: &str) -> anyhow::Result<()> {
        self.events.emit(Close, reason.to_string()).await?;
        Ok(())
    }

    /// Next message, or an error if the connection closes first.
    async fn read(&self) -> anyhow::Result<String> {
        let message = self.events.wait(Message);
        let close = self.events.error(Close);

        tokio::select! {
            res = message => Ok(res?),
            res = close => match res {
                Err(err) => {
                    let label = err.to_string();
                    bail!("{label}: {}", err.into_payload().unwrap_or_default())
                }
                Ok(never) => match never {},
            },
        }
    }

    /// Simulated peer answering after a delay.
    fn write(&self, message: &str) {
        println!("Sent: {message}");
        let conn = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            if let Err(err) = conn.on_message("I'm fine").await {
                tracing::warn!(error = %err, "peer failed to answer");
            }
        });
    }

    async fn request(&self, request: &str) -> anyhow::Result<String> {
        let response = self.read();
        self.write(request);

        tokio::time::timeout(Duration::from_secs(1), response)
            .await
            .map_err(|_| anyhow!("request timed out"))?
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let conn = Connection::new();

    let receiver = {
        let conn = conn.clone();
        tokio::spawn(async move {
            let first = conn.read().await?;
            println!("Received: {first}");

            let second = conn.request("How are you?").await?;
            println!("Received: {second}");
            anyhow::Ok(())
        })
    };
    tokio::task::yield_now().await;

    // Swap the delay or the order of these to see other outcomes.
    conn.on_message("Hello!").await?;
    tokio::time::sleep(Duration::from_millis(100)).await;
    conn.on_close("Closed!").await?;

    if let Err(err) = receiver.await? {
        eprintln!("{err}");
    }
    Ok(())
}
