//! # Example: bingo
//!
//! Demonstrates independent waits on different events of one emitter.
//!
//! A producer emits one of three numbers every 200ms; three waiters each finish
//! when their number shows up. The program ends once all three have.
//!
//! ## Run
//! ```bash
//! cargo run --example bingo
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use mutevents::Emitter;
use tracing_subscriber::EnvFilter;

mutevents::event! {
    pub One => ();
    pub Two => ();
    pub Three => ();
}

mutevents::schema! {
    pub Numbers { One, Two, Three }
}

/// Cheap pseudo-random pick; good enough for a demo.
fn pick(round: u64) -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(round);
    (nanos ^ round.wrapping_mul(0x9E37_79B9)) % 3 + 1
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let bingo = Emitter::<Numbers>::named("bingo");

    let one = bingo.wait(One);
    let two = bingo.wait(Two);
    let three = bingo.wait(Three);

    let producer = {
        let bingo = bingo.clone();
        tokio::spawn(async move {
            for round in 0.. {
                tokio::time::sleep(Duration::from_millis(200)).await;
                let n = pick(round);
                let res = match n {
                    1 => bingo.emit(One, ()).await,
                    2 => bingo.emit(Two, ()).await,
                    _ => bingo.emit(Three, ()).await,
                };
                if let Err(err) = res {
                    tracing::warn!(error = %err, "emit failed");
                }
                println!("Emitted {n}");
            }
        })
    };

    let (a, b, c) = tokio::join!(
        async {
            one.await?;
            println!("Bingo! Got 1");
            anyhow::Ok(())
        },
        async {
            two.await?;
            println!("Bingo! Got 2");
            anyhow::Ok(())
        },
        async {
            three.await?;
            println!("Bingo! Got 3");
            anyhow::Ok(())
        },
    );
    producer.abort();
    a?;
    b?;
    c?;
    Ok(())
}
