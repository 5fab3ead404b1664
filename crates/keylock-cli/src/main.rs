//! Terminal front end for the Keylock door-lock controller.
//!
//! Runs the real scanner and controller tasks against a mock key matrix
//! and console-backed display/actuator. Keystrokes typed on stdin are
//! replayed as matrix taps, so every flow (unlock, settings, credential
//! changes, the locked state) can be exercised interactively.
//!
//! Set `KEYLOCK_DB=/path/to/keylock.db` to persist credentials in SQLite;
//! without it the session uses an in-memory store and starts from the
//! factory defaults every time. `RUST_LOG` controls log verbosity.

mod console;

use anyhow::Context;
use console::{ConsoleActuator, ConsoleDisplay};
use keylock_controller::{KeyMatrixScanner, LockController, key_position};
use keylock_core::constants::EVENT_QUEUE_CAPACITY;
use keylock_core::types::{Key, KeyEvent};
use keylock_hardware::mock::{MockMatrix, MockMatrixHandle};
use keylock_store::{CredentialStore, MemoryStore, SqliteStore, StoreConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!(version = keylock_core::VERSION, "Keylock starting");
    println!("Keys: 0-9 digits, A/B settings, C cancel, * delete, # confirm. Ctrl-D quits.");

    match std::env::var("KEYLOCK_DB") {
        Ok(path) => {
            info!(%path, "Using SQLite credential store");
            let store = SqliteStore::new(StoreConfig::new(&path))
                .await
                .with_context(|| format!("opening credential store at {path}"))?;
            run(store).await
        }
        Err(_) => {
            info!("KEYLOCK_DB not set, using in-memory credential store");
            run(MemoryStore::new()).await
        }
    }
}

async fn run<S: CredentialStore + 'static>(store: S) -> anyhow::Result<()> {
    let (matrix, matrix_handle) = MockMatrix::new();
    let (events_tx, events_rx) = mpsc::channel::<KeyEvent>(EVENT_QUEUE_CAPACITY);

    let controller = LockController::new(
        ConsoleDisplay::new(),
        ConsoleActuator::new(),
        store,
        events_rx,
    )
    .await
    .context("loading credential snapshot")?;

    tokio::spawn(KeyMatrixScanner::new(matrix, events_tx).run());
    let controller_task = tokio::spawn(controller.run());

    tokio::select! {
        result = stdin_bridge(matrix_handle) => {
            result?;
            info!("Stdin closed, shutting down");
        }
        result = controller_task => {
            result.context("controller task panicked")??;
        }
    }

    Ok(())
}

/// Replay stdin characters as taps on the mock matrix.
async fn stdin_bridge(matrix: MockMatrixHandle) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        for c in line.trim().chars() {
            let key = match Key::from_char(c.to_ascii_uppercase()) {
                Ok(key) => key,
                Err(_) => {
                    warn!(%c, "Not a keypad key, ignored");
                    continue;
                }
            };
            if let Some((row, col)) = key_position(key) {
                matrix.tap(row, col).await;
            }
        }
    }

    Ok(())
}
