//! # Observability & Tracing
//!
//! Diagnostics go through `tracing` and are written to **stderr**. The event
//! log is a separate artifact written by the [`Office`](crate::office::Office);
//! the two never share a stream.
//!
//! ## What Gets Traced
//!
//! - **Lifecycle**: opening, closing, release, final counts (`info`)
//! - **Protocol steps**: every emitted line with its sequence number, queue
//!   decisions, customers turned away (`debug`)
//! - **Failures**: spawn failures, actors that ended with an error, teardown
//!   problems (`warn` / `error`)
//!
//! Each actor runs inside an `actor` span with its role tag and id, so a
//! debug line reads like:
//!
//! ```text
//! DEBUG actor{role=Z id=3}: emitted seq=14 actor=Z 3 event=called by office worker
//! ```
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=debug post-office 5 2 100 10 500
//! post-office 5 2 100 10 500 --log-level info
//! ```
//!
//! `RUST_LOG` wins over `--log-level` when both are present.

use tracing_subscriber::EnvFilter;

/// Initializes the global subscriber.
///
/// `default_level` is used when `RUST_LOG` is unset or unparsable.
pub fn setup_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
