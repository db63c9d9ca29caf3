//! Environment abstraction for delays and randomness.
//!
//! Actors never call the clock or an RNG directly. Everything that makes a
//! run nondeterministic goes through [`Environment`], so a seeded environment
//! replays the same service choices and delay lengths.
//!
//! # Invariants
//!
//! - `random_in(low, high)` returns a value in `low..=high`
//! - `sleep` only suspends the calling actor

use crate::model::ServiceKind;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Time and randomness as seen by actors.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Suspends the caller for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;

    /// Uniform value in `low..=high`. Callers guarantee `low <= high`.
    fn random_in(&self, low: u64, high: u64) -> u64;

    /// Uniform choice among the three services.
    fn choose_service(&self) -> ServiceKind {
        ServiceKind::ALL[self.random_in(0, 2) as usize]
    }

    /// Random whole-millisecond duration in `[min, max]`.
    fn random_duration(&self, min: Duration, max: Duration) -> Duration {
        let low = min.as_millis() as u64;
        let high = (max.as_millis() as u64).max(low);
        Duration::from_millis(self.random_in(low, high))
    }

    /// Sleeps a random duration in `[0, max]`.
    fn sleep_up_to(&self, max: Duration) -> impl Future<Output = ()> + Send {
        self.sleep(self.random_duration(Duration::ZERO, max))
    }
}

/// Production environment: tokio timers and the thread-local RNG.
#[derive(Debug, Clone, Default)]
pub struct SystemEnv;

impl SystemEnv {
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }

    fn random_in(&self, low: u64, high: u64) -> u64 {
        rand::thread_rng().gen_range(low..=high)
    }
}

/// Reproducible environment driven by a ChaCha RNG.
///
/// All clones share one generator, so the sequence of draws is fixed by the
/// seed and by the order in which actors draw.
#[derive(Debug, Clone)]
pub struct SeededEnv {
    seed: u64,
    rng: Arc<Mutex<ChaCha8Rng>>,
}

impl SeededEnv {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Environment for SeededEnv {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }

    fn random_in(&self, low: u64, high: u64) -> u64 {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_range(low..=high)
    }
}
