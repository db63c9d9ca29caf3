//! # Test Doubles
//!
//! Utilities for running the office without touching the file system or the
//! real scheduler limits.
//!
//! - [`MemoryLog`]: an in-memory event log sink you can read back, optionally
//!   failing once it holds a given number of lines.
//! - [`ScriptedEnv`]: a seeded environment whose service choices follow a
//!   script.
//! - [`LimitedSpawner`]: a spawner that fails once its capacity is used up,
//!   standing in for resource exhaustion.
//!
//! ```ignore
//! let log = MemoryLog::new();
//! let env = ScriptedEnv::new(7, [ServiceKind::Mail, ServiceKind::Money]);
//! let spawner = LimitedSpawner::new(3);
//! let report = OfficeSystem::new(config, env, spawner).run(log.clone()).await?;
//! let audit = LogAudit::check(&log.lines()?)?;
//! ```

use crate::framework::env::{Environment, SeededEnv};
use crate::framework::spawner::{ActorHandle, ActorTask, SpawnError, Spawner, TokioSpawner};
use crate::model::{ActorRef, LogLine, ParseLineError, ServiceKind};
use std::collections::VecDeque;
use std::future::Future;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

// =============================================================================
// LOG SINK
// =============================================================================

/// Clonable in-memory sink. All clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    buffer: Arc<Mutex<Vec<u8>>>,
    line_limit: Option<usize>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that accepts `lines` complete lines, then fails every write.
    pub fn failing_after(lines: usize) -> Self {
        Self {
            line_limit: Some(lines),
            ..Self::default()
        }
    }

    /// Everything written so far.
    pub fn text(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Written lines parsed back into [`LogLine`]s.
    pub fn lines(&self) -> Result<Vec<LogLine>, ParseLineError> {
        self.text().lines().map(str::parse).collect()
    }
}

impl Write for MemoryLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(limit) = self.line_limit {
            if buffer.iter().filter(|byte| **byte == b'\n').count() >= limit {
                return Err(io::Error::new(io::ErrorKind::WriteZero, "log sink full"));
            }
        }
        buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Seeded environment whose service choices are taken from a script.
///
/// Once the script runs out, choices fall back to the seeded RNG. Delays
/// always come from the seeded RNG.
#[derive(Debug, Clone)]
pub struct ScriptedEnv {
    inner: SeededEnv,
    services: Arc<Mutex<VecDeque<ServiceKind>>>,
}

impl ScriptedEnv {
    pub fn new(seed: u64, services: impl IntoIterator<Item = ServiceKind>) -> Self {
        Self {
            inner: SeededEnv::new(seed),
            services: Arc::new(Mutex::new(services.into_iter().collect())),
        }
    }
}

impl Environment for ScriptedEnv {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        self.inner.sleep(duration)
    }

    fn random_in(&self, low: u64, high: u64) -> u64 {
        self.inner.random_in(low, high)
    }

    fn choose_service(&self) -> ServiceKind {
        let scripted = self
            .services
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        scripted.unwrap_or_else(|| self.inner.choose_service())
    }
}

// =============================================================================
// SPAWNER
// =============================================================================

/// Spawns at most `limit` actors, then fails with [`SpawnError::Exhausted`].
#[derive(Debug)]
pub struct LimitedSpawner {
    inner: TokioSpawner,
    limit: usize,
    spawned: AtomicUsize,
}

impl LimitedSpawner {
    pub fn new(limit: usize) -> Self {
        Self {
            inner: TokioSpawner,
            limit,
            spawned: AtomicUsize::new(0),
        }
    }

    pub fn spawned(&self) -> usize {
        self.spawned.load(Ordering::SeqCst).min(self.limit)
    }
}

impl Spawner for LimitedSpawner {
    fn spawn(&self, actor: ActorRef, task: ActorTask) -> Result<ActorHandle, SpawnError> {
        if self.spawned.fetch_add(1, Ordering::SeqCst) >= self.limit {
            return Err(SpawnError::Exhausted {
                actor,
                limit: self.limit,
            });
        }
        self.inner.spawn(actor, task)
    }
}
