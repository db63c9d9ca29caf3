//! # The Shared Office Region
//!
//! [`Office`] is the only state shared between actors. It holds the open
//! flag, the three queue lengths, the event sequence counter and the three
//! per-service gates, and exposes them only through guarded accessors:
//!
//! | state            | lock / primitive        | accessor                       |
//! |------------------|-------------------------|--------------------------------|
//! | sequence + sink  | log lock                | [`Office::emit`]               |
//! | open flag        | door lock               | [`Office::door`] → [`Door`]    |
//! | queue lengths    | queue lock              | [`Office::queues`] → [`Queues`]|
//! | service gates    | one semaphore per kind  | [`Queues::call_next`], [`Office::await_call`] |
//!
//! A guard is the proof that its lock is held, so every read-modify-write of a
//! counter happens inside one lock hold.
//!
//! ## Lock Order
//!
//! door → queues → log. The log lock is always innermost and the door lock
//! is never taken while the queue lock is held.
//!
//! ## Gates
//!
//! Each gate is a [`Semaphore`] starting at zero permits. A worker adds one
//! permit per call and a waiting customer consumes it. Tokio's semaphore wakes
//! waiters in FIFO order, so the first customer to block is the first served.
//!
//! ## Aborting
//!
//! [`Office::abort`] closes every gate, so customers blocked on a call wake
//! up with [`OfficeError::GateClosed`], and raises a flag the actors check
//! before their next step. Queue lengths are left as they are; teardown
//! reports them.

mod error;
mod log;

pub use error::*;

use crate::model::{ActorRef, Event, ServiceKind};
use self::log::EventLog;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, Notify, Semaphore};
use tracing::{debug, info, warn};

/// Lifecycle of the office. Only ever moves from `Open` to `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfficeState {
    Open,
    Closed,
}

/// Shared region for one simulation run.
pub struct Office {
    log: Mutex<EventLog>,
    door: Mutex<OfficeState>,
    queues: Mutex<[u32; 3]>,
    gates: [Semaphore; 3],
    aborted: AtomicBool,
    abort_signal: Notify,
}

impl Office {
    /// Creates an open office with empty queues whose event log writes to `sink`.
    pub fn new(sink: impl Write + Send + 'static) -> Self {
        Self {
            log: Mutex::new(EventLog::new(Box::new(sink))),
            door: Mutex::new(OfficeState::Open),
            queues: Mutex::new([0; 3]),
            gates: [Semaphore::new(0), Semaphore::new(0), Semaphore::new(0)],
            aborted: AtomicBool::new(false),
            abort_signal: Notify::new(),
        }
    }

    /// Appends one actor event to the log and returns its sequence number.
    pub async fn emit(&self, actor: ActorRef, event: Event) -> Result<u64, OfficeError> {
        let line = self.log.lock().await.append(Some(actor), event)?;
        debug!(seq = line.seq, %actor, %event, "emitted");
        Ok(line.seq)
    }

    /// Appends the orchestrator's untagged `closing` line.
    pub async fn emit_closing(&self) -> Result<u64, OfficeError> {
        let line = self.log.lock().await.append(None, Event::Closing)?;
        debug!(seq = line.seq, "emitted closing");
        Ok(line.seq)
    }

    /// Number of events written so far.
    pub async fn events_emitted(&self) -> u64 {
        self.log.lock().await.emitted()
    }

    /// Takes the door lock.
    pub async fn door(&self) -> Door<'_> {
        Door {
            state: self.door.lock().await,
        }
    }

    /// Takes the queue lock.
    pub async fn queues(&self) -> Queues<'_> {
        Queues {
            lengths: self.queues.lock().await,
            gates: &self.gates,
        }
    }

    /// Blocks until a worker calls the next customer of `kind`.
    ///
    /// The caller must already be counted in that queue through
    /// [`Queues::join`], otherwise no worker will ever signal it.
    pub async fn await_call(&self, kind: ServiceKind) -> Result<(), OfficeError> {
        let permit = self.gates[kind.index()]
            .acquire()
            .await
            .map_err(|_| OfficeError::GateClosed(kind))?;
        permit.forget();
        Ok(())
    }

    /// Aborts the run: closes every gate and wakes whoever waits in
    /// [`Office::aborted`]. Returns `false` if the run was already aborted.
    pub fn abort(&self) -> bool {
        if self.aborted.swap(true, Ordering::SeqCst) {
            return false;
        }
        for gate in &self.gates {
            gate.close();
        }
        self.abort_signal.notify_waiters();
        warn!("office run aborted");
        true
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }

    /// Completes once the run has been aborted.
    pub async fn aborted(&self) {
        let notified = self.abort_signal.notified();
        if self.is_aborted() {
            return;
        }
        notified.await;
    }

    /// Tears down a region that may still be shared.
    ///
    /// Fails with [`ResourceError::StillShared`] if any actor still holds a
    /// reference, which means it has not terminated.
    pub fn release_shared(office: Arc<Office>) -> Result<u64, ResourceError> {
        match Arc::try_unwrap(office) {
            Ok(office) => office.release(),
            Err(shared) => Err(ResourceError::StillShared {
                holders: Arc::strong_count(&shared) - 1,
            }),
        }
    }

    /// Closes the gates and flushes the log. Returns the number of events.
    ///
    /// Every step runs even after an earlier one failed; the first failure
    /// is reported.
    pub fn release(self) -> Result<u64, ResourceError> {
        let mut failure = None;

        let lengths = self.queues.into_inner();
        for kind in ServiceKind::ALL {
            let waiting = lengths[kind.index()];
            if waiting != 0 {
                warn!(%kind, waiting, "customers stranded at teardown");
                failure.get_or_insert(ResourceError::StrandedCustomers { kind, waiting });
            }
        }

        for kind in ServiceKind::ALL {
            let gate = &self.gates[kind.index()];
            let permits = gate.available_permits();
            gate.close();
            if permits != 0 {
                warn!(%kind, permits, "unclaimed signals at teardown");
                failure.get_or_insert(ResourceError::UnclaimedSignal { kind, permits });
            }
        }

        let flushed = self.log.into_inner().finish().map_err(ResourceError::Flush);

        match (failure, flushed) {
            (Some(err), _) => Err(err),
            (None, Err(err)) => Err(err),
            (None, Ok(events)) => {
                info!(events, "office released");
                Ok(events)
            }
        }
    }
}

/// Proof that the door lock is held.
pub struct Door<'a> {
    state: MutexGuard<'a, OfficeState>,
}

impl Door<'_> {
    pub fn state(&self) -> OfficeState {
        *self.state
    }

    pub fn is_open(&self) -> bool {
        *self.state == OfficeState::Open
    }

    /// Moves the office to `Closed`. Returns `false` if it already was.
    pub fn close(&mut self) -> bool {
        let transitioned = *self.state == OfficeState::Open;
        *self.state = OfficeState::Closed;
        transitioned
    }
}

/// Proof that the queue lock is held.
pub struct Queues<'a> {
    lengths: MutexGuard<'a, [u32; 3]>,
    gates: &'a [Semaphore; 3],
}

impl Queues<'_> {
    pub fn waiting(&self, kind: ServiceKind) -> u32 {
        self.lengths[kind.index()]
    }

    pub fn total_waiting(&self) -> u32 {
        self.lengths.iter().sum()
    }

    /// First non-empty queue in priority order (mail, package, money).
    pub fn first_waiting(&self) -> Option<ServiceKind> {
        ServiceKind::ALL.into_iter().find(|kind| self.waiting(*kind) > 0)
    }

    /// Counts the caller into the queue for `kind`.
    pub fn join(&mut self, kind: ServiceKind) {
        self.lengths[kind.index()] += 1;
    }

    /// Removes the head of the queue for `kind` and wakes exactly one
    /// customer blocked on that gate.
    pub fn call_next(&mut self, kind: ServiceKind) -> Result<(), OfficeError> {
        let waiting = &mut self.lengths[kind.index()];
        if *waiting == 0 {
            return Err(OfficeError::QueueUnderflow(kind));
        }
        *waiting -= 1;
        self.gates[kind.index()].add_permits(1);
        Ok(())
    }
}
