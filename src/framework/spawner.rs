//! Turning actors into independently scheduled tasks.
//!
//! The orchestrator only sees the [`Spawner`] seam, so tests can substitute a
//! spawner that runs out of capacity.

use crate::framework::core::ActorError;
use crate::model::ActorRef;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{info_span, Instrument};

/// Boxed body of an actor, ready to be scheduled.
pub type ActorTask = Pin<Box<dyn Future<Output = Result<(), ActorError>> + Send + 'static>>;

/// Errors raised when an actor cannot be started.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SpawnError {
    #[error("no runtime available to spawn {actor}: {reason}")]
    NoRuntime { actor: ActorRef, reason: String },

    #[error("actor capacity of {limit} exhausted, cannot spawn {actor}")]
    Exhausted { actor: ActorRef, limit: usize },
}

/// Handle to a running actor.
#[derive(Debug)]
pub struct ActorHandle {
    actor: ActorRef,
    task: JoinHandle<Result<(), ActorError>>,
}

impl ActorHandle {
    pub fn new(actor: ActorRef, task: JoinHandle<Result<(), ActorError>>) -> Self {
        Self { actor, task }
    }

    pub fn actor(&self) -> ActorRef {
        self.actor
    }

    /// Waits for the actor to terminate and reports how it ended.
    pub async fn join(self) -> Result<(), ActorError> {
        match self.task.await {
            Ok(result) => result,
            Err(err) => Err(ActorError::Aborted(err.to_string())),
        }
    }
}

/// Starts actors as independent tasks.
pub trait Spawner: Send + Sync {
    fn spawn(&self, actor: ActorRef, task: ActorTask) -> Result<ActorHandle, SpawnError>;
}

/// Spawns onto the current tokio runtime. Each actor runs inside an
/// `actor` span carrying its role and id.
#[derive(Debug, Clone, Default)]
pub struct TokioSpawner;

impl Spawner for TokioSpawner {
    fn spawn(&self, actor: ActorRef, task: ActorTask) -> Result<ActorHandle, SpawnError> {
        let runtime = Handle::try_current().map_err(|err| SpawnError::NoRuntime {
            actor,
            reason: err.to_string(),
        })?;
        let span = info_span!("actor", role = %actor.role.tag(), id = actor.id);
        Ok(ActorHandle::new(actor, runtime.spawn(task.instrument(span))))
    }
}
