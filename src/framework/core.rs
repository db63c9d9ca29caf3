//! # Core Actor Abstractions
//!
//! - [`OfficeActor`]: the trait both roles implement.
//! - [`ActorContext`]: the shared office plus the environment, injected at
//!   spawn time.
//! - [`ActorError`]: why an actor stopped early.

use crate::framework::env::Environment;
use crate::model::ActorRef;
use crate::office::{Office, OfficeError};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors that end an actor before it could go home.
#[derive(Debug, Error)]
pub enum ActorError {
    #[error(transparent)]
    Office(#[from] OfficeError),

    /// The actor's task panicked or was cancelled.
    #[error("actor task aborted: {0}")]
    Aborted(String),
}

/// Everything an actor may touch while running.
///
/// Built once by the orchestrator; each actor gets its own clone sharing the
/// same [`Office`].
#[derive(Clone)]
pub struct ActorContext<E: Environment> {
    pub office: Arc<Office>,
    pub env: E,
}

impl<E: Environment> ActorContext<E> {
    pub fn new(office: Arc<Office>, env: E) -> Self {
        Self { office, env }
    }
}

/// A role played by one independent actor in the office.
///
/// `run` drives the actor from its first event to its last and consumes the
/// actor. Returning `Ok(())` means the actor emitted `going home`.
#[async_trait]
pub trait OfficeActor<E: Environment>: Send + Sized + 'static {
    fn identity(&self) -> ActorRef;

    async fn run(self, ctx: ActorContext<E>) -> Result<(), ActorError>;
}
