//! [`OfficeActor`] implementation for [`Worker`].

use super::Worker;
use crate::config::MAX_SERVICE_MS;
use crate::framework::{ActorContext, ActorError, Environment, OfficeActor};
use crate::model::{ActorRef, Event};
use crate::office::OfficeError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

#[async_trait]
impl<E: Environment> OfficeActor<E> for Worker {
    fn identity(&self) -> ActorRef {
        ActorRef::worker(self.id)
    }

    async fn run(self, ctx: ActorContext<E>) -> Result<(), ActorError> {
        let me = OfficeActor::<E>::identity(&self);
        let ActorContext { office, env } = ctx;

        office.emit(me, Event::Started).await?;

        loop {
            if office.is_aborted() {
                return Err(OfficeError::Aborted.into());
            }

            let called = {
                let mut queues = office.queues().await;
                match queues.first_waiting() {
                    Some(kind) => {
                        office.emit(me, Event::Serving(kind)).await?;
                        queues.call_next(kind)?;
                        Some(kind)
                    }
                    None => None,
                }
            };

            if let Some(kind) = called {
                debug!(%kind, "serving");
                env.sleep_up_to(Duration::from_millis(MAX_SERVICE_MS)).await;
                office.emit(me, Event::ServiceFinished).await?;
                continue;
            }

            let door = office.door().await;
            if door.is_open() {
                office.emit(me, Event::TakingBreak).await?;
                drop(door);
                env.sleep_up_to(self.max_break).await;
                office.emit(me, Event::BreakFinished).await?;
                // A zero-length break must still let other actors run.
                tokio::task::yield_now().await;
                continue;
            }

            if office.queues().await.total_waiting() > 0 {
                debug!("office closed but customers still waiting");
                continue;
            }

            office.emit(me, Event::GoingHome).await?;
            return Ok(());
        }
    }
}
