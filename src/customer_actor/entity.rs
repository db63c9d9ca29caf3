//! [`OfficeActor`] implementation for [`Customer`].

use super::Customer;
use crate::config::MAX_SERVICE_MS;
use crate::framework::{ActorContext, ActorError, Environment, OfficeActor};
use crate::model::{ActorRef, Event};
use crate::office::OfficeError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

#[async_trait]
impl<E: Environment> OfficeActor<E> for Customer {
    fn identity(&self) -> ActorRef {
        ActorRef::customer(self.id)
    }

    async fn run(self, ctx: ActorContext<E>) -> Result<(), ActorError> {
        let me = OfficeActor::<E>::identity(&self);
        let ActorContext { office, env } = ctx;

        office.emit(me, Event::Started).await?;
        env.sleep_up_to(self.max_arrival_delay).await;
        if office.is_aborted() {
            return Err(OfficeError::Aborted.into());
        }

        let kind = {
            let door = office.door().await;
            if !door.is_open() {
                office.emit(me, Event::GoingHome).await?;
                debug!("turned away at the door");
                return Ok(());
            }
            let kind = env.choose_service();
            office.emit(me, Event::Entering(kind)).await?;
            office.queues().await.join(kind);
            kind
        };

        debug!(%kind, "waiting to be called");
        office.await_call(kind).await?;
        office.emit(me, Event::CalledByWorker).await?;

        env.sleep_up_to(Duration::from_millis(MAX_SERVICE_MS)).await;
        office.emit(me, Event::GoingHome).await?;
        Ok(())
    }
}
