use post_office::customer_actor;
use post_office::framework::mock::{MemoryLog, ScriptedEnv};
use post_office::framework::{ActorContext, OfficeActor};
use post_office::model::{Event, ServiceKind};
use post_office::office::Office;
use std::sync::Arc;
use std::time::Duration;

fn context(log: &MemoryLog, services: &[ServiceKind]) -> ActorContext<ScriptedEnv> {
    let office = Arc::new(Office::new(log.clone()));
    ActorContext::new(office, ScriptedEnv::new(1, services.iter().copied()))
}

/// A customer arriving at a closed office is turned away at the door.
#[tokio::test(start_paused = true)]
async fn test_turned_away_when_closed() {
    let log = MemoryLog::new();
    let ctx = context(&log, &[]);
    ctx.office.door().await.close();

    customer_actor::new(1, Duration::from_millis(100))
        .run(ctx.clone())
        .await
        .unwrap();

    let events: Vec<Event> = log.lines().unwrap().iter().map(|l| l.event).collect();
    assert_eq!(events, [Event::Started, Event::GoingHome]);
    assert_eq!(ctx.office.queues().await.total_waiting(), 0);
}

/// An admitted customer stays in its queue until a worker calls it.
#[tokio::test(start_paused = true)]
async fn test_waits_until_called() {
    let log = MemoryLog::new();
    let ctx = context(&log, &[ServiceKind::Package]);
    let office = ctx.office.clone();

    let customer = tokio::spawn(customer_actor::new(7, Duration::ZERO).run(ctx));

    while office.queues().await.waiting(ServiceKind::Package) == 0 {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!customer.is_finished());
    assert!(!log.text().contains("called by office worker"));

    office.queues().await.call_next(ServiceKind::Package).unwrap();
    customer.await.unwrap().unwrap();

    assert_eq!(
        log.text(),
        "1: Z 7: started\n\
         2: Z 7: entering office for a service 2\n\
         3: Z 7: called by office worker\n\
         4: Z 7: going home\n"
    );
    Office::release_shared(office).unwrap();
}

/// Closing the door after a customer entered does not strand it.
#[tokio::test(start_paused = true)]
async fn test_admitted_customer_survives_closing() {
    let log = MemoryLog::new();
    let ctx = context(&log, &[ServiceKind::Mail]);
    let office = ctx.office.clone();

    let customer = tokio::spawn(customer_actor::new(2, Duration::ZERO).run(ctx));
    while office.queues().await.total_waiting() == 0 {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    office.door().await.close();
    office.queues().await.call_next(ServiceKind::Mail).unwrap();
    customer.await.unwrap().unwrap();

    assert!(log.text().ends_with("Z 2: going home\n"));
}
