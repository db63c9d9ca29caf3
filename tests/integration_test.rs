use post_office::audit::LogAudit;
use post_office::config::OfficeConfig;
use post_office::framework::mock::{LimitedSpawner, MemoryLog, ScriptedEnv};
use post_office::framework::{SeededEnv, SystemEnv, TokioSpawner};
use post_office::lifecycle::{create_output, OfficeSystem};
use post_office::model::{Event, Role, ServiceKind};
use std::collections::BTreeSet;
use std::time::Duration;

/// Full end-to-end run with no customers: the only worker rests until the
/// office closes, then goes home.
#[tokio::test(start_paused = true)]
async fn test_lonely_worker_rests_until_closing() {
    let config = OfficeConfig::new(0, 1, 0, 20, 200).unwrap();
    let log = MemoryLog::new();

    let report = OfficeSystem::new(config, SeededEnv::new(3), TokioSpawner)
        .run(log.clone())
        .await
        .expect("run failed");

    assert_eq!(report.exit_code(), 0);
    let lines = log.lines().unwrap();
    assert!(lines.iter().all(|l| l.actor.map_or(true, |a| a.role == Role::Worker)));

    let worker_events: Vec<Event> = lines.iter().filter(|l| l.actor.is_some()).map(|l| l.event).collect();
    assert_eq!(worker_events.first(), Some(&Event::Started));
    assert_eq!(worker_events.last(), Some(&Event::GoingHome));
    for pair in worker_events[1..worker_events.len() - 1].chunks(2) {
        assert_eq!(pair, [Event::TakingBreak, Event::BreakFinished]);
    }

    let closing = lines.iter().position(|l| l.event == Event::Closing).unwrap();
    let home = lines.iter().position(|l| l.event == Event::GoingHome).unwrap();
    assert!(closing < home, "worker left before closing");

    let summary = LogAudit::check(&lines).unwrap();
    assert_eq!(summary.events, report.events);
}

/// Three customers wanting three different services, all arriving long
/// before closing, are served by a single worker.
#[tokio::test(start_paused = true)]
async fn test_single_worker_serves_every_service() {
    let config = OfficeConfig::new(3, 1, 10, 100, 1_000).unwrap();
    let env = ScriptedEnv::new(11, [ServiceKind::Money, ServiceKind::Mail, ServiceKind::Package]);
    let log = MemoryLog::new();

    let report = OfficeSystem::new(config, env, TokioSpawner)
        .run(log.clone())
        .await
        .expect("run failed");
    assert!(report.is_success());

    let lines = log.lines().unwrap();
    let served: BTreeSet<ServiceKind> = lines
        .iter()
        .filter_map(|l| match l.event {
            Event::Serving(kind) => Some(kind),
            _ => None,
        })
        .collect();
    assert_eq!(served, BTreeSet::from(ServiceKind::ALL));

    // Every serving line is followed by that worker's `service finished`.
    let worker: Vec<Event> = lines
        .iter()
        .filter(|l| l.actor.map_or(false, |a| a.role == Role::Worker))
        .map(|l| l.event)
        .collect();
    for (i, event) in worker.iter().enumerate() {
        if matches!(event, Event::Serving(_)) {
            assert_eq!(worker[i + 1], Event::ServiceFinished);
        }
    }

    // All three were called before the door closed.
    let closing = lines.iter().position(|l| l.event == Event::Closing).unwrap();
    let called = lines.iter().filter(|l| l.event == Event::CalledByWorker).count();
    let called_before = lines[..closing]
        .iter()
        .filter(|l| l.event == Event::CalledByWorker)
        .count();
    assert_eq!(called, 3);
    assert_eq!(called_before, 3);

    let summary = LogAudit::check(&lines).unwrap();
    assert_eq!(summary.served, [1, 1, 1]);
    assert_eq!(summary.turned_away, 0);
}

/// A worker that cannot be spawned stops the population. The actors that
/// did start still finish and the log stays gapless.
#[tokio::test(start_paused = true)]
async fn test_worker_spawn_failure_exits_with_failure() {
    let config = OfficeConfig::new(4, 2, 10, 10, 500).unwrap();
    let log = MemoryLog::new();

    let report = OfficeSystem::new(config, SeededEnv::new(5), LimitedSpawner::new(1))
        .run(log.clone())
        .await
        .expect("run failed");

    assert_eq!(report.exit_code(), 1);
    assert!(report.spawn_error.is_some());
    assert_eq!(report.workers_spawned, 1);
    assert_eq!(report.customers_spawned, 0);

    let summary = LogAudit::check(&log.lines().unwrap()).unwrap();
    assert_eq!(summary.workers, 1);
    assert_eq!(summary.customers, 0);
}

/// Customers that got spawned before capacity ran out are drained.
#[tokio::test(start_paused = true)]
async fn test_customer_spawn_failure_drains_started_customers() {
    let config = OfficeConfig::new(6, 1, 5, 10, 500).unwrap();
    let log = MemoryLog::new();
    let spawner = LimitedSpawner::new(3);

    let report = OfficeSystem::new(config, SeededEnv::new(9), spawner)
        .run(log.clone())
        .await
        .expect("run failed");

    assert_eq!(report.exit_code(), 1);
    assert_eq!(report.workers_spawned, 1);
    assert_eq!(report.customers_spawned, 2);

    let summary = LogAudit::check(&log.lines().unwrap()).unwrap();
    assert_eq!(summary.customers, 2);
    assert_eq!(summary.served_total() + summary.turned_away, 2);
}

/// A log that stops accepting lines makes some actor fail. The run must
/// still end, exit with failure and leave a gapless prefix behind, whichever
/// line the failure hits.
#[tokio::test(start_paused = true)]
async fn test_log_failure_aborts_the_run() {
    let mut released_waiting_customer = false;

    for limit in 1..=8 {
        let config = OfficeConfig::new(1, 1, 0, 10, 1_000).unwrap();
        let log = MemoryLog::failing_after(limit);

        let run = OfficeSystem::new(config, SeededEnv::new(1), TokioSpawner).run(log.clone());
        let report = tokio::time::timeout(Duration::from_secs(3_600), run)
            .await
            .unwrap_or_else(|_| panic!("run with a {limit}-line log never finished"))
            .expect("run failed");

        assert_eq!(report.exit_code(), 1, "limit {limit}: {report:?}");
        assert_eq!(report.events, limit as u64);

        let lines = log.lines().unwrap();
        assert_eq!(lines.len(), limit);
        for (index, line) in lines.iter().enumerate() {
            assert_eq!(line.seq, index as u64 + 1);
        }
        if !lines.iter().any(|l| l.event == Event::Closing) {
            assert!(report.closing_error.is_some(), "limit {limit}: closing failure not reported");
        }

        released_waiting_customer |= report
            .actor_errors
            .iter()
            .any(|(actor, err)| actor.role == Role::Customer && err.contains("closed while a customer was waiting"));
    }

    assert!(released_waiting_customer);
}

/// Real clock, real thread pool: many customers, several workers.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_crowded_office_on_thread_pool() {
    let config = OfficeConfig::new(60, 3, 20, 5, 80).unwrap();
    let log = MemoryLog::new();

    let report = OfficeSystem::new(config, SystemEnv::new(), TokioSpawner)
        .run(log.clone())
        .await
        .expect("run failed");

    assert!(report.is_success(), "{report:?}");
    let summary = LogAudit::check(&log.lines().unwrap()).unwrap();
    assert_eq!(summary.customers, 60);
    assert_eq!(summary.workers, 3);
    assert_eq!(summary.served_total() + summary.turned_away, 60);
    assert_eq!(summary.events, report.events);
}

/// Zero-length breaks and an immediate close on the real clock.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_zero_delays_terminate() {
    let config = OfficeConfig::new(5, 2, 0, 0, 0).unwrap();
    let log = MemoryLog::new();

    let report = OfficeSystem::new(config, SystemEnv::new(), TokioSpawner)
        .run(log.clone())
        .await
        .expect("run failed");

    assert!(report.is_success());
    LogAudit::check(&log.lines().unwrap()).unwrap();
}

/// The log file on disk is the same well-formed artifact.
#[tokio::test(start_paused = true)]
async fn test_writes_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("proj2.out");
    std::fs::write(&path, "stale contents\n").unwrap();
    let config = OfficeConfig::new(4, 2, 50, 10, 100).unwrap();

    let report = OfficeSystem::new(config, SeededEnv::new(21), TokioSpawner)
        .run(create_output(&path).unwrap())
        .await
        .expect("run failed");

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(!text.contains("stale"));
    assert_eq!(text.lines().count() as u64, report.events);
    let summary = LogAudit::from_text(&text).unwrap();
    assert_eq!(summary.customers, 4);
}
