use crate::config::{ConfigError, OfficeConfig};
use crate::framework::{
    ActorContext, ActorHandle, Environment, OfficeActor, SpawnError, Spawner,
};
use crate::model::ActorRef;
use crate::office::{Office, OfficeError, ResourceError};
use crate::{customer_actor, worker_actor};
use std::io::Write;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Fatal errors of a run, raised before the office exists. Everything that
/// fails later is recorded in the [`RunReport`] instead.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("shared resource failure: {0}")]
    Resource(#[from] ResourceError),
}

/// Outcome of a run that got as far as creating the office.
#[derive(Debug, Default)]
pub struct RunReport {
    pub workers_spawned: u32,
    pub customers_spawned: u32,
    /// First spawn failure; spawning stopped there.
    pub spawn_error: Option<SpawnError>,
    /// Actors that terminated with an error instead of going home.
    pub actor_errors: Vec<(ActorRef, String)>,
    /// The `closing` line could not be written. The door was closed anyway.
    pub closing_error: Option<OfficeError>,
    /// Teardown of the office failed.
    pub release_error: Option<ResourceError>,
    /// Lines written to the event log.
    pub events: u64,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.spawn_error.is_none()
            && self.actor_errors.is_empty()
            && self.closing_error.is_none()
            && self.release_error.is_none()
    }

    /// Process exit status: 0 on full success, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

/// The orchestrator of one simulation run.
///
/// `OfficeSystem` is responsible for:
/// - **Resource Lifecycle**: creating the shared [`Office`] and releasing it
///   only after every actor terminated
/// - **Population**: spawning workers `1..=NU`, then customers `1..=NZ`
/// - **Closing**: waiting `[F/2, F]` ms, then closing the door
///
/// # Spawn Failures
///
/// The first failed spawn stops the population where it is. The actors that
/// did start run to completion: the office is closed right away and they
/// drain normally. Workers are spawned first so that any customer that starts
/// also has someone to serve it.
///
/// # Actor Failures
///
/// An actor that ends with an error, panics or is cancelled aborts the run
/// through [`Office::abort`]: blocked customers are released with an error,
/// the remaining actors stop at their next step and the closing delay is cut
/// short. The run still closes, joins and releases, and every failure lands
/// in the report.
///
/// # Example
///
/// ```ignore
/// let system = OfficeSystem::new(config, SystemEnv::new(), TokioSpawner);
/// let report = system.run(create_output("proj2.out")?).await?;
/// std::process::exit(report.exit_code().into());
/// ```
pub struct OfficeSystem<E: Environment, S: Spawner> {
    config: OfficeConfig,
    env: E,
    spawner: S,
}

impl<E: Environment, S: Spawner> OfficeSystem<E, S> {
    pub fn new(config: OfficeConfig, env: E, spawner: S) -> Self {
        Self {
            config,
            env,
            spawner,
        }
    }

    pub fn config(&self) -> &OfficeConfig {
        &self.config
    }

    /// Runs the whole simulation, writing the event log to `sink`.
    ///
    /// Configuration is checked before the office is created. Once actors
    /// exist, the run always joins them and releases the office, whatever
    /// failed on the way.
    pub async fn run(self, sink: impl Write + Send + 'static) -> Result<RunReport, SystemError> {
        self.config.validate()?;
        info!(config = ?self.config, "office opening");

        let office = Arc::new(Office::new(sink));
        let ctx = ActorContext::new(office.clone(), self.env.clone());
        let mut report = RunReport::default();
        let mut handles = Vec::new();

        // =====================================================================
        // 1. Spawn the population
        // =====================================================================

        if let Err(err) = self.spawn_population(&ctx, &mut handles, &mut report) {
            error!(error = %err, "spawning stopped, draining started actors");
            report.spawn_error = Some(err);
        } else {
            let (min, max) = self.config.close_window();
            tokio::select! {
                _ = self.env.sleep(self.env.random_duration(min, max)) => {}
                _ = office.aborted() => warn!("closing early after an actor failure"),
            }
        }
        drop(ctx);

        // =====================================================================
        // 2. Close the door
        // =====================================================================

        if let Err(err) = close(&office).await {
            error!(error = %err, "closing line not written");
            report.closing_error = Some(err);
        }

        // =====================================================================
        // 3. Wait for every actor, then release
        // =====================================================================

        for handle in handles {
            let actor = handle.actor();
            if let Err(err) = handle.join().await {
                warn!(%actor, error = %err, "actor failed");
                report.actor_errors.push((actor, err.to_string()));
            }
        }

        report.events = office.events_emitted().await;
        if let Err(err) = Office::release_shared(office) {
            error!(error = %err, "office teardown failed");
            report.release_error = Some(err);
        }

        info!(
            workers = report.workers_spawned,
            customers = report.customers_spawned,
            events = report.events,
            success = report.is_success(),
            "office run complete"
        );
        Ok(report)
    }

    fn spawn_population(
        &self,
        ctx: &ActorContext<E>,
        handles: &mut Vec<ActorHandle>,
        report: &mut RunReport,
    ) -> Result<(), SpawnError> {
        for id in 1..=self.config.workers {
            let worker = worker_actor::new(id, self.config.max_break());
            handles.push(self.launch(worker, ctx)?);
            report.workers_spawned += 1;
        }
        for id in 1..=self.config.customers {
            let customer = customer_actor::new(id, self.config.max_arrival_delay());
            handles.push(self.launch(customer, ctx)?);
            report.customers_spawned += 1;
        }
        Ok(())
    }

    fn launch<A: OfficeActor<E>>(&self, actor: A, ctx: &ActorContext<E>) -> Result<ActorHandle, SpawnError> {
        let who = actor.identity();
        let office = ctx.office.clone();
        let body = actor.run(ctx.clone());
        self.spawner.spawn(
            who,
            Box::pin(async move {
                let mut guard = AbortOnFailure::new(office);
                let result = body.await;
                if result.is_ok() {
                    guard.disarm();
                }
                result
            }),
        )
    }
}

/// Aborts the office when dropped while armed, which covers an actor that
/// returned an error as well as one that panicked or was cancelled.
struct AbortOnFailure {
    office: Arc<Office>,
    armed: bool,
}

impl AbortOnFailure {
    fn new(office: Arc<Office>) -> Self {
        Self { office, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for AbortOnFailure {
    fn drop(&mut self) {
        if self.armed {
            self.office.abort();
        }
    }
}

/// Logs `closing` and flips the door. The door is closed even if the line
/// could not be written, so actors can still drain.
async fn close(office: &Office) -> Result<(), OfficeError> {
    let mut door = office.door().await;
    let emitted = office.emit_closing().await;
    door.close();
    info!("office closed");
    emitted.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{LimitedSpawner, MemoryLog};
    use crate::framework::{SeededEnv, TokioSpawner};
    use crate::model::Event;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn invalid_config_creates_nothing() {
        let config = OfficeConfig {
            customers: 1,
            workers: 0,
            max_arrival_delay_ms: 0,
            max_break_ms: 0,
            max_close_after_ms: 0,
        };
        let log = MemoryLog::new();

        let err = OfficeSystem::new(config, SeededEnv::new(1), TokioSpawner)
            .run(log.clone())
            .await
            .unwrap_err();

        assert!(matches!(err, SystemError::Config(ConfigError::NoWorkers)));
        assert!(log.text().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn first_spawn_failure_closes_immediately() {
        let config = OfficeConfig::new(2, 1, 10, 10, 10).unwrap();
        let log = MemoryLog::new();

        let report = OfficeSystem::new(config, SeededEnv::new(1), LimitedSpawner::new(0))
            .run(log.clone())
            .await
            .unwrap();

        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.workers_spawned, 0);
        assert_eq!(report.customers_spawned, 0);
        let lines = log.lines().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].event, Event::Closing);
    }

    #[test]
    fn report_exit_codes() {
        let mut report = RunReport::default();
        assert_eq!(report.exit_code(), 0);
        report.actor_errors.push((ActorRef::worker(1), "boom".to_string()));
        assert_eq!(report.exit_code(), 1);

        let report = RunReport {
            release_error: Some(ResourceError::StillShared { holders: 1 }),
            ..RunReport::default()
        };
        assert_eq!(report.exit_code(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_actor_aborts_the_office() {
        let config = OfficeConfig::new(0, 1, 0, 1, 0).unwrap();
        let system = OfficeSystem::new(config, SeededEnv::new(1), TokioSpawner);

        let office = Arc::new(Office::new(MemoryLog::new()));
        office.door().await.close();
        let ctx = ActorContext::new(office.clone(), SeededEnv::new(1));
        let handle = system.launch(worker_actor::new(1, Duration::from_millis(1)), &ctx).unwrap();
        handle.join().await.unwrap();
        assert!(!office.is_aborted());

        let broken = Arc::new(Office::new(MemoryLog::failing_after(0)));
        let ctx = ActorContext::new(broken.clone(), SeededEnv::new(1));
        let handle = system.launch(worker_actor::new(2, Duration::from_millis(1)), &ctx).unwrap();
        assert!(handle.join().await.is_err());
        assert!(broken.is_aborted());
    }

    #[tokio::test]
    async fn panicking_actor_aborts_the_office() {
        let office = Arc::new(Office::new(MemoryLog::new()));
        let guard = AbortOnFailure::new(office.clone());

        let task = tokio::spawn(async move {
            let _guard = guard;
            panic!("customer crashed");
        });

        assert!(task.await.is_err());
        assert!(office.is_aborted());
    }
}
