//! # Log Audit
//!
//! Reads a finished event log back and checks the properties every correct
//! run satisfies:
//!
//! - sequence numbers are exactly `1..=K`
//! - `closing` appears exactly once, and no customer enters after it
//! - each customer goes `started` → `entering` → `called` → `going home`, or
//!   `started` → `going home` when turned away
//! - each worker starts first, pairs every `serving` with `service finished`
//!   and every `taking break` with `break finished`, and goes home last,
//!   after `closing`
//! - a worker only serves a service some entered customer is waiting for
//! - nobody is left unfinished

use crate::model::{ActorRef, Event, LogLine, ParseLineError, Role, ServiceKind};
use std::collections::BTreeMap;
use thiserror::Error;

/// A violated property, with the line where it was detected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuditError {
    #[error(transparent)]
    Parse(#[from] ParseLineError),

    #[error("expected sequence number {expected}, found {found}")]
    Gap { expected: u64, found: u64 },

    #[error("line {seq}: `{event}` out of order for {actor}")]
    OutOfOrder { seq: u64, actor: ActorRef, event: Event },

    #[error("line {seq}: {actor} entered after the office closed")]
    AdmittedAfterClosing { seq: u64, actor: ActorRef },

    #[error("line {seq}: {actor} went home before the office closed")]
    LeftBeforeClosing { seq: u64, actor: ActorRef },

    #[error("line {seq}: {actor} served service {kind} with nobody waiting")]
    ServedEmptyQueue { seq: u64, actor: ActorRef, kind: ServiceKind },

    #[error("expected exactly one closing line, found {0}")]
    Closing(usize),

    #[error("{0} never went home")]
    Unfinished(ActorRef),
}

/// Totals of an audited run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditSummary {
    pub events: u64,
    pub customers: u32,
    pub workers: u32,
    pub turned_away: u32,
    /// Customers served per service, indexed mail, package, money.
    pub served: [u32; 3],
    pub breaks: u32,
}

impl AuditSummary {
    pub fn served_total(&self) -> u32 {
        self.served.iter().sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Started,
    Entered,
    Called,
    Serving,
    OnBreak,
    Home,
}

/// Checks the properties listed in the [module docs](self).
pub struct LogAudit;

impl LogAudit {
    /// Parses and audits a complete log.
    pub fn from_text(text: &str) -> Result<AuditSummary, AuditError> {
        let lines = text
            .lines()
            .map(str::parse)
            .collect::<Result<Vec<LogLine>, _>>()?;
        Self::check(&lines)
    }

    pub fn check(lines: &[LogLine]) -> Result<AuditSummary, AuditError> {
        let mut summary = AuditSummary::default();
        let mut stages: BTreeMap<ActorRef, Stage> = BTreeMap::new();
        let mut pending = [0u32; 3];
        let mut closings = 0;

        for (index, line) in lines.iter().enumerate() {
            let expected = index as u64 + 1;
            if line.seq != expected {
                return Err(AuditError::Gap {
                    expected,
                    found: line.seq,
                });
            }
            summary.events = line.seq;

            let Some(actor) = line.actor else {
                closings += 1;
                continue;
            };
            let seq = line.seq;
            let out_of_order = || AuditError::OutOfOrder {
                seq,
                actor,
                event: line.event,
            };

            let stage = stages.get(&actor).copied();
            let next = match (actor.role, stage, line.event) {
                (Role::Customer, None, Event::Started) => {
                    summary.customers += 1;
                    Stage::Started
                }
                (Role::Worker, None, Event::Started) => {
                    summary.workers += 1;
                    Stage::Started
                }
                (Role::Customer, Some(Stage::Started), Event::Entering(kind)) => {
                    if closings > 0 {
                        return Err(AuditError::AdmittedAfterClosing { seq, actor });
                    }
                    pending[kind.index()] += 1;
                    Stage::Entered
                }
                (Role::Customer, Some(Stage::Started), Event::GoingHome) => {
                    summary.turned_away += 1;
                    Stage::Home
                }
                (Role::Customer, Some(Stage::Entered), Event::CalledByWorker) => Stage::Called,
                (Role::Customer, Some(Stage::Called), Event::GoingHome) => Stage::Home,
                (Role::Worker, Some(Stage::Started), Event::Serving(kind)) => {
                    let waiting = &mut pending[kind.index()];
                    if *waiting == 0 {
                        return Err(AuditError::ServedEmptyQueue { seq, actor, kind });
                    }
                    *waiting -= 1;
                    summary.served[kind.index()] += 1;
                    Stage::Serving
                }
                (Role::Worker, Some(Stage::Serving), Event::ServiceFinished) => Stage::Started,
                (Role::Worker, Some(Stage::Started), Event::TakingBreak) => {
                    summary.breaks += 1;
                    Stage::OnBreak
                }
                (Role::Worker, Some(Stage::OnBreak), Event::BreakFinished) => Stage::Started,
                (Role::Worker, Some(Stage::Started), Event::GoingHome) => {
                    if closings == 0 {
                        return Err(AuditError::LeftBeforeClosing { seq, actor });
                    }
                    Stage::Home
                }
                _ => return Err(out_of_order()),
            };
            stages.insert(actor, next);
        }

        if closings != 1 {
            return Err(AuditError::Closing(closings));
        }
        if let Some((actor, _)) = stages.iter().find(|(_, stage)| **stage != Stage::Home) {
            return Err(AuditError::Unfinished(*actor));
        }
        Ok(summary)
    }
}
