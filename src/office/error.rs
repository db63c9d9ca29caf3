//! Error types for the shared office region.

use crate::model::ServiceKind;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of a guarded accessor while the simulation is running.
#[derive(Debug, Error)]
pub enum OfficeError {
    /// The event could not be written; its sequence number was not consumed.
    #[error("failed to write event {seq} to the log: {source}")]
    LogWrite {
        seq: u64,
        #[source]
        source: io::Error,
    },

    /// A worker tried to call a customer from an empty queue.
    #[error("queue for service {0} is empty, nobody to call")]
    QueueUnderflow(ServiceKind),

    /// The gate was torn down while a customer was still waiting on it.
    #[error("gate for service {0} closed while a customer was waiting")]
    GateClosed(ServiceKind),

    /// Another actor failed and the run was aborted.
    #[error("office run aborted after an actor failure")]
    Aborted,
}

/// Failures while creating or tearing down shared resources. Always fatal.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to open output file {path}: {source}")]
    OutputFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("office region is still shared by {holders} actor(s)")]
    StillShared { holders: usize },

    #[error("{waiting} customer(s) still queued for service {kind} at teardown")]
    StrandedCustomers { kind: ServiceKind, waiting: u32 },

    #[error("gate for service {kind} holds {permits} unclaimed signal(s) at teardown")]
    UnclaimedSignal { kind: ServiceKind, permits: usize },

    #[error("failed to flush the event log: {0}")]
    Flush(#[source] io::Error),
}
