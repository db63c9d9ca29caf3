//! # Customer Actor
//!
//! A customer walks to the office, enters if it is still open, queues for one
//! service, waits to be called by a worker and goes home.
//!
//! ## Structure
//!
//! - [`entity`] - [`OfficeActor`](crate::framework::OfficeActor) implementation for [`Customer`]
//! - [`new()`] - Factory used by the orchestrator
//!
//! ## Protocol
//!
//! ```text
//! started ─► travel [0, TZ] ─► door lock ─┬─ closed ─► going home
//!                                         └─ open ──► entering K ─► join queue K
//!                                                     ─► wait on gate K ─► called
//!                                                     ─► served [0, 10] ─► going home
//! ```
//!
//! The queue join happens before the door lock is released. A worker that
//! sees the office closed therefore also sees every admitted customer.

pub mod entity;

use std::time::Duration;

/// One customer of the office.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: u32,
    /// Longest time spent travelling to the office.
    pub max_arrival_delay: Duration,
}

/// Creates customer `id`.
pub fn new(id: u32, max_arrival_delay: Duration) -> Customer {
    Customer { id, max_arrival_delay }
}
