//! # Worker Actor
//!
//! A worker serves queued customers until the office is closed and nobody is
//! left waiting.
//!
//! ## Loop
//!
//! 1. Under the queue lock, pick the first non-empty queue (mail, package,
//!    money). If one exists: log `serving`, decrement it, signal its gate,
//!    release, serve for `[0, 10]` ms, log `service finished`.
//! 2. Otherwise release the queue lock and take the door lock. Open: log
//!    `taking break`, rest `[0, TU]` ms, log `break finished`. Closed: look at
//!    the queues again while still holding the door; go home only if they are
//!    all empty.
//!
//! Idle workers poll with a sleep backoff instead of blocking on a condition.

pub mod entity;

use std::time::Duration;

/// One worker of the office.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worker {
    pub id: u32,
    /// Longest break taken when no customer is waiting.
    pub max_break: Duration,
}

/// Creates worker `id`.
pub fn new(id: u32, max_break: Duration) -> Worker {
    Worker { id, max_break }
}
