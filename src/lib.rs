//! # Post Office
//!
//! > **Customers, workers and one shared office, synchronized without races.**
//!
//! This crate simulates a post office shared by independently running
//! customer and worker actors. Customers queue for one of three services
//! (mail, package, money); workers call them one at a time; the orchestrator
//! closes the office after a random interval and waits until everyone went
//! home. Every step is written to a single event log whose sequence numbers
//! totally order the run.
//!
//! ## 🏗️ Design
//!
//! ### One Shared Region, Guarded Accessors
//! All shared state lives in [`Office`](office::Office): the open flag, the
//! queue lengths, the sequence counter and the per-service gates. It is
//! reachable only through lock guards ([`Door`](office::Door),
//! [`Queues`](office::Queues)) and [`Office::emit`](office::Office::emit), so
//! every mutation site is visible in the types.
//!
//! ### No Globals
//! The orchestrator builds the office once and hands each actor an
//! [`ActorContext`](framework::ActorContext) holding an `Arc` of it plus the
//! [`Environment`](framework::Environment) for delays and randomness.
//!
//! ### Observability
//! `tracing` diagnostics go to stderr, separate from the event log. See
//! [`lifecycle::tracing`].
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`] - service kinds, actor identities, typed log lines
//! - [`office`] - the shared region and its synchronization primitives
//! - [`framework`] - the [`OfficeActor`](framework::OfficeActor) trait,
//!   spawners, environments and test doubles
//! - [`customer_actor`], [`worker_actor`] - the two roles
//! - [`lifecycle`] - the [`OfficeSystem`](lifecycle::OfficeSystem)
//!   orchestrator, log file and tracing setup
//! - [`config`] - run parameters and their validation
//! - [`audit`] - checks a finished log against the run invariants
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! post-office 10 3 100 50 1000 --audit
//! RUST_LOG=debug post-office 2 1 10 10 100 --seed 7
//! ```

pub mod audit;
pub mod config;
pub mod customer_actor;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod office;
pub mod worker_actor;
