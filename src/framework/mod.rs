//! Generic actor plumbing for the office simulation.
//!
//! # Main Components
//!
//! - [`OfficeActor`] - Trait the customer and worker roles implement
//! - [`ActorContext`] - Shared office plus environment handed to every actor
//! - [`Spawner`] / [`TokioSpawner`] - Starting actors as independent tasks
//! - [`Environment`] / [`SystemEnv`] / [`SeededEnv`] - Delays and randomness
//!
//! # Testing
//!
//! See [`mock`] for an in-memory log sink, a scripted environment and a
//! spawner with limited capacity.

pub mod core;
pub mod env;
pub mod mock;
pub mod spawner;

pub use self::core::*;
pub use env::*;
pub use spawner::*;
