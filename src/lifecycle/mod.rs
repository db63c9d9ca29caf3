//! # System Lifecycle & Orchestration
//!
//! This module runs one simulation from start to finish.
//!
//! **Key Responsibilities:**
//! 1. **Resource Creation** - the log file and the shared [`Office`](crate::office::Office)
//! 2. **Population** - spawning every worker and customer with its context
//! 3. **Closing** - flipping the office to closed after `[F/2, F]` ms
//! 4. **Draining** - joining every actor before anything is released
//! 5. **Observability Setup** - tracing to stderr
//!
//! ## The OfficeSystem Pattern
//!
//! ```rust,ignore
//! let office = Arc::new(Office::new(sink));
//! let ctx = ActorContext::new(office.clone(), env);
//!
//! for id in 1..=workers   { handles.push(spawner.spawn(worker(id).run(ctx.clone()))?); }
//! for id in 1..=customers { handles.push(spawner.spawn(customer(id).run(ctx.clone()))?); }
//!
//! env.sleep(random in [F/2, F]).await;
//! close(&office).await;
//!
//! for handle in handles { handle.join().await; }
//! Office::release_shared(office)?;
//! ```
//!
//! Release happens through [`Arc::try_unwrap`](std::sync::Arc::try_unwrap): it
//! cannot succeed while any actor still holds the office.

pub mod office_system;
pub mod output;
pub mod tracing;

pub use office_system::*;
pub use output::*;
pub use self::tracing::*;
