//! Pure data structures shared by every actor: service kinds, actor identities
//! and the typed lines of the event log.

pub mod event;
pub mod service;

pub use event::*;
pub use service::*;
