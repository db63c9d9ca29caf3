//! # Event Log Lines
//!
//! Every observable step of the simulation becomes exactly one [`LogLine`]:
//!
//! ```text
//! 1: U 1: started
//! 2: Z 1: started
//! 3: Z 1: entering office for a service 2
//! 4: U 1: serving a service of type 2
//! 5: Z 1: called by office worker
//! 6: closing
//! ```
//!
//! Lines render through [`Display`](std::fmt::Display) when written by the
//! [`Office`](crate::office::Office) and parse back through [`FromStr`] so the
//! [`audit`](crate::audit) module can check a finished run.

use crate::model::ServiceKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The two kinds of actor that populate the office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Customer,
    Worker,
}

impl Role {
    /// Single-letter tag used in the log (`Z` for customers, `U` for workers).
    pub const fn tag(self) -> char {
        match self {
            Role::Customer => 'Z',
            Role::Worker => 'U',
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Z" => Some(Role::Customer),
            "U" => Some(Role::Worker),
            _ => None,
        }
    }
}

/// Identity of a single actor. Only used for log readability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorRef {
    pub role: Role,
    pub id: u32,
}

impl ActorRef {
    pub const fn customer(id: u32) -> Self {
        Self { role: Role::Customer, id }
    }

    pub const fn worker(id: u32) -> Self {
        Self { role: Role::Worker, id }
    }
}

impl fmt::Display for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.role.tag(), self.id)
    }
}

/// Something that happened in the office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Started,
    GoingHome,
    /// Customer admitted and committed to a queue.
    Entering(ServiceKind),
    CalledByWorker,
    /// Worker took the head of a queue.
    Serving(ServiceKind),
    ServiceFinished,
    TakingBreak,
    BreakFinished,
    /// Orchestrator closed the office. Carries no actor tag.
    Closing,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Started => f.write_str("started"),
            Event::GoingHome => f.write_str("going home"),
            Event::Entering(kind) => write!(f, "entering office for a service {kind}"),
            Event::CalledByWorker => f.write_str("called by office worker"),
            Event::Serving(kind) => write!(f, "serving a service of type {kind}"),
            Event::ServiceFinished => f.write_str("service finished"),
            Event::TakingBreak => f.write_str("taking break"),
            Event::BreakFinished => f.write_str("break finished"),
            Event::Closing => f.write_str("closing"),
        }
    }
}

impl FromStr for Event {
    type Err = ParseLineError;

    fn from_str(message: &str) -> Result<Self, Self::Err> {
        let service = |rest: &str| {
            rest.parse::<u8>()
                .ok()
                .and_then(ServiceKind::from_number)
                .ok_or_else(|| ParseLineError::UnknownService(rest.to_string()))
        };

        if let Some(rest) = message.strip_prefix("entering office for a service ") {
            return Ok(Event::Entering(service(rest)?));
        }
        if let Some(rest) = message.strip_prefix("serving a service of type ") {
            return Ok(Event::Serving(service(rest)?));
        }
        match message {
            "started" => Ok(Event::Started),
            "going home" => Ok(Event::GoingHome),
            "called by office worker" => Ok(Event::CalledByWorker),
            "service finished" => Ok(Event::ServiceFinished),
            "taking break" => Ok(Event::TakingBreak),
            "break finished" => Ok(Event::BreakFinished),
            "closing" => Ok(Event::Closing),
            other => Err(ParseLineError::UnknownMessage(other.to_string())),
        }
    }
}

/// One numbered line of the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub seq: u64,
    /// `None` only for the orchestrator's `closing` line.
    pub actor: Option<ActorRef>,
    pub event: Event,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.actor {
            Some(actor) => write!(f, "{}: {}: {}", self.seq, actor, self.event),
            None => write!(f, "{}: {}", self.seq, self.event),
        }
    }
}

/// Errors produced when reading a log line back.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseLineError {
    #[error("missing sequence number in line: {0}")]
    MissingSequence(String),

    #[error("invalid actor tag: {0}")]
    InvalidActor(String),

    #[error("unknown message: {0}")]
    UnknownMessage(String),

    #[error("unknown service: {0}")]
    UnknownService(String),
}

impl FromStr for LogLine {
    type Err = ParseLineError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (seq, rest) = line
            .split_once(": ")
            .ok_or_else(|| ParseLineError::MissingSequence(line.to_string()))?;
        let seq = seq
            .parse::<u64>()
            .map_err(|_| ParseLineError::MissingSequence(line.to_string()))?;

        let Some((actor, message)) = rest.split_once(": ") else {
            let event = rest.parse::<Event>()?;
            return Ok(LogLine { seq, actor: None, event });
        };

        let (tag, id) = actor
            .split_once(' ')
            .ok_or_else(|| ParseLineError::InvalidActor(actor.to_string()))?;
        let role = Role::from_tag(tag).ok_or_else(|| ParseLineError::InvalidActor(actor.to_string()))?;
        let id = id
            .parse::<u32>()
            .map_err(|_| ParseLineError::InvalidActor(actor.to_string()))?;

        Ok(LogLine {
            seq,
            actor: Some(ActorRef { role, id }),
            event: message.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_actor_lines_with_tag_and_id() {
        let line = LogLine {
            seq: 4,
            actor: Some(ActorRef::worker(2)),
            event: Event::Serving(ServiceKind::Money),
        };
        assert_eq!(line.to_string(), "4: U 2: serving a service of type 3");
    }

    #[test]
    fn renders_closing_without_actor() {
        let line = LogLine { seq: 9, actor: None, event: Event::Closing };
        assert_eq!(line.to_string(), "9: closing");
    }

    #[test]
    fn parses_customer_entering() {
        let line: LogLine = "12: Z 7: entering office for a service 1".parse().unwrap();
        assert_eq!(line.seq, 12);
        assert_eq!(line.actor, Some(ActorRef::customer(7)));
        assert_eq!(line.event, Event::Entering(ServiceKind::Mail));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(matches!(
            "x: U 1: started".parse::<LogLine>(),
            Err(ParseLineError::MissingSequence(_))
        ));
        assert!(matches!(
            "1: Q 1: started".parse::<LogLine>(),
            Err(ParseLineError::InvalidActor(_))
        ));
        assert!(matches!(
            "1: U 1: dancing".parse::<LogLine>(),
            Err(ParseLineError::UnknownMessage(_))
        ));
        assert!(matches!(
            "1: U 1: serving a service of type 4".parse::<LogLine>(),
            Err(ParseLineError::UnknownService(_))
        ));
    }
}
