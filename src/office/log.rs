//! The sequence counter and the sink it numbers lines for.

use super::OfficeError;
use crate::model::{ActorRef, Event, LogLine};
use std::io::{self, Write};

/// Sequence counter plus output sink. Only reachable through the log lock in
/// [`Office`](super::Office), so numbering and writing happen as one step.
pub(crate) struct EventLog {
    next_seq: u64,
    sink: Box<dyn Write + Send>,
}

impl EventLog {
    pub(crate) fn new(sink: Box<dyn Write + Send>) -> Self {
        Self { next_seq: 1, sink }
    }

    /// Writes and flushes one line, then advances the counter.
    ///
    /// A failed write leaves the counter untouched so the log stays gapless.
    pub(crate) fn append(&mut self, actor: Option<ActorRef>, event: Event) -> Result<LogLine, OfficeError> {
        let line = LogLine {
            seq: self.next_seq,
            actor,
            event,
        };
        writeln!(self.sink, "{line}")
            .and_then(|()| self.sink.flush())
            .map_err(|source| OfficeError::LogWrite { seq: line.seq, source })?;
        self.next_seq += 1;
        Ok(line)
    }

    pub(crate) fn emitted(&self) -> u64 {
        self.next_seq - 1
    }

    pub(crate) fn finish(mut self) -> io::Result<u64> {
        self.sink.flush()?;
        Ok(self.emitted())
    }
}
