use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three independent counters a customer can queue at.
///
/// The declaration order is also the order in which workers inspect the
/// queues, so `Mail` always wins a tie over `Package`, and `Package` over
/// `Money`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Mail,
    Package,
    Money,
}

impl ServiceKind {
    /// All service kinds in worker inspection order.
    pub const ALL: [ServiceKind; 3] = [ServiceKind::Mail, ServiceKind::Package, ServiceKind::Money];

    /// The number printed in the event log (1, 2 or 3).
    pub const fn number(self) -> u8 {
        match self {
            ServiceKind::Mail => 1,
            ServiceKind::Package => 2,
            ServiceKind::Money => 3,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.number() == number)
    }

    /// Slot of this kind in per-service arrays.
    pub(crate) const fn index(self) -> usize {
        self.number() as usize - 1
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}
