//! Monotonic request tickets and stale-response rejection.
use std::fmt;

/// Identifies one dispatched request. Tickets of one [`RequestSequence`] increase strictly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues tickets for one operation and tracks which response was applied last.
#[derive(Clone, Debug, Default)]
pub struct RequestSequence {
    issued: u64,
    last_applied: u64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next ticket, starting at 1.
    pub fn issue(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket(self.issued)
    }

    /// Whether a response for `ticket` may no longer be applied.
    pub fn is_stale(&self, ticket: RequestTicket) -> bool {
        ticket.0 <= self.last_applied
    }

    /// Marks `ticket` as applied if it is newer than the last applied one.
    ///
    /// Returns `false` (and changes nothing) for stale tickets.
    pub fn accept(&mut self, ticket: RequestTicket) -> bool {
        if self.is_stale(ticket) {
            return false;
        }
        self.last_applied = ticket.0;
        true
    }

    pub fn last_issued(&self) -> Option<RequestTicket> {
        (self.issued > 0).then_some(RequestTicket(self.issued))
    }

    pub fn last_applied(&self) -> Option<RequestTicket> {
        (self.last_applied > 0).then_some(RequestTicket(self.last_applied))
    }

    /// Number of issued requests whose response has not been superseded yet.
    pub fn outstanding(&self) -> u64 {
        self.issued - self.last_applied
    }

    /// Makes every ticket issued so far stale, e.g. after switching sites.
    pub fn invalidate_outstanding(&mut self) {
        self.last_applied = self.issued;
    }
}
