//! Per-operation debounce and sequencing of service calls.
use std::time::Duration;

use tracing::{debug, warn};

use super::debounce::Debouncer;
use super::sequence::{RequestSequence, RequestTicket};
use crate::service::{CalculationRequest, GenerationRequest, ServiceKind};

/// A request whose debounce window has elapsed and that should be sent now.
#[derive(Clone, Debug, PartialEq)]
pub enum Dispatch {
    Generation {
        ticket: RequestTicket,
        request: GenerationRequest,
    },
    Calculation {
        ticket: RequestTicket,
        request: CalculationRequest,
    },
}

impl Dispatch {
    pub fn ticket(&self) -> RequestTicket {
        match self {
            Dispatch::Generation { ticket, .. } | Dispatch::Calculation { ticket, .. } => *ticket,
        }
    }

    pub fn service(&self) -> ServiceKind {
        match self {
            Dispatch::Generation { .. } => ServiceKind::Generation,
            Dispatch::Calculation { .. } => ServiceKind::Calculation,
        }
    }
}

/// Counters over the lifetime of a coordinator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoordinatorStats {
    pub generation_dispatched: u64,
    pub calculation_dispatched: u64,
    pub applied: u64,
    pub stale_discarded: u64,
    /// Requests superseded inside a debounce window before they were dispatched.
    pub collapsed: u64,
}

/// Debounces generation and calculation requests independently and rejects stale responses.
///
/// Nothing is ever cancelled once dispatched. Instead every dispatch carries a ticket and a
/// response is only applied if its ticket is newer than the last applied one for the same
/// operation, so a slow older response can never overwrite a newer one.
#[derive(Clone, Debug)]
pub struct RequestCoordinator {
    generation: Debouncer<GenerationRequest>,
    calculation: Debouncer<CalculationRequest>,
    generation_seq: RequestSequence,
    calculation_seq: RequestSequence,
    stats: CoordinatorStats,
}

impl Default for RequestCoordinator {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

impl RequestCoordinator {
    pub fn new(debounce: Duration) -> Self {
        Self {
            generation: Debouncer::new(debounce),
            calculation: Debouncer::new(debounce),
            generation_seq: RequestSequence::new(),
            calculation_seq: RequestSequence::new(),
            stats: CoordinatorStats::default(),
        }
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.generation.set_interval(debounce);
        self.calculation.set_interval(debounce);
    }

    /// Schedules a generation; supersedes any generation still waiting in its window.
    pub fn request_generation(&mut self, now: Duration, request: GenerationRequest) {
        self.generation.schedule(now, request);
    }

    /// Schedules a calculation; supersedes any calculation still waiting in its window.
    pub fn request_calculation(&mut self, now: Duration, request: CalculationRequest) {
        self.calculation.schedule(now, request);
    }

    /// Like [`Self::request_generation`] but due on the next poll.
    pub fn generation_now(&mut self, now: Duration, request: GenerationRequest) {
        self.generation.schedule_immediate(now, request);
    }

    /// Like [`Self::request_calculation`] but due on the next poll.
    pub fn calculation_now(&mut self, now: Duration, request: CalculationRequest) {
        self.calculation.schedule_immediate(now, request);
    }

    /// Issues tickets for every request whose window has elapsed. Generation comes first.
    pub fn poll(&mut self, now: Duration) -> Vec<Dispatch> {
        let mut out = Vec::new();
        if let Some(request) = self.generation.poll(now) {
            let ticket = self.generation_seq.issue();
            self.stats.generation_dispatched += 1;
            debug!("Dispatching generation {} for '{}'.", ticket, request.site_name);
            out.push(Dispatch::Generation { ticket, request });
        }
        if let Some(request) = self.calculation.poll(now) {
            let ticket = self.calculation_seq.issue();
            self.stats.calculation_dispatched += 1;
            debug!("Dispatching calculation {} for '{}'.", ticket, request.site_name);
            out.push(Dispatch::Calculation { ticket, request });
        }
        out
    }

    /// Earliest time at which [`Self::poll`] will return something.
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.generation.deadline(), self.calculation.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn is_pending(&self, service: ServiceKind) -> bool {
        match service {
            ServiceKind::Generation => self.generation.is_pending(),
            ServiceKind::Calculation => self.calculation.is_pending(),
        }
    }

    /// Whether a response for `ticket` may be applied; records it as applied if so.
    pub fn accept(&mut self, service: ServiceKind, ticket: RequestTicket) -> bool {
        let seq = match service {
            ServiceKind::Generation => &mut self.generation_seq,
            ServiceKind::Calculation => &mut self.calculation_seq,
        };
        if seq.accept(ticket) {
            self.stats.applied += 1;
            true
        } else {
            self.stats.stale_discarded += 1;
            warn!(
                "Discarding stale {} response {} (last applied {:?}, last issued {:?}).",
                service,
                ticket,
                seq.last_applied().map(RequestTicket::get),
                seq.last_issued().map(RequestTicket::get)
            );
            false
        }
    }

    pub fn accept_generation(&mut self, ticket: RequestTicket) -> bool {
        self.accept(ServiceKind::Generation, ticket)
    }

    pub fn accept_calculation(&mut self, ticket: RequestTicket) -> bool {
        self.accept(ServiceKind::Calculation, ticket)
    }

    /// Drops requests still waiting in their debounce windows.
    pub fn cancel_pending(&mut self) {
        self.generation.reset();
        self.calculation.reset();
    }

    /// Makes every dispatched request stale so its response is ignored when it arrives.
    pub fn invalidate_in_flight(&mut self) {
        self.generation_seq.invalidate_outstanding();
        self.calculation_seq.invalidate_outstanding();
    }

    pub fn stats(&self) -> CoordinatorStats {
        CoordinatorStats {
            collapsed: self.generation.collapsed() + self.calculation.collapsed(),
            ..self.stats
        }
    }
}
