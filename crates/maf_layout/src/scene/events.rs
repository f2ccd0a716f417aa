//! Event types and sinks for observing a layout session.
//!
//! [`crate::session::LayoutSession`] reports what it does through an [`EventSink`]: objects
//! entering and leaving the scene, requests being dispatched and answered, and recoverable
//! problems. Renderers that mirror the scene only need [`LayoutEvent::ObjectAdded`] and
//! [`LayoutEvent::ObjectRemoved`].
use super::key::ObjectKey;
use super::object::VisualObject;
use crate::grid::TileCoord;
use crate::paint::Brush;
use crate::request::RequestTicket;
use crate::service::ServiceKind;

/// Describes events emitted by a layout session.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum LayoutEvent {
    /// A site was set up and its grid rasterized.
    SiteReady {
        site_name: String,
        /// Matrix columns.
        width: usize,
        /// Matrix rows.
        height: usize,
    },

    /// A brush stamp changed at least one tile.
    TilesPainted { brush: Brush, tiles: Vec<TileCoord> },

    /// The matrix was zeroed and every object removed.
    Erased,

    /// A new object should be drawn.
    ObjectAdded { object: VisualObject },

    /// An object should no longer be drawn.
    ObjectRemoved { key: ObjectKey },

    /// A slot references equipment that cannot be rendered. Its placeholder is still drawn.
    UnknownEquipment { key: String, model: String },

    RequestDispatched {
        service: ServiceKind,
        ticket: RequestTicket,
    },

    ResponseApplied {
        service: ServiceKind,
        ticket: RequestTicket,
    },

    /// A response arrived after a newer one had been applied.
    StaleResponseDiscarded {
        service: ServiceKind,
        ticket: RequestTicket,
    },

    /// A service call failed; the scene keeps its last applied state.
    ServiceUnavailable {
        service: ServiceKind,
        message: String,
    },
}

/// A generic event sink that accepts [`LayoutEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: LayoutEvent);
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: LayoutEvent) {}
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    #[inline]
    fn send(&mut self, event: LayoutEvent) {
        (**self).send(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<LayoutEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events matching `pred`.
    pub fn count(&self, pred: impl Fn(&LayoutEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: LayoutEvent) {
        self.events.push(event);
    }
}
