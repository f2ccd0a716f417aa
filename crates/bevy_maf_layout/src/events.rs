use bevy::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use maf_layout::prelude::{EventSink, LayoutEvent};

/// Bevy message wrapping a [`LayoutEvent`] emitted by the session.
#[derive(Message, Debug, Clone)]
pub struct LayoutMessage {
    pub event: LayoutEvent,
}

/// Global bus carrying session events to the main schedule.
///
/// Every system that touches the session writes through a [`ChannelSink`]; the bus is
/// drained into [`Messages<LayoutMessage>`] once per frame.
#[derive(Resource)]
pub struct LayoutBus {
    tx: Sender<LayoutMessage>,
    rx: Receiver<LayoutMessage>,
}

impl Default for LayoutBus {
    fn default() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }
}

impl LayoutBus {
    pub fn sender(&self) -> &Sender<LayoutMessage> {
        &self.tx
    }

    pub fn receiver(&self) -> &Receiver<LayoutMessage> {
        &self.rx
    }

    /// A sink writing into this bus.
    pub fn sink(&self) -> ChannelSink {
        ChannelSink {
            tx: self.tx.clone(),
        }
    }
}

/// Event sink that forwards events to the [`LayoutBus`].
pub struct ChannelSink {
    pub tx: Sender<LayoutMessage>,
}

impl EventSink for ChannelSink {
    #[inline]
    fn send(&mut self, event: LayoutEvent) {
        let _ = self.tx.send(LayoutMessage { event });
    }
}
