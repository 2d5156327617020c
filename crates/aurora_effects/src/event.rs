//! # Page Events
//!
//! Everything the host reports about the page, and the channel it reports
//! it through.
//!
//! ```text
//! ┌──────────────┐  StampedEvent   ┌──────────────┐
//! │ DOM listener │───────────────> │  EventBus    │
//! └──────────────┘   try_send      └──────┬───────┘
//!                                         │ drain (start of frame)
//!                                  ┌──────▼───────┐
//!                                  │EffectsRuntime│
//!                                  └──────────────┘
//! ```
//!
//! Listeners never borrow the runtime. They stamp the event with the host
//! time and push it; the runtime drains the queue before every frame.

use aurora_core::{NodeId, Rect, Vec2};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// Something that happened on the page.
#[derive(Clone, Debug, PartialEq)]
pub enum PageEvent {
    /// Pointer moved anywhere in the document.
    PointerMove {
        /// Client position.
        position: Vec2,
    },
    /// Pointer entered a tracked element.
    PointerEnter {
        /// Element entered.
        node: NodeId,
    },
    /// Pointer moved inside a tracked element.
    PointerMoveWithin {
        /// Element under the pointer.
        node: NodeId,
        /// Client position.
        position: Vec2,
        /// Element bounding box at the time of the event.
        bounds: Rect,
    },
    /// Pointer left a tracked element.
    PointerLeave {
        /// Element left.
        node: NodeId,
    },
    /// Tracked element clicked.
    Click {
        /// Element clicked.
        node: NodeId,
    },
    /// Page scrolled.
    Scroll {
        /// Vertical scroll offset.
        y: f32,
    },
    /// Window resized.
    Resize {
        /// New viewport width.
        width: f32,
        /// New viewport height.
        height: f32,
    },
    /// A section crossed one of the observed visibility thresholds.
    SectionVisibility {
        /// The section.
        node: NodeId,
        /// Whether any part of it is visible.
        intersecting: bool,
        /// Visible fraction.
        ratio: f32,
    },
    /// In-page anchor clicked; the host already prevented the jump.
    AnchorClick {
        /// The link.
        link: NodeId,
        /// Element the link points at, if it resolved.
        target: Option<NodeId>,
    },
    /// A form field failed native validation.
    FieldInvalid {
        /// The field.
        node: NodeId,
    },
    /// A form field was edited.
    FieldInput {
        /// The field.
        node: NodeId,
    },
    /// A form was submitted; the host already prevented navigation.
    FormSubmit {
        /// The form.
        node: NodeId,
    },
}

/// An event with the host time it happened at.
#[derive(Clone, Debug, PartialEq)]
pub struct StampedEvent {
    /// Host timestamp (ms).
    pub at_ms: f64,
    /// The event.
    pub event: PageEvent,
}

/// Bounded channel from listeners to the runtime.
pub struct EventBus {
    sender: Sender<StampedEvent>,
    receiver: Receiver<StampedEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Returns a sender handle.
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Returns a receiver handle.
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }
}

/// Sender handle given to host listeners.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<StampedEvent>,
}

impl EventSender {
    /// Sends an event without blocking.
    ///
    /// Returns false if the channel is full or the runtime is gone. A full
    /// channel means frames have stalled; the event is dropped.
    #[inline]
    pub fn send(&self, at_ms: f64, event: PageEvent) -> bool {
        match self.sender.try_send(StampedEvent { at_ms, event }) {
            Ok(()) => true,
            Err(TrySendError::Full(dropped)) => {
                tracing::warn!("event bus full, dropping {:?}", dropped.event);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Receiver handle held by the runtime.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<StampedEvent>,
}

impl EventReceiver {
    /// Receives one pending event, if any.
    #[inline]
    pub fn try_recv(&self) -> Option<StampedEvent> {
        self.receiver.try_recv().ok()
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_send_receive() {
        let bus = EventBus::new(8);
        let sender = bus.sender();
        let receiver = bus.receiver();

        assert!(sender.send(12.5, PageEvent::Scroll { y: 90.0 }));
        assert_eq!(receiver.pending_count(), 1);

        let stamped = receiver.try_recv().unwrap();
        assert_eq!(stamped.at_ms, 12.5);
        assert_eq!(stamped.event, PageEvent::Scroll { y: 90.0 });
        assert!(receiver.try_recv().is_none());
    }

    #[test]
    fn test_full_bus_drops() {
        let bus = EventBus::new(1);
        let sender = bus.sender();
        assert!(sender.send(0.0, PageEvent::Scroll { y: 1.0 }));
        assert!(!sender.send(1.0, PageEvent::Scroll { y: 2.0 }));
    }
}
