//! Transceive push decoding and observer dispatch
//!
//! With transceive enabled the rig pushes an `IF` status frame whenever its
//! front panel state changes. A push is decoded into one [`DecodedEvent`] and
//! fanned out as four [`RigEvent`]s, always in the order VFO, frequency,
//! mode, PTT. Unchanged values are not suppressed.

use std::fmt;
use std::sync::mpsc;

use ic10_protocol::{FrameLayout, Mode, ParseError, RawFrame, Vfo};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, RigError};

/// Notification axis an observer can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Vfo,
    Frequency,
    Mode,
    Ptt,
}

/// One decoded value on one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RigEvent {
    VfoChanged(Vfo),
    FrequencyChanged(u64),
    ModeChanged(Mode),
    PttChanged(bool),
}

impl RigEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::VfoChanged(_) => EventKind::Vfo,
            Self::FrequencyChanged(_) => EventKind::Frequency,
            Self::ModeChanged(_) => EventKind::Mode,
            Self::PttChanged(_) => EventKind::Ptt,
        }
    }
}

impl fmt::Display for RigEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VfoChanged(vfo) => write!(f, "vfo {}", vfo),
            Self::FrequencyChanged(hz) => write!(f, "frequency {} Hz", hz),
            Self::ModeChanged(mode) => write!(f, "mode {}", mode),
            Self::PttChanged(true) => f.write_str("ptt TX"),
            Self::PttChanged(false) => f.write_str("ptt RX"),
        }
    }
}

/// The four values carried by one push
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedEvent {
    pub vfo: Vfo,
    pub frequency_hz: u64,
    pub mode: Mode,
    pub ptt_active: bool,
}

impl DecodedEvent {
    /// Per-axis events in dispatch order
    pub fn events(&self) -> [RigEvent; 4] {
        [
            RigEvent::VfoChanged(self.vfo),
            RigEvent::FrequencyChanged(self.frequency_hz),
            RigEvent::ModeChanged(self.mode),
            RigEvent::PttChanged(self.ptt_active),
        ]
    }
}

/// Decode a pushed frame
///
/// A frame that fails the length/tag gate is reported as
/// [`RigError::NotImplemented`]; an unmapped field byte is a protocol error.
pub fn decode_push(frame: &[u8], layout: FrameLayout) -> Result<DecodedEvent> {
    let raw = match RawFrame::new(frame, layout) {
        Ok(raw) => raw,
        Err(e @ (ParseError::TooShort { .. } | ParseError::WrongTag { .. } | ParseError::InvalidFrame(_))) => {
            warn!("Unsupported transceive frame {:?}: {}", String::from_utf8_lossy(frame), e);
            return Err(RigError::NotImplemented(format!(
                "transceive frame {:?}: {}",
                String::from_utf8_lossy(frame),
                e
            )));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(DecodedEvent {
        vfo: raw.vfo()?,
        frequency_hz: raw.frequency_hz()?,
        mode: raw.mode()?,
        ptt_active: raw.ptt_active()?,
    })
}

/// Receiver of decoded events
pub trait EventSink {
    fn on_event(&mut self, event: &RigEvent);
}

impl<F: FnMut(&RigEvent)> EventSink for F {
    fn on_event(&mut self, event: &RigEvent) {
        self(event)
    }
}

impl EventSink for mpsc::Sender<RigEvent> {
    fn on_event(&mut self, event: &RigEvent) {
        // a dropped receiver just stops listening
        let _ = self.send(*event);
    }
}

struct Subscription {
    kind: Option<EventKind>,
    sink: Box<dyn EventSink + Send>,
}

/// Registered observers, one filter per subscription
#[derive(Default)]
pub struct EventDispatcher {
    subscriptions: Vec<Subscription>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive events of one axis
    pub fn subscribe(&mut self, kind: EventKind, sink: impl EventSink + Send + 'static) {
        self.subscriptions.push(Subscription {
            kind: Some(kind),
            sink: Box::new(sink),
        });
    }

    /// Receive events of every axis
    pub fn subscribe_all(&mut self, sink: impl EventSink + Send + 'static) {
        self.subscriptions.push(Subscription {
            kind: None,
            sink: Box::new(sink),
        });
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Deliver each event of `decoded`, in order, to every matching observer
    pub fn dispatch(&mut self, decoded: &DecodedEvent) {
        for event in decoded.events() {
            for sub in &mut self.subscriptions {
                if sub.kind.map_or(true, |kind| kind == event.kind()) {
                    sub.sink.on_event(&event);
                }
            }
        }
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}
