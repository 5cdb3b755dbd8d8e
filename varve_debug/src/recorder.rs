// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! shared byte buffer as fixed-size little-endian records. [`decode`]
//! reads them back as an iterator of [`RecordedEvent`].
//!
//! The sink itself is handed to the controller
//! ([`Controller::set_trace_sink`](varve_core::controller::Controller::set_trace_sink)
//! takes ownership), so the recording is read through the
//! [`RecorderBuffer`] handle obtained before attaching.

use std::sync::{Arc, Mutex};

use uuid::Uuid;

use varve_core::component::{ComponentId, ComponentKind};
use varve_core::context::SweepAxis;
use varve_core::event::EventKind;
use varve_core::trace::{
    ComponentVisitEvent, CrossTriggerEvent, EventRoutedEvent, RegisteredEvent, SweepBeginEvent,
    SweepEndEvent, SweepErrorEvent, SweepScheduledEvent, SweepTrigger, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_SWEEP_SCHEDULED: u8 = 1;
const TAG_SWEEP_BEGIN: u8 = 2;
const TAG_SWEEP_END: u8 = 3;
const TAG_SWEEP_ERROR: u8 = 4;
const TAG_CROSS_TRIGGER: u8 = 5;
const TAG_EVENT_ROUTED: u8 = 6;
const TAG_REGISTERED: u8 = 7;
const TAG_COMPONENT_VISIT: u8 = 8;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A readable handle onto a recording, cloneable and independent of the
/// sink's ownership.
#[derive(Clone, Debug, Default)]
pub struct RecorderBuffer(Arc<Mutex<Vec<u8>>>);

impl RecorderBuffer {
    /// Returns a copy of the recorded bytes.
    ///
    /// # Panics
    ///
    /// Panics if the recording sink panicked while holding the buffer.
    #[must_use]
    pub fn bytes(&self) -> Vec<u8> {
        self.0.lock().expect("recorder buffer poisoned").clone()
    }
}

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: RecorderBuffer,
    seq: u64,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shared buffer handle for reading the recording back.
    #[must_use]
    pub fn buffer(&self) -> RecorderBuffer {
        self.buf.clone()
    }

    // -- encoding helpers --------------------------------------------------

    fn record(&mut self, tag: u8, payload: impl FnOnce(&mut Vec<u8>)) {
        let seq = self.seq;
        self.seq += 1;
        let mut buf = self.buf.0.lock().expect("recorder buffer poisoned");
        buf.push(tag);
        buf.extend_from_slice(&seq.to_le_bytes());
        payload(&mut buf);
    }
}

fn write_axis(buf: &mut Vec<u8>, axis: SweepAxis) {
    buf.push(match axis {
        SweepAxis::Reflow => 0,
        SweepAxis::Repaint => 1,
    });
}

fn write_trigger(buf: &mut Vec<u8>, trigger: SweepTrigger) {
    buf.push(match trigger {
        SweepTrigger::Direct => 0,
        SweepTrigger::Flush => 1,
        SweepTrigger::CrossTrigger => 2,
    });
}

fn write_event_kind(buf: &mut Vec<u8>, kind: EventKind) {
    buf.push(match kind {
        EventKind::Records => 0,
        EventKind::Window => 1,
        EventKind::Viewport => 2,
        EventKind::Selection => 3,
    });
}

fn write_component(buf: &mut Vec<u8>, id: ComponentId) {
    buf.extend_from_slice(id.as_uuid().as_bytes());
}

fn write_component_kind(buf: &mut Vec<u8>, kind: ComponentKind) {
    let (tag, value) = match kind {
        ComponentKind::Frame => (0, 0),
        ComponentKind::Panel => (1, 0),
        ComponentKind::TimeAxis => (2, 0),
        ComponentKind::ItemSet => (3, 0),
        ComponentKind::Custom(value) => (4, value),
    };
    buf.push(tag);
    buf.extend_from_slice(&value.to_le_bytes());
}

fn write_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

impl TraceSink for RecorderSink {
    fn on_sweep_scheduled(&mut self, e: &SweepScheduledEvent) {
        let axis = e.axis;
        self.record(TAG_SWEEP_SCHEDULED, |buf| write_axis(buf, axis));
    }

    fn on_sweep_begin(&mut self, e: &SweepBeginEvent) {
        let (axis, trigger, components) = (e.axis, e.trigger, e.components);
        self.record(TAG_SWEEP_BEGIN, |buf| {
            write_axis(buf, axis);
            write_trigger(buf, trigger);
            write_u32(buf, u32::try_from(components).unwrap_or(u32::MAX));
        });
    }

    fn on_sweep_end(&mut self, e: &SweepEndEvent) {
        let (axis, visited, changed) = (e.axis, e.visited, e.changed);
        self.record(TAG_SWEEP_END, |buf| {
            write_axis(buf, axis);
            write_u32(buf, u32::try_from(visited).unwrap_or(u32::MAX));
            write_u32(buf, u32::try_from(changed).unwrap_or(u32::MAX));
        });
    }

    fn on_sweep_error(&mut self, e: &SweepErrorEvent) {
        let (axis, component) = (e.axis, e.component);
        self.record(TAG_SWEEP_ERROR, |buf| {
            write_axis(buf, axis);
            write_component(buf, component);
        });
    }

    fn on_cross_trigger(&mut self, e: &CrossTriggerEvent) {
        let (from, to) = (e.from, e.to);
        self.record(TAG_CROSS_TRIGGER, |buf| {
            write_axis(buf, from);
            write_axis(buf, to);
        });
    }

    fn on_event_routed(&mut self, e: &EventRoutedEvent) {
        let (kind, listeners) = (e.kind, e.listeners);
        self.record(TAG_EVENT_ROUTED, |buf| {
            write_event_kind(buf, kind);
            write_u32(buf, u32::try_from(listeners).unwrap_or(u32::MAX));
        });
    }

    fn on_registered(&mut self, e: &RegisteredEvent) {
        let (component, kind) = (e.component, e.kind);
        self.record(TAG_REGISTERED, |buf| {
            write_component(buf, component);
            write_component_kind(buf, kind);
        });
    }

    fn on_component_visit(&mut self, e: &ComponentVisitEvent) {
        let (axis, component, kind, changed) = (e.axis, e.component, e.kind, e.changed);
        self.record(TAG_COMPONENT_VISIT, |buf| {
            write_axis(buf, axis);
            write_component(buf, component);
            write_component_kind(buf, kind);
            buf.push(u8::from(changed));
        });
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// A decoded trace event, tagged with its recording sequence number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// An axis became pending.
    SweepScheduled {
        /// Recording order.
        seq: u64,
        /// The pending axis.
        axis: SweepAxis,
    },
    /// A sweep started.
    SweepBegin {
        /// Recording order.
        seq: u64,
        /// The axis being swept.
        axis: SweepAxis,
        /// Why it started.
        trigger: SweepTrigger,
        /// Registered components at sweep start.
        components: u32,
    },
    /// A sweep completed.
    SweepEnd {
        /// Recording order.
        seq: u64,
        /// The swept axis.
        axis: SweepAxis,
        /// Components visited.
        visited: u32,
        /// Components reporting a change.
        changed: u32,
    },
    /// A sweep aborted.
    SweepError {
        /// Recording order.
        seq: u64,
        /// The axis being swept.
        axis: SweepAxis,
        /// The failing component.
        component: ComponentId,
    },
    /// A sweep chained into the other axis.
    CrossTrigger {
        /// Recording order.
        seq: u64,
        /// The completed sweep's axis.
        from: SweepAxis,
        /// The chained axis.
        to: SweepAxis,
    },
    /// An event was routed.
    EventRouted {
        /// Recording order.
        seq: u64,
        /// The event category.
        kind: EventKind,
        /// Subscribers reached.
        listeners: u32,
    },
    /// A component was registered.
    Registered {
        /// Recording order.
        seq: u64,
        /// The new component.
        component: ComponentId,
        /// Its capability tag.
        kind: ComponentKind,
    },
    /// A component was visited by a sweep.
    ComponentVisit {
        /// Recording order.
        seq: u64,
        /// The axis being swept.
        axis: SweepAxis,
        /// The visited component.
        component: ComponentId,
        /// Its capability tag.
        kind: ComponentKind,
        /// The advisory change result.
        changed: bool,
    },
}

/// Decodes recorded bytes back into events.
///
/// Decoding stops at the first malformed record (e.g. a truncated
/// buffer).
pub fn decode(bytes: &[u8]) -> impl Iterator<Item = RecordedEvent> + '_ {
    Decoder { bytes, pos: 0 }
}

struct Decoder<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Decoder<'_> {
    fn take(&mut self, n: usize) -> Option<&[u8]> {
        let end = self.pos.checked_add(n)?;
        let slice = self.bytes.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }

    fn u8(&mut self) -> Option<u8> {
        self.take(1).map(|s| s[0])
    }

    fn u32(&mut self) -> Option<u32> {
        let bytes: [u8; 4] = self.take(4)?.try_into().ok()?;
        Some(u32::from_le_bytes(bytes))
    }

    fn u64(&mut self) -> Option<u64> {
        let bytes: [u8; 8] = self.take(8)?.try_into().ok()?;
        Some(u64::from_le_bytes(bytes))
    }

    fn axis(&mut self) -> Option<SweepAxis> {
        match self.u8()? {
            0 => Some(SweepAxis::Reflow),
            1 => Some(SweepAxis::Repaint),
            _ => None,
        }
    }

    fn trigger(&mut self) -> Option<SweepTrigger> {
        match self.u8()? {
            0 => Some(SweepTrigger::Direct),
            1 => Some(SweepTrigger::Flush),
            2 => Some(SweepTrigger::CrossTrigger),
            _ => None,
        }
    }

    fn event_kind(&mut self) -> Option<EventKind> {
        match self.u8()? {
            0 => Some(EventKind::Records),
            1 => Some(EventKind::Window),
            2 => Some(EventKind::Viewport),
            3 => Some(EventKind::Selection),
            _ => None,
        }
    }

    fn component(&mut self) -> Option<ComponentId> {
        let bytes: [u8; 16] = self.take(16)?.try_into().ok()?;
        Some(ComponentId::from_uuid(Uuid::from_bytes(bytes)))
    }

    fn component_kind(&mut self) -> Option<ComponentKind> {
        let tag = self.u8()?;
        let value = u16::from_le_bytes(self.take(2)?.try_into().ok()?);
        match tag {
            0 => Some(ComponentKind::Frame),
            1 => Some(ComponentKind::Panel),
            2 => Some(ComponentKind::TimeAxis),
            3 => Some(ComponentKind::ItemSet),
            4 => Some(ComponentKind::Custom(value)),
            _ => None,
        }
    }
}

impl Iterator for Decoder<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<RecordedEvent> {
        let tag = self.u8()?;
        let seq = self.u64()?;
        match tag {
            TAG_SWEEP_SCHEDULED => Some(RecordedEvent::SweepScheduled {
                seq,
                axis: self.axis()?,
            }),
            TAG_SWEEP_BEGIN => Some(RecordedEvent::SweepBegin {
                seq,
                axis: self.axis()?,
                trigger: self.trigger()?,
                components: self.u32()?,
            }),
            TAG_SWEEP_END => Some(RecordedEvent::SweepEnd {
                seq,
                axis: self.axis()?,
                visited: self.u32()?,
                changed: self.u32()?,
            }),
            TAG_SWEEP_ERROR => Some(RecordedEvent::SweepError {
                seq,
                axis: self.axis()?,
                component: self.component()?,
            }),
            TAG_CROSS_TRIGGER => Some(RecordedEvent::CrossTrigger {
                seq,
                from: self.axis()?,
                to: self.axis()?,
            }),
            TAG_EVENT_ROUTED => Some(RecordedEvent::EventRouted {
                seq,
                kind: self.event_kind()?,
                listeners: self.u32()?,
            }),
            TAG_REGISTERED => Some(RecordedEvent::Registered {
                seq,
                component: self.component()?,
                kind: self.component_kind()?,
            }),
            TAG_COMPONENT_VISIT => Some(RecordedEvent::ComponentVisit {
                seq,
                axis: self.axis()?,
                component: self.component()?,
                kind: self.component_kind()?,
                changed: self.u8()? != 0,
            }),
            _ => None,
        }
    }
}
