// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the update cycle.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! the controller calls at each stage of scheduling and sweeping. All
//! method bodies default to no-ops, so implementing only the events you
//! care about is fine.
//!
//! [`Tracer`] wraps an optional boxed sink owned by the controller. When
//! the `trace` feature is **off**, every `Tracer` method compiles to
//! nothing (zero overhead). When **on**, each method performs a single
//! `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) — gates the per-component
//!   [`ComponentVisitEvent`] plus the corresponding `TraceSink` method.

use alloc::boxed::Box;
use core::fmt;

use crate::component::{ComponentId, ComponentKind};
use crate::context::SweepAxis;
use crate::event::EventKind;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Why a sweep started.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SweepTrigger {
    /// A direct synchronous call (`Controller::repaint` / `reflow`).
    Direct,
    /// A host flush draining pending requests.
    Flush,
    /// Synchronously chained off the other axis' sweep.
    CrossTrigger,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a request transitions an axis from idle to scheduled.
///
/// Requests absorbed while already scheduled emit nothing — one event per
/// coalesced batch.
#[derive(Clone, Copy, Debug)]
pub struct SweepScheduledEvent {
    /// The axis that became pending.
    pub axis: SweepAxis,
}

/// Emitted when a sweep starts.
#[derive(Clone, Copy, Debug)]
pub struct SweepBeginEvent {
    /// The axis being swept.
    pub axis: SweepAxis,
    /// Why the sweep started.
    pub trigger: SweepTrigger,
    /// Number of registered components at sweep start.
    pub components: usize,
}

/// Emitted when a sweep completes.
#[derive(Clone, Copy, Debug)]
pub struct SweepEndEvent {
    /// The axis that was swept.
    pub axis: SweepAxis,
    /// Components visited.
    pub visited: usize,
    /// Components whose advisory result reported a change.
    pub changed: usize,
}

/// Emitted when a component fails and the sweep aborts.
#[derive(Clone, Copy, Debug)]
pub struct SweepErrorEvent {
    /// The axis being swept.
    pub axis: SweepAxis,
    /// The failing component.
    pub component: ComponentId,
}

/// Emitted when a completed sweep synchronously runs the other axis.
#[derive(Clone, Copy, Debug)]
pub struct CrossTriggerEvent {
    /// The sweep that just completed.
    pub from: SweepAxis,
    /// The axis about to run.
    pub to: SweepAxis,
}

/// Emitted after an event was routed to its subscribers.
#[derive(Clone, Copy, Debug)]
pub struct EventRoutedEvent {
    /// The event category.
    pub kind: EventKind,
    /// How many subscribers received it.
    pub listeners: usize,
}

/// Emitted when a component is registered.
#[derive(Clone, Copy, Debug)]
pub struct RegisteredEvent {
    /// The new component.
    pub component: ComponentId,
    /// Its capability tag.
    pub kind: ComponentKind,
}

/// Emitted for every component visited by a sweep.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct ComponentVisitEvent {
    /// The axis being swept.
    pub axis: SweepAxis,
    /// The visited component.
    pub component: ComponentId,
    /// Its capability tag.
    pub kind: ComponentKind,
    /// The advisory change result of the visit.
    pub changed: bool,
}

// ---------------------------------------------------------------------------
// TraceSink
// ---------------------------------------------------------------------------

/// Receives update-cycle events. All methods default to no-ops.
pub trait TraceSink {
    /// An axis transitioned from idle to scheduled.
    fn on_sweep_scheduled(&mut self, event: &SweepScheduledEvent) {
        let _ = event;
    }

    /// A sweep started.
    fn on_sweep_begin(&mut self, event: &SweepBeginEvent) {
        let _ = event;
    }

    /// A sweep completed.
    fn on_sweep_end(&mut self, event: &SweepEndEvent) {
        let _ = event;
    }

    /// A sweep aborted at a failing component.
    fn on_sweep_error(&mut self, event: &SweepErrorEvent) {
        let _ = event;
    }

    /// A sweep synchronously chained into the other axis.
    fn on_cross_trigger(&mut self, event: &CrossTriggerEvent) {
        let _ = event;
    }

    /// An event was routed to subscribers.
    fn on_event_routed(&mut self, event: &EventRoutedEvent) {
        let _ = event;
    }

    /// A component was registered.
    fn on_registered(&mut self, event: &RegisteredEvent) {
        let _ = event;
    }

    /// A component was visited by a sweep.
    #[cfg(feature = "trace-rich")]
    fn on_component_visit(&mut self, event: &ComponentVisitEvent) {
        let _ = event;
    }
}

// ---------------------------------------------------------------------------
// Tracer
// ---------------------------------------------------------------------------

/// Zero-overhead wrapper around an optional [`TraceSink`].
///
/// Owned by the controller; without the `trace` feature every method is an
/// empty inline function.
#[derive(Default)]
pub struct Tracer {
    sink: Option<Box<dyn TraceSink>>,
}

impl Tracer {
    /// Creates a tracer with no sink.
    #[must_use]
    pub fn new() -> Self {
        Self { sink: None }
    }

    /// Creates a tracer dispatching to the given sink.
    #[must_use]
    pub fn with_sink(sink: Box<dyn TraceSink>) -> Self {
        Self { sink: Some(sink) }
    }

    /// Replaces the sink, returning the previous one.
    pub fn set_sink(&mut self, sink: Option<Box<dyn TraceSink>>) -> Option<Box<dyn TraceSink>> {
        core::mem::replace(&mut self.sink, sink)
    }

    /// See [`TraceSink::on_sweep_scheduled`].
    #[inline]
    pub fn sweep_scheduled(&mut self, event: &SweepScheduledEvent) {
        #[cfg(feature = "trace")]
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.on_sweep_scheduled(event);
        }
        #[cfg(not(feature = "trace"))]
        let _ = event;
    }

    /// See [`TraceSink::on_sweep_begin`].
    #[inline]
    pub fn sweep_begin(&mut self, event: &SweepBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.on_sweep_begin(event);
        }
        #[cfg(not(feature = "trace"))]
        let _ = event;
    }

    /// See [`TraceSink::on_sweep_end`].
    #[inline]
    pub fn sweep_end(&mut self, event: &SweepEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.on_sweep_end(event);
        }
        #[cfg(not(feature = "trace"))]
        let _ = event;
    }

    /// See [`TraceSink::on_sweep_error`].
    #[inline]
    pub fn sweep_error(&mut self, event: &SweepErrorEvent) {
        #[cfg(feature = "trace")]
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.on_sweep_error(event);
        }
        #[cfg(not(feature = "trace"))]
        let _ = event;
    }

    /// See [`TraceSink::on_cross_trigger`].
    #[inline]
    pub fn cross_trigger(&mut self, event: &CrossTriggerEvent) {
        #[cfg(feature = "trace")]
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.on_cross_trigger(event);
        }
        #[cfg(not(feature = "trace"))]
        let _ = event;
    }

    /// See [`TraceSink::on_event_routed`].
    #[inline]
    pub fn event_routed(&mut self, event: &EventRoutedEvent) {
        #[cfg(feature = "trace")]
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.on_event_routed(event);
        }
        #[cfg(not(feature = "trace"))]
        let _ = event;
    }

    /// See [`TraceSink::on_registered`].
    #[inline]
    pub fn registered(&mut self, event: &RegisteredEvent) {
        #[cfg(feature = "trace")]
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.on_registered(event);
        }
        #[cfg(not(feature = "trace"))]
        let _ = event;
    }

    /// See [`TraceSink::on_component_visit`].
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn component_visit(&mut self, event: &ComponentVisitEvent) {
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.on_component_visit(event);
        }
    }
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("sink", &self.sink.is_some())
            .finish()
    }
}
