// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per
//! event to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use varve_core::context::SweepAxis;
use varve_core::trace::{
    ComponentVisitEvent, CrossTriggerEvent, EventRoutedEvent, RegisteredEvent, SweepBeginEvent,
    SweepEndEvent, SweepErrorEvent, SweepScheduledEvent, SweepTrigger, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write)
/// destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }
}

fn axis_name(axis: SweepAxis) -> &'static str {
    match axis {
        SweepAxis::Reflow => "reflow",
        SweepAxis::Repaint => "repaint",
    }
}

fn trigger_name(trigger: SweepTrigger) -> &'static str {
    match trigger {
        SweepTrigger::Direct => "direct",
        SweepTrigger::Flush => "flush",
        SweepTrigger::CrossTrigger => "cross",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_sweep_scheduled(&mut self, e: &SweepScheduledEvent) {
        let _ = writeln!(self.writer, "[schedule] {}", axis_name(e.axis));
    }

    fn on_sweep_begin(&mut self, e: &SweepBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[sweep:begin] {} trigger={} components={}",
            axis_name(e.axis),
            trigger_name(e.trigger),
            e.components,
        );
    }

    fn on_sweep_end(&mut self, e: &SweepEndEvent) {
        let _ = writeln!(
            self.writer,
            "[sweep:end] {} visited={} changed={}",
            axis_name(e.axis),
            e.visited,
            e.changed,
        );
    }

    fn on_sweep_error(&mut self, e: &SweepErrorEvent) {
        let _ = writeln!(
            self.writer,
            "[sweep:abort] {} at {:?}",
            axis_name(e.axis),
            e.component,
        );
    }

    fn on_cross_trigger(&mut self, e: &CrossTriggerEvent) {
        let _ = writeln!(
            self.writer,
            "[cross] {} -> {}",
            axis_name(e.from),
            axis_name(e.to),
        );
    }

    fn on_event_routed(&mut self, e: &EventRoutedEvent) {
        let _ = writeln!(
            self.writer,
            "[route] {:?} listeners={}",
            e.kind, e.listeners,
        );
    }

    fn on_registered(&mut self, e: &RegisteredEvent) {
        let _ = writeln!(
            self.writer,
            "[register] {:?} kind={:?}",
            e.component, e.kind,
        );
    }

    fn on_component_visit(&mut self, e: &ComponentVisitEvent) {
        let _ = writeln!(
            self.writer,
            "[visit] {} {:?} kind={:?} changed={}",
            axis_name(e.axis),
            e.component,
            e.kind,
            e.changed,
        );
    }
}
