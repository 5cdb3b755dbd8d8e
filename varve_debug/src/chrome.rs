// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a
//! [`RecorderSink`](crate::recorder::RecorderSink) and writes
//! [Chrome Trace Event Format][spec] JSON to the given writer, suitable
//! for loading into `chrome://tracing` or
//! [Perfetto](https://ui.perfetto.dev/).
//!
//! The core carries no clock, so event sequence numbers stand in for
//! microsecond timestamps: durations are meaningless, but nesting and
//! ordering (sweeps, cross-triggers, per-component visits) render
//! faithfully.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::SweepScheduled { seq, axis } => {
                events.push(json!({
                    "ph": "i",
                    "name": "SweepScheduled",
                    "cat": "Scheduler",
                    "ts": seq,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": { "axis": format!("{axis:?}") }
                }));
            }
            RecordedEvent::SweepBegin {
                seq,
                axis,
                trigger,
                components,
            } => {
                events.push(json!({
                    "ph": "B",
                    "name": format!("{axis:?}"),
                    "cat": "Sweep",
                    "ts": seq,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "trigger": format!("{trigger:?}"),
                        "components": components,
                    }
                }));
            }
            RecordedEvent::SweepEnd {
                seq,
                axis,
                visited,
                changed,
            } => {
                events.push(json!({
                    "ph": "E",
                    "name": format!("{axis:?}"),
                    "cat": "Sweep",
                    "ts": seq,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "visited": visited,
                        "changed": changed,
                    }
                }));
            }
            RecordedEvent::SweepError {
                seq,
                axis,
                component,
            } => {
                events.push(json!({
                    "ph": "i",
                    "name": "SweepError",
                    "cat": "Sweep",
                    "ts": seq,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "axis": format!("{axis:?}"),
                        "component": format!("{component:?}"),
                    }
                }));
            }
            RecordedEvent::CrossTrigger { seq, from, to } => {
                events.push(json!({
                    "ph": "i",
                    "name": "CrossTrigger",
                    "cat": "Scheduler",
                    "ts": seq,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "from": format!("{from:?}"),
                        "to": format!("{to:?}"),
                    }
                }));
            }
            RecordedEvent::EventRouted {
                seq,
                kind,
                listeners,
            } => {
                events.push(json!({
                    "ph": "i",
                    "name": "EventRouted",
                    "cat": "Events",
                    "ts": seq,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "kind": format!("{kind:?}"),
                        "listeners": listeners,
                    }
                }));
            }
            RecordedEvent::Registered {
                seq,
                component,
                kind,
            } => {
                events.push(json!({
                    "ph": "i",
                    "name": "Registered",
                    "cat": "Registry",
                    "ts": seq,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "component": format!("{component:?}"),
                        "kind": format!("{kind:?}"),
                    }
                }));
            }
            RecordedEvent::ComponentVisit {
                seq,
                axis,
                component,
                kind,
                changed,
            } => {
                events.push(json!({
                    "ph": "i",
                    "name": "ComponentVisit",
                    "cat": "Sweep",
                    "ts": seq,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "axis": format!("{axis:?}"),
                        "component": format!("{component:?}"),
                        "kind": format!("{kind:?}"),
                        "changed": changed,
                    }
                }));
            }
        }
    }

    serde_json::to_writer(&mut *writer, &events)?;
    Ok(())
}
