// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for varve
//! diagnostics.
//!
//! This crate provides [`TraceSink`](varve_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`] — human-readable one-line-per-event
//!   output.
//! - [`recorder::RecorderSink`] — compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`] — writes Chrome Trace Event Format JSON from
//!   recorded bytes.
//!
//! Varve's core is sans-io and carries no clock, so recorded events are
//! ordered by a per-recording sequence number rather than timestamps.

pub mod chrome;
pub mod pretty;
pub mod recorder;
