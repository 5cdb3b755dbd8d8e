// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scheduling core and retained scene tree for the varve timeline engine.
//!
//! `varve_core` provides the machinery that keeps a rendered timeline in
//! sync with its data: a registry of visual components, a scheduler that
//! coalesces update requests into batched measure/mutate sweeps, and a
//! retained scene tree with incremental change tracking. It is `no_std`
//! compatible (with `alloc`) and sans-io: the embedding host owns the event
//! loop and drives the controller from it.
//!
//! # Architecture
//!
//! The crate is organized around a two-phase update cycle that turns data
//! and layout changes into incremental scene updates:
//!
//! ```text
//!   Host (loop turn / data mutation)
//!       │
//!       ▼
//!   Controller::request_reflow / request_repaint   (coalesced)
//!       │
//!       ▼
//!   Controller::flush ──► reflow sweep (measure) ──► repaint sweep (mutate)
//!                              │    dependency-ordered, cross-triggered    │
//!                              └────────────────┬───────────────────────────┘
//!                                               ▼
//!   Scene::take_changes() ──► SceneChanges ──► Presenter::apply()
//! ```
//!
//! **[`component`]** — The [`Component`](component::Component) contract:
//! identity, parent and dependency wiring, and the `reflow`/`repaint`
//! override surface implemented by concrete widgets.
//!
//! **[`controller`]** — The scheduler. Owns the component registry, absorbs
//! repeated requests into single pending sweeps, and runs dependency-ordered
//! reflow/repaint sweeps with a bounded synchronous cross-trigger between
//! the two axes.
//!
//! **[`scene`]** — Retained element tree with generational handles and
//! per-channel change tracking via `understory_dirty`. Components repaint
//! into the scene; hosts drain [`SceneChanges`](scene::SceneChanges).
//!
//! **[`records`]** — The typed record store whose drainable changelog is
//! the subscribe-on-change contract consumed by the scheduling core.
//!
//! **[`event`]** — Event routing between the host and subscribed
//! components (data changes, window moves, viewport resizes).
//!
//! **[`time`]** — Millisecond time primitives, the visible window, and the
//! linear screen/time conversion.
//!
//! **[`options`]** — The configuration bag merged by `configure`, with
//! typed cross-cutting keys and an opaque remainder.
//!
//! **[`host`]** — The [`Presenter`](host::Presenter) and
//! [`TextMetrics`](host::TextMetrics) traits that embedding platforms
//! implement.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types
//! for sweep instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-component
//!   sweep visit events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod component;
pub mod context;
pub mod controller;
pub mod dirty;
pub mod event;
pub mod host;
pub mod options;
pub mod records;
pub mod scene;
pub mod time;
pub mod trace;
