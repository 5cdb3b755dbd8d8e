// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Varve uses named dirty channels (via [`understory_dirty`]) in two
//! places: the [`Scene`](crate::scene::Scene) marks property channels when
//! elements are mutated, and the
//! [`Controller`](crate::controller::Controller) mirrors its dependency
//! relation onto the [`ORDER`] channel so cycles are rejected when edges
//! are inserted.
//!
//! # Semantics
//!
//! - **Scene property channels** — [`GEOMETRY`], [`CONTENT`], and
//!   [`VISIBILITY`] are local-only: rects are stored in parent-relative
//!   coordinates exactly as given and the scene computes no inherited
//!   properties, so only the mutated element appears in the drain output.
//!   Setters compare before marking, so unchanged writes do not surface
//!   in [`SceneChanges`](crate::scene::SceneChanges).
//!
//! - **Structural** — [`TOPOLOGY`] is marked on topology mutations
//!   (create/destroy element, attach/detach). It triggers a draw-order
//!   rebuild on the next drain but does not propagate.
//!
//! - **Ordering** — [`ORDER`] carries no dirty state at all. The
//!   controller inserts one edge per `depends_on` entry and per `parent`
//!   link with [`CycleHandling::Error`](understory_dirty::CycleHandling),
//!   turning a would-be dependency cycle into a synchronous registration
//!   failure instead of an unbounded traversal.

use understory_dirty::Channel;

/// Element rect changed.
pub const GEOMETRY: Channel = Channel::new(0);

/// Element text or class changed.
pub const CONTENT: Channel = Channel::new(1);

/// Element visibility flag changed.
pub const VISIBILITY: Channel = Channel::new(2);

/// Tree topology changed — triggers a draw-order rebuild.
pub const TOPOLOGY: Channel = Channel::new(3);

/// Component dependency edges — used for cycle rejection only.
pub const ORDER: Channel = Channel::new(4);
