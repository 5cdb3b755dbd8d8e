// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timeline components for the varve engine.
//!
//! This crate provides the concrete visual components that implement the
//! [`Component`](varve_core::component::Component) contract from
//! `varve_core`, plus the [`Timeline`](timeline::Timeline) facade that
//! wires them together:
//!
//! - [`frame::Frame`] — the root container, sized against the host
//!   viewport; every other component nests inside it.
//! - [`panel::Panel`] — a nested container with extent options resolved
//!   against its parent.
//! - [`time_axis::TimeAxis`] — the horizontal axis with minor/major tick
//!   lines and labels, backed by the calendar stepping in
//!   [`time_axis::TimeStep`].
//! - [`item_set::ItemSet`] — mirrors a record store through change events
//!   into rendered [`item::Item`]s (boxes, points, ranges).
//! - [`timeline::Timeline`] — owns a controller, scene, and record set
//!   and exposes the embedding API.
//!
//! Components here follow a shared division of labor: `repaint` creates
//! and positions scene elements from current options and geometry, and
//! `reflow` measures the result, requesting the opposite phase whenever
//! it discovers work for it. The controller coalesces those requests and
//! settles the tree over a small number of bounded sweep chains.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod frame;
pub mod item;
pub mod item_set;
pub mod panel;
pub mod time_axis;
pub mod timeline;

pub use frame::Frame;
pub use item_set::ItemSet;
pub use panel::Panel;
pub use time_axis::TimeAxis;
pub use timeline::{Timeline, TimelineConfig, TimelineError};
