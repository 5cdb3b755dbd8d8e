// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained scene tree.
//!
//! An *element* is a node in the rendered output tree. Each element has:
//!
//! - An identity ([`ElementId`]) — a generational handle that becomes stale
//!   when the element is destroyed, preventing use-after-free bugs at the
//!   API level.
//! - Topology — parent, first-child, and sibling links forming an ordered
//!   tree; sibling order is paint order.
//! - Properties set by component repaints: a kind ([`ElementKind`]), a
//!   class string, a rect in the parent element's coordinate space,
//!   optional text, and a visibility flag.
//!
//! Elements are stored in struct-of-arrays layout with index-based handles
//! for cache-friendly traversal.
//!
//! # Change tracking
//!
//! Property mutations mark the corresponding dirty channel (see
//! [`dirty`](crate::dirty)) — but only when the value actually changed, so
//! a repaint that rewrites an unchanged property produces no downstream
//! work. [`Scene::take_changes`] drains all channels into a
//! [`SceneChanges`], which hosts apply through
//! [`Presenter::apply`](crate::host::Presenter::apply).

mod changes;
mod id;
mod store;
mod traverse;

pub use changes::SceneChanges;
pub use id::{ElementId, INVALID};
pub use store::{ElementKind, Scene};
pub use traverse::Children;
