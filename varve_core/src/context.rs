// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sweep contexts: what a component can see and do while being visited.
//!
//! The controller exclusively owns the registry, the geometry table, and
//! the scene. During a sweep it lends each component a context scoped to
//! that visit: read access to the geometry of every component (dependency
//! order guarantees that dependencies and parents were measured first, so
//! those reads are coherent), read access to the shared
//! [`Environment`], registry capability queries, and — for repaints only —
//! mutable access to the scene. Components never hold a controller
//! reference; further work is requested through the context and coalesced
//! by the controller after the visit.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Rect, Size};

use crate::component::{ComponentId, ComponentKind};
use crate::host::TextMetrics;
use crate::scene::{ElementId, Scene};
use crate::time::TimeWindow;

/// Which sweep phase is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SweepAxis {
    /// The measure phase.
    Reflow,
    /// The mutate phase.
    Repaint,
}

impl SweepAxis {
    /// Returns the opposite axis.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Reflow => Self::Repaint,
            Self::Repaint => Self::Reflow,
        }
    }
}

/// A pair of pending-sweep flags.
///
/// Used both as the controller's `Scheduled` state and as the request
/// accumulator handed to components. Setting a flag that is already set is
/// a no-op — that is the coalescing guarantee.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepRequests {
    reflow: bool,
    repaint: bool,
}

impl SweepRequests {
    /// Requests a reflow sweep.
    pub fn request_reflow(&mut self) {
        self.reflow = true;
    }

    /// Requests a repaint sweep.
    pub fn request_repaint(&mut self) {
        self.repaint = true;
    }

    /// Requests a sweep on the given axis.
    pub fn request(&mut self, axis: SweepAxis) {
        match axis {
            SweepAxis::Reflow => self.reflow = true,
            SweepAxis::Repaint => self.repaint = true,
        }
    }

    /// Returns whether the given axis is requested.
    #[must_use]
    pub fn is_requested(self, axis: SweepAxis) -> bool {
        match axis {
            SweepAxis::Reflow => self.reflow,
            SweepAxis::Repaint => self.repaint,
        }
    }

    /// Returns whether any axis is requested.
    #[must_use]
    pub fn any(self) -> bool {
        self.reflow || self.repaint
    }

    /// Clears the given axis.
    pub(crate) fn clear(&mut self, axis: SweepAxis) {
        match axis {
            SweepAxis::Reflow => self.reflow = false,
            SweepAxis::Repaint => self.repaint = false,
        }
    }

    /// Absorbs another request set.
    pub(crate) fn merge(&mut self, other: Self) {
        self.reflow |= other.reflow;
        self.repaint |= other.repaint;
    }
}

/// Where the time axis sits, which also flips how items stack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Axis along the top edge.
    Top,
    /// Axis along the bottom edge.
    #[default]
    Bottom,
}

/// Shared, read-only state every sweep sees.
///
/// Owned by the embedding application and passed into each controller
/// sweep; components read it through their context.
pub struct Environment<'a> {
    /// The visible time window.
    pub window: TimeWindow,
    /// The size of the host viewport the root frame fills.
    pub viewport: Size,
    /// Where the axis sits.
    pub orientation: Orientation,
    /// Host-provided text measurement.
    pub metrics: &'a dyn TextMetrics,
}

impl fmt::Debug for Environment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("window", &self.window)
            .field("viewport", &self.viewport)
            .field("orientation", &self.orientation)
            .finish_non_exhaustive()
    }
}

/// Read access to the registry's identity and capability tables.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RegistryView<'a> {
    pub(crate) ids: &'a [ComponentId],
    pub(crate) kinds: &'a [ComponentKind],
    pub(crate) index: &'a BTreeMap<ComponentId, usize>,
}

impl RegistryView<'_> {
    fn find(&self, kind: ComponentKind) -> Vec<ComponentId> {
        self.ids
            .iter()
            .zip(self.kinds)
            .filter(|(_, k)| **k == kind)
            .map(|(id, _)| *id)
            .collect()
    }
}

/// The context handed to a component's `reflow`.
pub struct LayoutContext<'a> {
    pub(crate) id: ComponentId,
    pub(crate) bounds: Rect,
    pub(crate) parent: Option<ComponentId>,
    pub(crate) parent_bounds: Option<Rect>,
    pub(crate) parent_container: Option<ElementId>,
    pub(crate) geometry: &'a [Rect],
    pub(crate) registry: RegistryView<'a>,
    pub(crate) scene: &'a Scene,
    pub(crate) env: &'a Environment<'a>,
    pub(crate) requests: &'a mut SweepRequests,
}

impl LayoutContext<'_> {
    /// Returns the id of the component being visited.
    #[must_use]
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Returns the component's current bounds (the previous reflow's
    /// result).
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Returns the configured parent, if any.
    #[must_use]
    pub fn parent(&self) -> Option<ComponentId> {
        self.parent
    }

    /// Returns the parent's bounds, if a parent is configured.
    ///
    /// The parent was visited earlier in this sweep, so the value is
    /// current.
    #[must_use]
    pub fn parent_bounds(&self) -> Option<Rect> {
        self.parent_bounds
    }

    /// Returns the parent's container element, if the parent exposes one.
    #[must_use]
    pub fn parent_container(&self) -> Option<ElementId> {
        self.parent_container
    }

    /// Returns the bounds of another registered component.
    ///
    /// Coherent for dependencies and ancestors (visited earlier in this
    /// sweep); other components may still carry last-sweep values.
    #[must_use]
    pub fn bounds_of(&self, id: ComponentId) -> Option<Rect> {
        self.registry.index.get(&id).map(|&idx| self.geometry[idx])
    }

    /// Returns every registered component of the given kind, in
    /// registration order.
    #[must_use]
    pub fn find(&self, kind: ComponentKind) -> Vec<ComponentId> {
        self.registry.find(kind)
    }

    /// Returns the scene, read-only. Reflow measures; it does not mutate.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        self.scene
    }

    /// Returns the shared environment.
    #[must_use]
    pub fn env(&self) -> &Environment<'_> {
        self.env
    }

    /// Requests a repaint sweep once this sweep completes.
    pub fn request_repaint(&mut self) {
        self.requests.request_repaint();
    }

    /// Requests another reflow sweep once this sweep completes.
    pub fn request_reflow(&mut self) {
        self.requests.request_reflow();
    }
}

impl fmt::Debug for LayoutContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutContext")
            .field("id", &self.id)
            .field("bounds", &self.bounds)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

/// The context handed to a component's `repaint`.
pub struct PaintContext<'a> {
    pub(crate) id: ComponentId,
    pub(crate) bounds: Rect,
    pub(crate) parent: Option<ComponentId>,
    pub(crate) parent_bounds: Option<Rect>,
    pub(crate) parent_container: Option<ElementId>,
    pub(crate) geometry: &'a [Rect],
    pub(crate) registry: RegistryView<'a>,
    pub(crate) scene: &'a mut Scene,
    pub(crate) env: &'a Environment<'a>,
    pub(crate) requests: &'a mut SweepRequests,
}

impl PaintContext<'_> {
    /// Returns the id of the component being visited.
    #[must_use]
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Returns the component's current bounds.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Returns the configured parent, if any.
    #[must_use]
    pub fn parent(&self) -> Option<ComponentId> {
        self.parent
    }

    /// Returns the parent's bounds, if a parent is configured.
    #[must_use]
    pub fn parent_bounds(&self) -> Option<Rect> {
        self.parent_bounds
    }

    /// Returns the parent's container element, if the parent exposes one.
    #[must_use]
    pub fn parent_container(&self) -> Option<ElementId> {
        self.parent_container
    }

    /// Returns the bounds of another registered component.
    #[must_use]
    pub fn bounds_of(&self, id: ComponentId) -> Option<Rect> {
        self.registry.index.get(&id).map(|&idx| self.geometry[idx])
    }

    /// Returns every registered component of the given kind, in
    /// registration order.
    #[must_use]
    pub fn find(&self, kind: ComponentKind) -> Vec<ComponentId> {
        self.registry.find(kind)
    }

    /// Returns the scene for mutation.
    #[must_use]
    pub fn scene(&mut self) -> &mut Scene {
        &mut *self.scene
    }

    /// Returns the shared environment.
    #[must_use]
    pub fn env(&self) -> &Environment<'_> {
        self.env
    }

    /// Requests a reflow sweep once this sweep completes.
    pub fn request_reflow(&mut self) {
        self.requests.request_reflow();
    }

    /// Requests another repaint sweep once this sweep completes.
    pub fn request_repaint(&mut self) {
        self.requests.request_repaint();
    }
}

impl fmt::Debug for PaintContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaintContext")
            .field("id", &self.id)
            .field("bounds", &self.bounds)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}
