// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change draining and draw-order maintenance.
//!
//! Draining follows a per-channel pattern:
//!
//! 1. **GEOMETRY** / **CONTENT** / **VISIBILITY** — Drain dirty indices
//!    into the corresponding change list (no recomputation; presenters
//!    read the current values directly from the scene).
//! 2. **TOPOLOGY** — Drain and discard (the draw order was already
//!    rebuilt at the start of the drain if needed).
//!
//! [`SceneChanges`] uses raw slot indices (`u32`) rather than
//! [`ElementId`] handles so that presenters can index directly into the
//! scene's SoA arrays via the `*_at()` accessors (e.g.
//! [`rect_at`](super::Scene::rect_at)) without paying for generation
//! checks on every access.
//!
//! [`ElementId`]: super::ElementId

use alloc::vec::Vec;

use super::id::INVALID;
use super::store::Scene;
use crate::dirty;

/// The set of changes produced by a single [`Scene::take_changes`] call.
///
/// Each field contains the raw slot indices of elements that changed in
/// the corresponding category. Presenters use these to apply incremental
/// updates.
#[derive(Clone, Debug, Default)]
pub struct SceneChanges {
    /// Elements created since the last drain.
    pub added: Vec<u32>,
    /// Elements destroyed since the last drain.
    pub removed: Vec<u32>,
    /// Elements whose rect changed.
    pub geometry: Vec<u32>,
    /// Elements whose text or class changed.
    pub content: Vec<u32>,
    /// Elements whose visibility changed.
    pub visibility: Vec<u32>,
    /// Whether the tree topology changed (draw order was rebuilt).
    pub order_changed: bool,
}

impl SceneChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.added.clear();
        self.removed.clear();
        self.geometry.clear();
        self.content.clear();
        self.visibility.clear();
        self.order_changed = false;
    }

    /// Returns whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.geometry.is_empty()
            && self.content.is_empty()
            && self.visibility.is_empty()
            && !self.order_changed
    }
}

impl Scene {
    /// Drains all accumulated changes and returns them.
    ///
    /// This rebuilds the draw order if topology changed, then drains each
    /// dirty channel into the corresponding change list.
    pub fn take_changes(&mut self) -> SceneChanges {
        let mut changes = SceneChanges::default();
        self.take_changes_into(&mut changes);
        changes
    }

    /// Like [`take_changes`](Self::take_changes), but reuses a
    /// caller-provided buffer to avoid allocation.
    pub fn take_changes_into(&mut self, changes: &mut SceneChanges) {
        changes.clear();

        // Rebuild draw order if needed.
        if self.order_dirty {
            self.rebuild_draw_order();
            changes.order_changed = true;
            self.order_dirty = false;
        }

        changes.geometry = self
            .dirty
            .drain(dirty::GEOMETRY)
            .deterministic()
            .run()
            .collect();

        changes.content = self
            .dirty
            .drain(dirty::CONTENT)
            .deterministic()
            .run()
            .collect();

        changes.visibility = self
            .dirty
            .drain(dirty::VISIBILITY)
            .deterministic()
            .run()
            .collect();

        // Drain TOPOLOGY (just consume, changes are structural).
        let _: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();

        // Move lifecycle lists.
        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }

    /// Returns the current draw order (depth-first pre-order, siblings in
    /// paint order).
    ///
    /// Only valid after [`take_changes`](Self::take_changes) has been
    /// called at least once.
    #[must_use]
    pub fn draw_order(&self) -> &[u32] {
        &self.draw_order
    }

    /// Rebuilds the depth-first pre-order traversal of all live elements.
    fn rebuild_draw_order(&mut self) {
        self.draw_order.clear();
        // Start from roots.
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                self.dfs_collect(idx);
            }
        }
    }

    /// Depth-first pre-order collection starting from `idx`.
    fn dfs_collect(&mut self, idx: u32) {
        self.draw_order.push(idx);
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            self.dfs_collect(child);
            child = self.next_sibling[child as usize];
        }
    }
}
