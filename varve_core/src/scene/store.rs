// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays element storage with allocation, topology, and property
//! management.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use understory_dirty::DirtyTracker;

use super::id::{ElementId, INVALID};
use super::traverse::Children;
use crate::dirty;

/// What an element renders as.
///
/// The kind is fixed at creation; hosts use it to pick the native node or
/// draw primitive for a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// An invisible container for other elements.
    Group,
    /// A filled rectangle (item boxes, range blocks).
    Block,
    /// A thin rule (grid lines, item connectors, the axis line).
    Line,
    /// A text run.
    Label,
    /// A small marker dot.
    Dot,
}

/// Struct-of-arrays storage for all elements of one rendered document.
///
/// Elements are addressed by [`ElementId`] handles. Internally, each
/// element occupies a slot in parallel arrays. Destroyed elements are
/// recycled via a free list, and generation counters prevent stale handle
/// access.
#[derive(Debug)]
pub struct Scene {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Properties (set by component repaints) --
    pub(crate) kind: Vec<ElementKind>,
    pub(crate) class: Vec<String>,
    pub(crate) rect: Vec<Rect>,
    pub(crate) text: Vec<Option<String>>,
    pub(crate) visible: Vec<bool>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Change tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Draw-order cache --
    pub(crate) draw_order: Vec<u32>,
    pub(crate) order_dirty: bool,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            kind: Vec::new(),
            class: Vec::new(),
            rect: Vec::new(),
            text: Vec::new(),
            visible: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::new(),
            draw_order: Vec::new(),
            order_dirty: true,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Creates a new element of the given kind and returns its handle.
    ///
    /// The element starts detached, visible, with an empty class, a zero
    /// rect, and no text.
    pub fn create_element(&mut self, kind: ElementKind) -> ElementId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.generation[idx as usize] += 1;
            self.parent[idx as usize] = INVALID;
            self.first_child[idx as usize] = INVALID;
            self.next_sibling[idx as usize] = INVALID;
            self.prev_sibling[idx as usize] = INVALID;
            self.kind[idx as usize] = kind;
            self.class[idx as usize] = String::new();
            self.rect[idx as usize] = Rect::ZERO;
            self.text[idx as usize] = None;
            self.visible[idx as usize] = true;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.kind.push(kind);
            self.class.push(String::new());
            self.rect.push(Rect::ZERO);
            self.text.push(None);
            self.visible.push(true);
            self.generation.push(0);
            idx
        };

        self.order_dirty = true;
        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);

        ElementId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys an element, freeing its slot for reuse.
    ///
    /// # Panics
    ///
    /// Panics if the element has children (remove them first) or if the
    /// handle is stale.
    pub fn destroy_element(&mut self, id: ElementId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy element with children"
        );

        // Remove from parent's child list if attached.
        if self.parent[idx as usize] != INVALID {
            self.unlink_from_parent(idx);
        }

        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;

        self.free_list.push(idx);
        self.order_dirty = true;
        self.pending_removed.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
    }

    /// Returns whether the given handle refers to a live element.
    #[must_use]
    pub fn is_alive(&self, id: ElementId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    // -- Topology API --

    /// Appends `child` as the last child of `parent`.
    ///
    /// Sibling order is paint order, so later children paint on top.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `child` already has a
    /// parent.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );

        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }

        self.order_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Removes `child` from its current parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the element has no parent.
    pub fn remove_from_parent(&mut self, child: ElementId) {
        self.validate(child);
        let c = child.idx;
        assert!(self.parent[c as usize] != INVALID, "element has no parent");

        let p = self.parent[c as usize];
        self.unlink_from_parent(c);

        self.order_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Returns the parent of an element, if any.
    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        if p == INVALID {
            None
        } else {
            Some(ElementId {
                idx: p,
                generation: self.generation[p as usize],
            })
        }
    }

    /// Returns an iterator over the direct children of an element.
    #[must_use]
    pub fn children(&self, id: ElementId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns the detached root elements (those with no parent).
    #[must_use]
    pub fn roots(&self) -> Vec<ElementId> {
        let mut roots = Vec::new();
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                roots.push(ElementId {
                    idx,
                    generation: self.generation[idx as usize],
                });
            }
        }
        roots
    }

    // -- Property getters --

    /// Returns the kind of an element.
    #[must_use]
    pub fn kind(&self, id: ElementId) -> ElementKind {
        self.validate(id);
        self.kind[id.idx as usize]
    }

    /// Returns the class of an element.
    #[must_use]
    pub fn class(&self, id: ElementId) -> &str {
        self.validate(id);
        &self.class[id.idx as usize]
    }

    /// Returns the rect of an element.
    #[must_use]
    pub fn rect(&self, id: ElementId) -> Rect {
        self.validate(id);
        self.rect[id.idx as usize]
    }

    /// Returns the text of an element, if any.
    #[must_use]
    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.validate(id);
        self.text[id.idx as usize].as_deref()
    }

    /// Returns whether an element is visible.
    #[must_use]
    pub fn visible(&self, id: ElementId) -> bool {
        self.validate(id);
        self.visible[id.idx as usize]
    }

    // -- Mutation API (marks change channels on actual change) --

    /// Sets the class of an element. Returns whether the value changed.
    pub fn set_class(&mut self, id: ElementId, class: &str) -> bool {
        self.validate(id);
        if self.class[id.idx as usize] == class {
            return false;
        }
        self.class[id.idx as usize] = String::from(class);
        self.dirty.mark(id.idx, dirty::CONTENT);
        true
    }

    /// Sets the rect of an element. Returns whether the value changed.
    pub fn set_rect(&mut self, id: ElementId, rect: Rect) -> bool {
        self.validate(id);
        if self.rect[id.idx as usize] == rect {
            return false;
        }
        self.rect[id.idx as usize] = rect;
        self.dirty.mark(id.idx, dirty::GEOMETRY);
        true
    }

    /// Sets the text of an element. Returns whether the value changed.
    pub fn set_text(&mut self, id: ElementId, text: &str) -> bool {
        self.validate(id);
        if self.text[id.idx as usize].as_deref() == Some(text) {
            return false;
        }
        self.text[id.idx as usize] = Some(String::from(text));
        self.dirty.mark(id.idx, dirty::CONTENT);
        true
    }

    /// Sets the visibility of an element. Returns whether the value
    /// changed.
    pub fn set_visible(&mut self, id: ElementId, visible: bool) -> bool {
        self.validate(id);
        if self.visible[id.idx as usize] == visible {
            return false;
        }
        self.visible[id.idx as usize] = visible;
        self.dirty.mark(id.idx, dirty::VISIBILITY);
        true
    }

    // -- Raw-index accessors for presenters --
    //
    // These accept raw slot indices (as found in `SceneChanges`) rather
    // than `ElementId` handles, skipping generation validation. Only use
    // with indices that came from `SceneChanges` or `draw_order()`.

    /// Returns the kind at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= slot count`.
    #[must_use]
    pub fn kind_at(&self, idx: u32) -> ElementKind {
        self.check_slot(idx);
        self.kind[idx as usize]
    }

    /// Returns the class at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= slot count`.
    #[must_use]
    pub fn class_at(&self, idx: u32) -> &str {
        self.check_slot(idx);
        &self.class[idx as usize]
    }

    /// Returns the rect at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= slot count`.
    #[must_use]
    pub fn rect_at(&self, idx: u32) -> Rect {
        self.check_slot(idx);
        self.rect[idx as usize]
    }

    /// Returns the text at raw slot `idx`, if any.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= slot count`.
    #[must_use]
    pub fn text_at(&self, idx: u32) -> Option<&str> {
        self.check_slot(idx);
        self.text[idx as usize].as_deref()
    }

    /// Returns the visibility at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= slot count`.
    #[must_use]
    pub fn visible_at(&self, idx: u32) -> bool {
        self.check_slot(idx);
        self.visible[idx as usize]
    }

    /// Returns the parent slot at raw slot `idx`, or `None` for roots.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= slot count`.
    #[must_use]
    pub fn parent_at(&self, idx: u32) -> Option<u32> {
        self.check_slot(idx);
        let p = self.parent[idx as usize];
        if p == INVALID { None } else { Some(p) }
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: ElementId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale ElementId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    fn check_slot(&self, idx: u32) {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
    }

    /// Removes `idx` from its parent's child list without touching change
    /// state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn create_and_destroy() {
        let mut scene = Scene::new();
        let id = scene.create_element(ElementKind::Group);
        assert!(scene.is_alive(id));
        scene.destroy_element(id);
        assert!(!scene.is_alive(id));
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut scene = Scene::new();
        let id1 = scene.create_element(ElementKind::Block);
        scene.destroy_element(id1);
        let id2 = scene.create_element(ElementKind::Label);
        // id2 reuses the same slot but has a different generation.
        assert!(!scene.is_alive(id1));
        assert!(scene.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
        assert_eq!(scene.kind(id2), ElementKind::Label);
    }

    #[test]
    fn append_child_and_query() {
        let mut scene = Scene::new();
        let parent = scene.create_element(ElementKind::Group);
        let a = scene.create_element(ElementKind::Line);
        let b = scene.create_element(ElementKind::Line);

        scene.append_child(parent, a);
        scene.append_child(parent, b);

        assert_eq!(scene.parent(a), Some(parent));
        assert_eq!(scene.parent(b), Some(parent));

        let kids: Vec<_> = scene.children(parent).collect();
        assert_eq!(kids, vec![a, b]);
    }

    #[test]
    fn remove_and_reappend_moves_to_end() {
        let mut scene = Scene::new();
        let parent = scene.create_element(ElementKind::Group);
        let a = scene.create_element(ElementKind::Line);
        let b = scene.create_element(ElementKind::Line);
        scene.append_child(parent, a);
        scene.append_child(parent, b);

        // The axis line uses this to stay on top of all tick elements.
        scene.remove_from_parent(a);
        scene.append_child(parent, a);

        let kids: Vec<_> = scene.children(parent).collect();
        assert_eq!(kids, vec![b, a]);
    }

    #[test]
    fn roots_returns_detached_elements() {
        let mut scene = Scene::new();
        let a = scene.create_element(ElementKind::Group);
        let b = scene.create_element(ElementKind::Group);
        let c = scene.create_element(ElementKind::Block);
        scene.append_child(a, c);

        let roots = scene.roots();
        assert!(roots.contains(&a));
        assert!(roots.contains(&b));
        assert!(!roots.contains(&c));
    }

    #[test]
    fn setters_report_actual_change() {
        let mut scene = Scene::new();
        let id = scene.create_element(ElementKind::Label);

        assert!(scene.set_text(id, "09:30"));
        assert!(!scene.set_text(id, "09:30"), "unchanged write");
        assert!(scene.set_text(id, "09:45"));

        assert!(scene.set_class(id, "text minor"));
        assert!(!scene.set_class(id, "text minor"));

        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(scene.set_rect(id, r));
        assert!(!scene.set_rect(id, r));

        assert!(scene.set_visible(id, false));
        assert!(!scene.set_visible(id, false));
    }

    #[test]
    #[should_panic(expected = "cannot destroy element with children")]
    fn destroy_with_children_panics() {
        let mut scene = Scene::new();
        let parent = scene.create_element(ElementKind::Group);
        let child = scene.create_element(ElementKind::Dot);
        scene.append_child(parent, child);
        scene.destroy_element(parent);
    }

    #[test]
    #[should_panic(expected = "stale ElementId")]
    fn destroyed_handle_panics_on_set_rect() {
        let mut scene = Scene::new();
        let id = scene.create_element(ElementKind::Block);
        scene.destroy_element(id);
        let _ = scene.set_rect(id, Rect::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    #[should_panic(expected = "child already has a parent")]
    fn double_append_panics() {
        let mut scene = Scene::new();
        let p1 = scene.create_element(ElementKind::Group);
        let p2 = scene.create_element(ElementKind::Group);
        let child = scene.create_element(ElementKind::Dot);
        scene.append_child(p1, child);
        scene.append_child(p2, child);
    }
}
