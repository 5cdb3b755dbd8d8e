// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timeline items: the per-record visuals managed by an
//! [`ItemSet`](crate::item_set::ItemSet).
//!
//! Items are not registered components — the item set owns them outright
//! and paints them inside its own sweep visit. Each item renders as one
//! of three shapes, chosen per record:
//!
//! - **Box** — a labeled box above the axis, tied to its instant by a
//!   vertical line and a dot on the axis.
//! - **Point** — a dot on the axis with the label beside it.
//! - **Range** — a labeled block spanning from start to end.
//!
//! An item keeps its scene elements across repaints and rebuilds them
//! only when its shape changes; everything else is incremental property
//! updates, which the scene ignores when the value is unchanged.

use alloc::format;
use alloc::string::String;

use kurbo::Rect;

use varve_core::records::{ItemShape, TimelineRecord};
use varve_core::scene::{ElementId, ElementKind, Scene};
use varve_core::time::{TimePoint, TimeScale};

/// Fixed part of the item geometry, supplied by the item set per repaint.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ItemLayout {
    /// Height of the item area.
    pub(crate) area_height: f64,
    /// Vertical position of the axis edge within the item area: the
    /// bottom for a bottom axis, the top for a top axis.
    pub(crate) axis_at_top: bool,
    /// Line height of item labels.
    pub(crate) char_height: f64,
    /// Character width used to size labels.
    pub(crate) char_width: f64,
}

impl ItemLayout {
    /// The y coordinate of the axis edge.
    fn edge(&self) -> f64 {
        if self.axis_at_top { 0.0 } else { self.area_height }
    }

    /// Label/box height for this layout.
    fn box_height(&self) -> f64 {
        self.char_height + 8.0
    }

    /// The y range a box or range block occupies: offset from the axis
    /// edge by the connector gap, extending away from the axis.
    fn block_top(&self) -> f64 {
        if self.axis_at_top {
            CONNECTOR_LENGTH
        } else {
            self.area_height - CONNECTOR_LENGTH - self.box_height()
        }
    }
}

const DOT_RADIUS: f64 = 3.0;
const CONNECTOR_LENGTH: f64 = 24.0;
const BOX_PADDING: f64 = 5.0;

/// The scene elements backing one item, by shape.
#[derive(Debug)]
enum ItemDom {
    Box {
        content: ElementId,
        line: ElementId,
        dot: ElementId,
    },
    Point {
        dot: ElementId,
        label: ElementId,
    },
    Range {
        block: ElementId,
    },
}

impl ItemDom {
    fn shape(&self) -> ItemShape {
        match self {
            Self::Box { .. } => ItemShape::Box,
            Self::Point { .. } => ItemShape::Point,
            Self::Range { .. } => ItemShape::Range,
        }
    }
}

/// One rendered timeline entry.
#[derive(Debug)]
pub struct Item {
    record: TimelineRecord,
    selected: bool,
    visible: bool,
    dom: Option<ItemDom>,
}

impl Item {
    /// Creates an item for a record. Elements are mounted lazily by the
    /// first repaint.
    #[must_use]
    pub fn new(record: TimelineRecord) -> Self {
        Self {
            record,
            selected: false,
            visible: true,
            dom: None,
        }
    }

    /// Returns the record this item renders.
    #[must_use]
    pub fn record(&self) -> &TimelineRecord {
        &self.record
    }

    /// Replaces the record. A shape change makes the next repaint rebuild
    /// the item's elements.
    pub fn set_record(&mut self, record: TimelineRecord) {
        self.record = record;
    }

    /// Returns whether the item is selected.
    #[must_use]
    pub fn selected(&self) -> bool {
        self.selected
    }

    /// Sets the selection flag. The visual change lands on the next
    /// repaint.
    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// The instant the item starts at.
    #[must_use]
    pub fn start(&self) -> TimePoint {
        self.record.start
    }

    /// The instant the item ends at; point-like items end where they
    /// start.
    #[must_use]
    pub fn end(&self) -> TimePoint {
        self.record.end.unwrap_or(self.record.start)
    }

    fn class(&self, base: &str) -> String {
        let mut class = match &self.record.class {
            Some(extra) => format!("item {base} {extra}"),
            None => format!("item {base}"),
        };
        if self.selected {
            class.push_str(" selected");
        }
        class
    }

    /// Destroys the item's elements, if mounted. Returns whether anything
    /// was removed.
    pub(crate) fn unmount(&mut self, scene: &mut Scene) -> bool {
        let Some(dom) = self.dom.take() else {
            return false;
        };
        match dom {
            ItemDom::Box { content, line, dot } => {
                scene.destroy_element(content);
                scene.destroy_element(line);
                scene.destroy_element(dot);
            }
            ItemDom::Point { dot, label } => {
                scene.destroy_element(dot);
                scene.destroy_element(label);
            }
            ItemDom::Range { block } => {
                scene.destroy_element(block);
            }
        }
        true
    }

    /// Creates, updates, or hides the item's elements under `parent`.
    pub(crate) fn repaint(
        &mut self,
        scene: &mut Scene,
        parent: ElementId,
        scale: &TimeScale,
        layout: &ItemLayout,
        visible: bool,
    ) -> bool {
        let mut changed = false;

        let shape = self.record.resolved_shape();
        if self.dom.as_ref().is_some_and(|dom| dom.shape() != shape) {
            changed |= self.unmount(scene);
        }
        if self.dom.is_none() {
            self.dom = Some(mount(scene, parent, shape));
            changed = true;
        }
        if self.visible != visible {
            self.visible = visible;
            changed = true;
        }

        let Some(dom) = self.dom.as_ref() else {
            return changed;
        };
        for id in dom_elements(dom) {
            let _ = scene.set_visible(id, visible);
        }
        if !visible {
            // Hidden items keep their last geometry; nothing else to do.
            return changed;
        }

        let x = scale.to_screen(self.record.start);
        let edge = layout.edge();
        let block_top = layout.block_top();
        let box_height = layout.box_height();

        match *dom {
            ItemDom::Box { content, line, dot } => {
                changed |= scene.set_class(content, &self.class("box"));
                changed |= scene.set_text(content, &self.record.content);
                let width = self.record.content.chars().count() as f64 * layout.char_width
                    + 2.0 * BOX_PADDING;
                changed |= scene.set_rect(
                    content,
                    Rect::new(x - width / 2.0, block_top, x + width / 2.0, block_top + box_height),
                );

                changed |= scene.set_class(line, &self.class("line"));
                let (line_top, line_bottom) = if layout.axis_at_top {
                    (edge, block_top)
                } else {
                    (block_top + box_height, edge)
                };
                changed |= scene.set_rect(line, Rect::new(x - 0.5, line_top, x + 0.5, line_bottom));

                changed |= scene.set_class(dot, &self.class("dot"));
                changed |= scene.set_rect(
                    dot,
                    Rect::new(x - DOT_RADIUS, edge - DOT_RADIUS, x + DOT_RADIUS, edge + DOT_RADIUS),
                );
            }
            ItemDom::Point { dot, label } => {
                changed |= scene.set_class(dot, &self.class("dot"));
                changed |= scene.set_rect(
                    dot,
                    Rect::new(x - DOT_RADIUS, edge - DOT_RADIUS, x + DOT_RADIUS, edge + DOT_RADIUS),
                );

                changed |= scene.set_class(label, &self.class("point"));
                changed |= scene.set_text(label, &self.record.content);
                let width = self.record.content.chars().count() as f64 * layout.char_width;
                let label_top = if layout.axis_at_top {
                    edge + DOT_RADIUS + 2.0
                } else {
                    edge - DOT_RADIUS - 2.0 - layout.char_height
                };
                changed |= scene.set_rect(
                    label,
                    Rect::new(
                        x + DOT_RADIUS + 2.0,
                        label_top,
                        x + DOT_RADIUS + 2.0 + width,
                        label_top + layout.char_height,
                    ),
                );
            }
            ItemDom::Range { block } => {
                changed |= scene.set_class(block, &self.class("range"));
                changed |= scene.set_text(block, &self.record.content);
                let x_end = scale.to_screen(self.end());
                changed |= scene.set_rect(
                    block,
                    Rect::new(x, block_top, x_end.max(x + 1.0), block_top + box_height),
                );
            }
        }

        changed
    }
}

fn mount(scene: &mut Scene, parent: ElementId, shape: ItemShape) -> ItemDom {
    match shape {
        ItemShape::Box => {
            let content = scene.create_element(ElementKind::Label);
            let line = scene.create_element(ElementKind::Line);
            let dot = scene.create_element(ElementKind::Dot);
            scene.append_child(parent, content);
            scene.append_child(parent, line);
            scene.append_child(parent, dot);
            ItemDom::Box { content, line, dot }
        }
        ItemShape::Point => {
            let dot = scene.create_element(ElementKind::Dot);
            let label = scene.create_element(ElementKind::Label);
            scene.append_child(parent, dot);
            scene.append_child(parent, label);
            ItemDom::Point { dot, label }
        }
        ItemShape::Range => {
            let block = scene.create_element(ElementKind::Block);
            scene.append_child(parent, block);
            ItemDom::Range { block }
        }
    }
}

fn dom_elements(dom: &ItemDom) -> impl Iterator<Item = ElementId> + '_ {
    let (a, b, c) = match *dom {
        ItemDom::Box { content, line, dot } => (Some(content), Some(line), Some(dot)),
        ItemDom::Point { dot, label } => (Some(dot), Some(label), None),
        ItemDom::Range { block } => (Some(block), None, None),
    };
    [a, b, c].into_iter().flatten()
}

#[cfg(test)]
mod tests {
    use varve_core::time::{TimeSpan, TimeWindow};

    use super::*;

    fn layout() -> ItemLayout {
        ItemLayout {
            area_height: 200.0,
            axis_at_top: false,
            char_height: 16.0,
            char_width: 8.0,
        }
    }

    fn scale() -> TimeScale {
        TimeScale::new(
            TimeWindow::new(TimePoint(0), TimePoint(1_000)),
            500.0,
        )
    }

    #[test]
    fn box_item_mounts_three_elements() {
        let mut scene = Scene::new();
        let parent = scene.create_element(ElementKind::Group);
        let mut item = Item::new(TimelineRecord::new(TimePoint(500), "deploy"));

        assert!(item.repaint(&mut scene, parent, &scale(), &layout(), true));
        assert_eq!(scene.children(parent).count(), 3);

        // The dot sits on the axis edge at the record's instant.
        let dot = scene
            .children(parent)
            .find(|id| scene.class(*id).contains("dot"))
            .unwrap();
        let rect = scene.rect(dot);
        assert_eq!((rect.x0 + rect.x1) / 2.0, 250.0);
        assert_eq!((rect.y0 + rect.y1) / 2.0, 200.0);
    }

    #[test]
    fn range_item_spans_start_to_end() {
        let mut scene = Scene::new();
        let parent = scene.create_element(ElementKind::Group);
        let record = TimelineRecord::new(TimePoint(200), "window").with_end(TimePoint(600));
        let mut item = Item::new(record);

        let _ = item.repaint(&mut scene, parent, &scale(), &layout(), true);
        let block = scene.children(parent).next().unwrap();
        let rect = scene.rect(block);
        assert_eq!(rect.x0, 100.0);
        assert_eq!(rect.x1, 300.0);
        assert_eq!(scene.text(block), Some("window"));
    }

    #[test]
    fn zero_length_range_keeps_a_visible_sliver() {
        let mut scene = Scene::new();
        let parent = scene.create_element(ElementKind::Group);
        let record = TimelineRecord::new(TimePoint(400), "blip").with_end(TimePoint(400));
        let mut item = Item::new(record);

        let _ = item.repaint(&mut scene, parent, &scale(), &layout(), true);
        let block = scene.children(parent).next().unwrap();
        assert!(scene.rect(block).width() >= 1.0);
    }

    #[test]
    fn shape_change_rebuilds_elements() {
        let mut scene = Scene::new();
        let parent = scene.create_element(ElementKind::Group);
        let mut item = Item::new(TimelineRecord::new(TimePoint(100), "job"));
        let _ = item.repaint(&mut scene, parent, &scale(), &layout(), true);
        assert_eq!(scene.children(parent).count(), 3, "box elements");

        item.set_record(
            TimelineRecord::new(TimePoint(100), "job").with_end(TimePoint(100) + TimeSpan(50)),
        );
        assert!(item.repaint(&mut scene, parent, &scale(), &layout(), true));
        assert_eq!(scene.children(parent).count(), 1, "rebuilt as a range");
    }

    #[test]
    fn hiding_preserves_elements_and_repaint_is_stable() {
        let mut scene = Scene::new();
        let parent = scene.create_element(ElementKind::Group);
        let mut item = Item::new(TimelineRecord::new(TimePoint(100), "job"));
        let _ = item.repaint(&mut scene, parent, &scale(), &layout(), true);

        assert!(item.repaint(&mut scene, parent, &scale(), &layout(), false));
        assert_eq!(scene.children(parent).count(), 3, "elements kept");
        let all_hidden = scene.children(parent).all(|id| !scene.visible(id));
        assert!(all_hidden);

        // Unchanged state repaints without reporting changes.
        assert!(!item.repaint(&mut scene, parent, &scale(), &layout(), false));
    }

    #[test]
    fn selection_lands_in_the_class() {
        let mut scene = Scene::new();
        let parent = scene.create_element(ElementKind::Group);
        let mut item = Item::new(TimelineRecord::new(TimePoint(100), "job").with_class("urgent"));
        let _ = item.repaint(&mut scene, parent, &scale(), &layout(), true);

        item.set_selected(true);
        assert!(item.repaint(&mut scene, parent, &scale(), &layout(), true));
        let content = scene.children(parent).next().unwrap();
        assert_eq!(scene.class(content), "item box urgent selected");

        item.set_selected(false);
        let _ = item.repaint(&mut scene, parent, &scale(), &layout(), true);
        assert_eq!(scene.class(content), "item box urgent");
    }

    #[test]
    fn unmount_removes_everything() {
        let mut scene = Scene::new();
        let parent = scene.create_element(ElementKind::Group);
        let mut item = Item::new(TimelineRecord::new(TimePoint(100), "job"));
        let _ = item.repaint(&mut scene, parent, &scale(), &layout(), true);

        assert!(item.unmount(&mut scene));
        assert_eq!(scene.children(parent).count(), 0);
        assert!(!item.unmount(&mut scene), "second unmount is a no-op");
    }
}
