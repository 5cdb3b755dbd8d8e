// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The item set: renders a record store's entries on the timeline.
//!
//! The item set never reads a record store directly. It subscribes to
//! [`EventKind::Records`] before registration and mirrors the drained
//! [`RecordChange`]s into its own map of [`Item`]s; removed items are
//! retired and their elements destroyed on the next repaint (event
//! handlers have no scene access by design). This keeps the data flow
//! one-directional: store → changelog → events → items → scene.
//!
//! Width comes from the parent, the vertical band from the axis height
//! and orientation, and the height of the rendered items from their
//! content.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;

use varve_core::component::{Component, ComponentCore, ComponentError, ComponentKind};
use varve_core::context::{LayoutContext, Orientation, PaintContext, SweepRequests};
use varve_core::event::{Event, EventKind};
use varve_core::options::Options;
use varve_core::records::{RecordChange, RecordId};
use varve_core::scene::{ElementId, ElementKind};
use varve_core::time::TimeScale;

use crate::item::{Item, ItemLayout};

/// The component rendering a set of timeline items.
#[derive(Debug)]
pub struct ItemSet {
    core: ComponentCore,
    element: Option<ElementId>,
    items: BTreeMap<RecordId, Item>,
    retired: Vec<Item>,
}

impl ItemSet {
    /// Creates an item set from an options bag.
    ///
    /// Recognized options: `class` (extra class for the container
    /// element).
    #[must_use]
    pub fn new(options: Options) -> Self {
        let mut core = ComponentCore::configured(options);
        core.subscribe(EventKind::Records);
        core.subscribe(EventKind::Window);
        core.subscribe(EventKind::Selection);
        Self {
            core,
            element: None,
            items: BTreeMap::new(),
            retired: Vec::new(),
        }
    }

    /// Returns the number of items currently mirrored.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the item for a record, if present.
    #[must_use]
    pub fn item(&self, id: RecordId) -> Option<&Item> {
        self.items.get(&id)
    }

    fn class(&self) -> String {
        match self.core.options().text("class") {
            Some(extra) => format!("itemset {extra}"),
            None => String::from("itemset"),
        }
    }

    fn apply_records_change(&mut self, change: &RecordChange) {
        match change {
            RecordChange::Added { id, record } | RecordChange::Updated { id, record } => {
                if let Some(item) = self.items.get_mut(id) {
                    item.set_record(record.clone());
                } else {
                    self.items.insert(*id, Item::new(record.clone()));
                }
            }
            RecordChange::Removed { id } => {
                if let Some(item) = self.items.remove(id) {
                    self.retired.push(item);
                }
            }
            RecordChange::Cleared => {
                let items = core::mem::take(&mut self.items);
                self.retired.extend(items.into_values());
            }
        }
    }
}

impl Component for ItemSet {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::ItemSet
    }

    fn container(&self) -> Option<ElementId> {
        self.element
    }

    fn repaint(&mut self, cx: &mut PaintContext<'_>) -> Result<bool, ComponentError> {
        let parent_bounds = cx.parent_bounds().ok_or(ComponentError::MissingParent)?;
        let parent_container = cx
            .parent_container()
            .ok_or(ComponentError::NoParentContainer)?;
        let window = cx.env().window;
        let orientation = cx.env().orientation;
        let item_char = cx.env().metrics.char_size("item");

        let mut changed = false;

        let element = match self.element {
            Some(element) => element,
            None => {
                let element = cx.scene().create_element(ElementKind::Group);
                self.element = Some(element);
                changed = true;
                element
            }
        };

        let class = self.class();
        changed |= cx.scene().set_class(element, &class);

        if cx.scene().parent(element).is_none() {
            cx.scene().append_child(parent_container, element);
            changed = true;
        }

        // The axis height carves the item band out of the parent; the
        // dependency on the axis guarantees its bounds are current.
        let axis_height = cx
            .find(ComponentKind::TimeAxis)
            .first()
            .and_then(|axis| cx.bounds_of(*axis))
            .map_or(0.0, |bounds| bounds.height());
        let width = parent_bounds.width();
        let height = (parent_bounds.height() - axis_height).max(0.0);
        let top = match orientation {
            Orientation::Top => axis_height,
            Orientation::Bottom => 0.0,
        };
        changed |= cx
            .scene()
            .set_rect(element, Rect::new(0.0, top, width, top + height));

        let scale = TimeScale::new(window, width);
        let layout = ItemLayout {
            area_height: height,
            axis_at_top: orientation == Orientation::Top,
            char_height: item_char.height,
            char_width: item_char.width,
        };

        {
            let scene = cx.scene();
            let retired = core::mem::take(&mut self.retired);
            for mut item in retired {
                changed |= item.unmount(scene);
            }
            for item in self.items.values_mut() {
                let visible = width > 0.0 && window.overlaps(item.start(), item.end());
                changed |= item.repaint(scene, element, &scale, &layout, visible);
            }
        }

        if changed {
            cx.request_reflow();
        }
        Ok(changed)
    }

    fn reflow(&mut self, cx: &mut LayoutContext<'_>) -> Result<Rect, ComponentError> {
        let Some(element) = self.element else {
            cx.request_repaint();
            return Ok(Rect::ZERO);
        };
        Ok(cx.scene().rect(element))
    }

    fn on_event(&mut self, event: &Event, requests: &mut SweepRequests) {
        match event {
            Event::Records(change) => {
                self.apply_records_change(change);
                requests.request_reflow();
                requests.request_repaint();
            }
            Event::Window(_) => {
                requests.request_repaint();
            }
            Event::Selection(ids) => {
                for (id, item) in &mut self.items {
                    item.set_selected(ids.contains(id));
                }
                requests.request_repaint();
            }
            Event::Viewport(_) => {}
        }
    }
}
