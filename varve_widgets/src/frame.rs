// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The root frame containing all components.

use alloc::format;
use alloc::string::String;

use kurbo::Rect;

use varve_core::component::{Component, ComponentCore, ComponentError, ComponentKind};
use varve_core::context::{LayoutContext, PaintContext, SweepRequests};
use varve_core::event::{Event, EventKind};
use varve_core::options::{Extent, Options};
use varve_core::scene::{ElementId, ElementKind};

/// The root container component.
///
/// The frame owns the scene's root group and sizes it from its `width` /
/// `height` extent options, resolved against the host viewport. It
/// subscribes to viewport events so a host resize schedules a fresh
/// measure/paint cycle.
#[derive(Debug)]
pub struct Frame {
    core: ComponentCore,
    element: Option<ElementId>,
}

impl Frame {
    /// Creates a frame from an options bag.
    ///
    /// Recognized options: `width`, `height` (extents, default 100%),
    /// `class` (extra class for the root element).
    #[must_use]
    pub fn new(options: Options) -> Self {
        let mut core = ComponentCore::configured(options);
        core.subscribe(EventKind::Viewport);
        Self {
            core,
            element: None,
        }
    }

    /// Returns the root scene element, once the first repaint created it.
    #[must_use]
    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    fn class(&self) -> String {
        match self.core.options().text("class") {
            Some(extra) => format!("timeline {extra}"),
            None => String::from("timeline"),
        }
    }
}

impl Component for Frame {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Frame
    }

    fn container(&self) -> Option<ElementId> {
        self.element
    }

    fn repaint(&mut self, cx: &mut PaintContext<'_>) -> Result<bool, ComponentError> {
        let viewport = cx.env().viewport;
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

        let options = self.core.options();
        let width = options
            .extent("width")
            .unwrap_or(Extent::Auto)
            .resolve_or(viewport.width, viewport.width);
        let height = options
            .extent("height")
            .unwrap_or(Extent::Auto)
            .resolve_or(viewport.height, viewport.height);
        changed |= cx
            .scene()
            .set_rect(element, Rect::new(0.0, 0.0, width, height));

        if changed {
            cx.request_reflow();
        }
        Ok(changed)
    }

    fn reflow(&mut self, cx: &mut LayoutContext<'_>) -> Result<Rect, ComponentError> {
        let Some(element) = self.element else {
            // Nothing rendered yet; a repaint has to run first.
            cx.request_repaint();
            return Ok(Rect::ZERO);
        };

        let bounds = cx.scene().rect(element);
        if bounds != cx.bounds() {
            cx.request_repaint();
        }
        Ok(bounds)
    }

    fn on_event(&mut self, event: &Event, requests: &mut SweepRequests) {
        if matches!(event, Event::Viewport(_)) {
            requests.request_reflow();
            requests.request_repaint();
        }
    }
}
