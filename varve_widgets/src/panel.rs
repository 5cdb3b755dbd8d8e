// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A container panel nested inside another component.

use alloc::format;
use alloc::string::String;

use kurbo::Rect;

use varve_core::component::{Component, ComponentCore, ComponentError, ComponentKind};
use varve_core::context::{LayoutContext, PaintContext};
use varve_core::options::{Extent, Options};
use varve_core::scene::{ElementId, ElementKind};

/// A panel positions a group element inside its parent's container and
/// exposes it as the container for its own children.
///
/// Position and size come from the `top`, `left`, `width`, and `height`
/// extent options, resolved against the parent's bounds; `width` and
/// `height` default to 100%.
#[derive(Debug)]
pub struct Panel {
    core: ComponentCore,
    element: Option<ElementId>,
}

impl Panel {
    /// Creates a panel from an options bag.
    ///
    /// Recognized options: `top`, `left`, `width`, `height` (extents) and
    /// `class`.
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self {
            core: ComponentCore::configured(options),
            element: None,
        }
    }

    /// Returns the panel's scene element, once the first repaint created
    /// it.
    #[must_use]
    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    fn class(&self) -> String {
        match self.core.options().text("class") {
            Some(extra) => format!("panel {extra}"),
            None => String::from("panel"),
        }
    }
}

impl Component for Panel {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Panel
    }

    fn container(&self) -> Option<ElementId> {
        self.element
    }

    fn repaint(&mut self, cx: &mut PaintContext<'_>) -> Result<bool, ComponentError> {
        let parent_bounds = match cx.parent_bounds() {
            Some(bounds) => bounds,
            None => return Err(ComponentError::MissingParent),
        };
        let parent_container = cx
            .parent_container()
            .ok_or(ComponentError::NoParentContainer)?;

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

        if cx.scene().parent(element).is_none() {
            cx.scene().append_child(parent_container, element);
            changed = true;
        }

        let class = self.class();
        changed |= cx.scene().set_class(element, &class);

        let options = self.core.options();
        let available_w = parent_bounds.width();
        let available_h = parent_bounds.height();
        let left = options
            .extent("left")
            .unwrap_or(Extent::Auto)
            .resolve_or(available_w, 0.0);
        let top = options
            .extent("top")
            .unwrap_or(Extent::Auto)
            .resolve_or(available_h, 0.0);
        let width = options
            .extent("width")
            .unwrap_or(Extent::Auto)
            .resolve_or(available_w, available_w);
        let height = options
            .extent("height")
            .unwrap_or(Extent::Auto)
            .resolve_or(available_h, available_h);
        changed |= cx
            .scene()
            .set_rect(element, Rect::new(left, top, left + width, top + height));

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
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use kurbo::Size;

    use varve_core::context::{Environment, Orientation};
    use varve_core::controller::Controller;
    use varve_core::host::FixedMetrics;
    use varve_core::options::OptionValue;
    use varve_core::scene::Scene;
    use varve_core::time::{TimePoint, TimeWindow};

    use crate::frame::Frame;

    use super::*;

    fn env(metrics: &FixedMetrics) -> Environment<'_> {
        Environment {
            window: TimeWindow::new(TimePoint(0), TimePoint(1_000)),
            viewport: Size::new(400.0, 200.0),
            orientation: Orientation::default(),
            metrics,
        }
    }

    #[test]
    fn panel_nests_inside_its_parent_container() {
        let mut controller = Controller::new();
        let frame = controller
            .register(Box::new(Frame::new(Options::new())))
            .unwrap();
        let panel_options = Options::new()
            .with_parent(frame)
            .with("left", OptionValue::Extent(Extent::Px(10.0)))
            .with("top", OptionValue::Extent(Extent::Px(20.0)))
            .with("width", OptionValue::Extent(Extent::Percent(50.0)))
            .with("height", OptionValue::Extent(Extent::Px(80.0)));
        let panel = controller.register(Box::new(Panel::new(panel_options))).unwrap();

        let mut scene = Scene::new();
        let metrics = FixedMetrics::default();
        let _ = controller.repaint(&mut scene, &env(&metrics)).unwrap();
        for _ in 0..4 {
            if controller.is_idle() {
                break;
            }
            let _ = controller.flush(&mut scene, &env(&metrics)).unwrap();
        }
        assert!(controller.is_idle(), "tree settles in a few rounds");

        let root = scene.roots()[0];
        let children: alloc::vec::Vec<_> = scene.children(root).collect();
        assert_eq!(children.len(), 1, "panel element hangs off the frame");
        let element = children[0];
        assert_eq!(scene.class(element), "panel");
        assert_eq!(scene.rect(element), Rect::new(10.0, 20.0, 210.0, 100.0));

        // The reflow pass published the same geometry to dependents.
        assert_eq!(
            controller.bounds_of(panel),
            Some(Rect::new(10.0, 20.0, 210.0, 100.0))
        );
    }

    #[test]
    fn orphan_panel_fails_the_sweep() {
        let mut controller = Controller::new();
        let id = controller
            .register(Box::new(Panel::new(Options::new())))
            .unwrap();

        let mut scene = Scene::new();
        let metrics = FixedMetrics::default();
        let err = controller.repaint(&mut scene, &env(&metrics)).unwrap_err();
        assert_eq!(err.component, id);
        assert_eq!(err.source, ComponentError::MissingParent);
    }
}
