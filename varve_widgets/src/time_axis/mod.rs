// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The horizontal time axis.
//!
//! The axis paints minor and major tick lines with labels along the
//! visible window, using [`TimeStep`] to walk round calendar instants.
//! Tick elements are pooled: at the start of every repaint the previous
//! ticks move to a spare list, placement pops from that list before
//! creating anything new, and whatever is left over at the end is
//! destroyed. A stable window therefore repaints onto the exact same
//! elements and produces no scene changes.
//!
//! The axis participates in the measure/paint feedback loop from both
//! sides: repaint requests a reflow after structural changes (element
//! created, frame moved, characters not yet measured), and reflow
//! requests a repaint when the measured geometry changed.

mod step;

pub use step::{StepScale, TimeStep};

use alloc::format;
use alloc::vec::Vec;

use kurbo::{Rect, Size};

use varve_core::component::{Component, ComponentCore, ComponentError, ComponentKind};
use varve_core::context::{LayoutContext, Orientation, PaintContext, SweepRequests};
use varve_core::event::{Event, EventKind};
use varve_core::options::Options;
use varve_core::scene::{ElementId, ElementKind, Scene};
use varve_core::time::TimeScale;

/// Tick iteration stops after this many steps regardless of the range.
const MAX_TICKS: usize = 1_000;

/// Character width assumed before the first measure pass.
const FALLBACK_CHAR_WIDTH: f64 = 10.0;

/// Character height assumed before the first measure pass.
const FALLBACK_CHAR_HEIGHT: f64 = 16.0;

/// Measured sizes and derived offsets, recomputed by every reflow.
#[derive(Clone, Copy, Debug, Default)]
struct AxisProps {
    minor_char: Size,
    major_char: Size,
    minor_label_top: f64,
    major_label_top: f64,
    minor_line_top: f64,
    minor_line_height: f64,
    major_line_top: f64,
    major_line_height: f64,
    line_top: f64,
    height: f64,
}

/// The four element pools one tick pass works with.
#[derive(Debug, Default)]
struct TickPools {
    minor_labels: Vec<ElementId>,
    major_labels: Vec<ElementId>,
    minor_lines: Vec<ElementId>,
    major_lines: Vec<ElementId>,
}

impl TickPools {
    fn is_empty(&self) -> bool {
        self.minor_labels.is_empty()
            && self.major_labels.is_empty()
            && self.minor_lines.is_empty()
            && self.major_lines.is_empty()
    }
}

/// The horizontal time axis component.
#[derive(Debug)]
pub struct TimeAxis {
    core: ComponentCore,
    element: Option<ElementId>,
    live: TickPools,
    spare: TickPools,
    axis_line: Option<ElementId>,
    props: AxisProps,
}

impl TimeAxis {
    /// Creates a time axis from an options bag.
    ///
    /// Recognized options: `show_minor_labels`, `show_major_labels`
    /// (booleans, default true).
    #[must_use]
    pub fn new(options: Options) -> Self {
        let mut core = ComponentCore::configured(options);
        core.subscribe(EventKind::Window);
        Self {
            core,
            element: None,
            live: TickPools::default(),
            spare: TickPools::default(),
            axis_line: None,
            props: AxisProps::default(),
        }
    }

    fn char_width(&self) -> f64 {
        if self.props.minor_char.width > 0.0 {
            self.props.minor_char.width
        } else {
            FALLBACK_CHAR_WIDTH
        }
    }

    fn char_height(&self) -> f64 {
        if self.props.minor_char.height > 0.0 {
            self.props.minor_char.height
        } else {
            FALLBACK_CHAR_HEIGHT
        }
    }

    /// Moves the live tick elements into the spare pools for re-use.
    ///
    /// The pools are reversed so that `pop` hands elements back in their
    /// original placement order; a stable window then repaints every tick
    /// onto the element it used last time, and nothing registers as
    /// changed.
    fn begin_ticks(&mut self) {
        debug_assert!(self.spare.is_empty(), "previous tick pass did not finish");
        core::mem::swap(&mut self.live, &mut self.spare);
        self.spare.minor_labels.reverse();
        self.spare.major_labels.reverse();
        self.spare.minor_lines.reverse();
        self.spare.major_lines.reverse();
    }

    /// Destroys whatever the tick pass did not re-use.
    fn end_ticks(&mut self, scene: &mut Scene) -> bool {
        let mut changed = false;
        for id in self.spare.minor_labels.drain(..) {
            scene.destroy_element(id);
            changed = true;
        }
        for id in self.spare.major_labels.drain(..) {
            scene.destroy_element(id);
            changed = true;
        }
        for id in self.spare.minor_lines.drain(..) {
            scene.destroy_element(id);
            changed = true;
        }
        for id in self.spare.major_lines.drain(..) {
            scene.destroy_element(id);
            changed = true;
        }
        changed
    }

    fn paint_minor_label(
        &mut self,
        scene: &mut Scene,
        parent: ElementId,
        x: f64,
        text: &str,
    ) -> bool {
        let (id, mut changed) = take_or_create(
            &mut self.spare.minor_labels,
            &mut self.live.minor_labels,
            scene,
            parent,
            ElementKind::Label,
            "text minor",
        );
        changed |= scene.set_text(id, text);
        let width = text.chars().count() as f64 * self.char_width();
        let top = self.props.minor_label_top;
        changed |= scene.set_rect(id, Rect::new(x, top, x + width, top + self.char_height()));
        changed
    }

    fn paint_major_label(
        &mut self,
        scene: &mut Scene,
        parent: ElementId,
        x: f64,
        text: &str,
    ) -> bool {
        let (id, mut changed) = take_or_create(
            &mut self.spare.major_labels,
            &mut self.live.major_labels,
            scene,
            parent,
            ElementKind::Label,
            "text major",
        );
        changed |= scene.set_text(id, text);
        let char_width = if self.props.major_char.width > 0.0 {
            self.props.major_char.width
        } else {
            FALLBACK_CHAR_WIDTH
        };
        let width = text.chars().count() as f64 * char_width;
        let top = self.props.major_label_top;
        changed |= scene.set_rect(id, Rect::new(x, top, x + width, top + self.char_height()));
        changed
    }

    fn paint_minor_line(&mut self, scene: &mut Scene, parent: ElementId, x: f64) -> bool {
        let (id, mut changed) = take_or_create(
            &mut self.spare.minor_lines,
            &mut self.live.minor_lines,
            scene,
            parent,
            ElementKind::Line,
            "grid vertical minor",
        );
        let top = self.props.minor_line_top;
        changed |= scene.set_rect(
            id,
            Rect::new(x - 0.5, top, x + 0.5, top + self.props.minor_line_height),
        );
        changed
    }

    fn paint_major_line(&mut self, scene: &mut Scene, parent: ElementId, x: f64) -> bool {
        let (id, mut changed) = take_or_create(
            &mut self.spare.major_lines,
            &mut self.live.major_lines,
            scene,
            parent,
            ElementKind::Line,
            "grid vertical major",
        );
        let top = self.props.major_line_top;
        changed |= scene.set_rect(
            id,
            Rect::new(x - 0.5, top, x + 0.5, top + self.props.major_line_height),
        );
        changed
    }

    /// Paints or removes the horizontal axis line, keeping it painted
    /// after every tick element.
    fn paint_axis_line(
        &mut self,
        scene: &mut Scene,
        parent: ElementId,
        width: f64,
        show: bool,
    ) -> bool {
        let mut changed = false;
        if show {
            let id = match self.axis_line {
                Some(id) => {
                    let is_last = scene.children(parent).last() == Some(id);
                    if !is_last {
                        scene.remove_from_parent(id);
                        scene.append_child(parent, id);
                        changed = true;
                    }
                    id
                }
                None => {
                    let id = scene.create_element(ElementKind::Line);
                    let _ = scene.set_class(id, "grid horizontal major");
                    scene.append_child(parent, id);
                    self.axis_line = Some(id);
                    changed = true;
                    id
                }
            };
            let top = self.props.line_top;
            changed |= scene.set_rect(id, Rect::new(0.0, top, width, top + 1.0));
        } else if let Some(id) = self.axis_line.take() {
            scene.destroy_element(id);
            changed = true;
        }
        changed
    }
}

fn take_or_create(
    spare: &mut Vec<ElementId>,
    live: &mut Vec<ElementId>,
    scene: &mut Scene,
    parent: ElementId,
    kind: ElementKind,
    class: &str,
) -> (ElementId, bool) {
    if let Some(id) = spare.pop() {
        live.push(id);
        (id, false)
    } else {
        let id = scene.create_element(kind);
        let _ = scene.set_class(id, class);
        scene.append_child(parent, id);
        live.push(id);
        (id, true)
    }
}

impl Component for TimeAxis {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::TimeAxis
    }

    fn repaint(&mut self, cx: &mut PaintContext<'_>) -> Result<bool, ComponentError> {
        let parent_bounds = cx.parent_bounds().ok_or(ComponentError::MissingParent)?;
        let parent_container = cx
            .parent_container()
            .ok_or(ComponentError::NoParentContainer)?;
        let window = cx.env().window;
        let orientation = cx.env().orientation;

        let mut changed = false;
        let mut needs_reflow = false;

        let element = match self.element {
            Some(element) => element,
            None => {
                let element = cx.scene().create_element(ElementKind::Group);
                self.element = Some(element);
                changed = true;
                needs_reflow = true;
                element
            }
        };

        let mode = match orientation {
            Orientation::Top => "top",
            Orientation::Bottom => "bottom",
        };
        changed |= cx.scene().set_class(element, &format!("axis {mode}"));

        if cx.scene().parent(element).is_none() {
            cx.scene().append_child(parent_container, element);
            changed = true;
            needs_reflow = true;
        }

        let width = parent_bounds.width();
        let top = match orientation {
            Orientation::Top => 0.0,
            Orientation::Bottom => (parent_bounds.height() - self.props.height).max(0.0),
        };
        if cx
            .scene()
            .set_rect(element, Rect::new(0.0, top, width, top + self.props.height))
        {
            changed = true;
            needs_reflow = true;
        }

        // The step size depends on how wide a label renders; until the
        // first measure pass a fallback is used and a reflow requested.
        if self.props.minor_char.width == 0.0 {
            needs_reflow = true;
        }
        let scale = TimeScale::new(window, width);
        let minimum_step = scale.to_span(self.char_width() * 6.0);
        let mut step = TimeStep::new(window.start(), window.end(), minimum_step);

        let options = self.core.options();
        let show_minor = options.flag("show_minor_labels", true);
        let show_major = options.flag("show_major_labels", true);

        self.begin_ticks();
        {
            let scene = cx.scene();
            // Until the frame has a real width there is nothing sensible
            // to place; the reflow chain will come back around.
            if width > 0.0 {
                step.first();
                let mut x_first_major: Option<f64> = None;
                let mut ticks = 0;
                while step.has_next() && ticks < MAX_TICKS {
                    ticks += 1;
                    let x = scale.to_screen(step.current());
                    let major = step.is_major();

                    if show_minor {
                        changed |= self.paint_minor_label(scene, element, x, &step.label_minor());
                    }
                    if major && show_major {
                        if x > 0.0 {
                            if x_first_major.is_none() {
                                x_first_major = Some(x);
                            }
                            changed |=
                                self.paint_major_label(scene, element, x, &step.label_major());
                        }
                        changed |= self.paint_major_line(scene, element, x);
                    } else {
                        changed |= self.paint_minor_line(scene, element, x);
                    }

                    step.next();
                }

                // A sticky major label at the left edge, unless the first
                // real one is close enough to collide with it.
                if show_major {
                    let left_text = TimeStep::major_label_at(step.scale(), scale.to_time(0.0));
                    if !left_text.is_empty() {
                        let text_width =
                            left_text.chars().count() as f64 * self.char_width() + 10.0;
                        if x_first_major.is_none_or(|x| text_width < x) {
                            changed |= self.paint_major_label(scene, element, 0.0, &left_text);
                        }
                    }
                }
            }

            changed |= self.end_ticks(scene);
            changed |= self.paint_axis_line(scene, element, width, show_minor || show_major);
        }

        if needs_reflow {
            cx.request_reflow();
        }
        Ok(changed)
    }

    fn reflow(&mut self, cx: &mut LayoutContext<'_>) -> Result<Rect, ComponentError> {
        let Some(element) = self.element else {
            cx.request_repaint();
            return Ok(Rect::ZERO);
        };

        let env = cx.env();
        self.props.minor_char = env.metrics.char_size("text minor");
        self.props.major_char = env.metrics.char_size("text major");
        let orientation = env.orientation;

        let options = self.core.options();
        let show_minor = options.flag("show_minor_labels", true);
        let show_major = options.flag("show_major_labels", true);
        let minor_label_h = if show_minor {
            self.props.minor_char.height
        } else {
            0.0
        };
        let major_label_h = if show_major {
            self.props.major_char.height
        } else {
            0.0
        };

        let rect = cx.scene().rect(element);
        let parent_height = cx.parent_bounds().map_or(0.0, |r| r.height());
        let props = &mut self.props;
        match orientation {
            Orientation::Bottom => {
                props.minor_label_top = 0.0;
                props.major_label_top = props.minor_label_top + minor_label_h;

                // Grid lines reach up through the parent, past this
                // component's own frame.
                props.minor_line_top = -rect.y0;
                props.minor_line_height = (parent_height - major_label_h).max(0.0);
                props.major_line_top = -rect.y0;
                props.major_line_height = parent_height;

                props.line_top = 0.0;
            }
            Orientation::Top => {
                props.major_label_top = 0.0;
                props.minor_label_top = props.major_label_top + major_label_h;

                props.minor_line_top = props.minor_label_top;
                props.minor_line_height = (parent_height - major_label_h).max(0.0);
                props.major_line_top = 0.0;
                props.major_line_height = parent_height;

                props.line_top = major_label_h + minor_label_h;
            }
        }

        let height = minor_label_h + major_label_h;
        props.height = height;

        let top = match orientation {
            Orientation::Top => 0.0,
            Orientation::Bottom => (parent_height - height).max(0.0),
        };
        let bounds = Rect::new(rect.x0, top, rect.x0 + rect.width(), top + height);
        if bounds != cx.bounds() {
            cx.request_repaint();
        }
        Ok(bounds)
    }

    fn on_event(&mut self, event: &Event, requests: &mut SweepRequests) {
        if matches!(event, Event::Window(_)) {
            requests.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec::Vec;

    use varve_core::component::ComponentId;
    use varve_core::context::Environment;
    use varve_core::controller::Controller;
    use varve_core::host::FixedMetrics;
    use varve_core::options::OptionValue;
    use varve_core::time::{TimePoint, TimeSpan, TimeWindow};

    use crate::frame::Frame;

    use super::*;

    fn env<'a>(metrics: &'a FixedMetrics, window: TimeWindow) -> Environment<'a> {
        Environment {
            window,
            viewport: Size::new(800.0, 400.0),
            orientation: Orientation::Bottom,
            metrics,
        }
    }

    fn hour_window() -> TimeWindow {
        // 2013-04-25 12:00..13:00 UTC
        TimeWindow::new(TimePoint(1_366_891_200_000), TimePoint(1_366_894_800_000))
    }

    fn build(options: Options) -> (Controller, Scene, ComponentId) {
        let mut controller = Controller::new();
        let frame = controller
            .register(Box::new(Frame::new(Options::new())))
            .unwrap();
        let axis = controller
            .register(Box::new(TimeAxis::new(options.with_parent(frame))))
            .unwrap();
        (controller, Scene::new(), axis)
    }

    fn settle(controller: &mut Controller, scene: &mut Scene, env: &Environment<'_>) {
        let _ = controller.repaint(scene, env).unwrap();
        for _ in 0..8 {
            if controller.is_idle() {
                break;
            }
            let _ = controller.flush(scene, env).unwrap();
        }
        assert!(controller.is_idle(), "axis settles in a few rounds");
    }

    fn children_with_class(scene: &Scene, parent: ElementId, class: &str) -> Vec<ElementId> {
        scene
            .children(parent)
            .filter(|id| scene.class(*id) == class)
            .collect()
    }

    #[test]
    fn paints_ticks_labels_and_axis_line() {
        let (mut controller, mut scene, axis) = build(Options::new());
        let metrics = FixedMetrics::default();
        let env = env(&metrics, hour_window());
        settle(&mut controller, &mut scene, &env);

        let element = controller.get(axis).unwrap().container().unwrap();
        assert_eq!(scene.class(element), "axis bottom");

        let minor_labels = children_with_class(&scene, element, "text minor");
        assert!(!minor_labels.is_empty(), "minor labels painted");
        assert!(
            scene.text(minor_labels[0]).is_some(),
            "labels carry tick text"
        );
        assert!(
            !children_with_class(&scene, element, "grid vertical minor").is_empty(),
            "minor grid lines painted"
        );

        // The axis line paints after every tick element.
        let last = scene.children(element).last().unwrap();
        assert_eq!(scene.class(last), "grid horizontal major");

        // Measured height: one minor and one major label row.
        let bounds = controller.bounds_of(axis).unwrap();
        assert_eq!(bounds.height(), 32.0);
        assert_eq!(bounds.y1, 400.0, "bottom axis hugs the parent's bottom");
    }

    #[test]
    fn stable_window_repaints_onto_the_same_elements() {
        let (mut controller, mut scene, axis) = build(Options::new());
        let metrics = FixedMetrics::default();
        let env = env(&metrics, hour_window());
        settle(&mut controller, &mut scene, &env);
        let _ = scene.take_changes();

        let element = controller.get(axis).unwrap().container().unwrap();
        let before: Vec<_> = scene.children(element).collect();

        let reports = controller.repaint(&mut scene, &env).unwrap();
        assert_eq!(reports[0].changed, 0, "nothing changed");

        let after: Vec<_> = scene.children(element).collect();
        assert_eq!(before, after, "tick elements recycled, not recreated");
        assert!(scene.take_changes().is_empty(), "no scene churn");
    }

    #[test]
    fn panning_recycles_the_tick_pool() {
        let (mut controller, mut scene, axis) = build(Options::new());
        let metrics = FixedMetrics::default();
        let window = hour_window();
        let env1 = env(&metrics, window);
        settle(&mut controller, &mut scene, &env1);

        let element = controller.get(axis).unwrap().container().unwrap();
        let count_before = scene.children(element).count();

        // Pan by a quarter window and repaint through the event path.
        let panned = window.pan(TimeSpan(900_000));
        controller.emit(&varve_core::event::Event::Window(panned));
        let env2 = env(&metrics, panned);
        for _ in 0..8 {
            if controller.is_idle() {
                break;
            }
            let _ = controller.flush(&mut scene, &env2).unwrap();
        }

        let count_after = scene.children(element).count();
        let diff = count_after.abs_diff(count_before);
        assert!(
            diff <= 2,
            "pool keeps the element count stable ({count_before} -> {count_after})"
        );
    }

    #[test]
    fn minor_labels_can_be_disabled() {
        let options = Options::new().with("show_minor_labels", OptionValue::Bool(false));
        let (mut controller, mut scene, axis) = build(options);
        let metrics = FixedMetrics::default();
        let env = env(&metrics, hour_window());
        settle(&mut controller, &mut scene, &env);

        let element = controller.get(axis).unwrap().container().unwrap();
        assert!(children_with_class(&scene, element, "text minor").is_empty());
        assert!(!children_with_class(&scene, element, "grid vertical minor").is_empty());

        // Height shrinks to the major label row alone.
        assert_eq!(controller.bounds_of(axis).unwrap().height(), 16.0);
    }
}
