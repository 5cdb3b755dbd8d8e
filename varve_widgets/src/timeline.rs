// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The timeline facade.
//!
//! A [`Timeline`] owns the pieces an embedding application needs — a
//! controller, a scene, a record store, and the shared view state — and
//! wires the standard component arrangement: a root [`Frame`], a
//! [`TimeAxis`] inside it, and an [`ItemSet`] that depends on the axis
//! (the item band is carved out of whatever the axis measures).
//!
//! Data and view mutations go through the facade, which forwards them as
//! events; the components respond with coalesced sweep requests. The
//! host then either drives [`flush`](Timeline::flush) itself or calls
//! [`pump`](Timeline::pump), which flushes until the tree settles and
//! hands the drained scene changes to a
//! [`Presenter`](varve_core::host::Presenter).

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::error::Error;
use core::fmt;

use kurbo::Size;

use varve_core::component::ComponentId;
use varve_core::context::{Environment, Orientation};
use varve_core::controller::{Controller, RegisterError, SweepError, SweepReport};
use varve_core::event::Event;
use varve_core::host::{FixedMetrics, Presenter, TextMetrics};
use varve_core::options::Options;
use varve_core::records::{RecordId, RecordSet, TimelineRecord};
use varve_core::scene::{Scene, SceneChanges};
use varve_core::time::{TimePoint, TimeSpan, TimeWindow};

use crate::frame::Frame;
use crate::item_set::ItemSet;
use crate::time_axis::TimeAxis;

/// Initial view state for a [`Timeline`].
#[derive(Clone, Copy, Debug)]
pub struct TimelineConfig {
    /// The initially visible window.
    pub window: TimeWindow,
    /// The host viewport the root frame fills.
    pub viewport: Size,
    /// Where the axis sits.
    pub orientation: Orientation,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            // A week from the epoch; hosts pass their own window.
            window: TimeWindow::new(TimePoint::EPOCH, TimePoint(7 * 86_400_000)),
            viewport: Size::new(800.0, 400.0),
            orientation: Orientation::Bottom,
        }
    }
}

/// A failure while building or updating a timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimelineError {
    /// Registering one of the standard components failed.
    Register(RegisterError),
    /// A sweep aborted.
    Sweep(SweepError),
}

impl fmt::Display for TimelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register(e) => write!(f, "registering timeline components: {e}"),
            Self::Sweep(e) => write!(f, "{e}"),
        }
    }
}

impl Error for TimelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Register(e) => Some(e),
            Self::Sweep(e) => Some(e),
        }
    }
}

impl From<RegisterError> for TimelineError {
    fn from(e: RegisterError) -> Self {
        Self::Register(e)
    }
}

impl From<SweepError> for TimelineError {
    fn from(e: SweepError) -> Self {
        Self::Sweep(e)
    }
}

/// A complete timeline: controller, scene, records, and view state.
pub struct Timeline {
    controller: Controller,
    scene: Scene,
    records: RecordSet,
    window: TimeWindow,
    viewport: Size,
    orientation: Orientation,
    metrics: Box<dyn TextMetrics>,
    frame: ComponentId,
    axis: ComponentId,
    itemset: ComponentId,
}

impl Timeline {
    /// Builds the standard component arrangement and performs the initial
    /// synchronous repaint, so the scene is populated before the first
    /// host flush.
    pub fn new(config: TimelineConfig) -> Result<Self, TimelineError> {
        let mut controller = Controller::new();
        let frame = controller.register(Box::new(Frame::new(Options::new())))?;
        let axis = controller.register(Box::new(TimeAxis::new(
            Options::new().with_parent(frame),
        )))?;
        let itemset = controller.register(Box::new(ItemSet::new(
            Options::new()
                .with_parent(frame)
                .with_depends_on(alloc::vec![axis]),
        )))?;

        let mut timeline = Self {
            controller,
            scene: Scene::new(),
            records: RecordSet::new(),
            window: config.window,
            viewport: config.viewport,
            orientation: config.orientation,
            metrics: Box::new(FixedMetrics::default()),
            frame,
            axis,
            itemset,
        };
        let _ = timeline.repaint()?;
        Ok(timeline)
    }

    // -- Data --------------------------------------------------------------

    /// Adds a record and schedules the update.
    pub fn add(&mut self, record: TimelineRecord) -> RecordId {
        let id = self.records.add(record);
        self.forward_record_changes();
        id
    }

    /// Inserts or replaces a record under an explicit id and schedules
    /// the update.
    pub fn insert(&mut self, id: RecordId, record: TimelineRecord) {
        let _ = self.records.insert(id, record);
        self.forward_record_changes();
    }

    /// Removes a record and schedules the update.
    pub fn remove(&mut self, id: RecordId) -> Option<TimelineRecord> {
        let removed = self.records.remove(id);
        self.forward_record_changes();
        removed
    }

    /// Removes every record and schedules the update.
    pub fn clear_records(&mut self) {
        self.records.clear();
        self.forward_record_changes();
    }

    /// Returns the record store, read-only.
    #[must_use]
    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    /// Marks the given records as the selection.
    pub fn set_selection(&mut self, ids: Vec<RecordId>) {
        self.controller.emit(&Event::Selection(ids));
    }

    fn forward_record_changes(&mut self) {
        for change in self.records.drain_changes() {
            self.controller.emit(&Event::Records(change));
        }
    }

    // -- View state --------------------------------------------------------

    /// Returns the visible window.
    #[must_use]
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// Replaces the visible window and schedules the update.
    pub fn set_window(&mut self, window: TimeWindow) {
        self.window = window;
        self.controller.emit(&Event::Window(window));
    }

    /// Shifts the visible window.
    pub fn pan(&mut self, delta: TimeSpan) {
        self.set_window(self.window.pan(delta));
    }

    /// Scales the visible window around an anchor instant.
    pub fn zoom(&mut self, factor: f64, anchor: TimePoint) {
        self.set_window(self.window.zoom(factor, anchor));
    }

    /// Replaces the viewport size and schedules the update.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.controller.emit(&Event::Viewport(viewport));
    }

    /// Replaces the host text metrics.
    pub fn set_metrics(&mut self, metrics: Box<dyn TextMetrics>) {
        self.metrics = metrics;
        self.controller.request_reflow();
        self.controller.request_repaint();
    }

    // -- Access ------------------------------------------------------------

    /// Returns the controller.
    #[must_use]
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Returns the controller, mutably.
    #[must_use]
    pub fn controller_mut(&mut self) -> &mut Controller {
        &mut self.controller
    }

    /// Returns the scene, read-only.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Returns the scene, mutably (for draining changes by hand).
    #[must_use]
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The root frame's component id.
    #[must_use]
    pub fn frame(&self) -> ComponentId {
        self.frame
    }

    /// The time axis' component id.
    #[must_use]
    pub fn axis(&self) -> ComponentId {
        self.axis
    }

    /// The item set's component id.
    #[must_use]
    pub fn itemset(&self) -> ComponentId {
        self.itemset
    }

    // -- Driving -----------------------------------------------------------

    /// Runs an immediate synchronous repaint (plus its bounded chain).
    pub fn repaint(&mut self) -> Result<Vec<SweepReport>, SweepError> {
        let Self {
            controller,
            scene,
            window,
            viewport,
            orientation,
            metrics,
            ..
        } = self;
        let env = Environment {
            window: *window,
            viewport: *viewport,
            orientation: *orientation,
            metrics: metrics.as_ref(),
        };
        controller.repaint(scene, &env)
    }

    /// Runs an immediate synchronous reflow (plus its bounded chain).
    pub fn reflow(&mut self) -> Result<Vec<SweepReport>, SweepError> {
        let Self {
            controller,
            scene,
            window,
            viewport,
            orientation,
            metrics,
            ..
        } = self;
        let env = Environment {
            window: *window,
            viewport: *viewport,
            orientation: *orientation,
            metrics: metrics.as_ref(),
        };
        controller.reflow(scene, &env)
    }

    /// Runs the pending sweep chain, if any. The host's loop turn.
    pub fn flush(&mut self) -> Result<Vec<SweepReport>, SweepError> {
        let Self {
            controller,
            scene,
            window,
            viewport,
            orientation,
            metrics,
            ..
        } = self;
        let env = Environment {
            window: *window,
            viewport: *viewport,
            orientation: *orientation,
            metrics: metrics.as_ref(),
        };
        controller.flush(scene, &env)
    }

    /// Flushes until the controller is idle (bounded by `max_rounds`),
    /// then drains the scene changes into the presenter.
    ///
    /// Returns whether the tree settled within the budget.
    pub fn pump(
        &mut self,
        presenter: &mut dyn Presenter,
        max_rounds: usize,
    ) -> Result<bool, SweepError> {
        for _ in 0..max_rounds {
            if self.controller.is_idle() {
                break;
            }
            let _ = self.flush()?;
        }
        let changes = self.scene.take_changes();
        presenter.apply(&self.scene, &changes);
        Ok(self.controller.is_idle())
    }

    /// Drains the accumulated scene changes without presenting.
    pub fn take_changes(&mut self) -> SceneChanges {
        self.scene.take_changes()
    }
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("window", &self.window)
            .field("viewport", &self.viewport)
            .field("orientation", &self.orientation)
            .field("records", &self.records.len())
            .finish_non_exhaustive()
    }
}
