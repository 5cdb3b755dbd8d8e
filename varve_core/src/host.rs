// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for embedding platforms.
//!
//! Varve splits platform-specific work out of the engine. An embedding
//! host provides the following pieces:
//!
//! - **Loop turns** — The host owns the event loop. After mutating data or
//!   receiving input it checks
//!   [`Controller::pending`](crate::controller::Controller::pending) and
//!   calls [`flush`](crate::controller::Controller::flush) on its next
//!   turn; that call plays the role of the zero-delay deferred task in a
//!   browser host.
//!
//! - **Text metrics** — Implements [`TextMetrics`] so components can size
//!   labels without a rendered document to measure against.
//!
//! - **Presenter** — Implements the [`Presenter`] trait to apply drained
//!   scene changes to a platform-native tree (DOM nodes, canvas draw
//!   lists, a test double).
//!
//! # Crate boundaries
//!
//! `varve_core` owns the data model, scheduling, scene, and this contract
//! module. Widget crates depend on `varve_core` and provide components.
//! Application code depends on both and wires them together in a loop.

use kurbo::Size;

use crate::scene::{Scene, SceneChanges};

/// Applies drained scene changes to a platform-native presentation tree.
///
/// Both DOM-backed and draw-list presenters implement this trait, enabling
/// generic update loops and test doubles.
///
/// # Update loop pseudocode
///
/// A typical host turn wires the pieces together like this:
///
/// ```rust,ignore
/// fn on_turn(timeline: &mut Timeline, presenter: &mut impl Presenter) {
///     // Data arrived earlier: timeline.records_mut().insert(...) filed
///     // coalesced sweep requests through emitted events.
///
///     // Flush: run pending reflow/repaint sweeps in dependency order.
///     timeline.flush()?;
///
///     // Present: apply incremental changes to the native tree.
///     let changes = timeline.scene_mut().take_changes();
///     presenter.apply(timeline.scene(), &changes);
/// }
/// ```
pub trait Presenter {
    /// Applies the given [`SceneChanges`] to the backing presentation
    /// tree, reading current property values from `scene` as needed.
    fn apply(&mut self, scene: &Scene, changes: &SceneChanges);
}

/// Supplies text measurement to components.
///
/// The original browser implementation measured a sample glyph in the
/// live document; a headless engine must be handed the equivalent
/// numbers. Class strings match the element classes components use
/// (e.g. `"text minor"`), letting hosts vary metrics per style.
pub trait TextMetrics {
    /// Returns the size of a single character rendered with `class`.
    fn char_size(&self, class: &str) -> Size;

    /// Returns the rendered width of `text` with `class`.
    ///
    /// The default assumes fixed-pitch glyphs.
    fn text_width(&self, text: &str, class: &str) -> f64 {
        text.chars().count() as f64 * self.char_size(class).width
    }
}

/// Fixed-pitch metrics for headless hosts and tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedMetrics {
    /// Width of every character, in pixels.
    pub char_width: f64,
    /// Height of every line, in pixels.
    pub char_height: f64,
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            char_height: 16.0,
        }
    }
}

impl TextMetrics for FixedMetrics {
    fn char_size(&self, _class: &str) -> Size {
        Size::new(self.char_width, self.char_height)
    }
}
