// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time primitives: instants, spans, the visible window, and the linear
//! screen/time conversion.
//!
//! [`TimePoint`] represents a point in time as milliseconds since the Unix
//! epoch. Timelines routinely address historic dates, so the value is
//! signed.
//!
//! [`TimeSpan`] is a signed duration in the same millisecond units.
//!
//! [`TimeWindow`] is the half-open interval `[start, end)` currently shown
//! by a timeline, with pan and zoom operations that preserve its
//! invariants.
//!
//! [`TimeScale`] is the affine conversion between window time and
//! horizontal pixels, rebuilt whenever the window or the rendered width
//! changes.

use core::fmt;
use core::ops::{Add, Neg, Sub};

/// A point in time expressed as milliseconds since the Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimePoint(pub i64);

impl TimePoint {
    /// The Unix epoch itself.
    pub const EPOCH: Self = Self(0);

    /// Returns the raw millisecond value.
    #[inline]
    #[must_use]
    pub const fn millis(self) -> i64 {
        self.0
    }

    /// Creates a time point from a millisecond value.
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Saturating addition of a span.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, span: TimeSpan) -> Self {
        Self(self.0.saturating_add(span.0))
    }

    /// Saturating subtraction of a span.
    #[inline]
    #[must_use]
    pub const fn saturating_sub(self, span: TimeSpan) -> Self {
        Self(self.0.saturating_sub(span.0))
    }

    /// Returns the smaller of two time points.
    #[inline]
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        if other.0 < self.0 { other } else { self }
    }

    /// Returns the larger of two time points.
    #[inline]
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        if other.0 > self.0 { other } else { self }
    }
}

impl Add<TimeSpan> for TimePoint {
    type Output = Self;

    #[inline]
    fn add(self, rhs: TimeSpan) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub<TimeSpan> for TimePoint {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: TimeSpan) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sub for TimePoint {
    type Output = TimeSpan;

    #[inline]
    fn sub(self, rhs: Self) -> TimeSpan {
        TimeSpan(self.0 - rhs.0)
    }
}

impl fmt::Debug for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimePoint({})", self.0)
    }
}

/// A signed duration in milliseconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeSpan(pub i64);

impl TimeSpan {
    /// A zero-length span.
    pub const ZERO: Self = Self(0);

    /// One second.
    pub const SECOND: Self = Self(1_000);

    /// One minute.
    pub const MINUTE: Self = Self(60_000);

    /// One hour.
    pub const HOUR: Self = Self(3_600_000);

    /// One day (86 400 000 ms; calendar irregularities are the concern of
    /// calendar stepping, not of this type).
    pub const DAY: Self = Self(86_400_000);

    /// Returns the raw millisecond value.
    #[inline]
    #[must_use]
    pub const fn millis(self) -> i64 {
        self.0
    }

    /// Creates a span from a millisecond value.
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the absolute value of this span.
    #[inline]
    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Saturating addition.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    /// Saturating subtraction.
    #[inline]
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Add for TimeSpan {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for TimeSpan {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for TimeSpan {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl fmt::Debug for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeSpan({})", self.0)
    }
}

/// The half-open time interval `[start, end)` a timeline currently shows.
///
/// The window always spans at least [`TimeWindow::MIN_SPAN`]; constructors
/// and transformations uphold this.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    start: TimePoint,
    end: TimePoint,
}

impl TimeWindow {
    /// The smallest representable window span.
    pub const MIN_SPAN: TimeSpan = TimeSpan(10);

    /// Creates a window from its bounds.
    ///
    /// # Panics
    ///
    /// Panics if `end - start` is smaller than [`Self::MIN_SPAN`].
    #[must_use]
    pub fn new(start: TimePoint, end: TimePoint) -> Self {
        assert!(
            end - start >= Self::MIN_SPAN,
            "window span must be at least {} ms",
            Self::MIN_SPAN.millis()
        );
        Self { start, end }
    }

    /// Returns the inclusive start of the window.
    #[inline]
    #[must_use]
    pub const fn start(self) -> TimePoint {
        self.start
    }

    /// Returns the exclusive end of the window.
    #[inline]
    #[must_use]
    pub const fn end(self) -> TimePoint {
        self.end
    }

    /// Returns the span covered by the window.
    #[inline]
    #[must_use]
    pub fn span(self) -> TimeSpan {
        self.end - self.start
    }

    /// Returns whether the window contains the given instant.
    #[inline]
    #[must_use]
    pub fn contains(self, t: TimePoint) -> bool {
        t >= self.start && t < self.end
    }

    /// Returns whether the interval `[start, end]` overlaps the window.
    ///
    /// A point item passes `end = start`.
    #[must_use]
    pub fn overlaps(self, start: TimePoint, end: TimePoint) -> bool {
        start < self.end && end >= self.start
    }

    /// Returns the window shifted by `delta`, preserving its span.
    #[must_use]
    pub fn pan(self, delta: TimeSpan) -> Self {
        Self {
            start: self.start.saturating_add(delta),
            end: self.end.saturating_add(delta),
        }
    }

    /// Returns the window scaled by `factor` around `anchor`.
    ///
    /// `factor` greater than one zooms out (a longer span), smaller than
    /// one zooms in. The result is clamped so the span never drops below
    /// [`Self::MIN_SPAN`], and non-finite or non-positive factors leave
    /// the window unchanged.
    #[must_use]
    pub fn zoom(self, factor: f64, anchor: TimePoint) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return self;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "window spans are far below 2^52, so the f64 round-trip is exact enough"
        )]
        let scale = |span: i64| -> i64 { (span as f64 * factor) as i64 };
        let mut start = anchor.0 - scale(anchor.0 - self.start.0);
        let mut end = anchor.0 + scale(self.end.0 - anchor.0);
        if end - start < Self::MIN_SPAN.0 {
            // Grow symmetrically back to the minimum span.
            let mid = start + (end - start) / 2;
            start = mid - Self::MIN_SPAN.0 / 2;
            end = start + Self::MIN_SPAN.0;
        }
        Self {
            start: TimePoint(start),
            end: TimePoint(end),
        }
    }
}

impl fmt::Debug for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeWindow({}..{})", self.start.0, self.end.0)
    }
}

/// The affine conversion between window time and horizontal pixels.
///
/// Built from a [`TimeWindow`] and a rendered width; `x = (t - start) *
/// factor`. Must be rebuilt whenever either input changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    offset: TimePoint,
    factor: f64,
}

impl TimeScale {
    /// Creates a scale mapping `window` onto `width` pixels.
    #[must_use]
    pub fn new(window: TimeWindow, width: f64) -> Self {
        let span = window.span().millis();
        let factor = if span > 0 && width.is_finite() && width > 0.0 {
            width / span as f64
        } else {
            0.0
        };
        Self {
            offset: window.start(),
            factor,
        }
    }

    /// Converts an instant into a horizontal pixel position.
    #[inline]
    #[must_use]
    pub fn to_screen(self, t: TimePoint) -> f64 {
        (t - self.offset).millis() as f64 * self.factor
    }

    /// Converts a horizontal pixel position back into an instant.
    ///
    /// For a degenerate scale (zero width) this returns the window start.
    #[inline]
    #[must_use]
    pub fn to_time(self, x: f64) -> TimePoint {
        if self.factor == 0.0 {
            return self.offset;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "pixel coordinates map back into the window's millisecond range"
        )]
        let millis = (x / self.factor) as i64;
        self.offset + TimeSpan(millis)
    }

    /// Converts a pixel distance into a span.
    #[inline]
    #[must_use]
    pub fn to_span(self, pixels: f64) -> TimeSpan {
        self.to_time(pixels) - self.to_time(0.0)
    }

    /// Returns the pixels-per-millisecond factor.
    #[inline]
    #[must_use]
    pub const fn factor(self) -> f64 {
        self.factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_span_arithmetic() {
        let t = TimePoint(1_000);
        let d = TimeSpan(250);
        assert_eq!((t + d).millis(), 1_250);
        assert_eq!((t - d).millis(), 750);
        assert_eq!(TimePoint(500) - TimePoint(200), TimeSpan(300));
        assert_eq!(TimeSpan(-40).abs(), TimeSpan(40));
        assert_eq!(-TimeSpan(40), TimeSpan(-40));
    }

    #[test]
    fn window_contains_and_overlaps() {
        let w = TimeWindow::new(TimePoint(100), TimePoint(200));
        assert!(w.contains(TimePoint(100)));
        assert!(w.contains(TimePoint(199)));
        assert!(!w.contains(TimePoint(200)), "end is exclusive");

        assert!(w.overlaps(TimePoint(150), TimePoint(150)), "point inside");
        assert!(w.overlaps(TimePoint(0), TimePoint(100)), "touching start");
        assert!(!w.overlaps(TimePoint(200), TimePoint(300)), "past the end");
    }

    #[test]
    fn window_pan_preserves_span() {
        let w = TimeWindow::new(TimePoint(0), TimePoint(1_000));
        let panned = w.pan(TimeSpan(500));
        assert_eq!(panned.start(), TimePoint(500));
        assert_eq!(panned.end(), TimePoint(1_500));
        assert_eq!(panned.span(), w.span());
    }

    #[test]
    fn window_zoom_out_and_in() {
        let w = TimeWindow::new(TimePoint(0), TimePoint(1_000));
        let out = w.zoom(2.0, TimePoint(500));
        assert_eq!(out.start(), TimePoint(-500));
        assert_eq!(out.end(), TimePoint(1_500));

        let back = out.zoom(0.5, TimePoint(500));
        assert_eq!(back.start(), TimePoint(0));
        assert_eq!(back.end(), TimePoint(1_000));
    }

    #[test]
    fn window_zoom_clamps_to_min_span() {
        let w = TimeWindow::new(TimePoint(0), TimePoint(1_000));
        let tiny = w.zoom(1e-9, TimePoint(500));
        assert!(tiny.span() >= TimeWindow::MIN_SPAN);
    }

    #[test]
    fn window_zoom_rejects_bad_factors() {
        let w = TimeWindow::new(TimePoint(0), TimePoint(1_000));
        assert_eq!(w.zoom(f64::NAN, TimePoint(0)), w);
        assert_eq!(w.zoom(-1.0, TimePoint(0)), w);
        assert_eq!(w.zoom(0.0, TimePoint(0)), w);
    }

    #[test]
    #[should_panic(expected = "window span must be at least")]
    fn window_rejects_inverted_bounds() {
        let _ = TimeWindow::new(TimePoint(100), TimePoint(50));
    }

    #[test]
    fn scale_round_trips() {
        let w = TimeWindow::new(TimePoint(1_000), TimePoint(2_000));
        let scale = TimeScale::new(w, 500.0);

        assert_eq!(scale.to_screen(TimePoint(1_000)), 0.0);
        assert_eq!(scale.to_screen(TimePoint(2_000)), 500.0);
        assert_eq!(scale.to_time(250.0), TimePoint(1_500));
        assert_eq!(scale.to_span(250.0), TimeSpan(500));
    }

    #[test]
    fn degenerate_scale_is_inert() {
        let w = TimeWindow::new(TimePoint(0), TimePoint(1_000));
        let scale = TimeScale::new(w, 0.0);
        assert_eq!(scale.to_screen(TimePoint(500)), 0.0);
        assert_eq!(scale.to_time(123.0), TimePoint(0));
    }
}
