// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Calendar stepping for axis ticks.
//!
//! A [`TimeStep`] walks a time range in human-friendly increments: round
//! milliseconds, seconds, minutes, hours, days, months, or years. Given a
//! minimum step (derived from label width on screen), it picks the finest
//! scale whose increment still exceeds that minimum, snaps the cursor to
//! a scale boundary, and then advances increment by increment. Ticks on a
//! boundary of the next coarser unit are *major* and get the fuller
//! label.

use alloc::string::{String, ToString};

use chrono::{DateTime, Datelike, NaiveDateTime, TimeDelta, Timelike};

use varve_core::time::{TimePoint, TimeSpan};

/// The calendar unit a [`TimeStep`] advances by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepScale {
    /// Milliseconds.
    Millisecond,
    /// Seconds.
    Second,
    /// Minutes.
    Minute,
    /// Hours.
    Hour,
    /// Calendar days.
    Day,
    /// Calendar months.
    Month,
    /// Calendar years.
    Year,
}

/// Candidate steps from coarse to fine; the finest whose span still
/// exceeds the minimum step wins. Month and year entries use nominal
/// lengths (30 and 365 days), which is accurate enough for picking a
/// scale.
const CANDIDATES: &[(StepScale, i64)] = &[
    (StepScale::Year, 1000),
    (StepScale::Year, 500),
    (StepScale::Year, 100),
    (StepScale::Year, 50),
    (StepScale::Year, 10),
    (StepScale::Year, 5),
    (StepScale::Year, 1),
    (StepScale::Month, 3),
    (StepScale::Month, 1),
    (StepScale::Day, 5),
    (StepScale::Day, 2),
    (StepScale::Day, 1),
    (StepScale::Hour, 4),
    (StepScale::Hour, 1),
    (StepScale::Minute, 15),
    (StepScale::Minute, 10),
    (StepScale::Minute, 5),
    (StepScale::Minute, 1),
    (StepScale::Second, 15),
    (StepScale::Second, 10),
    (StepScale::Second, 5),
    (StepScale::Second, 1),
    (StepScale::Millisecond, 200),
    (StepScale::Millisecond, 100),
    (StepScale::Millisecond, 50),
    (StepScale::Millisecond, 10),
    (StepScale::Millisecond, 5),
    (StepScale::Millisecond, 1),
];

const NOMINAL_DAY: i64 = 86_400_000;
const NOMINAL_MONTH: i64 = 30 * NOMINAL_DAY;
const NOMINAL_YEAR: i64 = 365 * NOMINAL_DAY;

fn nominal_millis(scale: StepScale, step: i64) -> i64 {
    let unit = match scale {
        StepScale::Millisecond => 1,
        StepScale::Second => 1_000,
        StepScale::Minute => 60_000,
        StepScale::Hour => 3_600_000,
        StepScale::Day => NOMINAL_DAY,
        StepScale::Month => NOMINAL_MONTH,
        StepScale::Year => NOMINAL_YEAR,
    };
    unit * step
}

fn to_datetime(t: TimePoint) -> NaiveDateTime {
    DateTime::from_timestamp_millis(t.millis())
        .unwrap_or_default()
        .naive_utc()
}

fn to_point(dt: NaiveDateTime) -> TimePoint {
    TimePoint(dt.and_utc().timestamp_millis())
}

/// An iterator-like cursor over round tick instants in a range.
#[derive(Clone, Debug)]
pub struct TimeStep {
    start: NaiveDateTime,
    end: NaiveDateTime,
    current: NaiveDateTime,
    scale: StepScale,
    step: i64,
}

impl TimeStep {
    /// Creates a step over `[start, end]` whose increment is the finest
    /// round unit larger than `minimum_step`.
    #[must_use]
    pub fn new(start: TimePoint, end: TimePoint, minimum_step: TimeSpan) -> Self {
        let (scale, step) = Self::pick_scale(minimum_step);
        let start = to_datetime(start);
        Self {
            start,
            end: to_datetime(end),
            current: start,
            scale,
            step,
        }
    }

    fn pick_scale(minimum_step: TimeSpan) -> (StepScale, i64) {
        let minimum = minimum_step.millis().max(0);
        let mut chosen = CANDIDATES[0];
        for candidate in CANDIDATES {
            if nominal_millis(candidate.0, candidate.1) > minimum {
                chosen = *candidate;
            }
        }
        chosen
    }

    /// Returns the chosen scale.
    #[must_use]
    pub fn scale(&self) -> StepScale {
        self.scale
    }

    /// Returns the chosen step count in scale units.
    #[must_use]
    pub fn step(&self) -> i64 {
        self.step
    }

    /// Moves the cursor to the first tick at or before the range start.
    pub fn first(&mut self) {
        self.current = self.snap(self.start);
    }

    /// Returns whether the cursor is still inside the range.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current <= self.end
    }

    /// Returns the instant under the cursor.
    #[must_use]
    pub fn current(&self) -> TimePoint {
        to_point(self.current)
    }

    /// Advances the cursor by one step.
    pub fn next(&mut self) {
        let dt = self.current;
        self.current = match self.scale {
            StepScale::Millisecond => dt + TimeDelta::milliseconds(self.step),
            StepScale::Second => dt + TimeDelta::seconds(self.step),
            StepScale::Minute => dt + TimeDelta::minutes(self.step),
            StepScale::Hour => dt + TimeDelta::hours(self.step),
            StepScale::Day => dt + TimeDelta::days(self.step),
            StepScale::Month => add_months(dt, self.step),
            StepScale::Year => add_months(dt, self.step * 12),
        };
    }

    /// Returns whether the cursor sits on a boundary of the next coarser
    /// unit.
    #[must_use]
    pub fn is_major(&self) -> bool {
        let dt = self.current;
        match self.scale {
            StepScale::Millisecond => dt.and_utc().timestamp_subsec_millis() == 0,
            StepScale::Second => dt.second() == 0,
            StepScale::Minute => dt.hour() == 0 && dt.minute() == 0,
            StepScale::Hour => dt.hour() == 0,
            StepScale::Day => dt.day() == 1,
            StepScale::Month => dt.month() == 1,
            StepScale::Year => false,
        }
    }

    /// Returns the minor label for the cursor.
    #[must_use]
    pub fn label_minor(&self) -> String {
        Self::minor_label_at(self.scale, self.current())
    }

    /// Returns the major label for the cursor.
    #[must_use]
    pub fn label_major(&self) -> String {
        Self::major_label_at(self.scale, self.current())
    }

    /// Returns the minor label an instant would carry at a scale.
    #[must_use]
    pub fn minor_label_at(scale: StepScale, t: TimePoint) -> String {
        let dt = to_datetime(t);
        match scale {
            StepScale::Millisecond => {
                alloc::format!("{:03}", dt.and_utc().timestamp_subsec_millis())
            }
            StepScale::Second => dt.format("%S").to_string(),
            StepScale::Minute | StepScale::Hour => dt.format("%H:%M").to_string(),
            StepScale::Day => dt.format("%-d").to_string(),
            StepScale::Month => dt.format("%b").to_string(),
            StepScale::Year => dt.format("%Y").to_string(),
        }
    }

    /// Returns the major label an instant would carry at a scale.
    ///
    /// Used both for the cursor and for the sticky label at the left edge
    /// of the axis.
    #[must_use]
    pub fn major_label_at(scale: StepScale, t: TimePoint) -> String {
        let dt = to_datetime(t);
        match scale {
            StepScale::Millisecond | StepScale::Second => dt.format("%H:%M:%S").to_string(),
            StepScale::Minute | StepScale::Hour => dt.format("%a %-d %B").to_string(),
            StepScale::Day => dt.format("%B %Y").to_string(),
            StepScale::Month => dt.format("%Y").to_string(),
            StepScale::Year => String::new(),
        }
    }

    /// Rounds an instant down to the nearest step boundary.
    fn snap(&self, dt: NaiveDateTime) -> NaiveDateTime {
        let step = self.step;
        let date = dt.date();
        match self.scale {
            StepScale::Millisecond => {
                let ms = i64::from(dt.and_utc().timestamp_subsec_millis());
                dt - TimeDelta::milliseconds(ms % step)
            }
            StepScale::Second => {
                let snapped = i64::from(dt.second()) - i64::from(dt.second()) % step;
                truncate_time(dt, dt.hour(), dt.minute(), u32_from(snapped))
            }
            StepScale::Minute => {
                let snapped = i64::from(dt.minute()) - i64::from(dt.minute()) % step;
                truncate_time(dt, dt.hour(), u32_from(snapped), 0)
            }
            StepScale::Hour => {
                let snapped = i64::from(dt.hour()) - i64::from(dt.hour()) % step;
                truncate_time(dt, u32_from(snapped), 0, 0)
            }
            StepScale::Day => date.and_hms_opt(0, 0, 0).unwrap_or(dt),
            StepScale::Month => date
                .with_day(1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or(dt),
            StepScale::Year => {
                let snapped_year = i64::from(date.year()) - i64::from(date.year()).rem_euclid(step);
                date.with_day(1)
                    .and_then(|d| d.with_month(1))
                    .and_then(|d| d.with_year(i32::try_from(snapped_year).unwrap_or(date.year())))
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .unwrap_or(dt)
            }
        }
    }
}

fn u32_from(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(0)
}

fn truncate_time(dt: NaiveDateTime, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    dt.date()
        .and_hms_opt(hour, minute, second)
        .unwrap_or(dt)
}

/// Advances a datetime by whole calendar months, clamping to the first of
/// the month (the cursor is always snapped there for the month scale).
fn add_months(dt: NaiveDateTime, months: i64) -> NaiveDateTime {
    let total = i64::from(dt.year()) * 12 + i64::from(dt.month0()) + months;
    let year = i32::try_from(total.div_euclid(12)).unwrap_or(dt.year());
    let month0 = u32_from(total.rem_euclid(12));
    dt.with_day(1)
        .and_then(|d| d.with_month0(month0))
        .and_then(|d| d.with_year(year))
        .unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: i64 = 3_600_000;
    const DAY: i64 = 86_400_000;

    // 2013-04-25 13:37:45.123 UTC
    const T0: i64 = 1_366_897_065_123;

    fn step_over(span_ms: i64, minimum_ms: i64) -> TimeStep {
        TimeStep::new(
            TimePoint(T0),
            TimePoint(T0 + span_ms),
            TimeSpan(minimum_ms),
        )
    }

    #[test]
    fn scale_selection_tracks_minimum_step() {
        assert_eq!(step_over(DAY, 0).scale(), StepScale::Millisecond);
        let s = step_over(DAY, 30_000);
        assert_eq!((s.scale(), s.step()), (StepScale::Minute, 1));
        let s = step_over(DAY, 10 * 60_000);
        assert_eq!((s.scale(), s.step()), (StepScale::Minute, 15));
        let s = step_over(30 * DAY, 2 * HOUR);
        assert_eq!((s.scale(), s.step()), (StepScale::Hour, 4));
        let s = step_over(365 * DAY, 40 * DAY);
        assert_eq!((s.scale(), s.step()), (StepScale::Month, 3));
        let s = step_over(365 * DAY, 400 * DAY);
        assert_eq!((s.scale(), s.step()), (StepScale::Year, 5));
    }

    #[test]
    fn first_snaps_to_a_round_boundary() {
        let mut s = step_over(DAY, 30_000); // minutes
        s.first();
        // 13:37:45.123 snaps down to 13:37:00.000.
        assert_eq!(s.current().millis(), T0 - 45_123);

        let mut s = step_over(30 * DAY, 2 * HOUR); // 4-hour steps
        s.first();
        // 13:37 snaps down to 12:00.
        let snapped = to_datetime(s.current());
        assert_eq!((snapped.hour(), snapped.minute()), (12, 0));
    }

    #[test]
    fn stepping_walks_the_whole_range() {
        let mut s = step_over(HOUR, 10 * 60_000); // 15-minute steps
        s.first();
        let mut ticks = 0;
        while s.has_next() {
            ticks += 1;
            s.next();
        }
        // 13:30, 13:45, 14:00, ..., 14:30 (snap precedes the range start).
        assert_eq!(ticks, 5);
    }

    #[test]
    fn month_stepping_crosses_year_boundaries() {
        // 2013-11-05
        let start = TimePoint(1_383_609_600_000);
        let mut s = TimeStep::new(start, start + TimeSpan(200 * DAY), TimeSpan(40 * DAY));
        assert_eq!(s.scale(), StepScale::Month);
        s.first();

        let mut months = alloc::vec::Vec::new();
        while s.has_next() {
            months.push(to_datetime(s.current()).format("%Y-%m").to_string());
            s.next();
        }
        assert_eq!(months, ["2013-11", "2014-02", "2014-05"]);
    }

    #[test]
    fn major_ticks_sit_on_coarser_boundaries() {
        let mut s = step_over(3 * DAY, 2 * HOUR); // 4-hour steps
        s.first();
        let mut majors = 0;
        while s.has_next() {
            if s.is_major() {
                majors += 1;
                assert_eq!(to_datetime(s.current()).hour(), 0, "majors at midnight");
            }
            s.next();
        }
        assert_eq!(majors, 3);
    }

    #[test]
    fn labels_have_scale_appropriate_shapes() {
        let t = TimePoint(T0);
        assert_eq!(TimeStep::minor_label_at(StepScale::Minute, t), "13:37");
        assert_eq!(TimeStep::minor_label_at(StepScale::Day, t), "25");
        assert_eq!(TimeStep::minor_label_at(StepScale::Month, t), "Apr");
        assert_eq!(TimeStep::minor_label_at(StepScale::Year, t), "2013");
        assert_eq!(
            TimeStep::major_label_at(StepScale::Hour, t),
            "Thu 25 April"
        );
        assert_eq!(TimeStep::major_label_at(StepScale::Day, t), "April 2013");
        assert_eq!(TimeStep::major_label_at(StepScale::Year, t), "");
    }
}
