// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The typed record store backing a timeline's item set.
//!
//! [`RecordSet`] is a keyed store of [`TimelineRecord`]s with upsert,
//! update, remove, and clear operations. Every mutation appends a
//! [`RecordChange`] to an internal changelog; the embedding application
//! drains the changelog and forwards it as
//! [`Event::Records`](crate::event::Event::Records) so that subscribed
//! components stay in sync. This drainable changelog is the
//! subscribe-on-change contract the scheduling core consumes — the store
//! itself never talks to a controller.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::time::TimePoint;

/// A handle to a record in a [`RecordSet`].
///
/// Ids are either supplied by the caller or allocated by the store.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(pub u64);

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

/// How an item is rendered on the timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemShape {
    /// A labeled box above the axis, connected to its instant by a line
    /// and a dot.
    Box,
    /// A dot at the instant with the label beside it.
    Point,
    /// A block spanning from start to end.
    Range,
}

/// One timeline entry.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineRecord {
    /// The instant the item starts at.
    pub start: TimePoint,
    /// The instant the item ends at, for ranged items.
    pub end: Option<TimePoint>,
    /// The text shown in the item.
    pub content: String,
    /// Explicit shape override. When absent, records with an `end` render
    /// as ranges and the rest as boxes.
    pub shape: Option<ItemShape>,
    /// Extra class applied to the item's elements.
    pub class: Option<String>,
}

impl TimelineRecord {
    /// Creates a record at an instant with the given content.
    #[must_use]
    pub fn new(start: TimePoint, content: impl Into<String>) -> Self {
        Self {
            start,
            end: None,
            content: content.into(),
            shape: None,
            class: None,
        }
    }

    /// Sets the end instant, making this a ranged record.
    #[must_use]
    pub fn with_end(mut self, end: TimePoint) -> Self {
        self.end = Some(end);
        self
    }

    /// Overrides the rendered shape.
    #[must_use]
    pub fn with_shape(mut self, shape: ItemShape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Sets an extra element class.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Returns the shape this record renders as.
    #[must_use]
    pub fn resolved_shape(&self) -> ItemShape {
        self.shape.unwrap_or(if self.end.is_some() {
            ItemShape::Range
        } else {
            ItemShape::Box
        })
    }
}

/// One entry in the record changelog.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordChange {
    /// A record was created.
    Added {
        /// The new record's id.
        id: RecordId,
        /// The record as stored.
        record: TimelineRecord,
    },
    /// An existing record was replaced.
    Updated {
        /// The changed record's id.
        id: RecordId,
        /// The record as stored after the update.
        record: TimelineRecord,
    },
    /// A record was removed.
    Removed {
        /// The removed record's id.
        id: RecordId,
    },
    /// The whole store was cleared.
    Cleared,
}

/// A keyed store of timeline records with a drainable changelog.
///
/// Iteration order is ascending by id, so repeated traversals are
/// deterministic.
#[derive(Debug, Default)]
pub struct RecordSet {
    records: BTreeMap<RecordId, TimelineRecord>,
    next_id: u64,
    changes: Vec<RecordChange>,
}

impl RecordSet {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record under a freshly allocated id and returns the id.
    pub fn add(&mut self, record: TimelineRecord) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id += 1;
        self.records.insert(id, record.clone());
        self.changes.push(RecordChange::Added { id, record });
        id
    }

    /// Inserts a record under an explicit id, replacing any existing
    /// record (upsert). Returns whether a record already existed.
    pub fn insert(&mut self, id: RecordId, record: TimelineRecord) -> bool {
        self.next_id = self.next_id.max(id.0 + 1);
        let replaced = self.records.insert(id, record.clone()).is_some();
        self.changes.push(if replaced {
            RecordChange::Updated { id, record }
        } else {
            RecordChange::Added { id, record }
        });
        replaced
    }

    /// Removes a record, returning it if it existed.
    pub fn remove(&mut self, id: RecordId) -> Option<TimelineRecord> {
        let removed = self.records.remove(&id);
        if removed.is_some() {
            self.changes.push(RecordChange::Removed { id });
        }
        removed
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        if !self.records.is_empty() {
            self.records.clear();
            self.changes.push(RecordChange::Cleared);
        }
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&TimelineRecord> {
        self.records.get(&id)
    }

    /// Returns an iterator over `(id, record)` pairs in ascending id
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &TimelineRecord)> {
        self.records.iter().map(|(id, record)| (*id, record))
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns whether undrained changes exist.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Takes the accumulated changelog, leaving it empty.
    pub fn drain_changes(&mut self) -> Vec<RecordChange> {
        core::mem::take(&mut self.changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_allocates_distinct_ids() {
        let mut set = RecordSet::new();
        let a = set.add(TimelineRecord::new(TimePoint(1), "a"));
        let b = set.add(TimelineRecord::new(TimePoint(2), "b"));
        assert_ne!(a, b);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn insert_is_upsert() {
        let mut set = RecordSet::new();
        let id = RecordId(7);
        assert!(!set.insert(id, TimelineRecord::new(TimePoint(1), "v1")));
        assert!(set.insert(id, TimelineRecord::new(TimePoint(1), "v2")));
        assert_eq!(set.get(id).unwrap().content, "v2");

        let changes = set.drain_changes();
        assert!(matches!(changes[0], RecordChange::Added { .. }));
        assert!(matches!(changes[1], RecordChange::Updated { .. }));
    }

    #[test]
    fn insert_advances_generated_ids_past_explicit_ones() {
        let mut set = RecordSet::new();
        set.insert(RecordId(10), TimelineRecord::new(TimePoint(1), "x"));
        let generated = set.add(TimelineRecord::new(TimePoint(2), "y"));
        assert!(generated.0 > 10, "generated id must not collide");
    }

    #[test]
    fn remove_and_clear_log_changes() {
        let mut set = RecordSet::new();
        let id = set.add(TimelineRecord::new(TimePoint(1), "a"));
        set.add(TimelineRecord::new(TimePoint(2), "b"));
        let _ = set.drain_changes();

        assert!(set.remove(id).is_some());
        assert!(set.remove(id).is_none(), "double remove is a no-op");
        set.clear();

        let changes = set.drain_changes();
        assert_eq!(changes.len(), 2);
        assert!(matches!(changes[0], RecordChange::Removed { id: r } if r == id));
        assert!(matches!(changes[1], RecordChange::Cleared));
    }

    #[test]
    fn changelog_drains_once() {
        let mut set = RecordSet::new();
        set.add(TimelineRecord::new(TimePoint(1), "a"));
        assert!(set.has_changes());
        assert_eq!(set.drain_changes().len(), 1);
        assert!(!set.has_changes());
        assert!(set.drain_changes().is_empty());
    }

    #[test]
    fn shape_inference() {
        let point = TimelineRecord::new(TimePoint(1), "p");
        assert_eq!(point.resolved_shape(), ItemShape::Box);

        let range = TimelineRecord::new(TimePoint(1), "r").with_end(TimePoint(5));
        assert_eq!(range.resolved_shape(), ItemShape::Range);

        let explicit = TimelineRecord::new(TimePoint(1), "e").with_shape(ItemShape::Point);
        assert_eq!(explicit.resolved_shape(), ItemShape::Point);
    }
}
