// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Component configuration bags.
//!
//! An [`Options`] value is what `configure` merges into a component. The
//! cross-cutting keys every component understands — `id`, `parent`,
//! `depends_on` — are typed fields. Everything else is an ordered, opaque
//! key/value list that the concrete component interprets (extents, class
//! names, feature toggles). Merging is last-writer-wins per key; keys that
//! a later bag does not mention keep their earlier values.
//!
//! [`Extent`] is the size model used by container options: an absolute
//! pixel length, a percentage of the parent, or `Auto` (defer to a
//! caller-supplied default).

use alloc::string::String;
use alloc::vec::Vec;

use crate::component::ComponentId;
use crate::time::TimePoint;

/// A one-dimensional size or position option.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Extent {
    /// No explicit value; use the component's default.
    #[default]
    Auto,
    /// An absolute length in pixels.
    Px(f64),
    /// A percentage of the available length.
    Percent(f64),
}

impl Extent {
    /// Resolves this extent against an available length, or `None` for
    /// [`Extent::Auto`].
    #[must_use]
    pub fn resolve(self, available: f64) -> Option<f64> {
        match self {
            Self::Auto => None,
            Self::Px(px) => Some(px),
            Self::Percent(pct) => Some(available * pct / 100.0),
        }
    }

    /// Resolves this extent against an available length, falling back to
    /// `default` for [`Extent::Auto`].
    #[must_use]
    pub fn resolve_or(self, available: f64, default: f64) -> f64 {
        self.resolve(available).unwrap_or(default)
    }
}

/// A typed option value.
#[derive(Clone, Debug, PartialEq)]
pub enum OptionValue {
    /// A boolean toggle.
    Bool(bool),
    /// An integer value.
    Int(i64),
    /// A floating-point value.
    Float(f64),
    /// A text value (class names, labels).
    Text(String),
    /// A size or position.
    Extent(Extent),
    /// An instant.
    Time(TimePoint),
}

impl OptionValue {
    /// Returns the boolean value, if this is a [`OptionValue::Bool`].
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the text value, if this is a [`OptionValue::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the extent value, if this is an [`OptionValue::Extent`].
    #[must_use]
    pub fn as_extent(&self) -> Option<Extent> {
        match self {
            Self::Extent(e) => Some(*e),
            _ => None,
        }
    }
}

/// A mergeable set of component options.
///
/// Built with the `with_*` constructors and consumed by
/// [`ComponentCore::configure`](crate::component::ComponentCore::configure)
/// or [`Controller::configure`](crate::controller::Controller::configure).
#[derive(Clone, Debug, Default)]
pub struct Options {
    /// Explicit component id. Extracted by `configure`; when absent and
    /// the component has no id yet, one is generated.
    pub id: Option<ComponentId>,
    /// Parent component, if provided. Merging never clears an existing
    /// parent.
    pub parent: Option<ComponentId>,
    /// Replacement dependency list, if provided.
    pub depends_on: Option<Vec<ComponentId>>,
    entries: Vec<(String, OptionValue)>,
}

impl Options {
    /// Creates an empty options bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the explicit component id.
    #[must_use]
    pub fn with_id(mut self, id: ComponentId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the parent component.
    #[must_use]
    pub fn with_parent(mut self, parent: ComponentId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the dependency list.
    #[must_use]
    pub fn with_depends_on(mut self, depends_on: Vec<ComponentId>) -> Self {
        self.depends_on = Some(depends_on);
        self
    }

    /// Sets an opaque option, replacing any earlier value for the key.
    #[must_use]
    pub fn with(mut self, key: &str, value: OptionValue) -> Self {
        self.set(key, value);
        self
    }

    /// Sets an opaque option in place.
    pub fn set(&mut self, key: &str, value: OptionValue) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
            entry.1 = value;
        } else {
            self.entries.push((String::from(key), value));
        }
    }

    /// Looks up an opaque option by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Looks up an extent-valued option by key.
    #[must_use]
    pub fn extent(&self, key: &str) -> Option<Extent> {
        self.get(key).and_then(OptionValue::as_extent)
    }

    /// Looks up a text-valued option by key.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(OptionValue::as_text)
    }

    /// Looks up a boolean option by key, with a default for absent keys.
    #[must_use]
    pub fn flag(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(OptionValue::as_bool).unwrap_or(default)
    }

    /// Merges `other` into `self`: provided typed fields and keys win,
    /// everything else is untouched.
    pub fn merge(&mut self, other: Self) {
        if other.id.is_some() {
            self.id = other.id;
        }
        if other.parent.is_some() {
            self.parent = other.parent;
        }
        if other.depends_on.is_some() {
            self.depends_on = other.depends_on;
        }
        for (key, value) in other.entries {
            self.set(&key, value);
        }
    }

    /// Returns the opaque entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[(String, OptionValue)] {
        &self.entries
    }
}
