// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The component contract.
//!
//! A *component* is a visual node participating in the reflow/repaint
//! cycle: the time axis, the item set, the panels that nest them, and the
//! root frame. Concrete widgets implement the [`Component`] trait and
//! embed a [`ComponentCore`] carrying the cross-cutting state every node
//! has: identity, parent, ordered dependencies, attachment, opaque
//! options, and queued event subscriptions.
//!
//! The two phases are split deliberately:
//!
//! - `reflow` **measures** — it computes the component's bounds from its
//!   options, its parent's bounds, and its content, and must not mutate
//!   the scene.
//! - `repaint` **mutates** — it creates, updates, and removes scene
//!   elements, reading the geometry the reflow phase produced.
//!
//! Either phase may discover that the other is needed (a repaint that
//! created elements wants them measured; a reflow that changed a size
//! wants it drawn) and files a request through its context. The
//! [`Controller`](crate::controller::Controller) coalesces those requests
//! and re-drains them with a bounded synchronous cross-trigger.

use core::error::Error;
use core::fmt;

use kurbo::Rect;
use uuid::Uuid;

use alloc::vec::Vec;

use crate::context::{LayoutContext, PaintContext, SweepRequests};
use crate::event::{Event, EventKind};
use crate::options::Options;
use crate::scene::ElementId;

/// A component's identity within a controller registry.
///
/// Ids are random 128-bit values, so independently constructed components
/// never collide; an explicit id can be supplied through
/// [`Options::with_id`](crate::options::Options::with_id).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(Uuid);

impl ComponentId {
    /// Generates a fresh random id.
    #[must_use]
    #[expect(clippy::new_without_default, reason = "every call yields a distinct id")]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The first UUID group is plenty for diagnostics.
        let bytes = self.0.as_bytes();
        write!(
            f,
            "ComponentId({:02x}{:02x}{:02x}{:02x})",
            bytes[0], bytes[1], bytes[2], bytes[3]
        )
    }
}

/// Identifies a controller instance.
///
/// Stored in each registered component's core as the back-reference
/// required by the attachment invariant: a component belongs to exactly
/// one controller, bound once at registration.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControllerId(Uuid);

impl ControllerId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Debug for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0.as_bytes();
        write!(
            f,
            "ControllerId({:02x}{:02x}{:02x}{:02x})",
            bytes[0], bytes[1], bytes[2], bytes[3]
        )
    }
}

/// Capability tag used to locate components without runtime type
/// inspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// The root frame hosting everything else.
    Frame,
    /// A nested container panel.
    Panel,
    /// The horizontal time axis.
    TimeAxis,
    /// The set of timeline items.
    ItemSet,
    /// An externally defined component.
    Custom(u16),
}

/// An error raised by a component during a sweep.
///
/// Sweeps abort at the first failing component; the controller wraps this
/// in a [`SweepError`](crate::controller::SweepError) naming the
/// component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentError {
    /// The component requires a configured parent.
    MissingParent,
    /// The component's parent exposes no container element to nest into.
    NoParentContainer,
    /// A component-specific invariant was violated.
    Invalid(&'static str),
}

impl fmt::Display for ComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParent => write!(f, "no parent configured"),
            Self::NoParentContainer => write!(f, "parent has no container element"),
            Self::Invalid(what) => write!(f, "{what}"),
        }
    }
}

impl Error for ComponentError {}

/// The cross-cutting state embedded in every component.
#[derive(Debug, Default)]
pub struct ComponentCore {
    id: Option<ComponentId>,
    parent: Option<ComponentId>,
    depends_on: Vec<ComponentId>,
    attached: Option<ControllerId>,
    options: Options,
    queued_subscriptions: Vec<EventKind>,
}

impl ComponentCore {
    /// Creates an unconfigured core with no id.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a core and applies an initial options bag.
    #[must_use]
    pub fn configured(options: Options) -> Self {
        let mut core = Self::new();
        let _ = core.configure(options);
        core
    }

    /// Merges an options bag into this core.
    ///
    /// The cross-cutting keys `id`, `parent`, and `depends_on` are
    /// extracted into their typed fields; the remaining entries are merged
    /// into the opaque option store for the concrete component to read. A
    /// component that still has no id after the merge gets a generated
    /// one.
    ///
    /// Returns whether the component is attached to a controller — in
    /// that case the merge must be routed through
    /// [`Controller::configure`](crate::controller::Controller::configure),
    /// which re-requests both sweeps so the change takes visible effect.
    pub fn configure(&mut self, options: Options) -> bool {
        if let Some(id) = options.id {
            self.id = Some(id);
        }
        if let Some(parent) = options.parent {
            self.parent = Some(parent);
        }
        if let Some(depends_on) = &options.depends_on {
            self.depends_on = depends_on.clone();
        }
        self.options.merge(options);

        if self.id.is_none() {
            self.id = Some(ComponentId::new());
        }

        self.attached.is_some()
    }

    /// Queues an event subscription to be replayed at registration.
    ///
    /// The queue is drained exactly once, when the component is
    /// registered. Components already attached subscribe through
    /// [`Controller::subscribe`](crate::controller::Controller::subscribe).
    ///
    /// # Panics
    ///
    /// Panics in debug builds when called on an attached component.
    pub fn subscribe(&mut self, kind: EventKind) {
        debug_assert!(
            self.attached.is_none(),
            "attached components subscribe through the controller"
        );
        self.queued_subscriptions.push(kind);
    }

    /// Returns the component id, if one has been configured or generated.
    #[must_use]
    pub fn id(&self) -> Option<ComponentId> {
        self.id
    }

    /// Returns the configured parent, if any.
    #[must_use]
    pub fn parent(&self) -> Option<ComponentId> {
        self.parent
    }

    /// Returns the ordered dependency list.
    #[must_use]
    pub fn depends_on(&self) -> &[ComponentId] {
        &self.depends_on
    }

    /// Returns the controller this component is registered in, if any.
    #[must_use]
    pub fn attached(&self) -> Option<ControllerId> {
        self.attached
    }

    /// Returns the opaque option store.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Binds the owning controller. Called by `register`.
    ///
    /// # Panics
    ///
    /// Panics if the component is already attached; the back-reference is
    /// set exactly once.
    pub(crate) fn attach(&mut self, controller: ControllerId) {
        assert!(
            self.attached.is_none(),
            "component is already attached to a controller"
        );
        self.attached = Some(controller);
    }

    /// Clears the attachment. Called by `unregister`.
    pub(crate) fn detach(&mut self) {
        self.attached = None;
    }

    /// Drains the queued subscriptions. Called once, by `register`.
    pub(crate) fn take_subscriptions(&mut self) -> Vec<EventKind> {
        core::mem::take(&mut self.queued_subscriptions)
    }

    /// Removes `id` from the dependency list, returning whether it was
    /// present. Called by `unregister` when pruning references to a
    /// removed component.
    pub(crate) fn remove_dependency(&mut self, id: ComponentId) -> bool {
        let before = self.depends_on.len();
        self.depends_on.retain(|d| *d != id);
        self.depends_on.len() != before
    }
}

/// A visual node participating in the reflow/repaint cycle.
///
/// The default `reflow` keeps the current bounds and the default `repaint`
/// does nothing; concrete components override the phases they take part
/// in. Return values are advisory — they feed tracing and change counts,
/// and correctness of subsequent passes never depends on them.
pub trait Component {
    /// Returns the cross-cutting component state.
    fn core(&self) -> &ComponentCore;

    /// Returns the cross-cutting component state, mutably.
    fn core_mut(&mut self) -> &mut ComponentCore;

    /// Returns the capability tag for registry queries.
    fn kind(&self) -> ComponentKind;

    /// Returns the scene element children of this component nest into,
    /// if it acts as a container.
    fn container(&self) -> Option<ElementId> {
        None
    }

    /// Measures the component, returning its new bounds.
    fn reflow(&mut self, cx: &mut LayoutContext<'_>) -> Result<Rect, ComponentError> {
        Ok(cx.bounds())
    }

    /// Applies the component's state to the scene, returning whether
    /// anything visible changed.
    fn repaint(&mut self, cx: &mut PaintContext<'_>) -> Result<bool, ComponentError> {
        let _ = cx;
        Ok(false)
    }

    /// Handles a routed event. Components respond by mutating their own
    /// state and filing sweep requests.
    fn on_event(&mut self, event: &Event, requests: &mut SweepRequests) {
        let _ = (event, requests);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configure_generates_missing_id() {
        let mut core = ComponentCore::new();
        assert!(core.id().is_none());
        let _ = core.configure(Options::new());
        assert!(core.id().is_some(), "configure must ensure an id");
    }

    #[test]
    fn generated_ids_do_not_collide() {
        let mut a = ComponentCore::new();
        let mut b = ComponentCore::new();
        let _ = a.configure(Options::new());
        let _ = b.configure(Options::new());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn configure_extracts_cross_cutting_keys() {
        let id = ComponentId::new();
        let parent = ComponentId::new();
        let dep = ComponentId::new();

        let mut core = ComponentCore::new();
        let _ = core.configure(
            Options::new()
                .with_id(id)
                .with_parent(parent)
                .with_depends_on(alloc::vec![dep]),
        );

        assert_eq!(core.id(), Some(id));
        assert_eq!(core.parent(), Some(parent));
        assert_eq!(core.depends_on(), &[dep]);
    }

    #[test]
    fn reconfigure_merges_and_keeps_id() {
        let id = ComponentId::new();
        let mut core = ComponentCore::configured(Options::new().with_id(id));
        let _ = core.configure(Options::new());
        assert_eq!(core.id(), Some(id), "merging an empty bag keeps the id");
    }

    #[test]
    fn subscriptions_queue_until_taken() {
        let mut core = ComponentCore::new();
        core.subscribe(EventKind::Records);
        core.subscribe(EventKind::Window);
        assert_eq!(
            core.take_subscriptions(),
            alloc::vec![EventKind::Records, EventKind::Window]
        );
        assert!(core.take_subscriptions().is_empty(), "drained exactly once");
    }

    #[test]
    fn remove_dependency_prunes() {
        let dep = ComponentId::new();
        let other = ComponentId::new();
        let mut core =
            ComponentCore::configured(Options::new().with_depends_on(alloc::vec![dep, other]));
        assert!(core.remove_dependency(dep));
        assert!(!core.remove_dependency(dep));
        assert_eq!(core.depends_on(), &[other]);
    }
}
