// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scheduler: registry, request coalescing, and dependency-ordered
//! sweeps.
//!
//! A [`Controller`] owns the authoritative set of registered components
//! and decides *when* and *in what order* they recompute layout and
//! render. Reflow and repaint are independent state machines with
//! identical shape:
//!
//! - **Idle** — no sweep pending.
//! - **Scheduled** — a sweep has been requested; further requests are
//!   absorbed. N requests arriving before the host's next flush result in
//!   exactly one sweep.
//! - **Running** — transient, inside [`repaint`](Controller::repaint) /
//!   [`reflow`](Controller::reflow) / [`flush`](Controller::flush).
//!
//! The core is sans-io: requesting never runs anything. The embedding
//! host checks [`pending`](Controller::pending) on its loop turn and calls
//! `flush`, which plays the role of the zero-delay deferred task firing.
//! Calling a sweep directly first clears that axis' pending flag, so a
//! superseded scheduled sweep never runs twice.
//!
//! # Sweep order
//!
//! A sweep visits every registered component once, in dependency order:
//! for each component (in registration order), its `depends_on` entries
//! are visited first (in declared order), then its parent, then the
//! component itself. A per-sweep visited set keyed by component makes
//! diamond dependencies resolve to a single visit. The order only changes
//! when the registry or the wiring changes, so it is cached and rebuilt
//! lazily.
//!
//! The dependency relation is kept acyclic by construction: edges are
//! mirrored into an `understory_dirty` tracker with
//! [`CycleHandling::Error`], so a registration or reconfiguration that
//! would close a cycle fails synchronously instead of hanging a later
//! sweep.
//!
//! # Cross-trigger
//!
//! Repainting can change measured geometry and reflowing can change
//! visible state, so a completed sweep immediately and synchronously runs
//! the other axis if it became pending — bounded by
//! [`ControllerConfig::max_chained_sweeps`] per direction per outer call.
//! Work requested beyond the budget stays scheduled for the next flush;
//! the reflow/repaint ping-pong can therefore never recurse unboundedly,
//! and no request is ever dropped.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::error::Error;
use core::fmt;

use kurbo::Rect;
use understory_dirty::{CycleHandling, DirtyTracker};

use crate::component::{Component, ComponentError, ComponentId, ComponentKind, ControllerId};
use crate::context::{Environment, LayoutContext, PaintContext, RegistryView, SweepAxis, SweepRequests};
use crate::dirty;
use crate::event::{Event, EventKind};
use crate::options::Options;
use crate::scene::Scene;
use crate::trace::{
    CrossTriggerEvent, EventRoutedEvent, RegisteredEvent, SweepBeginEvent, SweepEndEvent,
    SweepErrorEvent, SweepScheduledEvent, SweepTrigger, TraceSink, Tracer,
};

/// Configuration for a [`Controller`].
#[derive(Clone, Copy, Debug)]
pub struct ControllerConfig {
    /// How many synchronously chained sweeps each direction may run per
    /// outer call. The default of 1 satisfies the common
    /// repaint→reflow→repaint settling pattern while keeping the chain
    /// finite.
    pub max_chained_sweeps: u8,
}

impl ControllerConfig {
    /// The default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_chained_sweeps: 1,
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A registration failure. The component is not partially registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterError {
    /// The component has no id; `configure` it first.
    MissingId,
    /// A component with this id is already registered.
    DuplicateId(ComponentId),
    /// The component is already attached to a controller.
    AlreadyAttached(ComponentId),
    /// The configured parent is not registered.
    UnknownParent(ComponentId),
    /// A `depends_on` entry is not registered.
    UnknownDependency(ComponentId),
    /// Wiring this component would close a dependency cycle through the
    /// named component.
    DependencyCycle(ComponentId),
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingId => write!(f, "component has no id"),
            Self::DuplicateId(id) => write!(f, "component id {id:?} is already registered"),
            Self::AlreadyAttached(id) => {
                write!(f, "component {id:?} is already attached to a controller")
            }
            Self::UnknownParent(id) => write!(f, "parent {id:?} is not registered"),
            Self::UnknownDependency(id) => write!(f, "dependency {id:?} is not registered"),
            Self::DependencyCycle(id) => {
                write!(f, "dependency on {id:?} would close a cycle")
            }
        }
    }
}

impl Error for RegisterError {}

/// A reconfiguration failure. The registry and wiring are unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigureError {
    /// No component with this id is registered here.
    UnknownComponent(ComponentId),
    /// The options carry a different id; registered ids are immutable.
    IdChange {
        /// The registered id.
        from: ComponentId,
        /// The id the options tried to assign.
        to: ComponentId,
    },
    /// The new parent is not registered.
    UnknownParent(ComponentId),
    /// A new `depends_on` entry is not registered.
    UnknownDependency(ComponentId),
    /// The new wiring would close a dependency cycle through the named
    /// component.
    DependencyCycle(ComponentId),
}

impl fmt::Display for ConfigureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownComponent(id) => write!(f, "component {id:?} is not registered"),
            Self::IdChange { from, to } => {
                write!(f, "cannot change registered id {from:?} to {to:?}")
            }
            Self::UnknownParent(id) => write!(f, "parent {id:?} is not registered"),
            Self::UnknownDependency(id) => write!(f, "dependency {id:?} is not registered"),
            Self::DependencyCycle(id) => {
                write!(f, "dependency on {id:?} would close a cycle")
            }
        }
    }
}

impl Error for ConfigureError {}

/// An unregistration failure. The registry is unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnregisterError {
    /// No component with this id is registered here.
    UnknownComponent(ComponentId),
    /// The named component still has the target as its parent; nesting
    /// must be unwound leaf-first.
    HasChildren(ComponentId),
}

impl fmt::Display for UnregisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownComponent(id) => write!(f, "component {id:?} is not registered"),
            Self::HasChildren(child) => {
                write!(f, "component is the parent of {child:?}; unregister children first")
            }
        }
    }
}

impl Error for UnregisterError {}

/// The id passed to a controller entry point is not registered there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownComponentError(pub ComponentId);

impl fmt::Display for UnknownComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component {:?} is not registered", self.0)
    }
}

impl Error for UnknownComponentError {}

/// A sweep aborted at a failing component.
///
/// Components visited earlier keep their new state; components later in
/// the order were not reached. A subsequent request re-derives everything
/// from current data, so re-requesting is the recovery path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SweepError {
    /// The axis that was sweeping.
    pub axis: SweepAxis,
    /// The component that failed.
    pub component: ComponentId,
    /// The component's error.
    pub source: ComponentError,
}

impl fmt::Display for SweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self.axis {
            SweepAxis::Reflow => "reflow",
            SweepAxis::Repaint => "repaint",
        };
        write!(
            f,
            "{phase} sweep aborted at component {:?}: {}",
            self.component, self.source
        )
    }
}

impl Error for SweepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Summary of one executed sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SweepReport {
    /// The axis that was swept.
    pub axis: SweepAxis,
    /// Components visited.
    pub visited: usize,
    /// Components whose advisory result reported a change.
    pub changed: usize,
}

/// Per-outer-call budget for synchronously chained sweeps.
#[derive(Clone, Copy, Debug)]
struct ChainBudget {
    reflow: u8,
    repaint: u8,
}

impl ChainBudget {
    const fn new(max: u8) -> Self {
        Self {
            reflow: max,
            repaint: max,
        }
    }

    fn take(&mut self, axis: SweepAxis) -> bool {
        let slot = match axis {
            SweepAxis::Reflow => &mut self.reflow,
            SweepAxis::Repaint => &mut self.repaint,
        };
        if *slot == 0 {
            false
        } else {
            *slot -= 1;
            true
        }
    }
}

/// The scheduler owning a set of registered components.
///
/// One controller governs one component tree; it is an explicit value
/// owned by the embedding application, not an ambient singleton.
pub struct Controller {
    id: ControllerId,
    config: ControllerConfig,

    // -- Registry (parallel arrays, registration order) --
    components: Vec<Box<dyn Component>>,
    ids: Vec<ComponentId>,
    kinds: Vec<ComponentKind>,
    serials: Vec<u32>,
    bounds: Vec<Rect>,
    index: BTreeMap<ComponentId, usize>,
    next_serial: u32,

    // -- Dependency wiring (cycle rejection) --
    deps: DirtyTracker<u32>,

    // -- Sweep-order cache --
    order: Vec<usize>,
    order_dirty: bool,

    // -- Scheduling state --
    pending: SweepRequests,
    listeners: Vec<(EventKind, ComponentId)>,

    tracer: Tracer,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    /// Creates a controller with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::new())
    }

    /// Creates a controller with the given configuration.
    #[must_use]
    pub fn with_config(config: ControllerConfig) -> Self {
        Self {
            id: ControllerId::new(),
            config,
            components: Vec::new(),
            ids: Vec::new(),
            kinds: Vec::new(),
            serials: Vec::new(),
            bounds: Vec::new(),
            index: BTreeMap::new(),
            next_serial: 0,
            deps: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            order: Vec::new(),
            order_dirty: false,
            pending: SweepRequests::default(),
            listeners: Vec::new(),
            tracer: Tracer::new(),
        }
    }

    /// Returns this controller's identity token.
    #[must_use]
    pub fn id(&self) -> ControllerId {
        self.id
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> ControllerConfig {
        self.config
    }

    /// Attaches a trace sink, returning the previous one.
    pub fn set_trace_sink(
        &mut self,
        sink: Option<Box<dyn TraceSink>>,
    ) -> Option<Box<dyn TraceSink>> {
        self.tracer.set_sink(sink)
    }

    // -- Registry ----------------------------------------------------------

    /// Registers a component.
    ///
    /// The component must have an id (`configure` generates one), must not
    /// be attached elsewhere, and its parent and dependencies must already
    /// be registered. Dependency edges are inserted with cycle rejection;
    /// on any failure the call is fatal and the component is not partially
    /// registered.
    ///
    /// Event subscriptions the component queued before registration are
    /// replayed into the listener registry now, exactly once.
    pub fn register(
        &mut self,
        mut component: Box<dyn Component>,
    ) -> Result<ComponentId, RegisterError> {
        let core = component.core();
        let id = core.id().ok_or(RegisterError::MissingId)?;
        if core.attached().is_some() {
            return Err(RegisterError::AlreadyAttached(id));
        }
        if self.index.contains_key(&id) {
            return Err(RegisterError::DuplicateId(id));
        }
        let parent = core.parent();
        if let Some(p) = parent {
            if !self.index.contains_key(&p) {
                return Err(RegisterError::UnknownParent(p));
            }
        }
        let depends_on = core.depends_on().to_vec();
        for dep in &depends_on {
            if !self.index.contains_key(dep) {
                return Err(RegisterError::UnknownDependency(*dep));
            }
        }

        let serial = self.next_serial;
        self.next_serial += 1;
        self.link_edges(serial, parent, &depends_on)
            .map_err(RegisterError::DependencyCycle)?;

        component.core_mut().attach(self.id);
        for kind in component.core_mut().take_subscriptions() {
            self.listeners.push((kind, id));
        }

        let kind = component.kind();
        let idx = self.components.len();
        self.components.push(component);
        self.ids.push(id);
        self.kinds.push(kind);
        self.serials.push(serial);
        self.bounds.push(Rect::ZERO);
        self.index.insert(id, idx);
        self.order_dirty = true;

        self.tracer.registered(&RegisteredEvent {
            component: id,
            kind,
        });
        Ok(id)
    }

    /// Removes a component from the registry and returns it.
    ///
    /// References to the removed component in other components'
    /// `depends_on` lists are pruned, along with its event subscriptions.
    /// Fails while any registered component still names it as `parent` —
    /// nesting is unwound leaf-first.
    pub fn unregister(&mut self, id: ComponentId) -> Result<Box<dyn Component>, UnregisterError> {
        let idx = *self
            .index
            .get(&id)
            .ok_or(UnregisterError::UnknownComponent(id))?;
        for (i, component) in self.components.iter().enumerate() {
            if component.core().parent() == Some(id) {
                return Err(UnregisterError::HasChildren(self.ids[i]));
            }
        }

        let serial = self.serials[idx];

        // Prune dependents' references to the removed component.
        for i in 0..self.components.len() {
            if i == idx {
                continue;
            }
            if self.components[i].core_mut().remove_dependency(id) {
                let dependent = self.serials[i];
                self.deps.remove_dependency(dependent, serial, dirty::ORDER);
            }
        }

        // Drop the component's own edges and key.
        let parent = self.components[idx].core().parent();
        let depends_on = self.components[idx].core().depends_on().to_vec();
        self.unlink_edges(serial, parent, &depends_on);
        self.deps.remove_key(serial);

        self.listeners.retain(|(_, listener)| *listener != id);

        let mut component = self.components.remove(idx);
        self.ids.remove(idx);
        self.kinds.remove(idx);
        self.serials.remove(idx);
        self.bounds.remove(idx);
        self.index.remove(&id);
        for (i, cid) in self.ids.iter().enumerate() {
            self.index.insert(*cid, i);
        }

        component.core_mut().detach();
        self.order_dirty = true;
        Ok(component)
    }

    /// Merges options into a registered component and requests both
    /// sweeps, so the change takes visible effect without manual
    /// scheduling calls.
    ///
    /// Parent and dependency changes are validated and rewired with cycle
    /// rejection; a failing call leaves the previous wiring intact.
    pub fn configure(&mut self, id: ComponentId, options: Options) -> Result<(), ConfigureError> {
        let idx = *self
            .index
            .get(&id)
            .ok_or(ConfigureError::UnknownComponent(id))?;
        if let Some(new_id) = options.id {
            if new_id != id {
                return Err(ConfigureError::IdChange {
                    from: id,
                    to: new_id,
                });
            }
        }

        let serial = self.serials[idx];
        let old_parent = self.components[idx].core().parent();
        let old_deps = self.components[idx].core().depends_on().to_vec();
        let new_parent = options.parent.or(old_parent);
        let new_deps = options
            .depends_on
            .clone()
            .unwrap_or_else(|| old_deps.clone());

        if let Some(p) = new_parent {
            if p == id {
                return Err(ConfigureError::DependencyCycle(p));
            }
            if !self.index.contains_key(&p) {
                return Err(ConfigureError::UnknownParent(p));
            }
        }
        for dep in &new_deps {
            if *dep == id {
                return Err(ConfigureError::DependencyCycle(*dep));
            }
            if !self.index.contains_key(dep) {
                return Err(ConfigureError::UnknownDependency(*dep));
            }
        }

        self.unlink_edges(serial, old_parent, &old_deps);
        if let Err(through) = self.link_edges(serial, new_parent, &new_deps) {
            // Restore the previous wiring; it was acyclic before.
            let _ = self.link_edges(serial, old_parent, &old_deps);
            return Err(ConfigureError::DependencyCycle(through));
        }

        let _ = self.components[idx].core_mut().configure(options);
        self.order_dirty = true;
        self.request_reflow();
        self.request_repaint();
        Ok(())
    }

    /// Subscribes a registered component to an event kind.
    pub fn subscribe(
        &mut self,
        id: ComponentId,
        kind: EventKind,
    ) -> Result<(), UnknownComponentError> {
        if !self.index.contains_key(&id) {
            return Err(UnknownComponentError(id));
        }
        self.listeners.push((kind, id));
        Ok(())
    }

    /// Returns every registered component of the given kind, in
    /// registration order.
    #[must_use]
    pub fn find_by_kind(&self, kind: ComponentKind) -> Vec<ComponentId> {
        self.ids
            .iter()
            .zip(&self.kinds)
            .filter(|(_, k)| **k == kind)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Returns a registered component.
    #[must_use]
    pub fn get(&self, id: ComponentId) -> Option<&dyn Component> {
        self.index.get(&id).map(|&idx| &*self.components[idx])
    }

    /// Returns a registered component, mutably.
    #[must_use]
    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut (dyn Component + 'static)> {
        self.index
            .get(&id)
            .map(|&idx| &mut *self.components[idx])
    }

    /// Returns the current bounds of a registered component.
    #[must_use]
    pub fn bounds_of(&self, id: ComponentId) -> Option<Rect> {
        self.index.get(&id).map(|&idx| self.bounds[idx])
    }

    /// Returns the registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.ids.iter().copied()
    }

    /// Returns the number of registered components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns whether no components are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    // -- Scheduling --------------------------------------------------------

    /// Requests a reflow sweep. Idempotent while one is pending.
    pub fn request_reflow(&mut self) {
        let mut requests = SweepRequests::default();
        requests.request_reflow();
        self.absorb(requests);
    }

    /// Requests a repaint sweep. Idempotent while one is pending.
    pub fn request_repaint(&mut self) {
        let mut requests = SweepRequests::default();
        requests.request_repaint();
        self.absorb(requests);
    }

    /// Returns the pending request flags.
    #[must_use]
    pub fn pending(&self) -> SweepRequests {
        self.pending
    }

    /// Returns whether no sweep is pending.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        !self.pending.any()
    }

    /// Routes an event to subscribed components in subscription order and
    /// absorbs the sweep requests they file.
    pub fn emit(&mut self, event: &Event) {
        let kind = event.kind();
        let targets: Vec<ComponentId> = self
            .listeners
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, id)| *id)
            .collect();

        let mut requests = SweepRequests::default();
        for id in &targets {
            if let Some(&idx) = self.index.get(id) {
                self.components[idx].on_event(event, &mut requests);
            }
        }
        self.tracer.event_routed(&EventRoutedEvent {
            kind,
            listeners: targets.len(),
        });
        self.absorb(requests);
    }

    /// Runs an immediate synchronous repaint sweep, superseding any
    /// scheduled one, then cross-triggers a pending reflow within the
    /// chain budget.
    ///
    /// Returns one report per executed sweep, chained sweeps included.
    pub fn repaint(
        &mut self,
        scene: &mut Scene,
        env: &Environment<'_>,
    ) -> Result<Vec<SweepReport>, SweepError> {
        let mut budget = ChainBudget::new(self.config.max_chained_sweeps);
        let mut reports = Vec::new();
        self.run_sweep(
            SweepAxis::Repaint,
            SweepTrigger::Direct,
            scene,
            env,
            &mut budget,
            &mut reports,
        )?;
        Ok(reports)
    }

    /// Runs an immediate synchronous reflow sweep, superseding any
    /// scheduled one, then cross-triggers a pending repaint within the
    /// chain budget.
    pub fn reflow(
        &mut self,
        scene: &mut Scene,
        env: &Environment<'_>,
    ) -> Result<Vec<SweepReport>, SweepError> {
        let mut budget = ChainBudget::new(self.config.max_chained_sweeps);
        let mut reports = Vec::new();
        self.run_sweep(
            SweepAxis::Reflow,
            SweepTrigger::Direct,
            scene,
            env,
            &mut budget,
            &mut reports,
        )?;
        Ok(reports)
    }

    /// Runs the pending sweep chain, if any.
    ///
    /// This is the host's deferred task: every request filed since the
    /// last flush is satisfied here, in one coalesced batch per axis.
    /// Work requested beyond the chain budget stays pending for the next
    /// flush.
    pub fn flush(
        &mut self,
        scene: &mut Scene,
        env: &Environment<'_>,
    ) -> Result<Vec<SweepReport>, SweepError> {
        let mut reports = Vec::new();
        let mut budget = ChainBudget::new(self.config.max_chained_sweeps);
        if self.pending.is_requested(SweepAxis::Repaint) {
            self.run_sweep(
                SweepAxis::Repaint,
                SweepTrigger::Flush,
                scene,
                env,
                &mut budget,
                &mut reports,
            )?;
        } else if self.pending.is_requested(SweepAxis::Reflow) {
            self.run_sweep(
                SweepAxis::Reflow,
                SweepTrigger::Flush,
                scene,
                env,
                &mut budget,
                &mut reports,
            )?;
        }
        Ok(reports)
    }

    // -- Internals ---------------------------------------------------------

    fn absorb(&mut self, requests: SweepRequests) {
        for axis in [SweepAxis::Reflow, SweepAxis::Repaint] {
            if requests.is_requested(axis) && !self.pending.is_requested(axis) {
                self.pending.request(axis);
                self.tracer.sweep_scheduled(&SweepScheduledEvent { axis });
            }
        }
    }

    fn serial_of(&self, id: ComponentId) -> u32 {
        self.serials[self.index[&id]]
    }

    /// Inserts the edges for one component. On a cycle, already-inserted
    /// edges are rolled back and the offending target is returned.
    fn link_edges(
        &mut self,
        serial: u32,
        parent: Option<ComponentId>,
        depends_on: &[ComponentId],
    ) -> Result<(), ComponentId> {
        let mut added: Vec<u32> = Vec::new();
        for target in depends_on.iter().copied().chain(parent) {
            let target_serial = self.serial_of(target);
            match self.deps.add_dependency(serial, target_serial, dirty::ORDER) {
                Ok(_) => added.push(target_serial),
                Err(_) => {
                    for rollback in added {
                        self.deps.remove_dependency(serial, rollback, dirty::ORDER);
                    }
                    return Err(target);
                }
            }
        }
        Ok(())
    }

    fn unlink_edges(
        &mut self,
        serial: u32,
        parent: Option<ComponentId>,
        depends_on: &[ComponentId],
    ) {
        for target in depends_on.iter().copied().chain(parent) {
            let target_serial = self.serial_of(target);
            self.deps.remove_dependency(serial, target_serial, dirty::ORDER);
        }
    }

    /// Rebuilds the cached sweep order: dependencies first, then parent,
    /// then the component itself, deduplicated by a visited set.
    fn rebuild_order(&mut self) {
        let len = self.components.len();
        let mut order = Vec::with_capacity(len);
        let mut visited = alloc::vec![false; len];
        for i in 0..len {
            visit_in_order(&self.components, &self.index, i, &mut visited, &mut order);
        }
        self.order = order;
        self.order_dirty = false;
    }

    fn run_sweep(
        &mut self,
        axis: SweepAxis,
        trigger: SweepTrigger,
        scene: &mut Scene,
        env: &Environment<'_>,
        budget: &mut ChainBudget,
        reports: &mut Vec<SweepReport>,
    ) -> Result<(), SweepError> {
        // A direct sweep supersedes the scheduled one for this axis.
        self.pending.clear(axis);

        if self.order_dirty {
            self.rebuild_order();
        }
        self.tracer.sweep_begin(&SweepBeginEvent {
            axis,
            trigger,
            components: self.components.len(),
        });

        let order = self.order.clone();
        let mut requests = SweepRequests::default();
        let mut changed_count = 0;
        for &i in &order {
            if self.visit(axis, i, scene, env, &mut requests)? {
                changed_count += 1;
            }
        }

        self.tracer.sweep_end(&SweepEndEvent {
            axis,
            visited: order.len(),
            changed: changed_count,
        });
        reports.push(SweepReport {
            axis,
            visited: order.len(),
            changed: changed_count,
        });
        self.absorb(requests);

        // Cross-trigger: run the other axis now if it became pending,
        // within the per-call budget. Leftovers stay scheduled.
        let other = axis.other();
        if self.pending.is_requested(other) && budget.take(other) {
            self.tracer.cross_trigger(&CrossTriggerEvent {
                from: axis,
                to: other,
            });
            self.run_sweep(other, SweepTrigger::CrossTrigger, scene, env, budget, reports)?;
        }
        Ok(())
    }

    /// Visits one component for one axis.
    fn visit(
        &mut self,
        axis: SweepAxis,
        i: usize,
        scene: &mut Scene,
        env: &Environment<'_>,
        requests: &mut SweepRequests,
    ) -> Result<bool, SweepError> {
        let id = self.ids[i];
        let parent = self.components[i].core().parent();
        let parent_idx = parent.and_then(|p| self.index.get(&p).copied());
        let parent_bounds = parent_idx.map(|p| self.bounds[p]);
        let parent_container = parent_idx.and_then(|p| self.components[p].container());

        let Self {
            components,
            ids,
            kinds,
            index,
            bounds,
            tracer,
            ..
        } = self;
        let registry = RegistryView {
            ids: ids.as_slice(),
            kinds: kinds.as_slice(),
            index: &*index,
        };

        let changed = match axis {
            SweepAxis::Reflow => {
                let mut cx = LayoutContext {
                    id,
                    bounds: bounds[i],
                    parent,
                    parent_bounds,
                    parent_container,
                    geometry: bounds.as_slice(),
                    registry,
                    scene: &*scene,
                    env,
                    requests,
                };
                let outcome = components[i].reflow(&mut cx);
                match outcome {
                    Ok(new_bounds) => {
                        let changed = new_bounds != bounds[i];
                        bounds[i] = new_bounds;
                        changed
                    }
                    Err(source) => {
                        tracer.sweep_error(&SweepErrorEvent {
                            axis,
                            component: id,
                        });
                        return Err(SweepError {
                            axis,
                            component: id,
                            source,
                        });
                    }
                }
            }
            SweepAxis::Repaint => {
                let mut cx = PaintContext {
                    id,
                    bounds: bounds[i],
                    parent,
                    parent_bounds,
                    parent_container,
                    geometry: bounds.as_slice(),
                    registry,
                    scene,
                    env,
                    requests,
                };
                match components[i].repaint(&mut cx) {
                    Ok(changed) => changed,
                    Err(source) => {
                        tracer.sweep_error(&SweepErrorEvent {
                            axis,
                            component: id,
                        });
                        return Err(SweepError {
                            axis,
                            component: id,
                            source,
                        });
                    }
                }
            }
        };

        #[cfg(feature = "trace-rich")]
        tracer.component_visit(&crate::trace::ComponentVisitEvent {
            axis,
            component: id,
            kind: kinds[i],
            changed,
        });

        Ok(changed)
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("id", &self.id)
            .field("components", &self.ids)
            .field("pending", &self.pending)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

/// Depth-first, dependency-first visit used to build the sweep order.
///
/// The visited set is keyed by registry slot, so a component reached
/// through several dependency paths (diamonds) is emitted exactly once,
/// after everything it depends on or nests inside.
fn visit_in_order(
    components: &[Box<dyn Component>],
    index: &BTreeMap<ComponentId, usize>,
    i: usize,
    visited: &mut [bool],
    order: &mut Vec<usize>,
) {
    if visited[i] {
        return;
    }
    visited[i] = true;

    let core = components[i].core();
    for dep in core.depends_on() {
        if let Some(&j) = index.get(dep) {
            visit_in_order(components, index, j, visited, order);
        }
    }
    if let Some(parent) = core.parent() {
        if let Some(&j) = index.get(&parent) {
            visit_in_order(components, index, j, visited, order);
        }
    }
    order.push(i);
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    use kurbo::Size;

    use super::*;
    use crate::component::ComponentCore;
    use crate::context::Orientation;
    use crate::host::FixedMetrics;
    use crate::records::RecordChange;
    use crate::time::{TimePoint, TimeWindow};

    type Log = Rc<RefCell<Vec<(&'static str, SweepAxis)>>>;

    struct Probe {
        core: ComponentCore,
        name: &'static str,
        log: Log,
        reflow_requests_repaint: bool,
        repaint_requests_reflow: bool,
        fail_repaint: bool,
        seen_events: Rc<RefCell<Vec<EventKind>>>,
    }

    impl Probe {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                core: ComponentCore::configured(Options::new()),
                name,
                log: Rc::clone(log),
                reflow_requests_repaint: false,
                repaint_requests_reflow: false,
                fail_repaint: false,
                seen_events: Rc::new(RefCell::new(Vec::new())),
            }
        }

        fn with_options(name: &'static str, log: &Log, options: Options) -> Self {
            let mut probe = Self::new(name, log);
            probe.core = ComponentCore::configured(options);
            probe
        }
    }

    impl Component for Probe {
        fn core(&self) -> &ComponentCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut ComponentCore {
            &mut self.core
        }

        fn kind(&self) -> ComponentKind {
            ComponentKind::Custom(1)
        }

        fn reflow(&mut self, cx: &mut LayoutContext<'_>) -> Result<Rect, ComponentError> {
            self.log.borrow_mut().push((self.name, SweepAxis::Reflow));
            if self.reflow_requests_repaint {
                cx.request_repaint();
            }
            Ok(cx.bounds())
        }

        fn repaint(&mut self, cx: &mut PaintContext<'_>) -> Result<bool, ComponentError> {
            if self.fail_repaint {
                return Err(ComponentError::Invalid("probe failure"));
            }
            self.log.borrow_mut().push((self.name, SweepAxis::Repaint));
            if self.repaint_requests_reflow {
                cx.request_reflow();
            }
            Ok(true)
        }

        fn on_event(&mut self, event: &Event, requests: &mut SweepRequests) {
            self.seen_events.borrow_mut().push(event.kind());
            requests.request_repaint();
        }
    }

    fn test_env(metrics: &FixedMetrics) -> Environment<'_> {
        Environment {
            window: TimeWindow::new(TimePoint(0), TimePoint(1_000)),
            viewport: Size::new(800.0, 600.0),
            orientation: Orientation::default(),
            metrics,
        }
    }

    fn repaints(log: &Log) -> Vec<&'static str> {
        log.borrow()
            .iter()
            .filter(|(_, axis)| *axis == SweepAxis::Repaint)
            .map(|(name, _)| *name)
            .collect()
    }

    #[test]
    fn requests_coalesce_into_one_sweep() {
        let log: Log = Rc::default();
        let mut controller = Controller::new();
        controller
            .register(Box::new(Probe::new("only", &log)))
            .unwrap();

        controller.request_repaint();
        controller.request_repaint();
        controller.request_repaint();

        let mut scene = Scene::new();
        let metrics = FixedMetrics::default();
        let reports = controller.flush(&mut scene, &test_env(&metrics)).unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(repaints(&log), vec!["only"], "exactly one repaint");
        assert!(controller.is_idle());

        // A second flush with nothing pending runs nothing.
        let reports = controller.flush(&mut scene, &test_env(&metrics)).unwrap();
        assert!(reports.is_empty());
        assert_eq!(repaints(&log).len(), 1);
    }

    #[test]
    fn dependency_chain_orders_sweep_regardless_of_insertion() {
        let log: Log = Rc::default();
        let mut controller = Controller::new();
        // Insert in reverse-dependency order, then wire via configure.
        let a = controller.register(Box::new(Probe::new("a", &log))).unwrap();
        let b = controller.register(Box::new(Probe::new("b", &log))).unwrap();
        let c = controller.register(Box::new(Probe::new("c", &log))).unwrap();
        controller
            .configure(a, Options::new().with_depends_on(vec![b]))
            .unwrap();
        controller
            .configure(b, Options::new().with_depends_on(vec![c]))
            .unwrap();

        let mut scene = Scene::new();
        let metrics = FixedMetrics::default();
        log.borrow_mut().clear();
        let _ = controller.repaint(&mut scene, &test_env(&metrics)).unwrap();

        assert_eq!(repaints(&log), vec!["c", "b", "a"]);
    }

    #[test]
    fn diamond_dependency_repaints_shared_node_once() {
        let log: Log = Rc::default();
        let mut controller = Controller::new();
        let d = controller.register(Box::new(Probe::new("d", &log))).unwrap();
        let b = controller
            .register(Box::new(Probe::with_options(
                "b",
                &log,
                Options::new().with_depends_on(vec![d]),
            )))
            .unwrap();
        let c = controller
            .register(Box::new(Probe::with_options(
                "c",
                &log,
                Options::new().with_depends_on(vec![d]),
            )))
            .unwrap();
        let _a = controller
            .register(Box::new(Probe::with_options(
                "a",
                &log,
                Options::new().with_depends_on(vec![b, c]),
            )))
            .unwrap();

        let mut scene = Scene::new();
        let metrics = FixedMetrics::default();
        let _ = controller.repaint(&mut scene, &test_env(&metrics)).unwrap();

        let order = repaints(&log);
        assert_eq!(order, vec!["d", "b", "c", "a"]);
        assert_eq!(
            order.iter().filter(|n| **n == "d").count(),
            1,
            "diamond apex visited exactly once"
        );
    }

    #[test]
    fn parent_is_an_implicit_dependency() {
        let log: Log = Rc::default();
        let mut controller = Controller::new();
        // Child registered before its parent, wired afterwards.
        let child = controller
            .register(Box::new(Probe::new("child", &log)))
            .unwrap();
        let parent = controller
            .register(Box::new(Probe::new("parent", &log)))
            .unwrap();
        controller
            .configure(child, Options::new().with_parent(parent))
            .unwrap();

        let mut scene = Scene::new();
        let metrics = FixedMetrics::default();
        log.borrow_mut().clear();
        let _ = controller.repaint(&mut scene, &test_env(&metrics)).unwrap();

        assert_eq!(repaints(&log), vec!["parent", "child"]);
    }

    #[test]
    fn timeaxis_itemset_scenario() {
        let log: Log = Rc::default();
        let mut controller = Controller::new();
        let timeaxis = controller
            .register(Box::new(Probe::new("timeaxis", &log)))
            .unwrap();
        let _itemset = controller
            .register(Box::new(Probe::with_options(
                "itemset",
                &log,
                Options::new().with_depends_on(vec![timeaxis]),
            )))
            .unwrap();

        let mut scene = Scene::new();
        let metrics = FixedMetrics::default();
        let _ = controller.repaint(&mut scene, &test_env(&metrics)).unwrap();

        assert_eq!(repaints(&log), vec!["timeaxis", "itemset"]);
    }

    #[test]
    fn cross_trigger_runs_pending_reflow_synchronously() {
        let log: Log = Rc::default();
        let mut controller = Controller::new();
        let mut probe = Probe::new("p", &log);
        probe.repaint_requests_reflow = true;
        controller.register(Box::new(probe)).unwrap();

        let mut scene = Scene::new();
        let metrics = FixedMetrics::default();
        let reports = controller.repaint(&mut scene, &test_env(&metrics)).unwrap();

        assert_eq!(reports.len(), 2, "repaint then chained reflow");
        assert_eq!(reports[0].axis, SweepAxis::Repaint);
        assert_eq!(reports[1].axis, SweepAxis::Reflow);
        assert!(
            !controller.pending().is_requested(SweepAxis::Reflow),
            "the chained sweep consumed the request"
        );
    }

    #[test]
    fn cross_trigger_ping_pong_is_bounded() {
        let log: Log = Rc::default();
        let mut controller = Controller::new();
        let mut probe = Probe::new("p", &log);
        // Every repaint requests a reflow and every reflow requests a
        // repaint; without a bound this would never return.
        probe.repaint_requests_reflow = true;
        probe.reflow_requests_repaint = true;
        controller.register(Box::new(probe)).unwrap();

        let mut scene = Scene::new();
        let metrics = FixedMetrics::default();
        let reports = controller.repaint(&mut scene, &test_env(&metrics)).unwrap();

        // Outer repaint, one chained reflow, one chained repaint.
        assert_eq!(reports.len(), 3);
        assert_eq!(
            reports.iter().filter(|r| r.axis == SweepAxis::Reflow).count(),
            1,
            "at most one cross-trigger per direction"
        );
        // The unserved request is deferred, not dropped.
        assert!(controller.pending().is_requested(SweepAxis::Reflow));
    }

    #[test]
    fn direct_sweep_supersedes_scheduled_one() {
        let log: Log = Rc::default();
        let mut controller = Controller::new();
        controller
            .register(Box::new(Probe::new("only", &log)))
            .unwrap();

        controller.request_repaint();
        let mut scene = Scene::new();
        let metrics = FixedMetrics::default();
        let _ = controller.repaint(&mut scene, &test_env(&metrics)).unwrap();

        assert!(controller.is_idle(), "direct sweep cancels the pending one");
        let reports = controller.flush(&mut scene, &test_env(&metrics)).unwrap();
        assert!(reports.is_empty(), "no duplicate sweep later");
        assert_eq!(repaints(&log).len(), 1);
    }

    #[test]
    fn find_by_kind_is_idempotent_and_sees_new_registrations() {
        let log: Log = Rc::default();
        let mut controller = Controller::new();
        let a = controller.register(Box::new(Probe::new("a", &log))).unwrap();

        let first = controller.find_by_kind(ComponentKind::Custom(1));
        let second = controller.find_by_kind(ComponentKind::Custom(1));
        assert_eq!(first, second);
        assert_eq!(first, vec![a]);
        assert!(controller.find_by_kind(ComponentKind::TimeAxis).is_empty());

        let b = controller.register(Box::new(Probe::new("b", &log))).unwrap();
        assert_eq!(controller.find_by_kind(ComponentKind::Custom(1)), vec![a, b]);
    }

    #[test]
    fn register_validates_preconditions() {
        let log: Log = Rc::default();
        let mut controller = Controller::new();

        // No id.
        let mut missing = Probe::new("m", &log);
        missing.core = ComponentCore::new();
        assert_eq!(
            controller.register(Box::new(missing)).unwrap_err(),
            RegisterError::MissingId
        );

        // Duplicate id.
        let id = ComponentId::new();
        controller
            .register(Box::new(Probe::with_options(
                "a",
                &log,
                Options::new().with_id(id),
            )))
            .unwrap();
        assert_eq!(
            controller
                .register(Box::new(Probe::with_options(
                    "b",
                    &log,
                    Options::new().with_id(id),
                )))
                .unwrap_err(),
            RegisterError::DuplicateId(id)
        );

        // Unknown parent and dependency.
        let ghost = ComponentId::new();
        assert_eq!(
            controller
                .register(Box::new(Probe::with_options(
                    "c",
                    &log,
                    Options::new().with_parent(ghost),
                )))
                .unwrap_err(),
            RegisterError::UnknownParent(ghost)
        );
        assert_eq!(
            controller
                .register(Box::new(Probe::with_options(
                    "d",
                    &log,
                    Options::new().with_depends_on(vec![ghost]),
                )))
                .unwrap_err(),
            RegisterError::UnknownDependency(ghost)
        );

        // Already attached elsewhere.
        let mut attached = Probe::new("e", &log);
        attached.core.attach(ControllerId::new());
        let attached_id = attached.core.id().unwrap();
        assert_eq!(
            controller.register(Box::new(attached)).unwrap_err(),
            RegisterError::AlreadyAttached(attached_id)
        );

        assert_eq!(controller.len(), 1, "failed registrations left no trace");
    }

    #[test]
    fn generated_ids_do_not_collide_in_registry() {
        let log: Log = Rc::default();
        let mut controller = Controller::new();
        let a = controller.register(Box::new(Probe::new("a", &log))).unwrap();
        let b = controller.register(Box::new(Probe::new("b", &log))).unwrap();
        assert_ne!(a, b);
        assert_eq!(controller.len(), 2);
    }

    #[test]
    fn dependency_cycles_fail_configure_and_leave_wiring_intact() {
        let log: Log = Rc::default();
        let mut controller = Controller::new();
        let a = controller.register(Box::new(Probe::new("a", &log))).unwrap();
        let b = controller.register(Box::new(Probe::new("b", &log))).unwrap();
        let c = controller.register(Box::new(Probe::new("c", &log))).unwrap();

        controller
            .configure(a, Options::new().with_depends_on(vec![b]))
            .unwrap();
        controller
            .configure(b, Options::new().with_depends_on(vec![c]))
            .unwrap();

        // Closing the loop c -> a must fail.
        let err = controller
            .configure(c, Options::new().with_depends_on(vec![a]))
            .unwrap_err();
        assert!(matches!(err, ConfigureError::DependencyCycle(_)));

        // Self-dependency is a cycle too.
        assert!(matches!(
            controller
                .configure(a, Options::new().with_depends_on(vec![a]))
                .unwrap_err(),
            ConfigureError::DependencyCycle(_)
        ));

        // The old wiring still drives a valid sweep.
        let mut scene = Scene::new();
        let metrics = FixedMetrics::default();
        log.borrow_mut().clear();
        let _ = controller.repaint(&mut scene, &test_env(&metrics)).unwrap();
        assert_eq!(repaints(&log), vec!["c", "b", "a"]);
    }

    #[test]
    fn configure_requests_both_sweeps() {
        let log: Log = Rc::default();
        let mut controller = Controller::new();
        let a = controller.register(Box::new(Probe::new("a", &log))).unwrap();

        assert!(controller.is_idle());
        controller.configure(a, Options::new()).unwrap();
        assert!(controller.pending().is_requested(SweepAxis::Reflow));
        assert!(controller.pending().is_requested(SweepAxis::Repaint));
    }

    #[test]
    fn configure_rejects_id_changes() {
        let log: Log = Rc::default();
        let mut controller = Controller::new();
        let a = controller.register(Box::new(Probe::new("a", &log))).unwrap();
        let other = ComponentId::new();
        assert_eq!(
            controller
                .configure(a, Options::new().with_id(other))
                .unwrap_err(),
            ConfigureError::IdChange { from: a, to: other }
        );
    }

    #[test]
    fn unregister_prunes_dependency_references() {
        let log: Log = Rc::default();
        let mut controller = Controller::new();
        let dep = controller.register(Box::new(Probe::new("dep", &log))).unwrap();
        let user = controller
            .register(Box::new(Probe::with_options(
                "user",
                &log,
                Options::new().with_depends_on(vec![dep]),
            )))
            .unwrap();

        let removed = controller.unregister(dep).unwrap();
        assert_eq!(removed.core().attached(), None, "detached on removal");
        assert!(controller.get(dep).is_none());
        assert!(
            controller.get(user).unwrap().core().depends_on().is_empty(),
            "dangling dependency pruned"
        );

        // The remaining component still sweeps.
        let mut scene = Scene::new();
        let metrics = FixedMetrics::default();
        log.borrow_mut().clear();
        let _ = controller.repaint(&mut scene, &test_env(&metrics)).unwrap();
        assert_eq!(repaints(&log), vec!["user"]);
    }

    #[test]
    fn unregister_refuses_while_children_exist() {
        let log: Log = Rc::default();
        let mut controller = Controller::new();
        let parent = controller
            .register(Box::new(Probe::new("parent", &log)))
            .unwrap();
        let child = controller
            .register(Box::new(Probe::with_options(
                "child",
                &log,
                Options::new().with_parent(parent),
            )))
            .unwrap();

        assert_eq!(
            controller.unregister(parent).unwrap_err(),
            UnregisterError::HasChildren(child)
        );
        assert!(controller.get(parent).is_some(), "registry unchanged");

        // Leaf-first order works.
        controller.unregister(child).unwrap();
        controller.unregister(parent).unwrap();
        assert!(controller.is_empty());
    }

    #[test]
    fn queued_subscriptions_replay_at_registration() {
        let log: Log = Rc::default();
        let mut probe = Probe::new("sub", &log);
        probe.core.subscribe(EventKind::Records);
        let seen = Rc::clone(&probe.seen_events);

        let mut controller = Controller::new();
        let id = controller.register(Box::new(probe)).unwrap();

        controller.emit(&Event::Records(RecordChange::Cleared));
        assert_eq!(seen.borrow().as_slice(), &[EventKind::Records]);
        assert!(
            controller.pending().is_requested(SweepAxis::Repaint),
            "handler requests coalesce into pending state"
        );

        // Unsubscribed kinds are not delivered.
        controller.emit(&Event::Viewport(Size::new(1.0, 1.0)));
        assert_eq!(seen.borrow().len(), 1);

        // Unregistering removes the listener registration.
        controller.unregister(id).unwrap();
        controller.emit(&Event::Records(RecordChange::Cleared));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn sweep_aborts_at_first_failing_component() {
        let log: Log = Rc::default();
        let mut controller = Controller::new();
        let x = controller.register(Box::new(Probe::new("x", &log))).unwrap();
        let mut failing = Probe::with_options("y", &log, Options::new().with_depends_on(vec![x]));
        failing.fail_repaint = true;
        let y = controller.register(Box::new(failing)).unwrap();
        let _z = controller
            .register(Box::new(Probe::with_options(
                "z",
                &log,
                Options::new().with_depends_on(vec![y]),
            )))
            .unwrap();

        let mut scene = Scene::new();
        let metrics = FixedMetrics::default();
        let err = controller
            .repaint(&mut scene, &test_env(&metrics))
            .unwrap_err();

        assert_eq!(err.component, y, "error names the failing component");
        assert_eq!(err.axis, SweepAxis::Repaint);
        assert_eq!(err.source, ComponentError::Invalid("probe failure"));
        assert_eq!(
            repaints(&log),
            vec!["x"],
            "earlier components keep their new state; later ones are not reached"
        );
    }

    #[test]
    fn emit_routes_in_subscription_order() {
        let log: Log = Rc::default();
        let mut first = Probe::new("first", &log);
        first.core.subscribe(EventKind::Window);
        let first_seen = Rc::clone(&first.seen_events);
        let mut second = Probe::new("second", &log);
        second.core.subscribe(EventKind::Window);
        let second_seen = Rc::clone(&second.seen_events);

        let mut controller = Controller::new();
        controller.register(Box::new(first)).unwrap();
        controller.register(Box::new(second)).unwrap();

        let window = TimeWindow::new(TimePoint(0), TimePoint(100));
        controller.emit(&Event::Window(window));
        assert_eq!(first_seen.borrow().len(), 1);
        assert_eq!(second_seen.borrow().len(), 1);
    }

    #[test]
    fn bounds_table_updates_from_reflow() {
        struct Measured {
            core: ComponentCore,
        }
        impl Component for Measured {
            fn core(&self) -> &ComponentCore {
                &self.core
            }
            fn core_mut(&mut self) -> &mut ComponentCore {
                &mut self.core
            }
            fn kind(&self) -> ComponentKind {
                ComponentKind::Custom(2)
            }
            fn reflow(&mut self, _cx: &mut LayoutContext<'_>) -> Result<Rect, ComponentError> {
                Ok(Rect::new(0.0, 0.0, 320.0, 24.0))
            }
        }

        let mut controller = Controller::new();
        let id = controller
            .register(Box::new(Measured {
                core: ComponentCore::configured(Options::new()),
            }))
            .unwrap();
        assert_eq!(controller.bounds_of(id), Some(Rect::ZERO));

        let mut scene = Scene::new();
        let metrics = FixedMetrics::default();
        let reports = controller.reflow(&mut scene, &test_env(&metrics)).unwrap();
        assert_eq!(reports[0].changed, 1);
        assert_eq!(
            controller.bounds_of(id),
            Some(Rect::new(0.0, 0.0, 320.0, 24.0))
        );

        // A second reflow reports no advisory change.
        let reports = controller.reflow(&mut scene, &test_env(&metrics)).unwrap();
        assert_eq!(reports[0].changed, 0);
    }
}
