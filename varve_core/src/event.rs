// Copyright 2026 the Varve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events routed from the host to subscribed components.
//!
//! Components subscribe to an [`EventKind`] — while unattached the
//! subscription is queued on the component and replayed into the
//! controller's listener registry at registration; afterwards it can be
//! added through
//! [`Controller::subscribe`](crate::controller::Controller::subscribe).
//! The host delivers [`Event`]s through
//! [`Controller::emit`](crate::controller::Controller::emit), which routes
//! them to subscribers in subscription order. Handlers respond by filing
//! sweep requests, which coalesce like any other request.

use alloc::vec::Vec;

use kurbo::Size;

use crate::records::{RecordChange, RecordId};
use crate::time::TimeWindow;

/// The subscription key for an event category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The record store changed.
    Records,
    /// The visible time window moved or zoomed.
    Window,
    /// The host viewport was resized.
    Viewport,
    /// The set of selected records changed.
    Selection,
}

/// An event delivered to subscribed components.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A record store change, as drained from
    /// [`RecordSet::drain_changes`](crate::records::RecordSet::drain_changes).
    Records(RecordChange),
    /// The new visible window.
    Window(TimeWindow),
    /// The new viewport size.
    Viewport(Size),
    /// The records that are now selected; everything else is unselected.
    Selection(Vec<RecordId>),
}

impl Event {
    /// Returns the subscription key this event is routed under.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Records(_) => EventKind::Records,
            Self::Window(_) => EventKind::Window,
            Self::Viewport(_) => EventKind::Viewport,
            Self::Selection(_) => EventKind::Selection,
        }
    }
}
