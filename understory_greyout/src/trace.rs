// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explainability hooks for reconcile passes.
//!
//! A pass silently skips nodes it cannot handle, so hosts sometimes need to
//! ask "why is this node grey?" or "why was this one left alone?". The
//! `*_with_trace` operations on [`Reconciler`](crate::Reconciler) report
//! every per-node decision to a [`ReconcileTrace`] sink. [`EventLog`] is a
//! recorder that keeps them in visit order.
//!
//! The plain operations pass `&mut ()`, which discards everything.

use alloc::vec::Vec;

/// How a baseline came to be captured.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Capture {
    /// Captured by [`Reconciler::capture_baseline`](crate::Reconciler::capture_baseline).
    Eager,
    /// Captured by a greyed pass right before suppressing an unseen visual.
    Lazy,
}

/// Why a node was left untouched.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Skip {
    /// The node has no visual component.
    NoVisual,
    /// The visual was never baselined, so there is nothing to restore.
    NoBaseline,
}

/// A callback sink for reconcile decisions.
///
/// All methods default to doing nothing, so implementors only override what
/// they care about.
pub trait ReconcileTrace<N, V> {
    /// A baseline was recorded for `visual`.
    fn captured(&mut self, node: N, visual: V, how: Capture) {
        let _ = (node, visual, how);
    }

    /// `visual` was assigned its baseline.
    fn restored(&mut self, node: N, visual: V) {
        let _ = (node, visual);
    }

    /// `visual` was assigned the suppressed appearance.
    fn suppressed(&mut self, node: N, visual: V) {
        let _ = (node, visual);
    }

    /// `node` was visited but its appearance was not written.
    fn skipped(&mut self, node: N, why: Skip) {
        let _ = (node, why);
    }
}

impl<N, V> ReconcileTrace<N, V> for () {}

/// One recorded reconcile decision.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReconcileEvent<N, V> {
    /// See [`ReconcileTrace::captured`].
    Captured {
        /// Visited node.
        node: N,
        /// Its visual.
        visual: V,
        /// Which path captured it.
        how: Capture,
    },
    /// See [`ReconcileTrace::restored`].
    Restored {
        /// Visited node.
        node: N,
        /// Its visual.
        visual: V,
    },
    /// See [`ReconcileTrace::suppressed`].
    Suppressed {
        /// Visited node.
        node: N,
        /// Its visual.
        visual: V,
    },
    /// See [`ReconcileTrace::skipped`].
    Skipped {
        /// Visited node.
        node: N,
        /// Why it was left alone.
        why: Skip,
    },
}

impl<N: Copy, V> ReconcileEvent<N, V> {
    /// Returns the node this event is about.
    #[must_use]
    pub fn node(&self) -> N {
        match self {
            Self::Captured { node, .. }
            | Self::Restored { node, .. }
            | Self::Suppressed { node, .. }
            | Self::Skipped { node, .. } => *node,
        }
    }
}

/// Records every event in the order it was reported.
#[derive(Clone, Debug, Default)]
pub struct EventLog<N, V> {
    events: Vec<ReconcileEvent<N, V>>,
}

impl<N, V> EventLog<N, V> {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Returns all recorded events.
    #[must_use]
    pub fn events(&self) -> &[ReconcileEvent<N, V>] {
        &self.events
    }

    /// Clears the log.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<N: Copy + PartialEq, V: Copy> EventLog<N, V> {
    /// Returns the last recorded event for `node`.
    ///
    /// After a single pass this is the decision that determined the node's
    /// current appearance.
    #[must_use]
    pub fn last_cause(&self, node: N) -> Option<ReconcileEvent<N, V>> {
        self.events.iter().rev().find(|e| e.node() == node).copied()
    }
}

impl<N, V> ReconcileTrace<N, V> for EventLog<N, V> {
    fn captured(&mut self, node: N, visual: V, how: Capture) {
        self.events.push(ReconcileEvent::Captured { node, visual, how });
    }

    fn restored(&mut self, node: N, visual: V) {
        self.events.push(ReconcileEvent::Restored { node, visual });
    }

    fn suppressed(&mut self, node: N, visual: V) {
        self.events.push(ReconcileEvent::Suppressed { node, visual });
    }

    fn skipped(&mut self, node: N, why: Skip) {
        self.events.push(ReconcileEvent::Skipped { node, why });
    }
}
