// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-driven wrapper bundling a reconciler with its configuration.

use core::fmt;

use hashbrown::HashSet;

use crate::error::ReconcileError;
use crate::mode::{Mode, ModeLatch};
use crate::reconciler::{ApplyStats, Classification, Reconciler};
use crate::scene::Visuals;

/// Owns everything needed to keep one subtree greyed or restored.
///
/// The host sets the requested mode whenever its UI toggle changes and
/// calls [`update`](Self::update) once per frame; the subtree is only walked
/// when the requested mode differs from the one last applied.
///
/// ```
/// use understory_greyout::arena::SceneArena;
/// use understory_greyout::{Greyout, Mode};
///
/// let mut scene = SceneArena::new();
/// let model = scene.insert(None, Some("hull"));
/// let engine = scene.insert(Some(model), Some("engine"));
///
/// let mut greyout = Greyout::new(model, "grey").with_selection([engine]);
/// greyout.start(&mut scene).unwrap();
///
/// greyout.set_mode(Mode::Greyed);
/// assert!(greyout.update(&mut scene).unwrap());
/// assert!(!greyout.update(&mut scene).unwrap());
/// assert_eq!(scene.appearance_of(model), Some(&"grey"));
/// assert_eq!(scene.appearance_of(engine), Some(&"engine"));
/// ```
pub struct Greyout<S>
where
    S: Visuals,
{
    root: S::Node,
    selection: HashSet<S::Node>,
    suppressed: S::Appearance,
    requested: Mode,
    latch: ModeLatch,
    reconciler: Reconciler<S>,
}

impl<S> fmt::Debug for Greyout<S>
where
    S: Visuals,
    S::Node: fmt::Debug,
    S::Visual: fmt::Debug,
    S::Appearance: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Greyout")
            .field("root", &self.root)
            .field("selection", &self.selection)
            .field("suppressed", &self.suppressed)
            .field("requested", &self.requested)
            .field("latch", &self.latch)
            .field("reconciler", &self.reconciler)
            .finish()
    }
}

impl<S> Greyout<S>
where
    S: Visuals,
{
    /// Creates a driver for the subtree under `root` with an empty selection
    /// and [`Mode::Normal`] requested.
    #[must_use]
    pub fn new(root: S::Node, suppressed: S::Appearance) -> Self {
        Self {
            root,
            selection: HashSet::new(),
            suppressed,
            requested: Mode::default(),
            latch: ModeLatch::new(),
            reconciler: Reconciler::new(),
        }
    }

    /// Sets the initially requested mode.
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.requested = mode;
        self
    }

    /// Replaces the selection.
    #[must_use]
    pub fn with_selection(mut self, nodes: impl IntoIterator<Item = S::Node>) -> Self {
        self.set_selection(nodes);
        self
    }

    /// Sets the classification strategy of the inner reconciler.
    #[must_use]
    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.reconciler.set_classification(classification);
        self
    }

    /// Returns the subtree root.
    #[must_use]
    pub fn root(&self) -> S::Node {
        self.root
    }

    /// Returns the requested mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.requested
    }

    /// Returns the last successfully applied mode.
    #[must_use]
    pub fn applied_mode(&self) -> Option<Mode> {
        self.latch.applied()
    }

    /// Requests `mode`. Nothing is written until the next
    /// [`update`](Self::update).
    pub fn set_mode(&mut self, mode: Mode) {
        self.requested = mode;
    }

    /// Returns the selection roots.
    #[must_use]
    pub fn selection(&self) -> &HashSet<S::Node> {
        &self.selection
    }

    /// Adds `node` to the selection. Returns `true` if it was not selected.
    pub fn select(&mut self, node: S::Node) -> bool {
        self.selection.insert(node)
    }

    /// Removes `node` from the selection. Returns `true` if it was selected.
    pub fn deselect(&mut self, node: S::Node) -> bool {
        self.selection.remove(&node)
    }

    /// Replaces the selection.
    pub fn set_selection(&mut self, nodes: impl IntoIterator<Item = S::Node>) {
        self.selection.clear();
        self.selection.extend(nodes);
    }

    /// Empties the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Returns the inner reconciler.
    #[must_use]
    pub fn reconciler(&self) -> &Reconciler<S> {
        &self.reconciler
    }

    /// Returns the inner reconciler mutably.
    pub fn reconciler_mut(&mut self) -> &mut Reconciler<S> {
        &mut self.reconciler
    }

    /// Baselines the subtree and applies the requested mode right away.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::InvalidRoot`] if the root is not alive.
    pub fn start(&mut self, scene: &mut S) -> Result<ApplyStats, ReconcileError<S::Node>> {
        self.reconciler.capture_baseline(scene, self.root)?;
        self.refresh(scene)
    }

    /// Applies the requested mode if it differs from the applied one.
    ///
    /// Returns `true` if a pass ran. A failed pass leaves the latch armed so
    /// the next call retries.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::InvalidRoot`] if the root is not alive.
    pub fn update(&mut self, scene: &mut S) -> Result<bool, ReconcileError<S::Node>> {
        if !self.latch.changed(self.requested) {
            return Ok(false);
        }
        self.refresh(scene)?;
        Ok(true)
    }

    /// Applies the requested mode unconditionally.
    ///
    /// Use this after editing the selection or the tree while greyed.
    /// Baselines of visuals destroyed since the last pass are dropped first.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::InvalidRoot`] if the root is not alive.
    pub fn refresh(&mut self, scene: &mut S) -> Result<ApplyStats, ReconcileError<S::Node>> {
        self.reconciler.prune(scene);
        let stats = self.reconciler.apply_mode(
            scene,
            self.root,
            &self.selection,
            self.requested,
            &self.suppressed,
        )?;
        self.latch.set_applied(self.requested);
        Ok(stats)
    }
}
