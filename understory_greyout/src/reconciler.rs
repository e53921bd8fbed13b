// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The reconciler: baseline capture and mode application over a subtree.

use alloc::vec::Vec;
use core::fmt;
use core::mem;

use crate::baseline::BaselineCache;
use crate::error::ReconcileError;
use crate::mode::Mode;
use crate::scene::{Hierarchy, Visuals};
use crate::selection::{SelectionSet, is_preserved};
use crate::trace::{Capture, ReconcileTrace, Skip};

/// How a greyed pass decides whether a node is preserved.
///
/// Both strategies classify identically; they only differ in cost.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Classification {
    /// Call [`is_preserved`] for every visited node.
    ///
    /// O(N·D) for N nodes of depth D. No state is carried between nodes.
    AncestorWalk,
    /// Classify the root with [`is_preserved`], then let each child inherit
    /// its parent's flag unless it is itself selected.
    ///
    /// O(N) plus one ancestor walk for the root.
    #[default]
    Inherited,
}

/// Per-pass counters returned by [`Reconciler::apply_mode`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplyStats {
    /// Visuals assigned their baseline.
    pub restored: usize,
    /// Visuals assigned the suppressed appearance.
    pub suppressed: usize,
    /// Baselines captured lazily during this pass.
    pub captured: usize,
    /// Visited nodes without a visual.
    pub no_visual: usize,
    /// Visuals left unchanged because they were never baselined.
    pub no_baseline: usize,
}

impl ApplyStats {
    /// Total number of nodes visited.
    #[must_use]
    pub fn visited(&self) -> usize {
        self.restored + self.suppressed + self.no_visual + self.no_baseline
    }
}

/// Captures baselines and applies [`Mode`]s to subtrees of a scene `S`.
///
/// The reconciler owns only its [`BaselineCache`] and some reusable traversal
/// buffers. The scene, the selection, and the suppressed appearance are
/// borrowed per call.
///
/// # Example
///
/// ```
/// use understory_greyout::arena::SceneArena;
/// use understory_greyout::{Mode, Reconciler};
///
/// let mut scene = SceneArena::new();
/// let a = scene.insert(None, Some("a0"));
/// let b = scene.insert(Some(a), Some("b0"));
/// let c = scene.insert(Some(a), Some("c0"));
///
/// let mut reconciler = Reconciler::new();
/// reconciler.capture_baseline(&scene, a).unwrap();
///
/// reconciler
///     .apply_mode(&mut scene, a, &[b], Mode::Greyed, &"grey")
///     .unwrap();
/// assert_eq!(scene.appearance_of(a), Some(&"grey"));
/// assert_eq!(scene.appearance_of(b), Some(&"b0"));
/// assert_eq!(scene.appearance_of(c), Some(&"grey"));
///
/// reconciler
///     .apply_mode(&mut scene, a, &[b], Mode::Normal, &"grey")
///     .unwrap();
/// assert_eq!(scene.appearance_of(a), Some(&"a0"));
/// assert_eq!(scene.appearance_of(c), Some(&"c0"));
/// ```
pub struct Reconciler<S>
where
    S: Visuals,
{
    baseline: BaselineCache<S::Visual, S::Appearance>,
    classification: Classification,
    stack: Vec<(S::Node, bool)>,
    children: Vec<S::Node>,
}

impl<S> fmt::Debug for Reconciler<S>
where
    S: Visuals,
    S::Visual: fmt::Debug,
    S::Appearance: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("baseline", &self.baseline)
            .field("classification", &self.classification)
            .finish_non_exhaustive()
    }
}

impl<S> Default for Reconciler<S>
where
    S: Visuals,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Reconciler<S>
where
    S: Visuals,
{
    /// Creates a reconciler with an empty cache and the default
    /// [`Classification`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            baseline: BaselineCache::new(),
            classification: Classification::default(),
            stack: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Sets the classification strategy.
    #[must_use]
    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = classification;
        self
    }

    /// Returns the classification strategy.
    #[must_use]
    pub fn classification(&self) -> Classification {
        self.classification
    }

    /// Changes the classification strategy for subsequent passes.
    pub fn set_classification(&mut self, classification: Classification) {
        self.classification = classification;
    }

    /// Returns the baseline cache.
    #[must_use]
    pub fn baseline(&self) -> &BaselineCache<S::Visual, S::Appearance> {
        &self.baseline
    }

    /// Returns the baseline cache mutably, e.g. to prune destroyed visuals.
    pub fn baseline_mut(&mut self) -> &mut BaselineCache<S::Visual, S::Appearance> {
        &mut self.baseline
    }

    /// Drops the baselines of visuals that no longer exist in `scene`.
    ///
    /// A visual counts as gone when [`Visuals::appearance`] returns `None`
    /// for it. Returns the number of entries removed.
    pub fn prune(&mut self, scene: &S) -> usize {
        let before = self.baseline.len();
        self.baseline.retain(|visual, _| scene.appearance(visual).is_some());
        before - self.baseline.len()
    }

    /// Records the current appearance of every not-yet-baselined visual in
    /// the subtree rooted at `root`.
    ///
    /// Existing baselines are never replaced and no appearance is written,
    /// so calling this again (even while greyed) is harmless. Returns the
    /// number of newly captured baselines.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::InvalidRoot`] if `root` is not alive.
    pub fn capture_baseline(
        &mut self,
        scene: &S,
        root: S::Node,
    ) -> Result<usize, ReconcileError<S::Node>> {
        self.capture_baseline_with_trace(scene, root, &mut ())
    }

    /// Like [`capture_baseline`](Self::capture_baseline), reporting each
    /// capture and each node without a visual to `trace`.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::InvalidRoot`] if `root` is not alive.
    pub fn capture_baseline_with_trace<T>(
        &mut self,
        scene: &S,
        root: S::Node,
        trace: &mut T,
    ) -> Result<usize, ReconcileError<S::Node>>
    where
        T: ReconcileTrace<S::Node, S::Visual> + ?Sized,
    {
        if !scene.is_alive(root) {
            return Err(ReconcileError::InvalidRoot { root });
        }

        let mut stack = mem::take(&mut self.stack);
        let mut children = mem::take(&mut self.children);
        stack.clear();
        stack.push((root, false));

        let mut captured = 0;
        while let Some((node, _)) = stack.pop() {
            match scene.visual_of(node) {
                Some(visual) if self.baseline.contains(visual) => {}
                Some(visual) => match scene.appearance(visual) {
                    Some(current) => {
                        self.baseline.capture(visual, current);
                        captured += 1;
                        trace.captured(node, visual, Capture::Eager);
                    }
                    None => trace.skipped(node, Skip::NoVisual),
                },
                None => trace.skipped(node, Skip::NoVisual),
            }
            push_children(scene, node, &mut children, &mut stack, |_| false);
        }

        self.stack = stack;
        self.children = children;
        Ok(captured)
    }

    /// Applies `mode` to the subtree rooted at `root`.
    ///
    /// - [`Mode::Normal`]: every baselined visual gets its baseline back.
    /// - [`Mode::Greyed`]: visuals on nodes that are selected or below a
    ///   selected node get their baseline back; every other visual is
    ///   baselined if it was never seen and then assigned `suppressed`.
    ///
    /// Visuals without a baseline are never restored and are left as they
    /// are. Repeating a call with the same inputs yields the same
    /// appearances.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::InvalidRoot`] if `root` is not alive. No
    /// appearance is written in that case.
    pub fn apply_mode<Sel>(
        &mut self,
        scene: &mut S,
        root: S::Node,
        selection: &Sel,
        mode: Mode,
        suppressed: &S::Appearance,
    ) -> Result<ApplyStats, ReconcileError<S::Node>>
    where
        Sel: SelectionSet<S::Node> + ?Sized,
    {
        self.apply_mode_with_trace(scene, root, selection, mode, suppressed, &mut ())
    }

    /// Like [`apply_mode`](Self::apply_mode), reporting every per-node
    /// decision to `trace`.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::InvalidRoot`] if `root` is not alive.
    pub fn apply_mode_with_trace<Sel, T>(
        &mut self,
        scene: &mut S,
        root: S::Node,
        selection: &Sel,
        mode: Mode,
        suppressed: &S::Appearance,
        trace: &mut T,
    ) -> Result<ApplyStats, ReconcileError<S::Node>>
    where
        Sel: SelectionSet<S::Node> + ?Sized,
        T: ReconcileTrace<S::Node, S::Visual> + ?Sized,
    {
        if !scene.is_alive(root) {
            return Err(ReconcileError::InvalidRoot { root });
        }

        // In normal mode every node is treated as preserved.
        let greyed = mode == Mode::Greyed;
        let inherit = greyed && self.classification == Classification::Inherited;
        let root_flag = !greyed || (inherit && is_preserved(&*scene, root, selection));

        let mut stack = mem::take(&mut self.stack);
        let mut children = mem::take(&mut self.children);
        stack.clear();
        stack.push((root, root_flag));

        let mut stats = ApplyStats::default();
        while let Some((node, flag)) = stack.pop() {
            let preserved = if greyed && !inherit {
                is_preserved(&*scene, node, selection)
            } else {
                flag
            };

            if let Some(visual) = scene.visual_of(node) {
                if preserved {
                    if let Some(base) = self.baseline.get(visual) {
                        scene.set_appearance(visual, base.clone());
                        stats.restored += 1;
                        trace.restored(node, visual);
                    } else {
                        stats.no_baseline += 1;
                        trace.skipped(node, Skip::NoBaseline);
                    }
                } else if self.baseline.contains(visual) {
                    scene.set_appearance(visual, suppressed.clone());
                    stats.suppressed += 1;
                    trace.suppressed(node, visual);
                } else if let Some(current) = scene.appearance(visual) {
                    // Never override a visual whose baseline is unknown.
                    self.baseline.capture(visual, current);
                    stats.captured += 1;
                    trace.captured(node, visual, Capture::Lazy);
                    scene.set_appearance(visual, suppressed.clone());
                    stats.suppressed += 1;
                    trace.suppressed(node, visual);
                } else {
                    stats.no_visual += 1;
                    trace.skipped(node, Skip::NoVisual);
                }
            } else {
                stats.no_visual += 1;
                trace.skipped(node, Skip::NoVisual);
            }

            push_children(&*scene, node, &mut children, &mut stack, |child| {
                preserved || (inherit && selection.is_selected(&child))
            });
        }

        self.stack = stack;
        self.children = children;
        Ok(stats)
    }
}

/// Pushes the children of `node` with their classification flag.
fn push_children<H>(
    scene: &H,
    node: H::Node,
    children: &mut Vec<H::Node>,
    stack: &mut Vec<(H::Node, bool)>,
    mut flag: impl FnMut(H::Node) -> bool,
) where
    H: Hierarchy + ?Sized,
{
    children.clear();
    scene.children_of(node, children);
    stack.extend(children.drain(..).map(|child| (child, flag(child))));
}
