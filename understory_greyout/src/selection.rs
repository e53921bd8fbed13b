// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selection membership and subtree classification.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash};

use crate::scene::Hierarchy;

/// Membership test over the nodes whose subtrees stay un-greyed.
///
/// Only membership matters: order and duplicates have no effect on
/// classification. The selection is borrowed for the duration of a pass and
/// never stored by the reconciler.
///
/// Implemented for slices, arrays, `Vec`, [`BTreeSet`], `hashbrown::HashSet`,
/// and (with the `std` feature) `std::collections::HashSet`. Slice-like
/// containers scan linearly; prefer a hash set for large selections.
pub trait SelectionSet<N> {
    /// Returns `true` if `node` is a selection root.
    fn is_selected(&self, node: &N) -> bool;
}

impl<N, T> SelectionSet<N> for &T
where
    T: SelectionSet<N> + ?Sized,
{
    fn is_selected(&self, node: &N) -> bool {
        (**self).is_selected(node)
    }
}

impl<N: PartialEq> SelectionSet<N> for [N] {
    fn is_selected(&self, node: &N) -> bool {
        self.contains(node)
    }
}

impl<N: PartialEq, const LEN: usize> SelectionSet<N> for [N; LEN] {
    fn is_selected(&self, node: &N) -> bool {
        self.as_slice().contains(node)
    }
}

impl<N: PartialEq> SelectionSet<N> for Vec<N> {
    fn is_selected(&self, node: &N) -> bool {
        self.as_slice().contains(node)
    }
}

impl<N: Ord> SelectionSet<N> for BTreeSet<N> {
    fn is_selected(&self, node: &N) -> bool {
        self.contains(node)
    }
}

impl<N, S> SelectionSet<N> for hashbrown::HashSet<N, S>
where
    N: Eq + Hash,
    S: BuildHasher,
{
    fn is_selected(&self, node: &N) -> bool {
        self.contains(node)
    }
}

#[cfg(feature = "std")]
impl<N, S> SelectionSet<N> for std::collections::HashSet<N, S>
where
    N: Eq + Hash,
    S: BuildHasher,
{
    fn is_selected(&self, node: &N) -> bool {
        self.contains(node)
    }
}

/// Returns `true` if `node` is selected or has a selected ancestor.
///
/// Walks parent links toward the scene root, so this is O(depth). The walk
/// is not bounded by any reconcile root: a selected ancestor of the root
/// preserves the whole subtree.
///
/// ```
/// use understory_greyout::arena::SceneArena;
/// use understory_greyout::is_preserved;
///
/// let mut scene = SceneArena::<&str>::new();
/// let a = scene.insert(None, Some("a"));
/// let b = scene.insert(Some(a), None);
/// let d = scene.insert(Some(b), Some("d"));
///
/// assert!(is_preserved(&scene, d, &[b]));
/// assert!(!is_preserved(&scene, a, &[b]));
/// ```
pub fn is_preserved<H, Sel>(scene: &H, node: H::Node, selection: &Sel) -> bool
where
    H: Hierarchy + ?Sized,
    Sel: SelectionSet<H::Node> + ?Sized,
{
    let mut current = Some(node);
    while let Some(id) = current {
        if selection.is_selected(&id) {
            return true;
        }
        current = scene.parent_of(id);
    }
    false
}
