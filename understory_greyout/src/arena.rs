// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A minimal scene graph implementing [`Hierarchy`] and [`Visuals`].
//!
//! [`SceneArena`] stores nodes in generational slots and gives each attached
//! visual its own [`VisualId`]. It is what the crate's tests and benches run
//! against, and it is small enough to back a host that has no scene graph of
//! its own.

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::scene::{Hierarchy, Visuals};

/// Identifier for a node in a [`SceneArena`].
///
/// A slot index plus a generation. Removing a node makes every copy of its
/// `NodeId` stale; a reused slot gets a higher generation, so stale ids never
/// alias a newer node. A slot whose generation reaches `u32::MAX` is retired
/// instead of reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32, u32);

impl NodeId {
    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Identifier for a visual attached to a node in a [`SceneArena`].
///
/// Every attach produces a fresh id, so re-attaching a visual to the same
/// node yields a visual with no baseline. Ids are never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualId(u32);

#[derive(Clone, Debug)]
struct Slot<A> {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    visual: Option<(VisualId, A)>,
}

/// Generational node arena with optional per-node appearance.
#[derive(Clone, Debug)]
pub struct SceneArena<A> {
    slots: Vec<Option<Slot<A>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    owners: HashMap<VisualId, NodeId>,
    next_visual: u32,
    live: usize,
}

impl<A> Default for SceneArena<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> SceneArena<A> {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            owners: HashMap::new(),
            next_visual: 0,
            live: 0,
        }
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if there are no live nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Inserts a node under `parent`, with a visual if `appearance` is given.
    ///
    /// A `parent` that is not alive is ignored and the node becomes a root.
    /// The node gets no visual if [`attach_visual`](Self::attach_visual)
    /// fails.
    pub fn insert(&mut self, parent: Option<NodeId>, appearance: Option<A>) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            // Retired slots never enter the free list.
            let generation = self.generations[idx] + 1;
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.slots.push(None);
            self.generations.push(1);
            (self.slots.len() - 1, 1)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId(idx as u32, generation);
        self.slots[idx] = Some(Slot {
            generation,
            parent: None,
            children: Vec::new(),
            visual: None,
        });
        self.live += 1;

        if let Some(appearance) = appearance {
            self.attach_visual(id, appearance);
        }
        if let Some(p) = parent.filter(|p| self.is_alive(*p)) {
            self.link(id, p);
        }
        id
    }

    /// Removes `id` and its whole subtree. Their visuals go with them.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.parent_of(id) {
            self.unlink(id, parent);
        }
        let mut pending = Vec::from([id]);
        while let Some(node) = pending.pop() {
            let Some(slot) = self.slots[node.idx()].take() else {
                continue;
            };
            if let Some((visual, _)) = slot.visual {
                self.owners.remove(&visual);
            }
            pending.extend(slot.children);
            if slot.generation < u32::MAX {
                self.free_list.push(node.idx());
            }
            self.live -= 1;
        }
    }

    /// Moves `id` under `new_parent`, or makes it a root for `None`.
    ///
    /// Returns `false` and leaves the tree unchanged if either node is stale
    /// or if `new_parent` lies inside the subtree of `id`.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        if let Some(p) = new_parent
            && (!self.is_alive(p) || self.is_ancestor_or_self(id, p))
        {
            return false;
        }
        if let Some(old) = self.parent_of(id) {
            self.unlink(id, old);
        }
        if let Some(p) = new_parent {
            self.link(id, p);
        }
        true
    }

    /// Attaches a fresh visual to `id`, replacing any existing one.
    ///
    /// Returns `None` if `id` is stale or the visual id space is exhausted.
    pub fn attach_visual(&mut self, id: NodeId, appearance: A) -> Option<VisualId> {
        if !self.is_alive(id) {
            return None;
        }
        let next = self.next_visual.checked_add(1)?;
        let visual = VisualId(self.next_visual);
        self.next_visual = next;
        let slot = self.slots[id.idx()].as_mut()?;
        if let Some((old, _)) = slot.visual.replace((visual, appearance)) {
            self.owners.remove(&old);
        }
        self.owners.insert(visual, id);
        Some(visual)
    }

    /// Detaches the visual of `id`, returning it with its current appearance.
    pub fn detach_visual(&mut self, id: NodeId) -> Option<(VisualId, A)> {
        let detached = self.slot_mut(id)?.visual.take()?;
        self.owners.remove(&detached.0);
        Some(detached)
    }

    /// Returns `true` if `id` refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    /// Returns the parent of `id`.
    #[must_use]
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id)?.parent
    }

    /// Returns the direct children of `id`; empty for stale ids.
    #[must_use]
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.slot(id).map_or(&[][..], |s| s.children.as_slice())
    }

    /// Returns the visual attached to `id`.
    #[must_use]
    pub fn visual_of(&self, id: NodeId) -> Option<VisualId> {
        self.slot(id)?.visual.as_ref().map(|(v, _)| *v)
    }

    /// Returns the current appearance of the visual attached to `id`.
    #[must_use]
    pub fn appearance_of(&self, id: NodeId) -> Option<&A> {
        self.slot(id)?.visual.as_ref().map(|(_, a)| a)
    }

    /// Overwrites the appearance of the visual attached to `id`.
    ///
    /// Returns `false` if `id` is stale or has no visual.
    pub fn set_appearance_of(&mut self, id: NodeId, appearance: A) -> bool {
        match self.slot_mut(id).and_then(|s| s.visual.as_mut()) {
            Some((_, current)) => {
                *current = appearance;
                true
            }
            None => false,
        }
    }

    fn slot(&self, id: NodeId) -> Option<&Slot<A>> {
        self.slots
            .get(id.idx())?
            .as_ref()
            .filter(|s| s.generation == id.1)
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot<A>> {
        self.slots
            .get_mut(id.idx())?
            .as_mut()
            .filter(|s| s.generation == id.1)
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent_of(id);
        }
        false
    }

    fn link(&mut self, child: NodeId, parent: NodeId) {
        if let Some(p) = self.slot_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.slot_mut(child) {
            c.parent = Some(parent);
        }
    }

    fn unlink(&mut self, child: NodeId, parent: NodeId) {
        if let Some(p) = self.slot_mut(parent) {
            p.children.retain(|c| *c != child);
        }
        if let Some(c) = self.slot_mut(child) {
            c.parent = None;
        }
    }
}

impl<A> Hierarchy for SceneArena<A> {
    type Node = NodeId;

    fn is_alive(&self, node: NodeId) -> bool {
        Self::is_alive(self, node)
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        Self::parent_of(self, node)
    }

    fn children_of(&self, node: NodeId, out: &mut Vec<NodeId>) {
        out.extend_from_slice(Self::children_of(self, node));
    }
}

impl<A: Clone> Visuals for SceneArena<A> {
    type Visual = VisualId;
    type Appearance = A;

    fn visual_of(&self, node: NodeId) -> Option<VisualId> {
        Self::visual_of(self, node)
    }

    fn appearance(&self, visual: VisualId) -> Option<A> {
        let owner = *self.owners.get(&visual)?;
        self.appearance_of(owner).cloned()
    }

    fn set_appearance(&mut self, visual: VisualId, appearance: A) {
        if let Some(owner) = self.owners.get(&visual).copied() {
            self.set_appearance_of(owner, appearance);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_frees_subtree_and_bumps_generation() {
        let mut scene = SceneArena::<u8>::new();
        let root = scene.insert(None, None);
        let mid = scene.insert(Some(root), Some(1));
        let leaf = scene.insert(Some(mid), Some(2));
        assert_eq!(scene.len(), 3);

        scene.remove(mid);
        assert_eq!(scene.len(), 1);
        assert!(!scene.is_alive(mid));
        assert!(!scene.is_alive(leaf));
        assert!(scene.children_of(root).is_empty());

        let reused = scene.insert(Some(root), None);
        assert_ne!(reused, mid);
        assert_ne!(reused, leaf);
        assert!(!scene.is_alive(mid));
    }

    #[test]
    fn reparent_rejects_cycles() {
        let mut scene = SceneArena::<u8>::new();
        let a = scene.insert(None, None);
        let b = scene.insert(Some(a), None);
        let c = scene.insert(Some(b), None);

        assert!(!scene.reparent(a, Some(c)));
        assert!(!scene.reparent(b, Some(b)));
        assert!(scene.reparent(c, Some(a)));
        assert_eq!(scene.parent_of(c), Some(a));
        assert_eq!(scene.children_of(a), &[b, c]);
        assert!(scene.children_of(b).is_empty());
    }

    #[test]
    fn reattached_visual_gets_new_identity() {
        let mut scene = SceneArena::new();
        let n = scene.insert(None, Some("oak"));
        let first = scene.visual_of(n).unwrap();

        assert_eq!(scene.detach_visual(n), Some((first, "oak")));
        assert_eq!(Visuals::appearance(&scene, first), None);

        let second = scene.attach_visual(n, "pine").unwrap();
        assert_ne!(first, second);
        assert_eq!(Visuals::appearance(&scene, second), Some("pine"));

        Visuals::set_appearance(&mut scene, first, "stale");
        assert_eq!(scene.appearance_of(n), Some(&"pine"));
    }

    #[test]
    fn exhausted_generation_retires_slot() {
        let mut scene = SceneArena::<u8>::new();
        let first = scene.insert(None, None);
        scene.remove(first);
        scene.generations[0] = u32::MAX - 1;

        let last = scene.insert(None, Some(1));
        assert_eq!(last, NodeId(0, u32::MAX));
        scene.remove(last);
        assert!(scene.free_list.is_empty());

        let fresh = scene.insert(None, None);
        assert_eq!(fresh.idx(), 1);
        assert!(!scene.is_alive(first));
        assert!(!scene.is_alive(last));
        assert!(scene.is_alive(fresh));
    }

    #[test]
    fn exhausted_visual_ids_are_not_reissued() {
        let mut scene = SceneArena::new();
        let a = scene.insert(None, None);
        let b = scene.insert(None, None);
        scene.next_visual = u32::MAX - 1;

        let va = scene.attach_visual(a, 'a').unwrap();
        assert_eq!(scene.attach_visual(b, 'b'), None);
        assert_eq!(scene.visual_of(b), None);

        let c = scene.insert(Some(a), Some('c'));
        assert!(scene.is_alive(c));
        assert_eq!(scene.visual_of(c), None);
        assert_eq!(Visuals::appearance(&scene, va), Some('a'));
    }
}
