// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene contracts: what the reconciler needs from a host hierarchy.
//!
//! The reconciler never owns nodes or components. Hosts implement
//! [`Hierarchy`] over their scene graph (an ECS, a box tree, a retained
//! widget tree) and [`Visuals`] over whatever slot holds the appearance a
//! renderer draws with. [`SceneArena`](crate::arena::SceneArena) is a small
//! in-crate implementation of both.

use alloc::vec::Vec;
use core::hash::Hash;

/// Read access to a node hierarchy.
///
/// The hierarchy must be acyclic: walking [`parent_of`](Self::parent_of)
/// from any live node terminates.
pub trait Hierarchy {
    /// Node handle. Identity is handle equality.
    type Node: Copy + Eq + Hash;

    /// Returns `true` if `node` refers to a live node.
    fn is_alive(&self, node: Self::Node) -> bool;

    /// Returns the parent of `node`, or `None` for a scene root.
    fn parent_of(&self, node: Self::Node) -> Option<Self::Node>;

    /// Appends the direct children of `node` to `out`.
    ///
    /// Order is not significant. Implementations must not clear `out`.
    fn children_of(&self, node: Self::Node, out: &mut Vec<Self::Node>);
}

/// Access to the visual components attached to nodes.
pub trait Visuals: Hierarchy {
    /// Visual component handle. Baselines are keyed by this identity.
    type Visual: Copy + Eq + Hash;

    /// Opaque appearance value, e.g. a material handle.
    type Appearance: Clone;

    /// Returns the visual component attached to `node`, if any.
    fn visual_of(&self, node: Self::Node) -> Option<Self::Visual>;

    /// Returns the appearance currently assigned to `visual`.
    ///
    /// `None` means the handle is stale; the reconciler then treats the node
    /// as having no visual.
    fn appearance(&self, visual: Self::Visual) -> Option<Self::Appearance>;

    /// Assigns `appearance` to `visual`.
    fn set_appearance(&mut self, visual: Self::Visual, appearance: Self::Appearance);
}
