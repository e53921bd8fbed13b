// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `understory_greyout` crate.
//!
//! These exercise the reconciler against `SceneArena`, focusing on the
//! observable appearance of every node after a sequence of mode changes.

use std::cell::RefCell;
use std::collections::BTreeSet;

use understory_greyout::arena::{NodeId, SceneArena, VisualId};
use understory_greyout::{
    Classification, Greyout, Hierarchy, Mode, Reconciler, Visuals, is_preserved,
};

const GREY: &str = "grey";

struct Fixture {
    scene: SceneArena<&'static str>,
    a: NodeId,
    b: NodeId,
    c: NodeId,
    d: NodeId,
}

// A -> [B, C], B -> [D]
fn fixture() -> Fixture {
    let mut scene = SceneArena::new();
    let a = scene.insert(None, Some("a0"));
    let b = scene.insert(Some(a), Some("b0"));
    let c = scene.insert(Some(a), Some("c0"));
    let d = scene.insert(Some(b), Some("d0"));
    Fixture { scene, a, b, c, d }
}

fn appearances(scene: &SceneArena<&'static str>, nodes: &[NodeId]) -> Vec<&'static str> {
    nodes
        .iter()
        .map(|n| scene.appearance_of(*n).copied().unwrap_or("-"))
        .collect()
}

#[test]
fn selected_subtree_stays_and_normal_restores() {
    let Fixture {
        mut scene,
        a,
        b,
        c,
        d,
    } = fixture();
    let mut r = Reconciler::new();
    r.capture_baseline(&scene, a).unwrap();

    r.apply_mode(&mut scene, a, &[b], Mode::Greyed, &GREY).unwrap();
    assert_eq!(appearances(&scene, &[a, b, c, d]), [GREY, "b0", GREY, "d0"]);

    r.apply_mode(&mut scene, a, &[b], Mode::Normal, &GREY).unwrap();
    assert_eq!(appearances(&scene, &[a, b, c, d]), ["a0", "b0", "c0", "d0"]);
}

#[test]
fn empty_selection_suppresses_everything() {
    let Fixture {
        mut scene,
        a,
        b,
        c,
        d,
    } = fixture();
    let mut r = Reconciler::new();
    r.capture_baseline(&scene, a).unwrap();

    let none: Vec<NodeId> = Vec::new();
    let stats = r.apply_mode(&mut scene, a, &none, Mode::Greyed, &GREY).unwrap();
    assert_eq!(stats.suppressed, 4);
    assert_eq!(appearances(&scene, &[a, b, c, d]), [GREY; 4]);
}

#[test]
fn late_child_is_lazily_baselined_and_restored() {
    let Fixture {
        mut scene,
        a,
        b,
        c,
        d,
    } = fixture();
    let mut r = Reconciler::new();
    r.capture_baseline(&scene, a).unwrap();

    let e = scene.insert(Some(d), Some("e0"));
    let stats = r.apply_mode(&mut scene, a, &[c], Mode::Greyed, &GREY).unwrap();
    assert_eq!(stats.captured, 1);
    assert_eq!(scene.appearance_of(e), Some(&GREY));

    r.apply_mode(&mut scene, a, &[c], Mode::Normal, &GREY).unwrap();
    assert_eq!(
        appearances(&scene, &[a, b, c, d, e]),
        ["a0", "b0", "c0", "d0", "e0"]
    );
}

#[test]
fn late_child_inside_selection_is_left_alone() {
    let Fixture { mut scene, a, b, d, .. } = fixture();
    let mut r = Reconciler::new();
    r.capture_baseline(&scene, a).unwrap();

    let e = scene.insert(Some(d), Some("e0"));
    let stats = r.apply_mode(&mut scene, a, &[b], Mode::Greyed, &GREY).unwrap();
    assert_eq!(stats.no_baseline, 1);
    assert_eq!(scene.appearance_of(e), Some(&"e0"));

    let stats = r.apply_mode(&mut scene, a, &[b], Mode::Normal, &GREY).unwrap();
    assert_eq!(stats.no_baseline, 1);
    assert_eq!(scene.appearance_of(e), Some(&"e0"));
}

#[test]
fn repeated_passes_are_idempotent() {
    let Fixture {
        mut scene,
        a,
        b,
        c,
        d,
    } = fixture();
    let mut r = Reconciler::new();
    r.capture_baseline(&scene, a).unwrap();

    for mode in [Mode::Greyed, Mode::Normal] {
        r.apply_mode(&mut scene, a, &[c], mode, &GREY).unwrap();
        let once = appearances(&scene, &[a, b, c, d]);
        let cached = r.baseline().len();
        r.apply_mode(&mut scene, a, &[c], mode, &GREY).unwrap();
        assert_eq!(appearances(&scene, &[a, b, c, d]), once, "{mode:?}");
        assert_eq!(r.baseline().len(), cached);
    }
}

#[test]
fn capture_while_greyed_keeps_original_baseline() {
    let Fixture {
        mut scene,
        a,
        b,
        c,
        d,
    } = fixture();
    let mut r = Reconciler::new();
    r.capture_baseline(&scene, a).unwrap();
    r.apply_mode(&mut scene, a, &[b], Mode::Greyed, &GREY).unwrap();

    assert_eq!(r.capture_baseline(&scene, a), Ok(0));
    r.apply_mode(&mut scene, a, &[b], Mode::Normal, &GREY).unwrap();
    assert_eq!(appearances(&scene, &[a, b, c, d]), ["a0", "b0", "c0", "d0"]);
}

#[test]
fn lazy_path_alone_round_trips() {
    let Fixture {
        mut scene,
        a,
        b,
        c,
        d,
    } = fixture();
    let mut r = Reconciler::new();

    r.apply_mode(&mut scene, a, &[d], Mode::Greyed, &GREY).unwrap();
    assert_eq!(appearances(&scene, &[a, b, c, d]), [GREY, GREY, GREY, "d0"]);

    r.apply_mode(&mut scene, a, &[d], Mode::Normal, &GREY).unwrap();
    assert_eq!(appearances(&scene, &[a, b, c, d]), ["a0", "b0", "c0", "d0"]);
}

#[test]
fn changing_selection_moves_the_focus() {
    let Fixture {
        mut scene,
        a,
        b,
        c,
        d,
    } = fixture();
    let mut r = Reconciler::new();
    r.capture_baseline(&scene, a).unwrap();

    r.apply_mode(&mut scene, a, &[b], Mode::Greyed, &GREY).unwrap();
    r.apply_mode(&mut scene, a, &[c], Mode::Greyed, &GREY).unwrap();
    assert_eq!(appearances(&scene, &[a, b, c, d]), [GREY, GREY, "c0", GREY]);
}

#[test]
fn invisible_selected_node_preserves_descendants() {
    let mut scene = SceneArena::new();
    let root = scene.insert(None, Some("root"));
    let group = scene.insert(Some(root), None);
    let inner = scene.insert(Some(group), Some("inner"));
    let other = scene.insert(Some(root), Some("other"));

    let mut r = Reconciler::new();
    r.capture_baseline(&scene, root).unwrap();
    let stats = r
        .apply_mode(&mut scene, root, &[group], Mode::Greyed, &GREY)
        .unwrap();

    assert_eq!(stats.no_visual, 1);
    assert_eq!(appearances(&scene, &[root, inner, other]), [GREY, "inner", GREY]);
}

#[test]
fn duplicates_and_foreign_nodes_in_selection_have_no_effect() {
    let Fixture {
        mut scene,
        a,
        b,
        c,
        d,
    } = fixture();
    let elsewhere = scene.insert(None, Some("x0"));

    let mut r = Reconciler::new();
    r.capture_baseline(&scene, a).unwrap();
    r.apply_mode(&mut scene, a, &[b, b, elsewhere], Mode::Greyed, &GREY)
        .unwrap();

    assert_eq!(appearances(&scene, &[a, b, c, d]), [GREY, "b0", GREY, "d0"]);
    assert_eq!(scene.appearance_of(elsewhere), Some(&"x0"));
}

#[test]
fn preservation_is_monotonic_over_descent() {
    let mut scene = SceneArena::<u32>::new();
    let mut nodes = vec![scene.insert(None, Some(0))];
    // A few layers of fan-out three.
    for i in 0..40 {
        let parent = nodes[i / 3];
        nodes.push(scene.insert(Some(parent), Some(i as u32 + 1)));
    }

    for &selected in &nodes {
        let sel = [selected];
        let mut stack = vec![selected];
        while let Some(n) = stack.pop() {
            assert!(is_preserved(&scene, n, &sel));
            stack.extend_from_slice(scene.children_of(n));
        }
    }
}

#[test]
fn reparenting_into_selection_restores_on_next_pass() {
    let Fixture {
        mut scene,
        a,
        b,
        c,
        ..
    } = fixture();
    let mut r = Reconciler::new().with_classification(Classification::AncestorWalk);
    r.capture_baseline(&scene, a).unwrap();

    r.apply_mode(&mut scene, a, &[b], Mode::Greyed, &GREY).unwrap();
    assert_eq!(scene.appearance_of(c), Some(&GREY));

    assert!(scene.reparent(c, Some(b)));
    r.apply_mode(&mut scene, a, &[b], Mode::Greyed, &GREY).unwrap();
    assert_eq!(scene.appearance_of(c), Some(&"c0"));
}

#[test]
fn forgotten_visual_is_rebaselined() {
    let Fixture { mut scene, a, c, .. } = fixture();
    let mut r = Reconciler::new();
    r.capture_baseline(&scene, a).unwrap();

    scene.set_appearance_of(c, "c1");
    let vc = scene.visual_of(c).unwrap();
    assert_eq!(r.baseline_mut().forget(vc), Some("c0"));
    r.capture_baseline(&scene, a).unwrap();

    r.apply_mode(&mut scene, a, &[a], Mode::Normal, &GREY).unwrap();
    assert_eq!(scene.appearance_of(c), Some(&"c1"));
}

/// Wraps an arena and records every node whose visual is looked up and every
/// visual whose appearance is read or written.
struct Recording {
    inner: SceneArena<&'static str>,
    nodes: RefCell<BTreeSet<NodeId>>,
    visuals: RefCell<BTreeSet<VisualId>>,
}

impl Hierarchy for Recording {
    type Node = NodeId;

    fn is_alive(&self, node: NodeId) -> bool {
        self.inner.is_alive(node)
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.inner.parent_of(node)
    }

    fn children_of(&self, node: NodeId, out: &mut Vec<NodeId>) {
        Hierarchy::children_of(&self.inner, node, out);
    }
}

impl Visuals for Recording {
    type Visual = VisualId;
    type Appearance = &'static str;

    fn visual_of(&self, node: NodeId) -> Option<VisualId> {
        self.nodes.borrow_mut().insert(node);
        self.inner.visual_of(node)
    }

    fn appearance(&self, visual: VisualId) -> Option<&'static str> {
        self.visuals.borrow_mut().insert(visual);
        Visuals::appearance(&self.inner, visual)
    }

    fn set_appearance(&mut self, visual: VisualId, appearance: &'static str) {
        self.visuals.borrow_mut().insert(visual);
        Visuals::set_appearance(&mut self.inner, visual, appearance);
    }
}

#[test]
fn nodes_outside_root_are_never_touched() {
    let Fixture { scene, a, b, c, d } = fixture();
    let outside = [a, c];
    let outside_visuals: Vec<_> = outside
        .iter()
        .map(|n| scene.visual_of(*n).unwrap())
        .collect();
    let mut scene = Recording {
        inner: scene,
        nodes: RefCell::default(),
        visuals: RefCell::default(),
    };

    let mut r = Reconciler::new();
    r.capture_baseline(&scene, b).unwrap();
    let none: [NodeId; 0] = [];
    r.apply_mode(&mut scene, b, &none, Mode::Greyed, &GREY).unwrap();
    r.apply_mode(&mut scene, b, &[d], Mode::Greyed, &GREY).unwrap();
    r.apply_mode(&mut scene, b, &none, Mode::Normal, &GREY).unwrap();

    assert_eq!(*scene.nodes.borrow(), BTreeSet::from([b, d]));
    for v in outside_visuals {
        assert!(!scene.visuals.borrow().contains(&v));
    }
    assert_eq!(appearances(&scene.inner, &outside), ["a0", "c0"]);
}

#[test]
fn driver_applies_only_on_mode_edges() {
    let Fixture {
        mut scene,
        a,
        b,
        c,
        d,
    } = fixture();
    let mut greyout = Greyout::new(a, GREY).with_selection([b]);
    greyout.start(&mut scene).unwrap();
    assert_eq!(greyout.applied_mode(), Some(Mode::Normal));

    let mut passes = 0;
    for requested in [
        Mode::Normal,
        Mode::Greyed,
        Mode::Greyed,
        Mode::Greyed,
        Mode::Normal,
        Mode::Greyed,
    ] {
        greyout.set_mode(requested);
        if greyout.update(&mut scene).unwrap() {
            passes += 1;
        }
    }

    assert_eq!(passes, 3);
    assert_eq!(appearances(&scene, &[a, b, c, d]), [GREY, "b0", GREY, "d0"]);

    greyout.set_mode(greyout.mode().toggled());
    greyout.update(&mut scene).unwrap();
    assert_eq!(appearances(&scene, &[a, b, c, d]), ["a0", "b0", "c0", "d0"]);
}
