// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Greyout: keep selected subtrees in focus and grey out the rest.
//!
//! Given a root node in some host scene, a set of selected nodes, and a
//! shared "suppressed" appearance, this crate switches the subtree between
//! two states:
//!
//! - [`Mode::Normal`]: every visual shows its original appearance.
//! - [`Mode::Greyed`]: visuals inside a selected subtree show their original
//!   appearance, every other visual shows the suppressed appearance.
//!
//! The crate does not render anything and does not own the scene. It reads
//! the hierarchy through [`Hierarchy`], reads and writes one appearance slot
//! per visual through [`Visuals`], and remembers each visual's first observed
//! appearance (its *baseline*) in a [`BaselineCache`] so it can always be
//! restored exactly.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_greyout::arena::SceneArena;
//! use understory_greyout::{Mode, Reconciler};
//!
//! // a -> [b, c], b -> [d]
//! let mut scene = SceneArena::new();
//! let a = scene.insert(None, Some("a0"));
//! let b = scene.insert(Some(a), Some("b0"));
//! let c = scene.insert(Some(a), Some("c0"));
//! let d = scene.insert(Some(b), Some("d0"));
//!
//! let mut reconciler = Reconciler::new();
//! reconciler.capture_baseline(&scene, a).unwrap();
//!
//! reconciler
//!     .apply_mode(&mut scene, a, &[b], Mode::Greyed, &"grey")
//!     .unwrap();
//! assert_eq!(scene.appearance_of(a), Some(&"grey"));
//! assert_eq!(scene.appearance_of(b), Some(&"b0"));
//! assert_eq!(scene.appearance_of(c), Some(&"grey"));
//! assert_eq!(scene.appearance_of(d), Some(&"d0"));
//!
//! reconciler
//!     .apply_mode(&mut scene, a, &[b], Mode::Normal, &"grey")
//!     .unwrap();
//! assert_eq!(scene.appearance_of(a), Some(&"a0"));
//! assert_eq!(scene.appearance_of(c), Some(&"c0"));
//! ```
//!
//! ## Concepts
//!
//! - **Baselines** are captured eagerly by [`Reconciler::capture_baseline`]
//!   and lazily by a greyed pass the first time it suppresses a visual it has
//!   never seen. A captured baseline is never overwritten, so capturing while
//!   greyed cannot bake the suppressed appearance in.
//! - **Classification**: a node is preserved if it or any ancestor is in the
//!   selection ([`is_preserved`]). Selected nodes without a visual still
//!   preserve their descendants. [`Classification`] picks between walking
//!   ancestors per node or inheriting flags top-down; results are identical.
//! - **Degradation**: nodes without a visual are skipped, and visuals never
//!   baselined are left alone when they would be restored. Only an invalid
//!   root aborts a pass ([`ReconcileError`]). [`ApplyStats`] and
//!   [`ReconcileTrace`] report what was skipped.
//! - **Driving**: [`Greyout`] bundles root, selection, suppressed appearance
//!   and a [`ModeLatch`], so a per-frame caller only pays for a traversal when
//!   the mode flag actually flips.
//!
//! ## Features
//!
//! - `std` (default): implements [`SelectionSet`] for
//!   `std::collections::HashSet`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod arena;
mod baseline;
mod driver;
mod error;
mod mode;
mod reconciler;
mod scene;
mod selection;
pub mod trace;

pub use baseline::BaselineCache;
pub use driver::Greyout;
pub use error::ReconcileError;
pub use mode::{Mode, ModeLatch};
pub use reconciler::{ApplyStats, Classification, Reconciler};
pub use scene::{Hierarchy, Visuals};
pub use selection::{SelectionSet, is_preserved};
pub use trace::ReconcileTrace;
