// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Baseline cache: the first observed appearance of each visual.

use core::hash::Hash;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

/// First-observed appearances keyed by visual identity.
///
/// A baseline is what a visual is restored to. [`capture`](Self::capture)
/// only inserts when no entry exists, so capturing a visual that is currently
/// greyed out never replaces its real baseline. To deliberately re-baseline a
/// visual, [`forget`](Self::forget) it first.
///
/// Entries do not observe component lifetimes. Hosts that destroy visuals
/// should drop their entries with [`forget`](Self::forget) or
/// [`retain`](Self::retain).
///
/// # Example
///
/// ```
/// use understory_greyout::BaselineCache;
///
/// let mut cache = BaselineCache::<u32, &str>::new();
/// assert!(cache.capture(7, "wood"));
/// assert!(!cache.capture(7, "grey"));
/// assert_eq!(cache.get(7), Some(&"wood"));
///
/// cache.forget(7);
/// assert!(cache.capture(7, "steel"));
/// assert_eq!(cache.get(7), Some(&"steel"));
/// ```
#[derive(Clone, Debug)]
pub struct BaselineCache<V, A>
where
    V: Copy + Eq + Hash,
{
    entries: HashMap<V, A>,
}

impl<V, A> Default for BaselineCache<V, A>
where
    V: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, A> BaselineCache<V, A>
where
    V: Copy + Eq + Hash,
{
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Records `appearance` as the baseline of `visual` unless one exists.
    ///
    /// Returns `true` if the entry was newly inserted.
    pub fn capture(&mut self, visual: V, appearance: A) -> bool {
        match self.entries.entry(visual) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(appearance);
                true
            }
        }
    }

    /// Returns the baseline of `visual`, if captured.
    #[must_use]
    pub fn get(&self, visual: V) -> Option<&A> {
        self.entries.get(&visual)
    }

    /// Returns `true` if `visual` has a baseline.
    #[must_use]
    pub fn contains(&self, visual: V) -> bool {
        self.entries.contains_key(&visual)
    }

    /// Removes and returns the baseline of `visual`.
    pub fn forget(&mut self, visual: V) -> Option<A> {
        self.entries.remove(&visual)
    }

    /// Keeps only the entries for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(V, &A) -> bool) {
        self.entries.retain(|visual, appearance| keep(*visual, appearance));
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of captured baselines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(visual, baseline)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (V, &A)> + '_ {
        self.entries.iter().map(|(visual, appearance)| (*visual, appearance))
    }
}
