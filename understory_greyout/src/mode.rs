// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display mode and edge detection for mode changes.

/// Global display mode of a reconciled subtree.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Every visual shows its baseline.
    #[default]
    Normal,
    /// Selected subtrees show their baseline; everything else is suppressed.
    Greyed,
}

impl Mode {
    /// Returns the other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Normal => Self::Greyed,
            Self::Greyed => Self::Normal,
        }
    }
}

/// Remembers the last applied [`Mode`] so a per-frame caller only
/// reconciles when the requested mode actually changes.
///
/// ```
/// use understory_greyout::{Mode, ModeLatch};
///
/// let mut latch = ModeLatch::new();
/// assert_eq!(latch.observe(Mode::Normal), Some(Mode::Normal));
/// assert_eq!(latch.observe(Mode::Normal), None);
/// assert_eq!(latch.observe(Mode::Greyed), Some(Mode::Greyed));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ModeLatch {
    applied: Option<Mode>,
}

impl ModeLatch {
    /// Creates a latch with nothing applied yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { applied: None }
    }

    /// Creates a latch that treats `mode` as already applied.
    #[must_use]
    pub const fn with_applied(mode: Mode) -> Self {
        Self {
            applied: Some(mode),
        }
    }

    /// Returns the last applied mode, if any.
    #[must_use]
    pub const fn applied(&self) -> Option<Mode> {
        self.applied
    }

    /// Returns `true` if `requested` differs from the applied mode.
    #[must_use]
    pub fn changed(&self, requested: Mode) -> bool {
        self.applied != Some(requested)
    }

    /// Records `mode` as applied.
    pub fn set_applied(&mut self, mode: Mode) {
        self.applied = Some(mode);
    }

    /// Forgets the applied mode so the next request counts as a change.
    pub fn reset(&mut self) {
        self.applied = None;
    }

    /// Returns `Some(requested)` and records it when it is a change.
    ///
    /// Use [`changed`](Self::changed) and [`set_applied`](Self::set_applied)
    /// separately when applying can fail.
    pub fn observe(&mut self, requested: Mode) -> Option<Mode> {
        if !self.changed(requested) {
            return None;
        }
        self.applied = Some(requested);
        Some(requested)
    }
}
