// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Error returned when a reconcile pass cannot start.
///
/// Everything below the root degrades instead of failing: nodes without a
/// visual and visuals without a baseline are skipped and reported through
/// [`ApplyStats`](crate::ApplyStats) and [`ReconcileTrace`](crate::ReconcileTrace).
#[derive(Clone, PartialEq, Eq)]
pub enum ReconcileError<N> {
    /// The root node is not alive in the scene.
    InvalidRoot {
        /// The rejected root.
        root: N,
    },
}

impl<N: fmt::Debug> fmt::Debug for ReconcileError<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRoot { root } => write!(f, "InvalidRoot {{ root: {root:?} }}"),
        }
    }
}

impl<N: fmt::Debug> fmt::Display for ReconcileError<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRoot { root } => {
                write!(f, "reconcile root {root:?} is not a live node")
            }
        }
    }
}

impl<N: fmt::Debug> core::error::Error for ReconcileError<N> {}
