// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigator errors.
//!
//! Every variant is a configuration or request bug that cannot be repaired
//! locally. The navigator reports it and does not signal traversal
//! completion. Declined transitions, placeholder keys, and repeated replace
//! requests are ordinary control flow and never produce an error.

use core::fmt;

/// Errors from [`Navigator`](crate::navigator::Navigator) traversals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigatorError {
    /// The factory produced an element without a
    /// [`StableId`](crate::element::StableId), so its transient state could
    /// never be persisted.
    MissingIdentity {
        /// Type name of the offending element.
        element: &'static str,
    },
    /// No element could be produced for the composite key's foreground.
    UnresolvedForeground,
    /// No element could be produced for the composite key's background.
    UnresolvedBackground,
}

impl fmt::Display for NavigatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingIdentity { element } => {
                write!(f, "{element} needs a stable ID for persisting its state")
            }
            Self::UnresolvedForeground => f.write_str("foreground screen could not be created"),
            Self::UnresolvedBackground => f.write_str("background screen could not be created"),
        }
    }
}

impl core::error::Error for NavigatorError {}
