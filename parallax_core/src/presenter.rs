// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contract for platform layers that mirror the element stack.
//!
//! The navigator mutates an [`ElementStore`]; a platform layer owns the
//! native view tree. After each traversal (and after each deferred removal)
//! the platform drains the store's [`StackChanges`] and applies them through
//! a [`Presenter`].
//!
//! ```rust,ignore
//! navigator.change_key(request, || backstack.traversal_completed())?;
//! let changes = host.borrow_mut().drain_changes();
//! presenter.apply(&host.borrow(), &changes);
//! ```

use alloc::vec::Vec;

use crate::store::ElementStore;

/// Changes to the element stack since the previous drain.
///
/// Indices are raw slot indices (see
/// [`ElementId::index`](crate::store::ElementId::index)). A slot may appear
/// in both `removed` and `added` if it was freed and reused between drains;
/// apply removals first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StackChanges {
    /// Slots whose element was attached, in attachment order.
    pub added: Vec<u32>,
    /// Slots whose element was detached, in removal order.
    pub removed: Vec<u32>,
    /// Full paint order, bottom to top, if it changed other than by
    /// appending new elements.
    pub order: Option<Vec<u32>>,
}

impl StackChanges {
    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.order.is_none()
    }

    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.added.clear();
        self.removed.clear();
        self.order = None;
    }
}

/// Applies stack changes to a platform-native view tree.
pub trait Presenter<K> {
    /// Applies `changes`, reading elements from `store` as needed.
    fn apply(&mut self, store: &ElementStore<K>, changes: &StackChanges);
}
