// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus broadcasting.
//!
//! Screens stacked beneath the foreground stay attached, so they need to know
//! when they are (or stop being) the screen on top, e.g. to pause a cursor
//! blink or hide a keyboard.

use alloc::vec::Vec;
use core::hash::Hash;

use crate::store::{ElementId, ElementStore};

/// The element on top of the paint order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusedScreen<K> {
    /// Handle of the topmost element.
    pub id: ElementId,
    /// Its destination key.
    pub key: K,
}

/// Capability of elements that track which screen is on top.
pub trait FocusObserver<K> {
    /// Called with the topmost element, or `None` if the stack is empty.
    fn on_screen_focus_changed(&mut self, focused: Option<&FocusedScreen<K>>);
}

/// Notifies every attached [`FocusObserver`] of the current topmost element.
///
/// Observers are visited bottom to top. Returns the number notified.
pub fn broadcast<K: Clone + Eq + Hash>(store: &mut ElementStore<K>) -> usize {
    let focused = store.top().and_then(|id| {
        let key = store.key(id)?.clone();
        Some(FocusedScreen { id, key })
    });

    let ids: Vec<ElementId> = store.attached().collect();
    let mut notified = 0;
    for id in ids {
        let Some(observer) = store.get_mut(id).and_then(|e| e.as_focus_observer()) else {
            continue;
        };
        observer.on_screen_focus_changed(focused.as_ref());
        notified += 1;
    }
    notified
}
