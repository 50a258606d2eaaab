// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Back-press interception.

use core::hash::Hash;

use crate::store::ElementStore;

/// Whether a back press was consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InterceptResult {
    /// The screen handled it; the host must not pop its backstack.
    Intercepted,
    /// Default back handling proceeds.
    Ignored,
}

/// Capability of screens (or their descendants) that may veto going back,
/// e.g. to close a search field first.
pub trait BackPressInterceptor {
    /// Called before the host pops its backstack.
    fn on_intercept_back_press(&mut self) -> InterceptResult;
}

/// Offers a back press to the topmost element.
///
/// Only the topmost element is asked. Returns [`InterceptResult::Ignored`]
/// when it has no interceptor or nothing is attached.
pub fn intercept<K: Clone + Eq + Hash>(store: &mut ElementStore<K>) -> InterceptResult {
    store
        .top()
        .and_then(|top| store.get_mut(top))
        .and_then(|element| element.as_back_press_interceptor())
        .map_or(InterceptResult::Ignored, |interceptor| {
            interceptor.on_intercept_back_press()
        })
}
