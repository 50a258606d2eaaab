// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Materialized screen elements.
//!
//! An element is the live visual object bound to one destination key. The
//! hosting UI layer implements [`Element`] for its screen types and produces
//! them through an [`ElementFactory`], one implementation per form factor.
//!
//! # Capabilities
//!
//! The navigator never downcasts. Optional behaviour is discovered through
//! accessor methods that return `None` by default:
//!
//! - [`as_focus_observer`](Element::as_focus_observer): wants to know which
//!   screen is on top.
//! - [`as_back_press_interceptor`](Element::as_back_press_interceptor): may
//!   veto back navigation. An element may return one of its descendants.
//! - [`as_expandable`](Element::as_expandable): can expand from and collapse
//!   to an anchor rectangle (used by
//!   [`BasicTransition`](crate::transition::BasicTransition)).

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Rect, Size};

use crate::animation::PageAnimation;
use crate::back_press::BackPressInterceptor;
use crate::focus::FocusObserver;

/// Stable identity token of an element.
///
/// Transient state is only reapplied to an element carrying the same token it
/// was captured from, so every element must have one.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StableId(pub u32);

impl fmt::Debug for StableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StableId({})", self.0)
    }
}

/// Opaque per-element state preserved across removal and recreation.
///
/// Typical contents are scroll positions or unsaved text, encoded however the
/// element likes.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct TransientState(pub Vec<u8>);

impl TransientState {
    /// Returns `true` if no state was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for TransientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransientState({} bytes)", self.0.len())
    }
}

/// A materialized screen.
pub trait Element<K> {
    /// The destination key this element was created for.
    fn key(&self) -> &K;

    /// The element's stable identity, or `None` if the factory forgot to
    /// assign one.
    fn stable_id(&self) -> Option<StableId>;

    /// Laid-out size, used to build transition anchors.
    fn size(&self) -> Size {
        Size::ZERO
    }

    /// Captures transient state before the element is discarded.
    fn save_state(&self) -> TransientState {
        TransientState::default()
    }

    /// Reapplies state captured from a previous element with the same key.
    fn restore_state(&mut self, state: &TransientState) {
        _ = state;
    }

    /// Focus-change capability.
    fn as_focus_observer(&mut self) -> Option<&mut dyn FocusObserver<K>> {
        None
    }

    /// Back-press capability.
    fn as_back_press_interceptor(&mut self) -> Option<&mut dyn BackPressInterceptor> {
        None
    }

    /// Expand/collapse capability.
    fn as_expandable(&mut self) -> Option<&mut dyn ExpandablePage> {
        None
    }

    /// Short type name for diagnostics.
    fn type_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// A page that can expand out of, and collapse back into, an anchor strip.
pub trait ExpandablePage {
    /// Starts expanding from `anchor`.
    fn expand_from(&mut self, anchor: Rect) -> PageAnimation;

    /// Starts collapsing into `anchor`.
    fn collapse_to(&mut self, anchor: Rect) -> PageAnimation;
}

/// Creates elements for destination keys.
///
/// `C` is the rendering context the host supplies per key (a theme, a
/// window-scoped service bundle, ...).
pub trait ElementFactory<K, C> {
    /// Creates the element for `key`, or `None` if the key is unknown.
    fn create(&mut self, key: &K, context: &C) -> Option<Box<dyn Element<K>>>;
}

impl<K, C, F> ElementFactory<K, C> for F
where
    F: FnMut(&K, &C) -> Option<Box<dyn Element<K>>>,
{
    fn create(&mut self, key: &K, context: &C) -> Option<Box<dyn Element<K>>> {
        self(key, context)
    }
}
