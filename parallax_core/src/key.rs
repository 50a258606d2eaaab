// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Destination keys.
//!
//! A *destination key* is any value type `K` that identifies a screen. The
//! crate never inspects it beyond equality and hashing. The host backstack
//! delivers [`ScreenKey`]s: either a [`CompositeKey`] that the navigator
//! materializes, or a placeholder that is discarded.

use core::fmt;

/// A key delivered by the host backstack.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum ScreenKey<K> {
    /// A navigable screen, optionally stacked over a background screen.
    Composite(CompositeKey<K>),
    /// A key that never materializes an element.
    Placeholder,
}

impl<K> ScreenKey<K> {
    /// Shorthand for a composite key with no background.
    #[must_use]
    pub fn screen(foreground: K) -> Self {
        Self::Composite(CompositeKey::new(foreground))
    }

    /// Shorthand for a composite key with a background.
    #[must_use]
    pub fn stacked(background: K, foreground: K) -> Self {
        Self::Composite(CompositeKey::with_background(background, foreground))
    }

    /// Returns the composite key, if this is not a placeholder.
    #[must_use]
    pub fn as_composite(&self) -> Option<&CompositeKey<K>> {
        match self {
            Self::Composite(key) => Some(key),
            Self::Placeholder => None,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for ScreenKey<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Composite(key) => key.fmt(f),
            Self::Placeholder => f.write_str("Placeholder"),
        }
    }
}

/// A foreground destination, optionally revealed over a background one.
///
/// The foreground is the interactive screen. The background is shown when
/// the foreground is pulled away (e.g. a note editor over the note list).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CompositeKey<K> {
    /// Shown beneath the foreground, if any.
    pub background: Option<K>,
    /// The interactive screen.
    pub foreground: K,
}

impl<K> CompositeKey<K> {
    /// Creates a composite key without a background.
    #[must_use]
    pub const fn new(foreground: K) -> Self {
        Self {
            background: None,
            foreground,
        }
    }

    /// Creates a composite key with a background.
    #[must_use]
    pub const fn with_background(background: K, foreground: K) -> Self {
        Self {
            background: Some(background),
            foreground,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for CompositeKey<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.background {
            Some(background) => write!(f, "{background:?} < {:?}", self.foreground),
            None => write!(f, "{:?}", self.foreground),
        }
    }
}
