// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigator configuration.

use kurbo::Rect;

/// Geometry used by the built-in transition.
///
/// Expandable pages open out of, and close back into, a zero-height strip
/// spanning the incoming page's width at `anchor_inset` logical pixels from
/// the top (just below a toolbar).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavigatorConfig {
    /// Distance of the anchor strip from the top, in logical pixels.
    pub anchor_inset: f64,
    /// Physical pixels per logical pixel.
    pub scale_factor: f64,
}

impl NavigatorConfig {
    /// Toolbar height shared by both presets.
    pub const TOOLBAR_HEIGHT: f64 = 56.0;

    /// Default configuration for phone-sized layouts.
    #[must_use]
    pub const fn compact() -> Self {
        Self {
            anchor_inset: Self::TOOLBAR_HEIGHT,
            scale_factor: 1.0,
        }
    }

    /// Default configuration for tablet and desktop layouts.
    #[must_use]
    pub const fn expanded() -> Self {
        Self {
            anchor_inset: Self::TOOLBAR_HEIGHT,
            scale_factor: 2.0,
        }
    }

    /// Returns a copy with a different scale factor.
    #[must_use]
    pub const fn with_scale_factor(self, scale_factor: f64) -> Self {
        Self {
            scale_factor,
            ..self
        }
    }

    /// The anchor strip for a page `width` physical pixels wide.
    #[must_use]
    pub fn anchor(&self, width: f64) -> Rect {
        let y = self.anchor_inset * self.scale_factor;
        Rect::new(0.0, y, width, y)
    }
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self::compact()
    }
}
