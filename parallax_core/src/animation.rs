// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animation completion plumbing.
//!
//! A transition may return before its visual effect completes. The work that
//! must wait for the animation (removing the outgoing screen on a backward
//! transition) travels as an [`OnComplete`] continuation. Because it is an
//! `FnOnce` consumed by [`OnComplete::call`], it runs at most once.
//!
//! Pages that animate themselves hand back a [`PageAnimation`]: a shared
//! handle the platform layer [finishes](PageAnimation::finish) when the
//! animation ends, and which runs every continuation registered on it.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

/// A continuation run once a transition's animation has finished.
#[must_use = "dropping an OnComplete skips the work it carries"]
pub struct OnComplete {
    action: Option<Box<dyn FnOnce()>>,
}

impl OnComplete {
    /// Wraps a closure.
    pub fn new(action: impl FnOnce() + 'static) -> Self {
        Self {
            action: Some(Box::new(action)),
        }
    }

    /// A continuation that does nothing.
    pub const fn noop() -> Self {
        Self { action: None }
    }

    /// Returns `true` if running this continuation has no effect.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.action.is_none()
    }

    /// Runs the continuation.
    pub fn call(self) {
        if let Some(action) = self.action {
            action();
        }
    }
}

impl Default for OnComplete {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for OnComplete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnComplete")
            .field("noop", &self.is_noop())
            .finish()
    }
}

/// Shared completion handle for a page's expand or collapse animation.
///
/// Clones refer to the same animation. Continuations registered after the
/// animation finished run immediately.
#[derive(Clone, Default)]
pub struct PageAnimation {
    inner: Rc<RefCell<AnimationState>>,
}

#[derive(Default)]
struct AnimationState {
    finished: bool,
    waiters: Vec<OnComplete>,
}

impl PageAnimation {
    /// Creates a running animation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an animation that has already finished.
    #[must_use]
    pub fn finished() -> Self {
        let animation = Self::new();
        animation.inner.borrow_mut().finished = true;
        animation
    }

    /// Returns whether [`finish`](Self::finish) has been called.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.inner.borrow().finished
    }

    /// Registers a continuation for the end of the animation.
    pub fn on_finish(&self, on_complete: OnComplete) {
        let mut state = self.inner.borrow_mut();
        if state.finished {
            drop(state);
            on_complete.call();
        } else {
            state.waiters.push(on_complete);
        }
    }

    /// Marks the animation as finished and runs the pending continuations.
    ///
    /// Calling this more than once is harmless.
    pub fn finish(&self) {
        let waiters = {
            let mut state = self.inner.borrow_mut();
            state.finished = true;
            core::mem::take(&mut state.waiters)
        };
        // The borrow is released so continuations may register or finish
        // other animations.
        for waiter in waiters {
            waiter.call();
        }
    }
}

impl fmt::Debug for PageAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("PageAnimation")
            .field("finished", &state.finished)
            .field("waiters", &state.waiters.len())
            .finish()
    }
}
