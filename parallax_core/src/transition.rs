// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The transition pipeline.
//!
//! A [`ScreenTransition`] animates the swap between an outgoing and an
//! incoming element, or declines. The [`TransitionPipeline`] offers each
//! transition to its handlers in registration order and stops at the first
//! that reports [`TransitionResult::Handled`]. A [`BasicTransition`] always
//! sits at the end and handles everything, so dispatch cannot fall off the
//! end of the pipeline.
//!
//! # Completion
//!
//! The handler that accepts a transition takes ownership of its
//! [`OnComplete`] and must run it exactly once, when its animation ends (or
//! immediately, if it does not animate). A handler that declines hands the
//! continuation back inside [`TransitionResult::Declined`].

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use crate::animation::OnComplete;
use crate::config::NavigatorConfig;
use crate::host::HostContainer;
use crate::store::ElementId;

/// The element pair a transition animates between.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition<K> {
    /// The element being left.
    pub from: ElementId,
    /// Its destination key.
    pub from_key: K,
    /// The element being shown.
    pub to: ElementId,
    /// Its destination key.
    pub to_key: K,
    /// Background of the incoming composite key, if any.
    pub new_background: Option<ElementId>,
    /// `true` for forward and replace traversals.
    pub going_forward: bool,
}

/// Result of offering a transition to a handler.
#[derive(Debug)]
pub enum TransitionResult {
    /// The handler owns the continuation and will run it.
    Handled,
    /// The handler passes; the continuation is returned untouched.
    Declined(OnComplete),
}

/// A pluggable transition strategy.
pub trait ScreenTransition<K> {
    /// Positions `background` before a backward transition reveals it.
    ///
    /// Called on every handler, because the handler that pairs a foreground
    /// with its background may not be the one running the transition.
    fn prepare_background(
        &mut self,
        host: &HostContainer<K>,
        background: ElementId,
        foreground: ElementId,
        foreground_key: &K,
    ) {
        _ = (host, background, foreground, foreground_key);
    }

    /// Runs or declines `transition`.
    fn transition(
        &mut self,
        host: &HostContainer<K>,
        transition: &Transition<K>,
        on_complete: OnComplete,
    ) -> TransitionResult;

    /// Short name for diagnostics.
    fn name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Which handler ran a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandledBy {
    /// The registered handler at this index.
    Handler(usize),
    /// The built-in [`BasicTransition`].
    Fallback,
}

/// Ordered handlers followed by a [`BasicTransition`].
pub struct TransitionPipeline<K> {
    handlers: Vec<Box<dyn ScreenTransition<K>>>,
    fallback: BasicTransition,
}

impl<K> fmt::Debug for TransitionPipeline<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&'static str> = self.handlers.iter().map(|h| h.name()).collect();
        f.debug_struct("TransitionPipeline")
            .field("handlers", &names)
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl<K: Clone + Eq + Hash> TransitionPipeline<K> {
    /// Creates a pipeline; `BasicTransition` is appended after `handlers`.
    #[must_use]
    pub fn new(handlers: Vec<Box<dyn ScreenTransition<K>>>, config: NavigatorConfig) -> Self {
        Self {
            handlers,
            fallback: BasicTransition::new(config),
        }
    }

    /// Number of handlers, including the fallback.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len() + 1
    }

    /// Always `false`: the fallback is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Calls [`prepare_background`](ScreenTransition::prepare_background) on
    /// every handler, fallback included.
    pub fn prepare_background(
        &mut self,
        host: &HostContainer<K>,
        background: ElementId,
        foreground: ElementId,
        foreground_key: &K,
    ) {
        for handler in &mut self.handlers {
            handler.prepare_background(host, background, foreground, foreground_key);
        }
        self.fallback
            .prepare_background(host, background, foreground, foreground_key);
    }

    /// Offers `transition` to each handler until one accepts.
    pub fn dispatch(
        &mut self,
        host: &HostContainer<K>,
        transition: &Transition<K>,
        on_complete: OnComplete,
    ) -> HandledBy {
        let mut on_complete = on_complete;
        for (index, handler) in self.handlers.iter_mut().enumerate() {
            match handler.transition(host, transition, on_complete) {
                TransitionResult::Handled => return HandledBy::Handler(index),
                TransitionResult::Declined(returned) => on_complete = returned,
            }
        }
        self.fallback.run(host, transition, on_complete);
        HandledBy::Fallback
    }
}

/// The always-matching last handler.
///
/// Going forward into an [`ExpandablePage`](crate::element::ExpandablePage),
/// the page expands out of the configured anchor strip. Going backward out of
/// one, it collapses into the strip. The continuation runs when that
/// animation finishes. Any other pair swaps instantly and the continuation
/// runs immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicTransition {
    config: NavigatorConfig,
}

impl BasicTransition {
    /// Creates the transition with the given anchor geometry.
    #[must_use]
    pub const fn new(config: NavigatorConfig) -> Self {
        Self { config }
    }

    fn run<K: Clone + Eq + Hash>(
        &self,
        host: &HostContainer<K>,
        transition: &Transition<K>,
        on_complete: OnComplete,
    ) {
        let animation = {
            let mut store = host.borrow_mut();
            let width = store.get(transition.to).map_or(0.0, |to| to.size().width);
            let anchor = self.config.anchor(width);
            let page = if transition.going_forward {
                transition.to
            } else {
                transition.from
            };
            store
                .get_mut(page)
                .and_then(|element| element.as_expandable())
                .map(|page| {
                    if transition.going_forward {
                        page.expand_from(anchor)
                    } else {
                        page.collapse_to(anchor)
                    }
                })
        };
        // A page may have finished an earlier animation above.
        host.flush();
        match animation {
            Some(animation) => animation.on_finish(on_complete),
            None => on_complete.call(),
        }
    }
}

impl<K: Clone + Eq + Hash> ScreenTransition<K> for BasicTransition {
    fn transition(
        &mut self,
        host: &HostContainer<K>,
        transition: &Transition<K>,
        on_complete: OnComplete,
    ) -> TransitionResult {
        self.run(host, transition, on_complete);
        TransitionResult::Handled
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::Cell;

    use kurbo::Rect;

    use super::*;
    use crate::testing::{Everywhere, FakeFactory, Journal, Scripted, SharedLog};

    fn counter() -> (Rc<Cell<u32>>, OnComplete) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, OnComplete::new(move || c.set(c.get() + 1)))
    }

    fn pair(
        host: &HostContainer<&'static str>,
        factory: &mut FakeFactory,
        going_forward: bool,
    ) -> Transition<&'static str> {
        let mut store = host.borrow_mut();
        let a = store.resolve(&"A", &Everywhere, &mut *factory).unwrap().unwrap().id;
        let b = store.resolve(&"B", &Everywhere, &mut *factory).unwrap().unwrap().id;
        if going_forward {
            Transition {
                from: a,
                from_key: "A",
                to: b,
                to_key: "B",
                new_background: None,
                going_forward,
            }
        } else {
            Transition {
                from: b,
                from_key: "B",
                to: a,
                to_key: "A",
                new_background: None,
                going_forward,
            }
        }
    }

    #[test]
    fn first_accepting_handler_wins() {
        let log = SharedLog::default();
        let host = HostContainer::new();
        let mut factory = FakeFactory::new(Journal::shared());
        let transition = pair(&host, &mut factory, true);
        let mut pipeline = TransitionPipeline::new(
            vec![
                Box::new(Scripted::declining("first", log.clone())) as Box<dyn ScreenTransition<_>>,
                Box::new(Scripted::completing("second", log.clone())),
                Box::new(Scripted::completing("third", log.clone())),
            ],
            NavigatorConfig::compact(),
        );

        let (count, on_complete) = counter();
        let handled_by = pipeline.dispatch(&host, &transition, on_complete);

        assert_eq!(handled_by, HandledBy::Handler(1));
        assert_eq!(log.entries(), vec!["first:declined", "second:handled"]);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn fallback_catches_everything_declined() {
        let log = SharedLog::default();
        let host = HostContainer::new();
        let mut factory = FakeFactory::new(Journal::shared());
        let transition = pair(&host, &mut factory, true);
        let mut pipeline = TransitionPipeline::new(
            vec![Box::new(Scripted::declining("first", log.clone())) as Box<dyn ScreenTransition<_>>],
            NavigatorConfig::compact(),
        );

        let (count, on_complete) = counter();
        assert_eq!(
            pipeline.dispatch(&host, &transition, on_complete),
            HandledBy::Fallback
        );
        assert_eq!(count.get(), 1, "non-expandable swap completes immediately");
        assert_eq!(pipeline.len(), 2);
    }

    #[test]
    fn prepare_background_reaches_every_handler() {
        let log = SharedLog::default();
        let host = HostContainer::new();
        let mut factory = FakeFactory::new(Journal::shared());
        let transition = pair(&host, &mut factory, false);
        let mut pipeline = TransitionPipeline::new(
            vec![
                Box::new(Scripted::declining("first", log.clone())) as Box<dyn ScreenTransition<_>>,
                Box::new(Scripted::completing("second", log.clone())),
            ],
            NavigatorConfig::compact(),
        );

        pipeline.prepare_background(&host, transition.to, transition.from, &"B");
        assert_eq!(log.entries(), vec!["first:prepare", "second:prepare"]);
    }

    #[test]
    fn expandable_page_expands_forward() {
        let journal = Journal::shared();
        let host = HostContainer::new();
        let mut factory = FakeFactory::new(journal.clone())
            .expandable("B")
            .sized("B", 360.0, 640.0);
        let transition = pair(&host, &mut factory, true);
        let mut basic = BasicTransition::new(NavigatorConfig::compact());

        let (count, on_complete) = counter();
        let result = basic.transition(&host, &transition, on_complete);
        assert!(matches!(result, TransitionResult::Handled));
        assert_eq!(count.get(), 0, "waits for the expand animation");

        let (key, anchor, animation) = journal.borrow().animations[0].clone();
        assert_eq!(key, "B:expand");
        assert_eq!(anchor, Rect::new(0.0, 56.0, 360.0, 56.0));

        animation.finish();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn expandable_page_collapses_backward() {
        let journal = Journal::shared();
        let host = HostContainer::new();
        let mut factory = FakeFactory::new(journal.clone())
            .expandable("B")
            .sized("A", 400.0, 800.0);
        let transition = pair(&host, &mut factory, false);
        let mut basic = BasicTransition::new(NavigatorConfig::compact().with_scale_factor(2.0));

        let (count, on_complete) = counter();
        let _ = basic.transition(&host, &transition, on_complete);

        let (key, anchor, animation) = journal.borrow().animations[0].clone();
        assert_eq!(key, "B:collapse");
        assert_eq!(anchor, Rect::new(0.0, 112.0, 400.0, 112.0), "uses the incoming width");
        assert_eq!(count.get(), 0);
        animation.finish();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn backward_into_expandable_does_not_animate() {
        let journal = Journal::shared();
        let host = HostContainer::new();
        let mut factory = FakeFactory::new(journal.clone()).expandable("A");
        let transition = pair(&host, &mut factory, false);
        let mut basic = BasicTransition::default();

        let (count, on_complete) = counter();
        let _ = basic.transition(&host, &transition, on_complete);
        assert!(journal.borrow().animations.is_empty());
        assert_eq!(count.get(), 1);
    }
}
