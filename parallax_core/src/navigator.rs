// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The key changer.
//!
//! [`Navigator`] turns each backstack change into element-stack operations.
//! Screens stay stacked so that adjacent screens can interact visually: for a
//! composite key, pulling the foreground away reveals the background.
//!
//! # Traversal
//!
//! 1. A replace with no outgoing state that repeats the previous key is
//!    ignored (hosts re-deliver their current key on resume).
//! 2. Placeholder keys are discarded.
//! 3. Background and foreground elements are resolved through the
//!    [`ElementStore`](crate::store::ElementStore).
//! 4. The new foreground goes on top. Going backward, the previous top is
//!    put back above it so it stays visible while it animates out.
//! 5. Focus observers are told which element is on top.
//! 6. Every other attached element is a leftover. Going forward or
//!    replacing, leftovers are removed right away; going backward, their
//!    removal waits for the transition's [`OnComplete`].
//! 7. The transition pipeline animates between the two topmost elements.
//! 8. Completion is signalled to the host. It does not wait for the
//!    animation; only leftover removal does.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use crate::animation::OnComplete;
use crate::back_press::{self, InterceptResult};
use crate::config::NavigatorConfig;
use crate::element::ElementFactory;
use crate::error::NavigatorError;
use crate::focus;
use crate::host::HostContainer;
use crate::key::ScreenKey;
use crate::store::{Contexts, ElementId, ElementStore};
use crate::trace::{
    ElementCreatedEvent, FocusBroadcastEvent, LeftoversEvent, RemovalPolicy, ShortCircuit,
    ShortCircuitEvent, Slot, TransitionDispatchEvent, TraversalBeginEvent, TraversalEndEvent,
    Tracer,
};
use crate::transition::{HandledBy, ScreenTransition, Transition, TransitionPipeline};

/// Direction of a backstack change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// A screen was pushed.
    Forward,
    /// A screen was popped.
    Backward,
    /// The top screen was swapped out.
    Replace,
}

impl Direction {
    /// `true` for forward and replace.
    #[must_use]
    pub const fn is_forward(self) -> bool {
        !matches!(self, Self::Backward)
    }
}

/// Where the navigator is within a traversal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NavigatorPhase {
    /// No traversal in progress.
    #[default]
    Idle,
    /// Determining incoming and outgoing elements.
    Resolving,
    /// The transition pipeline is running.
    Transitioning,
}

/// A backstack change delivered by the host.
pub struct TraversalRequest<'a, K, C> {
    /// Key of the state being left, if any.
    pub outgoing: Option<ScreenKey<K>>,
    /// Key of the state being entered.
    pub incoming: ScreenKey<K>,
    /// Direction of the change.
    pub direction: Direction,
    /// Rendering contexts for the incoming keys.
    pub contexts: &'a dyn Contexts<K, C>,
}

impl<K: fmt::Debug, C> fmt::Debug for TraversalRequest<'_, K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraversalRequest")
            .field("outgoing", &self.outgoing)
            .field("incoming", &self.incoming)
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

/// What a successful traversal did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraversalOutcome {
    /// Nothing was touched.
    Skipped(ShortCircuit),
    /// Elements were resolved and the pipeline ran, unless there was no
    /// outgoing element to animate from (`handled_by` is `None`).
    Transitioned {
        /// Handler that ran the transition.
        handled_by: Option<HandledBy>,
    },
}

/// Inflates screen elements in response to backstack changes.
pub struct Navigator<K, C> {
    host: HostContainer<K>,
    factory: Box<dyn ElementFactory<K, C>>,
    pipeline: TransitionPipeline<K>,
    previous_key: Option<ScreenKey<K>>,
    phase: NavigatorPhase,
    traversals: u64,
}

impl<K: fmt::Debug, C> fmt::Debug for Navigator<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("host", &self.host)
            .field("pipeline", &self.pipeline)
            .field("previous_key", &self.previous_key)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl<K, C> Navigator<K, C>
where
    K: Clone + Eq + Hash + 'static,
{
    /// Creates a navigator over `host`.
    ///
    /// `transitions` are tried in order; a
    /// [`BasicTransition`](crate::transition::BasicTransition) is appended.
    pub fn new(
        host: HostContainer<K>,
        factory: impl ElementFactory<K, C> + 'static,
        transitions: Vec<Box<dyn ScreenTransition<K>>>,
        config: NavigatorConfig,
    ) -> Self {
        Self {
            host,
            factory: Box::new(factory),
            pipeline: TransitionPipeline::new(transitions, config),
            previous_key: None,
            phase: NavigatorPhase::Idle,
            traversals: 0,
        }
    }

    /// The element stack this navigator drives.
    #[must_use]
    pub fn host(&self) -> &HostContainer<K> {
        &self.host
    }

    /// Current traversal phase.
    #[must_use]
    pub fn phase(&self) -> NavigatorPhase {
        self.phase
    }

    /// The last key a traversal was requested for.
    #[must_use]
    pub fn previous_key(&self) -> Option<&ScreenKey<K>> {
        self.previous_key.as_ref()
    }

    /// Handles a backstack change and then calls `on_completed`.
    ///
    /// # Errors
    ///
    /// See [`change_key_traced`](Self::change_key_traced).
    pub fn change_key(
        &mut self,
        request: TraversalRequest<'_, K, C>,
        on_completed: impl FnOnce(),
    ) -> Result<TraversalOutcome, NavigatorError> {
        self.change_key_traced(request, on_completed, &mut Tracer::none())
    }

    /// Handles a backstack change, reporting each step to `tracer`.
    ///
    /// `on_completed` runs exactly once on success, before this returns and
    /// regardless of whether a transition animation is still running.
    ///
    /// # Errors
    ///
    /// - [`NavigatorError::MissingIdentity`] if a new element has no stable
    ///   identity.
    /// - [`NavigatorError::UnresolvedForeground`] or
    ///   [`NavigatorError::UnresolvedBackground`] if an element could not be
    ///   created.
    ///
    /// `on_completed` is not called on error.
    pub fn change_key_traced(
        &mut self,
        request: TraversalRequest<'_, K, C>,
        on_completed: impl FnOnce(),
        tracer: &mut Tracer<'_>,
    ) -> Result<TraversalOutcome, NavigatorError> {
        self.traversals += 1;
        let traversal = self.traversals;
        tracer.traversal_begin(&TraversalBeginEvent {
            traversal,
            direction: request.direction,
            has_outgoing: request.outgoing.is_some(),
        });

        let result = self.traverse(traversal, &request, tracer);
        self.phase = NavigatorPhase::Idle;
        self.host.flush();
        let outcome = result?;

        on_completed();
        tracer.traversal_end(&TraversalEndEvent {
            traversal,
            attached: count(self.host.borrow().len()),
        });
        Ok(outcome)
    }

    /// Offers a back press to the topmost screen.
    #[must_use]
    pub fn on_intercept_back_press(&self) -> InterceptResult {
        let result = back_press::intercept(&mut self.host.borrow_mut());
        self.host.flush();
        result
    }

    fn traverse(
        &mut self,
        traversal: u64,
        request: &TraversalRequest<'_, K, C>,
        tracer: &mut Tracer<'_>,
    ) -> Result<TraversalOutcome, NavigatorError> {
        if request.outgoing.is_none()
            && request.direction == Direction::Replace
            && self.previous_key.as_ref() == Some(&request.incoming)
        {
            return Ok(skip(traversal, ShortCircuit::DuplicateReplace, tracer));
        }

        let Some(key) = request.incoming.as_composite() else {
            self.previous_key = Some(request.incoming.clone());
            return Ok(skip(traversal, ShortCircuit::Placeholder, tracer));
        };

        self.phase = NavigatorPhase::Resolving;
        let (new_background, new_foreground) = {
            let mut store = self.host.borrow_mut();
            let old_foreground = store.top();

            let background = match &key.background {
                Some(background) => Some(
                    store
                        .resolve(background, request.contexts, &mut *self.factory)?
                        .ok_or(NavigatorError::UnresolvedBackground)?,
                ),
                None => None,
            };
            let foreground = match store
                .resolve(&key.foreground, request.contexts, &mut *self.factory)
                .and_then(|resolved| resolved.ok_or(NavigatorError::UnresolvedForeground))
            {
                Ok(foreground) => foreground,
                Err(err) => {
                    // Leave the stack as it was before this traversal.
                    if let Some(background) = background.filter(|b| b.created) {
                        store.capture_and_remove(background.id);
                    }
                    return Err(err);
                }
            };
            for (resolved, slot) in [
                (background, Slot::Background),
                (Some(foreground), Slot::Foreground),
            ] {
                if let Some(resolved) = resolved.filter(|r| r.created) {
                    tracer.element_created(&ElementCreatedEvent {
                        traversal,
                        element: resolved.id,
                        slot,
                    });
                }
            }
            let new_background = background.map(|b| b.id);
            let new_foreground = foreground.id;

            // The incoming or outgoing element must be drawn last.
            store.bring_to_front(new_foreground);
            if request.direction == Direction::Backward
                && let Some(old_foreground) = old_foreground
            {
                store.bring_to_front(old_foreground);
            }
            store.set_retained(new_background, new_foreground);
            (new_background, new_foreground)
        };
        self.previous_key = Some(request.incoming.clone());
        self.broadcast_focus(traversal, tracer);

        let leftovers: Vec<ElementId> = self
            .host
            .borrow()
            .attached()
            .filter(|&id| id != new_foreground && Some(id) != new_background)
            .collect();
        let policy = if request.direction.is_forward() {
            RemovalPolicy::Immediate
        } else {
            RemovalPolicy::Deferred
        };
        tracer.leftovers(&LeftoversEvent {
            traversal,
            count: count(leftovers.len()),
            policy,
        });

        // Going forward, the discarded background plays no part in the
        // animation. Going backward, the outgoing foreground must stay
        // visible until the animation ends.
        let on_transition_end = match policy {
            RemovalPolicy::Immediate => {
                let observers = remove_leftovers(&mut self.host.borrow_mut(), &leftovers);
                self.host.flush();
                tracer.focus_broadcast(&self.focus_event(traversal, observers));
                OnComplete::noop()
            }
            RemovalPolicy::Deferred => {
                let host = self.host.clone();
                // The animation may end while an element callback holds
                // the store.
                OnComplete::new(move || {
                    host.update(move |store| {
                        remove_leftovers(store, &leftovers);
                    });
                })
            }
        };

        self.phase = NavigatorPhase::Transitioning;
        let transition = self.pending_transition(request.direction, new_background);
        let (from, to) = match &transition {
            Some(t) => (Some(t.from), Some(t.to)),
            None => (None, self.host.borrow().top()),
        };

        let mut prepared_background = false;
        let handled_by = match transition {
            Some(transition) => {
                if let Some(background) = new_background.filter(|_| !transition.going_forward) {
                    // The handler that pairs the foreground with its
                    // background may not be the one that runs the transition.
                    self.pipeline.prepare_background(
                        &self.host,
                        background,
                        transition.to,
                        &transition.to_key,
                    );
                    prepared_background = true;
                }
                Some(
                    self.pipeline
                        .dispatch(&self.host, &transition, on_transition_end),
                )
            }
            None => {
                on_transition_end.call();
                None
            }
        };
        tracer.transition_dispatch(&TransitionDispatchEvent {
            traversal,
            from,
            to,
            handled_by,
            prepared_background,
        });

        Ok(TraversalOutcome::Transitioned { handled_by })
    }

    /// Picks the element pair to animate between, if there are two.
    fn pending_transition(
        &self,
        direction: Direction,
        new_background: Option<ElementId>,
    ) -> Option<Transition<K>> {
        let store = self.host.borrow();
        let top = store.top();
        let second = store.second_from_top();
        let going_forward = direction.is_forward();
        let (from, to) = if going_forward {
            (second?, top?)
        } else {
            (top?, second?)
        };
        Some(Transition {
            from,
            from_key: store.key(from)?.clone(),
            to,
            to_key: store.key(to)?.clone(),
            new_background,
            going_forward,
        })
    }

    fn broadcast_focus(&self, traversal: u64, tracer: &mut Tracer<'_>) {
        let observers = focus::broadcast(&mut self.host.borrow_mut());
        self.host.flush();
        tracer.focus_broadcast(&self.focus_event(traversal, observers));
    }

    fn focus_event(&self, traversal: u64, observers: usize) -> FocusBroadcastEvent {
        FocusBroadcastEvent {
            traversal,
            top: self.host.borrow().top(),
            observers: count(observers),
        }
    }
}

/// Removes leftovers that the latest traversal did not reclaim, then tells
/// focus observers about the new top. Returns the number of observers.
fn remove_leftovers<K: Clone + Eq + Hash>(
    store: &mut ElementStore<K>,
    leftovers: &[ElementId],
) -> usize {
    for &id in leftovers {
        if !store.is_retained(id) {
            store.capture_and_remove(id);
        }
    }
    focus::broadcast(store)
}

fn skip(traversal: u64, reason: ShortCircuit, tracer: &mut Tracer<'_>) -> TraversalOutcome {
    tracer.short_circuit(&ShortCircuitEvent { traversal, reason });
    TraversalOutcome::Skipped(reason)
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
