// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for traversals.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! navigator calls at each step of a traversal. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! Events carry [`ElementId`]s rather than destination keys so that sinks do
//! not depend on the key type.

use crate::navigator::Direction;
use crate::store::ElementId;
use crate::transition::HandledBy;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Why a traversal ended without touching any element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShortCircuit {
    /// The host re-delivered the previous key as a replace with no outgoing
    /// state (e.g. on resume).
    DuplicateReplace,
    /// The incoming key was a placeholder.
    Placeholder,
}

/// Which slot of a composite key an element fills.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The background destination.
    Background,
    /// The foreground destination.
    Foreground,
}

/// When leftover elements are removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RemovalPolicy {
    /// Before the transition starts (forward and replace).
    Immediate,
    /// When the transition's animation completes (backward).
    Deferred,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a traversal starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraversalBeginEvent {
    /// Monotonic traversal counter.
    pub traversal: u64,
    /// Direction requested by the host.
    pub direction: Direction,
    /// Whether the host supplied an outgoing state.
    pub has_outgoing: bool,
}

/// Emitted when a traversal ends early.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShortCircuitEvent {
    /// Traversal counter.
    pub traversal: u64,
    /// Why nothing was done.
    pub reason: ShortCircuit,
}

/// Emitted when the pool creates an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementCreatedEvent {
    /// Traversal counter.
    pub traversal: u64,
    /// Handle of the new element.
    pub element: ElementId,
    /// Slot it was created for.
    pub slot: Slot,
}

/// Emitted after leftovers are computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeftoversEvent {
    /// Traversal counter.
    pub traversal: u64,
    /// Number of leftover elements.
    pub count: u32,
    /// When they are removed.
    pub policy: RemovalPolicy,
}

/// Emitted after focus observers were notified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FocusBroadcastEvent {
    /// Traversal counter.
    pub traversal: u64,
    /// Topmost element at the time of the broadcast.
    pub top: Option<ElementId>,
    /// Number of observers notified.
    pub observers: u32,
}

/// Emitted after the transition pipeline ran (or was skipped).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionDispatchEvent {
    /// Traversal counter.
    pub traversal: u64,
    /// Outgoing element, or `None` for the very first screen.
    pub from: Option<ElementId>,
    /// Incoming element.
    pub to: Option<ElementId>,
    /// Handler that accepted, or `None` if the pipeline was skipped.
    pub handled_by: Option<HandledBy>,
    /// Whether `prepare_background` was broadcast to every handler.
    pub prepared_background: bool,
}

/// Emitted when completion is signalled to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraversalEndEvent {
    /// Traversal counter.
    pub traversal: u64,
    /// Number of attached elements at completion.
    pub attached: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the navigator.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a traversal starts.
    fn on_traversal_begin(&mut self, e: &TraversalBeginEvent) {
        _ = e;
    }

    /// Called when a traversal ends without touching elements.
    fn on_short_circuit(&mut self, e: &ShortCircuitEvent) {
        _ = e;
    }

    /// Called when an element is created.
    fn on_element_created(&mut self, e: &ElementCreatedEvent) {
        _ = e;
    }

    /// Called once leftovers are known.
    fn on_leftovers(&mut self, e: &LeftoversEvent) {
        _ = e;
    }

    /// Called after a focus broadcast.
    fn on_focus_broadcast(&mut self, e: &FocusBroadcastEvent) {
        _ = e;
    }

    /// Called after the transition pipeline ran.
    fn on_transition_dispatch(&mut self, e: &TransitionDispatchEvent) {
        _ = e;
    }

    /// Called when completion is signalled.
    fn on_traversal_end(&mut self, e: &TraversalEndEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

/// Generates a `Tracer` method forwarding one event to the sink.
macro_rules! forward {
    ($(#[$doc:meta])* $name:ident => $sink_method:ident($event:ty)) => {
        $(#[$doc])*
        #[inline]
        pub fn $name(&mut self, e: &$event) {
            #[cfg(feature = "trace")]
            if let Some(s) = &mut self.sink {
                s.$sink_method(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    forward!(
        /// Emits a [`TraversalBeginEvent`].
        traversal_begin => on_traversal_begin(TraversalBeginEvent)
    );
    forward!(
        /// Emits a [`ShortCircuitEvent`].
        short_circuit => on_short_circuit(ShortCircuitEvent)
    );
    forward!(
        /// Emits an [`ElementCreatedEvent`].
        element_created => on_element_created(ElementCreatedEvent)
    );
    forward!(
        /// Emits a [`LeftoversEvent`].
        leftovers => on_leftovers(LeftoversEvent)
    );
    forward!(
        /// Emits a [`FocusBroadcastEvent`].
        focus_broadcast => on_focus_broadcast(FocusBroadcastEvent)
    );
    forward!(
        /// Emits a [`TransitionDispatchEvent`].
        transition_dispatch => on_transition_dispatch(TransitionDispatchEvent)
    );
    forward!(
        /// Emits a [`TraversalEndEvent`].
        traversal_end => on_traversal_end(TraversalEndEvent)
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
