// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and keeps every event, in
//! arrival order, as a [`RecordedEvent`]. Events are small `Copy` structs, so
//! recording costs one push per event.

use parallax_core::trace::{
    ElementCreatedEvent, FocusBroadcastEvent, LeftoversEvent, ShortCircuitEvent, TraceSink,
    TransitionDispatchEvent, TraversalBeginEvent, TraversalEndEvent,
};

/// A recorded trace event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A [`TraversalBeginEvent`].
    TraversalBegin(TraversalBeginEvent),
    /// A [`ShortCircuitEvent`].
    ShortCircuit(ShortCircuitEvent),
    /// An [`ElementCreatedEvent`].
    ElementCreated(ElementCreatedEvent),
    /// A [`LeftoversEvent`].
    Leftovers(LeftoversEvent),
    /// A [`FocusBroadcastEvent`].
    FocusBroadcast(FocusBroadcastEvent),
    /// A [`TransitionDispatchEvent`].
    TransitionDispatch(TransitionDispatchEvent),
    /// A [`TraversalEndEvent`].
    TraversalEnd(TraversalEndEvent),
}

impl RecordedEvent {
    /// The traversal this event belongs to.
    #[must_use]
    pub fn traversal(&self) -> u64 {
        match self {
            Self::TraversalBegin(e) => e.traversal,
            Self::ShortCircuit(e) => e.traversal,
            Self::ElementCreated(e) => e.traversal,
            Self::Leftovers(e) => e.traversal,
            Self::FocusBroadcast(e) => e.traversal,
            Self::TransitionDispatch(e) => e.traversal,
            Self::TraversalEnd(e) => e.traversal,
        }
    }

    /// Short event name, as used in exports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::TraversalBegin(_) => "TraversalBegin",
            Self::ShortCircuit(_) => "ShortCircuit",
            Self::ElementCreated(_) => "ElementCreated",
            Self::Leftovers(_) => "Leftovers",
            Self::FocusBroadcast(_) => "FocusBroadcast",
            Self::TransitionDispatch(_) => "TransitionDispatch",
            Self::TraversalEnd(_) => "TraversalEnd",
        }
    }
}

/// A [`TraceSink`] that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Events belonging to one traversal.
    pub fn traversal(&self, traversal: u64) -> impl Iterator<Item = &RecordedEvent> + '_ {
        self.events
            .iter()
            .filter(move |e| e.traversal() == traversal)
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TraceSink for RecorderSink {
    fn on_traversal_begin(&mut self, e: &TraversalBeginEvent) {
        self.events.push(RecordedEvent::TraversalBegin(*e));
    }

    fn on_short_circuit(&mut self, e: &ShortCircuitEvent) {
        self.events.push(RecordedEvent::ShortCircuit(*e));
    }

    fn on_element_created(&mut self, e: &ElementCreatedEvent) {
        self.events.push(RecordedEvent::ElementCreated(*e));
    }

    fn on_leftovers(&mut self, e: &LeftoversEvent) {
        self.events.push(RecordedEvent::Leftovers(*e));
    }

    fn on_focus_broadcast(&mut self, e: &FocusBroadcastEvent) {
        self.events.push(RecordedEvent::FocusBroadcast(*e));
    }

    fn on_transition_dispatch(&mut self, e: &TransitionDispatchEvent) {
        self.events.push(RecordedEvent::TransitionDispatch(*e));
    }

    fn on_traversal_end(&mut self, e: &TraversalEndEvent) {
        self.events.push(RecordedEvent::TraversalEnd(*e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parallax_core::navigator::Direction;
    use parallax_core::trace::{RemovalPolicy, ShortCircuit};

    fn begin(traversal: u64) -> TraversalBeginEvent {
        TraversalBeginEvent {
            traversal,
            direction: Direction::Backward,
            has_outgoing: true,
        }
    }

    #[test]
    fn records_in_arrival_order() {
        let mut rec = RecorderSink::new();
        rec.on_traversal_begin(&begin(1));
        rec.on_leftovers(&LeftoversEvent {
            traversal: 1,
            count: 1,
            policy: RemovalPolicy::Deferred,
        });
        rec.on_traversal_end(&TraversalEndEvent {
            traversal: 1,
            attached: 2,
        });

        let names: Vec<_> = rec.events().iter().map(RecordedEvent::name).collect();
        assert_eq!(names, ["TraversalBegin", "Leftovers", "TraversalEnd"]);
        match &rec.events()[1] {
            RecordedEvent::Leftovers(e) => {
                assert_eq!(e.count, 1);
                assert_eq!(e.policy, RemovalPolicy::Deferred);
            }
            other => panic!("expected Leftovers, got {other:?}"),
        }
    }

    #[test]
    fn filters_by_traversal() {
        let mut rec = RecorderSink::new();
        rec.on_traversal_begin(&begin(1));
        rec.on_short_circuit(&ShortCircuitEvent {
            traversal: 1,
            reason: ShortCircuit::DuplicateReplace,
        });
        rec.on_traversal_begin(&begin(2));

        assert_eq!(rec.traversal(1).count(), 2);
        assert_eq!(rec.traversal(2).count(), 1);

        rec.clear();
        assert!(rec.into_events().is_empty());
    }
}
