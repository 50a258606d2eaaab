// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Elements are
//! printed as `#index@generation`.

use std::io::Write;

use parallax_core::store::ElementId;
use parallax_core::trace::{
    ElementCreatedEvent, FocusBroadcastEvent, LeftoversEvent, RemovalPolicy, ShortCircuit,
    ShortCircuitEvent, Slot, TraceSink, TransitionDispatchEvent, TraversalBeginEvent,
    TraversalEndEvent,
};
use parallax_core::transition::HandledBy;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Formats an element handle as `#index@generation`, or `-` for none.
pub fn element(id: Option<ElementId>) -> String {
    id.map_or_else(
        || "-".to_owned(),
        |id| format!("#{}@{}", id.index(), id.generation()),
    )
}

fn handler_name(handled_by: Option<HandledBy>) -> String {
    match handled_by {
        Some(HandledBy::Handler(index)) => format!("handler[{index}]"),
        Some(HandledBy::Fallback) => "fallback".to_owned(),
        None => "skipped".to_owned(),
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_traversal_begin(&mut self, e: &TraversalBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[begin] traversal={} direction={:?} outgoing={}",
            e.traversal, e.direction, e.has_outgoing,
        );
    }

    fn on_short_circuit(&mut self, e: &ShortCircuitEvent) {
        let reason = match e.reason {
            ShortCircuit::DuplicateReplace => "duplicate replace",
            ShortCircuit::Placeholder => "placeholder",
        };
        let _ = writeln!(
            self.writer,
            "[skip] traversal={} reason={reason}",
            e.traversal,
        );
    }

    fn on_element_created(&mut self, e: &ElementCreatedEvent) {
        let slot = match e.slot {
            Slot::Background => "background",
            Slot::Foreground => "foreground",
        };
        let _ = writeln!(
            self.writer,
            "[create] traversal={} element={} slot={slot}",
            e.traversal,
            element(Some(e.element)),
        );
    }

    fn on_leftovers(&mut self, e: &LeftoversEvent) {
        let policy = match e.policy {
            RemovalPolicy::Immediate => "now",
            RemovalPolicy::Deferred => "after transition",
        };
        let _ = writeln!(
            self.writer,
            "[leftovers] traversal={} count={} remove={policy}",
            e.traversal, e.count,
        );
    }

    fn on_focus_broadcast(&mut self, e: &FocusBroadcastEvent) {
        let _ = writeln!(
            self.writer,
            "[focus] traversal={} top={} observers={}",
            e.traversal,
            element(e.top),
            e.observers,
        );
    }

    fn on_transition_dispatch(&mut self, e: &TransitionDispatchEvent) {
        let prepared = if e.prepared_background {
            " +background"
        } else {
            ""
        };
        let _ = writeln!(
            self.writer,
            "[transition] traversal={} {} -> {} by={}{prepared}",
            e.traversal,
            element(e.from),
            element(e.to),
            handler_name(e.handled_by),
        );
    }

    fn on_traversal_end(&mut self, e: &TraversalEndEvent) {
        let _ = writeln!(
            self.writer,
            "[end] traversal={} attached={}",
            e.traversal, e.attached,
        );
    }
}
