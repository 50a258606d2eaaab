// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON exporter.
//!
//! [`export`] writes events recorded by a
//! [`RecorderSink`](super::recorder::RecorderSink) as a JSON array with one
//! object per event. Every object carries `"event"` and `"traversal"`;
//! element handles become `{"index", "generation"}` objects or `null`.

use std::io::{self, Write};

use serde_json::{Value, json};

use parallax_core::store::ElementId;
use parallax_core::transition::HandledBy;

use crate::recorder::RecordedEvent;

/// Exports recorded events as a pretty-printed JSON array.
pub fn export(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let values: Vec<Value> = events.iter().map(to_value).collect();
    serde_json::to_writer_pretty(writer, &values)?;
    Ok(())
}

fn to_value(recorded: &RecordedEvent) -> Value {
    let details = match recorded {
        RecordedEvent::TraversalBegin(e) => json!({
            "direction": format!("{:?}", e.direction),
            "has_outgoing": e.has_outgoing,
        }),
        RecordedEvent::ShortCircuit(e) => json!({
            "reason": format!("{:?}", e.reason),
        }),
        RecordedEvent::ElementCreated(e) => json!({
            "element": element(Some(e.element)),
            "slot": format!("{:?}", e.slot),
        }),
        RecordedEvent::Leftovers(e) => json!({
            "count": e.count,
            "policy": format!("{:?}", e.policy),
        }),
        RecordedEvent::FocusBroadcast(e) => json!({
            "top": element(e.top),
            "observers": e.observers,
        }),
        RecordedEvent::TransitionDispatch(e) => json!({
            "from": element(e.from),
            "to": element(e.to),
            "handled_by": handled_by(e.handled_by),
            "prepared_background": e.prepared_background,
        }),
        RecordedEvent::TraversalEnd(e) => json!({
            "attached": e.attached,
        }),
    };

    let mut value = json!({
        "event": recorded.name(),
        "traversal": recorded.traversal(),
    });
    if let (Value::Object(target), Value::Object(fields)) = (&mut value, details) {
        target.extend(fields);
    }
    value
}

fn element(id: Option<ElementId>) -> Value {
    id.map_or(Value::Null, |id| {
        json!({ "index": id.index(), "generation": id.generation() })
    })
}

fn handled_by(handled_by: Option<HandledBy>) -> Value {
    match handled_by {
        Some(HandledBy::Handler(index)) => json!(index),
        Some(HandledBy::Fallback) => json!("fallback"),
        None => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::recorder::RecorderSink;
    use parallax_core::config::NavigatorConfig;
    use parallax_core::element::{Element, StableId};
    use parallax_core::host::HostContainer;
    use parallax_core::key::ScreenKey;
    use parallax_core::navigator::{Direction, Navigator, TraversalRequest};
    use parallax_core::trace::Tracer;

    struct Page(&'static str);

    impl Element<&'static str> for Page {
        fn key(&self) -> &&'static str {
            &self.0
        }

        fn stable_id(&self) -> Option<StableId> {
            Some(StableId(u32::from(self.0.as_bytes()[0])))
        }
    }

    fn record_push() -> Vec<RecordedEvent> {
        let contexts: BTreeMap<&'static str, ()> = [("A", ()), ("B", ())].into_iter().collect();
        let mut nav: Navigator<&'static str, ()> = Navigator::new(
            HostContainer::new(),
            |key: &&'static str, _: &()| -> Option<Box<dyn Element<&'static str>>> {
                Some(Box::new(Page(*key)))
            },
            vec![],
            NavigatorConfig::compact(),
        );
        let mut rec = RecorderSink::new();
        nav.change_key_traced(
            TraversalRequest {
                outgoing: None,
                incoming: ScreenKey::stacked("A", "B"),
                direction: Direction::Forward,
                contexts: &contexts,
            },
            || {},
            &mut Tracer::new(&mut rec),
        )
        .unwrap();
        rec.into_events()
    }

    #[test]
    fn export_produces_valid_json() {
        let events = record_push();
        let mut out = Vec::new();
        export(&events, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), events.len());

        assert_eq!(parsed[0]["event"], "TraversalBegin");
        assert_eq!(parsed[0]["direction"], "Forward");
        assert_eq!(parsed[1]["event"], "ElementCreated");
        assert_eq!(parsed[1]["slot"], "Background");
        assert_eq!(parsed[1]["element"]["index"], 0);

        let last = &parsed[parsed.len() - 1];
        assert_eq!(last["event"], "TraversalEnd");
        assert_eq!(last["attached"], 2);
        assert!(parsed.iter().all(|e| e["traversal"] == 1));
    }

    #[test]
    fn dispatch_reports_the_fallback() {
        let events = record_push();
        let dispatch = events
            .iter()
            .map(to_value)
            .find(|v| v["event"] == "TransitionDispatch")
            .unwrap();
        assert_eq!(dispatch["handled_by"], "fallback");
        assert_eq!(dispatch["from"]["index"], 0);
        assert_eq!(dispatch["to"]["index"], 1);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
