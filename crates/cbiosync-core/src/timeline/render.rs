//! Rendering portal events into comparable lines

use crate::source::ClinicalEvent;
use crate::types::{EventType, COMMON_EVENT_FIELDS};
use std::collections::{BTreeMap, BTreeSet};

/// Rendered lines per event type, de-duplicated
pub type RenderedEvents = BTreeMap<EventType, BTreeSet<String>>;

/// Render one event: common fields, then the type's specific fields
///
/// Absent fields render as the empty string.
pub fn render_event(event_type: EventType, event: &ClinicalEvent) -> String {
    let attrs: BTreeMap<&str, &str> = event
        .attributes
        .iter()
        .map(|a| (a.key.as_str(), a.value.as_str()))
        .collect();

    let mut fields: Vec<String> = COMMON_EVENT_FIELDS
        .iter()
        .map(|f| event.common_field(f).unwrap_or_default())
        .collect();
    fields.extend(
        event_type
            .specific_fields()
            .iter()
            .map(|f| attrs.get(f).copied().unwrap_or_default().to_string()),
    );
    fields.join("\t")
}

/// Group and render every current-side event
///
/// Events whose type has no schema are skipped with a warning.
pub fn render_current_events(events: &[ClinicalEvent]) -> RenderedEvents {
    let mut rendered: RenderedEvents = BTreeMap::new();
    let mut unknown: BTreeMap<&str, usize> = BTreeMap::new();
    for event in events {
        match EventType::from_portal_name(&event.event_type) {
            Some(event_type) => {
                rendered
                    .entry(event_type)
                    .or_default()
                    .insert(render_event(event_type, event));
            }
            None => *unknown.entry(event.event_type.as_str()).or_default() += 1,
        }
    }
    for (event_type, count) in unknown {
        tracing::warn!(
            event_type,
            count,
            "portal event type has no timeline schema, events skipped"
        );
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::EventAttribute;
    use serde_json::json;

    fn surgery(patient: &str, start: i64, subtype: &str) -> ClinicalEvent {
        ClinicalEvent {
            patient_id: patient.to_string(),
            start_offset: Some(json!(start)),
            end_offset: None,
            event_type: "SURGERY".to_string(),
            attributes: vec![EventAttribute {
                key: "SUBTYPE".to_string(),
                value: subtype.to_string(),
            }],
        }
    }

    #[test]
    fn test_render_fills_absent_fields_with_empty() {
        let line = render_event(EventType::Surgery, &surgery("P1", 10, "Resection"));
        assert_eq!(line, "P1\t10\t\tSURGERY\tResection\t");
    }

    #[test]
    fn test_render_has_one_column_per_schema_field() {
        for event_type in EventType::ALL {
            let line = render_event(event_type, &surgery("P1", 10, "Resection"));
            assert_eq!(
                line.split('\t').count(),
                COMMON_EVENT_FIELDS.len() + event_type.specific_fields().len()
            );
        }
    }

    #[test]
    fn test_render_ignores_attributes_outside_schema() {
        let mut event = surgery("P1", 10, "Resection");
        event.attributes.push(EventAttribute {
            key: "STYLE_COLOR".to_string(),
            value: "red".to_string(),
        });
        let line = render_event(EventType::Surgery, &event);
        assert!(!line.contains("red"));
    }

    #[test]
    fn test_duplicates_collapse_and_unknown_types_skipped() {
        let mut radiation = surgery("P1", 5, "x");
        radiation.event_type = "RADIATION".to_string();
        let events = vec![surgery("P1", 10, "A"), surgery("P1", 10, "A"), radiation];
        let rendered = render_current_events(&events);
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[&EventType::Surgery].len(), 1);
    }
}
