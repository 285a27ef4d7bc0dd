//! Stories told inside the story.

use serde::{Deserialize, Serialize};

use story_model::EntityId;

use crate::events::{EventId, EventType, ParticipantRole, StoryEvent};

/// A TELL event with quoted content, plus the events narrated inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedNarrative {
    /// The TELL event that frames the story.
    pub frame_event: EventId,
    /// Who tells it.
    pub narrator: Option<EntityId>,
    /// Who hears it.
    pub audience: Vec<EntityId>,
    /// Quoted text of the telling.
    pub content: Vec<String>,
    /// Events whose evidence sits strictly inside the frame's evidence.
    pub embedded_events: Vec<EventId>,
}

/// Stories told inside the story, one per TELL event with quoted content.
pub fn detect_embedded_narratives(events: &[StoryEvent]) -> Vec<EmbeddedNarrative> {
    events
        .iter()
        .filter(|e| e.event_type == EventType::Tell && !e.content.is_empty())
        .map(|frame| EmbeddedNarrative {
            frame_event: frame.id,
            narrator: frame.participant(ParticipantRole::Speaker).cloned(),
            audience: frame.participants_with(ParticipantRole::Addressee).cloned().collect(),
            content: frame.content.clone(),
            embedded_events: events
                .iter()
                .filter(|inner| inner.id != frame.id && nested_in(inner, frame))
                .map(|inner| inner.id)
                .collect(),
        })
        .collect()
}

fn nested_in(inner: &StoryEvent, frame: &StoryEvent) -> bool {
    inner.evidence.iter().any(|span| {
        frame.evidence.iter().any(|outer| {
            outer.contains(span) && (outer.char_start, outer.char_end) != (span.char_start, span.char_end)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventDraft;
    use story_model::EvidenceSpan;

    #[test]
    fn test_tale_within_tale() {
        let mut frame = EventDraft::new(EventType::Tell)
            .with_participant(ParticipantRole::Speaker, "gandalf", true)
            .with_participant(ParticipantRole::Addressee, "frodo", false)
            .with_evidence(EvidenceSpan::new("ch2", 100, 400, ""))
            .with_source("a1")
            .seal()
            .unwrap();
        frame.content = vec!["Isildur took the ring".to_string()];

        let inside = EventDraft::new(EventType::Transfer)
            .with_participant(ParticipantRole::Taker, "isildur", true)
            .with_participant(ParticipantRole::Item, "ring", true)
            .with_evidence(EvidenceSpan::new("ch2", 150, 180, ""))
            .with_source("a2")
            .seal()
            .unwrap();
        let outside = EventDraft::new(EventType::Move)
            .with_participant(ParticipantRole::Mover, "frodo", true)
            .with_evidence(EvidenceSpan::new("ch2", 500, 520, ""))
            .with_source("a3")
            .seal()
            .unwrap();

        let embedded = detect_embedded_narratives(&[frame.clone(), inside.clone(), outside]);

        assert_eq!(embedded.len(), 1);
        assert_eq!(embedded[0].frame_event, frame.id);
        assert_eq!(embedded[0].narrator, Some(EntityId::from("gandalf")));
        assert_eq!(embedded[0].audience, vec![EntityId::from("frodo")]);
        assert_eq!(embedded[0].embedded_events, vec![inside.id]);
    }

    #[test]
    fn test_tell_without_content_is_not_a_frame() {
        let tell = EventDraft::new(EventType::Tell)
            .with_participant(ParticipantRole::Speaker, "sam", true)
            .with_source("a1")
            .seal()
            .unwrap();
        assert!(detect_embedded_narratives(&[tell]).is_empty());
    }
}
