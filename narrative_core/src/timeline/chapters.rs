//! Chapter boundaries for boundary-aware rendering.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use story_model::DocumentId;

use crate::events::{EventId, StoryEvent};

/// First and last event of one (document, chapter) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterBoundary {
    /// Document the chapter belongs to.
    pub document: Option<DocumentId>,
    /// Chapter number, if the events carry one.
    pub chapter: Option<u32>,
    /// Earliest event in the chapter.
    pub first_event: EventId,
    /// Latest event in the chapter.
    pub last_event: EventId,
    /// Number of events in the chapter.
    pub event_count: usize,
    /// Last event of the chapter before this one.
    pub previous_chapter_last: Option<EventId>,
}

/// One boundary per (document, chapter), in order of first appearance in
/// `events`, which should already be in discourse order.
pub fn chapter_boundaries(events: &[StoryEvent]) -> Vec<ChapterBoundary> {
    let mut boundaries: Vec<ChapterBoundary> = Vec::new();
    let mut slots: HashMap<(Option<DocumentId>, Option<u32>), usize> = HashMap::new();

    for event in events {
        let key = (event.document.clone(), event.time.chapter());
        match slots.get(&key) {
            Some(&slot) => {
                let boundary = &mut boundaries[slot];
                boundary.last_event = event.id;
                boundary.event_count += 1;
            }
            None => {
                slots.insert(key.clone(), boundaries.len());
                boundaries.push(ChapterBoundary {
                    document: key.0,
                    chapter: key.1,
                    first_event: event.id,
                    last_event: event.id,
                    event_count: 1,
                    previous_chapter_last: None,
                });
            }
        }
    }

    for index in 1..boundaries.len() {
        boundaries[index].previous_chapter_last = Some(boundaries[index - 1].last_event);
    }
    boundaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventDraft, EventType, ParticipantRole};
    use crate::time::TimeAnchor;

    fn event(source: &str, document: &str, chapter: u32, paragraph: u32) -> StoryEvent {
        let mut event = EventDraft::new(EventType::Meet)
            .with_participant(ParticipantRole::Participant, source, true)
            .with_document(document)
            .with_source(source)
            .seal()
            .unwrap();
        event.time = TimeAnchor::discourse(Some(chapter), paragraph, None);
        event
    }

    #[test]
    fn test_boundaries_track_first_last_and_previous() {
        let events = vec![
            event("a", "book", 1, 1),
            event("b", "book", 1, 5),
            event("c", "book", 2, 1),
            event("d", "book", 2, 2),
            event("e", "book", 2, 9),
        ];
        let boundaries = chapter_boundaries(&events);

        assert_eq!(boundaries.len(), 2);
        assert_eq!(boundaries[0].first_event, events[0].id);
        assert_eq!(boundaries[0].last_event, events[1].id);
        assert_eq!(boundaries[0].previous_chapter_last, None);
        assert_eq!(boundaries[1].event_count, 3);
        assert_eq!(boundaries[1].last_event, events[4].id);
        assert_eq!(boundaries[1].previous_chapter_last, Some(events[1].id));
    }

    #[test]
    fn test_same_chapter_number_in_two_documents() {
        let events = vec![event("a", "vol1", 1, 1), event("b", "vol2", 1, 1)];
        assert_eq!(chapter_boundaries(&events).len(), 2);
        assert!(chapter_boundaries(&[]).is_empty());
    }
}
