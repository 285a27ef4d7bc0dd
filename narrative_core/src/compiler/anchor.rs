//! Discourse time anchoring and the final event order.

use story_model::{DocumentOrder, EvidenceSpan};

use crate::events::StoryEvent;
use crate::time::TimeAnchor;

/// Anchor from the earliest positioned span, by document order, paragraph,
/// sentence and character offset. No positioned evidence gives UNKNOWN.
pub fn anchor_for(evidence: &[EvidenceSpan], documents: &DocumentOrder) -> TimeAnchor {
    let earliest = evidence
        .iter()
        .filter_map(|span| span.position.map(|position| (span, position)))
        .min_by_key(|(span, position)| {
            (
                documents.rank(&span.document),
                position.paragraph,
                position.sentence.unwrap_or(0),
                span.char_start,
            )
        });

    match earliest {
        Some((span, position)) => {
            let chapter = position
                .chapter
                .unwrap_or_else(|| documents.chapter_of(&span.document));
            TimeAnchor::discourse(Some(chapter), position.paragraph, position.sentence)
        }
        None => TimeAnchor::Unknown,
    }
}

/// Assign every event its discourse anchor.
pub fn anchor_events(events: Vec<StoryEvent>, documents: &DocumentOrder) -> Vec<StoryEvent> {
    events
        .into_iter()
        .map(|mut event| {
            event.time = anchor_for(&event.evidence, documents);
            event
        })
        .collect()
}

/// Stable sort by (chapter, paragraph, sentence), UNKNOWN last.
pub fn sort_by_discourse(events: &mut [StoryEvent]) {
    events.sort_by(|a, b| a.time.timeline_cmp(&b.time));
}
