//! Discourse positions for UNKNOWN events, inferred from their neighbours.

use std::collections::BTreeMap;

use story_model::DocumentId;

use crate::config::NeighborPreference;
use crate::events::StoryEvent;
use crate::time::TimeAnchor;

/// Give UNKNOWN events the position implied by the nearest anchored events
/// around them in the same document, ordered by evidence offset.
///
/// Two neighbours give the rounded mean paragraph; one neighbour gives its
/// paragraph plus or minus one. Events with no anchored neighbour, or no
/// document, stay UNKNOWN. Only evidence-backed anchors act as neighbours.
pub fn interpolate_unknown(events: Vec<StoryEvent>, chapter_from: NeighborPreference) -> Vec<StoryEvent> {
    let mut events = events;

    let mut by_document: BTreeMap<DocumentId, Vec<usize>> = BTreeMap::new();
    for (index, event) in events.iter().enumerate() {
        if let Some(document) = &event.document {
            by_document.entry(document.clone()).or_default().push(index);
        }
    }

    let mut assigned: Vec<(usize, TimeAnchor)> = Vec::new();
    for mut indices in by_document.into_values() {
        indices.sort_by(|&a, &b| {
            let (a, b) = (&events[a], &events[b]);
            a.first_char_offset()
                .unwrap_or(usize::MAX)
                .cmp(&b.first_char_offset().unwrap_or(usize::MAX))
                .then_with(|| a.id.cmp(&b.id))
        });

        for (position, &index) in indices.iter().enumerate() {
            if !events[index].time.is_unknown() {
                continue;
            }
            let preceding = indices[..position]
                .iter()
                .rev()
                .map(|&i| &events[i].time)
                .find(|t| t.is_precise_discourse());
            let following = indices[position + 1..]
                .iter()
                .map(|&i| &events[i].time)
                .find(|t| t.is_precise_discourse());

            if let Some(anchor) = between(preceding, following, chapter_from) {
                assigned.push((index, anchor));
            }
        }
    }

    for (index, anchor) in assigned {
        events[index].time = anchor;
    }
    events
}

fn between(
    preceding: Option<&TimeAnchor>,
    following: Option<&TimeAnchor>,
    chapter_from: NeighborPreference,
) -> Option<TimeAnchor> {
    let paragraph = match (
        preceding.and_then(TimeAnchor::paragraph),
        following.and_then(TimeAnchor::paragraph),
    ) {
        (Some(before), Some(after)) => before / 2 + after / 2 + (before % 2 + after % 2 + 1) / 2,
        (Some(before), None) => before.saturating_add(1),
        (None, Some(after)) => after.saturating_sub(1),
        (None, None) => return None,
    };

    let (first, second) = match chapter_from {
        NeighborPreference::Preceding => (preceding, following),
        NeighborPreference::Following => (following, preceding),
    };
    let chapter = first
        .and_then(TimeAnchor::chapter)
        .or_else(|| second.and_then(TimeAnchor::chapter));

    Some(TimeAnchor::Discourse {
        chapter,
        paragraph: Some(paragraph),
        sentence: None,
        interpolated: true,
    })
}
