//! Temporal links between consecutive events.

use std::cmp::Ordering;

use crate::events::{StoryEvent, TemporalLink, TemporalRelation};

const PRECISE_FACTOR: f64 = 1.10;
const UNKNOWN_FACTOR: f64 = 0.5;
const SAME_DOCUMENT_FACTOR: f64 = 1.05;

/// Links for each consecutive pair of `events`, which must already be in
/// discourse order. Each pair gives BEFORE/AFTER, or SIMULTANEOUS both ways
/// on a tie. Links under `min_confidence` are dropped.
pub fn derive_links(events: &[StoryEvent], min_confidence: f64) -> Vec<TemporalLink> {
    let mut links = Vec::new();
    for pair in events.windows(2) {
        let (earlier, later) = (&pair[0], &pair[1]);
        let confidence = link_confidence(earlier, later);
        if confidence < min_confidence {
            continue;
        }

        let tied = earlier
            .time
            .discourse_cmp(&later.time)
            .unwrap_or_else(|| earlier.time.timeline_cmp(&later.time))
            == Ordering::Equal;
        let (forward, backward) = if tied {
            (TemporalRelation::Simultaneous, TemporalRelation::Simultaneous)
        } else {
            (TemporalRelation::Before, TemporalRelation::After)
        };

        links.push(TemporalLink {
            source: earlier.id,
            target: later.id,
            relation: forward,
            confidence,
        });
        links.push(TemporalLink {
            source: later.id,
            target: earlier.id,
            relation: backward,
            confidence,
        });
    }
    links
}

/// Minimum composite confidence of the pair, adjusted for anchoring
/// quality and document locality, capped at 1.0.
pub fn link_confidence(a: &StoryEvent, b: &StoryEvent) -> f64 {
    let mut confidence = a.confidence.composite.min(b.confidence.composite);
    if a.time.is_precise_discourse() && b.time.is_precise_discourse() {
        confidence *= PRECISE_FACTOR;
    }
    if a.time.is_unknown() || b.time.is_unknown() {
        confidence *= UNKNOWN_FACTOR;
    }
    if a.document.is_some() && a.document == b.document {
        confidence *= SAME_DOCUMENT_FACTOR;
    }
    confidence.min(1.0)
}

/// Store each event's outgoing links on the event.
pub fn attach_links(events: &mut [StoryEvent], links: &[TemporalLink]) {
    for event in events.iter_mut() {
        event.temporal_links = links
            .iter()
            .filter(|link| link.source == event.id)
            .cloned()
            .collect();
    }
}
