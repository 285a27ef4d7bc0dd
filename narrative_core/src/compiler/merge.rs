//! Candidate deduplication: group by canonical signature, then fold.

use std::collections::BTreeMap;

use story_model::{Confidence, EvidenceSpan};
use tracing::debug;

use super::candidates::EventCandidate;
use crate::events::{canonicalize_participants, EventDraft, StoryEvent, TimeBucket};

/// Canonical deduplication key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Signature {
    event_type: &'static str,
    participants: Vec<(&'static str, String)>,
    time_bucket: TimeBucket,
    document: String,
}

impl Signature {
    /// Expects canonical participant order.
    fn of(candidate: &EventCandidate) -> Self {
        Self {
            event_type: candidate.event_type.as_str(),
            participants: candidate
                .participants
                .iter()
                .map(|p| (p.role.as_str(), p.entity.0.clone()))
                .collect(),
            time_bucket: candidate.time_bucket(),
            document: candidate
                .document
                .as_ref()
                .map(|d| d.0.clone())
                .unwrap_or_default(),
        }
    }
}

/// Merge candidates that describe the same occurrence.
///
/// Output is ordered by signature; the time-anchor stage re-sorts it.
pub(crate) fn merge_candidates(candidates: Vec<EventCandidate>) -> Vec<StoryEvent> {
    let mut groups: BTreeMap<Signature, Vec<EventCandidate>> = BTreeMap::new();
    for mut candidate in candidates {
        canonicalize_participants(&mut candidate.participants);
        groups
            .entry(Signature::of(&candidate))
            .or_default()
            .push(candidate);
    }

    groups
        .into_values()
        .filter_map(|mut members| {
            members.sort_by(|a, b| a.derived_from.cmp(&b.derived_from));
            fold_group(members)
        })
        .collect()
}

/// Fold one signature group into an event. Members must be sorted.
fn fold_group(members: Vec<EventCandidate>) -> Option<StoryEvent> {
    let first = members.first()?;
    let mut draft = EventDraft::new(first.event_type).in_bucket(first.time_bucket());
    draft.participants = first.participants.clone();
    draft.document = first.document.clone();

    let mut evidence: BTreeMap<(String, usize, usize), EvidenceSpan> = BTreeMap::new();
    let mut content: Vec<String> = Vec::new();
    let mut modalities = Vec::with_capacity(members.len());

    for member in &members {
        for span in &member.evidence {
            evidence
                .entry((span.document.0.clone(), span.char_start, span.char_end))
                .or_insert_with(|| span.clone());
        }
        for text in &member.content {
            if !content.contains(text) {
                content.push(text.clone());
            }
        }
        modalities.push(member.modality);
        draft.derived_from.extend(member.derived_from.iter().cloned());
    }

    draft.evidence = evidence.into_values().collect();
    draft.content = content;
    draft.modalities = modalities;
    if let Some(confidence) = Confidence::mean(members.iter().map(|m| &m.confidence)) {
        draft.confidence = confidence;
    }

    if members.len() > 1 {
        debug!(
            event_type = %first.event_type,
            bucket = %first.time_bucket(),
            merged = members.len(),
            "merged duplicate event candidates"
        );
    }

    draft.seal()
}
