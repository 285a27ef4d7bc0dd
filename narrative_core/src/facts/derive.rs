//! Fact derivation rules, one per event type.

use std::collections::HashSet;

use story_model::{Assertion, AssertionId, EntityId};
use tracing::debug;

use super::dedup::dedup_facts;
use super::fact::{FactObject, FactPredicate, FactViewRow, InferenceTag, SourceRef};
use crate::events::{EventType, ParticipantRole, StoryEvent};
use crate::time::TimeAnchor;

/// Confidence factor for a giver's inferred loss.
pub const IMPLIED_LOSS_FACTOR: f64 = 0.9;

/// Derive the deduplicated fact view from events. Output is sorted by id.
pub fn derive_facts(events: &[StoryEvent]) -> Vec<FactViewRow> {
    let rows = events.iter().flat_map(|event| rows_for(event, &[])).collect();
    finish(rows, events.len())
}

/// Like [`derive_facts`], but each row also references the source
/// assertions of its event that are present in `assertions`.
pub fn derive_facts_traced(events: &[StoryEvent], assertions: &[Assertion]) -> Vec<FactViewRow> {
    let known: HashSet<&AssertionId> = assertions.iter().map(|a| &a.id).collect();
    let rows = events
        .iter()
        .flat_map(|event| {
            let traced: Vec<SourceRef> = event
                .derived_from
                .iter()
                .filter(|id| known.contains(id))
                .cloned()
                .map(SourceRef::Assertion)
                .collect();
            rows_for(event, &traced)
        })
        .collect();
    finish(rows, events.len())
}

/// Raw rows for a single event, before deduplication.
pub fn facts_for_event(event: &StoryEvent) -> Vec<FactViewRow> {
    rows_for(event, &[])
}

fn finish(rows: Vec<FactViewRow>, event_count: usize) -> Vec<FactViewRow> {
    let raw = rows.len();
    let facts = dedup_facts(rows);
    debug!(events = event_count, raw, facts = facts.len(), "derived fact view");
    facts
}

fn rows_for(event: &StoryEvent, traced: &[SourceRef]) -> Vec<FactViewRow> {
    let mut sources = Vec::with_capacity(traced.len() + 1);
    sources.push(SourceRef::Event(event.id));
    sources.extend_from_slice(traced);

    let confidence = event.confidence.composite;
    let at = &event.time;
    let row = |subject: &EntityId, predicate: FactPredicate, object: FactObject, from: TimeAnchor| {
        FactViewRow::new(subject.clone(), predicate, object, from, sources.clone())
            .map(|row| row.with_confidence(confidence))
    };

    let mut rows = Vec::new();
    match event.event_type {
        EventType::Move => {
            let mover = event.participant(ParticipantRole::Mover);
            let destination = event.participant(ParticipantRole::Destination);
            if let (Some(mover), Some(destination)) = (mover, destination) {
                rows.extend(row(
                    mover,
                    FactPredicate::LocatedIn,
                    FactObject::Entity(destination.clone()),
                    at.clone(),
                ));
            }
        }
        EventType::Death => {
            if let Some(decedent) = event.participant(ParticipantRole::Decedent) {
                rows.extend(row(decedent, FactPredicate::Alive, FactObject::Boolean(false), at.clone()));
                if let Some(location) = event.participant(ParticipantRole::Location) {
                    rows.extend(row(
                        decedent,
                        FactPredicate::DiedIn,
                        FactObject::Entity(location.clone()),
                        at.clone(),
                    ));
                }
            }
        }
        EventType::Transfer => {
            let Some(item) = event.participant(ParticipantRole::Item) else {
                return rows;
            };
            let item = FactObject::Entity(item.clone());
            let gainer = event
                .participant(ParticipantRole::Receiver)
                .or_else(|| event.participant(ParticipantRole::Taker));

            if let Some(gainer) = gainer {
                rows.extend(
                    row(gainer, FactPredicate::Possesses, item.clone(), at.clone())
                        .map(|r| r.with_inference(InferenceTag::Explicit)),
                );
            }
            if let Some(giver) = event.participant(ParticipantRole::Giver) {
                rows.extend(
                    row(giver, FactPredicate::Possesses, item, TimeAnchor::Unknown).map(|r| {
                        r.with_valid_until(at.clone())
                            .with_confidence(confidence * IMPLIED_LOSS_FACTOR)
                            .with_inference(InferenceTag::ImpliedLoss)
                    }),
                );
            }
        }
        EventType::Tell
        | EventType::Learn
        | EventType::Promise
        | EventType::Attack
        | EventType::Meet => {}
    }
    rows
}
