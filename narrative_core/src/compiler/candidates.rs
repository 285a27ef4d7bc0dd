//! Event candidate builders, one per event type.

use story_model::{
    Assertion, AssertionId, Attribution, Confidence, DiscoursePosition, DocumentId, EntityId,
    EntityIndex, EntityType, EvidenceSpan, Modality, ObjectValue,
};

use super::predicates::{is_killing, transfer_direction, TransferDirection};
use crate::events::{EventType, Participant, ParticipantRole, TimeBucket};

/// One admitted assertion on its way to becoming an event.
///
/// Lives only between the builders and the merger.
#[derive(Debug, Clone)]
pub(crate) struct EventCandidate {
    pub event_type: EventType,
    pub participants: Vec<Participant>,
    pub evidence: Vec<EvidenceSpan>,
    pub derived_from: Vec<AssertionId>,
    pub modality: Modality,
    pub confidence: Confidence,
    pub attribution: Option<Attribution>,
    pub document: Option<DocumentId>,
    pub position: Option<DiscoursePosition>,
    pub content: Vec<String>,
}

impl EventCandidate {
    /// Shared base: provenance, modality, confidence and the discourse
    /// position of the first evidence span.
    fn base(assertion: &Assertion, event_type: EventType) -> Self {
        let first = assertion.evidence.first();
        Self {
            event_type,
            participants: Vec::new(),
            evidence: assertion.evidence.clone(),
            derived_from: vec![assertion.id.clone()],
            modality: assertion.modality,
            confidence: assertion.confidence,
            attribution: assertion.attribution.clone(),
            document: first.map(|span| span.document.clone()),
            position: first.and_then(|span| span.position),
            content: Vec::new(),
        }
    }

    fn add(&mut self, role: ParticipantRole, entity: EntityId, required: bool) {
        self.participants.push(Participant::new(role, entity, required));
    }

    /// Paragraph bucket used in the merge signature.
    pub fn time_bucket(&self) -> TimeBucket {
        self.position
            .map(|p| TimeBucket::Paragraph(p.paragraph))
            .unwrap_or(TimeBucket::Unknown)
    }
}

/// Build the candidate for an admitted assertion.
pub(crate) fn build_candidate(
    assertion: &Assertion,
    lemma: &str,
    event_type: EventType,
    entities: &EntityIndex,
) -> EventCandidate {
    let mut candidate = EventCandidate::base(assertion, event_type);
    let subject = subject_entity(assertion);
    let object = assertion.object.as_ref().and_then(ObjectValue::as_entity);
    let object_is = |t: EntityType| object.as_ref().is_some_and(|id| entities.is_type(id, t));
    let object_animate = object
        .as_ref()
        .and_then(|id| entities.entity_type(id))
        .is_some_and(|t| t.is_animate());

    match event_type {
        EventType::Move => {
            if let Some(subject) = subject {
                candidate.add(ParticipantRole::Mover, subject, true);
            }
            if object_is(EntityType::Place) {
                if let Some(destination) = object {
                    candidate.add(ParticipantRole::Destination, destination, true);
                }
            }
        }
        EventType::Death => {
            if is_killing(lemma) {
                if let Some(killer) = subject {
                    candidate.add(ParticipantRole::Killer, killer, false);
                }
                if let Some(decedent) = object {
                    candidate.add(ParticipantRole::Decedent, decedent, true);
                }
            } else {
                if let Some(decedent) = subject {
                    candidate.add(ParticipantRole::Decedent, decedent, true);
                }
                if object_is(EntityType::Place) {
                    if let Some(location) = object {
                        candidate.add(ParticipantRole::Location, location, false);
                    }
                }
            }
        }
        EventType::Tell => {
            let speaker = candidate
                .attribution
                .as_ref()
                .and_then(|a| a.character.clone())
                .or(subject);
            if let Some(speaker) = speaker {
                candidate.add(ParticipantRole::Speaker, speaker, true);
            }
            if object_is(EntityType::Person) {
                if let Some(addressee) = object {
                    candidate.add(ParticipantRole::Addressee, addressee, false);
                }
            }
            candidate.content = quoted_content(&assertion.evidence);
        }
        EventType::Learn => {
            if let Some(learner) = subject {
                candidate.add(ParticipantRole::Learner, learner, true);
            }
            if object_is(EntityType::Person) {
                if let Some(source) = object {
                    candidate.add(ParticipantRole::Source, source, false);
                }
            } else if let Some(ObjectValue::Text(topic)) = &assertion.object {
                if entities.get(&EntityId::new(topic.as_str())).is_none() {
                    candidate.content = vec![topic.clone()];
                }
            }
        }
        EventType::Promise => {
            if let Some(promiser) = subject {
                candidate.add(ParticipantRole::Promiser, promiser, true);
            }
            if object_is(EntityType::Person) {
                if let Some(promisee) = object {
                    candidate.add(ParticipantRole::Promisee, promisee, false);
                }
            }
            candidate.content = quoted_content(&assertion.evidence);
        }
        EventType::Attack => {
            if let Some(attacker) = subject {
                candidate.add(ParticipantRole::Attacker, attacker, true);
            }
            if object_animate {
                if let Some(target) = object {
                    candidate.add(ParticipantRole::Target, target, true);
                }
            }
        }
        EventType::Meet => {
            if let Some(first) = subject {
                candidate.add(ParticipantRole::Participant, first, true);
            }
            if object_animate {
                if let Some(second) = object {
                    candidate.add(ParticipantRole::Participant, second, true);
                }
            }
        }
        EventType::Transfer => build_transfer(&mut candidate, assertion, lemma, subject, object),
    }

    candidate
}

fn build_transfer(
    candidate: &mut EventCandidate,
    assertion: &Assertion,
    lemma: &str,
    subject: Option<EntityId>,
    item: Option<EntityId>,
) {
    let other = assertion.indirect_object.clone();
    let (subject_role, other_role) = match transfer_direction(lemma) {
        Some(TransferDirection::Take) => (ParticipantRole::Taker, ParticipantRole::Giver),
        Some(TransferDirection::Receive) => (ParticipantRole::Receiver, ParticipantRole::Giver),
        Some(TransferDirection::Give) | None => (ParticipantRole::Giver, ParticipantRole::Receiver),
    };

    if let Some(subject) = subject {
        candidate.add(subject_role, subject, true);
    }
    if let Some(other) = other {
        candidate.add(other_role, other, false);
    }
    if let Some(item) = item {
        candidate.add(ParticipantRole::Item, item, true);
    }
}

/// Resolved subject, or the surface text as a dangling reference.
fn subject_entity(assertion: &Assertion) -> Option<EntityId> {
    let subject = assertion.subject.as_ref()?;
    match &subject.entity {
        Some(id) => Some(id.clone()),
        None => {
            let text = subject.text.trim();
            (!text.is_empty()).then(|| EntityId::new(text))
        }
    }
}

fn quoted_content(evidence: &[EvidenceSpan]) -> Vec<String> {
    let mut content: Vec<String> = Vec::new();
    for segment in evidence.iter().flat_map(EvidenceSpan::quoted_segments) {
        if !content.contains(&segment) {
            content.push(segment);
        }
    }
    content
}
