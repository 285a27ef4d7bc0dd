//! Story events - the compiler's primary output.

use serde::{Deserialize, Deserializer, Serialize};
use story_model::{AssertionId, Confidence, DocumentId, EntityId, EvidenceSpan, Modality};
use uuid::Uuid;

use crate::hashing::content_hash;
use crate::time::TimeAnchor;

/// Content-derived identifier for events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    /// Hash of the canonical signature plus sorted sources.
    ///
    /// `participants` must already be in canonical order and `derived_from`
    /// sorted; [`EventDraft::seal`] takes care of both.
    pub fn for_signature(
        event_type: EventType,
        participants: &[Participant],
        document: Option<&DocumentId>,
        time_bucket: &TimeBucket,
        derived_from: &[AssertionId],
    ) -> Self {
        let mut parts: Vec<String> = Vec::with_capacity(participants.len() + derived_from.len() + 3);
        parts.push(event_type.as_str().to_string());
        parts.extend(participants.iter().map(Participant::tag));
        parts.push(document.map(|d| d.0.clone()).unwrap_or_default());
        parts.push(time_bucket.to_string());
        parts.extend(derived_from.iter().map(|id| id.0.clone()));
        Self(content_hash(parts))
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kinds of narrative events the compiler recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Move,
    Death,
    Tell,
    Learn,
    Promise,
    Attack,
    Meet,
    Transfer,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Move => "MOVE",
            EventType::Death => "DEATH",
            EventType::Tell => "TELL",
            EventType::Learn => "LEARN",
            EventType::Promise => "PROMISE",
            EventType::Attack => "ATTACK",
            EventType::Meet => "MEET",
            EventType::Transfer => "TRANSFER",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Participant roles. Each event type uses its own subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantRole {
    // MOVE
    Mover,
    Destination,

    // DEATH
    Killer,
    Decedent,
    Location,

    // TELL
    Speaker,
    Addressee,

    // LEARN
    Learner,
    Source,

    // PROMISE
    Promiser,
    Promisee,

    // ATTACK
    Attacker,
    Target,

    // MEET
    Participant,

    // TRANSFER
    Giver,
    Receiver,
    Taker,
    Item,
}

impl ParticipantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantRole::Mover => "MOVER",
            ParticipantRole::Destination => "DESTINATION",
            ParticipantRole::Killer => "KILLER",
            ParticipantRole::Decedent => "DECEDENT",
            ParticipantRole::Location => "LOCATION",
            ParticipantRole::Speaker => "SPEAKER",
            ParticipantRole::Addressee => "ADDRESSEE",
            ParticipantRole::Learner => "LEARNER",
            ParticipantRole::Source => "SOURCE",
            ParticipantRole::Promiser => "PROMISER",
            ParticipantRole::Promisee => "PROMISEE",
            ParticipantRole::Attacker => "ATTACKER",
            ParticipantRole::Target => "TARGET",
            ParticipantRole::Participant => "PARTICIPANT",
            ParticipantRole::Giver => "GIVER",
            ParticipantRole::Receiver => "RECEIVER",
            ParticipantRole::Taker => "TAKER",
            ParticipantRole::Item => "ITEM",
        }
    }
}

/// An entity filling a role in an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    /// Role the entity plays.
    pub role: ParticipantRole,
    /// Participating entity. May dangle.
    pub entity: EntityId,
    /// Whether the role is mandatory for the event type.
    pub required: bool,
}

impl Participant {
    /// Create a participant.
    pub fn new(role: ParticipantRole, entity: EntityId, required: bool) -> Self {
        Self {
            role,
            entity,
            required,
        }
    }

    /// `ROLE:entity`, the form used in signatures and hashes.
    pub fn tag(&self) -> String {
        format!("{}:{}", self.role.as_str(), self.entity)
    }
}

/// Sort by role name, then entity id; drop repeated (role, entity) pairs.
pub(crate) fn canonicalize_participants(participants: &mut Vec<Participant>) {
    participants.sort_by(|a, b| {
        a.role
            .as_str()
            .cmp(b.role.as_str())
            .then_with(|| a.entity.cmp(&b.entity))
    });
    participants.dedup_by(|a, b| a.role == b.role && a.entity == b.entity);
}

/// Coarse time key used for deduplication: the evidence paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeBucket {
    Paragraph(u32),
    Unknown,
}

impl std::fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeBucket::Paragraph(p) => write!(f, "p{}", p),
            TimeBucket::Unknown => f.write_str("unknown"),
        }
    }
}

/// Relation carried by a temporal link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemporalRelation {
    Before,
    After,
    Simultaneous,
}

/// Derived ordering between two events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalLink {
    /// Event the link belongs to.
    pub source: EventId,
    /// Event the link points at.
    pub target: EventId,
    pub relation: TemporalRelation,
    /// Link confidence (0.0 - 1.0).
    pub confidence: f64,
}

/// How an event was produced. Deterministic: no timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Name of the producing crate.
    pub compiler: String,
    /// Version of the producing crate.
    pub version: String,
    /// Number of source assertions folded into the event.
    pub merged_sources: usize,
}

/// A deduplicated, time-anchored narrative event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryEvent {
    pub id: EventId,
    /// Kind of event.
    pub event_type: EventType,
    pub participants: Vec<Participant>,
    /// Discourse anchor, UNKNOWN until anchored.
    pub time: TimeAnchor,
    /// Union of the merged evidence spans.
    pub evidence: Vec<EvidenceSpan>,

    /// Least certain modality among the merged reports.
    pub modality: Modality,
    /// Every modality seen, least certain first.
    pub modalities_observed: Vec<Modality>,

    /// Per-dimension mean over the merged reports.
    pub confidence: Confidence,

    /// Source assertions. Never empty, including when deserialized.
    #[serde(deserialize_with = "non_empty_sources")]
    pub derived_from: Vec<AssertionId>,

    /// Document of the first evidence span.
    pub document: Option<DocumentId>,

    /// Quoted speech, learned topics, promise text.
    #[serde(default)]
    pub content: Vec<String>,

    /// Outgoing links, filled by timeline enrichment.
    #[serde(default)]
    pub temporal_links: Vec<TemporalLink>,

    pub metadata: EventMetadata,
}

impl StoryEvent {
    /// First entity holding `role`.
    pub fn participant(&self, role: ParticipantRole) -> Option<&EntityId> {
        self.participants
            .iter()
            .find(|p| p.role == role)
            .map(|p| &p.entity)
    }

    /// Every entity holding `role`.
    pub fn participants_with(&self, role: ParticipantRole) -> impl Iterator<Item = &EntityId> {
        self.participants
            .iter()
            .filter(move |p| p.role == role)
            .map(|p| &p.entity)
    }

    /// Whether `entity` fills any role.
    pub fn involves(&self, entity: &EntityId) -> bool {
        self.participants.iter().any(|p| &p.entity == entity)
    }

    /// Smallest evidence character offset, used to order events in a document.
    pub fn first_char_offset(&self) -> Option<usize> {
        self.evidence.iter().map(|span| span.char_start).min()
    }
}

/// Provenance list that refuses to deserialize empty.
pub(crate) fn non_empty_sources<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let sources = Vec::<T>::deserialize(deserializer)?;
    if sources.is_empty() {
        return Err(serde::de::Error::custom("derived_from must name at least one source"));
    }
    Ok(sources)
}

/// Everything needed to mint a [`StoryEvent`].
///
/// Sealing is the only way the compiler creates events, and it refuses to
/// produce one without source assertions.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub event_type: EventType,
    pub participants: Vec<Participant>,
    pub document: Option<DocumentId>,
    pub time_bucket: TimeBucket,
    pub evidence: Vec<EvidenceSpan>,
    pub modalities: Vec<Modality>,
    pub confidence: Confidence,
    pub derived_from: Vec<AssertionId>,
    pub content: Vec<String>,
}

impl EventDraft {
    /// Create an empty draft of the given type.
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            participants: Vec::new(),
            document: None,
            time_bucket: TimeBucket::Unknown,
            evidence: Vec::new(),
            modalities: vec![Modality::Fact],
            confidence: Confidence::default(),
            derived_from: Vec::new(),
            content: Vec::new(),
        }
    }

    /// Add a participant.
    pub fn with_participant(mut self, role: ParticipantRole, entity: impl Into<String>, required: bool) -> Self {
        self.participants
            .push(Participant::new(role, EntityId::new(entity), required));
        self
    }

    /// Add a source assertion.
    pub fn with_source(mut self, id: impl Into<String>) -> Self {
        self.derived_from.push(AssertionId::new(id));
        self
    }

    /// Set the document.
    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(DocumentId::new(document));
        self
    }

    /// Set the confidence.
    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set the observed modalities.
    pub fn with_modalities(mut self, modalities: Vec<Modality>) -> Self {
        self.modalities = modalities;
        self
    }

    /// Add an evidence span.
    pub fn with_evidence(mut self, span: EvidenceSpan) -> Self {
        self.evidence.push(span);
        self
    }

    /// Set the time bucket used in the id.
    pub fn in_bucket(mut self, bucket: TimeBucket) -> Self {
        self.time_bucket = bucket;
        self
    }

    /// Mint the event. Returns `None` when there are no source assertions.
    ///
    /// The returned event is UNKNOWN-anchored; time anchoring happens later.
    pub fn seal(self) -> Option<StoryEvent> {
        let mut derived_from = self.derived_from;
        derived_from.sort();
        derived_from.dedup();
        if derived_from.is_empty() {
            return None;
        }

        let mut participants = self.participants;
        canonicalize_participants(&mut participants);

        let mut observed = self.modalities;
        if observed.is_empty() {
            observed.push(Modality::Fact);
        }
        observed.sort_by_key(|m| m.uncertainty_rank());
        observed.dedup();
        let modality = observed[0];

        let id = EventId::for_signature(
            self.event_type,
            &participants,
            self.document.as_ref(),
            &self.time_bucket,
            &derived_from,
        );

        Some(StoryEvent {
            id,
            event_type: self.event_type,
            participants,
            time: TimeAnchor::Unknown,
            evidence: self.evidence,
            modality,
            modalities_observed: observed,
            confidence: self.confidence,
            metadata: EventMetadata {
                compiler: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                merged_sources: derived_from.len(),
            },
            derived_from,
            document: self.document,
            content: self.content,
            temporal_links: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_requires_sources() {
        let draft = EventDraft::new(EventType::Move).with_participant(ParticipantRole::Mover, "harry", true);
        assert!(draft.seal().is_none());
    }

    #[test]
    fn test_seal_canonicalizes() {
        let event = EventDraft::new(EventType::Meet)
            .with_participant(ParticipantRole::Participant, "ron", true)
            .with_participant(ParticipantRole::Participant, "harry", true)
            .with_source("a2")
            .with_source("a1")
            .with_source("a2")
            .seal()
            .unwrap();

        let entities: Vec<_> = event.participants.iter().map(|p| p.entity.as_str()).collect();
        assert_eq!(entities, vec!["harry", "ron"]);
        assert_eq!(event.derived_from, vec![AssertionId::from("a1"), AssertionId::from("a2")]);
        assert_eq!(event.metadata.merged_sources, 2);
        assert!(event.time.is_unknown());
    }

    #[test]
    fn test_id_ignores_participant_order() {
        let a = EventDraft::new(EventType::Meet)
            .with_participant(ParticipantRole::Participant, "ron", true)
            .with_participant(ParticipantRole::Participant, "harry", true)
            .with_source("a1")
            .seal()
            .unwrap();
        let b = EventDraft::new(EventType::Meet)
            .with_participant(ParticipantRole::Participant, "harry", true)
            .with_participant(ParticipantRole::Participant, "ron", true)
            .with_source("a1")
            .seal()
            .unwrap();
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_id_depends_on_bucket_and_document() {
        let base = || {
            EventDraft::new(EventType::Move)
                .with_participant(ParticipantRole::Mover, "harry", true)
                .with_source("a1")
        };
        let p1 = base().in_bucket(TimeBucket::Paragraph(1)).seal().unwrap();
        let p2 = base().in_bucket(TimeBucket::Paragraph(2)).seal().unwrap();
        let other_doc = base().in_bucket(TimeBucket::Paragraph(1)).with_document("ch2").seal().unwrap();

        assert_ne!(p1.id, p2.id);
        assert_ne!(p1.id, other_doc.id);
    }

    #[test]
    fn test_safest_modality_selected() {
        let event = EventDraft::new(EventType::Death)
            .with_participant(ParticipantRole::Decedent, "boromir", true)
            .with_modalities(vec![Modality::Fact, Modality::Rumor, Modality::Belief, Modality::Fact])
            .with_source("a1")
            .seal()
            .unwrap();

        assert_eq!(event.modality, Modality::Rumor);
        assert_eq!(
            event.modalities_observed,
            vec![Modality::Rumor, Modality::Belief, Modality::Fact]
        );
    }

    #[test]
    fn test_deserialize_rejects_missing_provenance() {
        let event = EventDraft::new(EventType::Move)
            .with_participant(ParticipantRole::Mover, "harry", true)
            .with_source("a1")
            .seal()
            .unwrap();
        let mut value = serde_json::to_value(&event).unwrap();
        assert_eq!(serde_json::from_value::<StoryEvent>(value.clone()).unwrap(), event);

        value["derived_from"] = serde_json::json!([]);
        assert!(serde_json::from_value::<StoryEvent>(value.clone()).is_err());

        value.as_object_mut().unwrap().remove("derived_from");
        assert!(serde_json::from_value::<StoryEvent>(value).is_err());
    }

    #[test]
    fn test_participant_lookup() {
        let event = EventDraft::new(EventType::Death)
            .with_participant(ParticipantRole::Killer, "voldemort", false)
            .with_participant(ParticipantRole::Decedent, "cedric", true)
            .with_source("a1")
            .seal()
            .unwrap();

        assert_eq!(event.participant(ParticipantRole::Decedent), Some(&EntityId::from("cedric")));
        assert!(event.involves(&EntityId::from("voldemort")));
        assert!(!event.involves(&EntityId::from("harry")));
    }
}
