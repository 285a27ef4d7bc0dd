//! Fact rows - recomputable state derived from events.

use serde::{Deserialize, Serialize};
use story_model::{AssertionId, EntityId};
use uuid::Uuid;

use crate::events::{non_empty_sources, EventId};
use crate::hashing::content_hash;
use crate::time::TimeAnchor;

/// Content-derived identifier for facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FactId(pub Uuid);

impl FactId {
    /// Hash of (subject, predicate, object, temporal class, sorted sources).
    ///
    /// The class keeps a current row and an ended row over the same triple
    /// and sources apart, e.g. an entity that both gives and receives.
    pub fn for_content(
        subject: &EntityId,
        predicate: FactPredicate,
        object: &FactObject,
        class: TemporalClass,
        derived_from: &[SourceRef],
    ) -> Self {
        let mut parts = vec![
            subject.0.clone(),
            predicate.as_str().to_string(),
            object.to_string(),
            class.as_str().to_string(),
        ];
        parts.extend(derived_from.iter().map(SourceRef::to_string));
        Self(content_hash(parts))
    }
}

impl std::fmt::Display for FactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State predicates a fact can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactPredicate {
    LocatedIn,
    Alive,
    DiedIn,
    Possesses,
}

impl FactPredicate {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactPredicate::LocatedIn => "located_in",
            FactPredicate::Alive => "alive",
            FactPredicate::DiedIn => "died_in",
            FactPredicate::Possesses => "possesses",
        }
    }
}

impl std::fmt::Display for FactPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Object of a fact: an entity or a flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FactObject {
    Entity(EntityId),
    Boolean(bool),
}

impl FactObject {
    pub fn as_entity(&self) -> Option<&EntityId> {
        match self {
            FactObject::Entity(id) => Some(id),
            FactObject::Boolean(_) => None,
        }
    }
}

impl std::fmt::Display for FactObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FactObject::Entity(id) => write!(f, "{}", id),
            FactObject::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// How a fact was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceTag {
    /// Stated by the event itself.
    Explicit,
    /// A giver's loss, inferred from the transfer rather than asserted.
    ImpliedLoss,
}

/// A provenance reference.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SourceRef {
    Event(EventId),
    Assertion(AssertionId),
}

impl std::fmt::Display for SourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceRef::Event(id) => write!(f, "event:{}", id),
            SourceRef::Assertion(id) => write!(f, "assertion:{}", id),
        }
    }
}

/// Whether a fact still holds or has a known end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalClass {
    Current,
    Ended,
}

impl TemporalClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemporalClass::Current => "current",
            TemporalClass::Ended => "ended",
        }
    }
}

/// One row of the fact view. Never persisted; always recomputable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactViewRow {
    pub id: FactId,
    /// Entity the fact is about.
    pub subject: EntityId,
    pub predicate: FactPredicate,
    pub object: FactObject,
    /// When the fact starts to hold. UNKNOWN for inferred losses.
    pub valid_from: TimeAnchor,
    /// When the fact stops holding, if known.
    pub valid_until: Option<TimeAnchor>,

    /// Events and assertions this row rests on. Never empty, including
    /// when deserialized.
    #[serde(deserialize_with = "non_empty_sources")]
    pub derived_from: Vec<SourceRef>,

    /// Confidence (0.0 - 1.0).
    pub confidence: f64,
    /// How the row was obtained, where it matters.
    pub inference: Option<InferenceTag>,
}

impl FactViewRow {
    /// Returns `None` when `derived_from` is empty.
    pub fn new(
        subject: EntityId,
        predicate: FactPredicate,
        object: FactObject,
        valid_from: TimeAnchor,
        derived_from: Vec<SourceRef>,
    ) -> Option<Self> {
        let mut derived_from = derived_from;
        derived_from.sort();
        derived_from.dedup();
        if derived_from.is_empty() {
            return None;
        }

        let id = FactId::for_content(&subject, predicate, &object, TemporalClass::Current, &derived_from);
        Some(Self {
            id,
            subject,
            predicate,
            object,
            valid_from,
            valid_until: None,
            derived_from,
            confidence: 1.0,
            inference: None,
        })
    }

    /// Close the row at `until`. The id changes with the temporal class.
    pub fn with_valid_until(mut self, until: TimeAnchor) -> Self {
        self.valid_until = Some(until);
        self.rehash();
        self
    }

    /// Set the confidence, clamped to 0.0 - 1.0.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Set the inference tag.
    pub fn with_inference(mut self, tag: InferenceTag) -> Self {
        self.inference = Some(tag);
        self
    }

    /// Current unless the row has an end.
    pub fn temporal_class(&self) -> TemporalClass {
        match self.valid_until {
            Some(_) => TemporalClass::Ended,
            None => TemporalClass::Current,
        }
    }

    /// Recompute the id after `derived_from` changed.
    pub(crate) fn rehash(&mut self) {
        self.derived_from.sort();
        self.derived_from.dedup();
        self.id = FactId::for_content(
            &self.subject,
            self.predicate,
            &self.object,
            self.temporal_class(),
            &self.derived_from,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(id: &str) -> SourceRef {
        SourceRef::Assertion(AssertionId::from(id))
    }

    #[test]
    fn test_row_requires_sources() {
        let row = FactViewRow::new(
            EntityId::from("harry"),
            FactPredicate::LocatedIn,
            FactObject::Entity(EntityId::from("hogwarts")),
            TimeAnchor::Unknown,
            Vec::new(),
        );
        assert!(row.is_none());
    }

    #[test]
    fn test_id_ignores_source_order() {
        let make = |sources: Vec<SourceRef>| {
            FactViewRow::new(
                EntityId::from("cedric"),
                FactPredicate::Alive,
                FactObject::Boolean(false),
                TimeAnchor::Unknown,
                sources,
            )
            .unwrap()
        };
        let a = make(vec![source("a2"), source("a1")]);
        let b = make(vec![source("a1"), source("a2"), source("a1")]);

        assert_eq!(a.id, b.id);
        assert_eq!(b.derived_from.len(), 2);
    }

    #[test]
    fn test_temporal_class() {
        let row = FactViewRow::new(
            EntityId::from("bilbo"),
            FactPredicate::Possesses,
            FactObject::Entity(EntityId::from("ring")),
            TimeAnchor::Unknown,
            vec![source("a1")],
        )
        .unwrap();
        assert_eq!(row.temporal_class(), TemporalClass::Current);

        let ended = row.clone().with_valid_until(TimeAnchor::discourse(Some(1), 5, None));
        assert_eq!(ended.temporal_class(), TemporalClass::Ended);
        assert_ne!(ended.id, row.id);
    }

    #[test]
    fn test_deserialize_rejects_missing_provenance() {
        let row = FactViewRow::new(
            EntityId::from("harry"),
            FactPredicate::LocatedIn,
            FactObject::Entity(EntityId::from("hogwarts")),
            TimeAnchor::Unknown,
            vec![source("a1")],
        )
        .unwrap();
        let mut value = serde_json::to_value(&row).unwrap();
        assert_eq!(serde_json::from_value::<FactViewRow>(value.clone()).unwrap(), row);

        value["derived_from"] = serde_json::json!([]);
        assert!(serde_json::from_value::<FactViewRow>(value).is_err());
    }

    #[test]
    fn test_object_strings() {
        assert_eq!(FactObject::Boolean(false).to_string(), "false");
        assert_eq!(FactObject::Entity(EntityId::from("ring")).to_string(), "ring");
        assert_eq!(FactPredicate::DiedIn.to_string(), "died_in");
    }
}
