//! Assertions: evidence-backed subject/predicate/object claims.

use serde::{Deserialize, Serialize};

use crate::{DiscoursePosition, DocumentId, EntityId};

/// Identifier of an upstream assertion.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssertionId(pub String);

impl AssertionId {
    /// Create an assertion id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssertionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for AssertionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A subject as it appeared in text, with its resolution if one was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    /// Surface text as it appears in the source.
    pub text: String,
    /// Resolved entity, if coreference succeeded.
    pub entity: Option<EntityId>,
}

impl Mention {
    /// A mention resolved to an entity; the id doubles as surface text.
    pub fn resolved(entity: impl Into<String>) -> Self {
        let id = entity.into();
        Self {
            text: id.clone(),
            entity: Some(EntityId(id)),
        }
    }

    /// Create a mention with no resolved entity.
    pub fn unresolved(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            entity: None,
        }
    }

    /// Set the resolved entity.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(EntityId(entity.into()));
        self
    }
}

/// The object position of an assertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ObjectValue {
    Entity(EntityId),
    Text(String),
    Number(f64),
    Flag(bool),
}

impl ObjectValue {
    /// Object referring to an entity.
    pub fn entity(id: impl Into<String>) -> Self {
        ObjectValue::Entity(EntityId(id.into()))
    }

    /// String-typed objects: entity references and text literals.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ObjectValue::Entity(id) => Some(id.as_str()),
            ObjectValue::Text(s) => Some(s),
            ObjectValue::Number(_) | ObjectValue::Flag(_) => None,
        }
    }

    /// Entity reference carried by this object. Text literals are treated
    /// as candidate entity ids since upstream stores resolved ids as text.
    pub fn as_entity(&self) -> Option<EntityId> {
        self.as_str().map(EntityId::new)
    }
}

impl std::fmt::Display for ObjectValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectValue::Entity(id) => write!(f, "{}", id),
            ObjectValue::Text(s) => write!(f, "{}", s),
            ObjectValue::Number(n) => write!(f, "{}", n),
            ObjectValue::Flag(b) => write!(f, "{}", b),
        }
    }
}

/// A span of source text supporting an assertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSpan {
    /// Source document.
    pub document: DocumentId,
    /// Start character offset, inclusive.
    pub char_start: usize,
    /// End character offset, exclusive.
    pub char_end: usize,
    /// Quoted source text.
    pub text: String,
    /// Narrative position, when the upstream knows it.
    pub position: Option<DiscoursePosition>,
}

impl EvidenceSpan {
    /// Create an unpositioned span.
    pub fn new(
        document: impl Into<String>,
        char_start: usize,
        char_end: usize,
        text: impl Into<String>,
    ) -> Self {
        Self {
            document: DocumentId(document.into()),
            char_start,
            char_end,
            text: text.into(),
            position: None,
        }
    }

    /// Set the discourse position.
    pub fn at(mut self, position: DiscoursePosition) -> Self {
        self.position = Some(position);
        self
    }

    /// Whether `other` lies entirely inside this span (same document).
    pub fn contains(&self, other: &EvidenceSpan) -> bool {
        self.document == other.document
            && self.char_start <= other.char_start
            && other.char_end <= self.char_end
    }

    /// Text between double quotes, straight or curly.
    pub fn quoted_segments(&self) -> Vec<String> {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut inside = false;
        for c in self.text.chars() {
            let opens = c == '"' || c == '\u{201C}';
            let closes = c == '"' || c == '\u{201D}';
            if inside && closes {
                let trimmed = current.trim();
                if !trimmed.is_empty() {
                    segments.push(trimmed.to_string());
                }
                current.clear();
                inside = false;
            } else if !inside && opens {
                inside = true;
            } else if inside {
                current.push(c);
            }
        }
        segments
    }
}

/// Who reported a claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    /// Source label, e.g. "narrator" or "dialogue".
    pub source: String,
    /// In-story character the claim is attributed to.
    pub character: Option<EntityId>,
    /// How far the source can be trusted (0.0 - 1.0).
    pub reliability: Option<f64>,
}

impl Attribution {
    /// Attribute to the narrator.
    pub fn narrator() -> Self {
        Self {
            source: "narrator".to_string(),
            character: None,
            reliability: None,
        }
    }

    /// Attribute to a character.
    pub fn character(id: impl Into<String>) -> Self {
        Self {
            source: "character".to_string(),
            character: Some(EntityId(id.into())),
            reliability: None,
        }
    }
}

/// Epistemic status of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Modality {
    Fact,
    Belief,
    Claim,
    Rumor,
    Plan,
    Hypothetical,
    Negated,
    Uncertain,
}

impl Modality {
    /// Pinned uncertainty rank; lower means less certain.
    ///
    /// This table is a contract. Do not derive it from declaration order.
    pub const fn uncertainty_rank(self) -> u8 {
        match self {
            Modality::Rumor => 0,
            Modality::Belief => 1,
            Modality::Claim => 2,
            Modality::Negated => 3,
            Modality::Plan => 4,
            Modality::Hypothetical => 5,
            Modality::Uncertain => 6,
            Modality::Fact => 7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Fact => "FACT",
            Modality::Belief => "BELIEF",
            Modality::Claim => "CLAIM",
            Modality::Rumor => "RUMOR",
            Modality::Plan => "PLAN",
            Modality::Hypothetical => "HYPOTHETICAL",
            Modality::Negated => "NEGATED",
            Modality::Uncertain => "UNCERTAIN",
        }
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-dimension confidence in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    pub extraction: f64,
    pub identity: f64,
    pub semantic: f64,
    pub temporal: f64,
    /// Overall score used for thresholds and link confidence.
    pub composite: f64,
}

impl Confidence {
    /// Every dimension set to the same value.
    pub fn uniform(value: f64) -> Self {
        let v = value.clamp(0.0, 1.0);
        Self {
            extraction: v,
            identity: v,
            semantic: v,
            temporal: v,
            composite: v,
        }
    }

    /// Arithmetic mean per dimension. `None` for an empty input.
    pub fn mean<'a>(values: impl IntoIterator<Item = &'a Confidence>) -> Option<Confidence> {
        let mut sum = [0.0f64; 5];
        let mut count = 0usize;
        for c in values {
            sum[0] += c.extraction;
            sum[1] += c.identity;
            sum[2] += c.semantic;
            sum[3] += c.temporal;
            sum[4] += c.composite;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let n = count as f64;
        Some(Confidence {
            extraction: sum[0] / n,
            identity: sum[1] / n,
            semantic: sum[2] / n,
            temporal: sum[3] / n,
            composite: sum[4] / n,
        })
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

/// An upstream claim. Never mutated by the compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assertion {
    pub id: AssertionId,
    /// Who or what the assertion is about.
    pub subject: Option<Mention>,
    /// Verb as extracted, before lemmatisation.
    pub predicate: String,
    /// Direct object, if any.
    pub object: Option<ObjectValue>,
    /// Second argument of ditransitive predicates ("gave frodo the ring").
    #[serde(default)]
    pub indirect_object: Option<EntityId>,
    /// Supporting text spans.
    pub evidence: Vec<EvidenceSpan>,
    /// Who reports the assertion.
    pub attribution: Option<Attribution>,
    /// Epistemic status of the claim.
    pub modality: Modality,
    pub confidence: Confidence,
}

impl Assertion {
    /// Create a FACT assertion with full confidence and no evidence.
    pub fn new(id: impl Into<String>, subject: Mention, predicate: impl Into<String>) -> Self {
        Self {
            id: AssertionId(id.into()),
            subject: Some(subject),
            predicate: predicate.into(),
            object: None,
            indirect_object: None,
            evidence: Vec::new(),
            attribution: None,
            modality: Modality::Fact,
            confidence: Confidence::default(),
        }
    }

    /// Drop the subject.
    pub fn without_subject(mut self) -> Self {
        self.subject = None;
        self
    }

    /// Set the direct object.
    pub fn with_object(mut self, object: ObjectValue) -> Self {
        self.object = Some(object);
        self
    }

    /// Set the indirect object.
    pub fn with_indirect_object(mut self, entity: impl Into<String>) -> Self {
        self.indirect_object = Some(EntityId(entity.into()));
        self
    }

    /// Add an evidence span.
    pub fn with_evidence(mut self, span: EvidenceSpan) -> Self {
        self.evidence.push(span);
        self
    }

    /// Set the attribution.
    pub fn with_attribution(mut self, attribution: Attribution) -> Self {
        self.attribution = Some(attribution);
        self
    }

    /// Set the modality.
    pub fn with_modality(mut self, modality: Modality) -> Self {
        self.modality = modality;
        self
    }

    /// Set the confidence.
    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    /// Resolved subject entity, if any.
    pub fn subject_entity(&self) -> Option<&EntityId> {
        self.subject.as_ref().and_then(|s| s.entity.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modality_rank_table() {
        let mut all = vec![
            Modality::Fact,
            Modality::Uncertain,
            Modality::Hypothetical,
            Modality::Plan,
            Modality::Negated,
            Modality::Claim,
            Modality::Belief,
            Modality::Rumor,
        ];
        all.sort_by_key(|m| m.uncertainty_rank());

        assert_eq!(
            all,
            vec![
                Modality::Rumor,
                Modality::Belief,
                Modality::Claim,
                Modality::Negated,
                Modality::Plan,
                Modality::Hypothetical,
                Modality::Uncertain,
                Modality::Fact,
            ]
        );
    }

    #[test]
    fn test_confidence_mean() {
        let a = Confidence::uniform(0.8);
        let b = Confidence {
            extraction: 0.4,
            ..Confidence::uniform(0.6)
        };
        let mean = Confidence::mean([&a, &b]).unwrap();

        assert!((mean.extraction - 0.6).abs() < 1e-9);
        assert!((mean.composite - 0.7).abs() < 1e-9);
        assert!(Confidence::mean(std::iter::empty()).is_none());
    }

    #[test]
    fn test_quoted_segments() {
        let span = EvidenceSpan::new(
            "ch1",
            0,
            60,
            "He said, \"Run!\" and then \u{201C}Hide the ring.\u{201D}",
        );
        assert_eq!(span.quoted_segments(), vec!["Run!", "Hide the ring."]);
    }

    #[test]
    fn test_object_string_typing() {
        assert_eq!(ObjectValue::entity("hogwarts").as_str(), Some("hogwarts"));
        assert_eq!(ObjectValue::Text("home".into()).as_entity(), Some(EntityId::from("home")));
        assert_eq!(ObjectValue::Number(3.0).as_str(), None);
        assert_eq!(ObjectValue::Flag(true).as_entity(), None);
    }

    #[test]
    fn test_span_containment() {
        let outer = EvidenceSpan::new("ch1", 10, 100, "");
        let inner = EvidenceSpan::new("ch1", 20, 40, "");
        let elsewhere = EvidenceSpan::new("ch2", 20, 40, "");

        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(!outer.contains(&elsewhere));
    }
}
