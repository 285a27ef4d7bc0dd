//! Eligibility gate: which assertions may become events.

use serde::{Deserialize, Serialize};
use story_model::{Assertion, EntityIndex, EntityType, Modality};

use crate::events::EventType;

/// Subject forms that need coreference before they mean anything.
const UNRESOLVED_PRONOUNS: &[&str] = &[
    "he", "she", "it", "they", "him", "her", "them", "his", "hers", "its", "their", "theirs", "i",
    "me", "we", "us", "you", "this", "that", "these", "those", "who", "whom",
];

/// Subjects that stand for an unspecified group rather than an entity.
const GROUP_PLACEHOLDERS: &[&str] = &[
    "everyone", "everybody", "someone", "somebody", "anyone", "anybody", "nobody", "no one", "all",
    "people", "others", "the others", "the crowd", "the group", "many", "some",
];

/// Why an assertion was kept out of event promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockReason {
    MissingSubject,
    UnresolvedPronoun,
    GroupPlaceholder,
    MissingObject,
    /// Soft block; reserved for a future non-event concept.
    Negated,
}

impl BlockReason {
    /// Whether the reason blocks the assertion outright.
    pub fn is_hard(&self) -> bool {
        !matches!(self, BlockReason::Negated)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockReason::MissingSubject => "missingSubject",
            BlockReason::UnresolvedPronoun => "unresolvedPronoun",
            BlockReason::GroupPlaceholder => "groupPlaceholder",
            BlockReason::MissingObject => "missingObject",
            BlockReason::Negated => "negated",
        }
    }
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gate verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Admit,
    Block(BlockReason),
}

/// Per-reason tallies of gate verdicts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityCounters {
    /// Assertions that passed the gate.
    pub admitted: usize,
    pub missing_subject: usize,
    pub unresolved_pronoun: usize,
    pub group_placeholder: usize,
    pub missing_object: usize,
    pub negated: usize,
}

impl EligibilityCounters {
    /// Count one gate verdict.
    pub fn record(&mut self, verdict: Eligibility) {
        match verdict {
            Eligibility::Admit => self.admitted += 1,
            Eligibility::Block(reason) => *self.slot(reason) += 1,
        }
    }

    /// Blocked assertions for one reason.
    pub fn count(&self, reason: BlockReason) -> usize {
        match reason {
            BlockReason::MissingSubject => self.missing_subject,
            BlockReason::UnresolvedPronoun => self.unresolved_pronoun,
            BlockReason::GroupPlaceholder => self.group_placeholder,
            BlockReason::MissingObject => self.missing_object,
            BlockReason::Negated => self.negated,
        }
    }

    /// Blocked assertions across every reason.
    pub fn total_blocked(&self) -> usize {
        self.missing_subject
            + self.unresolved_pronoun
            + self.group_placeholder
            + self.missing_object
            + self.negated
    }

    fn slot(&mut self, reason: BlockReason) -> &mut usize {
        match reason {
            BlockReason::MissingSubject => &mut self.missing_subject,
            BlockReason::UnresolvedPronoun => &mut self.unresolved_pronoun,
            BlockReason::GroupPlaceholder => &mut self.group_placeholder,
            BlockReason::MissingObject => &mut self.missing_object,
            BlockReason::Negated => &mut self.negated,
        }
    }
}

/// Decide whether `assertion`, classified as `event_type`, may become an
/// event candidate. Total: every input yields a verdict.
pub fn check_eligibility(
    assertion: &Assertion,
    event_type: EventType,
    entities: &EntityIndex,
) -> Eligibility {
    let Some(subject) = assertion.subject.as_ref() else {
        return Eligibility::Block(BlockReason::MissingSubject);
    };
    let text = subject.text.trim().to_lowercase();
    if text.is_empty() && subject.entity.is_none() {
        return Eligibility::Block(BlockReason::MissingSubject);
    }

    if subject.entity.is_none() && UNRESOLVED_PRONOUNS.contains(&text.as_str()) {
        return Eligibility::Block(BlockReason::UnresolvedPronoun);
    }

    if GROUP_PLACEHOLDERS.contains(&text.as_str()) {
        let typed_group = subject
            .entity
            .as_ref()
            .is_some_and(|id| entities.is_type(id, EntityType::Group));
        if !typed_group {
            return Eligibility::Block(BlockReason::GroupPlaceholder);
        }
    }

    let object_ok = match event_type {
        EventType::Move => assertion.object.as_ref().and_then(|o| o.as_str()).is_some(),
        EventType::Transfer => assertion.object.is_some(),
        _ => true,
    };
    if !object_ok {
        return Eligibility::Block(BlockReason::MissingObject);
    }

    if assertion.modality == Modality::Negated {
        return Eligibility::Block(BlockReason::Negated);
    }

    Eligibility::Admit
}
