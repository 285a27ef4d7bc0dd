//! Event Compiler - promotes assertions into deduplicated, anchored events.
//!
//! The pipeline runs strictly forward:
//! 1. **Normalize**: Map each predicate to its canonical lemma
//! 2. **Classify**: Pick the event type for the lemma, or drop the assertion
//! 3. **Gate**: Block assertions that cannot safely become events
//! 4. **Build**: Turn each admitted assertion into a typed candidate
//! 5. **Merge**: Group candidates by canonical signature and fold each group
//! 6. **Anchor**: Assign discourse time and sort, UNKNOWN last

mod anchor;
mod candidates;
mod eligibility;
mod merge;
mod predicates;

pub use anchor::{anchor_events, anchor_for, sort_by_discourse};
pub use eligibility::{check_eligibility, BlockReason, Eligibility, EligibilityCounters};
pub use predicates::{classify, is_killing, normalize_predicate, transfer_direction, TransferDirection};

use serde::{Deserialize, Serialize};
use story_model::{Assertion, DocumentOrder, EntityIndex};
use tracing::{debug, info, trace};

use crate::config::CompilerConfig;
use crate::events::StoryEvent;
use candidates::{build_candidate, EventCandidate};
use merge::merge_candidates;

/// Result of one compile run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileOutput {
    /// Events in discourse order, UNKNOWN last.
    pub events: Vec<StoryEvent>,

    /// Gate tallies, present when `track_eligibility` is set.
    pub eligibility: Option<EligibilityCounters>,
}

/// The event compiler.
#[derive(Debug, Clone, Default)]
pub struct EventCompiler {
    config: CompilerConfig,
}

impl EventCompiler {
    /// Create a compiler with the given configuration.
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Create a compiler with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(CompilerConfig::default())
    }

    /// Get the active configuration.
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Run the full pipeline over an assertion snapshot.
    ///
    /// Pure: the same inputs, in any order, give the same output.
    pub fn compile(
        &self,
        assertions: &[Assertion],
        entities: &EntityIndex,
        documents: &DocumentOrder,
    ) -> CompileOutput {
        let mut counters = EligibilityCounters::default();
        let mut candidates: Vec<EventCandidate> = Vec::new();
        let mut unclassified = 0usize;

        for assertion in assertions {
            let lemma = normalize_predicate(&assertion.predicate);
            let Some(event_type) = classify(&lemma) else {
                trace!(assertion_id = %assertion.id, lemma = %lemma, "predicate maps to no event type");
                unclassified += 1;
                continue;
            };

            let verdict = check_eligibility(assertion, event_type, entities);
            counters.record(verdict);
            if let Eligibility::Block(reason) = verdict {
                debug!(assertion_id = %assertion.id, %reason, "assertion blocked from event promotion");
                continue;
            }

            trace!(assertion_id = %assertion.id, %event_type, "building event candidate");
            candidates.push(build_candidate(assertion, &lemma, event_type, entities));
        }

        let candidate_count = candidates.len();
        let mut events = anchor_events(merge_candidates(candidates), documents);
        sort_by_discourse(&mut events);

        info!(
            assertions = assertions.len(),
            unclassified,
            admitted = counters.admitted,
            blocked = counters.total_blocked(),
            candidates = candidate_count,
            events = events.len(),
            "compiled narrative events"
        );

        CompileOutput {
            events,
            eligibility: self.config.track_eligibility.then_some(counters),
        }
    }

    /// Events only, without gate tallies.
    pub fn build_events(
        &self,
        assertions: &[Assertion],
        entities: &EntityIndex,
        documents: &DocumentOrder,
    ) -> Vec<StoryEvent> {
        self.compile(assertions, entities, documents).events
    }
}

/// Compile events with the default configuration.
pub fn build_events(
    assertions: &[Assertion],
    entities: &EntityIndex,
    documents: &DocumentOrder,
) -> Vec<StoryEvent> {
    EventCompiler::with_defaults().build_events(assertions, entities, documents)
}
