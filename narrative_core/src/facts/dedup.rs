//! Fact deduplication.
//!
//! Rows collapse on (subject, predicate, object, temporal class), so a
//! current and an ended row about the same triple stay distinct. Repeated
//! gain/loss cycles of the same item therefore keep only one current and
//! one ended row; the intermediate history is not represented.

use std::collections::BTreeMap;

use super::fact::{FactViewRow, TemporalClass};
use super::query_time;

type DedupKey = (String, &'static str, String, TemporalClass);

fn key_of(row: &FactViewRow) -> DedupKey {
    (
        row.subject.0.clone(),
        row.predicate.as_str(),
        row.object.to_string(),
        row.temporal_class(),
    )
}

/// Merge rows sharing a dedup key. Output is sorted by id.
pub fn dedup_facts(rows: Vec<FactViewRow>) -> Vec<FactViewRow> {
    let mut rows = rows;
    rows.sort_by(|a, b| a.id.cmp(&b.id));

    let mut merged: BTreeMap<DedupKey, FactViewRow> = BTreeMap::new();
    for row in rows {
        match merged.get_mut(&key_of(&row)) {
            Some(existing) => absorb(existing, row),
            None => {
                merged.insert(key_of(&row), row);
            }
        }
    }

    let mut facts: Vec<FactViewRow> = merged
        .into_values()
        .map(|mut row| {
            row.rehash();
            row
        })
        .collect();
    facts.sort_by(|a, b| a.id.cmp(&b.id));
    facts
}

fn absorb(existing: &mut FactViewRow, other: FactViewRow) {
    existing.derived_from.extend(other.derived_from);
    existing.confidence = existing.confidence.max(other.confidence);

    if query_time(&other.valid_from) > query_time(&existing.valid_from) {
        existing.valid_from = other.valid_from;
    }

    if let Some(until) = other.valid_until {
        let later = match &existing.valid_until {
            Some(current) => query_time(&until) > query_time(current),
            None => true,
        };
        if later {
            existing.valid_until = Some(until);
        }
    }

    existing.inference = match (existing.inference, other.inference) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
}
