//! Pure queries over a fact set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use story_model::EntityId;

use super::fact::{FactObject, FactPredicate, FactViewRow};
use super::{query_time, QueryTime};

/// Answer to "who holds this item now?".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "holders", rename_all = "snake_case")]
pub enum CurrentHolder {
    Nobody,
    Holder(EntityId),
    /// More than one subject currently holds the item. Sorted.
    Contested(Vec<EntityId>),
}

/// Read-only view over derived facts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactIndex {
    facts: Vec<FactViewRow>,
}

impl FactIndex {
    /// Index a fact set, sorted by id.
    pub fn new(facts: Vec<FactViewRow>) -> Self {
        let mut facts = facts;
        facts.sort_by(|a, b| a.id.cmp(&b.id));
        Self { facts }
    }

    /// Every row, sorted by id.
    pub fn facts(&self) -> &[FactViewRow] {
        &self.facts
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Every row about `entity`, sorted by id.
    pub fn facts_about(&self, entity: &EntityId) -> Vec<&FactViewRow> {
        self.facts.iter().filter(|f| &f.subject == entity).collect()
    }

    /// Destination of the latest `located_in` row.
    pub fn current_location(&self, entity: &EntityId) -> Option<&EntityId> {
        self.rows(entity, FactPredicate::LocatedIn)
            .filter(|f| f.valid_until.is_none())
            .max_by(|a, b| {
                query_time(&a.valid_from)
                    .cmp(&query_time(&b.valid_from))
                    .then_with(|| a.id.cmp(&b.id))
            })
            .and_then(|f| f.object.as_entity())
    }

    /// Alive unless an `alive = false` row exists.
    pub fn is_alive(&self, entity: &EntityId) -> bool {
        !self
            .rows(entity, FactPredicate::Alive)
            .any(|f| f.object == FactObject::Boolean(false))
    }

    /// Items whose latest gain comes after their latest loss. Sorted.
    pub fn current_possessions(&self, entity: &EntityId) -> Vec<EntityId> {
        let mut by_item: BTreeMap<&EntityId, Holding> = BTreeMap::new();
        for fact in self.rows(entity, FactPredicate::Possesses) {
            if let Some(item) = fact.object.as_entity() {
                by_item.entry(item).or_default().observe(fact);
            }
        }
        by_item
            .into_iter()
            .filter(|(_, holding)| holding.is_current())
            .map(|(item, _)| item.clone())
            .collect()
    }

    /// Who currently holds `item`.
    pub fn current_holder(&self, item: &EntityId) -> CurrentHolder {
        let mut by_subject: BTreeMap<&EntityId, Holding> = BTreeMap::new();
        for fact in &self.facts {
            if fact.predicate == FactPredicate::Possesses && fact.object.as_entity() == Some(item) {
                by_subject.entry(&fact.subject).or_default().observe(fact);
            }
        }

        let mut holders: Vec<EntityId> = by_subject
            .into_iter()
            .filter(|(_, holding)| holding.is_current())
            .map(|(subject, _)| subject.clone())
            .collect();

        match holders.len() {
            0 => CurrentHolder::Nobody,
            1 => CurrentHolder::Holder(holders.remove(0)),
            _ => CurrentHolder::Contested(holders),
        }
    }

    fn rows(&self, entity: &EntityId, predicate: FactPredicate) -> impl Iterator<Item = &FactViewRow> + '_ {
        let entity = entity.clone();
        self.facts
            .iter()
            .filter(move |f| f.subject == entity && f.predicate == predicate)
    }
}

/// Latest gain and loss times for one (subject, item) pair.
#[derive(Default)]
struct Holding {
    gained: Option<QueryTime>,
    lost: Option<QueryTime>,
}

impl Holding {
    fn observe(&mut self, fact: &FactViewRow) {
        match &fact.valid_until {
            None => self.gained = self.gained.max(Some(query_time(&fact.valid_from))),
            Some(until) => self.lost = self.lost.max(Some(query_time(until))),
        }
    }

    fn is_current(&self) -> bool {
        match (self.gained, self.lost) {
            (Some(_), None) => true,
            (Some(gained), Some(lost)) => gained > lost,
            (None, _) => false,
        }
    }
}
