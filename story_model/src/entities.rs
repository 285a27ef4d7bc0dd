//! Entity definitions as resolved by the upstream pipeline.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of a resolved entity, as assigned upstream.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub String);

impl EntityId {
    /// Create an entity id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Types of entities in a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Person,
    Place,
    Creature,
    Group,
    Organization,
    Item,
    Vehicle,
    Other,
}

impl EntityType {
    /// Map an upstream NER label (PER, LOC, GPE, ...) onto an entity type.
    pub fn from_ner_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "PER" | "PERSON" => EntityType::Person,
            "LOC" | "GPE" | "FAC" | "PLACE" => EntityType::Place,
            "ORG" | "ORGANIZATION" => EntityType::Organization,
            "NORP" | "GROUP" => EntityType::Group,
            "VEH" | "VEHICLE" => EntityType::Vehicle,
            "CREATURE" | "ANIMAL" => EntityType::Creature,
            "ITEM" | "OBJECT" | "ARTIFACT" => EntityType::Item,
            _ => EntityType::Other,
        }
    }

    /// Living beings that can be addressed, attacked or met.
    pub fn is_animate(&self) -> bool {
        matches!(self, EntityType::Person | EntityType::Creature)
    }
}

/// A resolved entity. Only its type is consulted by the compiler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Coarse category of the entity.
    pub entity_type: EntityType,
    /// Canonical display name.
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Whatever else upstream attached (gender, mention counts, ...).
    #[serde(default)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Entity {
    /// Create a new entity.
    pub fn new(id: impl Into<String>, entity_type: EntityType, name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(id),
            entity_type,
            name: name.into(),
            aliases: Vec::new(),
            extra: HashMap::new(),
        }
    }

    /// Add an alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Attach a free-form attribute.
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Entity lookup handed over by entity resolution.
///
/// References to ids that are not in the index are tolerated everywhere;
/// dangling references are a data-quality concern, not a processing error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityIndex {
    entities: HashMap<EntityId, Entity>,
}

impl EntityIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity, replacing any previous entry with the same id.
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let id = entity.id.clone();
        self.entities.insert(id.clone(), entity);
        id
    }

    /// Add an entity.
    pub fn with(mut self, entity: Entity) -> Self {
        self.insert(entity);
        self
    }

    /// Look up an entity by id.
    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Type of a known entity.
    pub fn entity_type(&self, id: &EntityId) -> Option<EntityType> {
        self.entities.get(id).map(|e| e.entity_type)
    }

    /// Check whether `id` resolves to an entity of the given type.
    pub fn is_type(&self, id: &EntityId, entity_type: EntityType) -> bool {
        self.entity_type(id) == Some(entity_type)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl FromIterator<Entity> for EntityIndex {
    fn from_iter<T: IntoIterator<Item = Entity>>(iter: T) -> Self {
        let mut index = EntityIndex::new();
        for entity in iter {
            index.insert(entity);
        }
        index
    }
}
