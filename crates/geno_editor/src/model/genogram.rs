//! The family-relationship graph.

use std::collections::BTreeMap;

use geno_core::EntityId;
use serde::{Deserialize, Serialize};

use super::{Person, Relationship, TextAnnotation};

/// Which collection an id lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Person,
    Relationship,
    Annotation,
}

impl EntityKind {
    /// Whether entities of this kind own a layout placement
    pub fn is_placeable(&self) -> bool {
        !matches!(self, EntityKind::Relationship)
    }
}

/// People, relationships and annotations of one document.
///
/// Ordered maps keep iteration deterministic, so two graphs holding the same
/// records compare and serialize identically.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genogram {
    #[serde(default)]
    people: BTreeMap<EntityId, Person>,
    #[serde(default)]
    relationships: BTreeMap<EntityId, Relationship>,
    #[serde(default)]
    annotations: BTreeMap<EntityId, TextAnnotation>,
}

impl Genogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.relationships.is_empty() && self.annotations.is_empty()
    }

    /// Total number of entities of every kind
    pub fn len(&self) -> usize {
        self.people.len() + self.relationships.len() + self.annotations.len()
    }

    /// Whether `id` is taken by any entity kind
    pub fn contains(&self, id: EntityId) -> bool {
        self.kind_of(id).is_some()
    }

    pub fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        if self.people.contains_key(&id) {
            Some(EntityKind::Person)
        } else if self.relationships.contains_key(&id) {
            Some(EntityKind::Relationship)
        } else if self.annotations.contains_key(&id) {
            Some(EntityKind::Annotation)
        } else {
            None
        }
    }

    pub fn person(&self, id: EntityId) -> Option<&Person> {
        self.people.get(&id)
    }

    pub fn relationship(&self, id: EntityId) -> Option<&Relationship> {
        self.relationships.get(&id)
    }

    pub fn annotation(&self, id: EntityId) -> Option<&TextAnnotation> {
        self.annotations.get(&id)
    }

    pub fn people(&self) -> impl Iterator<Item = &Person> {
        self.people.values()
    }

    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.values()
    }

    pub fn annotations(&self) -> impl Iterator<Item = &TextAnnotation> {
        self.annotations.values()
    }

    /// Relationships with `person` at either end
    pub fn relationships_of(&self, person: EntityId) -> impl Iterator<Item = &Relationship> {
        self.relationships
            .values()
            .filter(move |rel| rel.involves(person))
    }

    /// Parents of `child` via parent-child edges
    pub fn parents_of(&self, child: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.relationships
            .values()
            .filter(move |rel| rel.kind.is_directed() && rel.to == child)
            .map(|rel| rel.from)
    }

    /// Every id with the collection it belongs to
    pub fn ids(&self) -> impl Iterator<Item = (EntityId, EntityKind)> + '_ {
        self.people
            .keys()
            .map(|id| (*id, EntityKind::Person))
            .chain(self.relationships.keys().map(|id| (*id, EntityKind::Relationship)))
            .chain(self.annotations.keys().map(|id| (*id, EntityKind::Annotation)))
    }

    // Raw map access for integrity checks.

    pub(crate) fn people_map(&self) -> &BTreeMap<EntityId, Person> {
        &self.people
    }

    pub(crate) fn relationships_map(&self) -> &BTreeMap<EntityId, Relationship> {
        &self.relationships
    }

    pub(crate) fn annotations_map(&self) -> &BTreeMap<EntityId, TextAnnotation> {
        &self.annotations
    }

    // Mutation is reserved for commands.

    pub(crate) fn insert_person(&mut self, person: Person) -> Option<Person> {
        self.people.insert(person.id, person)
    }

    pub(crate) fn remove_person(&mut self, id: EntityId) -> Option<Person> {
        self.people.remove(&id)
    }

    pub(crate) fn insert_relationship(&mut self, relationship: Relationship) -> Option<Relationship> {
        self.relationships.insert(relationship.id, relationship)
    }

    pub(crate) fn remove_relationship(&mut self, id: EntityId) -> Option<Relationship> {
        self.relationships.remove(&id)
    }

    pub(crate) fn insert_annotation(&mut self, annotation: TextAnnotation) -> Option<TextAnnotation> {
        self.annotations.insert(annotation.id, annotation)
    }

    pub(crate) fn remove_annotation(&mut self, id: EntityId) -> Option<TextAnnotation> {
        self.annotations.remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RelationshipKind;

    fn id(n: u128) -> EntityId {
        EntityId::from_u128(n)
    }

    #[test]
    fn test_shared_id_space_lookup() {
        let mut genogram = Genogram::new();
        genogram.insert_person(Person::new(id(1), "A"));
        genogram.insert_person(Person::new(id(2), "B"));
        genogram.insert_relationship(Relationship::new(id(3), RelationshipKind::Marriage, id(1), id(2)));
        genogram.insert_annotation(TextAnnotation::new(id(4), "note"));

        assert_eq!(genogram.kind_of(id(1)), Some(EntityKind::Person));
        assert_eq!(genogram.kind_of(id(3)), Some(EntityKind::Relationship));
        assert_eq!(genogram.kind_of(id(4)), Some(EntityKind::Annotation));
        assert_eq!(genogram.kind_of(id(5)), None);
        assert_eq!(genogram.len(), 4);
        assert_eq!(genogram.ids().count(), 4);
    }

    #[test]
    fn test_relationships_of_and_parents() {
        let mut genogram = Genogram::new();
        for n in 1..=3 {
            genogram.insert_person(Person::new(id(n), format!("P{n}")));
        }
        genogram.insert_relationship(Relationship::new(id(10), RelationshipKind::ParentChild, id(1), id(3)));
        genogram.insert_relationship(Relationship::new(id(11), RelationshipKind::ParentChild, id(2), id(3)));
        genogram.insert_relationship(Relationship::new(id(12), RelationshipKind::Marriage, id(1), id(2)));

        assert_eq!(genogram.relationships_of(id(1)).count(), 2);
        assert_eq!(genogram.relationships_of(id(3)).count(), 2);
        let parents: Vec<_> = genogram.parents_of(id(3)).collect();
        assert_eq!(parents, vec![id(1), id(2)]);
    }
}
