//! Entity creation, editing, and deletion commands.

use geno_core::EntityId;

use super::command::Reversible;
use crate::core::EditorState;
use crate::layout::{LayoutState, Placement};
use crate::model::{EntityKind, Genogram, Person, Relationship, TextAnnotation};

/// Whether `id` is free in both the genogram and the layout.
fn id_is_free(state: &EditorState, id: EntityId) -> bool {
    !state.genogram.contains(id) && !state.layout.contains(id)
}

/// Add a person together with its placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddPerson {
    pub person: Person,
    pub placement: Placement,
}

impl AddPerson {
    pub fn new(person: Person, placement: Placement) -> Self {
        Self { person, placement }
    }
}

impl Reversible for AddPerson {
    fn applies_to(&self, state: &EditorState) -> bool {
        id_is_free(state, self.person.id) && self.placement.position.is_aligned()
    }

    fn apply(&self, state: &mut EditorState) {
        state.genogram.insert_person(self.person.clone());
        state.layout.insert(self.person.id, self.placement);
    }

    fn reverts_on(&self, state: &EditorState) -> bool {
        state.genogram.person(self.person.id) == Some(&self.person)
            && state.layout.get(self.person.id) == Some(&self.placement)
    }

    // Only the person and its placement. Edges added later are their own
    // commands and are undone before this one.
    fn revert(&self, state: &mut EditorState) {
        state.genogram.remove_person(self.person.id);
        state.layout.remove(self.person.id);
    }
}

/// Replace a person's attributes.
///
/// Holds the full record on both sides, so undo never has to recompute
/// anything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdatePerson {
    pub before: Person,
    pub after: Person,
}

impl UpdatePerson {
    pub fn new(before: Person, after: Person) -> Self {
        Self { before, after }
    }

    pub(crate) fn merged_with(&self, next: &UpdatePerson) -> Option<UpdatePerson> {
        if next.before != self.after {
            return None;
        }
        Some(UpdatePerson {
            before: self.before.clone(),
            after: next.after.clone(),
        })
    }
}

impl Reversible for UpdatePerson {
    fn applies_to(&self, state: &EditorState) -> bool {
        self.before.id == self.after.id && state.genogram.person(self.before.id) == Some(&self.before)
    }

    fn apply(&self, state: &mut EditorState) {
        state.genogram.insert_person(self.after.clone());
    }

    fn reverts_on(&self, state: &EditorState) -> bool {
        self.before.id == self.after.id && state.genogram.person(self.after.id) == Some(&self.after)
    }

    fn revert(&self, state: &mut EditorState) {
        state.genogram.insert_person(self.before.clone());
    }
}

/// Connect two existing people.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddRelationship {
    pub relationship: Relationship,
}

impl AddRelationship {
    pub fn new(relationship: Relationship) -> Self {
        Self { relationship }
    }
}

impl Reversible for AddRelationship {
    fn applies_to(&self, state: &EditorState) -> bool {
        let rel = &self.relationship;
        id_is_free(state, rel.id)
            && rel.from != rel.to
            && state.genogram.person(rel.from).is_some()
            && state.genogram.person(rel.to).is_some()
    }

    fn apply(&self, state: &mut EditorState) {
        state.genogram.insert_relationship(self.relationship.clone());
    }

    fn reverts_on(&self, state: &EditorState) -> bool {
        state.genogram.relationship(self.relationship.id) == Some(&self.relationship)
    }

    fn revert(&self, state: &mut EditorState) {
        state.genogram.remove_relationship(self.relationship.id);
    }
}

/// Add a text annotation together with its placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddAnnotation {
    pub annotation: TextAnnotation,
    pub placement: Placement,
}

impl AddAnnotation {
    pub fn new(annotation: TextAnnotation, placement: Placement) -> Self {
        Self {
            annotation,
            placement,
        }
    }
}

impl Reversible for AddAnnotation {
    fn applies_to(&self, state: &EditorState) -> bool {
        id_is_free(state, self.annotation.id) && self.placement.position.is_aligned()
    }

    fn apply(&self, state: &mut EditorState) {
        state.genogram.insert_annotation(self.annotation.clone());
        state.layout.insert(self.annotation.id, self.placement);
    }

    fn reverts_on(&self, state: &EditorState) -> bool {
        state.genogram.annotation(self.annotation.id) == Some(&self.annotation)
            && state.layout.get(self.annotation.id) == Some(&self.placement)
    }

    fn revert(&self, state: &mut EditorState) {
        state.genogram.remove_annotation(self.annotation.id);
        state.layout.remove(self.annotation.id);
    }
}

/// Replace an annotation's content or memo.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditAnnotation {
    pub before: TextAnnotation,
    pub after: TextAnnotation,
}

impl EditAnnotation {
    pub fn new(before: TextAnnotation, after: TextAnnotation) -> Self {
        Self { before, after }
    }

    pub(crate) fn merged_with(&self, next: &EditAnnotation) -> Option<EditAnnotation> {
        if next.before != self.after {
            return None;
        }
        Some(EditAnnotation {
            before: self.before.clone(),
            after: next.after.clone(),
        })
    }
}

impl Reversible for EditAnnotation {
    fn applies_to(&self, state: &EditorState) -> bool {
        self.before.id == self.after.id
            && state.genogram.annotation(self.before.id) == Some(&self.before)
    }

    fn apply(&self, state: &mut EditorState) {
        state.genogram.insert_annotation(self.after.clone());
    }

    fn reverts_on(&self, state: &EditorState) -> bool {
        self.before.id == self.after.id
            && state.genogram.annotation(self.after.id) == Some(&self.after)
    }

    fn revert(&self, state: &mut EditorState) {
        state.genogram.insert_annotation(self.before.clone());
    }
}

/// Everything a deletion takes out of the state.
///
/// Deleting a person also removes every relationship touching it, so a
/// delete never leaves a dangling edge behind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Subgraph {
    pub genogram: Genogram,
    pub layout: LayoutState,
}

impl Subgraph {
    /// What deleting `target` from `state` would remove, `None` if there is
    /// no such entity.
    pub fn capture(state: &EditorState, target: EntityId) -> Option<Subgraph> {
        let mut removed = Subgraph::default();
        match state.genogram.kind_of(target)? {
            EntityKind::Person => {
                let person = state.genogram.person(target)?;
                removed.genogram.insert_person(person.clone());
                for rel in state.genogram.relationships_of(target) {
                    removed.genogram.insert_relationship(rel.clone());
                }
            }
            EntityKind::Relationship => {
                let rel = state.genogram.relationship(target)?;
                removed.genogram.insert_relationship(rel.clone());
            }
            EntityKind::Annotation => {
                let annotation = state.genogram.annotation(target)?;
                removed.genogram.insert_annotation(annotation.clone());
            }
        }
        if let Some(placement) = state.layout.get(target) {
            removed.layout.insert(target, *placement);
        }
        Some(removed)
    }

    /// Number of records, layout entries excluded
    pub fn len(&self) -> usize {
        self.genogram.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genogram.is_empty()
    }
}

/// Delete an entity and everything that depends on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteEntity {
    pub target: EntityId,
    pub removed: Subgraph,
}

impl DeleteEntity {
    /// Capture the deletion of `target` against `state`.
    pub fn capture(state: &EditorState, target: EntityId) -> Option<Self> {
        Subgraph::capture(state, target).map(|removed| Self { target, removed })
    }
}

impl Reversible for DeleteEntity {
    // Stale if anything in the captured subgraph changed since capture.
    fn applies_to(&self, state: &EditorState) -> bool {
        Subgraph::capture(state, self.target).as_ref() == Some(&self.removed)
    }

    fn apply(&self, state: &mut EditorState) {
        for (id, _) in self.removed.genogram.ids() {
            state.genogram.remove_person(id);
            state.genogram.remove_relationship(id);
            state.genogram.remove_annotation(id);
        }
        for (id, _) in self.removed.layout.iter() {
            state.layout.remove(id);
        }
    }

    // Everything captured is gone, and every captured edge would land on
    // people that exist once the subgraph is back.
    fn reverts_on(&self, state: &EditorState) -> bool {
        let removed = &self.removed.genogram;
        let absent = removed.ids().all(|(id, _)| !state.genogram.contains(id))
            && self.removed.layout.iter().all(|(id, _)| !state.layout.contains(id));
        let anchored =
            |end: EntityId| removed.person(end).is_some() || state.genogram.person(end).is_some();
        absent
            && removed
                .relationships()
                .all(|rel| anchored(rel.from) && anchored(rel.to))
    }

    fn revert(&self, state: &mut EditorState) {
        for person in self.removed.genogram.people() {
            state.genogram.insert_person(person.clone());
        }
        for rel in self.removed.genogram.relationships() {
            state.genogram.insert_relationship(rel.clone());
        }
        for annotation in self.removed.genogram.annotations() {
            state.genogram.insert_annotation(annotation.clone());
        }
        for (id, placement) in self.removed.layout.iter() {
            state.layout.insert(id, *placement);
        }
    }
}
