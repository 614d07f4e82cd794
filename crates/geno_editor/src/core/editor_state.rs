//! Editor state - the snapshot every command transforms.
//!
//! `EditorState` is a plain value: commands take one by reference and
//! return a new one. Integrity checks live here so that document loading
//! and tests share one definition of a well-formed state.

use geno_core::EntityId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::{LayoutState, Placement};
use crate::model::{EntityKind, Genogram};

/// Broken invariant in an [`EditorState`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("relationship {relationship} references missing person {missing}")]
    DanglingRelationship {
        relationship: EntityId,
        missing: EntityId,
    },

    #[error("relationship {0} connects a person to itself")]
    SelfRelationship(EntityId),

    #[error("layout entry {0} has no matching person or annotation")]
    OrphanPlacement(EntityId),

    #[error("{0} has no layout entry")]
    MissingPlacement(EntityId),

    #[error("layout entry {0} is not aligned to the grid")]
    MisalignedPlacement(EntityId),

    #[error("record stored under {key} carries id {record}")]
    KeyMismatch { key: EntityId, record: EntityId },

    #[error("id {0} is used by more than one entity")]
    DuplicateId(EntityId),
}

/// Combined family graph and layout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorState {
    #[serde(default)]
    pub genogram: Genogram,
    #[serde(default)]
    pub layout: LayoutState,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.genogram.is_empty() && self.layout.is_empty()
    }

    /// Placement of an entity that owns one.
    ///
    /// Returns `None` when the entity does not exist or is a relationship.
    ///
    /// # Panics
    ///
    /// Panics if a person or annotation exists without a layout entry. That
    /// state can only come from a defect in a command, and continuing would
    /// corrupt the document.
    pub fn placement_of(&self, id: EntityId) -> Option<&Placement> {
        match self.genogram.kind_of(id) {
            Some(kind) if kind.is_placeable() => match self.layout.get(id) {
                Some(placement) => Some(placement),
                None => panic!("{id} exists in the genogram without a layout entry"),
            },
            _ => None,
        }
    }

    /// Every broken invariant, in a stable order.
    pub fn violations(&self) -> Vec<IntegrityError> {
        let mut errors = Vec::new();
        let genogram = &self.genogram;

        for (key, person) in genogram.people_map() {
            if *key != person.id {
                errors.push(IntegrityError::KeyMismatch { key: *key, record: person.id });
            }
        }
        for (key, annotation) in genogram.annotations_map() {
            if *key != annotation.id {
                errors.push(IntegrityError::KeyMismatch { key: *key, record: annotation.id });
            }
        }
        for (key, rel) in genogram.relationships_map() {
            if *key != rel.id {
                errors.push(IntegrityError::KeyMismatch { key: *key, record: rel.id });
            }
            if rel.from == rel.to {
                errors.push(IntegrityError::SelfRelationship(rel.id));
            }
            for end in [rel.from, rel.to] {
                if genogram.person(end).is_none() {
                    errors.push(IntegrityError::DanglingRelationship {
                        relationship: rel.id,
                        missing: end,
                    });
                }
            }
        }

        // One id space across all collections
        let mut seen = std::collections::BTreeSet::new();
        for (id, _) in genogram.ids() {
            if !seen.insert(id) {
                errors.push(IntegrityError::DuplicateId(id));
            }
        }

        for (id, kind) in genogram.ids() {
            if kind.is_placeable() && !self.layout.contains(id) {
                errors.push(IntegrityError::MissingPlacement(id));
            }
        }

        for (id, placement) in self.layout.iter() {
            match genogram.kind_of(id) {
                Some(kind) if kind.is_placeable() => {}
                _ => errors.push(IntegrityError::OrphanPlacement(id)),
            }
            if !placement.position.is_aligned() {
                errors.push(IntegrityError::MisalignedPlacement(id));
            }
        }

        errors
    }

    /// First broken invariant, if any.
    pub fn validate(&self) -> Result<(), IntegrityError> {
        match self.violations().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        self.genogram.kind_of(id)
    }
}
