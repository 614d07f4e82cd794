//! Genogram domain model.
//!
//! People, the relationships between them, and free-floating text
//! annotations. Every record carries an [`EntityId`] drawn from one shared
//! id space. Records are only created, changed or removed by commands.

mod annotation;
mod genogram;
mod person;
mod relationship;

pub use annotation::{TextAnnotation, TextAnnotationUpdate};
pub use genogram::{EntityKind, Genogram};
pub use person::{Gender, Person, PersonUpdate};
pub use relationship::{Relationship, RelationshipKind};

pub use geno_core::EntityId;
