//! Relationship edges between people.

use geno_core::EntityId;
use serde::{Deserialize, Serialize};

/// Kind of tie drawn between two people.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    // Unions
    Marriage,
    Partnership,
    Engagement,
    Separation,
    Divorce,
    // Lineage. `from` is the parent for ParentChild.
    ParentChild,
    Sibling,
    // Emotional ties
    Close,
    Conflict,
    Distant,
    Cutoff,
}

impl RelationshipKind {
    pub fn name(&self) -> &'static str {
        match self {
            RelationshipKind::Marriage => "marriage",
            RelationshipKind::Partnership => "partnership",
            RelationshipKind::Engagement => "engagement",
            RelationshipKind::Separation => "separation",
            RelationshipKind::Divorce => "divorce",
            RelationshipKind::ParentChild => "parent_child",
            RelationshipKind::Sibling => "sibling",
            RelationshipKind::Close => "close",
            RelationshipKind::Conflict => "conflict",
            RelationshipKind::Distant => "distant",
            RelationshipKind::Cutoff => "cutoff",
        }
    }

    pub fn is_union(&self) -> bool {
        matches!(
            self,
            RelationshipKind::Marriage
                | RelationshipKind::Partnership
                | RelationshipKind::Engagement
                | RelationshipKind::Separation
                | RelationshipKind::Divorce
        )
    }

    pub fn is_emotional(&self) -> bool {
        matches!(
            self,
            RelationshipKind::Close
                | RelationshipKind::Conflict
                | RelationshipKind::Distant
                | RelationshipKind::Cutoff
        )
    }

    /// Whether `from -> to` carries meaning (parent to child)
    pub fn is_directed(&self) -> bool {
        matches!(self, RelationshipKind::ParentChild)
    }
}

/// An edge between two people.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: EntityId,
    pub kind: RelationshipKind,
    pub from: EntityId,
    pub to: EntityId,
    #[serde(default)]
    pub memo: Option<String>,
}

impl Relationship {
    pub fn new(id: EntityId, kind: RelationshipKind, from: EntityId, to: EntityId) -> Self {
        Self {
            id,
            kind,
            from,
            to,
            memo: None,
        }
    }

    /// Whether either endpoint is `person`
    pub fn involves(&self, person: EntityId) -> bool {
        self.from == person || self.to == person
    }

    /// The endpoint opposite to `person`, if `person` is an endpoint
    pub fn other_end(&self, person: EntityId) -> Option<EntityId> {
        if self.from == person {
            Some(self.to)
        } else if self.to == person {
            Some(self.from)
        } else {
            None
        }
    }
}
