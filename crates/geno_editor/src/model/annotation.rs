//! Free-floating text annotations.

use geno_core::EntityId;
use serde::{Deserialize, Serialize};

/// A text note placed on the canvas.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextAnnotation {
    /// Immutable once created
    pub id: EntityId,
    pub content: String,
    #[serde(default)]
    pub memo: Option<String>,
}

impl TextAnnotation {
    pub fn new(id: EntityId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            memo: None,
        }
    }
}

/// Partial change to a [`TextAnnotation`], every field except the id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextAnnotationUpdate {
    pub content: Option<String>,
    /// `Some(None)` clears the memo
    pub memo: Option<Option<String>>,
}

impl TextAnnotationUpdate {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            memo: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.memo.is_none()
    }

    pub fn apply_to(&self, annotation: &TextAnnotation) -> TextAnnotation {
        let mut next = annotation.clone();
        if let Some(content) = &self.content {
            next.content = content.clone();
        }
        if let Some(memo) = &self.memo {
            next.memo = memo.clone();
        }
        next
    }
}
