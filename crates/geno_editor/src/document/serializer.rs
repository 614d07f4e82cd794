//! Document serialization to/from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{EditorState, IntegrityError};

/// Current on-disk format
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported document format version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("document is inconsistent: {0}")]
    Integrity(#[from] IntegrityError),
}

/// Saved editor state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub format_version: u32,
    pub state: EditorState,
}

/// Read before the body so a newer format fails on its version, not on
/// whatever field changed.
#[derive(Deserialize)]
struct Header {
    format_version: u32,
}

impl Document {
    pub fn new(state: EditorState) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            state,
        }
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and check a document. Rejects unknown versions and states
    /// that break integrity.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let header: Header = serde_json::from_str(json)?;
        if header.format_version != FORMAT_VERSION {
            return Err(DocumentError::UnsupportedVersion {
                found: header.format_version,
                expected: FORMAT_VERSION,
            });
        }
        let document: Document = serde_json::from_str(json)?;
        document.state.validate()?;
        Ok(document)
    }

    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved document to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let json = std::fs::read_to_string(path)?;
        let document = Self::from_json(&json)?;
        log::info!(
            "Loaded document from {} ({} entities)",
            path.display(),
            document.state.genogram.len()
        );
        Ok(document)
    }
}
