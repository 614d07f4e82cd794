//! Genogram Editor Core
//!
//! Command-based editing of a genogram (a diagram of family relationships)
//! and its canvas layout, with bounded undo/redo.
//!
//! ## Features
//!
//! - **Pure commands**: every edit is an immutable [`Command`] mapping one
//!   [`EditorState`] to the next, with an exact inverse
//! - **Undo/Redo**: bounded history, drag merging, and grouped edits
//! - **Grid layout**: node positions snap to a 30px grid, sizes are quantized
//! - **Documents**: versioned JSON snapshots that keep every id and placement
//! - **Replay**: scripted sessions driven through the same controller
//!
//! ## Architecture
//!
//! ```text
//! User Input → CommandBuilder → Command → EditorController → EditorState
//!                                                ↓
//!                                           UndoHistory
//! ```
//!
//! The controller is the only mutator of the live state.

pub mod commands;
pub mod core;
pub mod document;
pub mod layout;
pub mod model;
pub mod script;

// Re-export commonly used types
pub use crate::core::{
    ApplyOutcome, EditorConfig, EditorController, EditorState, HistoryStatus, IntegrityError,
    MergePolicy, SelectionManager, SelectionMode, UndoHistory,
};

pub use commands::{Action, Command, CommandBuilder, CommandKind};

pub use document::{Document, DocumentError};
pub use layout::{LayoutState, Placement};
pub use model::{Gender, Genogram, Person, Relationship, RelationshipKind, TextAnnotation};
pub use script::{run_script, ReplayReport, ScriptError, ScriptStep};

pub use geno_core::{EntityId, GridPoint, SizeClass, GRID_GAP};

/// Editor version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
