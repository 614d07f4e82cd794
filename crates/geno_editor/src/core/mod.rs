//! Core editor types and state management.
//!
//! `EditorState` is the value every command transforms; the controller
//! owns the live copy together with its history, selection and config.

mod config;
mod controller;
pub mod editor_state;
mod history;
mod selection;

pub use config::{ConfigError, EditorConfig, MergePolicy, CONFIG_PATH_ENV, HISTORY_LIMIT_ENV};
pub use controller::{ApplyOutcome, EditorController};
pub use editor_state::{EditorState, IntegrityError};
pub use history::{CommandGroup, HistoryStatus, Recorded, UndoHistory};
pub use selection::{SelectionManager, SelectionMode};
