//! The editor controller: sole owner and mutator of the live state.
//!
//! Every user action arrives here as a [`Command`]. The controller runs it
//! against the current state, records it in history, and keeps the
//! selection in step. Commands are processed one at a time to completion.

use std::sync::Arc;

use geno_core::{Clock, IdSource, RandomIds, SystemClock};

use super::{EditorConfig, EditorState, HistoryStatus, Recorded, SelectionManager, UndoHistory};
use crate::commands::{Command, CommandBuilder};
use crate::document::{Document, DocumentError};

/// Result of [`EditorController::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Executed and pushed as a new undo entry
    Applied,
    /// Executed and folded into the previous entry
    Merged,
    /// Executed and held by the open group
    Grouped,
    /// Precondition failed; state and history untouched
    Rejected,
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        !matches!(self, ApplyOutcome::Rejected)
    }
}

pub struct EditorController {
    state: EditorState,
    history: UndoHistory,
    selection: SelectionManager,
    config: EditorConfig,
    ids: Arc<dyn IdSource>,
    clock: Arc<dyn Clock>,
}

impl Default for EditorController {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorController {
    /// Controller with random ids and the system clock.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_sources(config, Arc::new(RandomIds), Arc::new(SystemClock))
    }

    /// Controller with injected id and time sources, for deterministic runs.
    pub fn with_sources(config: EditorConfig, ids: Arc<dyn IdSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: EditorState::new(),
            history: UndoHistory::with_capacity(config.history_limit),
            selection: SelectionManager::new(),
            config,
            ids,
            clock,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    /// Selection is view state, so callers may change it freely.
    pub fn selection_mut(&mut self) -> &mut SelectionManager {
        &mut self.selection
    }

    pub fn status(&self) -> HistoryStatus {
        self.history.status()
    }

    /// Command factory reading the current state.
    pub fn commands(&self) -> CommandBuilder<'_> {
        CommandBuilder::new(
            &self.state,
            self.ids.as_ref(),
            self.clock.as_ref(),
            self.config.default_size,
        )
    }

    /// Execute `command` and record it.
    ///
    /// A command whose precondition fails (missing target, stale capture)
    /// is logged and dropped; it never reaches history.
    pub fn apply(&mut self, command: Command) -> ApplyOutcome {
        if !command.applies_to(&self.state) {
            log::warn!(
                "Rejected {} {}: target missing or state changed since it was built",
                command.kind().as_str(),
                command.id()
            );
            return ApplyOutcome::Rejected;
        }

        self.state = command.execute(&self.state);
        let kind = command.kind();
        let outcome = match self.history.record(command, &self.config.merge) {
            Recorded::Pushed => ApplyOutcome::Applied,
            Recorded::Merged => ApplyOutcome::Merged,
            Recorded::Grouped => ApplyOutcome::Grouped,
        };
        log::debug!("{} {:?}", kind.as_str(), outcome);
        self.prune_selection();
        outcome
    }

    /// Undo the top entry. Returns false when there is nothing to undo.
    ///
    /// An open group is committed first so it undoes as a whole.
    pub fn undo(&mut self) -> bool {
        if self.history.in_group() {
            self.commit_group();
        }
        let Some(command) = self.history.pop_undo() else {
            return false;
        };
        self.state = command.undo(&self.state);
        log::debug!("Undo {}", command.description());
        self.history.push_to_redo(command);
        self.prune_selection();
        true
    }

    pub fn redo(&mut self) -> bool {
        if self.history.in_group() {
            return false;
        }
        let Some(command) = self.history.pop_redo() else {
            return false;
        };
        self.state = command.execute(&self.state);
        log::debug!("Redo {}", command.description());
        self.history.push_to_undo(command);
        self.prune_selection();
        true
    }

    /// Replace the state wholesale and forget all history.
    pub fn reset(&mut self, state: EditorState) {
        log::info!(
            "Editor reset: {} entities, {} placements",
            state.genogram.len(),
            state.layout.len()
        );
        self.state = state;
        self.history.clear();
        self.selection.clear();
    }

    pub fn begin_group(&mut self, label: impl Into<String>) {
        self.history.begin_group(label);
    }

    pub fn commit_group(&mut self) -> bool {
        self.history.commit_group()
    }

    /// Revert everything applied since `begin_group` and discard it.
    pub fn rollback_group(&mut self) -> bool {
        let Some(group) = self.history.rollback_group() else {
            return false;
        };
        for command in group.commands.iter().rev() {
            self.state = command.undo(&self.state);
        }
        log::debug!("Rolled back group {} ({} commands)", group.label, group.commands.len());
        self.prune_selection();
        true
    }

    pub fn in_group(&self) -> bool {
        self.history.in_group()
    }

    /// Current state as a saveable document.
    pub fn snapshot(&self) -> Document {
        Document::new(self.state.clone())
    }

    /// Save to `path` and clear the dirty flag.
    pub fn save_document(&mut self, path: &std::path::Path) -> Result<(), DocumentError> {
        self.snapshot().save(path)?;
        self.history.mark_saved();
        Ok(())
    }

    /// Load a document and reset onto it.
    pub fn load_document(&mut self, document: Document) {
        self.reset(document.state);
    }

    pub fn is_dirty(&self) -> bool {
        self.history.is_dirty()
    }

    fn prune_selection(&mut self) {
        let genogram = &self.state.genogram;
        let dropped = self.selection.retain(|id| genogram.contains(id));
        if dropped > 0 {
            log::debug!("Dropped {} stale ids from selection", dropped);
        }
    }
}
