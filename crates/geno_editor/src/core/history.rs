//! Undo/Redo history with merge and group support.
//!
//! The history only stores commands; it never runs them. The controller
//! executes a command against the live state and then records it here.
//! Commands recorded while a group is open are collected and committed as
//! one [`Composite`] entry.

use std::collections::VecDeque;

use crate::commands::{Action, Command, Composite};
use crate::core::MergePolicy;

/// Derived from the stack sizes, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryStatus {
    Idle,
    HasUndoable,
    HasRedoable,
    Both,
}

impl HistoryStatus {
    pub fn can_undo(&self) -> bool {
        matches!(self, HistoryStatus::HasUndoable | HistoryStatus::Both)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self, HistoryStatus::HasRedoable | HistoryStatus::Both)
    }
}

/// What [`UndoHistory::record`] did with a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recorded {
    /// New undo entry
    Pushed,
    /// Folded into the previous entry
    Merged,
    /// Held by the open group
    Grouped,
}

/// Commands collected between `begin_group` and `commit_group`.
#[derive(Clone, Debug)]
pub struct CommandGroup {
    pub label: String,
    pub commands: Vec<Command>,
}

impl CommandGroup {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            commands: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Bounded undo/redo stacks.
#[derive(Clone, Debug)]
pub struct UndoHistory {
    /// Oldest at the front, evicted first
    undo_stack: VecDeque<Command>,
    redo_stack: Vec<Command>,
    max_size: usize,
    current_group: Option<CommandGroup>,
    /// Changed since last save
    dirty: bool,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoHistory {
    pub const DEFAULT_MAX_SIZE: usize = 200;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_MAX_SIZE)
    }

    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
            current_group: None,
            dirty: false,
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn status(&self) -> HistoryStatus {
        match (self.undo_stack.is_empty(), self.redo_stack.is_empty()) {
            (true, true) => HistoryStatus::Idle,
            (false, true) => HistoryStatus::HasUndoable,
            (true, false) => HistoryStatus::HasRedoable,
            (false, false) => HistoryStatus::Both,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(Command::description)
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(Command::description)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Top of the undo stack
    pub fn peek_undo(&self) -> Option<&Command> {
        self.undo_stack.back()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Undo entries, oldest first
    pub fn undo_entries(&self) -> impl Iterator<Item = &Command> {
        self.undo_stack.iter()
    }

    /// Begin a group. Commands recorded until commit form one undo step.
    pub fn begin_group(&mut self, label: impl Into<String>) {
        if self.current_group.is_some() {
            log::warn!("Beginning group while one is already open, committing it first");
            self.commit_group();
        }
        self.current_group = Some(CommandGroup::new(label));
    }

    /// Close the open group and record it. Returns whether an entry was
    /// added; empty groups leave no trace.
    pub fn commit_group(&mut self) -> bool {
        match self.current_group.take() {
            Some(group) if !group.is_empty() => {
                let CommandGroup { label, mut commands } = group;
                let entry = if commands.len() == 1 {
                    commands.remove(0)
                } else {
                    let first = &commands[0];
                    let last = &commands[commands.len() - 1];
                    Command::new(
                        first.id(),
                        last.issued_at(),
                        Action::Composite(Composite::new(label, commands)),
                    )
                };
                self.push_entry(entry);
                true
            }
            _ => false,
        }
    }

    /// Close the open group without recording it, handing back its
    /// commands for the caller to revert.
    pub fn rollback_group(&mut self) -> Option<CommandGroup> {
        self.current_group.take()
    }

    pub fn in_group(&self) -> bool {
        self.current_group.is_some()
    }

    /// Record a command that has already been executed.
    ///
    /// Merging with the top entry is only attempted while nothing can be
    /// redone, so a merged entry never spans an undo.
    pub fn record(&mut self, cmd: Command, policy: &MergePolicy) -> Recorded {
        if let Some(group) = self.current_group.as_mut() {
            if let Some(last) = group.commands.last_mut() {
                if let Some(merged) = last.merge(&cmd, policy) {
                    *last = merged;
                    return Recorded::Grouped;
                }
            }
            group.commands.push(cmd);
            return Recorded::Grouped;
        }

        if self.redo_stack.is_empty() {
            if let Some(top) = self.undo_stack.back_mut() {
                if let Some(merged) = top.merge(&cmd, policy) {
                    *top = merged;
                    self.dirty = true;
                    return Recorded::Merged;
                }
            }
        }

        self.push_entry(cmd);
        Recorded::Pushed
    }

    fn push_entry(&mut self, cmd: Command) {
        self.undo_stack.push_back(cmd);
        self.redo_stack.clear();
        self.dirty = true;

        while self.undo_stack.len() > self.max_size {
            if let Some(evicted) = self.undo_stack.pop_front() {
                log::debug!("History full, evicting {}", evicted.description());
            }
        }
    }

    pub fn pop_undo(&mut self) -> Option<Command> {
        let cmd = self.undo_stack.pop_back();
        if cmd.is_some() {
            self.dirty = true;
        }
        cmd
    }

    pub fn pop_redo(&mut self) -> Option<Command> {
        let cmd = self.redo_stack.pop();
        if cmd.is_some() {
            self.dirty = true;
        }
        cmd
    }

    /// Push back after a redo. Does not clear the redo stack.
    pub fn push_to_undo(&mut self, cmd: Command) {
        self.undo_stack.push_back(cmd);
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.pop_front();
        }
        self.dirty = true;
    }

    pub fn push_to_redo(&mut self, cmd: Command) {
        self.redo_stack.push(cmd);
        self.dirty = true;
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_group = None;
        self.dirty = false;
    }
}
