//! Grouped commands that undo as one step.

use super::command::Reversible;
use super::Command;
use crate::core::EditorState;

/// Ordered sequence of commands applied as one unit.
///
/// Each child was built against the state its predecessors produce. Undo
/// reverts children in reverse order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Composite {
    pub label: String,
    pub commands: Vec<Command>,
}

impl Composite {
    pub fn new(label: impl Into<String>, commands: Vec<Command>) -> Self {
        Self {
            label: label.into(),
            commands,
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Reversible for Composite {
    // All or nothing: every child must apply in sequence.
    fn applies_to(&self, state: &EditorState) -> bool {
        let mut scratch = state.clone();
        for command in &self.commands {
            if !command.applies_to(&scratch) {
                return false;
            }
            command.apply_in_place(&mut scratch);
        }
        true
    }

    fn apply(&self, state: &mut EditorState) {
        for command in &self.commands {
            command.apply_in_place(state);
        }
    }

    // Mirror of `applies_to`, walking the children backwards.
    fn reverts_on(&self, state: &EditorState) -> bool {
        let mut scratch = state.clone();
        for command in self.commands.iter().rev() {
            if !command.reverts_on(&scratch) {
                return false;
            }
            command.revert_in_place(&mut scratch);
        }
        true
    }

    fn revert(&self, state: &mut EditorState) {
        for command in self.commands.iter().rev() {
            command.revert_in_place(state);
        }
    }
}
