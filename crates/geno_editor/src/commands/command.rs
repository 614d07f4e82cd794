//! Command envelope, the closed set of actions, and merge rules.

use geno_core::{CommandId, EntityId};

use super::{
    AddAnnotation, AddPerson, AddRelationship, Composite, DeleteEntity, EditAnnotation, MoveNode,
    ResizeNode, UpdatePerson,
};
use crate::core::{EditorState, MergePolicy};

/// Mutation primitive shared by every action.
///
/// `apply` and `revert` work in place on a scratch copy owned by
/// [`Command::execute`] / [`Command::undo`]; callers never see a partially
/// applied state.
pub(crate) trait Reversible {
    /// Precondition: the targets exist and the captured "before" data
    /// matches `state`.
    fn applies_to(&self, state: &EditorState) -> bool;

    fn apply(&self, state: &mut EditorState);

    /// Postcondition: `state` looks like the output of `apply`, so
    /// reverting it lands on a state `apply` could have started from.
    fn reverts_on(&self, state: &EditorState) -> bool;

    /// Restore every field `apply` touched and nothing else.
    fn revert(&self, state: &mut EditorState);
}

/// Discriminator for [`Action`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    AddPerson,
    UpdatePerson,
    MoveNode,
    ResizeNode,
    AddRelationship,
    DeleteEntity,
    AddAnnotation,
    EditAnnotation,
    Composite,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::AddPerson => "add_person",
            CommandKind::UpdatePerson => "update_person",
            CommandKind::MoveNode => "move_node",
            CommandKind::ResizeNode => "resize_node",
            CommandKind::AddRelationship => "add_relationship",
            CommandKind::DeleteEntity => "delete_entity",
            CommandKind::AddAnnotation => "add_annotation",
            CommandKind::EditAnnotation => "edit_annotation",
            CommandKind::Composite => "composite",
        }
    }

    /// Human-readable label for undo/redo menus
    pub fn description(&self) -> &'static str {
        match self {
            CommandKind::AddPerson => "Add Person",
            CommandKind::UpdatePerson => "Edit Person",
            CommandKind::MoveNode => "Move",
            CommandKind::ResizeNode => "Resize",
            CommandKind::AddRelationship => "Connect",
            CommandKind::DeleteEntity => "Delete",
            CommandKind::AddAnnotation => "Add Annotation",
            CommandKind::EditAnnotation => "Edit Annotation",
            CommandKind::Composite => "Group",
        }
    }
}

/// What a command does. Each variant carries only the data its
/// execute/undo pair needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    AddPerson(AddPerson),
    UpdatePerson(UpdatePerson),
    MoveNode(MoveNode),
    ResizeNode(ResizeNode),
    AddRelationship(AddRelationship),
    DeleteEntity(DeleteEntity),
    AddAnnotation(AddAnnotation),
    EditAnnotation(EditAnnotation),
    Composite(Composite),
}

macro_rules! dispatch {
    ($action:expr, $inner:ident => $body:expr) => {
        match $action {
            Action::AddPerson($inner) => $body,
            Action::UpdatePerson($inner) => $body,
            Action::MoveNode($inner) => $body,
            Action::ResizeNode($inner) => $body,
            Action::AddRelationship($inner) => $body,
            Action::DeleteEntity($inner) => $body,
            Action::AddAnnotation($inner) => $body,
            Action::EditAnnotation($inner) => $body,
            Action::Composite($inner) => $body,
        }
    };
}

impl Action {
    pub fn kind(&self) -> CommandKind {
        match self {
            Action::AddPerson(_) => CommandKind::AddPerson,
            Action::UpdatePerson(_) => CommandKind::UpdatePerson,
            Action::MoveNode(_) => CommandKind::MoveNode,
            Action::ResizeNode(_) => CommandKind::ResizeNode,
            Action::AddRelationship(_) => CommandKind::AddRelationship,
            Action::DeleteEntity(_) => CommandKind::DeleteEntity,
            Action::AddAnnotation(_) => CommandKind::AddAnnotation,
            Action::EditAnnotation(_) => CommandKind::EditAnnotation,
            Action::Composite(_) => CommandKind::Composite,
        }
    }

    /// The single entity this action is about. Composites have none.
    pub fn target(&self) -> Option<EntityId> {
        match self {
            Action::AddPerson(a) => Some(a.person.id),
            Action::UpdatePerson(a) => Some(a.after.id),
            Action::MoveNode(a) => Some(a.node),
            Action::ResizeNode(a) => Some(a.node),
            Action::AddRelationship(a) => Some(a.relationship.id),
            Action::DeleteEntity(a) => Some(a.target),
            Action::AddAnnotation(a) => Some(a.annotation.id),
            Action::EditAnnotation(a) => Some(a.after.id),
            Action::Composite(_) => None,
        }
    }

    fn applies_to(&self, state: &EditorState) -> bool {
        dispatch!(self, inner => inner.applies_to(state))
    }

    fn apply(&self, state: &mut EditorState) {
        dispatch!(self, inner => inner.apply(state))
    }

    fn reverts_on(&self, state: &EditorState) -> bool {
        dispatch!(self, inner => inner.reverts_on(state))
    }

    fn revert(&self, state: &mut EditorState) {
        dispatch!(self, inner => inner.revert(state))
    }
}

/// An atomic, reversible state transition.
///
/// Commands are immutable once built. [`Command::merge`] returns a new
/// command instead of extending an existing one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    id: CommandId,
    /// Milliseconds, from the controller clock
    issued_at: u64,
    action: Action,
}

impl Command {
    pub fn new(id: CommandId, issued_at: u64, action: Action) -> Self {
        Self {
            id,
            issued_at,
            action,
        }
    }

    pub fn id(&self) -> CommandId {
        self.id
    }

    pub fn issued_at(&self) -> u64 {
        self.issued_at
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn kind(&self) -> CommandKind {
        self.action.kind()
    }

    pub fn target(&self) -> Option<EntityId> {
        self.action.target()
    }

    pub fn description(&self) -> &str {
        match &self.action {
            Action::Composite(composite) => &composite.label,
            other => other.kind().description(),
        }
    }

    /// Whether executing against `state` would do anything.
    pub fn applies_to(&self, state: &EditorState) -> bool {
        self.action.applies_to(state)
    }

    /// Apply to `state`, returning the new state.
    ///
    /// Fails closed: when the precondition does not hold the input is
    /// returned unchanged.
    pub fn execute(&self, state: &EditorState) -> EditorState {
        let mut next = state.clone();
        if self.applies_to(state) {
            self.action.apply(&mut next);
        } else {
            log::debug!(
                "{} {} not applicable, state unchanged",
                self.kind().as_str(),
                self.id
            );
        }
        next
    }

    /// Whether `state` carries this command's effect, i.e. undoing against
    /// it would do anything.
    pub fn reverts_on(&self, state: &EditorState) -> bool {
        self.action.reverts_on(state)
    }

    /// Inverse of [`Command::execute`] for the state it produced.
    ///
    /// Fails closed like `execute`: a state that does not carry this
    /// command's effect is returned unchanged.
    pub fn undo(&self, state: &EditorState) -> EditorState {
        let mut previous = state.clone();
        if self.reverts_on(state) {
            self.action.revert(&mut previous);
        } else {
            log::debug!(
                "{} {} not in effect, nothing to undo",
                self.kind().as_str(),
                self.id
            );
        }
        previous
    }

    pub(crate) fn apply_in_place(&self, state: &mut EditorState) {
        self.action.apply(state);
    }

    pub(crate) fn revert_in_place(&self, state: &mut EditorState) {
        self.action.revert(state);
    }

    /// Whether `other`, issued right after `self`, folds into one undo step.
    pub fn can_merge(&self, other: &Command, policy: &MergePolicy) -> bool {
        self.merge(other, policy).is_some()
    }

    /// Collapse `self` followed by `other` into one command.
    ///
    /// The result undoes straight to the state before `self`. It keeps the
    /// id of `self` and the timestamp of `other`, so a continuous stroke
    /// keeps extending its window.
    pub fn merge(&self, other: &Command, policy: &MergePolicy) -> Option<Command> {
        if self.kind() != other.kind() {
            return None;
        }
        let window = policy.window_for(self.kind())?;
        if other.issued_at < self.issued_at || other.issued_at - self.issued_at > window {
            return None;
        }

        let action = match (&self.action, &other.action) {
            (Action::MoveNode(a), Action::MoveNode(b)) => Action::MoveNode(a.merged_with(b)?),
            (Action::ResizeNode(a), Action::ResizeNode(b)) => Action::ResizeNode(a.merged_with(b)?),
            (Action::UpdatePerson(a), Action::UpdatePerson(b)) => {
                Action::UpdatePerson(a.merged_with(b)?)
            }
            (Action::EditAnnotation(a), Action::EditAnnotation(b)) => {
                Action::EditAnnotation(a.merged_with(b)?)
            }
            _ => return None,
        };

        Some(Command {
            id: self.id,
            issued_at: other.issued_at,
            action,
        })
    }
}
