//! Constructs commands against the current state.
//!
//! Commands carry their own inverse data, so they have to be built while the
//! "before" values are still at hand. The builder reads the state, snaps
//! positions onto the grid, and stamps each command with an id and the
//! current time. It returns `None` for anything that would be a no-op.

use geno_core::{Clock, EntityId, GridPoint, IdSource, SizeClass};

use super::{
    Action, AddAnnotation, AddPerson, AddRelationship, Command, Composite, DeleteEntity,
    EditAnnotation, MoveNode, ResizeNode, UpdatePerson,
};
use crate::core::EditorState;
use crate::layout::Placement;
use crate::model::{Person, PersonUpdate, Relationship, RelationshipKind, TextAnnotation, TextAnnotationUpdate};

/// Command factory bound to one state snapshot.
pub struct CommandBuilder<'a> {
    state: &'a EditorState,
    ids: &'a dyn IdSource,
    clock: &'a dyn Clock,
    default_size: SizeClass,
}

impl<'a> CommandBuilder<'a> {
    pub fn new(
        state: &'a EditorState,
        ids: &'a dyn IdSource,
        clock: &'a dyn Clock,
        default_size: SizeClass,
    ) -> Self {
        Self {
            state,
            ids,
            clock,
            default_size,
        }
    }

    /// Fresh id for a new person or annotation
    pub fn new_entity_id(&self) -> EntityId {
        self.ids.entity_id()
    }

    fn stamp(&self, action: Action) -> Command {
        Command::new(self.ids.command_id(), self.clock.now_ms(), action)
    }

    /// Add `person` at `at` (snapped) with the configured default size.
    pub fn add_person(&self, person: Person, at: GridPoint) -> Option<Command> {
        self.add_person_with(person, Placement::new(at, self.default_size))
    }

    pub fn add_person_with(&self, person: Person, placement: Placement) -> Option<Command> {
        let placement = Placement::snapped(placement.position, placement.size);
        let command = self.stamp(Action::AddPerson(AddPerson::new(person, placement)));
        command.applies_to(self.state).then_some(command)
    }

    /// Add a text annotation under a fresh id.
    pub fn add_annotation(&self, content: impl Into<String>, at: GridPoint) -> Command {
        let annotation = TextAnnotation::new(self.new_entity_id(), content);
        let placement = Placement::snapped(at, self.default_size);
        self.stamp(Action::AddAnnotation(AddAnnotation::new(annotation, placement)))
    }

    pub fn add_relationship(
        &self,
        kind: RelationshipKind,
        from: EntityId,
        to: EntityId,
    ) -> Option<Command> {
        let relationship = Relationship::new(self.new_entity_id(), kind, from, to);
        let command = self.stamp(Action::AddRelationship(AddRelationship::new(relationship)));
        command.applies_to(self.state).then_some(command)
    }

    /// Move `node` to `to` (snapped). `None` if the node has no placement or
    /// would not move.
    pub fn move_node(&self, node: EntityId, to: GridPoint) -> Option<Command> {
        let from = self.state.placement_of(node)?.position;
        let to = to.snapped();
        if from == to {
            return None;
        }
        Some(self.stamp(Action::MoveNode(MoveNode::new(node, from, to))))
    }

    pub fn resize_node(&self, node: EntityId, size: SizeClass) -> Option<Command> {
        let from = self.state.placement_of(node)?.size;
        if from == size {
            return None;
        }
        Some(self.stamp(Action::ResizeNode(ResizeNode::new(node, from, size))))
    }

    pub fn update_person(&self, id: EntityId, update: &PersonUpdate) -> Option<Command> {
        let before = self.state.genogram.person(id)?;
        let after = update.apply_to(before);
        if &after == before {
            return None;
        }
        Some(self.stamp(Action::UpdatePerson(UpdatePerson::new(before.clone(), after))))
    }

    pub fn edit_annotation(&self, id: EntityId, update: &TextAnnotationUpdate) -> Option<Command> {
        let before = self.state.genogram.annotation(id)?;
        let after = update.apply_to(before);
        if &after == before {
            return None;
        }
        Some(self.stamp(Action::EditAnnotation(EditAnnotation::new(before.clone(), after))))
    }

    pub fn delete_entity(&self, id: EntityId) -> Option<Command> {
        let delete = DeleteEntity::capture(self.state, id)?;
        Some(self.stamp(Action::DeleteEntity(delete)))
    }

    /// Delete several entities as one undo step.
    ///
    /// Each deletion is captured against the state left by the previous
    /// one, so an edge already taken out with its endpoint is skipped.
    pub fn delete_entities(&self, ids: &[EntityId]) -> Option<Command> {
        let mut scratch = self.state.clone();
        let mut commands = Vec::new();
        for &id in ids {
            if let Some(delete) = DeleteEntity::capture(&scratch, id) {
                let command = self.stamp(Action::DeleteEntity(delete));
                command.apply_in_place(&mut scratch);
                commands.push(command);
            }
        }
        match commands.len() {
            0 => None,
            1 => commands.pop(),
            n => Some(self.stamp(Action::Composite(Composite::new(
                format!("Delete {n} items"),
                commands,
            )))),
        }
    }

    /// Add `child` below `parents`, linked by parent-child edges.
    pub fn add_child(&self, parents: &[EntityId], child: Person, at: GridPoint) -> Option<Command> {
        let child_id = child.id;
        let mut commands = vec![self.add_person(child, at)?];
        for &parent in parents {
            let relationship =
                Relationship::new(self.new_entity_id(), RelationshipKind::ParentChild, parent, child_id);
            commands.push(self.stamp(Action::AddRelationship(AddRelationship::new(relationship))));
        }
        self.composite("Add Child", commands)
    }

    /// Wrap already-built commands into one composite.
    ///
    /// `None` when empty or when the sequence does not apply to the
    /// current state.
    pub fn composite(&self, label: impl Into<String>, commands: Vec<Command>) -> Option<Command> {
        if commands.is_empty() {
            return None;
        }
        let command = self.stamp(Action::Composite(Composite::new(label, commands)));
        command.applies_to(self.state).then_some(command)
    }
}
