//! Command pattern implementation for undo/redo support.
//!
//! Every change to the genogram or its layout is a [`Command`]: an
//! immutable value whose `execute` and `undo` are pure functions over
//! [`EditorState`](crate::core::EditorState). The controller is the only
//! place that runs them against the live state.

mod builder;
mod command;
mod composite;
mod entity_commands;
mod transform_commands;

pub use builder::CommandBuilder;
pub use command::{Action, Command, CommandKind};
pub use composite::Composite;
pub use entity_commands::{
    AddAnnotation, AddPerson, AddRelationship, DeleteEntity, EditAnnotation, Subgraph,
    UpdatePerson,
};
pub use transform_commands::{MoveNode, ResizeNode};
