//! Layout commands (move, resize).
//!
//! Both touch only the layout; the genogram is never modified here.

use geno_core::{EntityId, GridPoint, SizeClass};

use super::command::Reversible;
use crate::core::EditorState;

/// Move a node between two grid positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveNode {
    pub node: EntityId,
    pub from: GridPoint,
    pub to: GridPoint,
}

impl MoveNode {
    pub fn new(node: EntityId, from: GridPoint, to: GridPoint) -> Self {
        Self { node, from, to }
    }

    /// Contiguous moves of the same node collapse into one
    pub(crate) fn merged_with(&self, next: &MoveNode) -> Option<MoveNode> {
        if next.node != self.node || next.from != self.to {
            return None;
        }
        Some(MoveNode::new(self.node, self.from, next.to))
    }
}

impl Reversible for MoveNode {
    fn applies_to(&self, state: &EditorState) -> bool {
        self.to.is_aligned()
            && state
                .placement_of(self.node)
                .map_or(false, |placement| placement.position == self.from)
    }

    fn apply(&self, state: &mut EditorState) {
        if let Some(placement) = state.layout.get_mut(self.node) {
            placement.position = self.to;
        }
    }

    fn reverts_on(&self, state: &EditorState) -> bool {
        state
            .layout
            .get(self.node)
            .map_or(false, |placement| placement.position == self.to)
    }

    fn revert(&self, state: &mut EditorState) {
        if let Some(placement) = state.layout.get_mut(self.node) {
            placement.position = self.from;
        }
    }
}

/// Change a node's size class. The top-left corner stays put.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizeNode {
    pub node: EntityId,
    pub from: SizeClass,
    pub to: SizeClass,
}

impl ResizeNode {
    pub fn new(node: EntityId, from: SizeClass, to: SizeClass) -> Self {
        Self { node, from, to }
    }

    pub(crate) fn merged_with(&self, next: &ResizeNode) -> Option<ResizeNode> {
        if next.node != self.node || next.from != self.to {
            return None;
        }
        Some(ResizeNode::new(self.node, self.from, next.to))
    }
}

impl Reversible for ResizeNode {
    fn applies_to(&self, state: &EditorState) -> bool {
        state
            .placement_of(self.node)
            .map_or(false, |placement| placement.size == self.from)
    }

    fn apply(&self, state: &mut EditorState) {
        if let Some(placement) = state.layout.get_mut(self.node) {
            placement.size = self.to;
        }
    }

    fn reverts_on(&self, state: &EditorState) -> bool {
        state
            .layout
            .get(self.node)
            .map_or(false, |placement| placement.size == self.to)
    }

    fn revert(&self, state: &mut EditorState) {
        if let Some(placement) = state.layout.get_mut(self.node) {
            placement.size = self.from;
        }
    }
}
