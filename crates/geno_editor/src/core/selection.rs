//! Canvas selection.
//!
//! Selection is view state: it is never recorded in history, and the
//! controller prunes it whenever an undo, redo or delete removes a
//! selected entity.

use geno_core::EntityId;

/// How a pick combines with the current selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Plain click
    #[default]
    Replace,
    /// Shift+click
    Add,
    /// Ctrl+click
    Remove,
    /// Ctrl+Shift+click
    Toggle,
}

/// Selected entities in pick order, plus the primary (most recent) one.
#[derive(Clone, Debug, Default)]
pub struct SelectionManager {
    selected: Vec<EntityId>,
    primary: Option<EntityId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary(&self) -> Option<EntityId> {
        self.primary
    }

    pub fn selected(&self) -> &[EntityId] {
        &self.selected
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_selected(&self, id: EntityId) -> bool {
        self.selected.contains(&id)
    }

    pub fn select(&mut self, id: EntityId, mode: SelectionMode) {
        match mode {
            SelectionMode::Replace => {
                self.selected.clear();
                self.selected.push(id);
                self.primary = Some(id);
            }
            SelectionMode::Add => {
                if !self.selected.contains(&id) {
                    self.selected.push(id);
                }
                self.primary = Some(id);
            }
            SelectionMode::Remove => self.drop_id(id),
            SelectionMode::Toggle => {
                if self.selected.contains(&id) {
                    self.drop_id(id);
                } else {
                    self.selected.push(id);
                    self.primary = Some(id);
                }
            }
        }
    }

    /// Replace the selection with `ids`; the last one becomes primary.
    pub fn select_multiple(&mut self, ids: impl IntoIterator<Item = EntityId>) {
        self.selected.clear();
        for id in ids {
            if !self.selected.contains(&id) {
                self.selected.push(id);
            }
        }
        self.primary = self.selected.last().copied();
    }

    pub fn clear(&mut self) {
        if !self.selected.is_empty() {
            self.selected.clear();
            self.primary = None;
        }
    }

    /// Keep only ids for which `keep` holds. Returns how many were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(EntityId) -> bool) -> usize {
        let before = self.selected.len();
        self.selected.retain(|&id| keep(id));
        let dropped = before - self.selected.len();
        if self.primary.map_or(false, |id| !self.selected.contains(&id)) {
            self.primary = self.selected.last().copied();
        }
        dropped
    }

    fn drop_id(&mut self, id: EntityId) {
        self.selected.retain(|&e| e != id);
        if self.primary == Some(id) {
            self.primary = self.selected.last().copied();
        }
    }
}
