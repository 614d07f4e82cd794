//! Scripted editing sessions.
//!
//! A script is a JSON array of steps replayed through an
//! [`EditorController`], exactly as if a user had issued them. Steps name
//! entities by script-local keys; the runner binds each key to the id
//! generated when the entity is created.
//!
//! ```json
//! [
//!   { "op": "add_person", "key": "mom", "name": "Ada", "x": 0, "y": 0 },
//!   { "op": "add_person", "key": "dad", "name": "Ben", "x": 95, "y": 0 },
//!   { "op": "connect", "kind": "marriage", "from": "mom", "to": "dad" },
//!   { "op": "move", "key": "dad", "x": 120, "y": 0 },
//!   { "op": "undo" }
//! ]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use geno_core::{EntityId, GridPoint, SizeClass};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::commands::Command;
use crate::core::{ApplyOutcome, EditorController};
use crate::layout::Placement;
use crate::model::{Gender, Person, PersonUpdate, RelationshipKind, TextAnnotationUpdate};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse script: {0}")]
    Json(#[from] serde_json::Error),

    #[error("step {step}: unknown key {key:?}")]
    UnknownKey { step: usize, key: String },

    #[error("step {step}: key {key:?} is already bound")]
    DuplicateKey { step: usize, key: String },
}

/// One scripted user action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    AddPerson {
        key: String,
        name: String,
        /// Pointer coordinates, snapped on creation
        x: f32,
        y: f32,
        #[serde(default)]
        size: Option<SizeClass>,
        #[serde(default)]
        gender: Gender,
        #[serde(default)]
        birth_year: Option<i32>,
        #[serde(default)]
        death_year: Option<i32>,
        #[serde(default)]
        is_client: bool,
    },
    AddChild {
        key: String,
        name: String,
        parents: Vec<String>,
        x: f32,
        y: f32,
    },
    AddAnnotation {
        key: String,
        content: String,
        x: f32,
        y: f32,
    },
    Connect {
        #[serde(default)]
        key: Option<String>,
        kind: RelationshipKind,
        from: String,
        to: String,
    },
    Move {
        key: String,
        x: f32,
        y: f32,
    },
    Resize {
        key: String,
        size: SizeClass,
    },
    UpdatePerson {
        key: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        gender: Option<Gender>,
        #[serde(default)]
        birth_year: Option<i32>,
        #[serde(default)]
        death_year: Option<i32>,
        #[serde(default)]
        is_client: Option<bool>,
        #[serde(default)]
        memo: Option<String>,
    },
    EditAnnotation {
        key: String,
        #[serde(default)]
        content: Option<String>,
        #[serde(default)]
        memo: Option<String>,
    },
    Delete {
        keys: Vec<String>,
    },
    Undo,
    Redo,
    BeginGroup {
        label: String,
    },
    CommitGroup,
    RollbackGroup,
}

/// Counters from one replay.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub steps: usize,
    pub applied: usize,
    pub merged: usize,
    /// Steps that built no command or whose command was refused
    pub rejected: usize,
    pub undone: usize,
    pub redone: usize,
    /// Script key to entity id
    pub keys: BTreeMap<String, EntityId>,
}

pub fn parse_script(json: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>, ScriptError> {
    let json = std::fs::read_to_string(path)?;
    parse_script(&json)
}

struct Runner<'a> {
    editor: &'a mut EditorController,
    report: ReplayReport,
    step: usize,
}

impl Runner<'_> {
    fn lookup(&self, key: &str) -> Result<EntityId, ScriptError> {
        self.report
            .keys
            .get(key)
            .copied()
            .ok_or_else(|| ScriptError::UnknownKey {
                step: self.step,
                key: key.to_string(),
            })
    }

    /// Checked before a step builds anything, so a clash never reaches the editor.
    fn ensure_unbound(&self, key: &str) -> Result<(), ScriptError> {
        if self.report.keys.contains_key(key) {
            return Err(ScriptError::DuplicateKey {
                step: self.step,
                key: key.to_string(),
            });
        }
        Ok(())
    }

    fn bind(&mut self, key: &str, id: EntityId) {
        self.report.keys.insert(key.to_string(), id);
    }

    /// Apply a built command; `None` counts as a rejected step.
    fn submit(&mut self, command: Option<Command>) -> bool {
        let Some(command) = command else {
            log::warn!("Step {}: nothing to apply", self.step);
            self.report.rejected += 1;
            return false;
        };
        match self.editor.apply(command) {
            ApplyOutcome::Applied | ApplyOutcome::Grouped => {
                self.report.applied += 1;
                true
            }
            ApplyOutcome::Merged => {
                self.report.merged += 1;
                true
            }
            ApplyOutcome::Rejected => {
                self.report.rejected += 1;
                false
            }
        }
    }

    fn run(&mut self, step: &ScriptStep) -> Result<(), ScriptError> {
        match step {
            ScriptStep::AddPerson {
                key,
                name,
                x,
                y,
                size,
                gender,
                birth_year,
                death_year,
                is_client,
            } => {
                self.ensure_unbound(key)?;
                let id = self.editor.commands().new_entity_id();
                let mut person = Person::new(id, name.as_str()).with_gender(*gender);
                person.birth_year = *birth_year;
                person.death_year = *death_year;
                person.is_client = *is_client;
                let size = size.unwrap_or(self.editor.config().default_size);
                let placement = Placement::new(GridPoint::from_pointer(*x, *y), size);
                let command = self.editor.commands().add_person_with(person, placement);
                if self.submit(command) {
                    self.bind(key, id);
                }
            }
            ScriptStep::AddChild {
                key,
                name,
                parents,
                x,
                y,
            } => {
                self.ensure_unbound(key)?;
                let parents = parents
                    .iter()
                    .map(|parent| self.lookup(parent))
                    .collect::<Result<Vec<_>, _>>()?;
                let id = self.editor.commands().new_entity_id();
                let command = self.editor.commands().add_child(
                    &parents,
                    Person::new(id, name.as_str()),
                    GridPoint::from_pointer(*x, *y),
                );
                if self.submit(command) {
                    self.bind(key, id);
                }
            }
            ScriptStep::AddAnnotation { key, content, x, y } => {
                self.ensure_unbound(key)?;
                let command = self
                    .editor
                    .commands()
                    .add_annotation(content.as_str(), GridPoint::from_pointer(*x, *y));
                let id = command.target();
                if self.submit(Some(command)) {
                    if let Some(id) = id {
                        self.bind(key, id);
                    }
                }
            }
            ScriptStep::Connect { key, kind, from, to } => {
                if let Some(key) = key {
                    self.ensure_unbound(key)?;
                }
                let (from, to) = (self.lookup(from)?, self.lookup(to)?);
                let command = self.editor.commands().add_relationship(*kind, from, to);
                let id = command.as_ref().and_then(Command::target);
                if self.submit(command) {
                    if let (Some(key), Some(id)) = (key, id) {
                        self.bind(key, id);
                    }
                }
            }
            ScriptStep::Move { key, x, y } => {
                let node = self.lookup(key)?;
                let command = self
                    .editor
                    .commands()
                    .move_node(node, GridPoint::from_pointer(*x, *y));
                self.submit(command);
            }
            ScriptStep::Resize { key, size } => {
                let node = self.lookup(key)?;
                let command = self.editor.commands().resize_node(node, *size);
                self.submit(command);
            }
            ScriptStep::UpdatePerson {
                key,
                name,
                gender,
                birth_year,
                death_year,
                is_client,
                memo,
            } => {
                let id = self.lookup(key)?;
                let update = PersonUpdate {
                    name: name.clone(),
                    gender: *gender,
                    birth_year: birth_year.map(Some),
                    death_year: death_year.map(Some),
                    is_client: *is_client,
                    memo: memo.clone().map(Some),
                };
                let command = self.editor.commands().update_person(id, &update);
                self.submit(command);
            }
            ScriptStep::EditAnnotation { key, content, memo } => {
                let id = self.lookup(key)?;
                let update = TextAnnotationUpdate {
                    content: content.clone(),
                    memo: memo.clone().map(Some),
                };
                let command = self.editor.commands().edit_annotation(id, &update);
                self.submit(command);
            }
            ScriptStep::Delete { keys } => {
                let ids = keys
                    .iter()
                    .map(|key| self.lookup(key))
                    .collect::<Result<Vec<_>, _>>()?;
                let command = self.editor.commands().delete_entities(&ids);
                self.submit(command);
            }
            ScriptStep::Undo => {
                if self.editor.undo() {
                    self.report.undone += 1;
                }
            }
            ScriptStep::Redo => {
                if self.editor.redo() {
                    self.report.redone += 1;
                }
            }
            ScriptStep::BeginGroup { label } => self.editor.begin_group(label.as_str()),
            ScriptStep::CommitGroup => {
                self.editor.commit_group();
            }
            ScriptStep::RollbackGroup => {
                self.editor.rollback_group();
            }
        }
        Ok(())
    }
}

/// Replay `steps` against `editor`.
///
/// Steps that build no command (stale target, no-op move) are counted as
/// rejected and skipped. Unknown or duplicate keys abort the replay.
pub fn run_script(
    editor: &mut EditorController,
    steps: &[ScriptStep],
) -> Result<ReplayReport, ScriptError> {
    let mut runner = Runner {
        editor,
        report: ReplayReport::default(),
        step: 0,
    };
    for (index, step) in steps.iter().enumerate() {
        runner.step = index;
        runner.run(step)?;
        runner.report.steps += 1;
    }
    if runner.editor.in_group() {
        log::warn!("Script ended inside an open group, committing it");
        runner.editor.commit_group();
    }
    Ok(runner.report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EditorConfig;

    const FAMILY: &str = r#"[
        { "op": "add_person", "key": "mom", "name": "Ada", "x": 0, "y": 0, "gender": "female" },
        { "op": "add_person", "key": "dad", "name": "Ben", "x": 95, "y": 0, "size": "LARGE" },
        { "op": "connect", "key": "marriage", "kind": "marriage", "from": "mom", "to": "dad" },
        { "op": "add_child", "key": "kid", "name": "Cy", "parents": ["mom", "dad"], "x": 44, "y": 120 },
        { "op": "add_annotation", "key": "note", "content": "since 1970", "x": 0, "y": 240 },
        { "op": "update_person", "key": "kid", "birth_year": 1975 }
    ]"#;

    #[test]
    fn test_replay_builds_family() {
        let steps = parse_script(FAMILY).unwrap();
        let mut editor = EditorController::new(EditorConfig::default());
        let report = run_script(&mut editor, &steps).unwrap();

        assert_eq!(report.steps, 6);
        assert_eq!(report.applied, 6);
        assert_eq!(report.rejected, 0);

        let state = editor.state();
        let kid = report.keys["kid"];
        assert_eq!(state.genogram.parents_of(kid).count(), 2);
        assert_eq!(state.genogram.person(kid).unwrap().birth_year, Some(1975));
        assert_eq!(state.placement_of(kid).unwrap().position, GridPoint::new(30, 120));
        assert_eq!(state.placement_of(report.keys["dad"]).unwrap().size, SizeClass::Large);
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_unknown_key_aborts() {
        let steps = parse_script(r#"[{ "op": "move", "key": "ghost", "x": 0, "y": 0 }]"#).unwrap();
        let mut editor = EditorController::default();
        let err = run_script(&mut editor, &steps).unwrap_err();
        assert!(matches!(err, ScriptError::UnknownKey { step: 0, .. }));
    }

    #[test]
    fn test_duplicate_key_aborts_before_applying() {
        let steps = parse_script(
            r#"[
                { "op": "add_person", "key": "a", "name": "A", "x": 0, "y": 0 },
                { "op": "add_person", "key": "b", "name": "B", "x": 90, "y": 0 },
                { "op": "add_annotation", "key": "a", "content": "clash", "x": 0, "y": 120 }
            ]"#,
        )
        .unwrap();
        let mut editor = EditorController::default();
        let err = run_script(&mut editor, &steps).unwrap_err();
        assert!(matches!(err, ScriptError::DuplicateKey { step: 2, .. }));
        assert_eq!(editor.state().genogram.len(), 2);
        assert_eq!(editor.history().undo_count(), 2);

        let steps = parse_script(
            r#"[
                { "op": "add_person", "key": "a", "name": "A", "x": 0, "y": 0 },
                { "op": "add_person", "key": "b", "name": "B", "x": 90, "y": 0 },
                { "op": "connect", "key": "b", "kind": "sibling", "from": "a", "to": "b" }
            ]"#,
        )
        .unwrap();
        let mut editor = EditorController::default();
        let err = run_script(&mut editor, &steps).unwrap_err();
        assert!(matches!(err, ScriptError::DuplicateKey { step: 2, .. }));
        assert_eq!(editor.state().genogram.relationships().count(), 0);
    }

    #[test]
    fn test_rejected_steps_are_counted() {
        let steps = parse_script(
            r#"[
                { "op": "add_person", "key": "a", "name": "A", "x": 0, "y": 0 },
                { "op": "delete", "keys": ["a"] },
                { "op": "move", "key": "a", "x": 60, "y": 0 },
                { "op": "undo" },
                { "op": "undo" },
                { "op": "undo" },
                { "op": "redo" }
            ]"#,
        )
        .unwrap();
        let mut editor = EditorController::default();
        let report = run_script(&mut editor, &steps).unwrap();

        assert_eq!(report.applied, 2);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.undone, 2);
        assert_eq!(report.redone, 1);
        assert!(editor.state().genogram.person(report.keys["a"]).is_some());
    }

    #[test]
    fn test_open_group_is_committed_at_end() {
        let steps = parse_script(
            r#"[
                { "op": "begin_group", "label": "Pair" },
                { "op": "add_person", "key": "a", "name": "A", "x": 0, "y": 0 },
                { "op": "add_person", "key": "b", "name": "B", "x": 90, "y": 0 }
            ]"#,
        )
        .unwrap();
        let mut editor = EditorController::default();
        run_script(&mut editor, &steps).unwrap();
        assert!(!editor.in_group());
        assert_eq!(editor.history().undo_count(), 1);
    }
}
