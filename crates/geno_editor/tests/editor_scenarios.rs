//! End-to-end editing sessions through the controller

use std::sync::Arc;

use geno_core::{EntityId, GridPoint, ManualClock, SequentialIds, SizeClass, GRID_GAP};
use geno_editor::commands::{Action, AddPerson, AddRelationship, Composite};
use geno_editor::core::{
    ApplyOutcome, EditorConfig, EditorController, EditorState, HistoryStatus, SelectionMode,
};
use geno_editor::model::{Person, Relationship, RelationshipKind};
use geno_editor::script::{parse_script, run_script};
use geno_editor::{Command, Document, Placement};

fn editor_with(config: EditorConfig) -> (EditorController, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(0));
    let editor = EditorController::with_sources(
        config,
        Arc::new(SequentialIds::starting_at(1000)),
        clock.clone(),
    );
    (editor, clock)
}

fn add_person(editor: &mut EditorController, id: EntityId, name: &str, at: GridPoint) {
    let cmd = editor
        .commands()
        .add_person(Person::new(id, name), at)
        .expect("id is free");
    assert_eq!(editor.apply(cmd), ApplyOutcome::Applied);
}

#[test]
fn create_connect_delete_then_undo_back_to_empty() {
    let (mut editor, _) = editor_with(EditorConfig::default());
    let n1 = EntityId::from_u128(1);
    let n2 = EntityId::from_u128(2);

    add_person(&mut editor, n1, "A", GridPoint::new(0, 0));
    add_person(&mut editor, n2, "B", GridPoint::new(90, 0));
    let edge = editor
        .commands()
        .add_relationship(RelationshipKind::Marriage, n1, n2)
        .unwrap();
    editor.apply(edge);
    let delete = editor.commands().delete_entity(n1).unwrap();
    editor.apply(delete);

    let state = editor.state();
    assert!(state.genogram.person(n1).is_none());
    assert!(state.genogram.relationships().all(|rel| !rel.involves(n1)));
    assert!(state.genogram.person(n2).is_some());
    assert!(state.layout.get(n1).is_none());

    // Delete, connect, create B
    for _ in 0..3 {
        assert!(editor.undo());
    }
    let only_a: Vec<_> = editor.state().genogram.people().map(|p| p.id).collect();
    assert_eq!(only_a, vec![n1]);
    assert_eq!(editor.state().genogram.relationships().count(), 0);

    assert!(editor.undo());
    assert_eq!(editor.state(), &EditorState::new());
    assert_eq!(editor.status(), HistoryStatus::HasRedoable);
    assert!(!editor.undo());

    for _ in 0..4 {
        assert!(editor.redo());
    }
    assert!(editor.state().genogram.person(n1).is_none());
    assert!(editor.state().genogram.person(n2).is_some());
}

#[test]
fn history_keeps_only_the_most_recent_entries() {
    let config = EditorConfig {
        history_limit: 200,
        ..EditorConfig::default()
    };
    let (mut editor, _) = editor_with(config);

    let mut targets = Vec::new();
    for i in 0..1000 {
        let cmd = editor
            .commands()
            .add_annotation(format!("note {i}"), GridPoint::new((i % 40) * GRID_GAP, (i / 40) * GRID_GAP));
        targets.push(cmd.target().unwrap());
        assert_eq!(editor.apply(cmd), ApplyOutcome::Applied);
    }

    assert_eq!(editor.history().undo_count(), 200);
    let retained: Vec<_> = editor
        .history()
        .undo_entries()
        .filter_map(Command::target)
        .collect();
    assert_eq!(retained, targets[800..]);

    while editor.undo() {}
    // The evicted 800 stay applied
    assert_eq!(editor.state().genogram.len(), 800);
}

#[test]
fn default_nodes_sit_on_the_grid() {
    let (mut editor, _) = editor_with(EditorConfig::default());
    let pointers = [(0.0, 0.0), (14.9, 15.0), (47.0, 91.0), (-44.0, 200.5), (1000.0, 333.3)];

    for (x, y) in pointers {
        let id = editor.commands().new_entity_id();
        add_person(&mut editor, id, "P", GridPoint::from_pointer(x, y));
        let placement = editor.state().placement_of(id).unwrap();
        let bounds = placement.bounds();

        assert_eq!(placement.size, SizeClass::Default);
        assert_eq!((bounds.width, bounds.height), (60, 60));
        assert_eq!(placement.position.x % GRID_GAP, 0);
        assert_eq!(placement.position.y % GRID_GAP, 0);
    }
    assert!(editor.state().validate().is_ok());
}

#[test]
fn composite_applies_in_order_and_undoes_in_reverse() {
    let (mut editor, _) = editor_with(EditorConfig::default());
    let parent = EntityId::from_u128(10);
    add_person(&mut editor, parent, "Parent", GridPoint::new(0, 0));

    let child = EntityId::from_u128(11);
    let add_child = Command::new(
        geno_core::CommandId::from_u128(1),
        0,
        Action::AddPerson(AddPerson::new(
            Person::new(child, "Child"),
            Placement::new(GridPoint::new(0, 120), SizeClass::Default),
        )),
    );
    let add_edge = Command::new(
        geno_core::CommandId::from_u128(2),
        0,
        Action::AddRelationship(AddRelationship::new(Relationship::new(
            EntityId::from_u128(12),
            RelationshipKind::ParentChild,
            parent,
            child,
        ))),
    );

    // The edge alone references a node that does not exist yet
    assert!(!add_edge.applies_to(editor.state()));

    let before = editor.state().clone();
    let composite = editor
        .commands()
        .composite("Add child", vec![add_child.clone(), add_edge.clone()])
        .unwrap();
    assert_eq!(editor.apply(composite), ApplyOutcome::Applied);
    assert!(editor.state().validate().is_ok());

    // Forward-order removal strands the edge
    let stranded = add_child.undo(editor.state());
    assert!(stranded.validate().is_err());

    assert!(editor.undo());
    assert_eq!(editor.state(), &before);

    // Reversed order cannot apply at all
    let reversed = Command::new(
        geno_core::CommandId::from_u128(3),
        0,
        Action::Composite(Composite::new("backwards", vec![add_edge, add_child])),
    );
    assert_eq!(editor.apply(reversed), ApplyOutcome::Rejected);
    assert_eq!(editor.state(), &before);
}

#[test]
fn drag_collapses_into_one_undo_step() {
    let (mut editor, clock) = editor_with(EditorConfig::default());
    let node = EntityId::from_u128(1);
    add_person(&mut editor, node, "A", GridPoint::new(0, 0));
    clock.advance(1_000);

    let mut outcomes = Vec::new();
    for step in 1..=10 {
        let cmd = editor
            .commands()
            .move_node(node, GridPoint::from_pointer(step as f32 * 31.0, 0.0))
            .unwrap();
        outcomes.push(editor.apply(cmd));
        clock.advance(16);
    }
    assert_eq!(outcomes[0], ApplyOutcome::Applied);
    assert!(outcomes[1..].iter().all(|o| *o == ApplyOutcome::Merged));
    assert_eq!(editor.history().undo_count(), 2);

    editor.undo();
    assert_eq!(
        editor.state().placement_of(node).unwrap().position,
        GridPoint::new(0, 0)
    );

    // A redo followed by more dragging must not fold into the redone entry
    editor.redo();
    editor.undo();
    let cmd = editor.commands().move_node(node, GridPoint::new(30, 30)).unwrap();
    assert_eq!(editor.apply(cmd), ApplyOutcome::Applied);
    assert_eq!(editor.history().redo_count(), 0);
}

#[test]
fn selection_follows_deletes_and_undo() {
    let (mut editor, _) = editor_with(EditorConfig::default());
    let a = EntityId::from_u128(1);
    let b = EntityId::from_u128(2);
    add_person(&mut editor, a, "A", GridPoint::new(0, 0));
    add_person(&mut editor, b, "B", GridPoint::new(90, 0));

    editor.selection_mut().select(a, SelectionMode::Replace);
    editor.selection_mut().select(b, SelectionMode::Add);

    let delete = editor
        .commands()
        .delete_entities(editor.selection().selected())
        .unwrap();
    editor.apply(delete);
    assert!(editor.selection().is_empty());

    editor.undo();
    assert_eq!(editor.state().genogram.people().count(), 2);
    assert!(editor.selection().is_empty());

    // Deleting the primary hands it to the remaining pick
    editor.selection_mut().select_multiple([a, b]);
    assert_eq!(editor.selection().primary(), Some(b));
    let delete = editor.commands().delete_entity(b).unwrap();
    editor.apply(delete);
    assert_eq!(editor.selection().selected(), &[a]);
    assert_eq!(editor.selection().primary(), Some(a));
}

#[test]
fn saved_document_reloads_identically() {
    let (mut editor, _) = editor_with(EditorConfig::default());
    let a = EntityId::from_u128(1);
    let b = EntityId::from_u128(2);
    add_person(&mut editor, a, "A", GridPoint::new(0, 0));
    add_person(&mut editor, b, "B", GridPoint::new(90, 30));
    let cmd = editor.commands().resize_node(b, SizeClass::Small).unwrap();
    editor.apply(cmd);
    assert!(editor.is_dirty());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("family.json");
    editor.save_document(&path).unwrap();
    assert!(!editor.is_dirty());

    let (mut reopened, _) = editor_with(EditorConfig::default());
    reopened.load_document(Document::load(&path).unwrap());
    assert_eq!(reopened.state(), editor.state());
    assert_eq!(reopened.status(), HistoryStatus::Idle);
    assert_eq!(reopened.state().placement_of(b).unwrap().size, SizeClass::Small);
}

#[test]
fn replayed_script_matches_manual_session() {
    let steps = parse_script(
        r#"[
            { "op": "add_person", "key": "a", "name": "A", "x": 0, "y": 0 },
            { "op": "add_person", "key": "b", "name": "B", "x": 90, "y": 0 },
            { "op": "begin_group", "label": "Tidy" },
            { "op": "move", "key": "a", "x": 30, "y": 60 },
            { "op": "resize", "key": "b", "size": "LARGE" },
            { "op": "commit_group" },
            { "op": "connect", "kind": "sibling", "from": "a", "to": "b" },
            { "op": "undo" },
            { "op": "undo" }
        ]"#,
    )
    .unwrap();

    let (mut editor, _) = editor_with(EditorConfig::default());
    let report = run_script(&mut editor, &steps).unwrap();
    assert_eq!(report.undone, 2);

    let state = editor.state();
    let (a, b) = (report.keys["a"], report.keys["b"]);
    assert_eq!(state.placement_of(a).unwrap().position, GridPoint::new(0, 0));
    assert_eq!(state.placement_of(b).unwrap().size, SizeClass::Default);
    assert_eq!(state.genogram.relationships().count(), 0);
    assert_eq!(editor.history().undo_count(), 2);
}
