//! Undo and merge laws for every command variant
//!
//! Each command must undo exactly what it did, and a merged pair must
//! behave like the two commands applied in sequence.

use std::sync::Arc;

use geno_core::{CommandId, EntityId, GridPoint, ManualClock, SequentialIds, SizeClass};
use geno_editor::commands::{
    Action, AddAnnotation, AddPerson, AddRelationship, DeleteEntity, EditAnnotation, MoveNode,
    ResizeNode, UpdatePerson,
};
use geno_editor::core::{EditorConfig, EditorController, EditorState, MergePolicy};
use geno_editor::model::{Gender, Person, PersonUpdate, RelationshipKind, TextAnnotation, TextAnnotationUpdate};
use geno_editor::{Command, Placement};

struct Fixture {
    editor: EditorController,
    mom: EntityId,
    dad: EntityId,
    kid: EntityId,
    note: EntityId,
}

/// Two parents, a child, a marriage, and a note.
fn fixture() -> Fixture {
    let mut editor = EditorController::with_sources(
        EditorConfig::default(),
        Arc::new(SequentialIds::starting_at(1)),
        Arc::new(ManualClock::new(0)),
    );
    let mom = editor.commands().new_entity_id();
    let dad = editor.commands().new_entity_id();
    let kid = editor.commands().new_entity_id();

    let cmd = editor
        .commands()
        .add_person(Person::new(mom, "Ada").with_gender(Gender::Female), GridPoint::new(0, 0))
        .unwrap();
    editor.apply(cmd);
    let cmd = editor
        .commands()
        .add_person(Person::new(dad, "Ben").with_gender(Gender::Male), GridPoint::new(120, 0))
        .unwrap();
    editor.apply(cmd);
    let cmd = editor
        .commands()
        .add_relationship(RelationshipKind::Marriage, mom, dad)
        .unwrap();
    editor.apply(cmd);
    let cmd = editor
        .commands()
        .add_child(&[mom, dad], Person::new(kid, "Cy"), GridPoint::new(60, 120))
        .unwrap();
    editor.apply(cmd);
    let cmd = editor.commands().add_annotation("since 1970", GridPoint::new(0, 240));
    let note = cmd.target().unwrap();
    editor.apply(cmd);

    assert!(editor.state().validate().is_ok());
    Fixture {
        editor,
        mom,
        dad,
        kid,
        note,
    }
}

fn assert_inverse(state: &EditorState, cmd: &Command) {
    assert!(cmd.applies_to(state), "{} should apply", cmd.kind().as_str());
    let next = cmd.execute(state);
    assert_ne!(&next, state, "{} changed nothing", cmd.kind().as_str());
    assert!(next.validate().is_ok(), "{} broke integrity", cmd.kind().as_str());
    assert_eq!(&cmd.undo(&next), state, "{} did not undo exactly", cmd.kind().as_str());
}

/// Neither direction may touch a state the command does not fit.
fn assert_noop(state: &EditorState, cmd: &Command) {
    let kind = cmd.kind().as_str();
    assert!(!cmd.applies_to(state), "{kind} should not apply");
    let next = cmd.execute(state);
    assert_eq!(&next, state, "{kind} was not a no-op");
    assert_eq!(&cmd.undo(&next), state, "{kind} undo of a no-op changed the state");
}

#[test]
fn undo_restores_state_for_every_variant() {
    let f = fixture();
    let state = f.editor.state();
    let b = f.editor.commands();

    let newcomer = b.new_entity_id();
    let commands = vec![
        b.add_person(Person::new(newcomer, "Dee"), GridPoint::new(240, 0)).unwrap(),
        b.update_person(
            f.kid,
            &PersonUpdate {
                name: Some("Cyrus".to_string()),
                birth_year: Some(Some(1975)),
                ..Default::default()
            },
        )
        .unwrap(),
        b.move_node(f.dad, GridPoint::new(180, 30)).unwrap(),
        b.resize_node(f.mom, SizeClass::Large).unwrap(),
        b.add_relationship(RelationshipKind::Conflict, f.kid, f.dad).unwrap(),
        b.delete_entity(f.mom).unwrap(),
        b.delete_entity(f.note).unwrap(),
        b.add_annotation("draft", GridPoint::new(300, 300)),
        b.edit_annotation(f.note, &TextAnnotationUpdate::content("since 1971")).unwrap(),
        b.delete_entities(&[f.kid, f.dad]).unwrap(),
        b.add_child(&[f.kid], Person::new(b.new_entity_id(), "Eve"), GridPoint::new(60, 240))
            .unwrap(),
    ];

    for cmd in &commands {
        assert_inverse(state, cmd);
    }
}

#[test]
fn undo_leaves_untouched_records_identical() {
    let f = fixture();
    let state = f.editor.state();
    let mv = f.editor.commands().move_node(f.kid, GridPoint::new(90, 150)).unwrap();

    let next = mv.execute(state);
    assert_eq!(next.genogram, state.genogram);
    for (id, placement) in state.layout.iter().filter(|(id, _)| *id != f.kid) {
        assert_eq!(next.layout.get(id), Some(placement));
    }
}

#[test]
fn delete_of_person_removes_incident_edges() {
    let f = fixture();
    let state = f.editor.state();
    let cmd = f.editor.commands().delete_entity(f.dad).unwrap();
    let next = cmd.execute(state);

    assert!(next.genogram.person(f.dad).is_none());
    assert_eq!(next.genogram.relationships_of(f.dad).count(), 0);
    assert_eq!(next.genogram.relationships().count(), 1);
    assert!(next.layout.get(f.dad).is_none());
    assert!(next.validate().is_ok());
}

#[test]
fn invalid_targets_are_noops() {
    let f = fixture();
    let state = f.editor.state();
    let ghost = EntityId::from_u128(0xdead);
    let id = |n| CommandId::from_u128(n);

    let noops = vec![
        Command::new(
            id(1),
            0,
            Action::MoveNode(MoveNode::new(ghost, GridPoint::new(0, 0), GridPoint::new(30, 30))),
        ),
        Command::new(
            id(2),
            0,
            Action::ResizeNode(ResizeNode::new(ghost, SizeClass::Default, SizeClass::Small)),
        ),
        Command::new(
            id(3),
            0,
            Action::DeleteEntity(DeleteEntity {
                target: ghost,
                removed: Default::default(),
            }),
        ),
        Command::new(
            id(4),
            0,
            Action::AddRelationship(AddRelationship::new(geno_editor::Relationship::new(
                EntityId::from_u128(0xbeef),
                RelationshipKind::Sibling,
                f.kid,
                ghost,
            ))),
        ),
        Command::new(
            id(5),
            0,
            Action::UpdatePerson(UpdatePerson::new(
                Person::new(ghost, "nobody"),
                Person::new(ghost, "still nobody"),
            )),
        ),
        Command::new(
            id(6),
            0,
            Action::EditAnnotation(EditAnnotation::new(
                TextAnnotation::new(ghost, "a"),
                TextAnnotation::new(ghost, "b"),
            )),
        ),
        // Occupied id
        Command::new(
            id(7),
            0,
            Action::AddPerson(AddPerson::new(
                Person::new(f.mom, "impostor"),
                Placement::new(GridPoint::new(600, 600), SizeClass::Default),
            )),
        ),
        // Off the grid
        Command::new(
            id(8),
            0,
            Action::AddAnnotation(AddAnnotation::new(
                TextAnnotation::new(EntityId::from_u128(0xcafe), "tilted"),
                Placement::new(GridPoint::new(7, 7), SizeClass::Default),
            )),
        ),
    ];

    for cmd in &noops {
        assert_noop(state, cmd);
    }

    // Captured while dad was alive, replayed after dad and kid were deleted
    let stale_delete = f.editor.commands().delete_entity(f.dad).unwrap();
    let cascade = f.editor.commands().delete_entities(&[f.kid, f.dad]).unwrap();
    let gone = cascade.execute(state);
    assert!(gone.genogram.person(f.dad).is_none());
    assert_noop(&gone, &stale_delete);
}

#[test]
fn stale_commands_are_noops_both_ways() {
    let f = fixture();
    let state = f.editor.state();
    let id = |n| CommandId::from_u128(n);
    let note = state.genogram.annotation(f.note).unwrap();

    let stale = vec![
        // Node sits at (0, 0)
        Command::new(
            id(1),
            0,
            Action::MoveNode(MoveNode::new(f.mom, GridPoint::new(90, 0), GridPoint::new(120, 0))),
        ),
        Command::new(
            id(2),
            0,
            Action::ResizeNode(ResizeNode::new(f.mom, SizeClass::Large, SizeClass::Small)),
        ),
        Command::new(
            id(3),
            0,
            Action::UpdatePerson(UpdatePerson::new(
                Person::new(f.kid, "Cyril"),
                Person::new(f.kid, "Cyrus"),
            )),
        ),
        Command::new(
            id(4),
            0,
            Action::EditAnnotation(EditAnnotation::new(
                TextAnnotation::new(f.note, "since 1969"),
                TextAnnotation::new(f.note, "since 1968"),
            )),
        ),
        Command::new(
            id(5),
            0,
            Action::AddPerson(AddPerson::new(
                Person::new(f.dad, "dup"),
                Placement::new(GridPoint::new(120, 0), SizeClass::Default),
            )),
        ),
    ];

    for cmd in &stale {
        assert_noop(state, cmd);
    }
    assert_eq!(state.genogram.person(f.kid).unwrap().name, "Cy");
    assert_eq!(state.genogram.annotation(f.note), Some(note));
}

#[test]
fn stale_delete_is_a_noop_after_target_is_gone() {
    let f = fixture();
    let state = f.editor.state();
    let delete = f.editor.commands().delete_entity(f.note).unwrap();
    let gone = delete.execute(state);
    assert_eq!(delete.execute(&gone), gone);
}

#[test]
fn merged_pairs_match_sequential_application() {
    let f = fixture();
    let state = f.editor.state();
    let policy = MergePolicy {
        person_edit_window_ms: 500,
        ..MergePolicy::default()
    };
    let cid = |n| CommandId::from_u128(n);
    let pos = |x| GridPoint::new(x, 0);

    let start_kid = state.genogram.person(f.kid).unwrap().clone();
    let renamed = Person {
        name: "Cyrus".to_string(),
        ..start_kid.clone()
    };
    let dated = Person {
        birth_year: Some(1975),
        ..renamed.clone()
    };
    let start_note = state.genogram.annotation(f.note).unwrap().clone();
    let typed = TextAnnotation {
        content: "since 1970s".to_string(),
        ..start_note.clone()
    };
    let typed_more = TextAnnotation {
        content: "since 1970s!".to_string(),
        ..start_note.clone()
    };

    let pairs = vec![
        (
            Command::new(cid(1), 0, Action::MoveNode(MoveNode::new(f.mom, pos(0), pos(30)))),
            Command::new(cid(2), 100, Action::MoveNode(MoveNode::new(f.mom, pos(30), pos(90)))),
        ),
        (
            Command::new(
                cid(3),
                0,
                Action::ResizeNode(ResizeNode::new(f.mom, SizeClass::Default, SizeClass::Large)),
            ),
            Command::new(
                cid(4),
                10,
                Action::ResizeNode(ResizeNode::new(f.mom, SizeClass::Large, SizeClass::Small)),
            ),
        ),
        (
            Command::new(
                cid(5),
                0,
                Action::UpdatePerson(UpdatePerson::new(start_kid, renamed.clone())),
            ),
            Command::new(cid(6), 200, Action::UpdatePerson(UpdatePerson::new(renamed, dated))),
        ),
        (
            Command::new(
                cid(7),
                0,
                Action::EditAnnotation(EditAnnotation::new(start_note, typed.clone())),
            ),
            Command::new(
                cid(8),
                900,
                Action::EditAnnotation(EditAnnotation::new(typed, typed_more)),
            ),
        ),
    ];

    for (first, second) in &pairs {
        let merged = first
            .merge(second, &policy)
            .unwrap_or_else(|| panic!("{} pair should merge", first.kind().as_str()));
        let sequential = second.execute(&first.execute(state));
        let combined = merged.execute(state);

        assert_eq!(combined, sequential);
        assert_eq!(&merged.undo(&combined), state);
        assert_eq!(merged.id(), first.id());
        assert_eq!(merged.issued_at(), second.issued_at());
    }
}
