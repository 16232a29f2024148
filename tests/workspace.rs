//! Integration tests for the optimistic workspace against a real store.
//!
//! The unit tests in `src/workspace.rs` cover rollback mechanics with a
//! failing stand-in; these tests exercise the same protocol full-stack,
//! forcing failures through the store's own contract (e.g. updating a
//! record deleted behind the workspace's back).

use synapsedb::{Config, NoteUpdate, NoteWorkspace, SynapseDB};
use tempfile::tempdir;

fn open_db() -> (SynapseDB, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let db = SynapseDB::open(dir.path().join("test.db"), Config::default());
    db.connect().unwrap();
    (db, dir)
}

#[test]
fn test_workspace_mutations_persist() {
    let (db, _dir) = open_db();
    let mut ws = NoteWorkspace::new();

    let note = ws.create_note(&db, "From workspace", "body").unwrap();
    assert_eq!(ws.notes().len(), 1);
    assert_eq!(db.get_note(note.id).unwrap().unwrap(), note);

    let updated = ws
        .update_note(&db, note.id, NoteUpdate::title("Renamed"))
        .unwrap();
    assert_eq!(ws.notes()[0], updated);
    assert_eq!(db.get_note(note.id).unwrap().unwrap().title, "Renamed");

    ws.delete_note(&db, note.id).unwrap();
    assert!(ws.notes().is_empty());
    assert!(db.get_note(note.id).unwrap().is_none());
}

#[test]
fn test_update_of_externally_deleted_note_rolls_back() {
    let (db, _dir) = open_db();

    let a = db.create_note(None, "A", "alpha").unwrap();
    let b = db.create_note(None, "B", "beta").unwrap();

    let mut ws = NoteWorkspace::from_notes(db.get_all_notes().unwrap());
    let before = ws.notes().to_vec();

    // The record vanishes behind the workspace's back
    db.delete_note(b.id).unwrap();

    let err = ws
        .update_note(&db, b.id, NoteUpdate::title("new"))
        .unwrap_err();
    assert!(err.is_not_found());

    // The collection after rollback equals the original exactly,
    // including B's original updated_at
    assert_eq!(ws.notes(), before.as_slice());
    assert!(ws.notes().iter().any(|n| n.id == a.id));
    assert_eq!(
        ws.notes().iter().find(|n| n.id == b.id).unwrap().updated_at,
        b.updated_at
    );
}

#[test]
fn test_delete_failure_after_store_drop_rolls_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");

    let db = SynapseDB::open(&path, Config::default());
    let note = db.create_note(None, "Held", "body").unwrap();

    let mut ws = NoteWorkspace::from_notes(db.get_all_notes().unwrap());
    ws.select(Some(note.id));
    drop(db);

    // A second handle with create_if_missing=false against a moved file
    // cannot bootstrap, so the persistence call fails
    std::fs::rename(&path, dir.path().join("moved.db")).unwrap();
    let broken = SynapseDB::open(
        &path,
        Config {
            create_if_missing: false,
            ..Default::default()
        },
    );

    let err = ws.delete_note(&broken, note.id).unwrap_err();
    assert!(err.is_connection());

    // Rollback restores both the collection and the selection
    assert_eq!(ws.notes().len(), 1);
    assert_eq!(ws.selected().map(|n| n.id), Some(note.id));
}

#[test]
fn test_selection_follows_successful_delete() {
    let (db, _dir) = open_db();

    let note = db.create_note(None, "Selected", "body").unwrap();
    let mut ws = NoteWorkspace::from_notes(db.get_all_notes().unwrap());
    ws.select(Some(note.id));
    assert_eq!(ws.selected().map(|n| n.id), Some(note.id));

    ws.delete_note(&db, note.id).unwrap();
    assert!(ws.selected().is_none());
}
