//! Integration tests for note CRUD operations.
//!
//! Tests the full stack: SynapseDB facade → session cache → per-operation
//! transactions → redb.

use proptest::prelude::*;
use synapsedb::{Config, NoteId, NoteUpdate, SynapseDB};
use tempfile::tempdir;

/// Helper to open a fresh store with default config.
fn open_db() -> (SynapseDB, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let db = SynapseDB::open(dir.path().join("test.db"), Config::default());
    db.connect().unwrap();
    (db, dir)
}

// ============================================================================
// Create / Get round-trip
// ============================================================================

#[test]
fn test_create_get_roundtrip() {
    let (db, _dir) = open_db();

    let note = db.create_note(None, "Groceries", "milk, eggs").unwrap();
    let stored = db.get_note(note.id).unwrap().unwrap();

    assert_eq!(stored.title, "Groceries");
    assert_eq!(stored.content, "milk, eggs");
    assert!(stored.tags.is_empty());
    assert!(stored.linked_notes.is_empty());
    assert_eq!(stored.created_at, stored.updated_at);
}

#[test]
fn test_create_with_explicit_id() {
    let (db, _dir) = open_db();

    let id = NoteId::new();
    let note = db.create_note(Some(id), "Pinned", "body").unwrap();
    assert_eq!(note.id, id);
}

#[test]
fn test_get_absent_is_none_not_error() {
    let (db, _dir) = open_db();
    assert!(db.get_note(NoteId::new()).unwrap().is_none());
}

#[test]
fn test_create_duplicate_id_rejected_and_original_unchanged() {
    let (db, _dir) = open_db();

    let original = db.create_note(None, "Original", "keep me").unwrap();
    let err = db
        .create_note(Some(original.id), "Usurper", "discard me")
        .unwrap_err();

    assert!(err.is_duplicate_key());
    let stored = db.get_note(original.id).unwrap().unwrap();
    assert_eq!(stored, original);
}

// ============================================================================
// Update
// ============================================================================

#[test]
fn test_update_preserves_identity_fields() {
    let (db, _dir) = open_db();

    let note = db.create_note(None, "Before", "body").unwrap();
    let updated = db.update_note(note.id, NoteUpdate::title("X")).unwrap();

    assert_eq!(updated.id, note.id);
    assert_eq!(updated.created_at, note.created_at);
    assert_eq!(updated.title, "X");
    assert_eq!(updated.content, "body");
    assert!(
        updated.updated_at > note.updated_at,
        "updated_at must be strictly greater than its prior value"
    );
}

#[test]
fn test_update_missing_rejects_with_not_found() {
    let (db, _dir) = open_db();

    let err = db
        .update_note(NoteId::new(), NoteUpdate::title("X"))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_update_replaces_tags_and_links() {
    let (db, _dir) = open_db();

    let other = db.create_note(None, "Other", "target").unwrap();
    let note = db.create_note(None, "Note", "body").unwrap();

    let changes = NoteUpdate {
        tags: Some(vec!["rust".into(), "db".into()]),
        linked_notes: Some(vec![other.id]),
        ..Default::default()
    };
    let updated = db.update_note(note.id, changes).unwrap();

    assert_eq!(updated.tags, vec!["rust".to_string(), "db".to_string()]);
    assert_eq!(updated.linked_notes, vec![other.id]);

    // The merge is persisted, not just echoed
    let stored = db.get_note(note.id).unwrap().unwrap();
    assert_eq!(stored, updated);
}

#[test]
fn test_repeated_updates_keep_moving_updated_at_forward() {
    let (db, _dir) = open_db();

    let note = db.create_note(None, "Busy", "body").unwrap();
    let mut prev = note.updated_at;

    // Back-to-back mutations land in the same millisecond; the stamp must
    // still strictly advance each time
    for i in 0..5 {
        let updated = db
            .update_note(note.id, NoteUpdate::content(format!("rev {}", i)))
            .unwrap();
        assert!(updated.updated_at > prev);
        prev = updated.updated_at;
    }
}

// ============================================================================
// Delete
// ============================================================================

#[test]
fn test_delete_removes_note() {
    let (db, _dir) = open_db();

    let note = db.create_note(None, "Doomed", "body").unwrap();
    db.delete_note(note.id).unwrap();

    assert!(db.get_note(note.id).unwrap().is_none());
}

#[test]
fn test_delete_is_idempotent() {
    let (db, _dir) = open_db();

    let note = db.create_note(None, "Doomed", "body").unwrap();
    db.delete_note(note.id).unwrap();
    // Second delete of the same id must not reject
    db.delete_note(note.id).unwrap();

    // Deleting an id that never existed is also fine
    db.delete_note(NoteId::new()).unwrap();
}

// ============================================================================
// get_all
// ============================================================================

#[test]
fn test_get_all_empty() {
    let (db, _dir) = open_db();
    assert!(db.get_all_notes().unwrap().is_empty());
}

#[test]
fn test_get_all_returns_exactly_created_ids() {
    let (db, _dir) = open_db();

    let mut ids: Vec<NoteId> = (0..10)
        .map(|i| {
            db.create_note(None, format!("note-{}", i), "body")
                .unwrap()
                .id
        })
        .collect();

    let mut returned: Vec<NoteId> = db.get_all_notes().unwrap().iter().map(|n| n.id).collect();

    ids.sort();
    let unsorted = returned.clone();
    returned.sort();
    assert_eq!(returned, ids);

    // Key order is ascending id order, so the result was already sorted
    assert_eq!(unsorted, returned);
}

#[test]
fn test_get_all_reflects_deletes() {
    let (db, _dir) = open_db();

    let a = db.create_note(None, "A", "body").unwrap();
    let b = db.create_note(None, "B", "body").unwrap();
    db.delete_note(a.id).unwrap();

    let remaining = db.get_all_notes().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, b.id);
}

// ============================================================================
// Property: round-trip for arbitrary titles and contents
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_create_get_roundtrip(title in ".{0,60}", content in ".{0,400}") {
        let dir = tempdir().unwrap();
        let db = SynapseDB::open(dir.path().join("prop.db"), Config::default());

        let note = db.create_note(None, title.clone(), content.clone()).unwrap();
        let stored = db.get_note(note.id).unwrap().unwrap();

        prop_assert_eq!(&stored.title, &title);
        prop_assert_eq!(&stored.content, &content);
        prop_assert!(stored.tags.is_empty());
        prop_assert!(stored.linked_notes.is_empty());
        prop_assert_eq!(stored.created_at, stored.updated_at);
    }
}
