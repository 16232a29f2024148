//! Typed links between notes.
//!
//! The links container and its source/target indexes are provisioned by the
//! schema, but no CRUD in this crate operates on them yet; the record type
//! is declared here so the graph layer and this crate agree on the wire
//! format. Deleting a note does not clean up links that reference it —
//! resolving dangling links (cascade, orphan-mark, or refusal) is an open
//! decision for the graph subsystem.

use serde::{Deserialize, Serialize};

use crate::types::{LinkId, NoteId};

/// A directed, typed edge between two notes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Primary key.
    pub id: LinkId,

    /// The note this link starts from. Not validated against the notes
    /// container.
    pub source_note_id: NoteId,

    /// The note this link points to. Not validated against the notes
    /// container.
    pub target_note_id: NoteId,
}

impl Link {
    /// Constructs a link between two notes with a fresh random ID.
    pub fn new(source_note_id: NoteId, target_note_id: NoteId) -> Self {
        Self {
            id: LinkId::new(),
            source_note_id,
            target_note_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_bincode_roundtrip() {
        let link = Link::new(NoteId::new(), NoteId::new());
        let bytes = bincode::serialize(&link).unwrap();
        let restored: Link = bincode::deserialize(&bytes).unwrap();
        assert_eq!(link, restored);
    }

    #[test]
    fn test_link_ids_unique() {
        let a = NoteId::new();
        let b = NoteId::new();
        assert_ne!(Link::new(a, b).id, Link::new(a, b).id);
    }
}
