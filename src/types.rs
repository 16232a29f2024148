//! Core type definitions for SynapseDB identifiers and timestamps.
//!
//! This module defines the fundamental ID types used throughout SynapseDB.
//! Record IDs are random v4 UUIDs; key order in storage is therefore
//! unrelated to creation order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Note identifier (random v4 UUID).
///
/// A note's ID is assigned at creation and never changes. Notes are keyed
/// by the raw UUID bytes, so `get_all_notes` returns ascending ID order,
/// not creation order.
///
/// # Example
/// ```
/// use synapsedb::NoteId;
///
/// let id = NoteId::new();
/// println!("Created note: {}", id);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NoteId(pub Uuid);

impl NoteId {
    /// Creates a new random NoteId.
    #[inline]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a nil (all zeros) NoteId.
    /// Useful for testing or sentinel values.
    #[inline]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Returns the raw UUID bytes for storage.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// Creates a NoteId from raw bytes.
    #[inline]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for NoteId {
    /// Returns a nil (all zeros) NoteId.
    ///
    /// For a new unique ID, use [`NoteId::new()`].
    fn default() -> Self {
        Self::nil()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Link identifier (random v4 UUID).
///
/// Links are typed edges between two notes. Only the link schema is
/// declared by this crate; traversal lives in the graph layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkId(pub Uuid);

impl LinkId {
    /// Creates a new random LinkId.
    #[inline]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a nil (all zeros) LinkId.
    #[inline]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Returns the raw UUID bytes for storage.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// Creates a LinkId from raw bytes.
    #[inline]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for LinkId {
    /// Returns a nil (all zeros) LinkId.
    ///
    /// For a new unique ID, use [`LinkId::new()`].
    fn default() -> Self {
        Self::nil()
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unix timestamp in milliseconds.
///
/// Using i64 allows representing dates far into the future and past.
/// Millisecond precision matches the persisted record format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    ///
    /// If the system clock is before the Unix epoch (should never happen
    /// in practice), returns a timestamp of 0 (epoch) rather than panicking.
    #[inline]
    pub fn now() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self(duration.as_millis() as i64)
    }

    /// Creates a timestamp from Unix milliseconds.
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as Unix milliseconds.
    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// Returns big-endian bytes for storage (enables lexicographic ordering).
    #[inline]
    pub fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Creates a timestamp from big-endian storage bytes.
    #[inline]
    pub fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Self(i64::from_be_bytes(bytes))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_id_unique() {
        let a = NoteId::new();
        let b = NoteId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_note_id_roundtrip_bytes() {
        let id = NoteId::new();
        let restored = NoteId::from_bytes(*id.as_bytes());
        assert_eq!(id, restored);
    }

    #[test]
    fn test_note_id_parse() {
        let id = NoteId::new();
        let parsed: NoteId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_note_id_parse_garbage_rejected() {
        assert!("not-a-uuid".parse::<NoteId>().is_err());
    }

    #[test]
    fn test_nil_ids() {
        assert_eq!(NoteId::default(), NoteId::nil());
        assert_eq!(LinkId::default(), LinkId::nil());
    }

    #[test]
    fn test_timestamp_now_positive() {
        assert!(Timestamp::now().as_millis() > 0);
    }

    #[test]
    fn test_timestamp_be_bytes_ordering() {
        let t1 = Timestamp::from_millis(1000);
        let t2 = Timestamp::from_millis(2000);
        // Lexicographic ordering of key bytes must match time ordering
        assert!(t1.to_be_bytes() < t2.to_be_bytes());
        assert_eq!(Timestamp::from_be_bytes(t1.to_be_bytes()), t1);
    }

    #[test]
    fn test_timestamp_serialization() {
        let t = Timestamp::from_millis(1234567890);
        let bytes = bincode::serialize(&t).unwrap();
        let restored: Timestamp = bincode::deserialize(&bytes).unwrap();
        assert_eq!(t, restored);
    }
}
