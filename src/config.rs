//! Configuration types for SynapseDB.
//!
//! The [`Config`] struct controls database behavior including:
//! - Durability mode for write transactions
//! - Whether a missing store is created on first connect
//!
//! # Example
//! ```rust
//! use synapsedb::{Config, SyncMode};
//!
//! // Use defaults (create if missing, sync on commit)
//! let config = Config::default();
//!
//! // Customize for development
//! let config = Config {
//!     sync_mode: SyncMode::Fast,
//!     ..Default::default()
//! };
//! ```

use serde::{Deserialize, Serialize};

/// Database configuration options.
///
/// All fields have sensible defaults. Use struct update syntax to override
/// specific settings:
///
/// ```rust
/// use synapsedb::{Config, SyncMode};
///
/// let config = Config {
///     create_if_missing: false,
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    /// Durability mode for write transactions.
    pub sync_mode: SyncMode,

    /// Whether connecting to a missing store creates it.
    ///
    /// When false, `connect()` fails with a connection error if no store
    /// exists at the configured path. Default: true.
    pub create_if_missing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sync_mode: SyncMode::Normal,
            create_if_missing: true,
        }
    }
}

impl Config {
    /// Creates a new Config with default settings.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Durability mode for write operations.
///
/// Maps onto the storage engine's commit durability. All modes preserve
/// transactional atomicity; they differ only in when committed data is
/// guaranteed to have reached disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncMode {
    /// Sync to disk on transaction commit.
    ///
    /// This is the default and recommended setting. Provides good performance
    /// while ensuring committed data survives crashes.
    #[default]
    Normal,

    /// Async sync (faster writes, may lose recent commits on crash).
    ///
    /// Use for development or when you can tolerate losing the last few
    /// seconds of writes. Significantly faster than `Normal`.
    Fast,
}

impl SyncMode {
    /// Returns true if this mode is async (may lose data on crash).
    pub fn is_fast(&self) -> bool {
        matches!(self, Self::Fast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sync_mode, SyncMode::Normal);
        assert!(config.create_if_missing);
    }

    #[test]
    fn test_struct_update_syntax() {
        let config = Config {
            sync_mode: SyncMode::Fast,
            ..Default::default()
        };
        assert!(config.sync_mode.is_fast());
        assert!(config.create_if_missing);
    }

    #[test]
    fn test_sync_mode_predicates() {
        assert!(SyncMode::Fast.is_fast());
        assert!(!SyncMode::Normal.is_fast());
    }
}
