//! Storage layer for SynapseDB.
//!
//! Three pieces cooperate to give the CRUD layer a transactionally-safe
//! contract over the embedded engine:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SynapseDB                              │
//! │                          │                                  │
//! │                          ▼                                  │
//! │              ┌─────────────────────┐                        │
//! │              │    SessionCache     │  ← one open per process│
//! │              └─────────────────────┘                        │
//! │                          │                                  │
//! │                          ▼                                  │
//! │              ┌─────────────────────┐                        │
//! │              │ run_read / run_write│  ← one txn per op      │
//! │              └─────────────────────┘                        │
//! │                          │                                  │
//! │                          ▼                                  │
//! │              ┌─────────────────────┐                        │
//! │              │   schema tables     │  ← provisioned once    │
//! │              └─────────────────────┘                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`schema`] declares the containers and indexes and provisions them on
//! first run or version upgrade. [`session`] opens and caches the single
//! shared [`Session`]. [`txn`] scopes every operation to its own
//! transaction with commit-on-success semantics.

pub mod schema;
pub mod session;
pub(crate) mod txn;

pub use schema::{SearchIndexEntry, StoreMetadata, SCHEMA_VERSION};
pub use session::{Session, SessionCache};
