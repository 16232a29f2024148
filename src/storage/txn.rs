//! Per-operation transaction scope.
//!
//! Every store operation opens its own transaction in the access mode it
//! needs (reads use read-only, writes use read-write) and never holds it
//! beyond the operation's primitives. This bounds lock and visibility
//! scope to a single logical operation; the engine's MVCC guarantees a
//! committed write transaction is fully visible or fully unobserved by
//! transactions opened after it.
//!
//! [`run_write`] commits only when the operation closure succeeds; an `Err`
//! drops the transaction, rolling back every primitive it performed. No
//! transaction is ever shared across operations.

use redb::{ReadTransaction, WriteTransaction};

use super::session::Session;
use crate::error::{EngineError, Result};

/// Runs `f` inside a fresh read-only transaction.
///
/// Propagates connection and engine failures unchanged; a missing container
/// surfaces from the table-open inside `f` as a schema error.
pub(crate) fn run_read<T>(
    session: &Session,
    f: impl FnOnce(&ReadTransaction) -> Result<T>,
) -> Result<T> {
    let txn = session.begin_read()?;
    f(&txn)
}

/// Runs `f` inside a fresh read-write transaction, committing on success.
///
/// If `f` fails the transaction is dropped without committing, so none of
/// its primitives become observable. The transaction carries the session's
/// configured durability mode.
pub(crate) fn run_write<T>(
    session: &Session,
    f: impl FnOnce(&WriteTransaction) -> Result<T>,
) -> Result<T> {
    let txn = session.begin_write()?;
    match f(&txn) {
        Ok(value) => {
            txn.commit().map_err(EngineError::from)?;
            Ok(value)
        }
        Err(err) => {
            // Dropping an uncommitted write transaction aborts it.
            drop(txn);
            Err(err)
        }
    }
}
