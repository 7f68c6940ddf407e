//! Shared mapping from pool and Diesel failures to port errors.
//!
//! Every repository port exposes `Connection` and `Query` variants; callers
//! pass the two constructors and get consistent classification and logging.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ParseLabelError;

use super::pool::PoolError;

/// Map a pool failure through the port's connection constructor.
pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    match error {
        PoolError::Checkout { message }
        | PoolError::Build { message }
        | PoolError::Migration { message } => connection(message),
    }
}

/// Classify a Diesel failure as a connection or query error.
pub(crate) fn map_diesel_error<E>(
    error: DieselError,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        _ => query("database error"),
    }
}

/// Map a stored label that no longer parses into a query error.
pub(crate) fn map_label_error<E>(error: &ParseLabelError, query: impl FnOnce(String) -> E) -> E {
    debug!(%error, "stored row carries an unknown label");
    query(format!("corrupt row: {error}"))
}
