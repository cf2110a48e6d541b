//! Error helpers for ambrosia-store
//!
//! Classifies rusqlite failures into the `AmError` taxonomy.

use ambrosia_core::errors::{AmError, AmErrorKind};
use ambrosia_core::QueryContext;
use rusqlite::ErrorCode;

/// Result type alias using AmError
pub type Result<T> = std::result::Result<T, AmError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> AmError {
    AmError::new(AmErrorKind::Migration)
        .with_op("migration")
        .with_entity_id(migration_id)
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error for an already-applied migration
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> AmError {
    AmError::new(AmErrorKind::ChecksumMismatch)
        .with_op("migration_checksum")
        .with_entity_id(migration_id)
        .with_message(format!(
            "Checksum mismatch for migration {}: recorded {}, embedded {}",
            migration_id, expected, actual
        ))
}

/// Create a seed validation error
pub fn seed_validation(reason: impl Into<String>) -> AmError {
    AmError::new(AmErrorKind::SeedValidation)
        .with_op("seed_parse")
        .with_message(reason)
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> AmError {
    AmError::new(AmErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// True if the error means a row value could not be mapped into the target type
pub fn is_decode_failure(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::IntegralValueOutOfRange(..)
            | rusqlite::Error::InvalidColumnIndex(..)
            | rusqlite::Error::InvalidColumnName(..)
            | rusqlite::Error::InvalidColumnType(..)
    )
}

/// True if SQLite aborted the statement because the progress handler asked it to
pub fn is_interrupted(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::OperationInterrupted
    )
}

/// Create a database error from rusqlite::Error outside of a query context
pub fn from_rusqlite(err: rusqlite::Error) -> AmError {
    let kind = if is_decode_failure(&err) {
        AmErrorKind::Decode
    } else {
        AmErrorKind::Persistence
    };
    AmError::new(kind)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Classify a rusqlite error raised while `ctx` was in flight
///
/// Interrupted statements become the context's cancellation cause so callers
/// see "gave up" rather than "broken".
pub fn query_error(err: rusqlite::Error, ctx: &QueryContext, op: &str) -> AmError {
    if is_interrupted(&err) {
        if let Some(cause) = ctx.cause() {
            return ctx.cancellation_error(cause, op);
        }
    }
    from_rusqlite(err)
        .with_op(op)
        .with_request(ctx.request())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::types::Type;

    #[test]
    fn test_decode_failures_classified() {
        let err = rusqlite::Error::InvalidColumnType(2, "description".to_string(), Type::Null);
        assert_eq!(from_rusqlite(err).kind(), AmErrorKind::Decode);
    }

    #[test]
    fn test_other_failures_are_persistence() {
        let err = rusqlite::Error::QueryReturnedNoRows;
        assert_eq!(from_rusqlite(err).kind(), AmErrorKind::Persistence);
    }

    #[test]
    fn test_interrupt_maps_to_cancellation_cause() {
        let ctx = QueryContext::new();
        ctx.cancel();
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_INTERRUPT),
            None,
        );

        let classified = query_error(err, &ctx, "execute_query");
        assert_eq!(classified.kind(), AmErrorKind::Cancelled);
        assert_eq!(classified.op(), Some("execute_query"));
    }
}
