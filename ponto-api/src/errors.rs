//! Failures of the handler closures and their translation into envelopes.
//!
//! Validation and conflict messages travel as `Invalid`, absent rows as
//! `NotFound`, ownership failures as `Forbidden`.
//!
//! UNIQUE constraint failures are the store's last word on uniqueness when
//! two registrations race past the pre-check queries. They become `Conflict` with
//! the same message the pre-check would have produced; anything else stays a
//! database error and ends up as a 500.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use rocket::http::Status;
use thiserror::Error;

use crate::response::{Envelope, bad_request, fail};
use crate::validation::messages;

#[derive(Debug, Error)]
pub enum PersistError {
    /// Accumulated validation and domain-conflict messages.
    #[error("{}", .0.join(" "))]
    Invalid(Vec<String>),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("forbidden")]
    Forbidden,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("database error: {0}")]
    Database(DieselError),
}

impl From<argon2::password_hash::Error> for PersistError {
    fn from(e: argon2::password_hash::Error) -> Self {
        PersistError::Hashing(e.to_string())
    }
}

/// Maps the constraint reported by SQLite ("UNIQUE constraint failed:
/// table.column") to the domain message for that column.
fn conflict_message(db_message: &str) -> Option<&'static str> {
    if db_message.contains("companies.tax_id") {
        Some(messages::COMPANY_EXISTS)
    } else if db_message.contains("employees.personal_id") {
        Some(messages::PERSONAL_ID_EXISTS)
    } else if db_message.contains("employees.email") {
        Some(messages::EMAIL_EXISTS)
    } else {
        None
    }
}

impl From<DieselError> for PersistError {
    fn from(e: DieselError) -> Self {
        if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &e {
            if let Some(message) = conflict_message(info.message()) {
                return PersistError::Conflict(message.to_string());
            }
        }
        PersistError::Database(e)
    }
}

impl PersistError {
    /// Maps the error onto a status and envelope, logging it with `context`.
    /// Internal failures are hidden behind the generic 500 message.
    pub fn into_envelope<T>(self, context: &str) -> Envelope<T> {
        match self {
            PersistError::Invalid(errors) => {
                error!("{}: validation errors: {:?}", context, errors);
                bad_request(errors)
            }
            PersistError::Conflict(message) => {
                warn!("{}: constraint violation: {}", context, message);
                bad_request(vec![message])
            }
            PersistError::NotFound(message) => {
                info!("{}: {}", context, message);
                fail(Status::NotFound, vec![message])
            }
            PersistError::Forbidden => {
                warn!("{}: access denied", context);
                fail(Status::Forbidden, vec![messages::FORBIDDEN.to_string()])
            }
            PersistError::Hashing(e) => {
                error!("{}: {}", context, e);
                fail(
                    Status::InternalServerError,
                    vec![messages::INTERNAL_ERROR.to_string()],
                )
            }
            PersistError::Database(e) => {
                error!("{}: {:?}", context, e);
                fail(
                    Status::InternalServerError,
                    vec![messages::INTERNAL_ERROR.to_string()],
                )
            }
        }
    }
}

/// Logs an unexpected database error and produces the generic 500 envelope.
pub fn database_failure<T>(context: &str, e: DieselError) -> Envelope<T> {
    PersistError::Database(e).into_envelope(context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message_by_column() {
        assert_eq!(
            conflict_message("UNIQUE constraint failed: companies.tax_id"),
            Some(messages::COMPANY_EXISTS)
        );
        assert_eq!(
            conflict_message("UNIQUE constraint failed: employees.personal_id"),
            Some(messages::PERSONAL_ID_EXISTS)
        );
        assert_eq!(
            conflict_message("UNIQUE constraint failed: employees.email"),
            Some(messages::EMAIL_EXISTS)
        );
        assert_eq!(conflict_message("UNIQUE constraint failed: sessions.id"), None);
    }

    #[test]
    fn test_envelope_statuses() {
        let invalid: Envelope<()> =
            PersistError::Invalid(vec!["a".to_string(), "b".to_string()]).into_envelope("test");
        assert_eq!(invalid.0, Status::BadRequest);
        assert_eq!(invalid.1.errors, vec!["a", "b"]);

        let missing: Envelope<()> = PersistError::NotFound("gone".to_string()).into_envelope("test");
        assert_eq!(missing.0, Status::NotFound);

        let forbidden: Envelope<()> = PersistError::Forbidden.into_envelope("test");
        assert_eq!(forbidden.0, Status::Forbidden);
        assert_eq!(forbidden.1.errors, vec![messages::FORBIDDEN]);

        let db: Envelope<()> = PersistError::Database(DieselError::RollbackTransaction)
            .into_envelope("test");
        assert_eq!(db.0, Status::InternalServerError);
        assert!(db.1.data.is_none());
        assert_eq!(db.1.errors, vec![messages::INTERNAL_ERROR]);
    }

    #[test]
    fn test_not_found_is_database_error() {
        let err = PersistError::from(DieselError::NotFound);
        assert!(matches!(err, PersistError::Database(DieselError::NotFound)));
    }
}
