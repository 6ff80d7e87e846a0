use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("unique constraint violated: {0}")]
    Duplicate(String),
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
}

impl From<DbErr> for ModelError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => ModelError::Duplicate(msg),
            _ => match e {
                DbErr::RecordNotUpdated => ModelError::NotFound("no row matched the update".into()),
                other => ModelError::Db(other.to_string()),
            },
        }
    }
}
