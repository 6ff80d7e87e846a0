use models::errors::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("path id {path_id} does not match body id {body_id}")]
    IdMismatch { path_id: i64, body_id: i64 },
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn person_not_found(id: i64) -> Self {
        Self::NotFound(format!("Person with id {id} does not exist"))
    }

    pub fn email_in_use(email: &str) -> Self {
        Self::Conflict(format!("email {email} already in use"))
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::Conflict(_) => 1002,
            ServiceError::NotFound(_) => 1003,
            ServiceError::IdMismatch { .. } => 1004,
            ServiceError::Db(_) => 1200,
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::Validation(msg),
            // storage-level unique index is the backstop for the email check
            ModelError::Duplicate(msg) => ServiceError::Conflict(format!("email already in use ({msg})")),
            ModelError::NotFound(msg) => ServiceError::NotFound(msg),
            ModelError::Db(msg) => ServiceError::Db(msg),
        }
    }
}
