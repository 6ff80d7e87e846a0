use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Wire representation of a person (request and response bodies).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDto {
    #[serde(default)]
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub age: f64,
    pub email: String,
}

impl PersonDto {
    pub fn new(first_name: &str, last_name: &str, age: f64, email: &str) -> Self {
        Self {
            id: None,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            age,
            email: email.to_string(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Field-level constraints checked before a DTO reaches the service.
    pub fn validate(&self) -> Result<(), ServiceError> {
        models::person::validate(&self.first_name, &self.last_name, self.age, &self.email)?;
        Ok(())
    }
}

/// Stored person. `id` is `None` until the store assigns one.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub age: f64,
    pub email: String,
}

impl From<models::person::Model> for Person {
    fn from(m: models::person::Model) -> Self {
        Self { id: Some(m.id), first_name: m.first_name, last_name: m.last_name, age: m.age, email: m.email }
    }
}
