use sea_orm::{entity::prelude::*, ConnectionTrait, NotSet, PaginatorTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

pub const NAME_MAX_LEN: usize = 100;
pub const EMAIL_MAX_LEN: usize = 255;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "person")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(column_type = "Double")]
    pub age: f64,
    #[sea_orm(unique)]
    pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

/// Non-blank, bounded name field. `field` is used in the message.
pub fn validate_name(field: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("{field} is required")));
    }
    if value.chars().count() > NAME_MAX_LEN {
        return Err(ModelError::Validation(format!("{field} must be at most {NAME_MAX_LEN} characters")));
    }
    Ok(())
}

/// Syntactic email check: one `@`, non-empty local part and domain, no whitespace.
pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let invalid = || ModelError::Validation(format!("invalid email: {email}"));
    if email.is_empty() || email.len() > EMAIL_MAX_LEN || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    if domain.starts_with('.') || domain.ends_with('.') || domain.contains("..") {
        return Err(invalid());
    }
    Ok(())
}

pub fn validate_age(age: f64) -> Result<(), ModelError> {
    if !age.is_finite() || age < 0.0 {
        return Err(ModelError::Validation("age must be a non-negative number".into()));
    }
    Ok(())
}

pub fn validate(first_name: &str, last_name: &str, age: f64, email: &str) -> Result<(), ModelError> {
    validate_name("firstName", first_name)?;
    validate_name("lastName", last_name)?;
    validate_age(age)?;
    validate_email(email)
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Email.eq(email)).one(db).await?)
}

/// All rows in primary key order.
pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find().order_by_asc(Column::Id).all(db).await?)
}

/// Insert a new row; the id comes from the table sequence.
pub async fn insert<C: ConnectionTrait>(
    db: &C,
    first_name: &str,
    last_name: &str,
    age: f64,
    email: &str,
) -> Result<Model, ModelError> {
    validate(first_name, last_name, age, email)?;
    let am = ActiveModel {
        id: NotSet,
        first_name: Set(first_name.to_string()),
        last_name: Set(last_name.to_string()),
        age: Set(age),
        email: Set(email.to_string()),
    };
    Ok(am.insert(db).await?)
}

/// Overwrite every non-key column of an existing row.
pub async fn update<C: ConnectionTrait>(db: &C, model: Model) -> Result<Model, ModelError> {
    validate(&model.first_name, &model.last_name, model.age, &model.email)?;
    let am = ActiveModel {
        id: Set(model.id),
        first_name: Set(model.first_name),
        last_name: Set(model.last_name),
        age: Set(model.age),
        email: Set(model.email),
    };
    Ok(am.update(db).await?)
}

/// Returns the number of rows removed (0 or 1).
pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<u64, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected)
}

pub async fn exists<C: ConnectionTrait>(db: &C, id: i64) -> Result<bool, ModelError> {
    let n = Entity::find_by_id(id).count(db).await?;
    Ok(n > 0)
}

pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64, ModelError> {
    Ok(Entity::find().count(db).await?)
}
