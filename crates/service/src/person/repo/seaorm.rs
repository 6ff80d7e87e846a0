use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, TransactionTrait};

use models::person as person_model;
use crate::errors::ServiceError;
use crate::person::domain::Person;
use crate::person::repository::{PersonRepository, PersonStore, UnitOfWork};

/// SeaORM-backed store over any connection: the pool for plain reads,
/// a `DatabaseTransaction` inside a unit of work.
pub struct SeaOrmPersonStore<C> {
    pub conn: C,
}

pub type SeaOrmPersonRepository = SeaOrmPersonStore<DatabaseConnection>;
pub type SeaOrmUnitOfWork = SeaOrmPersonStore<DatabaseTransaction>;

impl SeaOrmPersonRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { conn: db } }
}

fn db_err(e: sea_orm::DbErr) -> ServiceError { ServiceError::Db(e.to_string()) }

#[async_trait]
impl<C> PersonStore for SeaOrmPersonStore<C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_id(&self, id: i64) -> Result<Option<Person>, ServiceError> {
        Ok(person_model::find_by_id(&self.conn, id).await?.map(Person::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Person>, ServiceError> {
        Ok(person_model::find_by_email(&self.conn, email).await?.map(Person::from))
    }

    async fn find_all(&self) -> Result<Vec<Person>, ServiceError> {
        let rows = person_model::find_all(&self.conn).await?;
        Ok(rows.into_iter().map(Person::from).collect())
    }

    async fn save(&self, person: Person) -> Result<Person, ServiceError> {
        let saved = match person.id {
            None => person_model::insert(&self.conn, &person.first_name, &person.last_name, person.age, &person.email).await?,
            Some(id) => {
                let model = person_model::Model {
                    id,
                    first_name: person.first_name,
                    last_name: person.last_name,
                    age: person.age,
                    email: person.email,
                };
                person_model::update(&self.conn, model).await?
            }
        };
        Ok(Person::from(saved))
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
        person_model::delete(&self.conn, id).await?;
        Ok(())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        Ok(person_model::exists(&self.conn, id).await?)
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        Ok(person_model::count(&self.conn).await?)
    }
}

#[async_trait]
impl PersonRepository for SeaOrmPersonRepository {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, ServiceError> {
        let txn = self.conn.begin().await.map_err(db_err)?;
        Ok(Box::new(SeaOrmPersonStore { conn: txn }))
    }
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    fn store(&self) -> &dyn PersonStore { self }

    async fn commit(self: Box<Self>) -> Result<(), ServiceError> {
        self.conn.commit().await.map_err(db_err)
    }

    async fn rollback(self: Box<Self>) -> Result<(), ServiceError> {
        self.conn.rollback().await.map_err(db_err)
    }
}
