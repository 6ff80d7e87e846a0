use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use tracing::warn;

use super::domain::Person;
use crate::errors::ServiceError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Keyed storage for person records.
#[async_trait]
pub trait PersonStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Person>, ServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Person>, ServiceError>;
    /// Every record, in the store's natural order.
    async fn find_all(&self) -> Result<Vec<Person>, ServiceError>;
    /// Inserts when `person.id` is `None`, otherwise overwrites the record with that id.
    async fn save(&self, person: Person) -> Result<Person, ServiceError>;
    async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError>;
    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError>;
    async fn count(&self) -> Result<u64, ServiceError>;
}

/// A `PersonStore` scoped to one transaction.
///
/// Nothing is visible to other callers until `commit`; dropping without
/// committing rolls back.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn store(&self) -> &dyn PersonStore;
    async fn commit(self: Box<Self>) -> Result<(), ServiceError>;
    async fn rollback(self: Box<Self>) -> Result<(), ServiceError>;
}

/// Store handle used by the service: advisory reads on `self`, writes through `begin`.
#[async_trait]
pub trait PersonRepository: PersonStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, ServiceError>;
}

/// Runs `work` inside a fresh unit of work.
///
/// Commits when `work` returns `Ok`; on `Err` the unit of work is rolled back
/// and the error from `work` is returned unchanged.
pub async fn within_transaction<R, T, F>(repo: &R, work: F) -> Result<T, ServiceError>
where
    R: PersonRepository + ?Sized,
    T: Send,
    F: for<'s> FnOnce(&'s dyn PersonStore) -> BoxFuture<'s, Result<T, ServiceError>> + Send,
{
    let uow = repo.begin().await?;
    let outcome = work(uow.store()).await;
    match outcome {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rb) = uow.rollback().await {
                warn!(error = %rb, "rollback failed");
            }
            Err(e)
        }
    }
}
