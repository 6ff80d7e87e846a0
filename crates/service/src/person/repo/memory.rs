//! In-process person store.
//!
//! Records live in a `BTreeMap` keyed by id, so natural order is ascending id.
//! A unit of work holds the table lock for its whole lifetime and edits a
//! private copy that replaces the table only on commit. Writers are therefore
//! serialized, and plain reads wait while a unit of work is open.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use models::person as person_model;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::errors::ServiceError;
use crate::person::domain::Person;
use crate::person::repository::{PersonRepository, PersonStore, UnitOfWork};

#[derive(Debug, Clone, Default)]
struct Table {
    rows: BTreeMap<i64, Person>,
    last_id: i64,
}

impl Table {
    fn find_by_email(&self, email: &str) -> Option<&Person> {
        self.rows.values().find(|p| p.email == email)
    }

    fn save(&mut self, mut person: Person) -> Result<Person, ServiceError> {
        // same field rules the SQL store applies before writing
        person_model::validate(&person.first_name, &person.last_name, person.age, &person.email)?;
        // unique email, same as the index on the SQL table
        if let Some(holder) = self.find_by_email(&person.email) {
            if holder.id != person.id {
                return Err(ServiceError::email_in_use(&person.email));
            }
        }
        let id = match person.id {
            Some(id) if self.rows.contains_key(&id) => id,
            Some(id) => return Err(ServiceError::person_not_found(id)),
            None => {
                self.last_id += 1;
                self.last_id
            }
        };
        person.id = Some(id);
        self.rows.insert(id, person.clone());
        Ok(person)
    }
}

/// Shared in-memory repository; clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPersonRepository {
    table: Arc<Mutex<Table>>,
}

impl InMemoryPersonRepository {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl PersonStore for InMemoryPersonRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Person>, ServiceError> {
        Ok(self.table.lock().await.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Person>, ServiceError> {
        Ok(self.table.lock().await.find_by_email(email).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Person>, ServiceError> {
        Ok(self.table.lock().await.rows.values().cloned().collect())
    }

    async fn save(&self, person: Person) -> Result<Person, ServiceError> {
        self.table.lock().await.save(person)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
        self.table.lock().await.rows.remove(&id);
        Ok(())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        Ok(self.table.lock().await.rows.contains_key(&id))
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        Ok(self.table.lock().await.rows.len() as u64)
    }
}

#[async_trait]
impl PersonRepository for InMemoryPersonRepository {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, ServiceError> {
        let guard = Arc::clone(&self.table).lock_owned().await;
        let staged = Mutex::new(guard.clone());
        Ok(Box::new(InMemoryUnitOfWork { guard, staged }))
    }
}

pub struct InMemoryUnitOfWork {
    guard: OwnedMutexGuard<Table>,
    staged: Mutex<Table>,
}

#[async_trait]
impl PersonStore for InMemoryUnitOfWork {
    async fn find_by_id(&self, id: i64) -> Result<Option<Person>, ServiceError> {
        Ok(self.staged.lock().await.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Person>, ServiceError> {
        Ok(self.staged.lock().await.find_by_email(email).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Person>, ServiceError> {
        Ok(self.staged.lock().await.rows.values().cloned().collect())
    }

    async fn save(&self, person: Person) -> Result<Person, ServiceError> {
        self.staged.lock().await.save(person)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
        self.staged.lock().await.rows.remove(&id);
        Ok(())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        Ok(self.staged.lock().await.rows.contains_key(&id))
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        Ok(self.staged.lock().await.rows.len() as u64)
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    fn store(&self) -> &dyn PersonStore { self }

    async fn commit(self: Box<Self>) -> Result<(), ServiceError> {
        let InMemoryUnitOfWork { mut guard, staged } = *self;
        *guard = staged.into_inner();
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), ServiceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(first: &str, email: &str) -> Person {
        Person { id: None, first_name: first.into(), last_name: "Doe".into(), age: 30.0, email: email.into() }
    }

    #[tokio::test]
    async fn ids_are_sequential_from_one() {
        let repo = InMemoryPersonRepository::new();
        let a = repo.save(person("A", "a@x.com")).await.unwrap();
        let b = repo.save(person("B", "b@x.com")).await.unwrap();
        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = InMemoryPersonRepository::new();
        let a = repo.save(person("A", "a@x.com")).await.unwrap();
        repo.delete_by_id(a.id.unwrap()).await.unwrap();
        let b = repo.save(person("B", "b@x.com")).await.unwrap();
        assert_eq!(b.id, Some(2));
    }

    #[tokio::test]
    async fn save_rejects_duplicate_email() {
        let repo = InMemoryPersonRepository::new();
        repo.save(person("A", "same@x.com")).await.unwrap();
        let err = repo.save(person("B", "same@x.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn save_rejects_invalid_fields() {
        let repo = InMemoryPersonRepository::new();
        let err = repo.save(person("", "blank@x.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "got {err:?}");
        let err = repo.save(person("A", "no-at-sign")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "got {err:?}");
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn save_with_unknown_id_is_not_found() {
        let repo = InMemoryPersonRepository::new();
        let mut p = person("A", "a@x.com");
        p.id = Some(42);
        assert!(matches!(repo.save(p).await.unwrap_err(), ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn uncommitted_work_is_discarded() {
        let repo = InMemoryPersonRepository::new();
        let uow = repo.begin().await.unwrap();
        uow.store().save(person("A", "a@x.com")).await.unwrap();
        assert_eq!(uow.store().count().await.unwrap(), 1);
        uow.rollback().await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);

        let uow = repo.begin().await.unwrap();
        uow.store().save(person("B", "b@x.com")).await.unwrap();
        drop(uow);
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn committed_work_is_visible() {
        let repo = InMemoryPersonRepository::new();
        let uow = repo.begin().await.unwrap();
        let saved = uow.store().save(person("A", "a@x.com")).await.unwrap();
        uow.commit().await.unwrap();
        assert_eq!(repo.find_by_id(1).await.unwrap(), Some(saved));
        assert_eq!(repo.find_by_email("a@x.com").await.unwrap().and_then(|p| p.id), Some(1));
    }

    #[tokio::test]
    async fn find_all_in_id_order() {
        let repo = InMemoryPersonRepository::new();
        for (i, e) in ["c@x.com", "a@x.com", "b@x.com"].iter().enumerate() {
            repo.save(person(&format!("P{i}"), e)).await.unwrap();
        }
        let ids: Vec<_> = repo.find_all().await.unwrap().into_iter().map(|p| p.id.unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
