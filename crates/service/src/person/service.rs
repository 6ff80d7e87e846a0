use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::domain::PersonDto;
use super::mapper::PersonMapper;
use super::repository::{self, BoxFuture, PersonRepository, PersonStore};
use crate::errors::ServiceError;

/// Business rules for the Person resource.
///
/// Reads go straight to the repository. Every write runs as one unit of work,
/// so the uniqueness check and the mutation commit or roll back together.
pub struct PersonService<R: PersonRepository + ?Sized> {
    repo: Arc<R>,
    mapper: PersonMapper,
}

impl<R: PersonRepository + ?Sized> PersonService<R> {
    pub fn new(repo: Arc<R>, mapper: PersonMapper) -> Self { Self { repo, mapper } }

    async fn within_transaction<T, F>(&self, work: F) -> Result<T, ServiceError>
    where
        T: Send,
        F: for<'s> FnOnce(&'s dyn PersonStore) -> BoxFuture<'s, Result<T, ServiceError>> + Send,
    {
        repository::within_transaction(&*self.repo, work).await
    }

    /// Every stored person, in the store's natural order.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<PersonDto>, ServiceError> {
        let people = self.repo.find_all().await?;
        Ok(people.iter().map(|p| self.mapper.dto_from(p)).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Result<PersonDto, ServiceError> {
        let person = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::person_not_found(id))?;
        Ok(self.mapper.dto_from(&person))
    }

    /// Persist a new person; any client-supplied id is ignored.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::errors::ServiceError;
    /// use service::person::{PersonDto, PersonMapper, PersonService, repo::InMemoryPersonRepository};
    ///
    /// let svc = PersonService::new(Arc::new(InMemoryPersonRepository::new()), PersonMapper);
    /// let dto = PersonDto::new("John", "Doe", 21.5, "john.doe@example.com");
    /// let created = tokio_test::block_on(svc.add(dto.clone())).unwrap();
    /// assert_eq!(created.id, Some(1));
    /// let again = tokio_test::block_on(svc.add(dto));
    /// assert!(matches!(again, Err(ServiceError::Conflict(_))));
    /// ```
    #[instrument(skip(self, dto), fields(email = %dto.email))]
    pub async fn add(&self, dto: PersonDto) -> Result<PersonDto, ServiceError> {
        let mapper = self.mapper;
        let created = self
            .within_transaction(move |store| {
                Box::pin(async move {
                    if store.find_by_email(&dto.email).await?.is_some() {
                        debug!("email already registered");
                        return Err(ServiceError::email_in_use(&dto.email));
                    }
                    let mut entity = mapper.entity_from(&dto);
                    entity.id = None;
                    let saved = store.save(entity).await?;
                    Ok(mapper.dto_from(&saved))
                })
            })
            .await?;
        info!(id = ?created.id, "person_created");
        Ok(created)
    }

    /// Update the person at `id` from `dto`.
    ///
    /// Checks run in a fixed order so the caller gets the most specific error:
    /// body/path id mismatch, then existence, then email ownership. A body
    /// without an id skips the mismatch check.
    #[instrument(skip(self, dto), fields(email = %dto.email))]
    pub async fn update(&self, dto: PersonDto, id: i64) -> Result<PersonDto, ServiceError> {
        if let Some(body_id) = dto.id {
            if body_id != id {
                debug!(body_id, "path and body id disagree");
                return Err(ServiceError::IdMismatch { path_id: id, body_id });
            }
        }

        let mapper = self.mapper;
        let updated = self
            .within_transaction(move |store| {
                Box::pin(async move {
                    let mut existing = store
                        .find_by_id(id)
                        .await?
                        .ok_or_else(|| ServiceError::person_not_found(id))?;
                    if let Some(holder) = store.find_by_email(&dto.email).await? {
                        if holder.id != Some(id) {
                            return Err(ServiceError::email_in_use(&dto.email));
                        }
                    }
                    mapper.apply_update(Some(&mut existing), Some(&dto));
                    let saved = store.save(existing).await?;
                    Ok(mapper.dto_from(&saved))
                })
            })
            .await?;
        info!("person_updated");
        Ok(updated)
    }

    /// Delete the person at `id`. Removing an absent id is `NotFound`, including a repeat call.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: i64) -> Result<(), ServiceError> {
        self.within_transaction(move |store| {
            Box::pin(async move {
                if !store.exists_by_id(id).await? {
                    return Err(ServiceError::person_not_found(id));
                }
                store.delete_by_id(id).await
            })
        })
        .await?;
        info!("person_deleted");
        Ok(())
    }
}
