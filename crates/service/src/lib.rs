//! Service layer for the Person resource.
//! - `person`: DTO/entity shapes, mapper, store contracts and the resource service.
//! - `seed`: sample data for empty stores.
//! - Errors are typed (`ServiceError`) and carry no transport knowledge.

pub mod errors;
pub mod person;
pub mod seed;
#[cfg(test)]
pub mod test_support;
