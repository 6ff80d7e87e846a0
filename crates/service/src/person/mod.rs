//! Person resource: domain shapes, mapper, store contracts and the service.

pub mod domain;
pub mod mapper;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::{Person, PersonDto};
pub use mapper::PersonMapper;
pub use service::PersonService;
