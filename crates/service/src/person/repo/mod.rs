pub mod memory;
pub mod seaorm;

pub use memory::InMemoryPersonRepository;
pub use seaorm::{SeaOrmPersonRepository, SeaOrmUnitOfWork};
