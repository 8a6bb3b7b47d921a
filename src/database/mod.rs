pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;
pub mod schema;

pub use manager::{Database, DatabaseError};
pub use memory::MemoryActivityRepository;
pub use repository::{ActivityRepository, PgActivityRepository, RepositoryError};
