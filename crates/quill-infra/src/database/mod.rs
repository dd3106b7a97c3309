//! Persistence: SeaORM repositories and the in-memory fallback.

mod connections;
mod memory;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

pub use connections::DatabaseConfig;
#[cfg(feature = "postgres")]
pub use connections::connect;

pub use memory::{
    InMemoryAboutRepository, InMemoryCommentRepository, InMemoryPostRepository,
    InMemoryUserRepository, MemoryStore,
};

#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresAboutRepository, PostgresCommentRepository, PostgresPostRepository,
    PostgresUserRepository,
};

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
