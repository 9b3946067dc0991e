pub mod model;
pub mod partition;
pub mod repo;
pub mod sqlite;

#[cfg(test)]
pub mod fixtures;

pub use model::*;
pub use partition::{partition_key, EntityKind};
pub use repo::*;
pub use sqlite::SqliteRepository;
