//! Infrastructure layer - external concerns

pub mod database;
pub mod memory;

pub use database::seed::{seed_identity_data, SeedStatus};
pub use database::{init_database, repositories::SeaOrmUserStore, DatabaseConfig};
pub use memory::MemoryUserStore;
