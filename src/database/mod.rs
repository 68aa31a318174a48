pub mod manager;
pub mod memory;
pub mod models;
pub mod query_builder;
pub mod record;
pub mod repository;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use record::Record;
pub use store::RecordStore;
