pub mod climate_repository;
pub mod error;
pub mod models;
pub mod pool;
pub mod snapshot;
pub mod store;

pub use climate_repository::ClimateRepository;
pub use error::DbError;
pub use models::*;
pub use pool::connect_read_only;
pub use snapshot::ClimateSnapshot;
pub use store::ClimateStore;
