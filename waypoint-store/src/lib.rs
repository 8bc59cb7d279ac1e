pub mod app_config;
pub mod gateway;
pub mod redis_repo;
pub mod source;
pub mod storage;

pub use gateway::{CacheGateway, SwrOutcome, DEFAULT_CACHE_KEY};
pub use redis_repo::RedisStorage;
pub use source::{FetchError, HttpTripSource, TripSource};
pub use storage::{MemoryStorage, SessionStorage, StorageError};
