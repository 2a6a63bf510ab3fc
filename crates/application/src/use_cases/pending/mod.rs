pub mod evict_expired_queries;

pub use evict_expired_queries::EvictExpiredQueriesUseCase;
