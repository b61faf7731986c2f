//! Database connection pool and schema migrations.
//!
//! Provides async PostgreSQL connection pooling using diesel_async with bb8.

pub mod migrate;
mod pool;

pub use migrate::MIGRATIONS;
pub use pool::{AsyncDbPool, establish_async_connection_pool};
