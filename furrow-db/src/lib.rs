//! furrow-db: named Postgres connection pools for service code.
//!
//! Resolves connection URLs from the environment (`NAME`, `NAME`
//! upper-cased, `NAME_DATABASE_URL`, or the default `DATABASE_URL`),
//! builds bounded sqlx pools, caches them in an owned registry, and
//! hands out scoped cursors that always return their connection to the
//! pool.

pub mod env;
pub mod error;
pub mod pool;
pub mod registry;
pub mod rows;
pub mod settings;

pub use env::{candidate_keys, resolve, resolve_with, ResolvedUrl, DEFAULT_ENV_KEY, ENV_KEY_SUFFIX};
pub use error::{DbError, Result};
pub use pool::{CursorBody, CursorOptions, CursorReport, DatabasePool, MAX_CONNECTION_ATTEMPTS};
pub use registry::PoolRegistry;
pub use settings::{PoolSettings, DEFAULT_MAX_CONNECTIONS, DEFAULT_MIN_CONNECTIONS};
