//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories run on `diesel-async` connections from a `bb8` pool. Row
//! structs (`models.rs`) and table definitions (`schema.rs`) stay private;
//! only domain types cross the port boundary, and every failure is mapped to
//! the port's `Connection` or `Query` variant.
//!
//! # Example
//!
//! ```ignore
//! use studio::outbound::persistence::{DbPool, DieselDeploymentRepository, PoolConfig};
//!
//! run_migrations("postgres://localhost/studio").await?;
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/studio")).await?;
//! let deployments = DieselDeploymentRepository::new(pool);
//! ```

mod diesel_cached_schema_repository;
mod diesel_deployment_repository;
mod diesel_error_mapping;
mod diesel_log_repository;
mod models;
mod pool;
mod schema;

pub use diesel_cached_schema_repository::DieselCachedSchemaRepository;
pub use diesel_deployment_repository::DieselDeploymentRepository;
pub use diesel_log_repository::DieselLogRepository;
pub use pool::{DbPool, PoolConfig, PoolError, run_migrations};
