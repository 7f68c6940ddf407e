//! Port abstraction for cached schema persistence.

use async_trait::async_trait;

use crate::domain::{CachedSchema, DeploymentId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by cached schema adapters.
    pub enum CachedSchemaRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "cached schema repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "cached schema repository query failed: {message}",
    }
}

/// Storage holding at most one schema per deployment.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CachedSchemaRepository: Send + Sync {
    /// Fetch the owner's cached schema for a deployment.
    async fn find_for_owner(
        &self,
        owner: &UserId,
        deployment_id: &DeploymentId,
    ) -> Result<Option<CachedSchema>, CachedSchemaRepositoryError>;

    /// Insert the schema, or replace `schema` and `fetched_at` of the
    /// existing record for the same deployment.
    async fn upsert(&self, schema: &CachedSchema) -> Result<(), CachedSchemaRepositoryError>;

    /// Remove the owner's cached schema for a deployment.
    async fn delete_for_deployment(
        &self,
        owner: &UserId,
        deployment_id: &DeploymentId,
    ) -> Result<(), CachedSchemaRepositoryError>;
}

/// Fixture implementation for tests that do not exercise schema storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCachedSchemaRepository;

#[async_trait]
impl CachedSchemaRepository for FixtureCachedSchemaRepository {
    async fn find_for_owner(
        &self,
        _owner: &UserId,
        _deployment_id: &DeploymentId,
    ) -> Result<Option<CachedSchema>, CachedSchemaRepositoryError> {
        Ok(None)
    }

    async fn upsert(&self, _schema: &CachedSchema) -> Result<(), CachedSchemaRepositoryError> {
        Ok(())
    }

    async fn delete_for_deployment(
        &self,
        _owner: &UserId,
        _deployment_id: &DeploymentId,
    ) -> Result<(), CachedSchemaRepositoryError> {
        Ok(())
    }
}
