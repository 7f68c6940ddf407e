//! Driving port for cached schemas and schema comparison.

use async_trait::async_trait;

use crate::domain::schema::SchemaDiff;
use crate::domain::{CachedSchema, DeploymentId, Error, UserId};

/// Use-case port over the caller's cached schemas.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchemaCatalogue: Send + Sync {
    /// Cached schema for one of the caller's deployments, if any.
    async fn get_cached(
        &self,
        user: &UserId,
        deployment_id: &DeploymentId,
    ) -> Result<Option<CachedSchema>, Error>;

    /// Table names listed by the cached schema; empty when nothing is cached.
    async fn table_names(
        &self,
        user: &UserId,
        deployment_id: &DeploymentId,
    ) -> Result<Vec<String>, Error>;

    /// Store manually entered schema text.
    async fn upsert(
        &self,
        user: &UserId,
        deployment_id: &DeploymentId,
        schema: String,
    ) -> Result<CachedSchema, Error>;

    /// Compare two cached schemas. `None` when either side has nothing
    /// cached.
    async fn diff(
        &self,
        user: &UserId,
        left: &DeploymentId,
        right: &DeploymentId,
    ) -> Result<Option<SchemaDiff>, Error>;
}

/// Fixture catalogue with nothing cached.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSchemaCatalogue;

#[async_trait]
impl SchemaCatalogue for FixtureSchemaCatalogue {
    async fn get_cached(
        &self,
        _user: &UserId,
        _deployment_id: &DeploymentId,
    ) -> Result<Option<CachedSchema>, Error> {
        Ok(None)
    }

    async fn table_names(
        &self,
        _user: &UserId,
        _deployment_id: &DeploymentId,
    ) -> Result<Vec<String>, Error> {
        Ok(Vec::new())
    }

    async fn upsert(
        &self,
        user: &UserId,
        deployment_id: &DeploymentId,
        schema: String,
    ) -> Result<CachedSchema, Error> {
        Ok(CachedSchema {
            deployment_id: *deployment_id,
            owner: *user,
            schema,
            fetched_at: chrono::Utc::now(),
        })
    }

    async fn diff(
        &self,
        _user: &UserId,
        _left: &DeploymentId,
        _right: &DeploymentId,
    ) -> Result<Option<SchemaDiff>, Error> {
        Ok(None)
    }
}
