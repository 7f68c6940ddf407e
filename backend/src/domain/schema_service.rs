//! Cached schema service and schema comparison.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::deployment_service::{map_schema_error, owned_deployment};
use crate::domain::ports::{CachedSchemaRepository, DeploymentRepository, SchemaCatalogue};
use crate::domain::schema::{SchemaDiff, diff_schemas};
use crate::domain::{CachedSchema, DeploymentId, Error, UserId};

/// Schema service implementing [`SchemaCatalogue`].
#[derive(Clone)]
pub struct SchemaService<D, S> {
    deployments: Arc<D>,
    schemas: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<D, S> SchemaService<D, S> {
    /// Create a new service.
    pub fn new(deployments: Arc<D>, schemas: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            deployments,
            schemas,
            clock,
        }
    }
}

impl<D, S> SchemaService<D, S>
where
    D: DeploymentRepository,
    S: CachedSchemaRepository,
{
    async fn cached(
        &self,
        user: &UserId,
        deployment_id: &DeploymentId,
    ) -> Result<Option<CachedSchema>, Error> {
        owned_deployment(self.deployments.as_ref(), user, deployment_id).await?;
        self.schemas
            .find_for_owner(user, deployment_id)
            .await
            .map_err(map_schema_error)
    }
}

#[async_trait]
impl<D, S> SchemaCatalogue for SchemaService<D, S>
where
    D: DeploymentRepository,
    S: CachedSchemaRepository,
{
    async fn get_cached(
        &self,
        user: &UserId,
        deployment_id: &DeploymentId,
    ) -> Result<Option<CachedSchema>, Error> {
        self.cached(user, deployment_id).await
    }

    async fn table_names(
        &self,
        user: &UserId,
        deployment_id: &DeploymentId,
    ) -> Result<Vec<String>, Error> {
        Ok(self
            .cached(user, deployment_id)
            .await?
            .map(|cached| cached.table_names())
            .unwrap_or_default())
    }

    async fn upsert(
        &self,
        user: &UserId,
        deployment_id: &DeploymentId,
        schema: String,
    ) -> Result<CachedSchema, Error> {
        owned_deployment(self.deployments.as_ref(), user, deployment_id).await?;
        if schema.trim().is_empty() {
            return Err(Error::invalid_request("schema must not be empty"));
        }
        let cached = CachedSchema {
            deployment_id: *deployment_id,
            owner: *user,
            schema,
            fetched_at: self.clock.utc(),
        };
        self.schemas
            .upsert(&cached)
            .await
            .map_err(map_schema_error)?;
        Ok(cached)
    }

    async fn diff(
        &self,
        user: &UserId,
        left: &DeploymentId,
        right: &DeploymentId,
    ) -> Result<Option<SchemaDiff>, Error> {
        let left_schema = self.cached(user, left).await?;
        let right_schema = self.cached(user, right).await?;
        Ok(left_schema
            .zip(right_schema)
            .map(|(left, right)| diff_schemas(&left.normalized(), &right.normalized())))
    }
}
