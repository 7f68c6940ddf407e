//! PostgreSQL-backed `CachedSchemaRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CachedSchemaRepository, CachedSchemaRepositoryError};
use crate::domain::{CachedSchema, DeploymentId, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::CachedSchemaRow;
use super::pool::{DbPool, PoolError};
use super::schema::cached_schemas;

/// Diesel implementation of [`CachedSchemaRepository`].
///
/// `deployment_id` is the table's primary key, so upserts keep one row per
/// deployment.
#[derive(Clone)]
pub struct DieselCachedSchemaRepository {
    pool: DbPool,
}

impl DieselCachedSchemaRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> CachedSchemaRepositoryError {
    map_pool_error(error, CachedSchemaRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> CachedSchemaRepositoryError {
    map_diesel_error(
        error,
        CachedSchemaRepositoryError::query,
        CachedSchemaRepositoryError::connection,
    )
}

#[async_trait]
impl CachedSchemaRepository for DieselCachedSchemaRepository {
    async fn find_for_owner(
        &self,
        owner: &UserId,
        deployment_id: &DeploymentId,
    ) -> Result<Option<CachedSchema>, CachedSchemaRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<CachedSchemaRow> = cached_schemas::table
            .filter(cached_schemas::deployment_id.eq(deployment_id.as_uuid()))
            .filter(cached_schemas::owner_id.eq(owner.as_uuid()))
            .select(CachedSchemaRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(row.map(CachedSchema::from))
    }

    async fn upsert(&self, schema: &CachedSchema) -> Result<(), CachedSchemaRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(cached_schemas::table)
            .values(CachedSchemaRow::from(schema))
            .on_conflict(cached_schemas::deployment_id)
            .do_update()
            .set((
                cached_schemas::raw_schema.eq(excluded(cached_schemas::raw_schema)),
                cached_schemas::fetched_at.eq(excluded(cached_schemas::fetched_at)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn delete_for_deployment(
        &self,
        owner: &UserId,
        deployment_id: &DeploymentId,
    ) -> Result<(), CachedSchemaRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::delete(
            cached_schemas::table
                .filter(cached_schemas::deployment_id.eq(deployment_id.as_uuid()))
                .filter(cached_schemas::owner_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(diesel_error)
    }
}
