//! PostgreSQL-backed `DeploymentRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DeploymentRepository, DeploymentRepositoryError};
use crate::domain::{Deployment, DeploymentId, StatusUpdate, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_label_error, map_pool_error};
use super::models::{DeploymentRow, NewDeploymentRow, StatusChangeset};
use super::pool::{DbPool, PoolError};
use super::schema::deployments;

/// Diesel implementation of [`DeploymentRepository`].
#[derive(Clone)]
pub struct DieselDeploymentRepository {
    pool: DbPool,
}

impl DieselDeploymentRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> DeploymentRepositoryError {
    map_pool_error(error, DeploymentRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> DeploymentRepositoryError {
    map_diesel_error(
        error,
        DeploymentRepositoryError::query,
        DeploymentRepositoryError::connection,
    )
}

fn to_domain(row: DeploymentRow) -> Result<Deployment, DeploymentRepositoryError> {
    row.into_domain()
        .map_err(|err| map_label_error(&err, DeploymentRepositoryError::query))
}

#[async_trait]
impl DeploymentRepository for DieselDeploymentRepository {
    async fn insert(&self, deployment: &Deployment) -> Result<(), DeploymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(deployments::table)
            .values(NewDeploymentRow::from(deployment))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<Deployment>, DeploymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<DeploymentRow> = deployments::table
            .filter(deployments::owner_id.eq(owner.as_uuid()))
            .order((deployments::created_at.asc(), deployments::id.asc()))
            .select(DeploymentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: &DeploymentId,
    ) -> Result<Option<Deployment>, DeploymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<DeploymentRow> = deployments::table
            .filter(deployments::id.eq(id.as_uuid()))
            .filter(deployments::owner_id.eq(owner.as_uuid()))
            .select(DeploymentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(to_domain).transpose()
    }

    async fn update_status(
        &self,
        owner: &UserId,
        id: &DeploymentId,
        update: &StatusUpdate,
    ) -> Result<bool, DeploymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(
            deployments::table
                .filter(deployments::id.eq(id.as_uuid()))
                .filter(deployments::owner_id.eq(owner.as_uuid())),
        )
        .set(StatusChangeset::from(update))
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete_for_owner(
        &self,
        owner: &UserId,
        id: &DeploymentId,
    ) -> Result<bool, DeploymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(
            deployments::table
                .filter(deployments::id.eq(id.as_uuid()))
                .filter(deployments::owner_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(deleted > 0)
    }
}
