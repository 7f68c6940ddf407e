//! Deployment registry service.
//!
//! Owns the deployment lifecycle: registration, removal with cascade,
//! connectivity checks and remote schema fetches. Remote failures never
//! surface as errors; they are recorded on the deployment (checks) or
//! returned in a [`RemoteActionOutcome`] (fetches).

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    CachedSchemaRepository, CachedSchemaRepositoryError, DeploymentGateway, DeploymentRegistry,
    DeploymentRepository, DeploymentRepositoryError, LogRepository, LogRepositoryError,
    ProbeOutcome, RemoteActionOutcome, RemoteTarget,
};
use crate::domain::{
    CachedSchema, ConnectionStatus, Deployment, DeploymentId, Error, NewDeployment, StatusUpdate,
    UserId,
};

pub(crate) fn deployment_not_found(id: &DeploymentId) -> Error {
    Error::not_found(format!("deployment {id} not found"))
}

pub(crate) fn map_deployment_error(error: DeploymentRepositoryError) -> Error {
    match error {
        DeploymentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("deployment repository unavailable: {message}"))
        }
        DeploymentRepositoryError::Query { message } => {
            Error::internal(format!("deployment repository error: {message}"))
        }
    }
}

pub(crate) fn map_log_error(error: LogRepositoryError) -> Error {
    match error {
        LogRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("log repository unavailable: {message}"))
        }
        LogRepositoryError::Query { message } => {
            Error::internal(format!("log repository error: {message}"))
        }
    }
}

pub(crate) fn map_schema_error(error: CachedSchemaRepositoryError) -> Error {
    match error {
        CachedSchemaRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("schema repository unavailable: {message}"))
        }
        CachedSchemaRepositoryError::Query { message } => {
            Error::internal(format!("schema repository error: {message}"))
        }
    }
}

/// Load one of `user`'s deployments or fail with `not_found`.
pub(crate) async fn owned_deployment<D>(
    repo: &D,
    user: &UserId,
    id: &DeploymentId,
) -> Result<Deployment, Error>
where
    D: DeploymentRepository + ?Sized,
{
    repo.find_for_owner(user, id)
        .await
        .map_err(map_deployment_error)?
        .ok_or_else(|| deployment_not_found(id))
}

/// Deployment service implementing [`DeploymentRegistry`].
#[derive(Clone)]
pub struct DeploymentService<D, L, S, G> {
    deployments: Arc<D>,
    logs: Arc<L>,
    schemas: Arc<S>,
    gateway: Arc<G>,
    clock: Arc<dyn Clock>,
}

impl<D, L, S, G> DeploymentService<D, L, S, G> {
    /// Create a new service.
    pub fn new(
        deployments: Arc<D>,
        logs: Arc<L>,
        schemas: Arc<S>,
        gateway: Arc<G>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            deployments,
            logs,
            schemas,
            gateway,
            clock,
        }
    }
}

impl<D, L, S, G> DeploymentService<D, L, S, G>
where
    D: DeploymentRepository,
    L: LogRepository,
    S: CachedSchemaRepository,
    G: DeploymentGateway,
{
    async fn owned(&self, user: &UserId, id: &DeploymentId) -> Result<Deployment, Error> {
        owned_deployment(self.deployments.as_ref(), user, id).await
    }
}

#[async_trait]
impl<D, L, S, G> DeploymentRegistry for DeploymentService<D, L, S, G>
where
    D: DeploymentRepository,
    L: LogRepository,
    S: CachedSchemaRepository,
    G: DeploymentGateway,
{
    async fn list(&self, user: &UserId) -> Result<Vec<Deployment>, Error> {
        self.deployments
            .list_for_owner(user)
            .await
            .map_err(map_deployment_error)
    }

    async fn get(&self, user: &UserId, id: &DeploymentId) -> Result<Deployment, Error> {
        self.owned(user, id).await
    }

    async fn add(&self, user: &UserId, new: NewDeployment) -> Result<Deployment, Error> {
        let deployment = new.into_deployment(*user, self.clock.utc());
        self.deployments
            .insert(&deployment)
            .await
            .map_err(map_deployment_error)?;
        info!(deployment_id = %deployment.id, environment = deployment.environment.as_str(), "deployment registered");
        Ok(deployment)
    }

    async fn remove(&self, user: &UserId, id: &DeploymentId) -> Result<(), Error> {
        self.owned(user, id).await?;
        let cleared = self
            .logs
            .delete_for_deployment(user, id)
            .await
            .map_err(map_log_error)?;
        self.schemas
            .delete_for_deployment(user, id)
            .await
            .map_err(map_schema_error)?;
        let removed = self
            .deployments
            .delete_for_owner(user, id)
            .await
            .map_err(map_deployment_error)?;
        if !removed {
            return Err(deployment_not_found(id));
        }
        info!(deployment_id = %id, cleared_logs = cleared, "deployment removed");
        Ok(())
    }

    async fn update_status(
        &self,
        user: &UserId,
        id: &DeploymentId,
        status: ConnectionStatus,
        error_message: Option<String>,
    ) -> Result<Deployment, Error> {
        let mut deployment = self.owned(user, id).await?;
        let update = StatusUpdate {
            status,
            error_message,
            checked_at: self.clock.utc(),
        };
        let updated = self
            .deployments
            .update_status(user, id, &update)
            .await
            .map_err(map_deployment_error)?;
        if !updated {
            return Err(deployment_not_found(id));
        }
        if deployment.status != update.status {
            info!(
                deployment_id = %id,
                from = deployment.status.as_str(),
                to = update.status.as_str(),
                "deployment status changed"
            );
        }
        deployment.apply_status(update);
        Ok(deployment)
    }

    async fn check_connection(
        &self,
        user: &UserId,
        id: &DeploymentId,
    ) -> Result<RemoteActionOutcome, Error> {
        let deployment = self.owned(user, id).await?;
        let outcome = match self.gateway.probe(&RemoteTarget::from(&deployment)).await {
            ProbeOutcome::Reachable { .. } => RemoteActionOutcome::succeeded(),
            ProbeOutcome::Unreachable { message } => {
                debug!(deployment_id = %id, %message, "connectivity check failed");
                RemoteActionOutcome::failed(message)
            }
        };
        let status = if outcome.success {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Error
        };
        self.update_status(user, id, status, outcome.error.clone())
            .await?;
        Ok(outcome)
    }

    async fn fetch_schema(
        &self,
        user: &UserId,
        id: &DeploymentId,
    ) -> Result<RemoteActionOutcome, Error> {
        let deployment = self.owned(user, id).await?;
        let schema = match self
            .gateway
            .fetch_schema(&RemoteTarget::from(&deployment))
            .await
        {
            Ok(schema) => schema,
            Err(err) => {
                debug!(deployment_id = %id, error = %err, "schema fetch failed");
                return Ok(RemoteActionOutcome::failed(err.to_string()));
            }
        };
        let cached = CachedSchema {
            deployment_id: *id,
            owner: *user,
            schema,
            fetched_at: self.clock.utc(),
        };
        self.schemas
            .upsert(&cached)
            .await
            .map_err(map_schema_error)?;
        Ok(RemoteActionOutcome::succeeded())
    }
}

#[cfg(test)]
#[path = "deployment_service_tests.rs"]
mod tests;
