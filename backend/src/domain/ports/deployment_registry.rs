//! Driving port for deployment registration and remote actions.
//!
//! Inbound adapters call this port with the caller's identity; deployments
//! owned by anyone else are reported as not found.

use async_trait::async_trait;

use crate::domain::{
    ConnectionStatus, Deployment, DeploymentId, Error, NewDeployment, UserId,
};

/// Outcome of an action that talks to the remote deployment.
///
/// Remote failures are carried here rather than as an [`Error`] so the
/// caller can show them next to the action that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteActionOutcome {
    /// Whether the remote call succeeded.
    pub success: bool,
    /// Failure message when `success` is false.
    pub error: Option<String>,
}

impl RemoteActionOutcome {
    /// Successful outcome.
    #[must_use]
    pub const fn succeeded() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// Failed outcome with a user-facing message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

/// Use-case port for managing a user's deployments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeploymentRegistry: Send + Sync {
    /// List the caller's deployments in registration order.
    async fn list(&self, user: &UserId) -> Result<Vec<Deployment>, Error>;

    /// Fetch one of the caller's deployments.
    async fn get(&self, user: &UserId, id: &DeploymentId) -> Result<Deployment, Error>;

    /// Register a deployment in the `pending` state.
    async fn add(&self, user: &UserId, new: NewDeployment) -> Result<Deployment, Error>;

    /// Remove a deployment together with its cached schema and logs.
    async fn remove(&self, user: &UserId, id: &DeploymentId) -> Result<(), Error>;

    /// Record a status, stamping the check time and replacing the error
    /// message.
    async fn update_status(
        &self,
        user: &UserId,
        id: &DeploymentId,
        status: ConnectionStatus,
        error_message: Option<String>,
    ) -> Result<Deployment, Error>;

    /// Probe the deployment and record the result.
    async fn check_connection(
        &self,
        user: &UserId,
        id: &DeploymentId,
    ) -> Result<RemoteActionOutcome, Error>;

    /// Fetch the remote schema into the cache. The deployment status is
    /// left untouched.
    async fn fetch_schema(
        &self,
        user: &UserId,
        id: &DeploymentId,
    ) -> Result<RemoteActionOutcome, Error>;
}

/// Fixture registry with no deployments.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDeploymentRegistry;

fn missing(id: &DeploymentId) -> Error {
    Error::not_found(format!("deployment {id} not found"))
}

#[async_trait]
impl DeploymentRegistry for FixtureDeploymentRegistry {
    async fn list(&self, _user: &UserId) -> Result<Vec<Deployment>, Error> {
        Ok(Vec::new())
    }

    async fn get(&self, _user: &UserId, id: &DeploymentId) -> Result<Deployment, Error> {
        Err(missing(id))
    }

    async fn add(&self, user: &UserId, new: NewDeployment) -> Result<Deployment, Error> {
        Ok(new.into_deployment(*user, chrono::Utc::now()))
    }

    async fn remove(&self, _user: &UserId, id: &DeploymentId) -> Result<(), Error> {
        Err(missing(id))
    }

    async fn update_status(
        &self,
        _user: &UserId,
        id: &DeploymentId,
        _status: ConnectionStatus,
        _error_message: Option<String>,
    ) -> Result<Deployment, Error> {
        Err(missing(id))
    }

    async fn check_connection(
        &self,
        _user: &UserId,
        id: &DeploymentId,
    ) -> Result<RemoteActionOutcome, Error> {
        Err(missing(id))
    }

    async fn fetch_schema(
        &self,
        _user: &UserId,
        id: &DeploymentId,
    ) -> Result<RemoteActionOutcome, Error> {
        Err(missing(id))
    }
}
