//! Port abstraction for deployment persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{Deployment, DeploymentId, StatusUpdate, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by deployment repository adapters.
    pub enum DeploymentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "deployment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "deployment repository query failed: {message}",
    }
}

/// Owner-scoped storage for registered deployments.
///
/// Every lookup and mutation is keyed by the owning user; records owned by
/// someone else are reported exactly like absent ones.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeploymentRepository: Send + Sync {
    /// Store a newly registered deployment.
    async fn insert(&self, deployment: &Deployment) -> Result<(), DeploymentRepositoryError>;

    /// List the owner's deployments in registration order.
    async fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<Deployment>, DeploymentRepositoryError>;

    /// Fetch one of the owner's deployments.
    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: &DeploymentId,
    ) -> Result<Option<Deployment>, DeploymentRepositoryError>;

    /// Record a connectivity check. Returns `false` when nothing matched.
    async fn update_status(
        &self,
        owner: &UserId,
        id: &DeploymentId,
        update: &StatusUpdate,
    ) -> Result<bool, DeploymentRepositoryError>;

    /// Delete one of the owner's deployments. Returns `false` when nothing
    /// matched.
    async fn delete_for_owner(
        &self,
        owner: &UserId,
        id: &DeploymentId,
    ) -> Result<bool, DeploymentRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDeploymentRepository;

#[async_trait]
impl DeploymentRepository for FixtureDeploymentRepository {
    async fn insert(&self, _deployment: &Deployment) -> Result<(), DeploymentRepositoryError> {
        Ok(())
    }

    async fn list_for_owner(
        &self,
        _owner: &UserId,
    ) -> Result<Vec<Deployment>, DeploymentRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_for_owner(
        &self,
        _owner: &UserId,
        _id: &DeploymentId,
    ) -> Result<Option<Deployment>, DeploymentRepositoryError> {
        Ok(None)
    }

    async fn update_status(
        &self,
        _owner: &UserId,
        _id: &DeploymentId,
        _update: &StatusUpdate,
    ) -> Result<bool, DeploymentRepositoryError> {
        Ok(false)
    }

    async fn delete_for_owner(
        &self,
        _owner: &UserId,
        _id: &DeploymentId,
    ) -> Result<bool, DeploymentRepositoryError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_reports_nothing_found() {
        let repo = FixtureDeploymentRepository;
        let owner = UserId::random();
        let id = DeploymentId::random();
        assert!(
            repo.find_for_owner(&owner, &id)
                .await
                .expect("fixture lookup succeeds")
                .is_none()
        );
        assert!(
            !repo
                .delete_for_owner(&owner, &id)
                .await
                .expect("fixture delete succeeds")
        );
    }

    #[rstest]
    fn connection_error_formats_message() {
        let err = DeploymentRepositoryError::connection("refused");
        assert_eq!(
            err.to_string(),
            "deployment repository connection failed: refused"
        );
    }
}
