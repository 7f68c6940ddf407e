//! Dashboard summary service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::deployment_service::{map_deployment_error, map_log_error};
use crate::domain::ports::{DashboardQuery, DeploymentRepository, LogRepository};
use crate::domain::{DashboardSummary, Error, LogQuery, RECENT_LOG_WINDOW, UserId};

/// Dashboard service implementing [`DashboardQuery`].
#[derive(Clone)]
pub struct DashboardService<D, L> {
    deployments: Arc<D>,
    logs: Arc<L>,
}

impl<D, L> DashboardService<D, L> {
    /// Create a new service.
    pub fn new(deployments: Arc<D>, logs: Arc<L>) -> Self {
        Self { deployments, logs }
    }
}

#[async_trait]
impl<D, L> DashboardQuery for DashboardService<D, L>
where
    D: DeploymentRepository,
    L: LogRepository,
{
    async fn summary(&self, user: &UserId) -> Result<DashboardSummary, Error> {
        let deployments = self
            .deployments
            .list_for_owner(user)
            .await
            .map_err(map_deployment_error)?;
        let recent_logs = self
            .logs
            .list(&LogQuery::recent(*user, RECENT_LOG_WINDOW))
            .await
            .map_err(map_log_error)?;
        Ok(DashboardSummary::build(deployments, recent_logs))
    }
}
