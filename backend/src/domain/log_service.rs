//! Log book service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::deployment_service::{map_deployment_error, map_log_error, owned_deployment};
use crate::domain::ports::{DeploymentRepository, LogBook, LogRepository};
use crate::domain::{DeploymentId, Error, LogEntry, LogFilter, LogQuery, NewLogEntry, UserId};

/// Log service implementing [`LogBook`].
#[derive(Clone)]
pub struct LogService<D, L> {
    deployments: Arc<D>,
    logs: Arc<L>,
    clock: Arc<dyn Clock>,
    default_limit: usize,
}

impl<D, L> LogService<D, L> {
    /// Create a new service returning `default_limit` entries when a
    /// filter does not ask for a specific number.
    pub fn new(
        deployments: Arc<D>,
        logs: Arc<L>,
        clock: Arc<dyn Clock>,
        default_limit: usize,
    ) -> Self {
        Self {
            deployments,
            logs,
            clock,
            default_limit,
        }
    }
}

#[async_trait]
impl<D, L> LogBook for LogService<D, L>
where
    D: DeploymentRepository,
    L: LogRepository,
{
    async fn list(&self, user: &UserId, filter: LogFilter) -> Result<Vec<LogEntry>, Error> {
        if let Some(deployment_id) = filter.deployment_id.as_ref() {
            let owned = self
                .deployments
                .find_for_owner(user, deployment_id)
                .await
                .map_err(map_deployment_error)?;
            if owned.is_none() {
                return Ok(Vec::new());
            }
        }
        let query = LogQuery::from_filter(*user, &filter, self.default_limit);
        self.logs.list(&query).await.map_err(map_log_error)
    }

    async fn append(
        &self,
        user: &UserId,
        deployment_id: &DeploymentId,
        entry: NewLogEntry,
    ) -> Result<LogEntry, Error> {
        owned_deployment(self.deployments.as_ref(), user, deployment_id).await?;
        if entry.message.trim().is_empty() {
            return Err(Error::invalid_request("message must not be empty"));
        }
        let entry = entry.into_entry(*deployment_id, *user, self.clock.utc());
        self.logs.append(&entry).await.map_err(map_log_error)?;
        Ok(entry)
    }

    async fn clear(&self, user: &UserId, deployment_id: &DeploymentId) -> Result<usize, Error> {
        owned_deployment(self.deployments.as_ref(), user, deployment_id).await?;
        let removed = self
            .logs
            .delete_for_deployment(user, deployment_id)
            .await
            .map_err(map_log_error)?;
        info!(%deployment_id, removed, "logs cleared");
        Ok(removed)
    }
}
