//! Driving port for reading, writing and clearing deployment logs.

use async_trait::async_trait;

use crate::domain::{DeploymentId, Error, LogEntry, LogFilter, NewLogEntry, UserId};

/// Use-case port for per-deployment log streams.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LogBook: Send + Sync {
    /// The caller's entries matching `filter`, newest first.
    async fn list(&self, user: &UserId, filter: LogFilter) -> Result<Vec<LogEntry>, Error>;

    /// Append an entry, stamped now, to one of the caller's deployments.
    async fn append(
        &self,
        user: &UserId,
        deployment_id: &DeploymentId,
        entry: NewLogEntry,
    ) -> Result<LogEntry, Error>;

    /// Delete the caller's entries for a deployment, returning the count.
    async fn clear(&self, user: &UserId, deployment_id: &DeploymentId) -> Result<usize, Error>;
}

/// Fixture log book with no entries.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLogBook;

#[async_trait]
impl LogBook for FixtureLogBook {
    async fn list(&self, _user: &UserId, _filter: LogFilter) -> Result<Vec<LogEntry>, Error> {
        Ok(Vec::new())
    }

    async fn append(
        &self,
        user: &UserId,
        deployment_id: &DeploymentId,
        entry: NewLogEntry,
    ) -> Result<LogEntry, Error> {
        Ok(entry.into_entry(*deployment_id, *user, chrono::Utc::now()))
    }

    async fn clear(&self, _user: &UserId, _deployment_id: &DeploymentId) -> Result<usize, Error> {
        Ok(0)
    }
}
