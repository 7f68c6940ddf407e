//! Port abstraction for log persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{DeploymentId, LogEntry, LogQuery, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by log repository adapters.
    pub enum LogRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "log repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "log repository query failed: {message}",
    }
}

/// Append-only log storage with owner-scoped reads and bulk clears.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LogRepository: Send + Sync {
    /// Append one entry.
    async fn append(&self, entry: &LogEntry) -> Result<(), LogRepositoryError>;

    /// Entries matching `query`, newest first, at most `query.limit`.
    async fn list(&self, query: &LogQuery) -> Result<Vec<LogEntry>, LogRepositoryError>;

    /// Delete the owner's entries for one deployment and return how many
    /// were removed.
    async fn delete_for_deployment(
        &self,
        owner: &UserId,
        deployment_id: &DeploymentId,
    ) -> Result<usize, LogRepositoryError>;
}

/// Fixture implementation for tests that do not exercise log storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLogRepository;

#[async_trait]
impl LogRepository for FixtureLogRepository {
    async fn append(&self, _entry: &LogEntry) -> Result<(), LogRepositoryError> {
        Ok(())
    }

    async fn list(&self, _query: &LogQuery) -> Result<Vec<LogEntry>, LogRepositoryError> {
        Ok(Vec::new())
    }

    async fn delete_for_deployment(
        &self,
        _owner: &UserId,
        _deployment_id: &DeploymentId,
    ) -> Result<usize, LogRepositoryError> {
        Ok(0)
    }
}
