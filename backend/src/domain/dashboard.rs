//! Overview figures for the signed-in user's landing page.

use super::{ConnectionStatus, Deployment, LogEntry, LogLevel};

/// Number of log entries the overview inspects.
pub const RECENT_LOG_WINDOW: usize = 10;
/// Number of deployments and log entries listed on the overview.
pub const RECENT_LIST_LEN: usize = 5;

/// Aggregate view over a user's deployments and latest logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    /// Registered deployments.
    pub total_deployments: usize,
    /// Deployments whose last check succeeded.
    pub connected: usize,
    /// Deployments whose last check failed.
    pub errored: usize,
    /// Entries inspected from the recent log window.
    pub recent_log_count: usize,
    /// Error entries within the recent log window.
    pub recent_errors: usize,
    /// First few deployments in registration order.
    pub deployments: Vec<Deployment>,
    /// Newest few log entries.
    pub recent_logs: Vec<LogEntry>,
}

impl DashboardSummary {
    /// Summarise `deployments` and the newest-first `recent_logs` window.
    #[must_use]
    pub fn build(deployments: Vec<Deployment>, recent_logs: Vec<LogEntry>) -> Self {
        let count_status = |status: ConnectionStatus| {
            deployments
                .iter()
                .filter(|deployment| deployment.status == status)
                .count()
        };
        let connected = count_status(ConnectionStatus::Connected);
        let errored = count_status(ConnectionStatus::Error);
        let recent_errors = recent_logs
            .iter()
            .filter(|entry| entry.level == LogLevel::Error)
            .count();

        Self {
            total_deployments: deployments.len(),
            connected,
            errored,
            recent_log_count: recent_logs.len(),
            recent_errors,
            deployments: deployments.into_iter().take(RECENT_LIST_LEN).collect(),
            recent_logs: recent_logs.into_iter().take(RECENT_LIST_LEN).collect(),
        }
    }
}
