//! Driving port for the overview page.

use async_trait::async_trait;

use crate::domain::{DashboardSummary, Error, UserId};

/// Use-case port producing the caller's dashboard summary.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    /// Summarise the caller's deployments and recent logs.
    async fn summary(&self, user: &UserId) -> Result<DashboardSummary, Error>;
}

/// Fixture query returning an empty summary.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDashboardQuery;

#[async_trait]
impl DashboardQuery for FixtureDashboardQuery {
    async fn summary(&self, _user: &UserId) -> Result<DashboardSummary, Error> {
        Ok(DashboardSummary::build(Vec::new(), Vec::new()))
    }
}
