//! Driving port for reading remote table pages.

use async_trait::async_trait;

use crate::domain::{DeploymentId, DocumentPage, Error, UserId};

use super::TableQuery;

/// A parsed page, or the remote failure message for the caller to show.
pub type RemotePage = Result<DocumentPage, String>;

/// Use-case port for one-off page reads against a deployment.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentQuery: Send + Sync {
    /// Fetch and parse one page of `query.table`.
    ///
    /// The outer error covers local failures such as an unknown
    /// deployment; remote failures come back as `Ok(Err(message))`.
    async fn query_page(
        &self,
        user: &UserId,
        deployment_id: &DeploymentId,
        query: TableQuery,
    ) -> Result<RemotePage, Error>;
}

/// Fixture query returning an empty final page.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDocumentQuery;

#[async_trait]
impl DocumentQuery for FixtureDocumentQuery {
    async fn query_page(
        &self,
        _user: &UserId,
        _deployment_id: &DeploymentId,
        _query: TableQuery,
    ) -> Result<RemotePage, Error> {
        Ok(Ok(DocumentPage::empty()))
    }
}
