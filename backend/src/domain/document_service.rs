//! Remote table page reads.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::deployment_service::owned_deployment;
use crate::domain::ports::{
    DeploymentGateway, DeploymentRepository, DocumentQuery, RemotePage, RemoteTarget, TableQuery,
};
use crate::domain::{DeploymentId, Error, UserId, parse_documents_response};

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Document service implementing [`DocumentQuery`].
#[derive(Clone)]
pub struct DocumentService<D, G> {
    deployments: Arc<D>,
    gateway: Arc<G>,
}

impl<D, G> DocumentService<D, G> {
    /// Create a new service.
    pub fn new(deployments: Arc<D>, gateway: Arc<G>) -> Self {
        Self {
            deployments,
            gateway,
        }
    }
}

#[async_trait]
impl<D, G> DocumentQuery for DocumentService<D, G>
where
    D: DeploymentRepository,
    G: DeploymentGateway,
{
    async fn query_page(
        &self,
        user: &UserId,
        deployment_id: &DeploymentId,
        query: TableQuery,
    ) -> Result<RemotePage, Error> {
        if query.table.trim().is_empty() {
            return Err(Error::invalid_request("table must not be empty"));
        }
        let deployment = owned_deployment(self.deployments.as_ref(), user, deployment_id).await?;
        let query = TableQuery {
            page_size: query.page_size.clamp(1, MAX_PAGE_SIZE),
            ..query
        };
        match self
            .gateway
            .query_documents(&RemoteTarget::from(&deployment), &query)
            .await
        {
            Ok(body) => Ok(Ok(parse_documents_response(&body))),
            Err(err) => {
                debug!(%deployment_id, table = %query.table, error = %err, "document query failed");
                Ok(Err(err.to_string()))
            }
        }
    }
}
