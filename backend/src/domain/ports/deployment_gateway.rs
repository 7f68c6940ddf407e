//! Driven port for talking to a remote deployment's HTTP API.
//!
//! The adapter owns transport details; the domain only sees raw response
//! text and human-readable failure messages it can attach to the action
//! that triggered the call.

use async_trait::async_trait;

use crate::domain::{DeployKey, Deployment};

use super::define_port_error;

/// Default number of documents requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Where and how to reach one remote deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    /// Deployment URL as registered.
    pub url: String,
    /// Credential sent in the `Authorization` header.
    pub deploy_key: DeployKey,
}

impl RemoteTarget {
    /// URL with a single trailing slash removed, used to build API paths.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.url.strip_suffix('/').unwrap_or(&self.url)
    }
}

impl From<&Deployment> for RemoteTarget {
    fn from(deployment: &Deployment) -> Self {
        Self {
            url: deployment.url.clone(),
            deploy_key: deployment.deploy_key.clone(),
        }
    }
}

/// One paginated table read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    /// Remote table name.
    pub table: String,
    /// Continuation cursor; `None` requests the first page.
    pub cursor: Option<String>,
    /// Documents per page.
    pub page_size: u32,
}

/// Result of a connectivity probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The deployment answered with a status below 500.
    Reachable {
        /// HTTP status returned by the deployment root.
        status: u16,
    },
    /// The deployment failed or answered with a server error.
    Unreachable {
        /// Human-readable reason.
        message: String,
    },
}

define_port_error! {
    /// Errors surfaced while calling a remote deployment.
    ///
    /// Display output is the message shown to the user.
    pub enum DeploymentGatewayError {
        /// The request never produced a response.
        Transport { message: String } => "{message}",
        /// The request exceeded the configured timeout.
        Timeout { message: String } => "{message}",
        /// The deployment answered with an unexpected status.
        Status { status: u16, message: String } => "{message}",
    }
}

/// Port for the remote deployment HTTP API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeploymentGateway: Send + Sync {
    /// Issue a bare `GET` against the deployment root.
    async fn probe(&self, target: &RemoteTarget) -> ProbeOutcome;

    /// Fetch the raw schema text.
    async fn fetch_schema(&self, target: &RemoteTarget) -> Result<String, DeploymentGatewayError>;

    /// Fetch one page of a table as the raw response body.
    async fn query_documents(
        &self,
        target: &RemoteTarget,
        query: &TableQuery,
    ) -> Result<String, DeploymentGatewayError>;
}

/// Fixture gateway answering every call with an empty, successful reply.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureDeploymentGateway;

#[async_trait]
impl DeploymentGateway for FixtureDeploymentGateway {
    async fn probe(&self, _target: &RemoteTarget) -> ProbeOutcome {
        ProbeOutcome::Reachable { status: 200 }
    }

    async fn fetch_schema(&self, _target: &RemoteTarget) -> Result<String, DeploymentGatewayError> {
        Ok(r#"{"tables":[],"functions":[]}"#.to_owned())
    }

    async fn query_documents(
        &self,
        _target: &RemoteTarget,
        _query: &TableQuery,
    ) -> Result<String, DeploymentGatewayError> {
        Ok(r#"{"status":"success","value":{"page":[],"continueCursor":null,"isDone":true}}"#.to_owned())
    }
}
