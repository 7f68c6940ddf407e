//! Reqwest-backed remote deployment gateway.
//!
//! Owns transport details only: URL building, the `Convex` authorization
//! scheme, the request timeout and mapping HTTP statuses to the messages
//! shown next to the action that triggered the call. Nothing retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::debug;

use super::dto::QueryRequestDto;
use crate::domain::ports::{
    DeploymentGateway, DeploymentGatewayError, ProbeOutcome, RemoteTarget, TableQuery,
};

const SCHEMA_PATH: &str = "/api/schema";
const QUERY_PATH: &str = "/api/query";

/// Gateway issuing plain HTTP calls against each deployment's API.
#[derive(Debug, Clone)]
pub struct HttpDeploymentGateway {
    client: Client,
}

impl HttpDeploymentGateway {
    /// Build a gateway whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    fn authorised(&self, builder: RequestBuilder, target: &RemoteTarget) -> RequestBuilder {
        builder.header(AUTHORIZATION, authorization_value(target))
    }

    async fn post_json(
        &self,
        target: &RemoteTarget,
        path: &str,
        body: String,
    ) -> Result<(StatusCode, String), DeploymentGatewayError> {
        let url = format!("{}{path}", target.base_url());
        let response = self
            .authorised(self.client.post(url), target)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(map_transport_error)?;
        Ok((status, text))
    }
}

fn authorization_value(target: &RemoteTarget) -> String {
    format!("Convex {}", target.deploy_key.expose())
}

fn map_transport_error(error: reqwest::Error) -> DeploymentGatewayError {
    if error.is_timeout() {
        DeploymentGatewayError::timeout(error.to_string())
    } else {
        DeploymentGatewayError::transport(error.to_string())
    }
}

fn probe_outcome(status: StatusCode) -> ProbeOutcome {
    if status.is_server_error() {
        ProbeOutcome::Unreachable {
            message: format!("Server error (HTTP {})", status.as_u16()),
        }
    } else {
        ProbeOutcome::Reachable {
            status: status.as_u16(),
        }
    }
}

fn schema_status_error(status: StatusCode) -> DeploymentGatewayError {
    DeploymentGatewayError::status(
        status.as_u16(),
        format!(
            "Could not auto-fetch schema (HTTP {}). Use manual input instead.",
            status.as_u16()
        ),
    )
}

fn query_status_error(status: StatusCode) -> DeploymentGatewayError {
    DeploymentGatewayError::status(
        status.as_u16(),
        format!("Query failed (HTTP {})", status.as_u16()),
    )
}

fn body_preview(body: &str) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 120;

    let compact = body.split_whitespace().collect::<Vec<_>>().join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[async_trait]
impl DeploymentGateway for HttpDeploymentGateway {
    async fn probe(&self, target: &RemoteTarget) -> ProbeOutcome {
        let request = self.authorised(self.client.get(target.url.as_str()), target);
        match request.send().await {
            Ok(response) => probe_outcome(response.status()),
            Err(error) => ProbeOutcome::Unreachable {
                message: map_transport_error(error).to_string(),
            },
        }
    }

    async fn fetch_schema(&self, target: &RemoteTarget) -> Result<String, DeploymentGatewayError> {
        let (status, body) = self.post_json(target, SCHEMA_PATH, "{}".to_owned()).await?;
        if status.is_success() {
            return Ok(body);
        }
        debug!(status = status.as_u16(), body = %body_preview(&body), "schema fetch rejected");
        Err(schema_status_error(status))
    }

    async fn query_documents(
        &self,
        target: &RemoteTarget,
        query: &TableQuery,
    ) -> Result<String, DeploymentGatewayError> {
        let payload = serde_json::to_string(&QueryRequestDto::from(query))
            .map_err(|err| DeploymentGatewayError::transport(err.to_string()))?;
        let (status, body) = self.post_json(target, QUERY_PATH, payload).await?;
        if status.is_success() {
            return Ok(body);
        }
        debug!(
            status = status.as_u16(),
            table = %query.table,
            body = %body_preview(&body),
            "document query rejected"
        );
        Err(query_status_error(status))
    }
}
