//! Deployment registry handlers.
//!
//! ```text
//! GET    /api/v1/deployments
//! POST   /api/v1/deployments {"name":"api","url":"https://…","deployKey":"…","environment":"prod"}
//! GET    /api/v1/deployments/{id}
//! DELETE /api/v1/deployments/{id}
//! POST   /api/v1/deployments/{id}/check
//! POST   /api/v1/deployments/{id}/schema/fetch
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    DeploymentId, DeploymentValidationError, Environment, Error, NewDeployment,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_deployment_id, parse_environment, required_text,
};
use crate::inbound::http::views::{DeploymentView, RemoteActionView};

const ID_FIELD: FieldName = FieldName::new("id");

/// Path parameters naming one deployment.
#[derive(Debug, Deserialize, IntoParams)]
pub struct DeploymentPath {
    /// Deployment identifier.
    pub id: String,
}

impl DeploymentPath {
    pub(crate) fn deployment_id(&self) -> Result<DeploymentId, Error> {
        parse_deployment_id(&self.id, ID_FIELD)
    }
}

/// Request body for registering a deployment.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddDeploymentRequest {
    pub name: Option<String>,
    #[schema(example = "https://happy-otter-123.convex.cloud")]
    pub url: Option<String>,
    pub deploy_key: Option<String>,
    /// `dev`, `staging` or `prod`; defaults to `dev`.
    #[schema(example = "dev")]
    pub environment: Option<String>,
}

fn map_validation_error(err: DeploymentValidationError) -> Error {
    let (field, code) = match err {
        DeploymentValidationError::EmptyName => ("name", "empty_name"),
        DeploymentValidationError::InvalidUrl => ("url", "invalid_url"),
        DeploymentValidationError::EmptyDeployKey => ("deployKey", "empty_deploy_key"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

fn parse_add_request(payload: AddDeploymentRequest) -> Result<NewDeployment, Error> {
    let name = required_text(payload.name, FieldName::new("name"))?;
    let url = required_text(payload.url, FieldName::new("url"))?;
    let deploy_key = required_text(payload.deploy_key, FieldName::new("deployKey"))?;
    let environment = match payload.environment.as_deref().map(str::trim) {
        None | Some("") => Environment::Dev,
        Some(raw) => parse_environment(raw, FieldName::new("environment"))?,
    };
    NewDeployment::try_new(&name, &url, &deploy_key, environment).map_err(map_validation_error)
}

/// List the signed-in user's deployments in registration order.
#[utoipa::path(
    get,
    path = "/api/v1/deployments",
    responses(
        (status = 200, description = "Deployments", body = [DeploymentView]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["deployments"],
    operation_id = "listDeployments"
)]
#[get("/deployments")]
pub async fn list_deployments(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<DeploymentView>>> {
    let user_id = session.require_user_id()?;
    let deployments = state.deployments.list(&user_id).await?;
    Ok(web::Json(
        deployments.into_iter().map(DeploymentView::from).collect(),
    ))
}

/// Register a deployment; it starts in `pending`.
#[utoipa::path(
    post,
    path = "/api/v1/deployments",
    request_body = AddDeploymentRequest,
    responses(
        (status = 201, description = "Deployment registered", body = DeploymentView),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["deployments"],
    operation_id = "addDeployment"
)]
#[post("/deployments")]
pub async fn add_deployment(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AddDeploymentRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let new = parse_add_request(payload.into_inner())?;
    let deployment = state.deployments.add(&user_id, new).await?;
    Ok(HttpResponse::Created().json(DeploymentView::from(deployment)))
}

/// Fetch one deployment.
#[utoipa::path(
    get,
    path = "/api/v1/deployments/{id}",
    params(DeploymentPath),
    responses(
        (status = 200, description = "Deployment", body = DeploymentView),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["deployments"],
    operation_id = "getDeployment"
)]
#[get("/deployments/{id}")]
pub async fn get_deployment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<DeploymentPath>,
) -> ApiResult<web::Json<DeploymentView>> {
    let user_id = session.require_user_id()?;
    let id = path.deployment_id()?;
    let deployment = state.deployments.get(&user_id, &id).await?;
    Ok(web::Json(deployment.into()))
}

/// Remove a deployment together with its cached schema and logs.
#[utoipa::path(
    delete,
    path = "/api/v1/deployments/{id}",
    params(DeploymentPath),
    responses(
        (status = 204, description = "Deployment removed"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["deployments"],
    operation_id = "removeDeployment"
)]
#[delete("/deployments/{id}")]
pub async fn remove_deployment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<DeploymentPath>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let id = path.deployment_id()?;
    state.deployments.remove(&user_id, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Probe the deployment and record the resulting status.
///
/// An unreachable deployment is reported as `success: false`, not as an
/// error status.
#[utoipa::path(
    post,
    path = "/api/v1/deployments/{id}/check",
    params(DeploymentPath),
    responses(
        (status = 200, description = "Check outcome", body = RemoteActionView),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["deployments"],
    operation_id = "checkDeployment"
)]
#[post("/deployments/{id}/check")]
pub async fn check_deployment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<DeploymentPath>,
) -> ApiResult<web::Json<RemoteActionView>> {
    let user_id = session.require_user_id()?;
    let id = path.deployment_id()?;
    let outcome = state.deployments.check_connection(&user_id, &id).await?;
    Ok(web::Json(outcome.into()))
}

/// Fetch the remote schema into the local cache.
#[utoipa::path(
    post,
    path = "/api/v1/deployments/{id}/schema/fetch",
    params(DeploymentPath),
    responses(
        (status = 200, description = "Fetch outcome", body = RemoteActionView),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["deployments"],
    operation_id = "fetchDeploymentSchema"
)]
#[post("/deployments/{id}/schema/fetch")]
pub async fn fetch_schema(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<DeploymentPath>,
) -> ApiResult<web::Json<RemoteActionView>> {
    let user_id = session.require_user_id()?;
    let id = path.deployment_id()?;
    let outcome = state.deployments.fetch_schema(&user_id, &id).await?;
    Ok(web::Json(outcome.into()))
}

#[cfg(test)]
#[path = "deployments_tests.rs"]
mod tests;
