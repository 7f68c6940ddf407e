//! Log stream handlers.
//!
//! ```text
//! GET    /api/v1/logs?deploymentId=…&level=error&q=timeout&limit=50
//! GET    /api/v1/deployments/{id}/logs?level=…&q=…&limit=…
//! POST   /api/v1/deployments/{id}/logs {"level":"error","message":"…"}
//! DELETE /api/v1/deployments/{id}/logs
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{DeploymentId, Error, LogFilter, LogLevel, NewLogEntry};
use crate::inbound::http::ApiResult;
use crate::inbound::http::deployments::DeploymentPath;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_deployment_id, parse_log_level, required_text,
};
use crate::inbound::http::views::LogEntryView;

const LEVEL_FIELD: FieldName = FieldName::new("level");

/// Filters for `GET /api/v1/logs`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LogListQuery {
    /// Restrict to one deployment.
    pub deployment_id: Option<String>,
    /// `error`, `warning`, `info` or `debug`.
    pub level: Option<String>,
    /// Case-insensitive text matched against message and function name.
    pub q: Option<String>,
    /// Maximum entries, clamped to `1..=1000`; defaults to 100.
    pub limit: Option<usize>,
}

/// Filters for `GET /api/v1/deployments/{id}/logs`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeploymentLogQuery {
    pub level: Option<String>,
    pub q: Option<String>,
    pub limit: Option<usize>,
}

/// Request body for appending an entry.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppendLogRequest {
    /// Defaults to `info`.
    #[schema(example = "error")]
    pub level: Option<String>,
    #[schema(example = "Uncaught Error: connection reset")]
    pub message: Option<String>,
    #[schema(example = "messages:send")]
    pub function_name: Option<String>,
    pub request_id: Option<String>,
}

/// Response body for a bulk clear.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClearLogsResponse {
    /// Number of entries deleted.
    pub removed: usize,
}

fn optional_level(raw: Option<&str>) -> Result<Option<LogLevel>, Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_log_level(value, LEVEL_FIELD).map(Some),
    }
}

fn optional_text(raw: Option<String>) -> Option<String> {
    raw.map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

impl LogListQuery {
    fn into_filter(self) -> Result<LogFilter, Error> {
        let deployment_id = match self.deployment_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_deployment_id(raw, FieldName::new("deploymentId"))?),
        };
        Ok(LogFilter {
            deployment_id,
            level: optional_level(self.level.as_deref())?,
            text: optional_text(self.q),
            limit: self.limit,
        })
    }
}

impl DeploymentLogQuery {
    fn into_filter(self, deployment_id: DeploymentId) -> Result<LogFilter, Error> {
        Ok(LogFilter {
            deployment_id: Some(deployment_id),
            level: optional_level(self.level.as_deref())?,
            text: optional_text(self.q),
            limit: self.limit,
        })
    }
}

impl TryFrom<AppendLogRequest> for NewLogEntry {
    type Error = Error;

    fn try_from(value: AppendLogRequest) -> Result<Self, Self::Error> {
        let message = required_text(value.message, FieldName::new("message"))?;
        let level = optional_level(value.level.as_deref())?.unwrap_or(LogLevel::Info);
        Ok(Self {
            level,
            message,
            function_name: optional_text(value.function_name),
            request_id: optional_text(value.request_id),
        })
    }
}

fn to_views(entries: Vec<crate::domain::LogEntry>) -> Vec<LogEntryView> {
    entries.into_iter().map(LogEntryView::from).collect()
}

/// List the caller's log entries across deployments, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/logs",
    params(LogListQuery),
    responses(
        (status = 200, description = "Log entries", body = [LogEntryView]),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["logs"],
    operation_id = "listLogs"
)]
#[get("/logs")]
pub async fn list_logs(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<LogListQuery>,
) -> ApiResult<web::Json<Vec<LogEntryView>>> {
    let user_id = session.require_user_id()?;
    let filter = query.into_inner().into_filter()?;
    let entries = state.logs.list(&user_id, filter).await?;
    Ok(web::Json(to_views(entries)))
}

/// List one deployment's entries, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/deployments/{id}/logs",
    params(DeploymentPath, DeploymentLogQuery),
    responses(
        (status = 200, description = "Log entries", body = [LogEntryView]),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["logs"],
    operation_id = "listDeploymentLogs"
)]
#[get("/deployments/{id}/logs")]
pub async fn list_deployment_logs(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<DeploymentPath>,
    query: web::Query<DeploymentLogQuery>,
) -> ApiResult<web::Json<Vec<LogEntryView>>> {
    let user_id = session.require_user_id()?;
    let id = path.deployment_id()?;
    let filter = query.into_inner().into_filter(id)?;
    let entries = state.logs.list(&user_id, filter).await?;
    Ok(web::Json(to_views(entries)))
}

/// Append an entry stamped with the current time.
#[utoipa::path(
    post,
    path = "/api/v1/deployments/{id}/logs",
    params(DeploymentPath),
    request_body = AppendLogRequest,
    responses(
        (status = 201, description = "Entry stored", body = LogEntryView),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["logs"],
    operation_id = "appendLog"
)]
#[post("/deployments/{id}/logs")]
pub async fn append_log(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<DeploymentPath>,
    payload: web::Json<AppendLogRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let id = path.deployment_id()?;
    let entry = NewLogEntry::try_from(payload.into_inner())?;
    let stored = state.logs.append(&user_id, &id, entry).await?;
    Ok(HttpResponse::Created().json(LogEntryView::from(stored)))
}

/// Delete every entry the caller owns for a deployment.
#[utoipa::path(
    delete,
    path = "/api/v1/deployments/{id}/logs",
    params(DeploymentPath),
    responses(
        (status = 200, description = "Entries removed", body = ClearLogsResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["logs"],
    operation_id = "clearLogs"
)]
#[delete("/deployments/{id}/logs")]
pub async fn clear_logs(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<DeploymentPath>,
) -> ApiResult<web::Json<ClearLogsResponse>> {
    let user_id = session.require_user_id()?;
    let id = path.deployment_id()?;
    let removed = state.logs.clear(&user_id, &id).await?;
    Ok(web::Json(ClearLogsResponse { removed }))
}

#[cfg(test)]
#[path = "logs_tests.rs"]
mod tests;
