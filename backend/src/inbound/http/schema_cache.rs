//! Cached schema and schema comparison handlers.
//!
//! ```text
//! GET /api/v1/deployments/{id}/schema
//! PUT /api/v1/deployments/{id}/schema {"schema":"{\"tables\":[…],\"functions\":[…]}"}
//! GET /api/v1/deployments/{id}/tables
//! GET /api/v1/schema-diff?left={id}&right={id}
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::deployments::DeploymentPath;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_deployment_id, required_text};
use crate::inbound::http::views::{CachedSchemaView, SchemaDiffView};

/// Manual schema input.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpsertSchemaRequest {
    /// Schema JSON with `tables` and `functions` arrays.
    #[schema(example = r#"{"tables":[{"name":"users","fields":{},"indexes":[]}],"functions":[]}"#)]
    pub schema: Option<String>,
}

/// Deployments to compare.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SchemaDiffQuery {
    /// Deployment treated as the baseline.
    pub left: Option<String>,
    /// Deployment compared against the baseline.
    pub right: Option<String>,
}

/// Table names listed by a cached schema.
#[derive(Debug, Serialize, ToSchema)]
pub struct TablesResponse {
    pub tables: Vec<String>,
}

/// Return the cached schema for a deployment.
#[utoipa::path(
    get,
    path = "/api/v1/deployments/{id}/schema",
    params(DeploymentPath),
    responses(
        (status = 200, description = "Cached schema", body = CachedSchemaView),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Nothing cached or unknown deployment", body = ErrorSchema)
    ),
    tags = ["schemas"],
    operation_id = "getCachedSchema"
)]
#[get("/deployments/{id}/schema")]
pub async fn get_schema(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<DeploymentPath>,
) -> ApiResult<web::Json<CachedSchemaView>> {
    let user_id = session.require_user_id()?;
    let id = path.deployment_id()?;
    let cached = state
        .schemas
        .get_cached(&user_id, &id)
        .await?
        .ok_or_else(|| Error::not_found(format!("no schema cached for deployment {id}")))?;
    Ok(web::Json(cached.into()))
}

/// Store manually entered schema text, replacing any cached copy.
#[utoipa::path(
    put,
    path = "/api/v1/deployments/{id}/schema",
    params(DeploymentPath),
    request_body = UpsertSchemaRequest,
    responses(
        (status = 200, description = "Schema cached", body = CachedSchemaView),
        (status = 400, description = "Blank schema", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["schemas"],
    operation_id = "upsertSchema"
)]
#[put("/deployments/{id}/schema")]
pub async fn upsert_schema(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<DeploymentPath>,
    payload: web::Json<UpsertSchemaRequest>,
) -> ApiResult<web::Json<CachedSchemaView>> {
    let user_id = session.require_user_id()?;
    let id = path.deployment_id()?;
    let schema = required_text(payload.into_inner().schema, FieldName::new("schema"))?;
    let cached = state.schemas.upsert(&user_id, &id, schema).await?;
    Ok(web::Json(cached.into()))
}

/// List the table names in the cached schema; empty when nothing is cached.
#[utoipa::path(
    get,
    path = "/api/v1/deployments/{id}/tables",
    params(DeploymentPath),
    responses(
        (status = 200, description = "Table names", body = TablesResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["schemas"],
    operation_id = "listTables"
)]
#[get("/deployments/{id}/tables")]
pub async fn list_tables(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<DeploymentPath>,
) -> ApiResult<web::Json<TablesResponse>> {
    let user_id = session.require_user_id()?;
    let id = path.deployment_id()?;
    let tables = state.schemas.table_names(&user_id, &id).await?;
    Ok(web::Json(TablesResponse { tables }))
}

/// Compare the cached schemas of two deployments.
///
/// Both deployments need a cached schema; otherwise the response is
/// `404 not_found`.
#[utoipa::path(
    get,
    path = "/api/v1/schema-diff",
    params(SchemaDiffQuery),
    responses(
        (status = 200, description = "Schema differences", body = SchemaDiffView),
        (status = 400, description = "Invalid ids", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Missing schema or deployment", body = ErrorSchema)
    ),
    tags = ["schemas"],
    operation_id = "diffSchemas"
)]
#[get("/schema-diff")]
pub async fn diff_schemas(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SchemaDiffQuery>,
) -> ApiResult<web::Json<SchemaDiffView>> {
    let user_id = session.require_user_id()?;
    let SchemaDiffQuery { left, right } = query.into_inner();
    let left_field = FieldName::new("left");
    let right_field = FieldName::new("right");
    let left = parse_deployment_id(&required_text(left, left_field)?, left_field)?;
    let right = parse_deployment_id(&required_text(right, right_field)?, right_field)?;
    let diff = state
        .schemas
        .diff(&user_id, &left, &right)
        .await?
        .ok_or_else(|| Error::not_found("both deployments need a cached schema to compare"))?;
    Ok(web::Json(diff.into()))
}
