//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer
//! - **Schemas**: request bodies, response views and the error wrappers
//!   ([`ErrorSchema`], [`ErrorCodeSchema`]) that describe domain types
//!   without coupling them to utoipa
//! - **Security**: Session cookie authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::browser::SelectTableRequest;
use crate::inbound::http::deployments::AddDeploymentRequest;
use crate::inbound::http::documents::DocumentPageView;
use crate::inbound::http::logs::{AppendLogRequest, ClearLogsResponse};
use crate::inbound::http::schema_cache::{TablesResponse, UpsertSchemaRequest};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::LoginRequest;
use crate::inbound::http::views::{
    CachedSchemaView, ChangeCountsView, DashboardView, DeploymentView, DiffItemView,
    DocumentRowView, LogEntryView, PaneViewDto, RemoteActionView, SchemaDiffView,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Convex Studio API",
        description = "Register remote deployments, browse their tables, compare cached schemas and read their logs."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::dashboard::dashboard,
        crate::inbound::http::deployments::list_deployments,
        crate::inbound::http::deployments::add_deployment,
        crate::inbound::http::deployments::get_deployment,
        crate::inbound::http::deployments::remove_deployment,
        crate::inbound::http::deployments::check_deployment,
        crate::inbound::http::deployments::fetch_schema,
        crate::inbound::http::schema_cache::get_schema,
        crate::inbound::http::schema_cache::upsert_schema,
        crate::inbound::http::schema_cache::list_tables,
        crate::inbound::http::schema_cache::diff_schemas,
        crate::inbound::http::documents::list_documents,
        crate::inbound::http::logs::list_logs,
        crate::inbound::http::logs::list_deployment_logs,
        crate::inbound::http::logs::append_log,
        crate::inbound::http::logs::clear_logs,
        crate::inbound::http::browser::view_pane,
        crate::inbound::http::browser::select_table,
        crate::inbound::http::browser::next_page,
        crate::inbound::http::browser::prev_page,
        crate::inbound::http::browser::refresh_pane,
        crate::inbound::http::browser::clear_pane,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        LoginRequest,
        AddDeploymentRequest,
        AppendLogRequest,
        UpsertSchemaRequest,
        SelectTableRequest,
        DeploymentView,
        RemoteActionView,
        LogEntryView,
        ClearLogsResponse,
        CachedSchemaView,
        TablesResponse,
        DiffItemView,
        ChangeCountsView,
        SchemaDiffView,
        DocumentPageView,
        DocumentRowView,
        PaneViewDto,
        DashboardView,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "users", description = "Sign in and out"),
        (name = "dashboard", description = "Overview of the caller's deployments"),
        (name = "deployments", description = "Registered remote deployments"),
        (name = "schemas", description = "Cached schemas and schema comparison"),
        (name = "documents", description = "Remote table documents"),
        (name = "logs", description = "Per-deployment log streams"),
        (name = "browser", description = "Server-held table browser panes"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document's paths and schema fields.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // Note: utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    fn schema(name: &str) -> RefOr<Schema> {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.expect("components").schemas;
        schemas
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("{name} schema registered"))
    }

    #[rstest]
    fn openapi_error_schema_has_required_fields() {
        let error_schema = schema(ERROR_SCHEMA_NAME);
        assert_object_schema_has_field(&error_schema, "code");
        assert_object_schema_has_field(&error_schema, "message");
        assert_object_schema_has_field(&error_schema, "traceId");
    }

    #[rstest]
    #[case("DeploymentView", "keyHint")]
    #[case("DocumentPageView", "nextCursor")]
    #[case("PaneViewDto", "canNext")]
    #[case("DocumentRowView", "cells")]
    #[case("SchemaDiffView", "changes")]
    #[case("DashboardView", "recentLogs")]
    fn openapi_views_use_camel_case_fields(#[case] name: &str, #[case] field: &str) {
        assert_object_schema_has_field(&schema(name), field);
    }

    #[rstest]
    #[case("/api/v1/login")]
    #[case("/api/v1/deployments/{id}/tables/{table}/documents")]
    #[case("/api/v1/schema-diff")]
    #[case("/api/v1/browser/{side}/selection")]
    #[case("/health/ready")]
    fn openapi_registers_paths(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }
}
