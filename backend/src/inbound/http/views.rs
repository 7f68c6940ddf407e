//! JSON response bodies shared by several handlers.
//!
//! Domain types stay free of serde and utoipa concerns; these views fix the
//! camelCase wire shape and never carry the raw deploy key.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::{PaneView, RemoteActionOutcome};
use crate::domain::schema::{ChangeCounts, DiffItem, DiffStatus, SchemaDiff};
use crate::domain::{CachedSchema, DashboardSummary, Deployment, DocumentRecord, LogEntry};

/// A registered deployment as returned to its owner.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentView {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "production api")]
    pub name: String,
    #[schema(example = "https://happy-otter-123.convex.cloud")]
    pub url: String,
    /// Last four characters of the deploy key behind a mask.
    #[schema(example = "••••a1b2")]
    pub key_hint: String,
    #[schema(example = "prod")]
    pub environment: String,
    #[schema(example = "pending")]
    pub status: String,
    pub last_checked: Option<String>,
    pub error_message: Option<String>,
    pub created_at: String,
}

impl From<Deployment> for DeploymentView {
    fn from(value: Deployment) -> Self {
        Self {
            id: value.id.to_string(),
            key_hint: value.deploy_key.hint(),
            name: value.name,
            url: value.url,
            environment: value.environment.as_str().to_owned(),
            status: value.status.as_str().to_owned(),
            last_checked: value.last_checked.map(|at| at.to_rfc3339()),
            error_message: value.error_message,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// One stored log entry.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogEntryView {
    pub id: String,
    pub deployment_id: String,
    #[schema(example = "error")]
    pub level: String,
    pub message: String,
    pub timestamp: String,
    pub function_name: Option<String>,
    pub request_id: Option<String>,
}

impl From<LogEntry> for LogEntryView {
    fn from(value: LogEntry) -> Self {
        Self {
            id: value.id.to_string(),
            deployment_id: value.deployment_id.to_string(),
            level: value.level.as_str().to_owned(),
            message: value.message,
            timestamp: value.timestamp.to_rfc3339(),
            function_name: value.function_name,
            request_id: value.request_id,
        }
    }
}

/// Outcome of a call against a remote deployment.
///
/// Remote failures are reported here with `success: false`; they never
/// produce an error status.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoteActionView {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Server error (HTTP 502)")]
    pub error: Option<String>,
}

impl From<RemoteActionOutcome> for RemoteActionView {
    fn from(value: RemoteActionOutcome) -> Self {
        Self {
            success: value.success,
            error: value.error,
        }
    }
}

/// Cached schema text with the table names it lists.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CachedSchemaView {
    pub deployment_id: String,
    pub schema: String,
    pub tables: Vec<String>,
    pub fetched_at: String,
}

impl From<CachedSchema> for CachedSchemaView {
    fn from(value: CachedSchema) -> Self {
        Self {
            deployment_id: value.deployment_id.to_string(),
            tables: value.table_names(),
            fetched_at: value.fetched_at.to_rfc3339(),
            schema: value.schema,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiffItemView {
    pub name: String,
    #[schema(example = "added")]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<DiffItem> for DiffItemView {
    fn from(value: DiffItem) -> Self {
        let status = match value.status {
            DiffStatus::Added => "added",
            DiffStatus::Removed => "removed",
            DiffStatus::Changed => "changed",
            DiffStatus::Unchanged => "unchanged",
        };
        Self {
            name: value.name,
            status: status.to_owned(),
            detail: value.detail,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeCountsView {
    pub tables: usize,
    pub indexes: usize,
    pub functions: usize,
}

impl From<ChangeCounts> for ChangeCountsView {
    fn from(value: ChangeCounts) -> Self {
        Self {
            tables: value.tables,
            indexes: value.indexes,
            functions: value.functions,
        }
    }
}

/// Classified differences between two cached schemas.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDiffView {
    pub tables: Vec<DiffItemView>,
    pub indexes: Vec<DiffItemView>,
    pub functions: Vec<DiffItemView>,
    pub changes: ChangeCountsView,
}

impl From<SchemaDiff> for SchemaDiffView {
    fn from(value: SchemaDiff) -> Self {
        let changes = value.change_count().into();
        let convert = |items: Vec<DiffItem>| items.into_iter().map(DiffItemView::from).collect();
        Self {
            tables: convert(value.tables),
            indexes: convert(value.indexes),
            functions: convert(value.functions),
            changes,
        }
    }
}

/// Overview figures for the landing page.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub total_deployments: usize,
    pub connected: usize,
    pub errored: usize,
    pub recent_log_count: usize,
    pub recent_errors: usize,
    pub deployments: Vec<DeploymentView>,
    pub recent_logs: Vec<LogEntryView>,
}

impl From<DashboardSummary> for DashboardView {
    fn from(value: DashboardSummary) -> Self {
        Self {
            total_deployments: value.total_deployments,
            connected: value.connected,
            errored: value.errored,
            recent_log_count: value.recent_log_count,
            recent_errors: value.recent_errors,
            deployments: value.deployments.into_iter().map(Into::into).collect(),
            recent_logs: value.recent_logs.into_iter().map(Into::into).collect(),
        }
    }
}

/// One document rendered for display: a cell per column plus the whole row as
/// pretty JSON for copying.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRowView {
    /// Document `_id`.
    pub id: String,
    /// Cell text aligned with the page's `columns`.
    pub cells: Vec<String>,
    /// Pretty-printed document.
    pub json: String,
}

impl DocumentRowView {
    /// Render `documents` against `columns`.
    #[must_use]
    pub fn render_all(documents: &[DocumentRecord], columns: &[String]) -> Vec<Self> {
        documents
            .iter()
            .map(|document| Self {
                id: document.id().to_owned(),
                cells: document.cells(columns),
                json: document.to_pretty_json(),
            })
            .collect()
    }
}

/// State of one side of the document browser.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaneViewDto {
    pub deployment_id: Option<String>,
    pub table: Option<String>,
    #[schema(value_type = Vec<Object>)]
    pub documents: Vec<DocumentRecord>,
    pub columns: Vec<String>,
    /// Display rows aligned with `columns`.
    pub rows: Vec<DocumentRowView>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub has_more: bool,
    /// Zero-based page index.
    pub page: u32,
    pub can_prev: bool,
    pub can_next: bool,
}

impl From<PaneView> for PaneViewDto {
    fn from(value: PaneView) -> Self {
        Self {
            deployment_id: value.deployment_id.map(|id| id.to_string()),
            table: value.table,
            rows: DocumentRowView::render_all(&value.documents, &value.columns),
            documents: value.documents,
            columns: value.columns,
            is_loading: value.is_loading,
            error: value.error,
            has_more: value.has_more,
            page: value.page,
            can_prev: value.can_prev,
            can_next: value.can_next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Environment, NewDeployment, UserId};
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    fn deployment_view_hides_key() {
        let deployment = NewDeployment::try_new(
            "api",
            "https://happy-otter-123.convex.cloud",
            "prod:secret-key-1234",
            Environment::Prod,
        )
        .expect("valid")
        .into_deployment(UserId::random(), Utc::now());

        let value = serde_json::to_value(DeploymentView::from(deployment)).expect("serialise");
        assert_eq!(value["keyHint"], "••••1234");
        assert_eq!(value["status"], "pending");
        assert!(!value.to_string().contains("secret-key"));
        assert_eq!(value["lastChecked"], Value::Null);
    }

    #[rstest]
    fn remote_action_omits_missing_error() {
        let value = serde_json::to_value(RemoteActionView::from(RemoteActionOutcome::succeeded()))
            .expect("serialise");
        assert_eq!(value, json!({"success": true}));
    }

    #[rstest]
    fn diff_view_counts_changes() {
        let diff = SchemaDiff {
            tables: vec![
                DiffItem {
                    name: "users".to_owned(),
                    status: DiffStatus::Added,
                    detail: None,
                },
                DiffItem {
                    name: "posts".to_owned(),
                    status: DiffStatus::Unchanged,
                    detail: None,
                },
            ],
            indexes: Vec::new(),
            functions: Vec::new(),
        };

        let value = serde_json::to_value(SchemaDiffView::from(diff)).expect("serialise");
        assert_eq!(value["tables"][0]["status"], "added");
        assert_eq!(value["changes"]["tables"], 1);
    }

    #[rstest]
    fn pane_view_renders_rows_against_columns() {
        let documents = [
            json!({"_id": "a", "createdAt": 1_700_000_000_000_i64}),
            json!({"_id": "b", "tags": ["x", "y"]}),
        ]
        .into_iter()
        .filter_map(DocumentRecord::from_value)
        .collect::<Vec<_>>();
        let pane = PaneView {
            columns: crate::domain::column_union(&documents),
            documents,
            ..PaneView::default()
        };

        let value = serde_json::to_value(PaneViewDto::from(pane)).expect("serialise");
        assert_eq!(
            value["rows"][0]["cells"],
            json!(["a", "2023-11-14T22:13:20.000Z", "null"])
        );
        assert_eq!(value["rows"][1]["cells"], json!(["b", "null", r#"["x","y"]"#]));
        assert!(value["rows"][1]["json"].as_str().expect("json").contains("\"tags\""));
    }
}
