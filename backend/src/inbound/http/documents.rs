//! Remote table page handler.
//!
//! ```text
//! GET /api/v1/deployments/{id}/tables/{table}/documents?cursor=…&limit=25
//! ```
//!
//! The remote cursor never reaches the client directly. It is wrapped in a
//! [`ContinuationToken`] bound to the deployment and table, so a cursor
//! cannot be replayed against a different selection.

use actix_web::{get, web};
use pagination::{ContinuationToken, Selection};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::TableQuery;
use crate::domain::{DocumentPage, DocumentRecord, Error, column_union};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_token_error, parse_deployment_id, required_text,
};
use crate::inbound::http::views::DocumentRowView;

const CURSOR_FIELD: FieldName = FieldName::new("cursor");

/// Path parameters naming a remote table.
#[derive(Debug, Deserialize, IntoParams)]
pub struct TablePath {
    /// Deployment identifier.
    pub id: String,
    /// Remote table name.
    pub table: String,
}

/// Paging parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DocumentsQuery {
    /// Token from a previous response's `nextCursor`; omit for the first page.
    pub cursor: Option<String>,
    /// Documents per page, clamped to `1..=100`; defaults to the configured
    /// page size.
    pub limit: Option<u32>,
}

/// One page of remote documents.
///
/// A remote failure yields an empty page with `error` set.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPageView {
    #[schema(value_type = Vec<Object>)]
    pub documents: Vec<DocumentRecord>,
    /// Union of document keys in first-seen order.
    pub columns: Vec<String>,
    /// Display rows aligned with `columns`.
    pub rows: Vec<DocumentRowView>,
    /// Opaque token for the following page.
    pub next_cursor: Option<String>,
    pub has_more: bool,
    /// Zero-based index of this page.
    pub page: u32,
    pub error: Option<String>,
}

impl DocumentPageView {
    fn loaded(selection: &Selection, page_index: u32, page: DocumentPage) -> Self {
        let next_cursor = page
            .can_continue()
            .then(|| page.cursor.as_deref())
            .flatten()
            .zip(page_index.checked_add(1))
            .map(|(cursor, next_index)| {
                ContinuationToken::new(selection, next_index, cursor).encode()
            });
        let columns = column_union(&page.items);
        Self {
            rows: DocumentRowView::render_all(&page.items, &columns),
            columns,
            documents: page.items,
            next_cursor,
            has_more: page.has_more,
            page: page_index,
            error: None,
        }
    }

    fn failed(page_index: u32, message: String) -> Self {
        Self {
            documents: Vec::new(),
            columns: Vec::new(),
            rows: Vec::new(),
            next_cursor: None,
            has_more: false,
            page: page_index,
            error: Some(message),
        }
    }
}

fn resume_point(cursor: Option<&str>, selection: &Selection) -> Result<(Option<String>, u32), Error> {
    let Some(raw) = cursor.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok((None, 0));
    };
    let token = ContinuationToken::decode(raw)
        .map_err(|err| invalid_token_error(CURSOR_FIELD, err.to_string()))?;
    token
        .verify_for(selection)
        .map_err(|err| invalid_token_error(CURSOR_FIELD, err.to_string()))?;
    if token.page() == u32::MAX {
        return Err(invalid_token_error(
            CURSOR_FIELD,
            "continuation token page is out of range",
        ));
    }
    Ok((Some(token.cursor().to_owned()), token.page()))
}

/// Fetch one page of a remote table.
#[utoipa::path(
    get,
    path = "/api/v1/deployments/{id}/tables/{table}/documents",
    params(TablePath, DocumentsQuery),
    responses(
        (status = 200, description = "Page of documents", body = DocumentPageView),
        (status = 400, description = "Invalid id or cursor", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["documents"],
    operation_id = "listDocuments"
)]
#[get("/deployments/{id}/tables/{table}/documents")]
pub async fn list_documents(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<TablePath>,
    query: web::Query<DocumentsQuery>,
) -> ApiResult<web::Json<DocumentPageView>> {
    let user_id = session.require_user_id()?;
    let TablePath { id, table } = path.into_inner();
    let id = parse_deployment_id(&id, FieldName::new("id"))?;
    let table = required_text(Some(table), FieldName::new("table"))?;
    let selection = Selection::new(id.to_string(), table.as_str());
    let DocumentsQuery { cursor, limit } = query.into_inner();
    let (cursor, page_index) = resume_point(cursor.as_deref(), &selection)?;

    let request = TableQuery {
        table,
        cursor,
        page_size: limit.unwrap_or(state.page_size),
    };
    let view = match state.documents.query_page(&user_id, &id, request).await? {
        Ok(page) => DocumentPageView::loaded(&selection, page_index, page),
        Err(message) => DocumentPageView::failed(page_index, message),
    };
    Ok(web::Json(view))
}
