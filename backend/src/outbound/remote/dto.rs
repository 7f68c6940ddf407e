//! Request bodies sent to a remote deployment.

use serde::Serialize;

use crate::domain::ports::TableQuery;

/// System function serving paginated table reads.
pub(super) const PAGINATED_DOCUMENTS_PATH: &str = "_system/frontend/paginatedTableDocuments";

#[derive(Debug, Serialize)]
pub(super) struct QueryRequestDto<'a> {
    pub(super) path: &'static str,
    pub(super) args: PageArgsDto<'a>,
    pub(super) format: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PageArgsDto<'a> {
    pub(super) table_name: &'a str,
    pub(super) cursor: Option<&'a str>,
    pub(super) page_size: u32,
}

impl<'a> From<&'a TableQuery> for QueryRequestDto<'a> {
    fn from(query: &'a TableQuery) -> Self {
        Self {
            path: PAGINATED_DOCUMENTS_PATH,
            args: PageArgsDto {
                table_name: &query.table,
                cursor: query.cursor.as_deref(),
                page_size: query.page_size,
            },
            format: "json",
        }
    }
}
