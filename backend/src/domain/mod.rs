//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed entities for registered deployments, their
//! logs and cached schemas, plus the services that implement the driving
//! ports. Keep types free of transport concerns and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Deployment, NewDeployment, DeployKey: registered remote backends.
//! - LogEntry, LogFilter, LogQuery: per-deployment log streams.
//! - CachedSchema and the `schema` module: schema parsing and diffing.
//! - DocumentRecord, DocumentPage: remote table rows and their envelope.
//! - DashboardSummary: overview figures.
//! - `*Service` types: implementations of the driving ports.

pub mod auth;
pub mod browser_service;
pub mod cached_schema;
pub mod dashboard;
pub mod dashboard_service;
pub mod deployment;
pub mod deployment_service;
pub mod document_service;
pub mod documents;
pub mod error;
pub mod log_service;
pub mod logs;
pub mod ports;
pub mod schema;
pub mod schema_service;
pub mod trace_id;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::browser_service::BrowserService;
pub use self::cached_schema::CachedSchema;
pub use self::dashboard::{DashboardSummary, RECENT_LIST_LEN, RECENT_LOG_WINDOW};
pub use self::dashboard_service::DashboardService;
pub use self::deployment::{
    ConnectionStatus, DeployKey, Deployment, DeploymentId, DeploymentValidationError,
    Environment, NewDeployment, ParseLabelError, StatusUpdate,
};
pub use self::deployment_service::DeploymentService;
pub use self::document_service::{DocumentService, MAX_PAGE_SIZE};
pub use self::documents::{
    CellValue, DocumentPage, DocumentRecord, ID_FIELD, column_union, format_cell,
    parse_documents_response,
};
pub use self::error::{Error, ErrorCode};
pub use self::log_service::LogService;
pub use self::logs::{
    DEFAULT_LOG_LIMIT, LogEntry, LogEntryId, LogFilter, LogLevel, LogQuery, MAX_LOG_LIMIT,
    NewLogEntry,
};
pub use self::schema_service::SchemaService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{UserId, UserIdError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use studio::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::not_found("no such deployment"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
