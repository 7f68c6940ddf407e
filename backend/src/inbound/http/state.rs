//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BrowserSessions, DashboardQuery, DeploymentRegistry, DocumentQuery, LogBook, LoginService,
    SchemaCatalogue,
};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use studio::domain::ports::{
///     FixtureBrowserSessions, FixtureDashboardQuery, FixtureDeploymentRegistry,
///     FixtureDocumentQuery, FixtureLogBook, FixtureLoginService, FixtureSchemaCatalogue,
/// };
/// use studio::inbound::http::state::HttpState;
///
/// let state = HttpState {
///     login: Arc::new(FixtureLoginService),
///     deployments: Arc::new(FixtureDeploymentRegistry),
///     logs: Arc::new(FixtureLogBook),
///     schemas: Arc::new(FixtureSchemaCatalogue),
///     documents: Arc::new(FixtureDocumentQuery),
///     browser: Arc::new(FixtureBrowserSessions),
///     dashboard: Arc::new(FixtureDashboardQuery),
///     page_size: 10,
/// };
/// let _deployments = state.deployments.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub deployments: Arc<dyn DeploymentRegistry>,
    pub logs: Arc<dyn LogBook>,
    pub schemas: Arc<dyn SchemaCatalogue>,
    pub documents: Arc<dyn DocumentQuery>,
    pub browser: Arc<dyn BrowserSessions>,
    pub dashboard: Arc<dyn DashboardQuery>,
    /// Documents per page when a request does not name a limit.
    pub page_size: u32,
}
