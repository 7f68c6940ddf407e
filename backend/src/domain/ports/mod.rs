//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`DeploymentGateway`]) describe what the
//! domain needs from storage and from remote deployments. Driving ports
//! describe the use-cases inbound adapters may call. Each driven port exposes
//! a typed error generated by `define_port_error!` so adapters map their
//! failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod browser_sessions;
mod cached_schema_repository;
mod dashboard_query;
mod deployment_gateway;
mod deployment_registry;
mod deployment_repository;
mod document_query;
mod log_book;
mod log_repository;
mod login_service;
mod schema_catalogue;

#[cfg(test)]
pub use browser_sessions::MockBrowserSessions;
pub use browser_sessions::{BrowserSessions, FixtureBrowserSessions, PaneView, Side};
#[cfg(test)]
pub use cached_schema_repository::MockCachedSchemaRepository;
pub use cached_schema_repository::{
    CachedSchemaRepository, CachedSchemaRepositoryError, FixtureCachedSchemaRepository,
};
#[cfg(test)]
pub use dashboard_query::MockDashboardQuery;
pub use dashboard_query::{DashboardQuery, FixtureDashboardQuery};
#[cfg(test)]
pub use deployment_gateway::MockDeploymentGateway;
pub use deployment_gateway::{
    DEFAULT_PAGE_SIZE, DeploymentGateway, DeploymentGatewayError, FixtureDeploymentGateway,
    ProbeOutcome, RemoteTarget, TableQuery,
};
#[cfg(test)]
pub use deployment_registry::MockDeploymentRegistry;
pub use deployment_registry::{DeploymentRegistry, FixtureDeploymentRegistry, RemoteActionOutcome};
#[cfg(test)]
pub use deployment_repository::MockDeploymentRepository;
pub use deployment_repository::{
    DeploymentRepository, DeploymentRepositoryError, FixtureDeploymentRepository,
};
#[cfg(test)]
pub use document_query::MockDocumentQuery;
pub use document_query::{DocumentQuery, FixtureDocumentQuery, RemotePage};
#[cfg(test)]
pub use log_book::MockLogBook;
pub use log_book::{FixtureLogBook, LogBook};
#[cfg(test)]
pub use log_repository::MockLogRepository;
pub use log_repository::{FixtureLogRepository, LogRepository, LogRepositoryError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FixtureLoginService, LoginService};
#[cfg(test)]
pub use schema_catalogue::MockSchemaCatalogue;
pub use schema_catalogue::{FixtureSchemaCatalogue, SchemaCatalogue};
