//! Builders wiring repositories, the remote gateway and services into the
//! HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use studio::domain::ports::{
    CachedSchemaRepository, DeploymentGateway, DeploymentRepository, FixtureLoginService,
    LogRepository,
};
use studio::domain::{
    BrowserService, DashboardService, DeploymentService, DocumentService, LogService,
    SchemaService,
};
use studio::inbound::http::state::HttpState;
use studio::outbound::memory::{
    InMemoryCachedSchemaRepository, InMemoryDeploymentRepository, InMemoryLogRepository,
};
use studio::outbound::persistence::{
    DieselCachedSchemaRepository, DieselDeploymentRepository, DieselLogRepository,
};
use studio::outbound::remote::HttpDeploymentGateway;

use super::ServerConfig;

/// Driven adapters shared by every service.
struct Repositories<D, L, S> {
    deployments: Arc<D>,
    logs: Arc<L>,
    schemas: Arc<S>,
}

fn build_services<D, L, S, G>(
    repos: Repositories<D, L, S>,
    gateway: Arc<G>,
    config: &ServerConfig,
) -> HttpState
where
    D: DeploymentRepository + 'static,
    L: LogRepository + 'static,
    S: CachedSchemaRepository + 'static,
    G: DeploymentGateway + 'static,
{
    let Repositories {
        deployments,
        logs,
        schemas,
    } = repos;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let documents = Arc::new(DocumentService::new(deployments.clone(), gateway.clone()));

    HttpState {
        login: Arc::new(FixtureLoginService),
        deployments: Arc::new(DeploymentService::new(
            deployments.clone(),
            logs.clone(),
            schemas.clone(),
            gateway,
            clock.clone(),
        )),
        logs: Arc::new(LogService::new(
            deployments.clone(),
            logs.clone(),
            clock.clone(),
            config.log_limit,
        )),
        schemas: Arc::new(SchemaService::new(deployments.clone(), schemas, clock)),
        browser: Arc::new(BrowserService::new(documents.clone(), config.page_size)),
        documents,
        dashboard: Arc::new(DashboardService::new(deployments, logs)),
        page_size: config.page_size,
    }
}

/// Build the HTTP state, backed by PostgreSQL when the configuration carries
/// a pool and by in-memory repositories otherwise.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the remote HTTP client cannot be built.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let gateway = HttpDeploymentGateway::new(config.request_timeout)
        .map(Arc::new)
        .map_err(|err| std::io::Error::other(format!("remote client setup failed: {err}")))?;

    let state = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            build_services(
                Repositories {
                    deployments: Arc::new(DieselDeploymentRepository::new(pool.clone())),
                    logs: Arc::new(DieselLogRepository::new(pool.clone())),
                    schemas: Arc::new(DieselCachedSchemaRepository::new(pool.clone())),
                },
                gateway,
                config,
            )
        }
        None => {
            info!("no database configured; using in-memory repositories");
            build_services(
                Repositories {
                    deployments: Arc::new(InMemoryDeploymentRepository::default()),
                    logs: Arc::new(InMemoryLogRepository::default()),
                    schemas: Arc::new(InMemoryCachedSchemaRepository::default()),
                },
                gateway,
                config,
            )
        }
    };
    Ok(web::Data::new(state))
}
