//! In-process studio application for HTTP integration tests.
//!
//! Mirrors the server wiring with in-memory repositories, a two-account
//! login port and a scripted remote gateway, so suites exercise real
//! services end to end without sockets or a database.

use std::collections::HashMap;
use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use serde_json::{Value, json};

use studio::Trace;
use studio::domain::ports::{
    DeploymentGateway, DeploymentGatewayError, LoginService, ProbeOutcome, RemoteTarget,
    TableQuery,
};
use studio::domain::{
    BrowserService, DashboardService, DeploymentService, DocumentService, Error, LogService,
    LoginCredentials, SchemaService, UserId,
};
use studio::inbound::http::browser::{
    clear_pane, next_page, prev_page, refresh_pane, select_table, view_pane,
};
use studio::inbound::http::dashboard::dashboard;
use studio::inbound::http::deployments::{
    add_deployment, check_deployment, fetch_schema, get_deployment, list_deployments,
    remove_deployment,
};
use studio::inbound::http::documents::list_documents;
use studio::inbound::http::error::{json_error_handler, path_error_handler, query_error_handler};
use studio::inbound::http::logs::{append_log, clear_logs, list_deployment_logs, list_logs};
use studio::inbound::http::schema_cache::{diff_schemas, get_schema, list_tables, upsert_schema};
use studio::inbound::http::state::HttpState;
use studio::inbound::http::users::{login, logout};
use studio::outbound::memory::{
    InMemoryCachedSchemaRepository, InMemoryDeploymentRepository, InMemoryLogRepository,
};

pub const ALICE_ID: &str = "11111111-1111-4111-8111-111111111111";
pub const BOB_ID: &str = "22222222-2222-4222-8222-222222222222";

/// Marker in a deployment URL that makes every scripted remote call fail.
pub const OFFLINE_MARKER: &str = "offline";

/// Accepts `alice`/`wonderland` and `bob`/`builder`.
pub struct TwoAccountLogin;

#[async_trait]
impl LoginService for TwoAccountLogin {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let id = match (credentials.username(), credentials.password()) {
            ("alice", "wonderland") => ALICE_ID,
            ("bob", "builder") => BOB_ID,
            _ => return Err(Error::unauthorized("invalid credentials")),
        };
        UserId::new(id).map_err(|err| Error::internal(err.to_string()))
    }
}

/// Remote deployment double serving fixed tables and schemas.
///
/// Cursors are decimal offsets into the table's document list.
#[derive(Default)]
pub struct ScriptedGateway {
    schemas: HashMap<String, String>,
    tables: HashMap<String, Vec<Value>>,
}

impl ScriptedGateway {
    pub fn with_schema(mut self, url: &str, schema: Value) -> Self {
        self.schemas.insert(url.to_owned(), schema.to_string());
        self
    }

    pub fn with_table(mut self, table: &str, documents: Vec<Value>) -> Self {
        self.tables.insert(table.to_owned(), documents);
        self
    }

    fn offline(target: &RemoteTarget) -> bool {
        target.url.contains(OFFLINE_MARKER)
    }
}

#[async_trait]
impl DeploymentGateway for ScriptedGateway {
    async fn probe(&self, target: &RemoteTarget) -> ProbeOutcome {
        if Self::offline(target) {
            ProbeOutcome::Unreachable {
                message: "Connection failed: connection refused".to_owned(),
            }
        } else {
            ProbeOutcome::Reachable { status: 200 }
        }
    }

    async fn fetch_schema(&self, target: &RemoteTarget) -> Result<String, DeploymentGatewayError> {
        if Self::offline(target) {
            return Err(DeploymentGatewayError::transport(
                "Connection failed: connection refused",
            ));
        }
        Ok(self
            .schemas
            .get(target.base_url())
            .cloned()
            .unwrap_or_else(|| json!({ "tables": [], "functions": [] }).to_string()))
    }

    async fn query_documents(
        &self,
        target: &RemoteTarget,
        query: &TableQuery,
    ) -> Result<String, DeploymentGatewayError> {
        if Self::offline(target) {
            return Err(DeploymentGatewayError::status(
                502_u16,
                "Query failed (HTTP 502)",
            ));
        }
        let documents = self.tables.get(&query.table).cloned().unwrap_or_default();
        let start: usize = query
            .cursor
            .as_deref()
            .map(|cursor| cursor.parse().expect("scripted cursor is an offset"))
            .unwrap_or(0);
        let end = (start + query.page_size as usize).min(documents.len());
        let page = documents.get(start..end).map(<[Value]>::to_vec).unwrap_or_default();
        let is_done = end >= documents.len();
        let continue_cursor = (!is_done).then(|| end.to_string());
        Ok(json!({
            "status": "success",
            "value": { "page": page, "continueCursor": continue_cursor, "isDone": is_done }
        })
        .to_string())
    }
}

/// Build HTTP state over fresh in-memory repositories.
pub fn studio_state(gateway: ScriptedGateway, page_size: u32) -> web::Data<HttpState> {
    let deployments = Arc::new(InMemoryDeploymentRepository::default());
    let logs = Arc::new(InMemoryLogRepository::default());
    let schemas = Arc::new(InMemoryCachedSchemaRepository::default());
    let gateway = Arc::new(gateway);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let documents = Arc::new(DocumentService::new(deployments.clone(), gateway.clone()));

    web::Data::new(HttpState {
        login: Arc::new(TwoAccountLogin),
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
            100,
        )),
        schemas: Arc::new(SchemaService::new(deployments.clone(), schemas, clock)),
        browser: Arc::new(BrowserService::new(documents.clone(), page_size)),
        documents,
        dashboard: Arc::new(DashboardService::new(deployments, logs)),
        page_size,
    })
}

/// Initialise the full `/api/v1` surface over `state`.
pub async fn init_app(
    state: web::Data<HttpState>,
    key: Key,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    test::init_service(
        App::new()
            .app_data(state)
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(session)
                    .service(login)
                    .service(logout)
                    .service(dashboard)
                    .service(list_deployments)
                    .service(add_deployment)
                    .service(get_deployment)
                    .service(remove_deployment)
                    .service(check_deployment)
                    .service(fetch_schema)
                    .service(get_schema)
                    .service(upsert_schema)
                    .service(list_tables)
                    .service(list_documents)
                    .service(list_deployment_logs)
                    .service(append_log)
                    .service(clear_logs)
                    .service(list_logs)
                    .service(diff_schemas)
                    .service(view_pane)
                    .service(clear_pane)
                    .service(select_table)
                    .service(next_page)
                    .service(prev_page)
                    .service(refresh_pane),
            ),
    )
    .await
}

/// Sign in and return the session cookie.
pub async fn sign_in<S>(app: &S, username: &str, password: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "username": username, "password": password }))
            .to_request(),
    )
    .await;
    assert!(response.status().is_success(), "login failed: {}", response.status());
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Issue a request with an optional JSON body and return status plus body.
pub async fn send<S>(
    app: &S,
    request: test::TestRequest,
    cookie: &Cookie<'static>,
) -> (u16, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(app, request.cookie(cookie.clone()).to_request()).await;
    let status = response.status().as_u16();
    let body = test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

/// Register a deployment for the signed-in user and return its id.
pub async fn register<S>(app: &S, cookie: &Cookie<'static>, name: &str, url: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        test::TestRequest::post().uri("/api/v1/deployments").set_json(json!({
            "name": name,
            "url": url,
            "deployKey": "prod:secret-key-1234",
            "environment": "prod"
        })),
        cookie,
    )
    .await;
    assert_eq!(status, 201, "register failed: {body}");
    body["id"].as_str().expect("deployment id").to_owned()
}
