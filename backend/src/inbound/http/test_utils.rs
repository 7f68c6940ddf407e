//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test as actix_test;
use serde_json::json;

use crate::domain::ports::{
    DEFAULT_PAGE_SIZE, FixtureBrowserSessions, FixtureDashboardQuery, FixtureDeploymentRegistry,
    FixtureDocumentQuery, FixtureLogBook, FixtureLoginService, FixtureSchemaCatalogue,
};
use crate::inbound::http::state::HttpState;

/// Fixed account accepted by [`FixtureLoginService`].
pub const FIXTURE_USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

/// Build a session middleware configured for tests.
///
/// A fresh key per call; the cookie is named `session` and is not `Secure`
/// so plain-HTTP test requests carry it.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the `session` cookie set by a response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// State wired entirely with fixture ports; tests override the port under
/// test.
pub fn fixture_state() -> HttpState {
    HttpState {
        login: Arc::new(FixtureLoginService),
        deployments: Arc::new(FixtureDeploymentRegistry),
        logs: Arc::new(FixtureLogBook),
        schemas: Arc::new(FixtureSchemaCatalogue),
        documents: Arc::new(FixtureDocumentQuery),
        browser: Arc::new(FixtureBrowserSessions),
        dashboard: Arc::new(FixtureDashboardQuery),
        page_size: DEFAULT_PAGE_SIZE,
    }
}

/// Sign in as the fixture account through `POST /api/v1/login` and return
/// the issued session cookie.
///
/// The app under test must mount [`super::users::login`] in the `/api/v1`
/// scope.
pub async fn sign_in<S, B>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "username": "admin", "password": "password" }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    session_cookie(&response)
}
