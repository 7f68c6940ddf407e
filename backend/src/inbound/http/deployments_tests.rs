//! Tests for the deployment registry handlers.

use super::*;
use crate::domain::ports::{MockDeploymentRegistry, RemoteActionOutcome};
use crate::inbound::http::test_utils::{
    FIXTURE_USER_ID, fixture_state, sign_in, test_session_middleware,
};
use crate::inbound::http::users::login;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(login)
                .service(list_deployments)
                .service(add_deployment)
                .service(get_deployment)
                .service(remove_deployment)
                .service(check_deployment)
                .service(fetch_schema),
        )
}

fn is_fixture_user(user: &crate::domain::UserId) -> bool {
    user.to_string() == FIXTURE_USER_ID
}

#[rstest]
#[actix_web::test]
async fn listing_requires_a_session() {
    let app = actix_test::init_service(test_app(fixture_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/deployments")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn adding_returns_a_pending_deployment_without_the_key() {
    let app = actix_test::init_service(test_app(fixture_state())).await;
    let cookie = sign_in(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/deployments")
            .cookie(cookie)
            .set_json(json!({
                "name": "  production api ",
                "url": "https://happy-otter-123.convex.cloud",
                "deployKey": "prod:happy-otter|abcd1234",
                "environment": "prod"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["name"], "production api");
    assert_eq!(value["status"], "pending");
    assert_eq!(value["environment"], "prod");
    assert_eq!(value["keyHint"], "••••1234");
    assert!(!value.to_string().contains("happy-otter|"));
}

#[rstest]
#[actix_web::test]
async fn environment_defaults_to_dev() {
    let app = actix_test::init_service(test_app(fixture_state())).await;
    let cookie = sign_in(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/deployments")
            .cookie(cookie)
            .set_json(json!({
                "name": "scratch",
                "url": "http://127.0.0.1:3210",
                "deployKey": "local"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["environment"], "dev");
}

#[rstest]
#[case(json!({"url": "https://a.convex.cloud", "deployKey": "k"}), "name", "missing_field")]
#[case(json!({"name": "api", "url": "ftp://a.convex.cloud", "deployKey": "k"}), "url", "invalid_url")]
#[case(json!({"name": "api", "url": "https://a.convex.cloud", "deployKey": "   "}), "deployKey", "missing_field")]
#[case(json!({"name": "api", "url": "https://a.convex.cloud", "deployKey": "k", "environment": "qa"}), "environment", "invalid_label")]
#[actix_web::test]
async fn adding_rejects_invalid_input(
    #[case] body: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let app = actix_test::init_service(test_app(fixture_state())).await;
    let cookie = sign_in(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/deployments")
            .cookie(cookie)
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["code"], "invalid_request");
    assert_eq!(value["details"]["field"], field);
    assert_eq!(value["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn malformed_ids_are_rejected() {
    let app = actix_test::init_service(test_app(fixture_state())).await;
    let cookie = sign_in(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/deployments/not-a-uuid")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["details"]["code"], "invalid_uuid");
    assert_eq!(value["details"]["value"], "not-a-uuid");
}

#[rstest]
#[actix_web::test]
async fn unknown_deployments_are_not_found() {
    let app = actix_test::init_service(test_app(fixture_state())).await;
    let cookie = sign_in(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/deployments/{}", DeploymentId::random()))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn failed_checks_are_reported_in_the_body() {
    let id = DeploymentId::random();
    let mut registry = MockDeploymentRegistry::new();
    registry
        .expect_check_connection()
        .withf(move |user, requested| is_fixture_user(user) && *requested == id)
        .times(1)
        .return_once(|_, _| Ok(RemoteActionOutcome::failed("Server error (HTTP 502)")));
    let state = HttpState {
        deployments: Arc::new(registry),
        ..fixture_state()
    };
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = sign_in(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/deployments/{id}/check"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        value,
        json!({"success": false, "error": "Server error (HTTP 502)"})
    );
}

#[rstest]
#[actix_web::test]
async fn schema_fetch_reports_success() {
    let mut registry = MockDeploymentRegistry::new();
    registry
        .expect_fetch_schema()
        .times(1)
        .return_once(|_, _| Ok(RemoteActionOutcome::succeeded()));
    let state = HttpState {
        deployments: Arc::new(registry),
        ..fixture_state()
    };
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = sign_in(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!(
                "/api/v1/deployments/{}/schema/fetch",
                DeploymentId::random()
            ))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value, json!({"success": true}));
}

#[rstest]
#[actix_web::test]
async fn removing_returns_no_content() {
    let id = DeploymentId::random();
    let mut registry = MockDeploymentRegistry::new();
    registry
        .expect_remove()
        .withf(move |user, requested| is_fixture_user(user) && *requested == id)
        .times(1)
        .return_once(|_, _| Ok(()));
    let state = HttpState {
        deployments: Arc::new(registry),
        ..fixture_state()
    };
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = sign_in(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/deployments/{id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
