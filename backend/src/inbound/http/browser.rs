//! Side-by-side data browser handlers.
//!
//! ```text
//! GET    /api/v1/browser/{side}
//! DELETE /api/v1/browser/{side}
//! PUT    /api/v1/browser/{side}/selection {"deploymentId":"…","table":"users"}
//! POST   /api/v1/browser/{side}/next
//! POST   /api/v1/browser/{side}/prev
//! POST   /api/v1/browser/{side}/refresh
//! ```
//!
//! Pane state lives on the server per signed-in user. A remote failure is
//! shown in the pane's `error` field with a `200` response.

use actix_web::{delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Error;
use crate::domain::ports::Side;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_deployment_id, parse_side, required_text,
};
use crate::inbound::http::views::PaneViewDto;

/// Path parameters naming a pane.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SidePath {
    /// `left` or `right`.
    pub side: String,
}

impl SidePath {
    fn side(&self) -> Result<Side, Error> {
        parse_side(&self.side, FieldName::new("side"))
    }
}

/// Request body selecting what a pane shows.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectTableRequest {
    pub deployment_id: Option<String>,
    #[schema(example = "users")]
    pub table: Option<String>,
}

/// Current state of a pane.
#[utoipa::path(
    get,
    path = "/api/v1/browser/{side}",
    params(SidePath),
    responses(
        (status = 200, description = "Pane state", body = PaneViewDto),
        (status = 400, description = "Unknown side", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["browser"],
    operation_id = "viewPane"
)]
#[get("/browser/{side}")]
pub async fn view_pane(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<SidePath>,
) -> ApiResult<web::Json<PaneViewDto>> {
    let user_id = session.require_user_id()?;
    let view = state.browser.view(&user_id, path.side()?).await?;
    Ok(web::Json(view.into()))
}

/// Point a pane at a table and load its first page.
#[utoipa::path(
    put,
    path = "/api/v1/browser/{side}/selection",
    params(SidePath),
    request_body = SelectTableRequest,
    responses(
        (status = 200, description = "Pane state", body = PaneViewDto),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown deployment", body = ErrorSchema)
    ),
    tags = ["browser"],
    operation_id = "selectTable"
)]
#[put("/browser/{side}/selection")]
pub async fn select_table(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<SidePath>,
    payload: web::Json<SelectTableRequest>,
) -> ApiResult<web::Json<PaneViewDto>> {
    let user_id = session.require_user_id()?;
    let side = path.side()?;
    let SelectTableRequest {
        deployment_id,
        table,
    } = payload.into_inner();
    let field = FieldName::new("deploymentId");
    let deployment_id = parse_deployment_id(&required_text(deployment_id, field)?, field)?;
    let table = required_text(table, FieldName::new("table"))?;
    let view = state
        .browser
        .select(&user_id, side, deployment_id, table)
        .await?;
    Ok(web::Json(view.into()))
}

/// Load the next page when the pane can continue.
#[utoipa::path(
    post,
    path = "/api/v1/browser/{side}/next",
    params(SidePath),
    responses(
        (status = 200, description = "Pane state", body = PaneViewDto),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["browser"],
    operation_id = "nextPage"
)]
#[post("/browser/{side}/next")]
pub async fn next_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<SidePath>,
) -> ApiResult<web::Json<PaneViewDto>> {
    let user_id = session.require_user_id()?;
    let view = state.browser.next(&user_id, path.side()?).await?;
    Ok(web::Json(view.into()))
}

/// Restart from the first page.
///
/// Remote cursors only move forward, so going back always lands on page 0.
#[utoipa::path(
    post,
    path = "/api/v1/browser/{side}/prev",
    params(SidePath),
    responses(
        (status = 200, description = "Pane state", body = PaneViewDto),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["browser"],
    operation_id = "previousPage"
)]
#[post("/browser/{side}/prev")]
pub async fn prev_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<SidePath>,
) -> ApiResult<web::Json<PaneViewDto>> {
    let user_id = session.require_user_id()?;
    let view = state.browser.prev(&user_id, path.side()?).await?;
    Ok(web::Json(view.into()))
}

/// Reload the current selection from the first page.
#[utoipa::path(
    post,
    path = "/api/v1/browser/{side}/refresh",
    params(SidePath),
    responses(
        (status = 200, description = "Pane state", body = PaneViewDto),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["browser"],
    operation_id = "refreshPane"
)]
#[post("/browser/{side}/refresh")]
pub async fn refresh_pane(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<SidePath>,
) -> ApiResult<web::Json<PaneViewDto>> {
    let user_id = session.require_user_id()?;
    let view = state.browser.refresh(&user_id, path.side()?).await?;
    Ok(web::Json(view.into()))
}

/// Drop the pane's selection and documents.
#[utoipa::path(
    delete,
    path = "/api/v1/browser/{side}",
    params(SidePath),
    responses(
        (status = 200, description = "Cleared pane", body = PaneViewDto),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["browser"],
    operation_id = "clearPane"
)]
#[delete("/browser/{side}")]
pub async fn clear_pane(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<SidePath>,
) -> ApiResult<web::Json<PaneViewDto>> {
    let user_id = session.require_user_id()?;
    let view = state.browser.clear(&user_id, path.side()?).await?;
    Ok(web::Json(view.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockBrowserSessions, PaneView};
    use crate::domain::{DeploymentId, DocumentRecord};
    use crate::inbound::http::test_utils::{fixture_state, sign_in, test_session_middleware};
    use crate::inbound::http::users::login;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
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
                    .service(view_pane)
                    .service(select_table)
                    .service(next_page)
                    .service(prev_page)
                    .service(refresh_pane)
                    .service(clear_pane),
            )
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_side_is_rejected() {
        let app = actix_test::init_service(test_app(fixture_state())).await;
        let cookie = sign_in(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/browser/middle")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["message"], "side must be one of left|right");
    }

    #[rstest]
    #[actix_web::test]
    async fn selection_is_forwarded_for_the_requested_side() {
        let id = DeploymentId::random();
        let mut browser = MockBrowserSessions::new();
        browser
            .expect_select()
            .withf(move |_, side, deployment_id, table| {
                *side == Side::Right && *deployment_id == id && table == "users"
            })
            .times(1)
            .return_once(move |_, _, deployment_id, table| {
                let document = DocumentRecord::from_value(json!({"_id": "a", "name": "Ada"}))
                    .expect("valid document");
                Ok(PaneView {
                    deployment_id: Some(deployment_id),
                    table: Some(table),
                    documents: vec![document],
                    columns: vec!["_id".to_owned(), "name".to_owned()],
                    has_more: true,
                    can_next: true,
                    ..PaneView::default()
                })
            });
        let state = HttpState {
            browser: Arc::new(browser),
            ..fixture_state()
        };
        let app = actix_test::init_service(test_app(state)).await;
        let cookie = sign_in(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/v1/browser/right/selection")
                .cookie(cookie)
                .set_json(json!({"deploymentId": id.to_string(), "table": " users "}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["deploymentId"], id.to_string());
        assert_eq!(value["documents"][0]["name"], "Ada");
        assert_eq!(value["canNext"], true);
        assert_eq!(value["canPrev"], false);
        assert_eq!(value["page"], 0);
    }

    #[rstest]
    #[case(json!({"table": "users"}), "deploymentId")]
    #[case(json!({"deploymentId": "3fa85f64-5717-4562-b3fc-2c963f66afa6", "table": ""}), "table")]
    #[actix_web::test]
    async fn selection_requires_deployment_and_table(#[case] body: Value, #[case] field: &str) {
        let app = actix_test::init_service(test_app(fixture_state())).await;
        let cookie = sign_in(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/v1/browser/left/selection")
                .cookie(cookie)
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["details"]["field"], field);
    }

    #[rstest]
    #[case("next")]
    #[case("prev")]
    #[case("refresh")]
    #[actix_web::test]
    async fn navigation_returns_the_pane(#[case] action: &str) {
        let app = actix_test::init_service(test_app(fixture_state())).await;
        let cookie = sign_in(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/browser/left/{action}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["isLoading"], false);
        assert_eq!(value["documents"], json!([]));
    }

    #[rstest]
    #[actix_web::test]
    async fn clearing_requires_a_session() {
        let app = actix_test::init_service(test_app(fixture_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri("/api/v1/browser/left")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
