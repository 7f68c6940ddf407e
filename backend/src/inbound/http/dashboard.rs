//! Overview handler.
//!
//! ```text
//! GET /api/v1/dashboard
//! ```

use actix_web::{get, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::views::DashboardView;

/// Totals across the caller's deployments plus their most recent logs.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardView),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["dashboard"],
    operation_id = "dashboard"
)]
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DashboardView>> {
    let user_id = session.require_user_id()?;
    let summary = state.dashboard.summary(&user_id).await?;
    Ok(web::Json(summary.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockDashboardQuery;
    use crate::domain::{DashboardSummary, Environment, NewDeployment};
    use crate::inbound::http::test_utils::{fixture_state, sign_in, test_session_middleware};
    use crate::inbound::http::users::login;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::Value;
    use std::sync::Arc;

    #[rstest]
    #[actix_web::test]
    async fn summary_is_scoped_to_the_session_user() {
        let mut query = MockDashboardQuery::new();
        query.expect_summary().times(1).return_once(|user| {
            let deployment = NewDeployment::try_new(
                "api",
                "https://happy-otter-123.convex.cloud",
                "key-9876",
                Environment::Staging,
            )
            .expect("valid deployment")
            .into_deployment(*user, Utc::now());
            Ok(DashboardSummary::build(vec![deployment], Vec::new()))
        });
        let state = HttpState {
            dashboard: Arc::new(query),
            ..fixture_state()
        };
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(test_session_middleware())
                .service(web::scope("/api/v1").service(login).service(dashboard)),
        )
        .await;
        let cookie = sign_in(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/dashboard")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["totalDeployments"], 1);
        assert_eq!(value["connected"], 0);
        assert_eq!(value["deployments"][0]["keyHint"], "••••9876");
        assert_eq!(value["recentLogs"], Value::Array(Vec::new()));
    }

    #[rstest]
    #[actix_web::test]
    async fn summary_requires_a_session() {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(fixture_state()))
                .wrap(test_session_middleware())
                .service(web::scope("/api/v1").service(dashboard)),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/dashboard")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
