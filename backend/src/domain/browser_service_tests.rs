//! Tests for server-held browser panes.

use std::sync::Arc;

use pagination::Page;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockDocumentQuery;

fn record(id: &str) -> DocumentRecord {
    DocumentRecord::from_value(json!({ "_id": id, "name": id })).expect("valid document")
}

fn page(ids: &[&str], cursor: Option<&str>, has_more: bool) -> Page<DocumentRecord> {
    Page::new(
        ids.iter().map(|id| record(id)).collect(),
        cursor.map(str::to_owned),
        has_more,
    )
}

#[fixture]
fn user() -> UserId {
    UserId::random()
}

#[rstest]
#[tokio::test]
async fn select_loads_first_page(user: UserId) {
    let deployment_id = DeploymentId::random();
    let mut query = MockDocumentQuery::new();
    query
        .expect_query_page()
        .withf(move |_, id, q| *id == deployment_id && q.table == "users" && q.cursor.is_none())
        .times(1)
        .return_once(|_, _, _| Ok(Ok(page(&["a", "b"], Some("c1"), true))));
    let service = BrowserService::new(Arc::new(query), 10);

    let view = service
        .select(&user, Side::Left, deployment_id, "users".to_owned())
        .await
        .expect("select succeeds");

    assert_eq!(view.documents.len(), 2);
    assert_eq!(view.page, 0);
    assert!(view.can_next);
    assert!(!view.can_prev);
    assert!(!view.is_loading);
}

#[rstest]
#[tokio::test]
async fn next_uses_cursor_and_prev_restarts(user: UserId) {
    let deployment_id = DeploymentId::random();
    let mut query = MockDocumentQuery::new();
    query
        .expect_query_page()
        .withf(|_, _, q| q.cursor.is_none())
        .times(2)
        .returning(|_, _, _| Ok(Ok(page(&["a"], Some("c1"), true))));
    query
        .expect_query_page()
        .withf(|_, _, q| q.cursor.as_deref() == Some("c1"))
        .times(1)
        .return_once(|_, _, _| Ok(Ok(page(&["b"], None, false))));
    let service = BrowserService::new(Arc::new(query), 10);

    service
        .select(&user, Side::Left, deployment_id, "users".to_owned())
        .await
        .expect("select succeeds");
    let second = service.next(&user, Side::Left).await.expect("next succeeds");
    assert_eq!(second.page, 1);
    assert!(!second.can_next);
    assert!(second.can_prev);

    let first = service.prev(&user, Side::Left).await.expect("prev succeeds");
    assert_eq!(first.page, 0);
}

#[rstest]
#[tokio::test]
async fn next_without_more_data_is_a_no_op(user: UserId) {
    let mut query = MockDocumentQuery::new();
    query
        .expect_query_page()
        .times(1)
        .return_once(|_, _, _| Ok(Ok(page(&["a"], None, false))));
    let service = BrowserService::new(Arc::new(query), 10);

    service
        .select(&user, Side::Left, DeploymentId::random(), "users".to_owned())
        .await
        .expect("select succeeds");
    let view = service.next(&user, Side::Left).await.expect("next is a no-op");
    assert_eq!(view.page, 0);
    assert_eq!(view.documents.len(), 1);
}

#[rstest]
#[tokio::test]
async fn remote_failure_is_recorded_on_pane(user: UserId) {
    let mut query = MockDocumentQuery::new();
    query
        .expect_query_page()
        .return_once(|_, _, _| Ok(Err("Query failed (HTTP 500)".to_owned())));
    let service = BrowserService::new(Arc::new(query), 10);

    let view = service
        .select(&user, Side::Right, DeploymentId::random(), "users".to_owned())
        .await
        .expect("remote failures are shown, not raised");
    assert_eq!(view.error.as_deref(), Some("Query failed (HTTP 500)"));
    assert!(view.documents.is_empty());
    assert!(!view.is_loading);
}

#[rstest]
#[tokio::test]
async fn local_failure_is_raised_and_recorded(user: UserId) {
    let mut query = MockDocumentQuery::new();
    query
        .expect_query_page()
        .return_once(|_, id, _| Err(Error::not_found(format!("deployment {id} not found"))));
    let service = BrowserService::new(Arc::new(query), 10);

    let err = service
        .select(&user, Side::Left, DeploymentId::random(), "users".to_owned())
        .await
        .expect_err("unknown deployment");
    assert_eq!(err.code(), ErrorCode::NotFound);

    let view = service.view(&user, Side::Left).await.expect("view");
    assert!(view.error.is_some());
}

#[rstest]
#[tokio::test]
async fn sides_and_users_are_independent(user: UserId) {
    let mut query = MockDocumentQuery::new();
    query
        .expect_query_page()
        .return_once(|_, _, _| Ok(Ok(page(&["a"], None, false))));
    let service = BrowserService::new(Arc::new(query), 10);

    service
        .select(&user, Side::Left, DeploymentId::random(), "users".to_owned())
        .await
        .expect("select succeeds");

    let right = service.view(&user, Side::Right).await.expect("view");
    assert_eq!(right, PaneView::default());
    let other = service
        .view(&UserId::random(), Side::Left)
        .await
        .expect("view");
    assert_eq!(other, PaneView::default());
}

#[rstest]
#[tokio::test]
async fn clear_resets_pane(user: UserId) {
    let mut query = MockDocumentQuery::new();
    query
        .expect_query_page()
        .return_once(|_, _, _| Ok(Ok(page(&["a"], None, false))));
    let service = BrowserService::new(Arc::new(query), 10);

    service
        .select(&user, Side::Left, DeploymentId::random(), "users".to_owned())
        .await
        .expect("select succeeds");
    let view = service.clear(&user, Side::Left).await.expect("clear");
    assert_eq!(view, PaneView::default());
}

#[rstest]
#[tokio::test]
async fn blank_table_is_rejected(user: UserId) {
    let mut query = MockDocumentQuery::new();
    query.expect_query_page().never();
    let service = BrowserService::new(Arc::new(query), 10);

    let err = service
        .select(&user, Side::Left, DeploymentId::random(), " ".to_owned())
        .await
        .expect_err("blank table");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}
