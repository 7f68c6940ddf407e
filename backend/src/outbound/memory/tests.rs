//! Tests for the in-memory repositories.

use chrono::{Duration, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{ConnectionStatus, Environment, LogLevel, NewDeployment, NewLogEntry};

#[fixture]
fn owner() -> UserId {
    UserId::random()
}

fn deployment(owner: UserId) -> Deployment {
    NewDeployment::try_new("api", "http://localhost:3210", "key", Environment::Dev)
        .expect("valid deployment")
        .into_deployment(owner, Utc::now())
}

fn log(owner: UserId, deployment_id: DeploymentId, level: LogLevel, minute: u32) -> LogEntry {
    let timestamp = Utc
        .with_ymd_and_hms(2026, 3, 1, 9, minute, 0)
        .single()
        .expect("valid timestamp");
    NewLogEntry {
        level,
        message: format!("event {minute}"),
        function_name: None,
        request_id: None,
    }
    .into_entry(deployment_id, owner, timestamp)
}

#[rstest]
#[tokio::test]
async fn deployments_are_scoped_to_owner(owner: UserId) {
    let repo = InMemoryDeploymentRepository::default();
    let mine = deployment(owner);
    repo.insert(&mine).await.expect("insert");

    let stranger = UserId::random();
    assert!(repo
        .find_for_owner(&stranger, &mine.id)
        .await
        .expect("lookup")
        .is_none());
    assert!(!repo
        .delete_for_owner(&stranger, &mine.id)
        .await
        .expect("delete"));
    assert_eq!(repo.list_for_owner(&owner).await.expect("list"), vec![mine]);
}

#[rstest]
#[tokio::test]
async fn status_update_replaces_message(owner: UserId) {
    let repo = InMemoryDeploymentRepository::default();
    let mine = deployment(owner);
    repo.insert(&mine).await.expect("insert");

    let failed = StatusUpdate {
        status: ConnectionStatus::Error,
        error_message: Some("Server error (HTTP 500)".to_owned()),
        checked_at: Utc::now(),
    };
    assert!(repo.update_status(&owner, &mine.id, &failed).await.expect("update"));
    let recovered = StatusUpdate {
        status: ConnectionStatus::Connected,
        error_message: None,
        checked_at: failed.checked_at + Duration::minutes(1),
    };
    assert!(repo
        .update_status(&owner, &mine.id, &recovered)
        .await
        .expect("update"));

    let stored = repo
        .find_for_owner(&owner, &mine.id)
        .await
        .expect("lookup")
        .expect("present");
    assert_eq!(stored.status, ConnectionStatus::Connected);
    assert!(stored.error_message.is_none());
    assert_eq!(stored.last_checked, Some(recovered.checked_at));
}

#[rstest]
#[tokio::test]
async fn logs_list_newest_first_with_limit(owner: UserId) {
    let repo = InMemoryLogRepository::default();
    let deployment_id = DeploymentId::random();
    for minute in [1, 3, 2] {
        repo.append(&log(owner, deployment_id, LogLevel::Info, minute))
            .await
            .expect("append");
    }

    let listed = repo
        .list(&LogQuery::recent(owner, 2))
        .await
        .expect("list");
    let messages: Vec<&str> = listed.iter().map(|entry| entry.message.as_str()).collect();
    assert_eq!(messages, vec!["event 3", "event 2"]);
}

#[rstest]
#[tokio::test]
async fn clearing_logs_spares_other_owners(owner: UserId) {
    let repo = InMemoryLogRepository::default();
    let deployment_id = DeploymentId::random();
    let other = UserId::random();
    repo.append(&log(owner, deployment_id, LogLevel::Error, 1))
        .await
        .expect("append");
    repo.append(&log(other, deployment_id, LogLevel::Error, 2))
        .await
        .expect("append");

    let removed = repo
        .delete_for_deployment(&owner, &deployment_id)
        .await
        .expect("delete");
    assert_eq!(removed, 1);
    assert_eq!(
        repo.list(&LogQuery::recent(other, 10)).await.expect("list").len(),
        1
    );
}

#[rstest]
#[tokio::test]
async fn schema_upsert_keeps_one_entry(owner: UserId) {
    let repo = InMemoryCachedSchemaRepository::default();
    let deployment_id = DeploymentId::random();
    let first = CachedSchema {
        deployment_id,
        owner,
        schema: r#"{"tables":[]}"#.to_owned(),
        fetched_at: Utc::now(),
    };
    repo.upsert(&first).await.expect("insert");
    let second = CachedSchema {
        schema: r#"{"tables":[{"name":"users"}]}"#.to_owned(),
        fetched_at: first.fetched_at + Duration::minutes(5),
        ..first.clone()
    };
    repo.upsert(&second).await.expect("update");

    let stored = repo
        .find_for_owner(&owner, &deployment_id)
        .await
        .expect("lookup")
        .expect("present");
    assert_eq!(stored, second);
    assert!(repo
        .find_for_owner(&UserId::random(), &deployment_id)
        .await
        .expect("lookup")
        .is_none());
}
