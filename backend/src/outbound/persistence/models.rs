//! Internal Diesel row structs.
//!
//! These types are implementation details of the persistence layer and never
//! leave it. Label columns are stored as text and parsed back into domain
//! enums by [`DeploymentRow::into_domain`] and [`LogRow::into_domain`].

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    CachedSchema, ConnectionStatus, DeployKey, Deployment, DeploymentId, Environment, LogEntry,
    LogEntryId, LogLevel, ParseLabelError, StatusUpdate, UserId,
};

use super::schema::{cached_schemas, deployments, logs};

/// Row read from `deployments`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = deployments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DeploymentRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub url: String,
    pub deploy_key: String,
    pub environment: String,
    pub status: String,
    pub last_checked: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DeploymentRow {
    pub(crate) fn into_domain(self) -> Result<Deployment, ParseLabelError> {
        Ok(Deployment {
            id: DeploymentId::from_uuid(self.id),
            name: self.name,
            url: self.url,
            deploy_key: DeployKey::new(self.deploy_key),
            environment: self.environment.parse::<Environment>()?,
            status: self.status.parse::<ConnectionStatus>()?,
            last_checked: self.last_checked,
            error_message: self.error_message,
            owner: UserId::from_uuid(self.owner_id),
            created_at: self.created_at,
        })
    }
}

/// Insertable deployment record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = deployments)]
pub(crate) struct NewDeploymentRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: &'a str,
    pub url: &'a str,
    pub deploy_key: &'a str,
    pub environment: &'a str,
    pub status: &'a str,
    pub last_checked: Option<DateTime<Utc>>,
    pub error_message: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a Deployment> for NewDeploymentRow<'a> {
    fn from(deployment: &'a Deployment) -> Self {
        Self {
            id: *deployment.id.as_uuid(),
            owner_id: *deployment.owner.as_uuid(),
            name: &deployment.name,
            url: &deployment.url,
            deploy_key: deployment.deploy_key.expose(),
            environment: deployment.environment.as_str(),
            status: deployment.status.as_str(),
            last_checked: deployment.last_checked,
            error_message: deployment.error_message.as_deref(),
            created_at: deployment.created_at,
        }
    }
}

/// Changeset written by a connectivity check.
///
/// `error_message` is always written so a successful check clears it.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = deployments, treat_none_as_null = true)]
pub(crate) struct StatusChangeset<'a> {
    pub status: &'a str,
    pub last_checked: Option<DateTime<Utc>>,
    pub error_message: Option<&'a str>,
}

impl<'a> From<&'a StatusUpdate> for StatusChangeset<'a> {
    fn from(update: &'a StatusUpdate) -> Self {
        Self {
            status: update.status.as_str(),
            last_checked: Some(update.checked_at),
            error_message: update.error_message.as_deref(),
        }
    }
}

/// Row read from `logs`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LogRow {
    pub id: Uuid,
    pub deployment_id: Uuid,
    pub owner_id: Uuid,
    pub level: String,
    pub message: String,
    pub function_name: Option<String>,
    pub request_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl LogRow {
    pub(crate) fn into_domain(self) -> Result<LogEntry, ParseLabelError> {
        Ok(LogEntry {
            id: LogEntryId::from_uuid(self.id),
            deployment_id: DeploymentId::from_uuid(self.deployment_id),
            level: self.level.parse::<LogLevel>()?,
            message: self.message,
            timestamp: self.timestamp,
            function_name: self.function_name,
            request_id: self.request_id,
            owner: UserId::from_uuid(self.owner_id),
        })
    }
}

/// Insertable log record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = logs)]
pub(crate) struct NewLogRow<'a> {
    pub id: Uuid,
    pub deployment_id: Uuid,
    pub owner_id: Uuid,
    pub level: &'a str,
    pub message: &'a str,
    pub function_name: Option<&'a str>,
    pub request_id: Option<&'a str>,
    pub timestamp: DateTime<Utc>,
}

impl<'a> From<&'a LogEntry> for NewLogRow<'a> {
    fn from(entry: &'a LogEntry) -> Self {
        Self {
            id: *entry.id.as_uuid(),
            deployment_id: *entry.deployment_id.as_uuid(),
            owner_id: *entry.owner.as_uuid(),
            level: entry.level.as_str(),
            message: &entry.message,
            function_name: entry.function_name.as_deref(),
            request_id: entry.request_id.as_deref(),
            timestamp: entry.timestamp,
        }
    }
}

/// Row read from and written to `cached_schemas`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = cached_schemas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CachedSchemaRow {
    pub deployment_id: Uuid,
    pub owner_id: Uuid,
    pub raw_schema: String,
    pub fetched_at: DateTime<Utc>,
}

impl From<CachedSchemaRow> for CachedSchema {
    fn from(row: CachedSchemaRow) -> Self {
        Self {
            deployment_id: DeploymentId::from_uuid(row.deployment_id),
            owner: UserId::from_uuid(row.owner_id),
            schema: row.raw_schema,
            fetched_at: row.fetched_at,
        }
    }
}

impl From<&CachedSchema> for CachedSchemaRow {
    fn from(schema: &CachedSchema) -> Self {
        Self {
            deployment_id: *schema.deployment_id.as_uuid(),
            owner_id: *schema.owner.as_uuid(),
            raw_schema: schema.schema.clone(),
            fetched_at: schema.fetched_at,
        }
    }
}
