//! Process-local repositories used when no database is configured.
//!
//! State lives in mutex-guarded collections and disappears on restart. Locks
//! are never held across an `.await`; a poisoned lock is recovered because
//! every mutation leaves the collections consistent.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    CachedSchemaRepository, CachedSchemaRepositoryError, DeploymentRepository,
    DeploymentRepositoryError, LogRepository, LogRepositoryError,
};
use crate::domain::{CachedSchema, Deployment, DeploymentId, LogEntry, LogQuery, StatusUpdate, UserId};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory [`DeploymentRepository`] keeping registration order.
#[derive(Debug, Default)]
pub struct InMemoryDeploymentRepository {
    deployments: Mutex<Vec<Deployment>>,
}

#[async_trait]
impl DeploymentRepository for InMemoryDeploymentRepository {
    async fn insert(&self, deployment: &Deployment) -> Result<(), DeploymentRepositoryError> {
        let mut guard = lock(&self.deployments);
        if guard.iter().any(|existing| existing.id == deployment.id) {
            return Err(DeploymentRepositoryError::query("duplicate deployment id"));
        }
        guard.push(deployment.clone());
        Ok(())
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<Deployment>, DeploymentRepositoryError> {
        Ok(lock(&self.deployments)
            .iter()
            .filter(|deployment| deployment.is_owned_by(owner))
            .cloned()
            .collect())
    }

    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: &DeploymentId,
    ) -> Result<Option<Deployment>, DeploymentRepositoryError> {
        Ok(lock(&self.deployments)
            .iter()
            .find(|deployment| deployment.id == *id && deployment.is_owned_by(owner))
            .cloned())
    }

    async fn update_status(
        &self,
        owner: &UserId,
        id: &DeploymentId,
        update: &StatusUpdate,
    ) -> Result<bool, DeploymentRepositoryError> {
        let mut guard = lock(&self.deployments);
        let Some(deployment) = guard
            .iter_mut()
            .find(|deployment| deployment.id == *id && deployment.is_owned_by(owner))
        else {
            return Ok(false);
        };
        deployment.apply_status(update.clone());
        Ok(true)
    }

    async fn delete_for_owner(
        &self,
        owner: &UserId,
        id: &DeploymentId,
    ) -> Result<bool, DeploymentRepositoryError> {
        let mut guard = lock(&self.deployments);
        let before = guard.len();
        guard.retain(|deployment| !(deployment.id == *id && deployment.is_owned_by(owner)));
        Ok(guard.len() < before)
    }
}

/// In-memory [`LogRepository`].
#[derive(Debug, Default)]
pub struct InMemoryLogRepository {
    entries: Mutex<Vec<LogEntry>>,
}

#[async_trait]
impl LogRepository for InMemoryLogRepository {
    async fn append(&self, entry: &LogEntry) -> Result<(), LogRepositoryError> {
        lock(&self.entries).push(entry.clone());
        Ok(())
    }

    async fn list(&self, query: &LogQuery) -> Result<Vec<LogEntry>, LogRepositoryError> {
        let mut matched: Vec<LogEntry> = lock(&self.entries)
            .iter()
            .rev()
            .filter(|entry| query.matches(entry))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matched.truncate(query.limit);
        Ok(matched)
    }

    async fn delete_for_deployment(
        &self,
        owner: &UserId,
        deployment_id: &DeploymentId,
    ) -> Result<usize, LogRepositoryError> {
        let mut guard = lock(&self.entries);
        let before = guard.len();
        guard.retain(|entry| !(entry.deployment_id == *deployment_id && entry.owner == *owner));
        Ok(before - guard.len())
    }
}

/// In-memory [`CachedSchemaRepository`], one entry per deployment.
#[derive(Debug, Default)]
pub struct InMemoryCachedSchemaRepository {
    schemas: Mutex<HashMap<DeploymentId, CachedSchema>>,
}

#[async_trait]
impl CachedSchemaRepository for InMemoryCachedSchemaRepository {
    async fn find_for_owner(
        &self,
        owner: &UserId,
        deployment_id: &DeploymentId,
    ) -> Result<Option<CachedSchema>, CachedSchemaRepositoryError> {
        Ok(lock(&self.schemas)
            .get(deployment_id)
            .filter(|cached| cached.owner == *owner)
            .cloned())
    }

    async fn upsert(&self, schema: &CachedSchema) -> Result<(), CachedSchemaRepositoryError> {
        let mut guard = lock(&self.schemas);
        match guard.get_mut(&schema.deployment_id) {
            Some(existing) => {
                existing.schema.clone_from(&schema.schema);
                existing.fetched_at = schema.fetched_at;
            }
            None => {
                guard.insert(schema.deployment_id, schema.clone());
            }
        }
        Ok(())
    }

    async fn delete_for_deployment(
        &self,
        owner: &UserId,
        deployment_id: &DeploymentId,
    ) -> Result<(), CachedSchemaRepositoryError> {
        let mut guard = lock(&self.schemas);
        if guard
            .get(deployment_id)
            .is_some_and(|cached| cached.owner == *owner)
        {
            guard.remove(deployment_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
