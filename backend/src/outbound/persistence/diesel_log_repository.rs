//! PostgreSQL-backed `LogRepository`.
//!
//! Filters are pushed into SQL; text search uses `ILIKE` over the message and
//! function name with `%`, `_` and `\` in the needle escaped.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{LogRepository, LogRepositoryError};
use crate::domain::{DeploymentId, LogEntry, LogQuery, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_label_error, map_pool_error};
use super::models::{LogRow, NewLogRow};
use super::pool::{DbPool, PoolError};
use super::schema::logs;

/// Diesel implementation of [`LogRepository`].
#[derive(Clone)]
pub struct DieselLogRepository {
    pool: DbPool,
}

impl DieselLogRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> LogRepositoryError {
    map_pool_error(error, LogRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> LogRepositoryError {
    map_diesel_error(error, LogRepositoryError::query, LogRepositoryError::connection)
}

/// `ILIKE` pattern matching `needle` anywhere, with wildcards escaped.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl LogRepository for DieselLogRepository {
    async fn append(&self, entry: &LogEntry) -> Result<(), LogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(logs::table)
            .values(NewLogRow::from(entry))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn list(&self, query: &LogQuery) -> Result<Vec<LogEntry>, LogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut statement = logs::table
            .select(LogRow::as_select())
            .filter(logs::owner_id.eq(*query.owner.as_uuid()))
            .into_boxed();
        if let Some(deployment_id) = query.deployment_id {
            statement = statement.filter(logs::deployment_id.eq(*deployment_id.as_uuid()));
        }
        if let Some(level) = query.level {
            statement = statement.filter(logs::level.eq(level.as_str()));
        }
        if let Some(needle) = query.text.as_deref() {
            let pattern = contains_pattern(needle);
            statement = statement.filter(
                logs::message
                    .ilike(pattern.clone())
                    .or(logs::function_name.ilike(pattern)),
            );
        }
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let rows: Vec<LogRow> = statement
            .order((logs::timestamp.desc(), logs::id.desc()))
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter()
            .map(|row| {
                row.into_domain()
                    .map_err(|err| map_label_error(&err, LogRepositoryError::query))
            })
            .collect()
    }

    async fn delete_for_deployment(
        &self,
        owner: &UserId,
        deployment_id: &DeploymentId,
    ) -> Result<usize, LogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::delete(
            logs::table
                .filter(logs::deployment_id.eq(deployment_id.as_uuid()))
                .filter(logs::owner_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("timeout", "%timeout%")]
    #[case("50%_done", "%50\\%\\_done%")]
    #[case("a\\b", "%a\\\\b%")]
    fn search_pattern_escapes_wildcards(#[case] needle: &str, #[case] expected: &str) {
        assert_eq!(contains_pattern(needle), expected);
    }
}
