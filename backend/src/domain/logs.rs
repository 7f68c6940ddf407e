//! Per-deployment log entries and log queries.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::deployment::ParseLabelError;
use super::{DeploymentId, UserId};

/// Limit applied when a log query does not specify one.
pub const DEFAULT_LOG_LIMIT: usize = 100;
/// Largest limit a log query may request.
pub const MAX_LOG_LIMIT: usize = 1000;

/// Stable log entry identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogEntryId(Uuid);

impl LogEntryId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for LogEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Failures.
    Error,
    /// Suspicious conditions.
    Warning,
    /// Normal operation.
    Info,
    /// Diagnostic detail.
    Debug,
}

impl LogLevel {
    /// Lower-case label used in storage and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            other => Err(ParseLabelError::new("log level", other)),
        }
    }
}

/// Immutable log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Identifier.
    pub id: LogEntryId,
    /// Deployment the entry belongs to.
    pub deployment_id: DeploymentId,
    /// Severity.
    pub level: LogLevel,
    /// Message text.
    pub message: String,
    /// Time the entry was written.
    pub timestamp: DateTime<Utc>,
    /// Function that emitted the entry.
    pub function_name: Option<String>,
    /// Request correlation identifier.
    pub request_id: Option<String>,
    /// Owning user.
    pub owner: UserId,
}

impl LogEntry {
    /// Case-insensitive match of `needle` against message and function name.
    ///
    /// `needle` must already be lower-cased.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        self.message.to_lowercase().contains(needle)
            || self
                .function_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(needle))
    }
}

/// Caller-supplied fields for a new log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLogEntry {
    /// Severity.
    pub level: LogLevel,
    /// Message text.
    pub message: String,
    /// Function that emitted the entry.
    pub function_name: Option<String>,
    /// Request correlation identifier.
    pub request_id: Option<String>,
}

impl NewLogEntry {
    /// Stamp the entry for storage.
    #[must_use]
    pub fn into_entry(
        self,
        deployment_id: DeploymentId,
        owner: UserId,
        timestamp: DateTime<Utc>,
    ) -> LogEntry {
        LogEntry {
            id: LogEntryId::random(),
            deployment_id,
            level: self.level,
            message: self.message,
            timestamp,
            function_name: self.function_name,
            request_id: self.request_id,
            owner,
        }
    }
}

/// Filter accepted by the log listing operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Restrict to one deployment.
    pub deployment_id: Option<DeploymentId>,
    /// Restrict to one level.
    pub level: Option<LogLevel>,
    /// Free-text search over message and function name.
    pub text: Option<String>,
    /// Requested limit before clamping.
    pub limit: Option<usize>,
}

impl LogFilter {
    /// Limit after applying the default and clamping to `1..=MAX_LOG_LIMIT`.
    ///
    /// # Examples
    /// ```
    /// use studio::domain::LogFilter;
    ///
    /// assert_eq!(LogFilter::default().effective_limit(100), 100);
    /// let filter = LogFilter { limit: Some(0), ..LogFilter::default() };
    /// assert_eq!(filter.effective_limit(100), 1);
    /// ```
    #[must_use]
    pub fn effective_limit(&self, default_limit: usize) -> usize {
        self.limit
            .unwrap_or(default_limit)
            .clamp(1, MAX_LOG_LIMIT)
    }

    /// Lower-cased search text, or `None` when blank.
    #[must_use]
    pub fn search_needle(&self) -> Option<String> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase)
    }
}

/// Storage-level log query derived from a [`LogFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    /// Caller identity.
    pub owner: UserId,
    /// Restrict to one deployment.
    pub deployment_id: Option<DeploymentId>,
    /// Restrict to one level.
    pub level: Option<LogLevel>,
    /// Lower-cased text matched against message and function name.
    pub text: Option<String>,
    /// Maximum number of entries, newest first.
    pub limit: usize,
}

impl LogQuery {
    /// Build the storage query for `owner` from a caller filter.
    #[must_use]
    pub fn from_filter(owner: UserId, filter: &LogFilter, default_limit: usize) -> Self {
        Self {
            owner,
            deployment_id: filter.deployment_id,
            level: filter.level,
            text: filter.search_needle(),
            limit: filter.effective_limit(default_limit),
        }
    }

    /// Newest `limit` entries across all of `owner`'s deployments.
    #[must_use]
    pub const fn recent(owner: UserId, limit: usize) -> Self {
        Self {
            owner,
            deployment_id: None,
            level: None,
            text: None,
            limit,
        }
    }

    /// Whether `entry` satisfies every condition except the limit.
    #[must_use]
    pub fn matches(&self, entry: &LogEntry) -> bool {
        entry.owner == self.owner
            && self.deployment_id.is_none_or(|id| entry.deployment_id == id)
            && self.level.is_none_or(|level| entry.level == level)
            && self
                .text
                .as_deref()
                .is_none_or(|needle| entry.matches_text(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entry(message: &str, function_name: Option<&str>) -> LogEntry {
        NewLogEntry {
            level: LogLevel::Info,
            message: message.to_owned(),
            function_name: function_name.map(str::to_owned),
            request_id: None,
        }
        .into_entry(DeploymentId::random(), UserId::random(), Utc::now())
    }

    #[rstest]
    #[case(None, 100)]
    #[case(Some(0), 1)]
    #[case(Some(50), 50)]
    #[case(Some(5000), MAX_LOG_LIMIT)]
    fn effective_limit_defaults_and_clamps(#[case] limit: Option<usize>, #[case] expected: usize) {
        let filter = LogFilter {
            limit,
            ..LogFilter::default()
        };
        assert_eq!(filter.effective_limit(DEFAULT_LOG_LIMIT), expected);
    }

    #[rstest]
    #[case("Timeout calling", None, "timeout", true)]
    #[case("all good", Some("users:List"), "users:list", true)]
    #[case("all good", Some("users:list"), "orders", false)]
    fn text_matching_is_case_insensitive(
        #[case] message: &str,
        #[case] function_name: Option<&str>,
        #[case] needle: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(entry(message, function_name).matches_text(needle), expected);
    }

    #[rstest]
    fn query_matches_owner_deployment_level_and_text() {
        let target = entry("Timeout calling users:list", None);
        let filter = LogFilter {
            deployment_id: Some(target.deployment_id),
            level: Some(LogLevel::Info),
            text: Some(" TIMEOUT ".to_owned()),
            limit: None,
        };
        let query = LogQuery::from_filter(target.owner, &filter, DEFAULT_LOG_LIMIT);
        assert!(query.matches(&target));

        let other_owner = LogQuery::from_filter(UserId::random(), &filter, DEFAULT_LOG_LIMIT);
        assert!(!other_owner.matches(&target));

        let wrong_level = LogQuery {
            level: Some(LogLevel::Error),
            ..query
        };
        assert!(!wrong_level.matches(&target));
    }

    #[rstest]
    fn blank_search_text_is_ignored() {
        let filter = LogFilter {
            text: Some("   ".to_owned()),
            ..LogFilter::default()
        };
        assert!(filter.search_needle().is_none());
    }
}
