//! Locally cached schema text per deployment.

use chrono::{DateTime, Utc};

use super::schema::{NormalizedSchema, parse_schema, table_names};
use super::{DeploymentId, UserId};

/// Last fetched or manually entered schema for one deployment.
///
/// At most one exists per deployment; writes replace `schema` and
/// `fetched_at` in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedSchema {
    /// Deployment the schema describes.
    pub deployment_id: DeploymentId,
    /// Owning user.
    pub owner: UserId,
    /// Raw schema JSON as received or entered.
    pub schema: String,
    /// When the schema was last written.
    pub fetched_at: DateTime<Utc>,
}

impl CachedSchema {
    /// Parse the raw text into a normalised schema.
    #[must_use]
    pub fn normalized(&self) -> NormalizedSchema {
        parse_schema(&self.schema)
    }

    /// Table names listed by the raw text.
    #[must_use]
    pub fn table_names(&self) -> Vec<String> {
        table_names(&self.schema)
    }
}
