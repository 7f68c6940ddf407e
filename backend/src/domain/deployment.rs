//! Registered remote deployments.
//!
//! A deployment is created explicitly by its owner, starts out `pending`, and
//! only changes status when a connectivity check records an outcome.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use url::Url;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::UserId;

const KEY_HINT_CHARS: usize = 4;
const KEY_FINGERPRINT_BYTES: usize = 8;

/// Stable deployment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentId(Uuid);

impl DeploymentId {
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

impl fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for DeploymentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Error returned when parsing an unknown enum label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised {kind}: {value}")]
pub struct ParseLabelError {
    kind: &'static str,
    value: String,
}

impl ParseLabelError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Environment tag chosen when registering a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development deployment.
    Dev,
    /// Staging deployment.
    Staging,
    /// Production deployment.
    Prod,
}

impl Environment {
    /// Lower-case label used in storage and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Staging => "staging",
            Self::Prod => "prod",
        }
    }
}

impl FromStr for Environment {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Self::Dev),
            "staging" => Ok(Self::Staging),
            "prod" => Ok(Self::Prod),
            other => Err(ParseLabelError::new("environment", other)),
        }
    }
}

/// Last known connectivity state of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// The last check reached the deployment.
    Connected,
    /// The last check failed.
    Error,
    /// Never checked.
    Pending,
}

impl ConnectionStatus {
    /// Lower-case label used in storage and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Error => "error",
            Self::Pending => "pending",
        }
    }
}

impl FromStr for ConnectionStatus {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "connected" => Ok(Self::Connected),
            "error" => Ok(Self::Error),
            "pending" => Ok(Self::Pending),
            other => Err(ParseLabelError::new("connection status", other)),
        }
    }
}

/// Access credential sent as `Authorization: Convex <key>`.
///
/// The key is wiped on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct DeployKey(Zeroizing<String>);

impl DeployKey {
    /// Wrap a raw key.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Raw key material for outbound requests.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Masked hint revealing only the last four characters.
    ///
    /// # Examples
    /// ```
    /// use studio::domain::DeployKey;
    ///
    /// assert_eq!(DeployKey::new("prod:abc|secretkey").hint(), "••••tkey");
    /// assert_eq!(DeployKey::new("abc").hint(), "••••");
    /// ```
    #[must_use]
    pub fn hint(&self) -> String {
        let count = self.0.chars().count();
        if count <= KEY_HINT_CHARS {
            return "••••".to_owned();
        }
        let tail: String = self.0.chars().skip(count - KEY_HINT_CHARS).collect();
        format!("••••{tail}")
    }

    /// Truncated SHA-256 fingerprint so operators can tell keys apart.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        digest
            .get(..KEY_FINGERPRINT_BYTES)
            .map(hex::encode)
            .unwrap_or_default()
    }
}

impl fmt::Debug for DeployKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DeployKey").field(&self.hint()).finish()
    }
}

/// Validation errors for [`NewDeployment`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeploymentValidationError {
    /// Name was blank once trimmed.
    #[error("deployment name must not be empty")]
    EmptyName,
    /// URL was not an absolute http(s) URL.
    #[error("deployment url must be an absolute http or https URL")]
    InvalidUrl,
    /// Deploy key was blank once trimmed.
    #[error("deploy key must not be empty")]
    EmptyDeployKey,
}

/// Validated input for registering a deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeployment {
    name: String,
    url: String,
    deploy_key: DeployKey,
    environment: Environment,
}

impl NewDeployment {
    /// Validate raw input.
    ///
    /// # Examples
    /// ```
    /// use studio::domain::{Environment, NewDeployment};
    ///
    /// let new = NewDeployment::try_new(" api ", "https://happy-otter-123.convex.cloud", "key", Environment::Dev)
    ///     .expect("valid deployment");
    /// assert_eq!(new.name(), "api");
    /// assert!(NewDeployment::try_new("api", "ftp://host", "key", Environment::Dev).is_err());
    /// ```
    pub fn try_new(
        name: &str,
        url: &str,
        deploy_key: &str,
        environment: Environment,
    ) -> Result<Self, DeploymentValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DeploymentValidationError::EmptyName);
        }
        let url = url.trim();
        let parsed = Url::parse(url).map_err(|_| DeploymentValidationError::InvalidUrl)?;
        if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
            return Err(DeploymentValidationError::InvalidUrl);
        }
        let deploy_key = deploy_key.trim();
        if deploy_key.is_empty() {
            return Err(DeploymentValidationError::EmptyDeployKey);
        }

        Ok(Self {
            name: name.to_owned(),
            url: url.to_owned(),
            deploy_key: DeployKey::new(deploy_key),
            environment,
        })
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Base URL as entered.
    #[must_use]
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Access credential.
    #[must_use]
    pub const fn deploy_key(&self) -> &DeployKey {
        &self.deploy_key
    }

    /// Environment tag.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Build the stored record for `owner`, starting in `pending`.
    #[must_use]
    pub fn into_deployment(self, owner: UserId, now: DateTime<Utc>) -> Deployment {
        Deployment {
            id: DeploymentId::random(),
            name: self.name,
            url: self.url,
            deploy_key: self.deploy_key,
            environment: self.environment,
            status: ConnectionStatus::Pending,
            last_checked: None,
            error_message: None,
            owner,
            created_at: now,
        }
    }
}

/// Outcome recorded by a connectivity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    /// New status.
    pub status: ConnectionStatus,
    /// Error text; `None` clears any previous message.
    pub error_message: Option<String>,
    /// When the check completed.
    pub checked_at: DateTime<Utc>,
}

/// A registered remote deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    /// Identifier.
    pub id: DeploymentId,
    /// Display name.
    pub name: String,
    /// Base URL of the remote deployment.
    pub url: String,
    /// Access credential.
    pub deploy_key: DeployKey,
    /// Environment tag.
    pub environment: Environment,
    /// Last known connectivity state.
    pub status: ConnectionStatus,
    /// When the last check completed.
    pub last_checked: Option<DateTime<Utc>>,
    /// Error recorded by the last failed check.
    pub error_message: Option<String>,
    /// Owning user.
    pub owner: UserId,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl Deployment {
    /// Base URL with a single trailing slash removed.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use studio::domain::{Environment, NewDeployment, UserId};
    ///
    /// let deployment = NewDeployment::try_new("api", "https://example.convex.cloud/", "k", Environment::Prod)
    ///     .expect("valid")
    ///     .into_deployment(UserId::random(), Utc::now());
    /// assert_eq!(deployment.base_url(), "https://example.convex.cloud");
    /// ```
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.url.strip_suffix('/').unwrap_or(&self.url)
    }

    /// Whether `user` owns this deployment.
    #[must_use]
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner == user
    }

    /// Apply a recorded status update.
    pub fn apply_status(&mut self, update: StatusUpdate) {
        self.status = update.status;
        self.error_message = update.error_message;
        self.last_checked = Some(update.checked_at);
    }
}
