//! Driving port for server-held data browser panes.
//!
//! Each user has up to two independent panes, one per [`Side`], so two
//! deployments can be browsed side by side.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use pagination::Pane;
use serde::{Deserialize, Serialize};

use crate::domain::deployment::ParseLabelError;
use crate::domain::{DeploymentId, DocumentRecord, Error, UserId, column_union};

/// Which pane of the comparison view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Primary pane.
    Left,
    /// Comparison pane.
    Right,
}

impl Side {
    /// Lower-case label used in paths.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(ParseLabelError::new("side", other)),
        }
    }
}

/// Snapshot of one pane.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaneView {
    /// Selected deployment.
    pub deployment_id: Option<DeploymentId>,
    /// Selected table.
    pub table: Option<String>,
    /// Documents on the current page.
    pub documents: Vec<DocumentRecord>,
    /// Union of document keys on the current page.
    pub columns: Vec<String>,
    /// Whether a page request is in flight.
    pub is_loading: bool,
    /// Failure from the last page request.
    pub error: Option<String>,
    /// Whether the remote reported more data.
    pub has_more: bool,
    /// Zero-based page index.
    pub page: u32,
    /// Whether moving back (to the first page) is possible.
    pub can_prev: bool,
    /// Whether moving forward is possible.
    pub can_next: bool,
}

impl From<&Pane<DocumentRecord>> for PaneView {
    fn from(pane: &Pane<DocumentRecord>) -> Self {
        let selection = pane.selection();
        Self {
            deployment_id: selection.and_then(|s| s.source().parse().ok()),
            table: selection.map(|s| s.table().to_owned()),
            documents: pane.items().to_vec(),
            columns: column_union(pane.items()),
            is_loading: pane.is_loading(),
            error: pane.error().map(str::to_owned),
            has_more: pane.has_more(),
            page: pane.page(),
            can_prev: pane.page() > 0,
            can_next: pane.has_more() && pane.cursor().is_some(),
        }
    }
}

/// Use-case port for paginated browsing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrowserSessions: Send + Sync {
    /// Current state of a pane.
    async fn view(&self, user: &UserId, side: Side) -> Result<PaneView, Error>;

    /// Point a pane at a table and load its first page.
    async fn select(
        &self,
        user: &UserId,
        side: Side,
        deployment_id: DeploymentId,
        table: String,
    ) -> Result<PaneView, Error>;

    /// Load the next page when one is available; otherwise a no-op.
    async fn next(&self, user: &UserId, side: Side) -> Result<PaneView, Error>;

    /// Restart from the first page when past it; otherwise a no-op.
    async fn prev(&self, user: &UserId, side: Side) -> Result<PaneView, Error>;

    /// Reload from the first page.
    async fn refresh(&self, user: &UserId, side: Side) -> Result<PaneView, Error>;

    /// Drop the pane's selection and documents.
    async fn clear(&self, user: &UserId, side: Side) -> Result<PaneView, Error>;
}

/// Fixture sessions that always report an idle, empty pane.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBrowserSessions;

#[async_trait]
impl BrowserSessions for FixtureBrowserSessions {
    async fn view(&self, _user: &UserId, _side: Side) -> Result<PaneView, Error> {
        Ok(PaneView::default())
    }

    async fn select(
        &self,
        _user: &UserId,
        _side: Side,
        deployment_id: DeploymentId,
        table: String,
    ) -> Result<PaneView, Error> {
        Ok(PaneView {
            deployment_id: Some(deployment_id),
            table: Some(table),
            ..PaneView::default()
        })
    }

    async fn next(&self, _user: &UserId, _side: Side) -> Result<PaneView, Error> {
        Ok(PaneView::default())
    }

    async fn prev(&self, _user: &UserId, _side: Side) -> Result<PaneView, Error> {
        Ok(PaneView::default())
    }

    async fn refresh(&self, _user: &UserId, _side: Side) -> Result<PaneView, Error> {
        Ok(PaneView::default())
    }

    async fn clear(&self, _user: &UserId, _side: Side) -> Result<PaneView, Error> {
        Ok(PaneView::default())
    }
}
