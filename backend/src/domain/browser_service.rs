//! Server-held browser panes.
//!
//! Each `(user, side)` pair owns one [`Pane`]. Remote reads run without
//! holding the pane lock; the result is applied afterwards through the
//! pane's request ticket, so a response for a superseded selection or page
//! is dropped instead of overwriting newer state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use pagination::{ApplyOutcome, PageRequest, Pane, Selection};
use tracing::debug;

use crate::domain::ports::{BrowserSessions, DocumentQuery, PaneView, Side, TableQuery};
use crate::domain::{DeploymentId, DocumentRecord, Error, UserId};

type PaneKey = (UserId, Side);

/// Browser service implementing [`BrowserSessions`].
pub struct BrowserService<Q> {
    documents: Arc<Q>,
    page_size: u32,
    panes: Mutex<HashMap<PaneKey, Pane<DocumentRecord>>>,
}

impl<Q> BrowserService<Q> {
    /// Create a service reading `page_size` documents per page.
    pub fn new(documents: Arc<Q>, page_size: u32) -> Self {
        Self {
            documents,
            page_size,
            panes: Mutex::new(HashMap::new()),
        }
    }

    fn with_pane<T>(&self, key: PaneKey, f: impl FnOnce(&mut Pane<DocumentRecord>) -> T) -> T {
        let mut panes = self.panes.lock().unwrap_or_else(PoisonError::into_inner);
        f(panes.entry(key).or_default())
    }

    fn snapshot(&self, key: PaneKey) -> PaneView {
        self.with_pane(key, |pane| PaneView::from(&*pane))
    }
}

impl<Q> BrowserService<Q>
where
    Q: DocumentQuery,
{
    async fn run(&self, key: PaneKey, request: Option<PageRequest>) -> Result<PaneView, Error> {
        let Some(request) = request else {
            return Ok(self.snapshot(key));
        };
        let (user, side) = key;
        let deployment_id = match request.selection.source().parse::<DeploymentId>() {
            Ok(id) => id,
            Err(err) => {
                let error = Error::invalid_request(err.to_string());
                self.with_pane(key, |pane| pane.apply(&request, Err(error.message().to_owned())));
                return Err(error);
            }
        };
        let query = TableQuery {
            table: request.selection.table().to_owned(),
            cursor: request.cursor.clone(),
            page_size: self.page_size,
        };
        let result = self.documents.query_page(&user, &deployment_id, query).await;
        let (outcome, failure) = match result {
            Ok(page) => (page, None),
            Err(error) => (Err(error.message().to_owned()), Some(error)),
        };
        let (applied, view) = self.with_pane(key, |pane| {
            let applied = pane.apply(&request, outcome);
            (applied, PaneView::from(&*pane))
        });
        if applied == ApplyOutcome::Stale {
            debug!(%side, page = request.page, "dropped stale page response");
        }
        match failure {
            Some(error) if applied != ApplyOutcome::Stale => Err(error),
            _ => Ok(view),
        }
    }
}

#[async_trait]
impl<Q> BrowserSessions for BrowserService<Q>
where
    Q: DocumentQuery,
{
    async fn view(&self, user: &UserId, side: Side) -> Result<PaneView, Error> {
        Ok(self.snapshot((*user, side)))
    }

    async fn select(
        &self,
        user: &UserId,
        side: Side,
        deployment_id: DeploymentId,
        table: String,
    ) -> Result<PaneView, Error> {
        if table.trim().is_empty() {
            return Err(Error::invalid_request("table must not be empty"));
        }
        let key = (*user, side);
        let request = self.with_pane(key, |pane| {
            pane.select(Selection::new(deployment_id.to_string(), table))
        });
        self.run(key, request).await
    }

    async fn next(&self, user: &UserId, side: Side) -> Result<PaneView, Error> {
        let key = (*user, side);
        let request = self.with_pane(key, Pane::next);
        self.run(key, request).await
    }

    async fn prev(&self, user: &UserId, side: Side) -> Result<PaneView, Error> {
        let key = (*user, side);
        let request = self.with_pane(key, Pane::prev);
        self.run(key, request).await
    }

    async fn refresh(&self, user: &UserId, side: Side) -> Result<PaneView, Error> {
        let key = (*user, side);
        let request = self.with_pane(key, Pane::refresh);
        self.run(key, request).await
    }

    async fn clear(&self, user: &UserId, side: Side) -> Result<PaneView, Error> {
        let key = (*user, side);
        self.with_pane(key, Pane::clear);
        Ok(self.snapshot(key))
    }
}

#[cfg(test)]
#[path = "browser_service_tests.rs"]
mod tests;
