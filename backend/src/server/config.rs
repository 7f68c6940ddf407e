//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use studio::domain::DEFAULT_LOG_LIMIT;
use studio::domain::ports::DEFAULT_PAGE_SIZE;
use studio::outbound::persistence::DbPool;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) request_timeout: Duration,
    pub(crate) page_size: u32,
    pub(crate) log_limit: usize,
}

impl ServerConfig {
    /// Construct a server configuration from session settings and the bind
    /// address; remote and paging knobs start at their defaults.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
            log_limit: DEFAULT_LOG_LIMIT,
        }
    }

    /// Attach a database connection pool.
    ///
    /// With a pool the deployment, log and cached schema repositories are
    /// PostgreSQL-backed; without one they live in memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Timeout applied to every remote deployment call.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Documents loaded per browser pane page.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Entries returned by log listings that do not name a limit.
    #[must_use]
    pub fn with_log_limit(mut self, log_limit: usize) -> Self {
        self.log_limit = log_limit;
        self
    }
}
