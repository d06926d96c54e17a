//! HTTP server configuration object.

use std::net::SocketAddr;

use traveltrove::inbound::http::session_config::SessionSettings;
use traveltrove::outbound::persistence::DbPool;

/// Everything `create_server` needs beyond the HTTP state itself.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) body_limit: usize,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, body_limit: usize) -> Self {
        Self {
            session,
            bind_addr,
            body_limit,
            db_pool: None,
        }
    }

    /// Use PostgreSQL repositories instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: Option<DbPool>) -> Self {
        self.db_pool = pool;
        self
    }
}
