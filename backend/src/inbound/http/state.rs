//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, CategoryQuery, FeedQuery, HistoryCommand, HistoryQuery, IdentityResolver,
    PreferenceCommand,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub identity: Arc<dyn IdentityResolver>,
    pub feed: Arc<dyn FeedQuery>,
    pub categories: Arc<dyn CategoryQuery>,
    pub preferences: Arc<dyn PreferenceCommand>,
    pub history: Arc<dyn HistoryCommand>,
    pub history_query: Arc<dyn HistoryQuery>,
    pub accounts: Arc<dyn AccountCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identity: Arc<dyn IdentityResolver>,
    pub feed: Arc<dyn FeedQuery>,
    pub categories: Arc<dyn CategoryQuery>,
    pub preferences: Arc<dyn PreferenceCommand>,
    pub history: Arc<dyn HistoryCommand>,
    pub history_query: Arc<dyn HistoryQuery>,
    pub accounts: Arc<dyn AccountCommand>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            identity,
            feed,
            categories,
            preferences,
            history,
            history_query,
            accounts,
        } = ports;
        Self {
            identity,
            feed,
            categories,
            preferences,
            history,
            history_query,
            accounts,
        }
    }
}
