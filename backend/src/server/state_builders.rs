//! Builders selecting Diesel-backed or fixture ports for the HTTP state.
//!
//! Every domain service is generic over its driven ports, so the same
//! service types run against the PostgreSQL adapters when a pool is
//! configured and against the unprovisioned fixtures otherwise. The
//! fixture mode is what serves the placeholder feed and listings.

use std::sync::Arc;

use actix_web::web;

use backend::domain::ports::{
    FixtureArticleRepository, FixtureCategoryRepository, FixtureHistoryRepository,
    FixtureUserRepository,
};
use backend::domain::{
    AccountService, FeedService, HistoryService, IdentityService, InterestInferencer,
    PreferenceService,
};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::identity::BcryptPasswordHasher;
use backend::outbound::persistence::{
    DbPool, DieselArticleRepository, DieselCategoryRepository, DieselHistoryRepository,
    DieselUserRepository,
};

use super::ServerConfig;

fn build_ports_with<A, C, H, U>(
    articles: Arc<A>,
    categories: Arc<C>,
    history: Arc<H>,
    users: Arc<U>,
) -> HttpStatePorts
where
    A: backend::domain::ports::ArticleRepository + 'static,
    C: backend::domain::ports::CategoryRepository + 'static,
    H: backend::domain::ports::HistoryRepository + 'static,
    U: backend::domain::ports::UserRepository + 'static,
{
    let clock = Arc::new(mockable::DefaultClock);
    let hasher = Arc::new(BcryptPasswordHasher::default());

    let feed = Arc::new(FeedService::new(
        articles,
        InterestInferencer::new(history.clone()),
    ));
    let preference_service = Arc::new(PreferenceService::new(categories, users.clone()));
    let history_service = Arc::new(HistoryService::new(history, clock));

    HttpStatePorts {
        identity: Arc::new(IdentityService::new(users.clone())),
        feed,
        categories: preference_service.clone(),
        preferences: preference_service,
        history: history_service.clone(),
        history_query: history_service,
        accounts: Arc::new(AccountService::new(users, hasher)),
    }
}

fn build_diesel_ports(pool: &DbPool) -> HttpStatePorts {
    build_ports_with(
        Arc::new(DieselArticleRepository::new(pool.clone())),
        Arc::new(DieselCategoryRepository::new(pool.clone())),
        Arc::new(DieselHistoryRepository::new(pool.clone())),
        Arc::new(DieselUserRepository::new(pool.clone())),
    )
}

fn build_fixture_ports() -> HttpStatePorts {
    build_ports_with(
        Arc::new(FixtureArticleRepository),
        Arc::new(FixtureCategoryRepository),
        Arc::new(FixtureHistoryRepository),
        Arc::new(FixtureUserRepository),
    )
}

/// Build the shared HTTP state from configured ports and fixture
/// fallbacks.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let ports = match &config.db_pool {
        Some(pool) => build_diesel_ports(pool),
        None => build_fixture_ports(),
    };
    web::Data::new(HttpState::new(ports))
}
