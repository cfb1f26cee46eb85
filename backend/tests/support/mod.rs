//! Shared helpers for integration tests.
#![allow(dead_code)] // each test binary uses a different subset

use std::sync::Arc;

use actix_web::web;
use chrono::{DateTime, TimeZone, Utc};

use backend::domain::{
    AccountService, Article, ArticleId, CategoryId, CategoryRef, FeedService, HistoryService,
    IdentityService, InterestInferencer, PreferenceService,
};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::identity::BcryptPasswordHasher;
use backend::test_support::InMemoryStore;

/// Deterministic timestamp helper.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

/// Build an article carrying the given category edges.
pub fn article(id: i64, bookmark_count: i64, published: DateTime<Utc>, categories: &[(i64, &str)]) -> Article {
    Article {
        id: ArticleId::new(id),
        title: format!("Article {id}"),
        url: format!("https://news.example.com/articles/{id}"),
        description: format!("Body of article {id}"),
        thumbnail_url: String::new(),
        source_site: "Example Wire".to_owned(),
        bookmark_count,
        published_at: published,
        categories: categories
            .iter()
            .map(|(id, name)| CategoryRef {
                id: CategoryId::new(*id),
                name: (*name).to_owned(),
            })
            .collect(),
    }
}

/// Build the full HTTP state over one shared in-memory store.
///
/// Mirrors the production state builder, swapping the Diesel adapters for
/// the in-memory doubles and dropping the bcrypt work factor for speed.
pub fn http_state(store: &InMemoryStore) -> web::Data<HttpState> {
    let articles = Arc::new(store.clone());
    let categories = Arc::new(store.clone());
    let history = Arc::new(store.clone());
    let users = Arc::new(store.clone());
    let clock = Arc::new(mockable::DefaultClock);
    let hasher = Arc::new(BcryptPasswordHasher::with_cost(4));

    let preference_service = Arc::new(PreferenceService::new(categories, users.clone()));
    let history_service = Arc::new(HistoryService::new(history.clone(), clock));

    web::Data::new(HttpState::new(HttpStatePorts {
        identity: Arc::new(IdentityService::new(users.clone())),
        feed: Arc::new(FeedService::new(
            articles,
            InterestInferencer::new(history),
        )),
        categories: preference_service.clone(),
        preferences: preference_service,
        history: history_service.clone(),
        history_query: history_service,
        accounts: Arc::new(AccountService::new(users, hasher)),
    }))
}
