//! Test utilities for the backend crate.
//!
//! Provides a deterministic in-memory implementation of every driven
//! repository port so unit and integration tests can drive the domain
//! services and the HTTP surface without PostgreSQL. Compiled only with
//! the `test-support` feature.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::ports::{
    ArticleRepository, ArticleRepositoryError, CategoryRepository, CategoryRepositoryError,
    HistoryRepository, HistoryRepositoryError, NewRegisteredAccount, StoredCredentials,
    UserRepository, UserRepositoryError,
};
use crate::domain::{
    Article, ArticleFilter, ArticleId, Category, CategoryId, CategoryPreference, CategoryRef,
    CategoryWithPreference, CustomCategory, CustomCategoryId, HistoryEntry, PageWindow,
    StoreAvailability, User, UserId, UserKind, Username,
};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: Option<String>,
}

#[derive(Debug, Default)]
struct StoreInner {
    users: HashMap<Uuid, StoredUser>,
    categories: Vec<Category>,
    preferences: HashMap<(Uuid, i64), CategoryPreference>,
    custom: Vec<CustomCategory>,
    next_custom_id: i64,
    articles: Vec<Article>,
    history: HashMap<(Uuid, i64), DateTime<Utc>>,
}

/// Shared in-memory store implementing every driven repository port.
///
/// Clones share the same underlying state, so one store can back all the
/// services of a test application.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().expect("store lock poisoned")
    }

    /// Seed one system category.
    pub fn seed_category(&self, id: i64, name: &str, slug: &str, is_default: bool) {
        self.lock().categories.push(Category {
            id: CategoryId::new(id),
            name: name.to_owned(),
            slug: slug.to_owned(),
            is_default,
        });
    }

    /// Seed one article, including its category references.
    pub fn seed_article(&self, article: Article) {
        self.lock().articles.push(article);
    }

    /// Inspect a stored user.
    pub fn user(&self, id: &UserId) -> Option<User> {
        self.lock()
            .users
            .get(id.as_uuid())
            .map(|stored| stored.user.clone())
    }

    /// Inspect a user's preference rows, unordered.
    pub fn preference_rows(&self, user: &UserId) -> Vec<(CategoryId, CategoryPreference)> {
        self.lock()
            .preferences
            .iter()
            .filter(|((owner, _), _)| owner == user.as_uuid())
            .map(|((_, category), preference)| (CategoryId::new(*category), *preference))
            .collect()
    }

    /// Number of view-history rows a user holds.
    pub fn history_rows(&self, user: &UserId) -> usize {
        self.lock()
            .history
            .keys()
            .filter(|(owner, _)| owner == user.as_uuid())
            .count()
    }

    /// The stored view timestamp for a (user, article) pair.
    pub fn viewed_at(&self, user: &UserId, article: ArticleId) -> Option<DateTime<Utc>> {
        self.lock()
            .history
            .get(&(*user.as_uuid(), article.get()))
            .copied()
    }
}

fn matches_filter(article: &Article, filter: &ArticleFilter) -> bool {
    match filter {
        ArticleFilter::ByCategory(id) => {
            article.categories.iter().any(|category| category.id == *id)
        }
        ArticleFilter::ByAnyCategory(ids) => {
            ids.is_empty()
                || article
                    .categories
                    .iter()
                    .any(|category| ids.contains(&category.id))
        }
        ArticleFilter::And(inner) => inner.iter().all(|filter| matches_filter(article, filter)),
    }
}

fn ranked(mut articles: Vec<Article>) -> Vec<Article> {
    articles.sort_by(|a, b| b.ranking_key().cmp(&a.ranking_key()));
    articles
}

fn bootstrap_defaults(inner: &mut StoreInner, user: Uuid) {
    let mut defaults: Vec<i64> = inner
        .categories
        .iter()
        .filter(|category| category.is_default)
        .map(|category| category.id.get())
        .collect();
    defaults.sort_unstable();
    for (index, category_id) in defaults.into_iter().enumerate() {
        inner.preferences.insert(
            (user, category_id),
            CategoryPreference {
                is_visible: true,
                display_order: index as i32 + 1,
            },
        );
    }
}

#[async_trait]
impl ArticleRepository for InMemoryStore {
    async fn availability(&self) -> Result<StoreAvailability, ArticleRepositoryError> {
        Ok(StoreAvailability::Provisioned)
    }

    async fn count_matching(&self, filter: &ArticleFilter) -> Result<i64, ArticleRepositoryError> {
        let inner = self.lock();
        Ok(inner
            .articles
            .iter()
            .filter(|article| matches_filter(article, filter))
            .count() as i64)
    }

    async fn page_matching(
        &self,
        filter: &ArticleFilter,
        window: PageWindow,
    ) -> Result<Vec<Article>, ArticleRepositoryError> {
        let matching: Vec<Article> = {
            let inner = self.lock();
            inner
                .articles
                .iter()
                .filter(|article| matches_filter(article, filter))
                .cloned()
                .collect()
        };
        let page = ranked(matching)
            .into_iter()
            .skip(window.offset() as usize)
            .take(window.limit() as usize)
            .map(|mut article| {
                // The port contract returns bare rows; category lists are
                // attached via `categories_for`.
                article.categories = Vec::new();
                article
            })
            .collect();
        Ok(page)
    }

    async fn categories_for(
        &self,
        articles: &[ArticleId],
    ) -> Result<HashMap<ArticleId, Vec<CategoryRef>>, ArticleRepositoryError> {
        let inner = self.lock();
        Ok(inner
            .articles
            .iter()
            .filter(|article| articles.contains(&article.id))
            .map(|article| (article.id, article.categories.clone()))
            .collect())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn availability(&self) -> Result<StoreAvailability, CategoryRepositoryError> {
        Ok(StoreAvailability::Provisioned)
    }

    async fn categories_with_preferences(
        &self,
        user: &UserId,
    ) -> Result<Vec<CategoryWithPreference>, CategoryRepositoryError> {
        let inner = self.lock();
        let mut entries: Vec<CategoryWithPreference> = inner
            .categories
            .iter()
            .map(|category| CategoryWithPreference {
                category: category.clone(),
                preference: inner
                    .preferences
                    .get(&(*user.as_uuid(), category.id.get()))
                    .copied(),
            })
            .collect();
        entries.sort_by(CategoryWithPreference::listing_order);
        Ok(entries)
    }

    async fn custom_categories(
        &self,
        user: &UserId,
    ) -> Result<Vec<CustomCategory>, CategoryRepositoryError> {
        let inner = self.lock();
        let mut owned: Vec<CustomCategory> = inner
            .custom
            .iter()
            .filter(|category| category.user_id == *user)
            .cloned()
            .collect();
        owned.sort_by_key(|category| category.display_order);
        Ok(owned)
    }

    async fn upsert_preference(
        &self,
        user: &UserId,
        category: CategoryId,
        is_visible: bool,
        display_order: Option<i32>,
    ) -> Result<(), CategoryRepositoryError> {
        use std::collections::hash_map::Entry;

        let mut inner = self.lock();
        match inner.preferences.entry((*user.as_uuid(), category.get())) {
            Entry::Occupied(mut occupied) => {
                let existing = occupied.get_mut();
                existing.is_visible = is_visible;
                if let Some(order) = display_order {
                    existing.display_order = order;
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(CategoryPreference {
                    is_visible,
                    display_order: display_order.unwrap_or(0),
                });
            }
        }
        Ok(())
    }

    async fn count_custom(&self, user: &UserId) -> Result<i64, CategoryRepositoryError> {
        let inner = self.lock();
        Ok(inner
            .custom
            .iter()
            .filter(|category| category.user_id == *user)
            .count() as i64)
    }

    async fn custom_name_exists(
        &self,
        user: &UserId,
        name: &str,
    ) -> Result<bool, CategoryRepositoryError> {
        let inner = self.lock();
        Ok(inner
            .custom
            .iter()
            .any(|category| category.user_id == *user && category.name == name))
    }

    async fn insert_custom(
        &self,
        user: &UserId,
        name: &str,
        display_order: i32,
    ) -> Result<CustomCategory, CategoryRepositoryError> {
        let mut inner = self.lock();
        inner.next_custom_id += 1;
        let created = CustomCategory {
            id: CustomCategoryId::new(inner.next_custom_id),
            user_id: *user,
            name: name.to_owned(),
            display_order,
        };
        inner.custom.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl HistoryRepository for InMemoryStore {
    async fn availability(&self) -> Result<StoreAvailability, HistoryRepositoryError> {
        Ok(StoreAvailability::Provisioned)
    }

    async fn upsert_view(
        &self,
        user: &UserId,
        article: ArticleId,
        at: DateTime<Utc>,
    ) -> Result<(), HistoryRepositoryError> {
        let mut inner = self.lock();
        inner.history.insert((*user.as_uuid(), article.get()), at);
        Ok(())
    }

    async fn recent_category_views(
        &self,
        user: &UserId,
        scan_limit: i64,
    ) -> Result<Vec<CategoryId>, HistoryRepositoryError> {
        let inner = self.lock();
        let mut views: Vec<(DateTime<Utc>, i64)> = inner
            .history
            .iter()
            .filter(|((owner, _), _)| owner == user.as_uuid())
            .map(|((_, article), at)| (*at, *article))
            .collect();
        views.sort_by(|a, b| b.0.cmp(&a.0));

        let categories = views
            .into_iter()
            .filter_map(|(_, article_id)| {
                inner
                    .articles
                    .iter()
                    .find(|article| article.id.get() == article_id)
            })
            .flat_map(|article| article.categories.iter().map(|category| category.id))
            .take(scan_limit as usize)
            .collect();
        Ok(categories)
    }

    async fn recent_views(
        &self,
        user: &UserId,
        limit: i64,
    ) -> Result<Vec<HistoryEntry>, HistoryRepositoryError> {
        let inner = self.lock();
        let mut views: Vec<(DateTime<Utc>, i64)> = inner
            .history
            .iter()
            .filter(|((owner, _), _)| owner == user.as_uuid())
            .map(|((_, article), at)| (*at, *article))
            .collect();
        views.sort_by(|a, b| b.0.cmp(&a.0));

        let entries = views
            .into_iter()
            .filter_map(|(at, article_id)| {
                inner
                    .articles
                    .iter()
                    .find(|article| article.id.get() == article_id)
                    .map(|article| HistoryEntry {
                        article_id: article.id,
                        title: article.title.clone(),
                        url: article.url.clone(),
                        source_site: article.source_site.clone(),
                        thumbnail_url: article.thumbnail_url.clone(),
                        viewed_at: at,
                    })
            })
            .take(limit as usize)
            .collect();
        Ok(entries)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.user(id))
    }

    async fn guest_exists(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        let inner = self.lock();
        Ok(inner
            .users
            .get(id.as_uuid())
            .is_some_and(|stored| stored.user.kind == UserKind::Guest))
    }

    async fn create_guest(
        &self,
        id: &UserId,
        username: &Username,
    ) -> Result<(), UserRepositoryError> {
        let mut inner = self.lock();
        inner.users.insert(
            *id.as_uuid(),
            StoredUser {
                user: User {
                    id: *id,
                    username: username.clone(),
                    kind: UserKind::Guest,
                    email: None,
                    created_at: Utc::now(),
                    last_login: None,
                },
                password_hash: None,
            },
        );
        bootstrap_defaults(&mut inner, *id.as_uuid());
        Ok(())
    }

    async fn create_registered(
        &self,
        id: &UserId,
        account: &NewRegisteredAccount,
    ) -> Result<(), UserRepositoryError> {
        let mut inner = self.lock();
        inner.users.insert(
            *id.as_uuid(),
            StoredUser {
                user: User {
                    id: *id,
                    username: account.username.clone(),
                    kind: UserKind::Registered,
                    email: Some(account.email.clone()),
                    created_at: Utc::now(),
                    last_login: None,
                },
                password_hash: Some(account.password_hash.clone()),
            },
        );
        bootstrap_defaults(&mut inner, *id.as_uuid());
        Ok(())
    }

    async fn upgrade_guest(
        &self,
        id: &UserId,
        account: &NewRegisteredAccount,
    ) -> Result<bool, UserRepositoryError> {
        let mut inner = self.lock();
        let Some(stored) = inner.users.get_mut(id.as_uuid()) else {
            return Ok(false);
        };
        if stored.user.kind != UserKind::Guest {
            return Ok(false);
        }
        stored.user.username = account.username.clone();
        stored.user.kind = UserKind::Registered;
        stored.user.email = Some(account.email.clone());
        stored.password_hash = Some(account.password_hash.clone());
        Ok(true)
    }

    async fn find_credentials(
        &self,
        login: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let inner = self.lock();
        Ok(inner
            .users
            .values()
            .find(|stored| {
                stored.user.kind == UserKind::Registered
                    && (stored.user.username.as_ref() == login
                        || stored.user.email.as_deref() == Some(login))
            })
            .and_then(|stored| {
                stored.password_hash.clone().map(|password_hash| {
                    StoredCredentials {
                        user_id: stored.user.id,
                        username: stored.user.username.clone(),
                        password_hash,
                    }
                })
            }))
    }

    async fn login_taken(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, UserRepositoryError> {
        let inner = self.lock();
        Ok(inner.users.values().any(|stored| {
            stored.user.username.as_ref() == username || stored.user.email.as_deref() == Some(email)
        }))
    }

    async fn touch_last_login(&self, id: &UserId) -> Result<(), UserRepositoryError> {
        let mut inner = self.lock();
        if let Some(stored) = inner.users.get_mut(id.as_uuid()) {
            stored.user.last_login = Some(Utc::now());
        }
        Ok(())
    }
}
