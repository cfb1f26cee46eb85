//! Preference mutation and account lifecycle behaviour against the
//! in-memory store: quota and uniqueness rules, visibility upserts,
//! bootstrap ordering, and the guest upgrade path.

mod support;

use std::sync::Arc;

use backend::domain::ports::{
    AccountCommand, CategoryQuery, CookieDirective, IdentityResolver, PreferenceCommand,
    RegisterRequest, RequestContext, SetVisibilityRequest,
};
use backend::domain::{
    AccountService, ArticleId, CUSTOM_CATEGORY_LIMIT, CategoryId, ErrorCode, IdentityService,
    PreferenceService, UserId, UserKind,
};
use backend::domain::ports::HistoryRepository;
use backend::outbound::identity::BcryptPasswordHasher;
use backend::test_support::InMemoryStore;
use rstest::rstest;
use support::{article, at};

fn preference_service(store: &InMemoryStore) -> PreferenceService<InMemoryStore, InMemoryStore> {
    PreferenceService::new(Arc::new(store.clone()), Arc::new(store.clone()))
}

fn account_service(store: &InMemoryStore) -> AccountService<InMemoryStore, BcryptPasswordHasher> {
    AccountService::new(
        Arc::new(store.clone()),
        Arc::new(BcryptPasswordHasher::with_cost(4)),
    )
}

async fn mint_guest(store: &InMemoryStore) -> UserId {
    let resolver = IdentityService::new(Arc::new(store.clone()));
    let resolution = resolver
        .resolve(RequestContext::default())
        .await
        .expect("guest minted");
    assert_eq!(
        resolution.cookie,
        CookieDirective::Issue(resolution.user_id)
    );
    resolution.user_id
}

#[rstest]
#[tokio::test]
async fn guest_bootstrap_copies_default_categories_in_order() {
    let store = InMemoryStore::new();
    store.seed_category(2, "Technology", "technology", true);
    store.seed_category(1, "General", "general", true);
    store.seed_category(3, "Sports", "sports", false);

    let guest = mint_guest(&store).await;

    let mut rows = store.preference_rows(&guest);
    rows.sort_by_key(|(category, _)| *category);
    let orders: Vec<(i64, i32)> = rows
        .iter()
        .map(|(category, preference)| (category.get(), preference.display_order))
        .collect();
    // Default categories only, enumerated by id, ascending order from 1.
    assert_eq!(orders, [(1, 1), (2, 2)]);
}

#[rstest]
#[tokio::test]
async fn set_visibility_keeps_the_existing_order_when_omitted() {
    let store = InMemoryStore::new();
    store.seed_category(3, "Sports", "sports", true);
    let guest = mint_guest(&store).await;
    let service = preference_service(&store);

    service
        .set_visibility(
            &guest,
            SetVisibilityRequest {
                category: CategoryId::new(3),
                is_visible: false,
                display_order: None,
            },
        )
        .await
        .expect("visibility updated");

    let listing = service.listing(&guest).await.expect("listing");
    let entry = listing
        .categories
        .iter()
        .find(|entry| entry.category.id == CategoryId::new(3))
        .expect("category present");
    let preference = entry.preference.expect("preference row");
    assert!(!preference.is_visible);
    // Bootstrap assigned order 1; the update must not disturb it.
    assert_eq!(preference.display_order, 1);
}

#[rstest]
#[tokio::test]
async fn set_visibility_inserts_with_order_zero_by_default() {
    let store = InMemoryStore::new();
    store.seed_category(5, "Business", "business", false);
    let guest = mint_guest(&store).await;
    let service = preference_service(&store);

    service
        .set_visibility(
            &guest,
            SetVisibilityRequest {
                category: CategoryId::new(5),
                is_visible: true,
                display_order: None,
            },
        )
        .await
        .expect("preference inserted");

    let rows = store.preference_rows(&guest);
    let (_, preference) = rows
        .iter()
        .find(|(category, _)| *category == CategoryId::new(5))
        .expect("row inserted");
    assert_eq!(preference.display_order, 0);
}

#[rstest]
#[tokio::test]
async fn custom_category_quota_rejects_the_eleventh() {
    let store = InMemoryStore::new();
    let guest = mint_guest(&store).await;
    let service = preference_service(&store);

    for index in 0..CUSTOM_CATEGORY_LIMIT {
        let created = service
            .add_custom_category(&guest, &format!("Topic {index}"))
            .await
            .expect("within quota");
        assert_eq!(created.display_order, index as i32 + 1);
    }

    let err = service
        .add_custom_category(&guest, "One Too Many")
        .await
        .expect_err("over quota");
    assert_eq!(err.code(), ErrorCode::QuotaExceeded);

    let listing = service.listing(&guest).await.expect("listing");
    assert_eq!(listing.custom_categories.len(), CUSTOM_CATEGORY_LIMIT);
}

#[rstest]
#[tokio::test]
async fn custom_category_names_are_unique_per_user_case_sensitively() {
    let store = InMemoryStore::new();
    let guest = mint_guest(&store).await;
    let other = mint_guest(&store).await;
    let service = preference_service(&store);

    service
        .add_custom_category(&guest, "Cooking")
        .await
        .expect("first insert");

    let err = service
        .add_custom_category(&guest, " Cooking ")
        .await
        .expect_err("duplicate after trim");
    assert_eq!(err.code(), ErrorCode::DuplicateName);

    // Different case and different owner both pass.
    service
        .add_custom_category(&guest, "cooking")
        .await
        .expect("case-sensitive uniqueness");
    service
        .add_custom_category(&other, "Cooking")
        .await
        .expect("scoped to the owner");
}

#[rstest]
#[tokio::test]
async fn guest_upgrade_preserves_history_and_preferences_under_the_same_id() {
    let store = InMemoryStore::new();
    store.seed_category(1, "General", "general", true);
    store.seed_article(article(10, 50, at(8, 0), &[(1, "General")]));

    let guest = mint_guest(&store).await;
    store
        .upsert_view(&guest, ArticleId::new(10), at(9, 0))
        .await
        .expect("view recorded");
    let mut preferences_before = store.preference_rows(&guest);
    preferences_before.sort_by_key(|(category, _)| *category);
    assert!(!preferences_before.is_empty());

    let outcome = account_service(&store)
        .register(RegisterRequest {
            username: "ada".to_owned(),
            password: "correct horse".to_owned(),
            email: "ada@example.com".to_owned(),
            guest_id: Some(guest),
        })
        .await
        .expect("upgrade");

    assert!(outcome.upgraded);
    assert_eq!(outcome.user_id, guest);

    let upgraded = store.user(&guest).expect("user still present");
    assert_eq!(upgraded.kind, UserKind::Registered);
    assert_eq!(upgraded.username.as_ref(), "ada");
    assert_eq!(store.history_rows(&guest), 1);
    let mut preferences_after = store.preference_rows(&guest);
    preferences_after.sort_by_key(|(category, _)| *category);
    assert_eq!(preferences_after, preferences_before);
}

#[rstest]
#[tokio::test]
async fn login_works_with_username_or_email_but_not_wrong_password() {
    let store = InMemoryStore::new();
    let service = account_service(&store);
    service
        .register(RegisterRequest {
            username: "ada".to_owned(),
            password: "correct horse".to_owned(),
            email: "ada@example.com".to_owned(),
            guest_id: None,
        })
        .await
        .expect("registered");

    let by_name = service.login("ada", "correct horse").await.expect("login");
    let by_email = service
        .login("ada@example.com", "correct horse")
        .await
        .expect("login by email");
    assert_eq!(by_name.user_id, by_email.user_id);

    let err = service
        .login("ada", "wrong password")
        .await
        .expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::Unauthorized);

    let stored = store.user(&by_name.user_id).expect("user");
    assert!(stored.last_login.is_some());
}

#[rstest]
#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let store = InMemoryStore::new();
    let service = account_service(&store);
    let request = RegisterRequest {
        username: "ada".to_owned(),
        password: "correct horse".to_owned(),
        email: "ada@example.com".to_owned(),
        guest_id: None,
    };
    service.register(request.clone()).await.expect("first");

    let err = service.register(request).await.expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn overview_discloses_the_username_only_for_registered_sessions() {
    let store = InMemoryStore::new();
    store.seed_category(1, "General", "general", true);
    let service = preference_service(&store);

    let guest = mint_guest(&store).await;
    let guest_view = service
        .overview(&guest, None)
        .await
        .expect("guest overview");
    assert!(guest_view.is_guest);
    assert!(guest_view.username.is_empty());

    let outcome = account_service(&store)
        .register(RegisterRequest {
            username: "ada".to_owned(),
            password: "correct horse".to_owned(),
            email: "ada@example.com".to_owned(),
            guest_id: Some(guest),
        })
        .await
        .expect("upgrade");

    let registered_view = service
        .overview(&outcome.user_id, Some(outcome.username.clone()))
        .await
        .expect("registered overview");
    assert!(!registered_view.is_guest);
    assert_eq!(registered_view.username, "ada");
}
