//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and
//! must never be exposed to the domain. They exist solely to satisfy
//! Diesel's type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    articles, categories, user_article_history, user_category_preferences, user_custom_categories,
    users,
};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub is_guest: bool,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Insertable struct for minting guest users.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewGuestRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub is_guest: bool,
}

/// Insertable struct for creating registered users.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewRegisteredRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub is_guest: bool,
    pub password_hash: &'a str,
    pub email: &'a str,
}

/// Changeset flipping a guest into a registered account in place.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct GuestUpgrade<'a> {
    pub username: &'a str,
    pub is_guest: bool,
    pub password_hash: &'a str,
    pub email: &'a str,
}

/// Row struct for reading from the categories table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub is_default: bool,
}

/// Insertable struct for preference upserts and bootstrap rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_category_preferences)]
pub(crate) struct NewPreferenceRow {
    pub user_id: Uuid,
    pub category_id: i64,
    pub is_visible: bool,
    pub display_order: i32,
}

/// Row struct for reading from the user_custom_categories table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_custom_categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CustomCategoryRow {
    pub id: i64,
    pub user_id: Uuid,
    pub name: String,
    pub display_order: i32,
}

/// Insertable struct for creating custom categories.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_custom_categories)]
pub(crate) struct NewCustomCategoryRow<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
    pub display_order: i32,
}

/// Row struct for reading from the articles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = articles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ArticleRow {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub description: String,
    pub thumbnail_url: String,
    pub source_site: String,
    pub bookmark_count: i64,
    pub published_at: DateTime<Utc>,
}

/// Insertable struct for view-history upserts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_article_history)]
pub(crate) struct NewHistoryRow {
    pub user_id: Uuid,
    pub article_id: i64,
    pub viewed_at: DateTime<Utc>,
}
