//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel
//! uses them for compile-time query validation and type-safe SQL
//! generation.

diesel::table! {
    /// User accounts, both implicit guests and registered users.
    users (id) {
        /// Primary key: UUID v4 identifier minted by the backend.
        id -> Uuid,
        /// Login name; auto-generated `guest_<hex>` for guests.
        username -> Varchar,
        /// Guest accounts lack credentials and an email address.
        is_guest -> Bool,
        password_hash -> Nullable<Varchar>,
        email -> Nullable<Varchar>,
        created_at -> Timestamptz,
        last_login -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// System-owned article categories.
    categories (id) {
        id -> Int8,
        name -> Varchar,
        slug -> Varchar,
        /// Default categories are copied into every new user's preferences.
        is_default -> Bool,
    }
}

diesel::table! {
    /// Per-user visibility and ordering for system categories.
    user_category_preferences (user_id, category_id) {
        user_id -> Uuid,
        category_id -> Int8,
        is_visible -> Bool,
        display_order -> Int4,
    }
}

diesel::table! {
    /// User-private categories, capped at ten per user.
    user_custom_categories (id) {
        id -> Int8,
        user_id -> Uuid,
        name -> Varchar,
        display_order -> Int4,
    }
}

diesel::table! {
    /// Pre-populated article catalogue.
    articles (id) {
        id -> Int8,
        title -> Varchar,
        url -> Varchar,
        description -> Text,
        thumbnail_url -> Varchar,
        source_site -> Varchar,
        /// Popularity signal driving the fixed feed ranking.
        bookmark_count -> Int8,
        published_at -> Timestamptz,
    }
}

diesel::table! {
    /// Many-to-many edges between articles and categories.
    article_categories (article_id, category_id) {
        article_id -> Int8,
        category_id -> Int8,
    }
}

diesel::table! {
    /// Per-user article view history, one row per (user, article).
    user_article_history (user_id, article_id) {
        user_id -> Uuid,
        article_id -> Int8,
        viewed_at -> Timestamptz,
    }
}

diesel::joinable!(article_categories -> articles (article_id));
diesel::joinable!(article_categories -> categories (category_id));
diesel::joinable!(user_category_preferences -> categories (category_id));
diesel::joinable!(user_article_history -> articles (article_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    categories,
    user_category_preferences,
    user_custom_categories,
    articles,
    article_categories,
    user_article_history,
);
