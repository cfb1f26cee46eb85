//! PostgreSQL-backed `CategoryRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CategoryRepository, CategoryRepositoryError};
use crate::domain::{
    Category, CategoryId, CategoryPreference, CategoryWithPreference, CustomCategory,
    CustomCategoryId, StoreAvailability, UserId,
};

use super::diesel_helpers::{describe_diesel_error, table_present};
use super::models::{CategoryRow, CustomCategoryRow, NewCustomCategoryRow, NewPreferenceRow};
use super::pool::{DbPool, PoolError};
use super::schema::{categories, user_category_preferences, user_custom_categories};

/// Diesel-backed implementation of the `CategoryRepository` port.
#[derive(Clone)]
pub struct DieselCategoryRepository {
    pool: DbPool,
}

impl DieselCategoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CategoryRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            CategoryRepositoryError::unavailable(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> CategoryRepositoryError {
    CategoryRepositoryError::query(describe_diesel_error(&error))
}

fn row_to_category(row: CategoryRow) -> Category {
    Category {
        id: CategoryId::new(row.id),
        name: row.name,
        slug: row.slug,
        is_default: row.is_default,
    }
}

fn row_to_custom(row: CustomCategoryRow) -> CustomCategory {
    CustomCategory {
        id: CustomCategoryId::new(row.id),
        user_id: UserId::from_uuid(row.user_id),
        name: row.name,
        display_order: row.display_order,
    }
}

#[async_trait]
impl CategoryRepository for DieselCategoryRepository {
    async fn availability(&self) -> Result<StoreAvailability, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let present = table_present(&mut conn, "categories")
            .await
            .map_err(map_diesel_error)?;
        Ok(if present {
            StoreAvailability::Provisioned
        } else {
            StoreAvailability::Unprovisioned
        })
    }

    async fn categories_with_preferences(
        &self,
        user: &UserId,
    ) -> Result<Vec<CategoryWithPreference>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Legacy listing order: missing preference rows first, then
        // display_order ascending, name as the tie-break.
        let rows: Vec<(CategoryRow, Option<bool>, Option<i32>)> = categories::table
            .left_join(
                user_category_preferences::table.on(user_category_preferences::category_id
                    .eq(categories::id)
                    .and(user_category_preferences::user_id.eq(user.as_uuid()))),
            )
            .order((
                user_category_preferences::display_order.asc().nulls_first(),
                categories::name.asc(),
            ))
            .select((
                CategoryRow::as_select(),
                user_category_preferences::is_visible.nullable(),
                user_category_preferences::display_order.nullable(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|(category, is_visible, display_order)| CategoryWithPreference {
                category: row_to_category(category),
                preference: is_visible.zip(display_order).map(
                    |(is_visible, display_order)| CategoryPreference {
                        is_visible,
                        display_order,
                    },
                ),
            })
            .collect())
    }

    async fn custom_categories(
        &self,
        user: &UserId,
    ) -> Result<Vec<CustomCategory>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CustomCategoryRow> = user_custom_categories::table
            .filter(user_custom_categories::user_id.eq(user.as_uuid()))
            .order(user_custom_categories::display_order.asc())
            .select(CustomCategoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_custom).collect())
    }

    async fn upsert_preference(
        &self,
        user: &UserId,
        category: CategoryId,
        is_visible: bool,
        display_order: Option<i32>,
    ) -> Result<(), CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewPreferenceRow {
            user_id: *user.as_uuid(),
            category_id: category.get(),
            is_visible,
            display_order: display_order.unwrap_or(0),
        };
        let conflict = (
            user_category_preferences::user_id,
            user_category_preferences::category_id,
        );

        // ON CONFLICT keeps the read-then-write a single statement; an
        // omitted display_order is left untouched on update.
        match display_order {
            Some(order) => {
                diesel::insert_into(user_category_preferences::table)
                    .values(&new_row)
                    .on_conflict(conflict)
                    .do_update()
                    .set((
                        user_category_preferences::is_visible.eq(is_visible),
                        user_category_preferences::display_order.eq(order),
                    ))
                    .execute(&mut conn)
                    .await
            }
            None => {
                diesel::insert_into(user_category_preferences::table)
                    .values(&new_row)
                    .on_conflict(conflict)
                    .do_update()
                    .set(user_category_preferences::is_visible.eq(is_visible))
                    .execute(&mut conn)
                    .await
            }
        }
        .map(|_| ())
        .map_err(map_diesel_error)
    }

    async fn count_custom(&self, user: &UserId) -> Result<i64, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        user_custom_categories::table
            .filter(user_custom_categories::user_id.eq(user.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn custom_name_exists(
        &self,
        user: &UserId,
        name: &str,
    ) -> Result<bool, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Exact, case-sensitive match scoped to the user's own categories.
        diesel::select(diesel::dsl::exists(
            user_custom_categories::table.filter(
                user_custom_categories::user_id
                    .eq(user.as_uuid())
                    .and(user_custom_categories::name.eq(name)),
            ),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn insert_custom(
        &self,
        user: &UserId,
        name: &str,
        display_order: i32,
    ) -> Result<CustomCategory, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: CustomCategoryRow = diesel::insert_into(user_custom_categories::table)
            .values(&NewCustomCategoryRow {
                user_id: *user.as_uuid(),
                name,
                display_order,
            })
            .returning(CustomCategoryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(row_to_custom(row))
    }
}
