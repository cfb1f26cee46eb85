//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Registration paths run in one transaction so a failed default-category
//! bootstrap rolls the whole account creation back. Guest minting keeps
//! bootstrap best-effort instead: the guest row must survive even when no
//! default categories exist.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{
    NewRegisteredAccount, StoredCredentials, UserRepository, UserRepositoryError,
};
use crate::domain::{User, UserId, UserKind, Username};

use super::diesel_helpers::describe_diesel_error;
use super::models::{GuestUpgrade, NewGuestRow, NewPreferenceRow, NewRegisteredRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{categories, user_category_preferences, users};

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserRepositoryError::unavailable(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    UserRepositoryError::query(describe_diesel_error(&error))
}

fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let username = Username::new(row.username)
        .map_err(|error| UserRepositoryError::query(format!("stored username invalid: {error}")))?;
    Ok(User {
        id: UserId::from_uuid(row.id),
        username,
        kind: if row.is_guest {
            UserKind::Guest
        } else {
            UserKind::Registered
        },
        email: row.email,
        created_at: row.created_at,
        last_login: row.last_login,
    })
}

/// Copy every default category into the user's preferences, ascending
/// display_order from 1 in category id order.
async fn bootstrap_default_categories(
    conn: &mut AsyncPgConnection,
    user: uuid::Uuid,
) -> Result<(), diesel::result::Error> {
    let defaults: Vec<i64> = categories::table
        .filter(categories::is_default.eq(true))
        .order(categories::id.asc())
        .select(categories::id)
        .load(conn)
        .await?;
    if defaults.is_empty() {
        return Ok(());
    }

    let rows: Vec<NewPreferenceRow> = defaults
        .into_iter()
        .enumerate()
        .map(|(index, category_id)| NewPreferenceRow {
            user_id: user,
            category_id,
            is_visible: true,
            display_order: index as i32 + 1,
        })
        .collect();
    diesel::insert_into(user_category_preferences::table)
        .values(&rows)
        .execute(conn)
        .await
        .map(|_| ())
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn guest_exists(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(
            users::table.filter(users::id.eq(id.as_uuid()).and(users::is_guest.eq(true))),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn create_guest(
        &self,
        id: &UserId,
        username: &Username,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(users::table)
            .values(&NewGuestRow {
                id: *id.as_uuid(),
                username: username.as_ref(),
                is_guest: true,
            })
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        // Best-effort bootstrap: the guest survives a missing categories
        // table or a failed preference write.
        if let Err(error) = bootstrap_default_categories(&mut conn, *id.as_uuid()).await {
            warn!(user = %id, %error, "default category bootstrap failed for guest");
        }
        Ok(())
    }

    async fn create_registered(
        &self,
        id: &UserId,
        account: &NewRegisteredAccount,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user = *id.as_uuid();

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::insert_into(users::table)
                    .values(&NewRegisteredRow {
                        id: user,
                        username: account.username.as_ref(),
                        is_guest: false,
                        password_hash: account.password_hash.as_str(),
                        email: account.email.as_str(),
                    })
                    .execute(conn)
                    .await?;

                bootstrap_default_categories(conn, user).await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn upgrade_guest(
        &self,
        id: &UserId,
        account: &NewRegisteredAccount,
    ) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // A single guarded UPDATE: zero rows means the id no longer names
        // a guest. History and preference rows stay keyed to the same id.
        let updated = diesel::update(
            users::table.filter(users::id.eq(id.as_uuid()).and(users::is_guest.eq(true))),
        )
        .set(&GuestUpgrade {
            username: account.username.as_ref(),
            is_guest: false,
            password_hash: account.password_hash.as_str(),
            email: account.email.as_str(),
        })
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(updated > 0)
    }

    async fn find_credentials(
        &self,
        login: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<(uuid::Uuid, String, Option<String>)> = users::table
            .filter(
                users::username
                    .eq(login)
                    .or(users::email.eq(login))
                    .and(users::is_guest.eq(false)),
            )
            .select((users::id, users::username, users::password_hash))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let Some((id, username, Some(password_hash))) = row else {
            return Ok(None);
        };
        let username = Username::new(username).map_err(|error| {
            UserRepositoryError::query(format!("stored username invalid: {error}"))
        })?;
        Ok(Some(StoredCredentials {
            user_id: UserId::from_uuid(id),
            username,
            password_hash,
        }))
    }

    async fn login_taken(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(
            users::table.filter(users::username.eq(username).or(users::email.eq(email))),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn touch_last_login(&self, id: &UserId) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(users::table.find(id.as_uuid()))
            .set(users::last_login.eq(Some(Utc::now())))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_unavailable() {
        let err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(err, UserRepositoryError::Unavailable { .. }));
    }

    #[rstest]
    fn guest_rows_convert_to_guest_users() {
        let id = uuid::Uuid::new_v4();
        let user = row_to_user(UserRow {
            id,
            username: format!("guest_{}", id.simple()),
            is_guest: true,
            email: None,
            created_at: Utc::now(),
            last_login: None,
        })
        .expect("valid row");
        assert_eq!(user.kind, UserKind::Guest);
        assert!(user.email.is_none());
    }

    #[rstest]
    fn registered_rows_convert_to_registered_users() {
        let user = row_to_user(UserRow {
            id: uuid::Uuid::new_v4(),
            username: "ada".to_owned(),
            is_guest: false,
            email: Some("ada@example.com".to_owned()),
            created_at: Utc::now(),
            last_login: Some(Utc::now()),
        })
        .expect("valid row");
        assert_eq!(user.kind, UserKind::Registered);
        assert!(user.last_login.is_some());
    }
}
