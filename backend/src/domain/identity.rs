//! Identity resolution service.
//!
//! Maps an inbound request to a stable user id: an authenticated session
//! wins, a live guest cookie is honoured next, and otherwise a fresh guest
//! is minted with bootstrapped default categories. This is the only path
//! that creates users implicitly.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    CookieDirective, IdentityResolution, IdentityResolver, RequestContext, UserRepository,
    UserRepositoryError,
};
use crate::domain::{Error, UserId, UserKind, Username};

/// Resolver implementing the [`IdentityResolver`] driving port.
#[derive(Clone)]
pub struct IdentityService<U> {
    users: Arc<U>,
}

impl<U> IdentityService<U> {
    /// Create a resolver over the given user store.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Unavailable { message } => Error::store_unavailable(message),
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user store query failed: {message}"))
        }
    }
}

impl<U> IdentityService<U>
where
    U: UserRepository,
{
    async fn session_identity(&self, id: &UserId) -> Result<Option<IdentityResolution>, Error> {
        let user = self.users.find(id).await.map_err(map_user_error)?;
        Ok(user
            .filter(|user| user.kind == UserKind::Registered)
            .map(|user| IdentityResolution {
                user_id: user.id,
                cookie: CookieDirective::Keep,
            }))
    }

    async fn guest_identity(&self, cookie: &str) -> Result<Option<IdentityResolution>, Error> {
        // A cookie that does not parse is treated as absent, not an error:
        // the caller simply gets a fresh guest.
        let Ok(id) = UserId::new(cookie) else {
            return Ok(None);
        };
        let exists = self.users.guest_exists(&id).await.map_err(map_user_error)?;
        Ok(exists.then_some(IdentityResolution {
            user_id: id,
            cookie: CookieDirective::Keep,
        }))
    }

    async fn mint_guest(&self) -> Result<IdentityResolution, Error> {
        let id = UserId::random();
        let username = Username::for_guest(&id);
        self.users
            .create_guest(&id, &username)
            .await
            .map_err(map_user_error)?;
        info!(user = %id, "minted guest user");
        Ok(IdentityResolution {
            user_id: id,
            cookie: CookieDirective::Issue(id),
        })
    }
}

#[async_trait]
impl<U> IdentityResolver for IdentityService<U>
where
    U: UserRepository,
{
    async fn resolve(&self, context: RequestContext) -> Result<IdentityResolution, Error> {
        if let Some(session_user) = context.session_user {
            if let Some(resolution) = self.session_identity(&session_user).await? {
                return Ok(resolution);
            }
            warn!(user = %session_user, "session user no longer registered, falling back");
        }

        if let Some(cookie) = context.guest_cookie.as_deref() {
            if let Some(resolution) = self.guest_identity(cookie).await? {
                return Ok(resolution);
            }
        }

        self.mint_guest().await
    }
}
