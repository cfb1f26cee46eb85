//! Driving port for request identity resolution.
//!
//! Every data endpoint resolves the acting user before doing anything else.
//! The resolver receives the request's credentials as an explicit value and
//! returns any cookie instruction as explicit output; it never mutates
//! ambient response state.

use async_trait::async_trait;

use crate::domain::{Error, UserId};

/// Credentials extracted from an inbound request.
///
/// `session_user` is the id persisted in the session cookie, if any;
/// `guest_cookie` is the raw value of the long-lived guest cookie.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestContext {
    pub session_user: Option<UserId>,
    pub guest_cookie: Option<String>,
}

/// Cookie instruction the HTTP adapter applies to the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieDirective {
    /// Leave the guest cookie untouched.
    Keep,
    /// Issue a fresh 30-day guest cookie holding this id.
    Issue(UserId),
    /// Expire any guest cookie the client still holds.
    Clear,
}

/// Outcome of identity resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityResolution {
    pub user_id: UserId,
    pub cookie: CookieDirective,
}

/// Driving port mapping an inbound request to a stable user identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve the acting user, minting a guest when nothing matches.
    ///
    /// Repeated calls with the same still-valid guest cookie return the
    /// same id without re-running the default-category bootstrap.
    async fn resolve(&self, context: RequestContext) -> Result<IdentityResolution, Error>;
}
