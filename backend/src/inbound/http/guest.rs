//! Guest cookie helpers.
//!
//! The guest cookie is a long-lived identifier for unauthenticated users.
//! Handlers never set it directly: the identity resolver returns an
//! explicit [`CookieDirective`] which [`apply_directive`] translates into
//! response cookies.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpRequest, HttpResponseBuilder};

use crate::domain::ports::CookieDirective;

/// Name of the long-lived guest identity cookie.
pub const GUEST_COOKIE: &str = "guest_id";

/// Guest cookie lifetime.
const GUEST_COOKIE_DAYS: i64 = 30;

/// Raw guest cookie value carried by the request, if any.
pub fn guest_cookie_value(request: &HttpRequest) -> Option<String> {
    request
        .cookie(GUEST_COOKIE)
        .map(|cookie| cookie.value().to_owned())
}

/// Apply the resolver's cookie instruction to an outgoing response.
pub fn apply_directive(builder: &mut HttpResponseBuilder, directive: CookieDirective) {
    match directive {
        CookieDirective::Keep => {}
        CookieDirective::Issue(user_id) => {
            let cookie = Cookie::build(GUEST_COOKIE, user_id.to_string())
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .max_age(Duration::days(GUEST_COOKIE_DAYS))
                .finish();
            builder.cookie(cookie);
        }
        CookieDirective::Clear => {
            let mut cookie = Cookie::build(GUEST_COOKIE, "").path("/").finish();
            cookie.make_removal();
            builder.cookie(cookie);
        }
    }
}
