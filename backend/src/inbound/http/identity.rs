//! Per-request identity resolution glue.
//!
//! Every data endpoint resolves the acting user first. This helper builds
//! the explicit [`RequestContext`] from the session and guest cookie and
//! hands back the resolver's outcome, including the cookie instruction the
//! handler applies to its response.

use actix_web::HttpRequest;

use crate::domain::Error;
use crate::domain::ports::{IdentityResolution, RequestContext};
use crate::inbound::http::guest;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Resolve the acting user for a data endpoint.
pub(crate) async fn resolve_identity(
    state: &HttpState,
    session: &SessionContext,
    request: &HttpRequest,
) -> Result<IdentityResolution, Error> {
    let context = RequestContext {
        session_user: session.user_id()?,
        guest_cookie: guest::guest_cookie_value(request),
    };
    state.identity.resolve(context).await
}
