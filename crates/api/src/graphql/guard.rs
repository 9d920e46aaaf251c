//! Session guards used at the top of every protected resolver.
//!
//! The `/graphql` handler injects an `Option<AuthUser>` into the request's
//! context data (`None` when the request carried no valid Bearer token).
//! Resolvers call one of these helpers first and get back the authenticated
//! user, or an error with the appropriate `code` extension.

use async_graphql::Context;

use agrireg_core::error::CoreError;
use agrireg_core::roles;

use crate::auth::AuthUser;
use crate::error::{gql_error, GqlResult};

/// Require a valid session. Every query and mutation except `login` and
/// `refreshSession` goes through this.
pub fn require_auth<'a>(ctx: &'a Context<'_>) -> GqlResult<&'a AuthUser> {
    ctx.data_opt::<Option<AuthUser>>()
        .and_then(|u| u.as_ref())
        .ok_or_else(|| {
            gql_error(CoreError::Unauthorized(
                "A valid session token is required".into(),
            ))
        })
}

/// Require a session whose role may mutate records (admin or officer).
pub fn require_officer<'a>(ctx: &'a Context<'_>) -> GqlResult<&'a AuthUser> {
    let user = require_auth(ctx)?;
    if !roles::can_mutate(&user.role) {
        return Err(gql_error(CoreError::Forbidden(
            "This operation requires the officer or admin role".into(),
        )));
    }
    Ok(user)
}

/// Require an admin session.
pub fn require_admin<'a>(ctx: &'a Context<'_>) -> GqlResult<&'a AuthUser> {
    let user = require_auth(ctx)?;
    if user.role != roles::ROLE_ADMIN {
        return Err(gql_error(CoreError::Forbidden(
            "This operation requires the admin role".into(),
        )));
    }
    Ok(user)
}
